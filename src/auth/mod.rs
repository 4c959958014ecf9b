//! Identity: accounts, password sign-in, session tokens and role gates
//!
//! Staff and volunteers sign in on separate pages, but both surfaces check the
//! same `users` table.

pub mod password;
pub mod roles;
pub mod service;
pub mod session;

pub use roles::{Dashboard, LoginSurface, Role};
pub use service::{AuthService, SessionUser, SignInResponse, VolunteerSignUp};
pub use session::SessionManager;
