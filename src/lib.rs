pub mod api;
pub mod applications;
pub mod auth;
pub mod config;
pub mod database;
pub mod donations;
pub mod error;
pub mod meetings;
pub mod realtime;
pub mod storage;
pub mod volunteers;
pub mod voting;

pub use error::PortalError;
