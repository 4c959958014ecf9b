//! Roles and the dashboards they unlock

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "snake_case")]
#[sqlx(rename_all = "snake_case")]
pub enum Role {
    Admin,
    Staff,
    Board,
    Volunteer,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Admin => "admin",
            Role::Staff => "staff",
            Role::Board => "board",
            Role::Volunteer => "volunteer",
        }
    }

    pub fn can_access(&self, dashboard: Dashboard) -> bool {
        dashboard.allowed_roles().contains(self)
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "admin" => Ok(Role::Admin),
            "staff" => Ok(Role::Staff),
            "board" => Ok(Role::Board),
            "volunteer" => Ok(Role::Volunteer),
            _ => Err(format!("Unknown role: {}", s)),
        }
    }
}

/// Role-gated areas of the portal
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dashboard {
    /// Application review and voting
    Staff,
    /// Meeting minutes and attendance
    Board,
    /// A volunteer's own RSVPs and announcements
    Volunteer,
    /// Creating opportunities and announcements, checking attendance
    VolunteerAdmin,
}

impl Dashboard {
    pub fn allowed_roles(&self) -> &'static [Role] {
        match self {
            Dashboard::Staff => &[Role::Admin, Role::Staff, Role::Board],
            Dashboard::Board => &[Role::Admin, Role::Board],
            Dashboard::Volunteer => &[Role::Volunteer],
            Dashboard::VolunteerAdmin => &[Role::Admin, Role::Staff],
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Dashboard::Staff => "staff dashboard",
            Dashboard::Board => "board dashboard",
            Dashboard::Volunteer => "volunteer dashboard",
            Dashboard::VolunteerAdmin => "volunteer administration",
        }
    }
}

/// The two sign-in pages backed by the same identity table
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoginSurface {
    Staff,
    Volunteer,
}

impl LoginSurface {
    pub fn accepts(&self, role: Role) -> bool {
        match self {
            LoginSurface::Staff => matches!(role, Role::Admin | Role::Staff | Role::Board),
            LoginSurface::Volunteer => matches!(role, Role::Volunteer | Role::Admin),
        }
    }
}
