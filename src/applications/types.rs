//! Grant application types and status lifecycle

use serde::{Deserialize, Serialize};

use crate::voting::VoteChoice;

/// The four grant programs an applicant can apply to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "snake_case")]
#[sqlx(rename_all = "snake_case")]
pub enum ApplicationType {
    FunGrant,
    FinancialAid,
    SelfCare,
    RegionalConflict,
}

impl ApplicationType {
    pub const ALL: [ApplicationType; 4] = [
        ApplicationType::FunGrant,
        ApplicationType::FinancialAid,
        ApplicationType::SelfCare,
        ApplicationType::RegionalConflict,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ApplicationType::FunGrant => "fun_grant",
            ApplicationType::FinancialAid => "financial_aid",
            ApplicationType::SelfCare => "self_care",
            ApplicationType::RegionalConflict => "regional_conflict",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            ApplicationType::FunGrant => "Fun Grant",
            ApplicationType::FinancialAid => "Financial Aid Scholarship",
            ApplicationType::SelfCare => "Self-Care Grant",
            ApplicationType::RegionalConflict => "Regional Conflict Grant",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            ApplicationType::FunGrant => {
                "Funds a camp, class or activity for a grieving child so they can simply be a kid again."
            }
            ApplicationType::FinancialAid => {
                "Tuition support for students who have lost a parent or guardian."
            }
            ApplicationType::SelfCare => {
                "Helps surviving caregivers pay for counseling, respite and other self-care."
            }
            ApplicationType::RegionalConflict => {
                "Emergency support for families who lost a loved one to armed conflict in their region."
            }
        }
    }
}

impl std::fmt::Display for ApplicationType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for ApplicationType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "fun_grant" => Ok(ApplicationType::FunGrant),
            "financial_aid" => Ok(ApplicationType::FinancialAid),
            "self_care" => Ok(ApplicationType::SelfCare),
            "regional_conflict" => Ok(ApplicationType::RegionalConflict),
            _ => Err(format!("Unknown application type: {}", s)),
        }
    }
}

/// Review status: pending -> under_review -> {approved, denied, more_info_needed}
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "snake_case")]
#[sqlx(rename_all = "snake_case")]
pub enum ApplicationStatus {
    Pending,
    UnderReview,
    Approved,
    Denied,
    MoreInfoNeeded,
}

impl ApplicationStatus {
    pub const ALL: [ApplicationStatus; 5] = [
        ApplicationStatus::Pending,
        ApplicationStatus::UnderReview,
        ApplicationStatus::Approved,
        ApplicationStatus::Denied,
        ApplicationStatus::MoreInfoNeeded,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ApplicationStatus::Pending => "pending",
            ApplicationStatus::UnderReview => "under_review",
            ApplicationStatus::Approved => "approved",
            ApplicationStatus::Denied => "denied",
            ApplicationStatus::MoreInfoNeeded => "more_info_needed",
        }
    }

    /// Whether a staff member may move an application from `self` to `next`
    pub fn can_transition_to(&self, next: ApplicationStatus) -> bool {
        use ApplicationStatus::*;
        matches!(
            (self, next),
            (Pending, UnderReview)
                | (Pending, Denied)
                | (UnderReview, Approved)
                | (UnderReview, Denied)
                | (UnderReview, MoreInfoNeeded)
                | (MoreInfoNeeded, UnderReview)
        )
    }
}

impl std::fmt::Display for ApplicationStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for ApplicationStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(ApplicationStatus::Pending),
            "under_review" => Ok(ApplicationStatus::UnderReview),
            "approved" => Ok(ApplicationStatus::Approved),
            "denied" => Ok(ApplicationStatus::Denied),
            "more_info_needed" => Ok(ApplicationStatus::MoreInfoNeeded),
            _ => Err(format!("Unknown application status: {}", s)),
        }
    }
}

/// A staff member's vote on an application
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "snake_case")]
#[sqlx(rename_all = "snake_case")]
pub enum ApplicationVoteChoice {
    Approve,
    Deny,
    MoreInfo,
}

impl VoteChoice for ApplicationVoteChoice {
    fn all() -> &'static [Self] {
        &[
            ApplicationVoteChoice::Approve,
            ApplicationVoteChoice::Deny,
            ApplicationVoteChoice::MoreInfo,
        ]
    }

    fn as_str(&self) -> &'static str {
        match self {
            ApplicationVoteChoice::Approve => "approve",
            ApplicationVoteChoice::Deny => "deny",
            ApplicationVoteChoice::MoreInfo => "more_info",
        }
    }
}
