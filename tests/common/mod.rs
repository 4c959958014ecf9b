#![allow(dead_code)]

use foundation_portal::api::AppState;
use foundation_portal::applications::{ApplicationForm, ApplicationType};
use foundation_portal::auth::{AuthService, Role, SessionManager, VolunteerSignUp};
use foundation_portal::config::AppConfig;
use foundation_portal::database::models::{User, VolunteerProfile};
use foundation_portal::database::Database;
use std::path::Path;

pub const TEST_SECRET: &str = "test-session-secret";
pub const TEST_PASSWORD: &str = "correct-horse-battery";

/// Setup an in-memory SQLite database for testing
pub async fn setup_test_db() -> Database {
    Database::new_in_memory().await.expect("Failed to create test database")
}

pub fn test_config(storage_root: &Path) -> AppConfig {
    AppConfig {
        jwt_secret: TEST_SECRET.to_string(),
        stripe_secret_key: "sk_test_portal".to_string(),
        storage_root: storage_root.to_string_lossy().to_string(),
        ..AppConfig::default()
    }
}

pub fn test_auth(db: &Database) -> AuthService {
    AuthService::new(db.clone(), SessionManager::new(TEST_SECRET, 12).expect("valid session lifetime"))
}

pub fn test_state(db: &Database, storage_root: &Path) -> AppState {
    AppState::new(test_config(storage_root), db.clone()).expect("valid test config")
}

pub async fn create_user(db: &Database, email: &str, name: &str, role: Role) -> User {
    test_auth(db)
        .create_user(email, TEST_PASSWORD, name, role)
        .await
        .expect("Failed to create test user")
}

pub async fn create_volunteer(db: &Database, email: &str, name: &str) -> (User, VolunteerProfile) {
    let auth = test_auth(db);
    let (session, profile) = auth
        .sign_up_volunteer(&VolunteerSignUp {
            email: email.to_string(),
            password: TEST_PASSWORD.to_string(),
            full_name: name.to_string(),
            phone: None,
            skills: Some("driving, cooking".to_string()),
        })
        .await
        .expect("Failed to sign up test volunteer");
    let user = auth.get_user(session.user.id).await.expect("Volunteer user missing");
    (user, profile)
}

/// A story long enough to pass any minimum-length rule
pub fn story() -> String {
    "We lost our son's father in 2021 and the year since has been very hard on all of us. "
        .repeat(2)
}

fn base_form(kind: ApplicationType) -> ApplicationForm {
    ApplicationForm {
        application_type: Some(kind),
        applicant_name: Some("Maria Lopez".to_string()),
        email: Some("Maria.Lopez@Example.org".to_string()),
        phone: Some("(555) 123-4567".to_string()),
        address: Some("12 Elm Street, Springfield".to_string()),
        loss_description: Some(story()),
        ..ApplicationForm::default()
    }
}

/// A form that passes validation for `kind`
pub fn valid_form(kind: ApplicationType) -> ApplicationForm {
    let base = base_form(kind);
    match kind {
        ApplicationType::FunGrant => ApplicationForm {
            child_name: Some("Leo".to_string()),
            child_age: Some(9),
            relationship: Some("parent".to_string()),
            activity_description: Some("Two weeks of summer soccer camp".to_string()),
            requested_amount: Some(300),
            ..base
        },
        ApplicationType::FinancialAid => ApplicationForm {
            child_name: Some("Ana Lopez".to_string()),
            child_age: Some(18),
            school_name: Some("Springfield Community College".to_string()),
            essay: Some(story()),
            transcript_url: Some("http://localhost:3000/storage/scholarship-documents/t.pdf".to_string()),
            recommendation_url: Some("http://localhost:3000/storage/scholarship-documents/r.pdf".to_string()),
            requested_amount: Some(2500),
            ..base
        },
        ApplicationType::SelfCare => ApplicationForm {
            relationship: Some("spouse".to_string()),
            self_care_plan: Some(story()),
            requested_amount: Some(400),
            ..base
        },
        ApplicationType::RegionalConflict => ApplicationForm {
            region: Some("Eastern Europe".to_string()),
            relationship: Some("guardian".to_string()),
            conflict_description: Some(story()),
            requested_amount: Some(1200),
            ..base
        },
    }
}
