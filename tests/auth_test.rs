use foundation_portal::auth::{AuthService, LoginSurface, Role, SessionManager, VolunteerSignUp};
use foundation_portal::error::PortalError;

mod common;
use common::*;

#[tokio::test]
async fn test_staff_sign_in_and_session_lookup() {
    let db = setup_test_db().await;
    let auth = test_auth(&db);
    let staff = create_user(&db, "Sam@Foundation.org", "Sam Staff", Role::Staff).await;
    assert_eq!(staff.email, "sam@foundation.org");

    let response = auth
        .sign_in(LoginSurface::Staff, "sam@foundation.org", TEST_PASSWORD)
        .await
        .unwrap();
    assert_eq!(response.user.id, staff.id);
    assert_eq!(response.user.role, Role::Staff);

    let session = auth.session(&response.token).await.unwrap();
    assert_eq!(session.email, "sam@foundation.org");
}

#[tokio::test]
async fn test_wrong_password_and_unknown_email_look_the_same() {
    let db = setup_test_db().await;
    let auth = test_auth(&db);
    create_user(&db, "sam@foundation.org", "Sam Staff", Role::Staff).await;

    let wrong_password = auth
        .sign_in(LoginSurface::Staff, "sam@foundation.org", "not-the-password")
        .await
        .unwrap_err();
    let unknown = auth
        .sign_in(LoginSurface::Staff, "nobody@foundation.org", TEST_PASSWORD)
        .await
        .unwrap_err();

    assert!(matches!(wrong_password, PortalError::AuthError(_)));
    assert_eq!(wrong_password.to_string(), unknown.to_string());
}

#[tokio::test]
async fn test_volunteer_cannot_use_staff_sign_in() {
    let db = setup_test_db().await;
    let auth = test_auth(&db);
    create_volunteer(&db, "ann@example.org", "Ann Helper").await;

    assert!(matches!(
        auth.sign_in(LoginSurface::Staff, "ann@example.org", TEST_PASSWORD).await,
        Err(PortalError::AuthError(_))
    ));
    assert!(auth
        .sign_in(LoginSurface::Volunteer, "ann@example.org", TEST_PASSWORD)
        .await
        .is_ok());
}

#[tokio::test]
async fn test_volunteer_signup_creates_profile_and_rejects_duplicates() {
    let db = setup_test_db().await;
    let auth = test_auth(&db);
    let signup = VolunteerSignUp {
        email: "ann@example.org".to_string(),
        password: TEST_PASSWORD.to_string(),
        full_name: "Ann Helper".to_string(),
        phone: Some("555-111-2222".to_string()),
        skills: Some("   ".to_string()),
    };

    let (session, profile) = auth.sign_up_volunteer(&signup).await.unwrap();
    assert_eq!(session.user.role, Role::Volunteer);
    assert_eq!(profile.user_id, session.user.id);
    assert_eq!(profile.phone.as_deref(), Some("555-111-2222"));
    assert_eq!(profile.skills, None);

    let err = auth.sign_up_volunteer(&signup).await.unwrap_err();
    assert!(matches!(err, PortalError::Conflict(_)));
}

#[tokio::test]
async fn test_failed_profile_insert_leaves_no_account() {
    let db = setup_test_db().await;
    let auth = test_auth(&db);
    sqlx::query(
        "CREATE TRIGGER reject_profiles BEFORE INSERT ON volunteer_profiles \
         BEGIN SELECT RAISE(ABORT, 'profiles closed'); END",
    )
    .execute(db.pool())
    .await
    .unwrap();

    let signup = VolunteerSignUp {
        email: "ann@example.org".to_string(),
        password: TEST_PASSWORD.to_string(),
        full_name: "Ann Helper".to_string(),
        phone: None,
        skills: None,
    };
    let err = auth.sign_up_volunteer(&signup).await.unwrap_err();
    assert!(matches!(err, PortalError::DatabaseError(_)));

    let users: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM users")
        .fetch_one(db.pool())
        .await
        .unwrap();
    assert_eq!(users, 0);
    assert!(matches!(
        auth.sign_in(LoginSurface::Volunteer, "ann@example.org", TEST_PASSWORD).await,
        Err(PortalError::AuthError(_))
    ));
}

#[tokio::test]
async fn test_weak_password_rejected() {
    let db = setup_test_db().await;
    let auth = test_auth(&db);

    let err = auth
        .create_user("sam@foundation.org", "short", "Sam Staff", Role::Staff)
        .await
        .unwrap_err();
    assert!(matches!(err, PortalError::ValidationError(_)));
}

#[tokio::test]
async fn test_token_from_other_secret_rejected() {
    let db = setup_test_db().await;
    create_user(&db, "sam@foundation.org", "Sam Staff", Role::Staff).await;

    let other = AuthService::new(db.clone(), SessionManager::new("some-other-secret", 12).unwrap());
    let response = other
        .sign_in(LoginSurface::Staff, "sam@foundation.org", TEST_PASSWORD)
        .await
        .unwrap();

    let err = test_auth(&db).session(&response.token).await.unwrap_err();
    assert!(matches!(err, PortalError::AuthError(_)));
}
