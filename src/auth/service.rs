//! Identity service: accounts, sign-in and session lookup

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::SqliteConnection;
use tracing::{info, warn};

use super::password;
use super::roles::{LoginSurface, Role};
use super::session::SessionManager;
use crate::database::models::{User, VolunteerProfile};
use crate::database::Database;
use crate::error::PortalError;

/// The signed-in user as seen by handlers
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionUser {
    pub id: i64,
    pub email: String,
    pub full_name: String,
    pub role: Role,
}

impl From<&User> for SessionUser {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            email: user.email.clone(),
            full_name: user.full_name.clone(),
            role: user.role,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SignInResponse {
    pub token: String,
    pub expires_at: DateTime<Utc>,
    pub user: SessionUser,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VolunteerSignUp {
    pub email: String,
    pub password: String,
    pub full_name: String,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub skills: Option<String>,
}

#[derive(Clone)]
pub struct AuthService {
    database: Database,
    sessions: SessionManager,
}

impl AuthService {
    pub fn new(database: Database, sessions: SessionManager) -> Self {
        Self { database, sessions }
    }

    /// Create a staff, board or admin account
    pub async fn create_user(
        &self,
        email: &str,
        password: &str,
        full_name: &str,
        role: Role,
    ) -> Result<User, PortalError> {
        let mut conn = self.database.pool().acquire().await?;
        let user = insert_user(&mut conn, email, password, full_name, role).await?;
        info!("Created {} account {} ({})", role, user.email, user.id);
        Ok(user)
    }

    /// Public volunteer sign-up: creates the account and its profile together, then signs in
    pub async fn sign_up_volunteer(
        &self,
        request: &VolunteerSignUp,
    ) -> Result<(SignInResponse, VolunteerProfile), PortalError> {
        let clean = |v: &Option<String>| {
            v.as_deref()
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(str::to_string)
        };

        let mut tx = self.database.pool().begin().await?;
        let user = insert_user(
            &mut tx,
            &request.email,
            &request.password,
            &request.full_name,
            Role::Volunteer,
        )
        .await?;

        let result = sqlx::query(
            r#"
            INSERT INTO volunteer_profiles (user_id, full_name, phone, skills, created_at)
            VALUES (?, ?, ?, ?, ?)
            "#,
        )
        .bind(user.id)
        .bind(&user.full_name)
        .bind(clean(&request.phone))
        .bind(clean(&request.skills))
        .bind(Utc::now())
        .execute(&mut *tx)
        .await
        .map_err(|e| PortalError::DatabaseError(format!("Failed to create volunteer profile: {}", e)))?;

        let profile = sqlx::query_as::<_, VolunteerProfile>("SELECT * FROM volunteer_profiles WHERE id = ?")
            .bind(result.last_insert_rowid())
            .fetch_one(&mut *tx)
            .await?;
        tx.commit().await?;

        info!("Volunteer {} signed up ({})", user.email, user.id);
        let response = self.issue(&user)?;
        Ok((response, profile))
    }

    pub async fn sign_in(
        &self,
        surface: LoginSurface,
        email: &str,
        password: &str,
    ) -> Result<SignInResponse, PortalError> {
        let invalid = || PortalError::AuthError("Invalid email or password".to_string());

        let email = normalize_email(email).map_err(|_| invalid())?;
        let user = self.find_by_email(&email).await?.ok_or_else(invalid)?;

        if !password::verify_password(password, &user.password_salt, &user.password_hash) {
            warn!("Failed sign-in for {}", email);
            return Err(invalid());
        }

        if !surface.accepts(user.role) {
            warn!("{} account {} used the {:?} sign-in", user.role, email, surface);
            return Err(invalid());
        }

        info!("{} signed in via {:?} surface", email, surface);
        self.issue(&user)
    }

    /// Resolve a bearer token to the current user
    pub async fn session(&self, token: &str) -> Result<SessionUser, PortalError> {
        let claims = self.sessions.verify(token)?;
        let user = self
            .find_by_id(claims.sub)
            .await?
            .ok_or_else(|| PortalError::AuthError("Account no longer exists".to_string()))?;
        Ok(SessionUser::from(&user))
    }

    pub async fn get_user(&self, id: i64) -> Result<User, PortalError> {
        self.find_by_id(id)
            .await?
            .ok_or_else(|| PortalError::NotFound(format!("User {} not found", id)))
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<User>, PortalError> {
        let user = sqlx::query_as::<_, User>("SELECT * FROM users WHERE id = ?")
            .bind(id)
            .fetch_optional(self.database.pool())
            .await?;
        Ok(user)
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, PortalError> {
        let user = sqlx::query_as::<_, User>("SELECT * FROM users WHERE email = ?")
            .bind(email)
            .fetch_optional(self.database.pool())
            .await?;
        Ok(user)
    }

    fn issue(&self, user: &User) -> Result<SignInResponse, PortalError> {
        let (token, expires_at) = self.sessions.issue(user)?;
        Ok(SignInResponse {
            token,
            expires_at,
            user: SessionUser::from(user),
        })
    }
}

/// Validate and insert an account on `conn`, which may be inside a transaction
async fn insert_user(
    conn: &mut SqliteConnection,
    email: &str,
    password: &str,
    full_name: &str,
    role: Role,
) -> Result<User, PortalError> {
    let email = normalize_email(email)?;
    password::check_strength(password)?;
    let full_name = full_name.trim();
    if full_name.len() < 2 {
        return Err(PortalError::ValidationError(
            "Full name must be at least 2 characters".to_string(),
        ));
    }

    let existing: Option<i64> = sqlx::query_scalar("SELECT id FROM users WHERE email = ?")
        .bind(&email)
        .fetch_optional(&mut *conn)
        .await?;
    if existing.is_some() {
        return Err(PortalError::Conflict(format!(
            "An account already exists for {}",
            email
        )));
    }

    let salt = password::generate_salt();
    let hash = password::hash_password(password, &salt);
    let result = sqlx::query(
        r#"
        INSERT INTO users (email, password_hash, password_salt, full_name, role, created_at)
        VALUES (?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(&email)
    .bind(&hash)
    .bind(&salt)
    .bind(full_name)
    .bind(role)
    .bind(Utc::now())
    .execute(&mut *conn)
    .await
    .map_err(|e| PortalError::DatabaseError(format!("Failed to create user: {}", e)))?;

    let user = sqlx::query_as::<_, User>("SELECT * FROM users WHERE id = ?")
        .bind(result.last_insert_rowid())
        .fetch_one(&mut *conn)
        .await?;
    Ok(user)
}

fn normalize_email(email: &str) -> Result<String, PortalError> {
    let email = email.trim().to_lowercase();
    match email.split_once('@') {
        Some((local, domain)) if !local.is_empty() && domain.contains('.') => Ok(email),
        _ => Err(PortalError::ValidationError(format!(
            "Invalid email address: {}",
            email
        ))),
    }
}
