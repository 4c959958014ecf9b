//! Signed session tokens

use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

use super::roles::Role;
use crate::database::models::User;
use crate::error::PortalError;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: i64,
    pub email: String,
    pub role: Role,
    pub iat: i64,
    pub exp: i64,
}

#[derive(Clone)]
pub struct SessionManager {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    ttl: Duration,
}

impl SessionManager {
    pub fn new(secret: &str, ttl_hours: i64) -> Result<Self, PortalError> {
        let ttl = Duration::try_hours(ttl_hours)
            .filter(|ttl| *ttl > Duration::zero())
            .ok_or_else(|| {
                PortalError::ConfigError(format!("Invalid session lifetime: {} hours", ttl_hours))
            })?;

        Ok(Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            ttl,
        })
    }

    pub fn issue(&self, user: &User) -> Result<(String, DateTime<Utc>), PortalError> {
        let now = Utc::now();
        let expires_at = now.checked_add_signed(self.ttl).ok_or_else(|| {
            PortalError::ConfigError("Session lifetime overflows the calendar".to_string())
        })?;
        let claims = Claims {
            sub: user.id,
            email: user.email.clone(),
            role: user.role,
            iat: now.timestamp(),
            exp: expires_at.timestamp(),
        };

        let token = encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)?;
        Ok((token, expires_at))
    }

    pub fn verify(&self, token: &str) -> Result<Claims, PortalError> {
        let data = decode::<Claims>(token, &self.decoding_key, &Validation::new(Algorithm::HS256))?;
        Ok(data.claims)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user() -> User {
        User {
            id: 7,
            email: "sam@foundation.org".to_string(),
            password_hash: String::new(),
            password_salt: String::new(),
            full_name: "Sam Staff".to_string(),
            role: Role::Staff,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_issue_and_verify() {
        let sessions = SessionManager::new("secret", 12).unwrap();
        let (token, expires_at) = sessions.issue(&user()).unwrap();
        assert!(expires_at > Utc::now());

        let claims = sessions.verify(&token).unwrap();
        assert_eq!(claims.sub, 7);
        assert_eq!(claims.role, Role::Staff);
    }

    #[test]
    fn test_unrepresentable_lifetime_rejected() {
        assert!(matches!(
            SessionManager::new("secret", i64::MAX),
            Err(PortalError::ConfigError(_))
        ));
        assert!(matches!(
            SessionManager::new("secret", 0),
            Err(PortalError::ConfigError(_))
        ));
    }

    #[test]
    fn test_overflowing_expiry_is_error_not_panic() {
        let sessions = SessionManager::new("secret", 2_000_000_000_000);
        match sessions {
            Ok(sessions) => assert!(matches!(
                sessions.issue(&user()),
                Err(PortalError::ConfigError(_))
            )),
            Err(err) => assert!(matches!(err, PortalError::ConfigError(_))),
        }
    }
}
