//! Authentication service: admin login, server-side sessions and the
//! startup default account

use bcrypt::{hash, verify, DEFAULT_COST};
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

use crate::config::{Config, DefaultAdminConfig};
use crate::error::{AppError, AppResult};
use shared::AdminProfile;

/// Authentication service
#[derive(Clone)]
pub struct AuthService {
    db: PgPool,
    jwt_secret: String,
    session_ttl: i64,
}

/// JWT claims structure
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String, // Admin ID
    pub name: String,
    pub sid: String, // Session ID
    pub exp: i64,
    pub iat: i64,
}

impl Claims {
    pub fn admin_id(&self) -> AppResult<i64> {
        self.sub
            .parse()
            .map_err(|_| AppError::Unauthorized("Invalid admin ID in token".to_string()))
    }

    pub fn session_id(&self) -> AppResult<Uuid> {
        Uuid::parse_str(&self.sid)
            .map_err(|_| AppError::Unauthorized("Invalid session ID in token".to_string()))
    }
}

/// Successful login
#[derive(Debug, Serialize)]
pub struct LoginSession {
    pub admin: AdminProfile,
    pub token: String,
    pub token_type: String,
    pub expires_in: i64,
}

/// Admin info from database
#[derive(Debug, sqlx::FromRow)]
struct AdminRow {
    id: i64,
    username: String,
    password_hash: String,
    display_name: String,
}

impl AuthService {
    pub fn new(db: PgPool, config: &Config) -> Self {
        Self {
            db,
            jwt_secret: config.auth.jwt_secret.clone(),
            session_ttl: config.auth.session_ttl_secs,
        }
    }

    /// Verify credentials and open a session
    pub async fn login(&self, username: &str, password: &str) -> AppResult<LoginSession> {
        let admin = sqlx::query_as::<_, AdminRow>(
            "SELECT id, username, password_hash, display_name FROM admins WHERE username = $1",
        )
        .bind(username)
        .fetch_optional(&self.db)
        .await?
        .ok_or(AppError::InvalidCredentials)?;

        let valid = verify(password, &admin.password_hash)
            .map_err(|e| AppError::Internal(format!("Password verification failed: {}", e)))?;

        if !valid {
            tracing::debug!(username, "Rejected login");
            return Err(AppError::InvalidCredentials);
        }

        let session_id = Uuid::new_v4();
        let now = Utc::now();
        let expires_at = now + Duration::seconds(self.session_ttl);

        let mut tx = self.db.begin().await?;

        sqlx::query("INSERT INTO admin_sessions (id, admin_id, expires_at) VALUES ($1, $2, $3)")
            .bind(session_id)
            .bind(admin.id)
            .bind(expires_at)
            .execute(&mut *tx)
            .await?;

        sqlx::query("UPDATE admins SET last_login_at = NOW() WHERE id = $1")
            .bind(admin.id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;

        let claims = Claims {
            sub: admin.id.to_string(),
            name: admin.display_name.clone(),
            sid: session_id.to_string(),
            exp: expires_at.timestamp(),
            iat: now.timestamp(),
        };
        let token = self.encode_token(&claims)?;

        tracing::info!(admin_id = admin.id, "Admin logged in");

        Ok(LoginSession {
            admin: AdminProfile {
                id: admin.id,
                display_name: admin.display_name,
                username: admin.username,
            },
            token,
            token_type: "Bearer".to_string(),
            expires_in: self.session_ttl,
        })
    }

    /// Revoke a session. Unknown or already revoked sessions are ignored.
    pub async fn logout(&self, session_id: Uuid) -> AppResult<()> {
        let result = sqlx::query(
            "UPDATE admin_sessions SET revoked_at = NOW() WHERE id = $1 AND revoked_at IS NULL",
        )
        .bind(session_id)
        .execute(&self.db)
        .await?;

        if result.rows_affected() > 0 {
            tracing::info!(%session_id, "Session revoked");
        }
        Ok(())
    }

    /// Validate token signature and expiry
    pub fn validate_token(&self, token: &str) -> AppResult<Claims> {
        decode_token(token, &self.jwt_secret)
    }

    /// Whether the session is still open for this admin
    pub async fn session_active(&self, session_id: Uuid, admin_id: i64) -> AppResult<bool> {
        let active = sqlx::query_scalar::<_, bool>(
            r#"
            SELECT EXISTS(
                SELECT 1 FROM admin_sessions
                WHERE id = $1 AND admin_id = $2
                  AND revoked_at IS NULL AND expires_at > NOW()
            )
            "#,
        )
        .bind(session_id)
        .bind(admin_id)
        .fetch_one(&self.db)
        .await?;

        Ok(active)
    }

    /// Create the configured default admin if no account has its username.
    /// Returns whether an account was created.
    pub async fn ensure_default_admin(&self, admin: &DefaultAdminConfig) -> AppResult<bool> {
        let password_hash = hash(&admin.password, DEFAULT_COST)
            .map_err(|e| AppError::Internal(format!("Password hashing failed: {}", e)))?;

        let created = sqlx::query(
            r#"
            INSERT INTO admins (username, password_hash, display_name)
            VALUES ($1, $2, $3)
            ON CONFLICT (username) DO NOTHING
            "#,
        )
        .bind(&admin.username)
        .bind(&password_hash)
        .bind(&admin.display_name)
        .execute(&self.db)
        .await?
        .rows_affected()
            > 0;

        if created {
            tracing::info!(username = %admin.username, "Default admin provisioned");
        }
        Ok(created)
    }

    fn encode_token(&self, claims: &Claims) -> AppResult<String> {
        encode(
            &Header::default(),
            claims,
            &EncodingKey::from_secret(self.jwt_secret.as_bytes()),
        )
        .map_err(|e| AppError::Internal(format!("Token generation failed: {}", e)))
    }
}

/// Decode and validate a session token
pub fn decode_token(token: &str, secret: &str) -> AppResult<Claims> {
    decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &Validation::default(),
    )
    .map(|data| data.claims)
    .map_err(|e| AppError::Unauthorized(format!("Invalid token: {}", e)))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn token_for(claims: &Claims, secret: &str) -> String {
        encode(
            &Header::default(),
            claims,
            &EncodingKey::from_secret(secret.as_bytes()),
        )
        .unwrap()
    }

    fn claims(exp_offset: i64) -> Claims {
        let now = Utc::now().timestamp();
        Claims {
            sub: "42".to_string(),
            name: "Administrator Utama".to_string(),
            sid: Uuid::new_v4().to_string(),
            exp: now + exp_offset,
            iat: now,
        }
    }

    #[test]
    fn test_decode_roundtrip_claims() {
        let original = claims(600);
        let decoded = decode_token(&token_for(&original, "s3cret"), "s3cret").unwrap();
        assert_eq!(decoded.admin_id().unwrap(), 42);
        assert_eq!(decoded.session_id().unwrap().to_string(), original.sid);
    }

    #[test]
    fn test_decode_rejects_wrong_secret() {
        let token = token_for(&claims(600), "s3cret");
        assert!(matches!(
            decode_token(&token, "other"),
            Err(AppError::Unauthorized(_))
        ));
    }

    #[test]
    fn test_decode_rejects_expired() {
        // Beyond the default 60s leeway
        let token = token_for(&claims(-3600), "s3cret");
        assert!(decode_token(&token, "s3cret").is_err());
    }

    #[test]
    fn test_bad_subject() {
        let mut c = claims(600);
        c.sub = "not-a-number".to_string();
        assert!(c.admin_id().is_err());
    }
}
