//! Authentication for the back-office API.
//!
//! Credentials live server-side as argon2 hashes; a successful login issues
//! a short-lived HS256 access token, and a bearer middleware guards the
//! resource and dashboard routes.

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use axum::{
    extract::{Request, State},
    http::header,
    middleware::Next,
    response::{IntoResponse, Response},
    routing::post,
    Json, Router,
};
use chrono::{Duration as ChronoDuration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter,
    Set,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, instrument, warn};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::{
    config::AppConfig,
    entities::user::{self, Entity as UserEntity},
    errors::ServiceError,
};

/// Claim structure for access tokens
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String,
    pub username: String,
    pub jti: String,
    pub iat: i64,
    pub exp: i64,
    pub nbf: i64,
    pub iss: String,
    pub aud: String,
}

/// Authenticated user data extracted from the token
#[derive(Debug, Clone)]
pub struct AuthUser {
    pub user_id: Uuid,
    pub username: String,
    pub token_id: String,
}

/// Authentication configuration
#[derive(Clone, Debug)]
pub struct AuthConfig {
    pub jwt_secret: String,
    pub jwt_issuer: String,
    pub jwt_audience: String,
    pub access_token_expiration: Duration,
}

impl AuthConfig {
    pub fn new(
        jwt_secret: String,
        jwt_issuer: String,
        jwt_audience: String,
        access_token_expiration: Duration,
    ) -> Self {
        Self {
            jwt_secret,
            jwt_issuer,
            jwt_audience,
            access_token_expiration,
        }
    }
}

impl From<&AppConfig> for AuthConfig {
    fn from(cfg: &AppConfig) -> Self {
        Self::new(
            cfg.jwt_secret.clone(),
            cfg.auth_issuer.clone(),
            cfg.auth_audience.clone(),
            Duration::from_secs(cfg.jwt_expiration),
        )
    }
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct LoginRequest {
    #[validate(length(min = 1, message = "Username is required"))]
    pub username: String,
    #[validate(length(min = 1, message = "Password is required"))]
    pub password: String,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct AccessToken {
    pub access_token: String,
    pub token_type: String,
    pub expires_in: i64,
}

/// Authentication service handling credential verification and token issuance
#[derive(Debug, Clone)]
pub struct AuthService {
    pub config: AuthConfig,
    pub db: Arc<DatabaseConnection>,
}

impl AuthService {
    pub fn new(config: AuthConfig, db: Arc<DatabaseConnection>) -> Self {
        Self { config, db }
    }

    /// Hashes a password with argon2 and a fresh salt.
    pub fn hash_password(password: &str) -> Result<String, ServiceError> {
        let salt = SaltString::generate(&mut OsRng);
        Argon2::default()
            .hash_password(password.as_bytes(), &salt)
            .map(|hash| hash.to_string())
            .map_err(|e| ServiceError::InternalError(format!("Failed to hash password: {}", e)))
    }

    /// Verifies a password against a stored argon2 hash.
    pub fn verify_password(hash: &str, password: &str) -> bool {
        PasswordHash::new(hash)
            .map(|parsed| {
                Argon2::default()
                    .verify_password(password.as_bytes(), &parsed)
                    .is_ok()
            })
            .unwrap_or(false)
    }

    /// Creates a back-office account.
    #[instrument(skip(self, password), fields(username = %username))]
    pub async fn create_user(
        &self,
        username: &str,
        password: &str,
    ) -> Result<user::Model, ServiceError> {
        let existing = UserEntity::find()
            .filter(user::Column::Username.eq(username))
            .one(&*self.db)
            .await?;
        if existing.is_some() {
            return Err(ServiceError::ValidationError(format!(
                "Username {} is already taken",
                username
            )));
        }

        let model = user::ActiveModel {
            id: Set(Uuid::new_v4()),
            username: Set(username.to_string()),
            password_hash: Set(Self::hash_password(password)?),
            created_at: Set(Utc::now()),
        }
        .insert(&*self.db)
        .await?;

        info!(user_id = %model.id, "User account created");
        Ok(model)
    }

    /// Verifies credentials and issues an access token. The failure message
    /// is identical for unknown users and wrong passwords.
    #[instrument(skip(self, password), fields(username = %username))]
    pub async fn login(&self, username: &str, password: &str) -> Result<AccessToken, ServiceError> {
        let user = UserEntity::find()
            .filter(user::Column::Username.eq(username))
            .one(&*self.db)
            .await?;

        let user = match user {
            Some(user) if Self::verify_password(&user.password_hash, password) => user,
            _ => {
                warn!("Login rejected");
                return Err(ServiceError::AuthError(
                    "Invalid username or password".to_string(),
                ));
            }
        };

        self.generate_token(&user)
    }

    /// Issues a signed access token for a user.
    pub fn generate_token(&self, user: &user::Model) -> Result<AccessToken, ServiceError> {
        let now = Utc::now();
        let expires = now
            + ChronoDuration::from_std(self.config.access_token_expiration)
                .map_err(|_| ServiceError::InternalError("Invalid token duration".to_string()))?;

        let claims = Claims {
            sub: user.id.to_string(),
            username: user.username.clone(),
            jti: Uuid::new_v4().to_string(),
            iat: now.timestamp(),
            exp: expires.timestamp(),
            nbf: now.timestamp(),
            iss: self.config.jwt_issuer.clone(),
            aud: self.config.jwt_audience.clone(),
        };

        let token = encode(
            &Header::new(Algorithm::HS256),
            &claims,
            &EncodingKey::from_secret(self.config.jwt_secret.as_bytes()),
        )
        .map_err(|e| ServiceError::InternalError(format!("Failed to sign token: {}", e)))?;

        Ok(AccessToken {
            access_token: token,
            token_type: "Bearer".to_string(),
            expires_in: self.config.access_token_expiration.as_secs() as i64,
        })
    }

    /// Validates a token and extracts its claims.
    pub fn validate_token(&self, token: &str) -> Result<Claims, ServiceError> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.set_issuer(&[self.config.jwt_issuer.clone()]);
        validation.set_audience(&[self.config.jwt_audience.clone()]);

        decode::<Claims>(
            token,
            &DecodingKey::from_secret(self.config.jwt_secret.as_bytes()),
            &validation,
        )
        .map(|data| data.claims)
        .map_err(|e| match e.kind() {
            jsonwebtoken::errors::ErrorKind::ExpiredSignature => {
                ServiceError::AuthError("Token expired".to_string())
            }
            _ => ServiceError::AuthError("Invalid token".to_string()),
        })
    }

    /// Creates the configured admin account when the users table is empty.
    pub async fn bootstrap_admin(&self, cfg: &AppConfig) -> Result<(), ServiceError> {
        let Some(password) = cfg.admin_password.as_deref() else {
            return Ok(());
        };

        let existing = UserEntity::find().count(&*self.db).await?;
        if existing > 0 {
            return Ok(());
        }

        self.create_user(&cfg.admin_username, password).await?;
        info!(username = %cfg.admin_username, "Bootstrap admin account created");
        Ok(())
    }
}

/// Middleware requiring a valid bearer token; on success the request
/// extensions carry an [`AuthUser`].
pub async fn require_auth(
    State(auth): State<Arc<AuthService>>,
    mut req: Request,
    next: Next,
) -> Result<Response, ServiceError> {
    let token = req
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
        .ok_or_else(|| ServiceError::AuthError("Missing bearer token".to_string()))?;

    let claims = auth.validate_token(token)?;
    let user_id = Uuid::parse_str(&claims.sub)
        .map_err(|_| ServiceError::AuthError("Invalid token subject".to_string()))?;

    req.extensions_mut().insert(AuthUser {
        user_id,
        username: claims.username,
        token_id: claims.jti,
    });

    Ok(next.run(req).await)
}

/// Exchange credentials for an access token.
#[utoipa::path(
    post,
    path = "/api/auth/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Credentials accepted", body = AccessToken),
        (status = 401, description = "Invalid credentials", body = crate::errors::ErrorResponse)
    ),
    tag = "Auth"
)]
pub(crate) async fn login(
    State(auth): State<Arc<AuthService>>,
    Json(payload): Json<LoginRequest>,
) -> Result<impl IntoResponse, ServiceError> {
    payload.validate()?;
    let token = auth.login(&payload.username, &payload.password).await?;
    Ok(Json(token))
}

pub fn auth_routes() -> Router<Arc<AuthService>> {
    Router::new().route("/login", post(login))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_service() -> AuthService {
        let config = AuthConfig::new(
            "k3P9vX2mQ8wL5nR7tY4uB6eH1jF0aZcS".into(),
            "stallkeeper-api".into(),
            "stallkeeper".into(),
            Duration::from_secs(3600),
        );
        AuthService::new(config, Arc::new(DatabaseConnection::Disconnected))
    }

    #[test]
    fn password_hash_round_trip() {
        let hash = AuthService::hash_password("stall-pass-1").unwrap();
        assert!(AuthService::verify_password(&hash, "stall-pass-1"));
        assert!(!AuthService::verify_password(&hash, "wrong"));
    }

    #[test]
    fn verify_rejects_malformed_hash() {
        assert!(!AuthService::verify_password("not-a-phc-string", "anything"));
    }

    #[test]
    fn token_round_trip_preserves_identity() {
        let service = test_service();
        let user = user::Model {
            id: Uuid::new_v4(),
            username: "admin".into(),
            password_hash: String::new(),
            created_at: Utc::now(),
        };

        let token = service.generate_token(&user).unwrap();
        assert_eq!(token.token_type, "Bearer");

        let claims = service.validate_token(&token.access_token).unwrap();
        assert_eq!(claims.sub, user.id.to_string());
        assert_eq!(claims.username, "admin");
    }

    #[test]
    fn token_from_other_secret_is_rejected() {
        let service = test_service();
        let mut other_config = service.config.clone();
        other_config.jwt_secret = "Zq8Wr4Ty6Ui9Op1As3Df5Gh7Jk2Lx0Cv".into();
        let other = AuthService::new(other_config, Arc::new(DatabaseConnection::Disconnected));

        let user = user::Model {
            id: Uuid::new_v4(),
            username: "admin".into(),
            password_hash: String::new(),
            created_at: Utc::now(),
        };
        let token = other.generate_token(&user).unwrap();

        assert!(service.validate_token(&token.access_token).is_err());
    }
}
