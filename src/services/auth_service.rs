//! Authentication service - Accounts, credentials and bearer tokens.
//!
//! Password handling lives in the domain `Password` value object; this
//! service owns token issuance and the register/login/profile use cases.

use async_trait::async_trait;
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::config::{Config, SECONDS_PER_HOUR};
use crate::domain::{normalize_email, NewUser, Password, User, UserProfile, UserSummary};
use crate::errors::{AppError, AppResult, OptionExt};
use crate::infra::UnitOfWork;

/// JWT claims payload
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub sub: Uuid,
    pub email: String,
    pub exp: i64,
    pub iat: i64,
}

/// Token plus the public account fields, returned by register and login
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AuthSession {
    /// HS256 JWT to send as `Authorization: Bearer <token>`
    #[schema(example = "eyJhbGciOiJIUzI1NiIsInR5cCI6IkpXVCJ9...")]
    pub token: String,
    /// Token lifetime in seconds
    #[schema(example = 604800)]
    pub expires_in: i64,
    pub user: UserSummary,
}

/// New account details. Email format and field lengths are checked by the
/// request extractor; blank values are rejected here.
#[derive(Debug, Clone)]
pub struct Registration {
    pub email: String,
    pub password: String,
    pub name: String,
    pub phone: Option<String>,
    pub address: Option<String>,
}

/// Authentication service trait for dependency injection.
#[async_trait]
pub trait AuthService: Send + Sync {
    /// Create an account and sign the caller in
    async fn register(&self, registration: Registration) -> AppResult<AuthSession>;

    /// Exchange credentials for a token
    async fn login(&self, email: String, password: String) -> AppResult<AuthSession>;

    /// Profile of the token's subject
    async fn profile(&self, user_id: Uuid) -> AppResult<UserProfile>;

    /// Verify JWT token and extract claims
    fn verify_token(&self, token: &str) -> AppResult<Claims>;
}

fn issue_session(user: User, config: &Config) -> AppResult<AuthSession> {
    let now = Utc::now();
    let expires_at = now + Duration::hours(config.jwt_expiration_hours);

    let claims = Claims {
        sub: user.id,
        email: user.email.clone(),
        exp: expires_at.timestamp(),
        iat: now.timestamp(),
    };

    let token = encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(config.jwt_secret_bytes()),
    )?;

    Ok(AuthSession {
        token,
        expires_in: config.jwt_expiration_hours * SECONDS_PER_HOUR,
        user: UserSummary::from(user),
    })
}

fn non_blank(value: String, field: &str) -> AppResult<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(AppError::validation(format!("{} is required", field)));
    }
    Ok(trimmed.to_string())
}

fn optional(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Concrete implementation of AuthService using Unit of Work.
pub struct Authenticator<U: UnitOfWork> {
    uow: Arc<U>,
    config: Config,
}

impl<U: UnitOfWork> Authenticator<U> {
    pub fn new(uow: Arc<U>, config: Config) -> Self {
        Self { uow, config }
    }
}

#[async_trait]
impl<U: UnitOfWork> AuthService for Authenticator<U> {
    async fn register(&self, registration: Registration) -> AppResult<AuthSession> {
        let email = normalize_email(&non_blank(registration.email, "email")?);
        let name = non_blank(registration.name, "name")?;
        let password = Password::new(&registration.password)?;

        // The unique index catches the race; this gives the common case a clean error
        if self.uow.users().find_by_email(&email).await?.is_some() {
            return Err(AppError::conflict("Email"));
        }

        let user = self
            .uow
            .users()
            .create(NewUser {
                email,
                password_hash: password.into_string(),
                name,
                phone: optional(registration.phone),
                address: optional(registration.address),
            })
            .await?;

        tracing::info!(user_id = %user.id, "Account registered");
        issue_session(user, &self.config)
    }

    async fn login(&self, email: String, password: String) -> AppResult<AuthSession> {
        let user = self.uow.users().find_by_email(&normalize_email(&email)).await?;

        // Verify against a decoy when the account is missing so both
        // failure paths cost one Argon2 check.
        let stored = match &user {
            Some(user) => Password::from_hash(user.password_hash.clone()),
            None => Password::decoy(),
        };
        let password_valid = stored.verify(&password);

        match user {
            Some(user) if password_valid => issue_session(user, &self.config),
            _ => Err(AppError::InvalidCredentials),
        }
    }

    async fn profile(&self, user_id: Uuid) -> AppResult<UserProfile> {
        let user = self
            .uow
            .users()
            .find_by_id(user_id)
            .await?
            .ok_or_not_found("User")?;

        Ok(UserProfile::from(user))
    }

    fn verify_token(&self, token: &str) -> AppResult<Claims> {
        let token_data = decode::<Claims>(
            token,
            &DecodingKey::from_secret(self.config.jwt_secret_bytes()),
            &Validation::default(),
        )?;

        Ok(token_data.claims)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infra::repositories::MockUserRepository;
    use crate::infra::unit_of_work::tests::StubUnitOfWork;

    fn config() -> Config {
        Config::new("sqlite::memory:", "test-secret-key-with-at-least-32-chars").unwrap()
    }

    fn stored_user(email: &str, password: &str) -> User {
        User {
            id: Uuid::new_v4(),
            email: email.to_string(),
            password_hash: Password::new(password).unwrap().into_string(),
            name: "Asha".to_string(),
            phone: None,
            address: None,
            created_at: Utc::now(),
        }
    }

    fn registration(email: &str) -> Registration {
        Registration {
            email: email.to_string(),
            password: "secret1".to_string(),
            name: " Asha ".to_string(),
            phone: Some("".to_string()),
            address: None,
        }
    }

    #[tokio::test]
    async fn test_register_normalizes_and_issues_token() {
        let mut users = MockUserRepository::new();
        users
            .expect_find_by_email()
            .withf(|email| email == "asha@example.com")
            .returning(|_| Ok(None));
        users.expect_create().returning(|new_user| {
            assert_eq!(new_user.name, "Asha");
            assert_eq!(new_user.phone, None);
            assert!(new_user.password_hash.starts_with("$argon2"));
            Ok(User {
                id: Uuid::new_v4(),
                email: new_user.email,
                password_hash: new_user.password_hash,
                name: new_user.name,
                phone: new_user.phone,
                address: new_user.address,
                created_at: Utc::now(),
            })
        });

        let uow = StubUnitOfWork { users: Some(users), ..Default::default() }.build();
        let auth = Authenticator::new(uow, config());

        let session = auth.register(registration(" Asha@Example.com ")).await.unwrap();
        assert_eq!(session.user.email, "asha@example.com");
        assert_eq!(session.expires_in, 168 * 3600);

        let claims = auth.verify_token(&session.token).unwrap();
        assert_eq!(claims.sub, session.user.id);
    }

    #[tokio::test]
    async fn test_register_duplicate_email_conflicts() {
        let mut users = MockUserRepository::new();
        users
            .expect_find_by_email()
            .returning(|email| Ok(Some(stored_user(email, "secret1"))));
        users.expect_create().never();

        let uow = StubUnitOfWork { users: Some(users), ..Default::default() }.build();
        let auth = Authenticator::new(uow, config());

        let result = auth.register(registration("asha@example.com")).await;
        assert!(matches!(result, Err(AppError::Conflict(_))));
    }

    #[tokio::test]
    async fn test_register_rejects_short_password_before_lookup() {
        let uow = StubUnitOfWork::default().build();
        let auth = Authenticator::new(uow, config());

        let mut input = registration("asha@example.com");
        input.password = "12345".to_string();
        assert!(matches!(auth.register(input).await, Err(AppError::Validation(_))));
    }

    #[tokio::test]
    async fn test_login_failures_look_identical() {
        let mut users = MockUserRepository::new();
        users.expect_find_by_email().returning(|email| {
            if email == "asha@example.com" {
                Ok(Some(stored_user(email, "secret1")))
            } else {
                Ok(None)
            }
        });

        let uow = StubUnitOfWork { users: Some(users), ..Default::default() }.build();
        let auth = Authenticator::new(uow, config());

        let wrong_password = auth
            .login("asha@example.com".to_string(), "nope".to_string())
            .await
            .unwrap_err();
        let unknown_user = auth
            .login("ghost@example.com".to_string(), "secret1".to_string())
            .await
            .unwrap_err();

        assert!(matches!(wrong_password, AppError::InvalidCredentials));
        assert!(matches!(unknown_user, AppError::InvalidCredentials));
        assert_eq!(wrong_password.to_string(), unknown_user.to_string());
    }

    #[tokio::test]
    async fn test_login_is_case_insensitive_on_email() {
        let mut users = MockUserRepository::new();
        users
            .expect_find_by_email()
            .withf(|email| email == "asha@example.com")
            .returning(|email| Ok(Some(stored_user(email, "secret1"))));

        let uow = StubUnitOfWork { users: Some(users), ..Default::default() }.build();
        let auth = Authenticator::new(uow, config());

        let session = auth
            .login("ASHA@example.com".to_string(), "secret1".to_string())
            .await
            .unwrap();
        assert_eq!(session.user.name, "Asha");
    }

    #[tokio::test]
    async fn test_profile_missing_user_is_not_found() {
        let mut users = MockUserRepository::new();
        users.expect_find_by_id().returning(|_| Ok(None));

        let uow = StubUnitOfWork { users: Some(users), ..Default::default() }.build();
        let auth = Authenticator::new(uow, config());

        let result = auth.profile(Uuid::new_v4()).await;
        assert!(matches!(result, Err(AppError::NotFound(_))));
    }

    #[test]
    fn test_token_from_other_secret_rejected() {
        let uow = StubUnitOfWork::default().build();
        let auth = Authenticator::new(uow, config());

        let other = Config::new("sqlite::memory:", "another-secret-key-with-32-chars!!").unwrap();
        let session = issue_session(stored_user("a@b.co", "secret1"), &other).unwrap();

        assert!(matches!(auth.verify_token(&session.token), Err(AppError::Jwt(_))));
    }

    #[test]
    fn test_expired_token_rejected() {
        let uow = StubUnitOfWork::default().build();
        let config = config();
        let auth = Authenticator::new(uow, config.clone());

        let claims = Claims {
            sub: Uuid::new_v4(),
            email: "a@b.co".to_string(),
            iat: Utc::now().timestamp() - 7200,
            exp: Utc::now().timestamp() - 3600,
        };
        let token = encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(config.jwt_secret_bytes()),
        )
        .unwrap();

        assert!(auth.verify_token(&token).is_err());
    }
}
