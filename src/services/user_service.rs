use crate::auth::{hash_password, verify_credentials, Claims, TokenService};
use crate::config::AdminBootstrap;
use crate::error::{AppError, AppResult, RepositoryError};
use crate::models::{NewUserInput, User};
use crate::repositories::UserRepository;
use crate::validation::{optional_text, validate_email, validate_password, validate_username};
use serde::Serialize;
use std::sync::Arc;
use tracing::{info, warn};
use uuid::Uuid;

/// Login response
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginResponse {
    pub token: String,
    pub expires_in: i64,
    pub user: User,
}

const BAD_CREDENTIALS: &str = "Invalid username or password";

/// Service for admin accounts and sign-in
pub struct UserService {
    user_repo: Arc<UserRepository>,
    tokens: Arc<TokenService>,
}

impl UserService {
    pub fn new(user_repo: Arc<UserRepository>, tokens: Arc<TokenService>) -> Self {
        Self { user_repo, tokens }
    }

    /// Check credentials and issue a token
    pub async fn login(&self, username: &str, password: &str) -> AppResult<LoginResponse> {
        let user = self.user_repo.find_by_username(username.trim()).await?;
        let valid = verify_credentials(password, user.as_ref().map(|u| u.password_hash.as_str()));

        let user = match user {
            Some(user) if valid => user,
            _ => {
                warn!("Failed login attempt");
                return Err(AppError::Unauthorized(BAD_CREDENTIALS.into()));
            }
        };

        let token = self.tokens.issue(&user)?;
        info!("User {} signed in", user.id);

        Ok(LoginResponse {
            token,
            expires_in: self.tokens.ttl_secs(),
            user,
        })
    }

    /// The account behind a token
    pub async fn me(&self, claims: &Claims) -> AppResult<User> {
        self.user_repo
            .find_by_id(claims.sub)
            .await?
            .ok_or_else(|| AppError::Unauthorized("Account no longer exists".into()))
    }

    /// All accounts
    pub async fn list(&self) -> AppResult<Vec<User>> {
        Ok(self.user_repo.list().await?)
    }

    /// Create an account
    pub async fn create(&self, input: NewUserInput) -> AppResult<User> {
        let username = validate_username(&input.username)?;
        let email = optional_text(input.email.as_deref())
            .map(|e| validate_email(&e))
            .transpose()?;
        validate_password(&input.password)?;

        if self.user_repo.find_by_username(&username).await?.is_some() {
            return Err(Self::username_taken(&username));
        }
        let hash = hash_password(&input.password)?;

        let user = self
            .user_repo
            .create(&username, email.as_deref(), &hash, input.is_admin)
            .await
            .map_err(|e| match RepositoryError::from(e) {
                RepositoryError::Duplicate(_) => Self::username_taken(&username),
                other => other.into(),
            })?;

        info!("Created user {} (admin: {})", user.id, user.is_admin);
        Ok(user)
    }

    /// Delete an account other than the caller's own
    pub async fn delete(&self, id: Uuid, acting_user: Uuid) -> AppResult<()> {
        if id == acting_user {
            return Err(AppError::Validation("You cannot delete your own account".into()));
        }
        if !self.user_repo.delete(id).await? {
            return Err(AppError::NotFound("User not found".into()));
        }
        info!("Deleted user {}", id);
        Ok(())
    }

    /// Set a new password for an account
    pub async fn change_password(&self, id: Uuid, new_password: &str) -> AppResult<()> {
        validate_password(new_password)?;
        let hash = hash_password(new_password)?;

        if !self.user_repo.update_password(id, &hash).await? {
            return Err(AppError::NotFound("User not found".into()));
        }
        info!("Password changed for user {}", id);
        Ok(())
    }

    /// Create the configured admin when no account exists yet.
    ///
    /// Returns the created user, or `None` when accounts already exist.
    pub async fn bootstrap_admin(&self, bootstrap: &AdminBootstrap) -> AppResult<Option<User>> {
        if self.user_repo.count().await? > 0 {
            return Ok(None);
        }

        let user = self
            .create(NewUserInput {
                username: bootstrap.username.clone(),
                email: None,
                password: bootstrap.password.clone(),
                is_admin: true,
            })
            .await?;

        info!("Bootstrapped admin account '{}'", user.username);
        Ok(Some(user))
    }

    fn username_taken(username: &str) -> AppError {
        AppError::Conflict(format!("Username '{}' is already taken", username))
    }
}
