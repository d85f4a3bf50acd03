//! Registration, login and profile lookup.

use std::sync::Arc;

use uuid::Uuid;

use crate::domain::{PublicProfile, User};
use crate::error::DomainError;
use crate::ports::{PasswordService, TokenService, UserRepository};

/// Input for [`UserService::register`].
#[derive(Debug, Clone)]
pub struct Registration {
    pub login: String,
    pub password: String,
    pub full_name: String,
    pub avatar_url: Option<String>,
}

/// A freshly issued token together with the profile it belongs to.
#[derive(Debug, Clone)]
pub struct AuthSession {
    pub token: String,
    /// Seconds until `token` expires.
    pub expires_in: i64,
    pub profile: PublicProfile,
}

pub struct UserService {
    users: Arc<dyn UserRepository>,
    passwords: Arc<dyn PasswordService>,
    tokens: Arc<dyn TokenService>,
}

impl UserService {
    pub fn new(
        users: Arc<dyn UserRepository>,
        passwords: Arc<dyn PasswordService>,
        tokens: Arc<dyn TokenService>,
    ) -> Self {
        Self {
            users,
            passwords,
            tokens,
        }
    }

    /// Create an account and sign it in.
    pub async fn register(&self, registration: Registration) -> Result<AuthSession, DomainError> {
        let Registration {
            login,
            password,
            full_name,
            avatar_url,
        } = registration;

        if self.users.find_by_login(&login).await?.is_some() {
            return Err(DomainError::Validation(format!(
                "Login '{login}' is already taken"
            )));
        }

        let password_hash = self.hash_password(password).await?;
        let user = self
            .users
            .create(User::new(login, full_name, password_hash, avatar_url))
            .await?;

        tracing::info!(user_id = %user.id, "User registered");
        self.session_for(&user)
    }

    /// Check a login/password pair and issue a token.
    pub async fn login(&self, login: &str, password: &str) -> Result<AuthSession, DomainError> {
        let user = self
            .users
            .find_by_login(login)
            .await?
            .ok_or_else(|| DomainError::not_found("User", login))?;

        if !self.verify_password(password, &user.password_hash).await? {
            tracing::debug!(user_id = %user.id, "Password mismatch");
            return Err(DomainError::Unauthorized);
        }

        self.session_for(&user)
    }

    /// Profile of the signed-in user.
    pub async fn get_me(&self, user_id: Uuid) -> Result<PublicProfile, DomainError> {
        self.users
            .find_by_id(user_id)
            .await?
            .map(|user| user.profile())
            .ok_or_else(|| DomainError::not_found("User", user_id))
    }

    fn session_for(&self, user: &User) -> Result<AuthSession, DomainError> {
        let token = self
            .tokens
            .generate_token(user.id)
            .map_err(|e| DomainError::Internal(e.to_string()))?;
        Ok(AuthSession {
            token,
            expires_in: self.tokens.expiration_seconds(),
            profile: user.profile(),
        })
    }

    // Hashing is CPU-bound; keep it off the async workers.
    async fn hash_password(&self, password: String) -> Result<String, DomainError> {
        let passwords = Arc::clone(&self.passwords);
        let hash = tokio::task::spawn_blocking(move || passwords.hash(&password))
            .await
            .map_err(|e| DomainError::Internal(e.to_string()))??;
        Ok(hash)
    }

    async fn verify_password(&self, password: &str, hash: &str) -> Result<bool, DomainError> {
        let passwords = Arc::clone(&self.passwords);
        let (password, hash) = (password.to_owned(), hash.to_owned());
        let valid = tokio::task::spawn_blocking(move || passwords.verify(&password, &hash))
            .await
            .map_err(|e| DomainError::Internal(e.to_string()))??;
        Ok(valid)
    }
}
