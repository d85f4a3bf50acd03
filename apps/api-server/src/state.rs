//! Application state - shared across all handlers.

use std::sync::Arc;

use quill_core::ports::{PostRepository, TokenService, UploadStorage, UserRepository};
use quill_core::services::{PostService, UserService};
use quill_infra::{
    Argon2PasswordService, InMemoryPostRepository, InMemoryUserRepository, JwtConfig,
    JwtTokenService, LocalUploadStorage,
};

use crate::config::{AppConfig, UploadConfig};

/// URL prefix uploaded files are served under.
pub const UPLOADS_PREFIX: &str = "/uploads";

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub users: Arc<UserService>,
    pub posts: Arc<PostService>,
    pub tokens: Arc<dyn TokenService>,
    pub uploads: Arc<dyn UploadStorage>,
    pub upload_max_bytes: usize,
}

type Repositories = (Arc<dyn UserRepository>, Arc<dyn PostRepository>);

impl AppState {
    /// Build the application state with appropriate implementations.
    pub async fn new(config: &AppConfig) -> anyhow::Result<Self> {
        let (user_repo, post_repo) = Self::repositories(config).await?;
        let state = Self::with_repositories(user_repo, post_repo, &config.jwt, &config.uploads);

        tracing::info!("Application state initialized");
        Ok(state)
    }

    /// State backed by in-memory stores.
    pub fn in_memory(jwt: &JwtConfig, uploads: &UploadConfig) -> Self {
        let (user_repo, post_repo) = Self::in_memory_repositories();
        Self::with_repositories(user_repo, post_repo, jwt, uploads)
    }

    fn with_repositories(
        user_repo: Arc<dyn UserRepository>,
        post_repo: Arc<dyn PostRepository>,
        jwt: &JwtConfig,
        uploads: &UploadConfig,
    ) -> Self {
        let tokens: Arc<dyn TokenService> = Arc::new(JwtTokenService::new(jwt.clone()));

        Self {
            users: Arc::new(UserService::new(
                user_repo.clone(),
                Arc::new(Argon2PasswordService::new()),
                tokens.clone(),
            )),
            posts: Arc::new(PostService::new(post_repo, user_repo)),
            tokens,
            uploads: Arc::new(LocalUploadStorage::new(uploads.dir.clone(), UPLOADS_PREFIX)),
            upload_max_bytes: uploads.max_bytes,
        }
    }

    #[cfg(feature = "postgres")]
    async fn repositories(config: &AppConfig) -> anyhow::Result<Repositories> {
        use migration::{Migrator, MigratorTrait};
        use quill_infra::{PostgresPostRepository, PostgresUserRepository};

        let Some(db_config) = &config.database else {
            tracing::warn!("DATABASE_URL not set. Running without database (in-memory mode).");
            return Ok(Self::in_memory_repositories());
        };

        let conn = Arc::new(quill_infra::database::connect(db_config).await?);
        if config.auto_migrate {
            Migrator::up(&*conn, None).await?;
            tracing::info!("Database migrations applied");
        }

        Ok((
            Arc::new(PostgresUserRepository::new(conn.clone())),
            Arc::new(PostgresPostRepository::new(conn)),
        ))
    }

    #[cfg(not(feature = "postgres"))]
    async fn repositories(_config: &AppConfig) -> anyhow::Result<Repositories> {
        tracing::info!("Running without postgres feature - using in-memory repositories");
        Ok(Self::in_memory_repositories())
    }

    fn in_memory_repositories() -> Repositories {
        (
            Arc::new(InMemoryUserRepository::new()),
            Arc::new(InMemoryPostRepository::new()),
        )
    }
}
