use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::{Post, PostDraft, User};
use crate::error::RepoError;

/// Credential store.
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Find a user by their unique ID.
    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, RepoError>;

    /// Find a user by their login.
    async fn find_by_login(&self, login: &str) -> Result<Option<User>, RepoError>;

    /// Load several users at once. Unknown ids are skipped.
    async fn find_by_ids(&self, ids: &[Uuid]) -> Result<Vec<User>, RepoError>;

    /// Insert a new user. Fails with `RepoError::Constraint` if the login is taken.
    async fn create(&self, user: User) -> Result<User, RepoError>;
}

/// Post store.
#[async_trait]
pub trait PostRepository: Send + Sync {
    /// All posts, newest first.
    async fn find_all(&self) -> Result<Vec<Post>, RepoError>;

    /// The `limit` most recently created posts, newest first.
    async fn find_recent(&self, limit: u64) -> Result<Vec<Post>, RepoError>;

    /// Insert a new post.
    async fn create(&self, post: Post) -> Result<Post, RepoError>;

    /// Overwrite the editable fields and owner of a post.
    ///
    /// Returns `false` when no post has that id.
    async fn replace(&self, id: Uuid, owner: Uuid, draft: PostDraft) -> Result<bool, RepoError>;

    /// Add one to the view counter and return the post as it is afterwards.
    ///
    /// Implementations must do this in a single atomic store operation.
    async fn increment_views(&self, id: Uuid) -> Result<Option<Post>, RepoError>;

    /// Delete a post. Fails with `RepoError::NotFound` if it does not exist.
    async fn delete(&self, id: Uuid) -> Result<(), RepoError>;
}
