//! PostgreSQL repository implementations.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DbConn, DbErr, EntityTrait, QueryFilter, QueryOrder,
    QuerySelect, Set, SqlErr,
};
use uuid::Uuid;

use quill_core::domain::{Post, PostDraft, User};
use quill_core::error::RepoError;
use quill_core::ports::{PostRepository, UserRepository};

use super::entity::post::{self, Entity as PostEntity};
use super::entity::user::{self, Entity as UserEntity};

fn query_error(e: DbErr) -> RepoError {
    RepoError::Query(e.to_string())
}

/// Map a failed write. `conflict` describes a unique-key clash in client terms;
/// raw constraint text stays in the logs.
fn write_error(e: DbErr, conflict: impl FnOnce() -> String) -> RepoError {
    match constraint_error(e.sql_err(), conflict) {
        Some(err) => {
            tracing::debug!(error = %e, "Constraint violation");
            err
        }
        None => query_error(e),
    }
}

fn constraint_error(err: Option<SqlErr>, conflict: impl FnOnce() -> String) -> Option<RepoError> {
    match err? {
        SqlErr::UniqueConstraintViolation(_) => Some(RepoError::Constraint(conflict())),
        SqlErr::ForeignKeyConstraintViolation(_) => Some(RepoError::Constraint(
            "Referenced user does not exist".to_string(),
        )),
        _ => None,
    }
}

fn login_taken(login: &str) -> String {
    format!("Login '{login}' is already taken")
}

/// Keep logins out of the logs: `alice` becomes `a***`.
fn mask_login(login: &str) -> String {
    match login.chars().next() {
        Some(first) if login.chars().count() > 1 => format!("{first}***"),
        _ => "***".to_string(),
    }
}

/// PostgreSQL user repository.
pub struct PostgresUserRepository {
    db: Arc<DbConn>,
}

impl PostgresUserRepository {
    pub fn new(db: Arc<DbConn>) -> Self {
        Self { db }
    }
}

#[async_trait]
impl UserRepository for PostgresUserRepository {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, RepoError> {
        let result = UserEntity::find_by_id(id)
            .one(&*self.db)
            .await
            .map_err(query_error)?;

        Ok(result.map(Into::into))
    }

    async fn find_by_login(&self, login: &str) -> Result<Option<User>, RepoError> {
        tracing::debug!(login = %mask_login(login), "Finding user by login");

        let result = UserEntity::find()
            .filter(user::Column::Login.eq(login))
            .one(&*self.db)
            .await
            .map_err(query_error)?;

        Ok(result.map(Into::into))
    }

    async fn find_by_ids(&self, ids: &[Uuid]) -> Result<Vec<User>, RepoError> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let result = UserEntity::find()
            .filter(user::Column::Id.is_in(ids.iter().copied()))
            .all(&*self.db)
            .await
            .map_err(query_error)?;

        Ok(result.into_iter().map(Into::into).collect())
    }

    async fn create(&self, user: User) -> Result<User, RepoError> {
        let login = user.login.clone();
        let active_model: user::ActiveModel = user.into();
        let model = active_model
            .insert(&*self.db)
            .await
            .map_err(|e| write_error(e, || login_taken(&login)))?;
        Ok(model.into())
    }
}

/// PostgreSQL post repository.
pub struct PostgresPostRepository {
    db: Arc<DbConn>,
}

impl PostgresPostRepository {
    pub fn new(db: Arc<DbConn>) -> Self {
        Self { db }
    }
}

#[async_trait]
impl PostRepository for PostgresPostRepository {
    async fn find_all(&self) -> Result<Vec<Post>, RepoError> {
        let result = PostEntity::find()
            .order_by_desc(post::Column::CreatedAt)
            .all(&*self.db)
            .await
            .map_err(query_error)?;

        Ok(result.into_iter().map(Into::into).collect())
    }

    async fn find_recent(&self, limit: u64) -> Result<Vec<Post>, RepoError> {
        let result = PostEntity::find()
            .order_by_desc(post::Column::CreatedAt)
            .limit(limit)
            .all(&*self.db)
            .await
            .map_err(query_error)?;

        Ok(result.into_iter().map(Into::into).collect())
    }

    async fn create(&self, post: Post) -> Result<Post, RepoError> {
        let id = post.id;
        let active_model: post::ActiveModel = post.into();
        let model = active_model
            .insert(&*self.db)
            .await
            .map_err(|e| write_error(e, || format!("Post {id} already exists")))?;
        Ok(model.into())
    }

    async fn replace(&self, id: Uuid, owner: Uuid, draft: PostDraft) -> Result<bool, RepoError> {
        let changes = post::ActiveModel {
            user_id: Set(owner),
            title: Set(draft.title),
            text: Set(draft.text),
            image_url: Set(draft.image_url),
            tags: Set(draft.tags),
            updated_at: Set(Utc::now().into()),
            ..Default::default()
        };

        let result = PostEntity::update_many()
            .set(changes)
            .filter(post::Column::Id.eq(id))
            .exec(&*self.db)
            .await
            .map_err(|e| {
                write_error(e, || format!("Post {id} conflicts with an existing row"))
            })?;

        Ok(result.rows_affected > 0)
    }

    async fn increment_views(&self, id: Uuid) -> Result<Option<Post>, RepoError> {
        // UPDATE posts SET views_count = views_count + 1 WHERE id = $1 RETURNING *
        let updated = PostEntity::update_many()
            .col_expr(
                post::Column::ViewsCount,
                Expr::col(post::Column::ViewsCount).add(1),
            )
            .filter(post::Column::Id.eq(id))
            .exec_with_returning(&*self.db)
            .await
            .map_err(query_error)?;

        Ok(updated.into_iter().next().map(Into::into))
    }

    async fn delete(&self, id: Uuid) -> Result<(), RepoError> {
        let result = PostEntity::delete_by_id(id)
            .exec(&*self.db)
            .await
            .map_err(query_error)?;

        if result.rows_affected == 0 {
            return Err(RepoError::NotFound);
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mask_login() {
        assert_eq!(mask_login("alice"), "a***");
        assert_eq!(mask_login("a"), "***");
        assert_eq!(mask_login(""), "***");
    }

    #[test]
    fn test_unique_violation_uses_client_message() {
        let raw = "duplicate key value violates unique constraint \"users_login_key\"";

        let err = constraint_error(
            Some(SqlErr::UniqueConstraintViolation(raw.to_string())),
            || login_taken("alice"),
        );

        assert!(matches!(
            err,
            Some(RepoError::Constraint(msg)) if msg == "Login 'alice' is already taken"
        ));
    }

    #[test]
    fn test_non_constraint_errors_are_not_mapped() {
        assert!(constraint_error(None, || login_taken("alice")).is_none());
    }
}
