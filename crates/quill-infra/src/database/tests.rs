#[cfg(test)]
mod tests {
    use crate::database::entity::{post, user};
    use crate::database::postgres_repo::{PostgresPostRepository, PostgresUserRepository};
    use quill_core::domain::{Post, PostDraft};
    use quill_core::error::RepoError;
    use quill_core::ports::{PostRepository, UserRepository};
    use sea_orm::{DatabaseBackend, MockDatabase, MockExecResult};
    use std::sync::Arc;

    fn post_model(id: uuid::Uuid, views_count: i64) -> post::Model {
        let now = chrono::Utc::now();
        post::Model {
            id,
            user_id: uuid::Uuid::new_v4(),
            title: "Test Post".to_owned(),
            text: "Content".to_owned(),
            image_url: None,
            tags: vec!["rust".to_owned(), "sql".to_owned()],
            views_count,
            created_at: now.into(),
            updated_at: now.into(),
        }
    }

    #[tokio::test]
    async fn test_increment_views_returns_updated_row() {
        let post_id = uuid::Uuid::new_v4();

        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results(vec![vec![post_model(post_id, 8)]])
            .into_connection();

        let db = Arc::new(db);
        let repo = PostgresPostRepository::new(db.clone());

        let result: Option<Post> = repo.increment_views(post_id).await.unwrap();
        drop(repo);

        let post = result.unwrap();
        assert_eq!(post.id, post_id);
        assert_eq!(post.views_count, 8);
        assert_eq!(post.tags, vec!["rust", "sql"]);

        // One round trip: the increment and the read are the same statement.
        let Ok(db) = Arc::try_unwrap(db) else {
            panic!("repository still holds the connection");
        };
        let log = format!("{:?}", db.into_transaction_log());
        assert!(log.contains("UPDATE"));
        assert!(log.contains("views_count"));
        assert!(log.contains("RETURNING"));
    }

    #[tokio::test]
    async fn test_increment_views_missing_post() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results(vec![Vec::<post::Model>::new()])
            .into_connection();

        let repo = PostgresPostRepository::new(Arc::new(db));

        let result = repo.increment_views(uuid::Uuid::new_v4()).await.unwrap();

        assert!(result.is_none());
    }

    #[tokio::test]
    async fn test_delete_missing_post_is_not_found() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_exec_results(vec![MockExecResult {
                last_insert_id: 0,
                rows_affected: 0,
            }])
            .into_connection();

        let repo = PostgresPostRepository::new(Arc::new(db));

        let result = repo.delete(uuid::Uuid::new_v4()).await;

        assert!(matches!(result, Err(RepoError::NotFound)));
    }

    #[tokio::test]
    async fn test_replace_reports_whether_a_row_matched() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_exec_results(vec![
                MockExecResult {
                    last_insert_id: 0,
                    rows_affected: 1,
                },
                MockExecResult {
                    last_insert_id: 0,
                    rows_affected: 0,
                },
            ])
            .into_connection();

        let repo = PostgresPostRepository::new(Arc::new(db));
        let draft = PostDraft {
            title: "New".to_owned(),
            text: "Body".to_owned(),
            image_url: Some("/uploads/a.png".to_owned()),
            tags: vec!["x".to_owned()],
        };

        let owner = uuid::Uuid::new_v4();
        assert!(
            repo.replace(uuid::Uuid::new_v4(), owner, draft.clone())
                .await
                .unwrap()
        );
        assert!(
            !repo
                .replace(uuid::Uuid::new_v4(), owner, draft)
                .await
                .unwrap()
        );
    }

    #[tokio::test]
    async fn test_find_user_by_login() {
        let now = chrono::Utc::now();
        let user_id = uuid::Uuid::new_v4();

        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results(vec![vec![user::Model {
                id: user_id,
                login: "alice".to_owned(),
                full_name: "Alice".to_owned(),
                password_hash: "$argon2id$hash".to_owned(),
                avatar_url: None,
                created_at: now.into(),
                updated_at: now.into(),
            }]])
            .into_connection();

        let repo = PostgresUserRepository::new(Arc::new(db));

        let user = repo.find_by_login("alice").await.unwrap().unwrap();

        assert_eq!(user.id, user_id);
        assert_eq!(user.full_name, "Alice");
    }

    #[tokio::test]
    async fn test_find_by_ids_without_ids_skips_the_query() {
        // No results queued: any query would fail.
        let db = MockDatabase::new(DatabaseBackend::Postgres).into_connection();

        let repo = PostgresUserRepository::new(Arc::new(db));

        assert!(repo.find_by_ids(&[]).await.unwrap().is_empty());
    }
}
