//! User and post services wired to the in-memory stores.

use std::sync::Arc;

use chrono::{TimeDelta, Utc};
use uuid::Uuid;

use quill_core::DomainError;
use quill_core::domain::{Post, PostDraft};
use quill_core::ports::{PostRepository, TokenService};
use quill_core::services::{PostService, Registration, UserService};
use quill_infra::{
    Argon2PasswordService, InMemoryPostRepository, InMemoryUserRepository, JwtConfig,
    JwtTokenService,
};

struct Harness {
    users: UserService,
    posts: PostService,
    post_repo: Arc<InMemoryPostRepository>,
    tokens: Arc<JwtTokenService>,
}

fn harness() -> Harness {
    let user_repo = Arc::new(InMemoryUserRepository::new());
    let post_repo = Arc::new(InMemoryPostRepository::new());
    let tokens = Arc::new(JwtTokenService::new(JwtConfig {
        secret: "services-test-secret".to_string(),
        ..JwtConfig::default()
    }));

    Harness {
        users: UserService::new(
            user_repo.clone(),
            Arc::new(Argon2PasswordService::new()),
            tokens.clone(),
        ),
        posts: PostService::new(post_repo.clone(), user_repo),
        post_repo,
        tokens,
    }
}

fn registration(login: &str, password: &str) -> Registration {
    Registration {
        login: login.to_string(),
        password: password.to_string(),
        full_name: format!("{login} Example"),
        avatar_url: None,
    }
}

fn draft(title: &str, tags_csv: &str) -> PostDraft {
    PostDraft::from_csv(
        title.to_string(),
        format!("{title} body"),
        None,
        tags_csv,
    )
}

#[tokio::test]
async fn register_twice_with_same_login_fails_validation() {
    let h = harness();

    let first = h.users.register(registration("alice", "rightpass")).await;
    let second = h.users.register(registration("alice", "otherpass")).await;

    assert!(first.is_ok());
    assert!(matches!(second, Err(DomainError::Validation(_))));
}

#[tokio::test]
async fn register_issues_token_for_new_user() {
    let h = harness();

    let session = h
        .users
        .register(Registration {
            avatar_url: Some("/uploads/me.png".to_string()),
            ..registration("alice", "rightpass")
        })
        .await
        .unwrap();

    let claims = h.tokens.validate_token(&session.token).unwrap();
    assert_eq!(claims.user_id, session.profile.id);
    assert_eq!(session.profile.login, "alice");
    assert_eq!(session.profile.avatar_url.as_deref(), Some("/uploads/me.png"));
}

#[tokio::test]
async fn login_checks_the_password() {
    let h = harness();
    h.users
        .register(registration("alice", "rightpass"))
        .await
        .unwrap();

    let wrong = h.users.login("alice", "wrongpass").await;
    let right = h.users.login("alice", "rightpass").await.unwrap();

    assert!(matches!(wrong, Err(DomainError::Unauthorized)));
    assert_eq!(right.profile.login, "alice");
}

#[tokio::test]
async fn login_with_unknown_user_is_not_found() {
    let h = harness();

    let result = h.users.login("nobody", "whatever").await;

    assert!(matches!(result, Err(DomainError::NotFound { .. })));
}

#[tokio::test]
async fn get_me_returns_profile_or_not_found() {
    let h = harness();
    let session = h
        .users
        .register(registration("alice", "rightpass"))
        .await
        .unwrap();

    let me = h.users.get_me(session.profile.id).await.unwrap();
    let missing = h.users.get_me(Uuid::new_v4()).await;

    assert_eq!(me, session.profile);
    assert!(matches!(missing, Err(DomainError::NotFound { .. })));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_reads_count_every_view() {
    let h = Arc::new(harness());
    let post = h
        .posts
        .create(Uuid::new_v4(), draft("popular", "a"))
        .await
        .unwrap();

    const READS: usize = 64;
    let handles: Vec<_> = (0..READS)
        .map(|_| {
            let h = Arc::clone(&h);
            tokio::spawn(async move { h.posts.get_one(post.id).await.map(|_| ()) })
        })
        .collect();
    for handle in handles {
        handle.await.unwrap().unwrap();
    }

    let stored = h.post_repo.find_all().await.unwrap();
    assert_eq!(stored[0].views_count, READS as i64);
}

#[tokio::test]
async fn get_one_increments_once_per_call() {
    let h = harness();
    let post = h
        .posts
        .create(Uuid::new_v4(), draft("once", ""))
        .await
        .unwrap();

    let first = h.posts.get_one(post.id).await.unwrap();
    let second = h.posts.get_one(post.id).await.unwrap();

    assert_eq!(first.post.views_count, 1);
    assert_eq!(second.post.views_count, 2);
}

#[tokio::test]
async fn get_one_missing_post_is_not_found() {
    let h = harness();

    let result = h.posts.get_one(Uuid::new_v4()).await;

    assert!(matches!(result, Err(DomainError::NotFound { .. })));
}

#[tokio::test]
async fn update_replaces_every_field() {
    let h = harness();
    let author = h
        .users
        .register(registration("alice", "rightpass"))
        .await
        .unwrap()
        .profile;
    let post = h
        .posts
        .create(
            author.id,
            PostDraft::from_csv(
                "Draft".into(),
                "Old text".into(),
                Some("/uploads/old.png".into()),
                "old,tags,here",
            ),
        )
        .await
        .unwrap();

    h.posts
        .update(
            post.id,
            author.id,
            PostDraft::from_csv("Final".into(), "New text".into(), None, "new"),
        )
        .await
        .unwrap();
    let read = h.posts.get_one(post.id).await.unwrap();

    assert_eq!(read.post.title, "Final");
    assert_eq!(read.post.text, "New text");
    assert_eq!(read.post.image_url, None);
    assert_eq!(read.post.tags, vec!["new"]);
    assert_eq!(read.author, Some(author));
}

#[tokio::test]
async fn update_by_another_user_succeeds_and_reassigns_owner() {
    let h = harness();
    let owner = Uuid::new_v4();
    let intruder = Uuid::new_v4();
    let post = h.posts.create(owner, draft("mine", "x")).await.unwrap();

    let result = h
        .posts
        .update(post.id, intruder, draft("theirs", "y"))
        .await;

    assert!(result.is_ok());
    let read = h.posts.get_one(post.id).await.unwrap();
    assert_eq!(read.post.user_id, intruder);
    assert_eq!(read.post.title, "theirs");
}

#[tokio::test]
async fn update_of_missing_post_is_acknowledged() {
    let h = harness();

    let result = h
        .posts
        .update(Uuid::new_v4(), Uuid::new_v4(), draft("ghost", ""))
        .await;

    assert!(result.is_ok());
}

#[tokio::test]
async fn last_tags_take_five_from_newest_posts() {
    let h = harness();
    let owner = Uuid::new_v4();
    let base = Utc::now();

    // Age in seconds: "a,b,c" is the newest post.
    for (age, tags) in [(0, "a,b,c"), (1, "d,e"), (2, "f")] {
        let mut post = Post::new(owner, draft("t", tags));
        post.created_at = base - TimeDelta::seconds(age);
        h.post_repo.create(post).await.unwrap();
    }

    let tags = h.posts.get_last_tags().await.unwrap();

    assert_eq!(tags, vec!["a", "b", "c", "d", "e"]);
}

#[tokio::test]
async fn last_tags_ignore_posts_beyond_the_fifth() {
    let h = harness();
    let owner = Uuid::new_v4();
    let base = Utc::now();

    for age in 0..5 {
        let mut post = Post::new(owner, draft("t", ""));
        post.created_at = base - TimeDelta::seconds(age);
        h.post_repo.create(post).await.unwrap();
    }
    let mut old = Post::new(owner, draft("old", "stale"));
    old.created_at = base - TimeDelta::days(1);
    h.post_repo.create(old).await.unwrap();

    let tags = h.posts.get_last_tags().await.unwrap();

    assert_eq!(tags, vec![""; 5]);
}

#[tokio::test]
async fn get_all_attaches_authors() {
    let h = harness();
    let author = h
        .users
        .register(registration("alice", "rightpass"))
        .await
        .unwrap()
        .profile;
    h.posts.create(author.id, draft("one", "")).await.unwrap();
    h.posts
        .create(Uuid::new_v4(), draft("orphan", ""))
        .await
        .unwrap();

    let all = h.posts.get_all().await.unwrap();

    assert_eq!(all.len(), 2);
    let one = all.iter().find(|p| p.post.title == "one").unwrap();
    let orphan = all.iter().find(|p| p.post.title == "orphan").unwrap();
    assert_eq!(one.author.as_ref(), Some(&author));
    assert!(orphan.author.is_none());
}

#[tokio::test]
async fn remove_deletes_then_reports_not_found() {
    let h = harness();
    let post = h
        .posts
        .create(Uuid::new_v4(), draft("bye", ""))
        .await
        .unwrap();

    h.posts.remove(post.id).await.unwrap();
    let again = h.posts.remove(post.id).await;

    assert!(matches!(again, Err(DomainError::NotFound { .. })));
    assert!(matches!(
        h.posts.get_one(post.id).await,
        Err(DomainError::NotFound { .. })
    ));
}
