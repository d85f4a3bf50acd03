//! Post listing, reading, writing and tag discovery.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use uuid::Uuid;

use crate::domain::{Post, PostDraft, PostWithAuthor, PublicProfile};
use crate::error::{DomainError, RepoError};
use crate::ports::{PostRepository, UserRepository};

/// How many of the newest posts contribute to the tag cloud.
pub const LAST_TAGS_POST_COUNT: u64 = 5;

/// How many tags the tag cloud holds in total.
pub const LAST_TAGS_LIMIT: usize = 5;

pub struct PostService {
    posts: Arc<dyn PostRepository>,
    users: Arc<dyn UserRepository>,
}

impl PostService {
    pub fn new(posts: Arc<dyn PostRepository>, users: Arc<dyn UserRepository>) -> Self {
        Self { posts, users }
    }

    /// Every post with its author, newest first.
    pub async fn get_all(&self) -> Result<Vec<PostWithAuthor>, DomainError> {
        let posts = self.posts.find_all().await?;
        self.attach_authors(posts).await
    }

    /// Read a single post, counting the view.
    pub async fn get_one(&self, post_id: Uuid) -> Result<PostWithAuthor, DomainError> {
        let post = self
            .posts
            .increment_views(post_id)
            .await?
            .ok_or_else(|| DomainError::not_found("Post", post_id))?;

        let author = self
            .users
            .find_by_id(post.user_id)
            .await?
            .map(|user| user.profile());

        Ok(PostWithAuthor { post, author })
    }

    /// The first few tags of the most recent posts.
    pub async fn get_last_tags(&self) -> Result<Vec<String>, DomainError> {
        let posts = self.posts.find_recent(LAST_TAGS_POST_COUNT).await?;
        Ok(collect_last_tags(&posts))
    }

    pub async fn create(&self, author_id: Uuid, draft: PostDraft) -> Result<Post, DomainError> {
        let post = self.posts.create(Post::new(author_id, draft)).await?;
        tracing::info!(post_id = %post.id, user_id = %author_id, "Post created");
        Ok(post)
    }

    /// Overwrite a post and hand it to `author_id`.
    ///
    /// Any authenticated user may update any post; the caller becomes its owner.
    /// Updating an id that matches nothing is not an error.
    pub async fn update(
        &self,
        post_id: Uuid,
        author_id: Uuid,
        draft: PostDraft,
    ) -> Result<(), DomainError> {
        let matched = self.posts.replace(post_id, author_id, draft).await?;
        if matched {
            tracing::info!(post_id = %post_id, user_id = %author_id, "Post updated");
        } else {
            tracing::debug!(post_id = %post_id, "Update matched no post");
        }
        Ok(())
    }

    pub async fn remove(&self, post_id: Uuid) -> Result<(), DomainError> {
        match self.posts.delete(post_id).await {
            Ok(()) => {
                tracing::info!(post_id = %post_id, "Post deleted");
                Ok(())
            }
            Err(RepoError::NotFound) => Err(DomainError::not_found("Post", post_id)),
            Err(e) => Err(e.into()),
        }
    }

    async fn attach_authors(&self, posts: Vec<Post>) -> Result<Vec<PostWithAuthor>, DomainError> {
        let owner_ids: Vec<Uuid> = posts
            .iter()
            .map(|p| p.user_id)
            .collect::<HashSet<_>>()
            .into_iter()
            .collect();

        let profiles: HashMap<Uuid, PublicProfile> = self
            .users
            .find_by_ids(&owner_ids)
            .await?
            .into_iter()
            .map(|user| (user.id, user.profile()))
            .collect();

        Ok(posts
            .into_iter()
            .map(|post| {
                let author = profiles.get(&post.user_id).cloned();
                PostWithAuthor { post, author }
            })
            .collect())
    }
}

/// Concatenate the tag lists of `posts` in order and keep the first
/// [`LAST_TAGS_LIMIT`] tags of the result.
///
/// The limit applies to the concatenation, not to each post.
pub fn collect_last_tags(posts: &[Post]) -> Vec<String> {
    posts
        .iter()
        .flat_map(|post| post.tags.iter().cloned())
        .take(LAST_TAGS_LIMIT)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn post_with_tags(tags: &[&str]) -> Post {
        Post::new(
            Uuid::new_v4(),
            PostDraft {
                title: "t".into(),
                text: "x".into(),
                image_url: None,
                tags: tags.iter().map(|t| t.to_string()).collect(),
            },
        )
    }

    #[test]
    fn test_last_tags_truncates_the_concatenation() {
        let posts = vec![
            post_with_tags(&["a", "b", "c"]),
            post_with_tags(&["d", "e"]),
            post_with_tags(&["f"]),
        ];

        assert_eq!(collect_last_tags(&posts), vec!["a", "b", "c", "d", "e"]);
    }

    #[test]
    fn test_last_tags_keeps_duplicates_and_short_lists() {
        let posts = vec![post_with_tags(&["rust"]), post_with_tags(&["rust", ""])];

        assert_eq!(collect_last_tags(&posts), vec!["rust", "rust", ""]);
    }

    #[test]
    fn test_last_tags_without_posts() {
        assert!(collect_last_tags(&[]).is_empty());
    }
}
