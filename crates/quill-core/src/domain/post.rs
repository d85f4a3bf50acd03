use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::PublicProfile;

/// Post entity - a blog article owned by a user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Post {
    pub id: Uuid,
    pub user_id: Uuid,
    pub title: String,
    pub text: String,
    pub image_url: Option<String>,
    pub tags: Vec<String>,
    pub views_count: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Post {
    /// Create a new, unviewed post.
    pub fn new(user_id: Uuid, draft: PostDraft) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            user_id,
            title: draft.title,
            text: draft.text,
            image_url: draft.image_url,
            tags: draft.tags,
            views_count: 0,
            created_at: now,
            updated_at: now,
        }
    }
}

/// The author-editable fields of a post.
///
/// Used both for creation and for updates, which replace every field at once.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PostDraft {
    pub title: String,
    pub text: String,
    pub image_url: Option<String>,
    pub tags: Vec<String>,
}

impl PostDraft {
    /// Build a draft from the comma-separated tag string clients send.
    pub fn from_csv(title: String, text: String, image_url: Option<String>, tags_csv: &str) -> Self {
        Self {
            title,
            text,
            image_url,
            tags: split_tags(tags_csv),
        }
    }
}

/// Split a tag string on commas, verbatim.
///
/// No trimming and no deduplication: `"a, b,,a"` yields `["a", " b", "", "a"]`.
pub fn split_tags(csv: &str) -> Vec<String> {
    csv.split(',').map(str::to_owned).collect()
}

/// A post together with its owner's public profile.
///
/// `author` is `None` when the owning user record no longer resolves.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PostWithAuthor {
    pub post: Post,
    pub author: Option<PublicProfile>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_tags_is_literal() {
        assert_eq!(split_tags("rust,web"), vec!["rust", "web"]);
        assert_eq!(split_tags("a, b,,a"), vec!["a", " b", "", "a"]);
    }

    #[test]
    fn test_split_tags_empty_string() {
        assert_eq!(split_tags(""), vec![""]);
    }

    #[test]
    fn test_new_post_starts_unviewed() {
        let owner = Uuid::new_v4();
        let post = Post::new(
            owner,
            PostDraft::from_csv("Title".into(), "Body".into(), None, "x,y"),
        );

        assert_eq!(post.user_id, owner);
        assert_eq!(post.views_count, 0);
        assert_eq!(post.tags, vec!["x", "y"]);
        assert_eq!(post.created_at, post.updated_at);
    }
}
