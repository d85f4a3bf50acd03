//! Domain entities - the core business objects.

mod post;
mod user;

pub use post::{Post, PostDraft, PostWithAuthor, split_tags};
pub use user::{PublicProfile, User};
