//! Application services - the use cases exposed over HTTP.

mod posts;
mod users;

pub use posts::{LAST_TAGS_LIMIT, LAST_TAGS_POST_COUNT, PostService, collect_last_tags};
pub use users::{AuthSession, Registration, UserService};
