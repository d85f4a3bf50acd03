//! Post and tag handlers.

use actix_web::{HttpResponse, web};
use uuid::Uuid;

use quill_core::domain::{Post, PostDraft, PostWithAuthor, split_tags};
use quill_shared::SuccessResponse;
use quill_shared::dto::{PostRequest, PostResponse, UserResponse};

use super::auth::user_response;
use crate::middleware::auth::Identity;
use crate::middleware::error::AppResult;
use crate::middleware::validation::ValidatedJson;
use crate::state::AppState;

fn post_response<U>(post: Post, user: U) -> PostResponse<U> {
    PostResponse {
        id: post.id.to_string(),
        title: post.title,
        text: post.text,
        image_url: post.image_url,
        tags: post.tags,
        user,
        views_count: post.views_count,
        created_at: post.created_at.to_rfc3339(),
        updated_at: post.updated_at.to_rfc3339(),
    }
}

fn populated(entry: PostWithAuthor) -> PostResponse<Option<UserResponse>> {
    post_response(entry.post, entry.author.map(user_response))
}

/// A missing `tags` field means no tags; a present one is split verbatim.
fn draft_from(req: PostRequest) -> PostDraft {
    PostDraft {
        title: req.title,
        text: req.text,
        image_url: req.image_url,
        tags: req.tags.as_deref().map(split_tags).unwrap_or_default(),
    }
}

/// GET /posts
pub async fn get_all(state: web::Data<AppState>) -> AppResult<HttpResponse> {
    let posts: Vec<_> = state
        .posts
        .get_all()
        .await?
        .into_iter()
        .map(populated)
        .collect();

    Ok(HttpResponse::Ok().json(posts))
}

/// GET /posts/{id} - counts as a view
pub async fn get_one(
    state: web::Data<AppState>,
    path: web::Path<Uuid>,
) -> AppResult<HttpResponse> {
    let entry = state.posts.get_one(path.into_inner()).await?;

    Ok(HttpResponse::Ok().json(populated(entry)))
}

/// GET /tags, GET /posts/tags
pub async fn last_tags(state: web::Data<AppState>) -> AppResult<HttpResponse> {
    let tags = state.posts.get_last_tags().await?;

    Ok(HttpResponse::Ok().json(tags))
}

/// POST /posts
pub async fn create(
    identity: Identity,
    state: web::Data<AppState>,
    body: ValidatedJson<PostRequest>,
) -> AppResult<HttpResponse> {
    let post = state
        .posts
        .create(identity.user_id, draft_from(body.into_inner()))
        .await?;

    let user = post.user_id.to_string();
    Ok(HttpResponse::Ok().json(post_response(post, user)))
}

/// PATCH /posts/{id}
pub async fn update(
    identity: Identity,
    state: web::Data<AppState>,
    path: web::Path<Uuid>,
    body: ValidatedJson<PostRequest>,
) -> AppResult<HttpResponse> {
    state
        .posts
        .update(
            path.into_inner(),
            identity.user_id,
            draft_from(body.into_inner()),
        )
        .await?;

    Ok(HttpResponse::Ok().json(SuccessResponse::ok()))
}

/// DELETE /posts/{id}
pub async fn remove(
    _identity: Identity,
    state: web::Data<AppState>,
    path: web::Path<Uuid>,
) -> AppResult<HttpResponse> {
    state.posts.remove(path.into_inner()).await?;

    Ok(HttpResponse::Ok().json(SuccessResponse::ok()))
}
