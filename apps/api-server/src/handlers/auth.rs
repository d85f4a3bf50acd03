//! Authentication handlers.

use actix_web::{HttpResponse, web};

use quill_core::domain::PublicProfile;
use quill_core::services::{AuthSession, Registration};
use quill_shared::dto::{AuthResponse, LoginRequest, RegisterRequest, UserResponse};

use crate::middleware::auth::Identity;
use crate::middleware::error::AppResult;
use crate::middleware::validation::ValidatedJson;
use crate::state::AppState;

pub(crate) fn user_response(profile: PublicProfile) -> UserResponse {
    UserResponse {
        id: profile.id.to_string(),
        login: profile.login,
        full_name: profile.full_name,
        avatar_url: profile.avatar_url,
        created_at: profile.created_at.to_rfc3339(),
        updated_at: profile.updated_at.to_rfc3339(),
    }
}

fn auth_response(session: AuthSession) -> AuthResponse {
    AuthResponse {
        token: session.token,
        expires_in: session.expires_in,
        user: user_response(session.profile),
    }
}

/// POST /auth/register
pub async fn register(
    state: web::Data<AppState>,
    body: ValidatedJson<RegisterRequest>,
) -> AppResult<HttpResponse> {
    let req = body.into_inner();

    let session = state
        .users
        .register(Registration {
            login: req.login,
            password: req.password,
            full_name: req.full_name,
            avatar_url: req.avatar_url,
        })
        .await?;

    Ok(HttpResponse::Ok().json(auth_response(session)))
}

/// POST /auth/login
pub async fn login(
    state: web::Data<AppState>,
    body: ValidatedJson<LoginRequest>,
) -> AppResult<HttpResponse> {
    let req = body.into_inner();
    let session = state.users.login(&req.login, &req.password).await?;

    Ok(HttpResponse::Ok().json(auth_response(session)))
}

/// GET /auth/me - Protected route
pub async fn me(identity: Identity, state: web::Data<AppState>) -> AppResult<HttpResponse> {
    let profile = state.users.get_me(identity.user_id).await?;

    Ok(HttpResponse::Ok().json(user_response(profile)))
}
