//! HTTP handlers and route configuration.

mod auth;
mod health;
mod posts;
mod upload;

use std::path::PathBuf;

use actix_web::web;

use crate::middleware::validation::json_config;

/// All application routes; stored uploads are served from `uploads_dir`.
pub fn routes(uploads_dir: PathBuf) -> impl FnOnce(&mut web::ServiceConfig) {
    move |cfg| configure_routes(cfg, uploads_dir)
}

fn configure_routes(cfg: &mut web::ServiceConfig, uploads_dir: PathBuf) {
    cfg.app_data(json_config())
        .route("/health", web::get().to(health::health_check))
        // Auth routes
        .service(
            web::scope("/auth")
                .route("/register", web::post().to(auth::register))
                .route("/login", web::post().to(auth::login))
                .route("/me", web::get().to(auth::me)),
        )
        // Images
        .route("/upload", web::post().to(upload::upload_image))
        .service(upload::upload_files(uploads_dir))
        // Tags
        .route("/tags", web::get().to(posts::last_tags))
        // Posts; "/tags" is registered before "/{id}" so it wins
        .service(
            web::scope("/posts")
                .route("", web::get().to(posts::get_all))
                .route("", web::post().to(posts::create))
                .route("/tags", web::get().to(posts::last_tags))
                .route("/{id}", web::get().to(posts::get_one))
                .route("/{id}", web::patch().to(posts::update))
                .route("/{id}", web::delete().to(posts::remove)),
        );
}
