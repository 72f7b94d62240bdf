//! # rf-api
//!
//! The web routing and orchestration layer for Rusty-Forum.

pub mod auth;
pub mod error;
pub mod extract;
pub mod handlers;
pub mod middleware;

use actix_web::web;

use crate::error::ApiError;

/// Registers the `/threads` resource tree. Expects `web::Data<AppState>` on the app.
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.app_data(json_config()).service(
        web::scope("/threads")
            .route("", web::post().to(handlers::add_thread))
            .route("/{thread_id}", web::get().to(handlers::get_thread))
            .route("/{thread_id}/comments", web::post().to(handlers::add_comment))
            .route(
                "/{thread_id}/comments/{comment_id}",
                web::delete().to(handlers::delete_comment),
            )
            .route(
                "/{thread_id}/comments/{comment_id}/replies",
                web::post().to(handlers::add_reply),
            )
            .route(
                "/{thread_id}/comments/{comment_id}/replies/{reply_id}",
                web::delete().to(handlers::delete_reply),
            ),
    );
}

/// Malformed JSON bodies get the same `fail` envelope as validation errors.
fn json_config() -> web::JsonConfig {
    web::JsonConfig::default()
        .error_handler(|err, _req| ApiError::BadRequest(err.to_string()).into())
}
