//! # rf-api Handlers
//!
//! This module coordinates the flow between HTTP requests and the forum use cases.
//! Handlers validate the body, attach the actor and path scope, and wrap the
//! result in the `{"status": "success", "data": …}` envelope.

use actix_web::http::StatusCode;
use actix_web::{web, HttpResponse};
use rf_core::models::{NewComment, NewReply, NewThread};
use rf_services::ForumService;
use serde::Serialize;
use serde_json::{json, Value};

use crate::auth::TokenVerifier;
use crate::error::ApiError;
use crate::extract::Actor;

/// State shared across all Actix-web workers.
pub struct AppState {
    pub forum: ForumService,
    pub tokens: TokenVerifier,
}

fn success(status: StatusCode, key: &str, value: impl Serialize) -> HttpResponse {
    HttpResponse::build(status).json(json!({ "status": "success", "data": { key: value } }))
}

fn ok_without_data() -> HttpResponse {
    HttpResponse::Ok().json(json!({ "status": "success" }))
}

/// `POST /threads`
pub async fn add_thread(
    data: web::Data<AppState>,
    actor: Actor,
    body: web::Json<Value>,
) -> Result<HttpResponse, ApiError> {
    let new_thread = NewThread::from_payload(actor.id(), &body)?;
    let added = data.forum.add_thread(new_thread).await?;
    Ok(success(StatusCode::CREATED, "addedThread", added))
}

/// `GET /threads/{thread_id}`
pub async fn get_thread(
    data: web::Data<AppState>,
    path: web::Path<String>,
) -> Result<HttpResponse, ApiError> {
    let thread = data.forum.get_thread_detail(&path.into_inner()).await?;
    Ok(success(StatusCode::OK, "thread", thread))
}

/// `POST /threads/{thread_id}/comments`
pub async fn add_comment(
    data: web::Data<AppState>,
    actor: Actor,
    path: web::Path<String>,
    body: web::Json<Value>,
) -> Result<HttpResponse, ApiError> {
    let new_comment = NewComment::from_payload(&path.into_inner(), actor.id(), &body)?;
    let added = data.forum.add_comment(new_comment).await?;
    Ok(success(StatusCode::CREATED, "addedComment", added))
}

/// `DELETE /threads/{thread_id}/comments/{comment_id}`
pub async fn delete_comment(
    data: web::Data<AppState>,
    actor: Actor,
    path: web::Path<(String, String)>,
) -> Result<HttpResponse, ApiError> {
    let (thread_id, comment_id) = path.into_inner();
    data.forum.delete_comment(&thread_id, &comment_id, actor.id()).await?;
    Ok(ok_without_data())
}

/// `POST /threads/{thread_id}/comments/{comment_id}/replies`
pub async fn add_reply(
    data: web::Data<AppState>,
    actor: Actor,
    path: web::Path<(String, String)>,
    body: web::Json<Value>,
) -> Result<HttpResponse, ApiError> {
    let (thread_id, comment_id) = path.into_inner();
    let new_reply = NewReply::from_payload(&comment_id, actor.id(), &body)?;
    let added = data.forum.add_reply_in_thread(&thread_id, new_reply).await?;
    Ok(success(StatusCode::CREATED, "addedReply", added))
}

/// `DELETE /threads/{thread_id}/comments/{comment_id}/replies/{reply_id}`
pub async fn delete_reply(
    data: web::Data<AppState>,
    actor: Actor,
    path: web::Path<(String, String, String)>,
) -> Result<HttpResponse, ApiError> {
    let (thread_id, comment_id, reply_id) = path.into_inner();
    data.forum
        .delete_reply(&thread_id, &comment_id, &reply_id, actor.id())
        .await?;
    Ok(ok_without_data())
}
