use std::sync::Arc;

use actix_web::http::header::AUTHORIZATION;
use actix_web::{test, web, App};
use jsonwebtoken::{encode, get_current_timestamp, EncodingKey, Header};
use rf_api::auth::TokenVerifier;
use rf_api::handlers::AppState;
use rf_db_memory::MemoryForumRepo;
use rf_services::ForumService;
use serde_json::{json, Value};

const ACCESS_KEY: &[u8] = b"test-access-token-key";

struct Harness {
    repo: Arc<MemoryForumRepo>,
    /// user ids
    dicoding: String,
    johndoe: String,
}

impl Harness {
    fn token_for(&self, user_id: &str) -> String {
        sign(ACCESS_KEY, user_id, get_current_timestamp() + 3600)
    }
}

fn sign(key: &[u8], user_id: &str, exp: u64) -> String {
    encode(&Header::default(), &json!({ "id": user_id, "exp": exp }), &EncodingKey::from_secret(key))
        .unwrap()
}

async fn harness() -> (Harness, web::Data<AppState>) {
    let repo = Arc::new(MemoryForumRepo::new());
    let dicoding = repo.register_user("dicoding").await.unwrap();
    let johndoe = repo.register_user("johndoe").await.unwrap();
    let forum = ForumService::new(repo.clone(), repo.clone(), repo.clone());
    let state = AppState { forum, tokens: TokenVerifier::new(ACCESS_KEY) };
    (Harness { repo, dicoding, johndoe }, web::Data::new(state))
}

macro_rules! app {
    ($state:expr) => {
        test::init_service(App::new().app_data($state.clone()).configure(rf_api::configure_routes)).await
    };
}

fn bearer(token: &str) -> (actix_web::http::header::HeaderName, String) {
    (AUTHORIZATION, format!("Bearer {token}"))
}

fn post(uri: &str, token: &str, body: Value) -> test::TestRequest {
    test::TestRequest::post().uri(uri).insert_header(bearer(token)).set_json(body)
}

fn delete(uri: &str, token: &str) -> test::TestRequest {
    test::TestRequest::delete().uri(uri).insert_header(bearer(token))
}

#[actix_web::test]
async fn add_thread_returns_201_with_owner() {
    let (h, state) = harness().await;
    let app = app!(state);

    let resp = test::call_service(
        &app,
        post("/threads", &h.token_for(&h.dicoding), json!({ "title": "sebuah thread", "body": "sebuah body thread" }))
            .to_request(),
    )
    .await;
    assert_eq!(resp.status(), 201);

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["status"], "success");
    assert_eq!(body["data"]["addedThread"]["title"], "sebuah thread");
    assert_eq!(body["data"]["addedThread"]["owner"], h.dicoding.as_str());
}

#[actix_web::test]
async fn add_thread_without_token_is_401() {
    let (_h, state) = harness().await;
    let app = app!(state);

    let req = test::TestRequest::post()
        .uri("/threads")
        .set_json(json!({ "title": "t", "body": "b" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 401);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["status"], "fail");
    assert_eq!(body["message"], "Missing authentication");
}

#[actix_web::test]
async fn token_signed_with_another_key_is_401() {
    let (h, state) = harness().await;
    let app = app!(state);

    let forged = sign(b"someone-elses-key", &h.dicoding, get_current_timestamp() + 3600);
    let resp = test::call_service(&app, post("/threads", &forged, json!({ "title": "t", "body": "b" })).to_request()).await;
    assert_eq!(resp.status(), 401);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["message"], "invalid access token");
}

#[actix_web::test]
async fn expired_token_is_401() {
    let (h, state) = harness().await;
    let app = app!(state);

    let expired = sign(ACCESS_KEY, &h.dicoding, get_current_timestamp() - 3600);
    let resp = test::call_service(&app, post("/threads", &expired, json!({ "title": "t", "body": "b" })).to_request()).await;
    assert_eq!(resp.status(), 401);
}

#[actix_web::test]
async fn token_for_unregistered_user_is_401() {
    let (h, state) = harness().await;
    let app = app!(state);

    let resp = test::call_service(
        &app,
        post("/threads", &h.token_for("user-ghost"), json!({ "title": "t", "body": "b" })).to_request(),
    )
    .await;
    assert_eq!(resp.status(), 401);
}

#[actix_web::test]
async fn raw_user_id_is_not_a_credential() {
    let (h, state) = harness().await;
    let app = app!(state);

    let body: Value = test::call_and_read_body_json(
        &app,
        post("/threads", &h.token_for(&h.dicoding), json!({ "title": "t", "body": "b" })).to_request(),
    )
    .await;
    let thread_id = body["data"]["addedThread"]["id"].as_str().unwrap().to_string();
    let body: Value = test::call_and_read_body_json(
        &app,
        post(&format!("/threads/{thread_id}/comments"), &h.token_for(&h.dicoding), json!({ "content": "c" }))
            .to_request(),
    )
    .await;
    let comment_id = body["data"]["addedComment"]["id"].as_str().unwrap().to_string();

    let req = test::TestRequest::delete()
        .uri(&format!("/threads/{thread_id}/comments/{comment_id}"))
        .insert_header((AUTHORIZATION, h.dicoding.as_str()))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 401);
    assert_eq!(h.repo.is_comment_deleted(&comment_id), Some(false));
}

#[actix_web::test]
async fn add_thread_with_missing_body_is_400() {
    let (h, state) = harness().await;
    let app = app!(state);

    let resp = test::call_service(&app, post("/threads", &h.token_for(&h.dicoding), json!({ "title": "t" })).to_request()).await;
    assert_eq!(resp.status(), 400);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["status"], "fail");
    assert_eq!(
        body["message"],
        "cannot create a new thread because a required property is missing"
    );
}

#[actix_web::test]
async fn add_thread_with_mistyped_title_is_400() {
    let (h, state) = harness().await;
    let app = app!(state);

    let resp = test::call_service(
        &app,
        post("/threads", &h.token_for(&h.dicoding), json!({ "title": 123, "body": "b" })).to_request(),
    )
    .await;
    assert_eq!(resp.status(), 400);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(
        body["message"],
        "cannot create a new thread because a property has the wrong data type"
    );
}

#[actix_web::test]
async fn comment_on_missing_thread_is_404() {
    let (h, state) = harness().await;
    let app = app!(state);

    let resp = test::call_service(
        &app,
        post("/threads/thread-xxx/comments", &h.token_for(&h.dicoding), json!({ "content": "c" })).to_request(),
    )
    .await;
    assert_eq!(resp.status(), 404);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["message"], "thread not found");
}

#[actix_web::test]
async fn get_missing_thread_is_404() {
    let (_h, state) = harness().await;
    let app = app!(state);

    let resp = test::call_service(&app, test::TestRequest::get().uri("/threads/thread-xxx").to_request()).await;
    assert_eq!(resp.status(), 404);
}

#[actix_web::test]
async fn full_discussion_round_trip() {
    let (h, state) = harness().await;
    let app = app!(state);

    let body: Value = test::call_and_read_body_json(
        &app,
        post("/threads", &h.token_for(&h.dicoding), json!({ "title": "Judul Thread", "body": "Body Thread" })).to_request(),
    )
    .await;
    let thread_id = body["data"]["addedThread"]["id"].as_str().unwrap().to_string();

    let body: Value = test::call_and_read_body_json(
        &app,
        post(&format!("/threads/{thread_id}/comments"), &h.token_for(&h.johndoe), json!({ "content": "Komentar A" }))
            .to_request(),
    )
    .await;
    let first = body["data"]["addedComment"]["id"].as_str().unwrap().to_string();
    assert_eq!(body["data"]["addedComment"]["content"], "Komentar A");

    let body: Value = test::call_and_read_body_json(
        &app,
        post(&format!("/threads/{thread_id}/comments"), &h.token_for(&h.dicoding), json!({ "content": "Komentar B" }))
            .to_request(),
    )
    .await;
    let second = body["data"]["addedComment"]["id"].as_str().unwrap().to_string();

    let resp = test::call_service(
        &app,
        post(
            &format!("/threads/{thread_id}/comments/{first}/replies"),
            &h.token_for(&h.dicoding),
            json!({ "content": "Balasan A" }),
        )
        .to_request(),
    )
    .await;
    assert_eq!(resp.status(), 201);
    let body: Value = test::read_body_json(resp).await;
    let reply_id = body["data"]["addedReply"]["id"].as_str().unwrap().to_string();

    // johndoe cannot delete dicoding's comment
    let resp = test::call_service(&app, delete(&format!("/threads/{thread_id}/comments/{second}"), &h.token_for(&h.johndoe)).to_request()).await;
    assert_eq!(resp.status(), 403);
    assert_eq!(h.repo.is_comment_deleted(&second), Some(false));

    let resp = test::call_service(&app, delete(&format!("/threads/{thread_id}/comments/{second}"), &h.token_for(&h.dicoding)).to_request()).await;
    assert_eq!(resp.status(), 200);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["status"], "success");

    // a second delete no longer finds the comment
    let resp = test::call_service(&app, delete(&format!("/threads/{thread_id}/comments/{second}"), &h.token_for(&h.dicoding)).to_request()).await;
    assert_eq!(resp.status(), 404);
    assert_eq!(h.repo.is_comment_deleted(&second), Some(true));

    let resp = test::call_service(
        &app,
        delete(&format!("/threads/{thread_id}/comments/{first}/replies/{reply_id}"), &h.token_for(&h.johndoe)).to_request(),
    )
    .await;
    assert_eq!(resp.status(), 403);

    let resp = test::call_service(
        &app,
        delete(&format!("/threads/{thread_id}/comments/{first}/replies/{reply_id}"), &h.token_for(&h.dicoding)).to_request(),
    )
    .await;
    assert_eq!(resp.status(), 200);

    let body: Value = test::call_and_read_body_json(
        &app,
        test::TestRequest::get().uri(&format!("/threads/{thread_id}")).to_request(),
    )
    .await;
    let thread = &body["data"]["thread"];
    assert_eq!(thread["title"], "Judul Thread");
    assert_eq!(thread["username"], "dicoding");

    let comments = thread["comments"].as_array().unwrap();
    assert_eq!(comments.len(), 2);
    assert_eq!(comments[0]["username"], "johndoe");
    assert_eq!(comments[0]["content"], "Komentar A");
    assert_eq!(comments[0]["replies"][0]["content"], "**balasan telah dihapus**");
    assert_eq!(comments[1]["content"], "**komentar telah dihapus**");
    assert_eq!(comments[1]["replies"], json!([]));
}

#[actix_web::test]
async fn reply_to_unknown_comment_is_404_and_nothing_is_stored() {
    let (h, state) = harness().await;
    let app = app!(state);

    let body: Value = test::call_and_read_body_json(
        &app,
        post("/threads", &h.token_for(&h.dicoding), json!({ "title": "t", "body": "b" })).to_request(),
    )
    .await;
    let thread_id = body["data"]["addedThread"]["id"].as_str().unwrap().to_string();

    let resp = test::call_service(
        &app,
        post(&format!("/threads/{thread_id}/comments/missing/replies"), &h.token_for(&h.dicoding), json!({ "content": "r" }))
            .to_request(),
    )
    .await;
    assert_eq!(resp.status(), 404);
    assert_eq!(h.repo.reply_count(), 0);
}

#[actix_web::test]
async fn malformed_json_gets_fail_envelope() {
    let (h, state) = harness().await;
    let app = app!(state);

    let req = test::TestRequest::post()
        .uri("/threads")
        .insert_header(bearer(&h.token_for(&h.dicoding)))
        .insert_header(("content-type", "application/json"))
        .set_payload("{ not json")
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 400);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["status"], "fail");
}
