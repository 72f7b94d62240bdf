//! rusty-forum/crates/rf-api/src/middleware.rs Middleware
//!
//! Request logging and cross-origin policy.

use actix_cors::Cors;
use actix_web::http::header::{AUTHORIZATION, CONTENT_TYPE};
use actix_web::middleware::Logger;

/// Access log: remote-ip "request-line" status-code response-size time-taken.
/// Records go through the `log` facade and are picked up by the tracing subscriber.
pub fn standard_middleware() -> Logger {
    Logger::new(r#"%a "%r" %s %b %Dms"#)
}

// Important if the UI and API ever live on different subdomains.
pub fn cors_policy() -> Cors {
    Cors::default()
        .allow_any_origin()
        .allowed_methods(vec!["GET", "POST", "DELETE"])
        .allowed_headers(vec![AUTHORIZATION, CONTENT_TYPE])
        .max_age(3600)
}
