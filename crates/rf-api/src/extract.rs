//! Request extractors.

use std::future::{ready, Ready};

use actix_web::dev::Payload;
use actix_web::http::header::AUTHORIZATION;
use actix_web::{web, FromRequest, HttpRequest};

use crate::auth::TokenRejection;
use crate::error::ApiError;
use crate::handlers::AppState;

/// The user on whose behalf a mutation runs, taken from the access token's `id` claim.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Actor(String);

impl Actor {
    pub fn id(&self) -> &str {
        &self.0
    }
}

impl FromRequest for Actor {
    type Error = ApiError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        let Some(state) = req.app_data::<web::Data<AppState>>() else {
            tracing::error!("AppState is not registered, cannot verify access tokens");
            return ready(Err(ApiError::Unauthenticated));
        };

        let header = req
            .headers()
            .get(AUTHORIZATION)
            .and_then(|value| value.to_str().ok());

        let actor = match state.tokens.authenticate(header) {
            Ok(claims) => Ok(Actor(claims.id)),
            Err(TokenRejection::Missing) => Err(ApiError::Unauthenticated),
            Err(TokenRejection::Invalid) => Err(ApiError::InvalidToken),
        };
        ready(actor)
    }
}
