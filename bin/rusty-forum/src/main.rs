//! # Rusty-Forum Binary
//!
//! The entry point that assembles the application based on compile-time features.

use std::sync::Arc;

use actix_web::{web, App, HttpServer};
use rf_api::auth::TokenVerifier;
use rf_api::handlers::AppState;
use rf_api::middleware::{cors_policy, standard_middleware};
use rf_configs::{LogSettings, Settings};
use rf_services::ForumService;
use secrecy::ExposeSecret;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[cfg(not(any(feature = "db-sqlite", feature = "db-memory")))]
compile_error!("enable one storage backend: `db-sqlite` or `db-memory`");

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    let settings = Settings::load()?;
    init_tracing(&settings.log);

    let forum = build_forum(&settings).await?;
    let tokens = TokenVerifier::new(settings.auth.access_token_key.expose_secret().as_bytes());
    let state = web::Data::new(AppState { forum, tokens });

    let addr = (settings.server.host.clone(), settings.server.port);
    info!("Rusty-Forum starting on http://{}:{}", addr.0, addr.1);

    HttpServer::new(move || {
        App::new()
            .wrap(standard_middleware())
            .wrap(cors_policy())
            .app_data(state.clone())
            .configure(rf_api::configure_routes)
    })
    .bind(addr)?
    .run()
    .await?;

    Ok(())
}

/// `RUST_LOG` wins over the configured level when set.
fn init_tracing(log: &LogSettings) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&log.level));
    let subscriber = tracing_subscriber::fmt().with_env_filter(filter);
    if log.json {
        subscriber.json().init();
    } else {
        subscriber.init();
    }
}

#[cfg(feature = "db-sqlite")]
async fn build_forum(settings: &Settings) -> anyhow::Result<ForumService> {
    let repo = Arc::new(
        rf_db_sqlite::SqliteForumRepo::connect(
            settings.database.url.expose_secret(),
            settings.database.max_connections,
        )
        .await?,
    );
    Ok(ForumService::new(repo.clone(), repo.clone(), repo))
}

#[cfg(all(feature = "db-memory", not(feature = "db-sqlite")))]
async fn build_forum(_settings: &Settings) -> anyhow::Result<ForumService> {
    tracing::warn!("using in-memory storage, data is lost on shutdown");
    let repo = Arc::new(rf_db_memory::MemoryForumRepo::new());
    Ok(ForumService::new(repo.clone(), repo.clone(), repo))
}
