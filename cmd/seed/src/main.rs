//! Seeds the configured SQLite database with users and a demo thread.
//!
//! Usage: `seed [username ...]` (defaults to `dicoding johndoe`).
//! Prints one `username<TAB>user id` line per registered user; the id is what
//! an access token's `id` claim must carry for that user.

use std::sync::Arc;

use rf_configs::Settings;
use rf_core::models::{NewComment, NewThread};
use rf_db_sqlite::SqliteForumRepo;
use rf_services::ForumService;
use secrecy::ExposeSecret;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let settings = Settings::load()?;
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(&settings.log.level))
        .init();

    let mut usernames: Vec<String> = std::env::args().skip(1).collect();
    if usernames.is_empty() {
        usernames = vec!["dicoding".to_string(), "johndoe".to_string()];
    }

    let repo = Arc::new(SqliteForumRepo::connect(settings.database.url.expose_secret(), 1).await?);

    let mut user_ids = Vec::with_capacity(usernames.len());
    for username in &usernames {
        let id = repo.register_user(username).await?;
        println!("{username}\t{id}");
        user_ids.push(id);
    }

    let forum = ForumService::new(repo.clone(), repo.clone(), repo);
    let thread = forum
        .add_thread(NewThread {
            title: "Welcome".to_string(),
            body: "Introduce yourself here.".to_string(),
            owner: user_ids[0].clone(),
        })
        .await?;

    for (username, owner) in usernames.iter().zip(&user_ids) {
        forum
            .add_comment(NewComment {
                thread_id: thread.id.clone(),
                owner: owner.clone(),
                content: format!("Hello, I am {username}."),
            })
            .await?;
    }

    info!(thread_id = %thread.id, users = user_ids.len(), "seed complete");
    Ok(())
}
