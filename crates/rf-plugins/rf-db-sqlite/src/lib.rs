//! # rf-db-sqlite Implementation
//!
//! This module implements the data mapping between the SQLite relational model
//! and the `rf-core` domain models. One repo value serves all three ports.

use std::str::FromStr;

use anyhow::Context;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rf_core::error::{AppError, Result};
use rf_core::models::{
    new_id, AddedComment, AddedReply, AddedThread, CommentRecord, NewComment, NewReply, NewThread,
    ReplyRecord, ThreadRecord,
};
use rf_core::traits::{CommentRepo, ReplyRepo, ThreadRepo};
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};
use sqlx::{FromRow, QueryBuilder, Sqlite};
use tracing::{debug, info};

pub struct SqliteForumRepo {
    pool: SqlitePool,
}

#[derive(FromRow)]
struct ThreadRow {
    id: String,
    title: String,
    body: String,
    date: DateTime<Utc>,
    username: String,
}

impl From<ThreadRow> for ThreadRecord {
    fn from(row: ThreadRow) -> Self {
        ThreadRecord {
            id: row.id,
            title: row.title,
            body: row.body,
            date: row.date,
            username: row.username,
        }
    }
}

#[derive(FromRow)]
struct CommentRow {
    id: String,
    username: String,
    date: DateTime<Utc>,
    content: String,
    is_delete: bool,
}

impl From<CommentRow> for CommentRecord {
    fn from(row: CommentRow) -> Self {
        CommentRecord {
            id: row.id,
            username: row.username,
            date: row.date,
            content: row.content,
            is_deleted: row.is_delete,
        }
    }
}

#[derive(FromRow)]
struct ReplyRow {
    id: String,
    comment_id: String,
    username: String,
    date: DateTime<Utc>,
    content: String,
    is_delete: bool,
}

impl From<ReplyRow> for ReplyRecord {
    fn from(row: ReplyRow) -> Self {
        ReplyRecord {
            id: row.id,
            comment_id: row.comment_id,
            username: row.username,
            date: row.date,
            content: row.content,
            is_deleted: row.is_delete,
        }
    }
}

impl SqliteForumRepo {
    /// Opens (creating if needed) the database at `url` and applies pending migrations.
    ///
    /// # Developer Note
    /// Every connection to `sqlite::memory:` gets its own empty database, so
    /// in-memory pools are pinned to a single connection that never expires.
    pub async fn connect(url: &str, max_connections: u32) -> anyhow::Result<Self> {
        let options = SqliteConnectOptions::from_str(url)
            .with_context(|| format!("invalid sqlite url {url}"))?
            .create_if_missing(true)
            .foreign_keys(true);

        let mut pool_options = SqlitePoolOptions::new().max_connections(max_connections);
        if url.contains(":memory:") {
            pool_options = pool_options
                .max_connections(1)
                .idle_timeout(None)
                .max_lifetime(None);
        }

        let pool = pool_options
            .connect_with(options)
            .await
            .context("failed to open sqlite database")?;
        sqlx::migrate!("./migrations")
            .run(&pool)
            .await
            .context("failed to run migrations")?;

        info!(max_connections, "sqlite repository ready");
        Ok(Self { pool })
    }

    /// Registers a user and returns its id. A taken username is a `Conflict`.
    pub async fn register_user(&self, username: &str) -> Result<String> {
        let id = new_id("user");
        let inserted = sqlx::query("INSERT INTO users (id, username) VALUES (?, ?)")
            .bind(&id)
            .bind(username)
            .execute(&self.pool)
            .await;

        match inserted {
            Ok(_) => Ok(id),
            Err(sqlx::Error::Database(db)) if db.is_unique_violation() => {
                Err(AppError::conflict(format!("username {username} is already taken")))
            }
            Err(err) => Err(anyhow::Error::new(err).context("insert user").into()),
        }
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    async fn user_exists(&self, user_id: &str) -> Result<bool> {
        let found: Option<String> = sqlx::query_scalar("SELECT id FROM users WHERE id = ?")
            .bind(user_id)
            .fetch_optional(&self.pool)
            .await
            .context("look up user")?;
        Ok(found.is_some())
    }

    /// Maps a failed insert to the error the caller should see.
    ///
    /// A foreign-key failure means either the owner or the parent row is
    /// missing; the owner is checked first so both backends agree on which
    /// one is reported.
    async fn rejected_insert(
        &self,
        err: sqlx::Error,
        owner: &str,
        missing_parent: &'static str,
        action: &'static str,
    ) -> AppError {
        let is_fk = matches!(&err, sqlx::Error::Database(db) if db.is_foreign_key_violation());
        if !is_fk {
            return anyhow::Error::new(err).context(action).into();
        }

        match self.user_exists(owner).await {
            Ok(false) => AppError::unknown_user("owner is not a registered user"),
            Ok(true) => AppError::not_found(missing_parent),
            Err(lookup) => lookup,
        }
    }
}

#[async_trait]
impl ThreadRepo for SqliteForumRepo {
    async fn add_thread(&self, new_thread: NewThread) -> Result<AddedThread> {
        let id = new_id("thread");
        let inserted = sqlx::query("INSERT INTO threads (id, title, body, owner, date) VALUES (?, ?, ?, ?, ?)")
            .bind(&id)
            .bind(&new_thread.title)
            .bind(&new_thread.body)
            .bind(&new_thread.owner)
            .bind(Utc::now())
            .execute(&self.pool)
            .await;
        if let Err(err) = inserted {
            return Err(self
                .rejected_insert(err, &new_thread.owner, "user not found", "insert thread")
                .await);
        }

        Ok(AddedThread { id, title: new_thread.title, owner: new_thread.owner })
    }

    async fn verify_available(&self, thread_id: &str) -> Result<()> {
        let found: Option<String> = sqlx::query_scalar("SELECT id FROM threads WHERE id = ?")
            .bind(thread_id)
            .fetch_optional(&self.pool)
            .await
            .context("look up thread")?;

        found.map(|_| ()).ok_or_else(|| AppError::not_found("thread not found"))
    }

    async fn get_by_id(&self, thread_id: &str) -> Result<ThreadRecord> {
        let row: Option<ThreadRow> = sqlx::query_as(
            "SELECT t.id, t.title, t.body, t.date, u.username
             FROM threads t
             JOIN users u ON t.owner = u.id
             WHERE t.id = ?",
        )
        .bind(thread_id)
        .fetch_optional(&self.pool)
        .await
        .context("fetch thread")?;

        row.map(ThreadRecord::from)
            .ok_or_else(|| AppError::not_found("thread not found"))
    }
}

#[async_trait]
impl CommentRepo for SqliteForumRepo {
    async fn add_comment(&self, new_comment: NewComment) -> Result<AddedComment> {
        let id = new_id("comment");
        let inserted = sqlx::query("INSERT INTO comments (id, thread_id, owner, content, date) VALUES (?, ?, ?, ?, ?)")
            .bind(&id)
            .bind(&new_comment.thread_id)
            .bind(&new_comment.owner)
            .bind(&new_comment.content)
            .bind(Utc::now())
            .execute(&self.pool)
            .await;
        if let Err(err) = inserted {
            return Err(self
                .rejected_insert(err, &new_comment.owner, "thread not found", "insert comment")
                .await);
        }

        Ok(AddedComment { id, content: new_comment.content, owner: new_comment.owner })
    }

    async fn verify_available(&self, comment_id: &str) -> Result<()> {
        let found: Option<String> =
            sqlx::query_scalar("SELECT id FROM comments WHERE id = ? AND is_delete = 0")
                .bind(comment_id)
                .fetch_optional(&self.pool)
                .await
                .context("look up comment")?;

        found.map(|_| ()).ok_or_else(|| AppError::not_found("comment not found"))
    }

    async fn verify_available_in_thread(&self, comment_id: &str, thread_id: &str) -> Result<()> {
        let found: Option<String> = sqlx::query_scalar(
            "SELECT id FROM comments WHERE id = ? AND thread_id = ? AND is_delete = 0",
        )
        .bind(comment_id)
        .bind(thread_id)
        .fetch_optional(&self.pool)
        .await
        .context("look up comment in thread")?;

        found
            .map(|_| ())
            .ok_or_else(|| AppError::not_found("comment not found in this thread"))
    }

    async fn verify_owner(&self, comment_id: &str, owner: &str) -> Result<()> {
        let stored: Option<String> = sqlx::query_scalar("SELECT owner FROM comments WHERE id = ?")
            .bind(comment_id)
            .fetch_optional(&self.pool)
            .await
            .context("look up comment owner")?;

        match stored {
            None => Err(AppError::not_found("comment not found")),
            Some(stored) if stored != owner => {
                Err(AppError::forbidden("you are not allowed to access this resource"))
            }
            Some(_) => Ok(()),
        }
    }

    async fn soft_delete(&self, comment_id: &str) -> Result<()> {
        sqlx::query("UPDATE comments SET is_delete = 1 WHERE id = ?")
            .bind(comment_id)
            .execute(&self.pool)
            .await
            .context("soft delete comment")?;
        Ok(())
    }

    async fn list_by_thread(&self, thread_id: &str) -> Result<Vec<CommentRecord>> {
        let rows: Vec<CommentRow> = sqlx::query_as(
            "SELECT c.id, u.username, c.date, c.content, c.is_delete
             FROM comments c
             JOIN users u ON c.owner = u.id
             WHERE c.thread_id = ?
             ORDER BY c.date ASC, c.rowid ASC",
        )
        .bind(thread_id)
        .fetch_all(&self.pool)
        .await
        .context("list comments")?;

        Ok(rows.into_iter().map(CommentRecord::from).collect())
    }
}

#[async_trait]
impl ReplyRepo for SqliteForumRepo {
    async fn add_reply(&self, new_reply: NewReply) -> Result<AddedReply> {
        let id = new_id("reply");
        let inserted = sqlx::query("INSERT INTO replies (id, comment_id, owner, content, date) VALUES (?, ?, ?, ?, ?)")
            .bind(&id)
            .bind(&new_reply.comment_id)
            .bind(&new_reply.owner)
            .bind(&new_reply.content)
            .bind(Utc::now())
            .execute(&self.pool)
            .await;
        if let Err(err) = inserted {
            return Err(self
                .rejected_insert(err, &new_reply.owner, "comment not found", "insert reply")
                .await);
        }

        Ok(AddedReply { id, content: new_reply.content, owner: new_reply.owner })
    }

    async fn verify_available_in_comment(&self, reply_id: &str, comment_id: &str) -> Result<()> {
        let found: Option<String> = sqlx::query_scalar(
            "SELECT id FROM replies WHERE id = ? AND comment_id = ? AND is_delete = 0",
        )
        .bind(reply_id)
        .bind(comment_id)
        .fetch_optional(&self.pool)
        .await
        .context("look up reply in comment")?;

        found
            .map(|_| ())
            .ok_or_else(|| AppError::not_found("reply not found in this comment"))
    }

    async fn verify_owner(&self, reply_id: &str, owner: &str) -> Result<()> {
        let stored: Option<String> = sqlx::query_scalar("SELECT owner FROM replies WHERE id = ?")
            .bind(reply_id)
            .fetch_optional(&self.pool)
            .await
            .context("look up reply owner")?;

        match stored {
            None => Err(AppError::not_found("reply not found")),
            Some(stored) if stored != owner => {
                Err(AppError::forbidden("you are not allowed to access this resource"))
            }
            Some(_) => Ok(()),
        }
    }

    async fn soft_delete(&self, reply_id: &str) -> Result<()> {
        sqlx::query("UPDATE replies SET is_delete = 1 WHERE id = ?")
            .bind(reply_id)
            .execute(&self.pool)
            .await
            .context("soft delete reply")?;
        Ok(())
    }

    async fn list_by_comment_ids(&self, comment_ids: &[String]) -> Result<Vec<ReplyRecord>> {
        if comment_ids.is_empty() {
            debug!("no comment ids, skipping reply query");
            return Ok(Vec::new());
        }

        let mut query = QueryBuilder::<Sqlite>::new(
            "SELECT r.id, r.comment_id, u.username, r.date, r.content, r.is_delete
             FROM replies r
             JOIN users u ON r.owner = u.id
             WHERE r.comment_id IN (",
        );
        let mut ids = query.separated(", ");
        for id in comment_ids {
            ids.push_bind(id.as_str());
        }
        ids.push_unseparated(") ORDER BY r.date ASC, r.rowid ASC");

        let rows: Vec<ReplyRow> = query
            .build_query_as()
            .fetch_all(&self.pool)
            .await
            .context("list replies")?;

        Ok(rows.into_iter().map(ReplyRecord::from).collect())
    }
}
