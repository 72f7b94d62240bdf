//! # rf-db-memory
//!
//! In-process implementation of the repository ports, backed by `DashMap`.
//! Nothing is persisted across restarts; intended for development runs and tests.

use std::sync::atomic::{AtomicU64, Ordering};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use rf_core::error::{AppError, Result};
use rf_core::models::{
    new_id, AddedComment, AddedReply, AddedThread, CommentRecord, NewComment, NewReply, NewThread,
    ReplyRecord, ThreadRecord,
};
use rf_core::traits::{CommentRepo, ReplyRepo, ThreadRepo};
use tracing::debug;

struct StoredThread {
    title: String,
    body: String,
    owner: String,
    date: DateTime<Utc>,
}

struct StoredComment {
    /// Insertion order, breaks ties between equal timestamps.
    seq: u64,
    thread_id: String,
    owner: String,
    content: String,
    date: DateTime<Utc>,
    is_deleted: bool,
}

struct StoredReply {
    seq: u64,
    comment_id: String,
    owner: String,
    content: String,
    date: DateTime<Utc>,
    is_deleted: bool,
}

#[derive(Default)]
pub struct MemoryForumRepo {
    /// user id -> username
    users: DashMap<String, String>,
    /// username -> user id, guards uniqueness
    usernames: DashMap<String, String>,
    threads: DashMap<String, StoredThread>,
    comments: DashMap<String, StoredComment>,
    replies: DashMap<String, StoredReply>,
    seq: AtomicU64,
}

impl MemoryForumRepo {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a user and returns its id. A taken username is a `Conflict`.
    pub async fn register_user(&self, username: &str) -> Result<String> {
        match self.usernames.entry(username.to_string()) {
            Entry::Occupied(_) => {
                Err(AppError::conflict(format!("username {username} is already taken")))
            }
            Entry::Vacant(slot) => {
                let id = new_id("user");
                slot.insert(id.clone());
                self.users.insert(id.clone(), username.to_string());
                Ok(id)
            }
        }
    }

    /// Stored state of a comment's deletion flag, for assertions and tooling.
    pub fn is_comment_deleted(&self, comment_id: &str) -> Option<bool> {
        self.comments.get(comment_id).map(|c| c.is_deleted)
    }

    pub fn is_reply_deleted(&self, reply_id: &str) -> Option<bool> {
        self.replies.get(reply_id).map(|r| r.is_deleted)
    }

    pub fn reply_count(&self) -> usize {
        self.replies.len()
    }

    fn username(&self, owner: &str) -> String {
        self.users
            .get(owner)
            .map(|name| name.value().clone())
            .unwrap_or_default()
    }

    /// Same rule the relational schema enforces with its `users` foreign key.
    fn ensure_registered(&self, owner: &str) -> Result<()> {
        if self.users.contains_key(owner) {
            Ok(())
        } else {
            Err(AppError::unknown_user("owner is not a registered user"))
        }
    }

    fn next_seq(&self) -> u64 {
        self.seq.fetch_add(1, Ordering::Relaxed)
    }
}

#[async_trait]
impl ThreadRepo for MemoryForumRepo {
    async fn add_thread(&self, new_thread: NewThread) -> Result<AddedThread> {
        self.ensure_registered(&new_thread.owner)?;
        let id = new_id("thread");
        self.threads.insert(
            id.clone(),
            StoredThread {
                title: new_thread.title.clone(),
                body: new_thread.body,
                owner: new_thread.owner.clone(),
                date: Utc::now(),
            },
        );
        Ok(AddedThread { id, title: new_thread.title, owner: new_thread.owner })
    }

    async fn verify_available(&self, thread_id: &str) -> Result<()> {
        if self.threads.contains_key(thread_id) {
            Ok(())
        } else {
            Err(AppError::not_found("thread not found"))
        }
    }

    async fn get_by_id(&self, thread_id: &str) -> Result<ThreadRecord> {
        let thread = self
            .threads
            .get(thread_id)
            .ok_or_else(|| AppError::not_found("thread not found"))?;
        Ok(ThreadRecord {
            id: thread_id.to_string(),
            title: thread.title.clone(),
            body: thread.body.clone(),
            date: thread.date,
            username: self.username(&thread.owner),
        })
    }
}

#[async_trait]
impl CommentRepo for MemoryForumRepo {
    async fn add_comment(&self, new_comment: NewComment) -> Result<AddedComment> {
        self.ensure_registered(&new_comment.owner)?;
        if !self.threads.contains_key(&new_comment.thread_id) {
            return Err(AppError::not_found("thread not found"));
        }
        let id = new_id("comment");
        self.comments.insert(
            id.clone(),
            StoredComment {
                seq: self.next_seq(),
                thread_id: new_comment.thread_id,
                owner: new_comment.owner.clone(),
                content: new_comment.content.clone(),
                date: Utc::now(),
                is_deleted: false,
            },
        );
        Ok(AddedComment { id, content: new_comment.content, owner: new_comment.owner })
    }

    async fn verify_available(&self, comment_id: &str) -> Result<()> {
        match self.comments.get(comment_id) {
            Some(c) if !c.is_deleted => Ok(()),
            _ => Err(AppError::not_found("comment not found")),
        }
    }

    async fn verify_available_in_thread(&self, comment_id: &str, thread_id: &str) -> Result<()> {
        match self.comments.get(comment_id) {
            Some(c) if c.thread_id == thread_id && !c.is_deleted => Ok(()),
            _ => Err(AppError::not_found("comment not found in this thread")),
        }
    }

    async fn verify_owner(&self, comment_id: &str, owner: &str) -> Result<()> {
        let comment = self
            .comments
            .get(comment_id)
            .ok_or_else(|| AppError::not_found("comment not found"))?;
        if comment.owner != owner {
            return Err(AppError::forbidden("you are not allowed to access this resource"));
        }
        Ok(())
    }

    async fn soft_delete(&self, comment_id: &str) -> Result<()> {
        if let Some(mut comment) = self.comments.get_mut(comment_id) {
            comment.is_deleted = true;
        }
        Ok(())
    }

    async fn list_by_thread(&self, thread_id: &str) -> Result<Vec<CommentRecord>> {
        let mut rows: Vec<(DateTime<Utc>, u64, CommentRecord)> = self
            .comments
            .iter()
            .filter(|entry| entry.thread_id == thread_id)
            .map(|entry| {
                let c = entry.value();
                let record = CommentRecord {
                    id: entry.key().clone(),
                    username: self.username(&c.owner),
                    date: c.date,
                    content: c.content.clone(),
                    is_deleted: c.is_deleted,
                };
                (c.date, c.seq, record)
            })
            .collect();
        rows.sort_by_key(|(date, seq, _)| (*date, *seq));
        Ok(rows.into_iter().map(|(_, _, record)| record).collect())
    }
}

#[async_trait]
impl ReplyRepo for MemoryForumRepo {
    async fn add_reply(&self, new_reply: NewReply) -> Result<AddedReply> {
        self.ensure_registered(&new_reply.owner)?;
        if !self.comments.contains_key(&new_reply.comment_id) {
            return Err(AppError::not_found("comment not found"));
        }
        let id = new_id("reply");
        self.replies.insert(
            id.clone(),
            StoredReply {
                seq: self.next_seq(),
                comment_id: new_reply.comment_id,
                owner: new_reply.owner.clone(),
                content: new_reply.content.clone(),
                date: Utc::now(),
                is_deleted: false,
            },
        );
        Ok(AddedReply { id, content: new_reply.content, owner: new_reply.owner })
    }

    async fn verify_available_in_comment(&self, reply_id: &str, comment_id: &str) -> Result<()> {
        match self.replies.get(reply_id) {
            Some(r) if r.comment_id == comment_id && !r.is_deleted => Ok(()),
            _ => Err(AppError::not_found("reply not found in this comment")),
        }
    }

    async fn verify_owner(&self, reply_id: &str, owner: &str) -> Result<()> {
        let reply = self
            .replies
            .get(reply_id)
            .ok_or_else(|| AppError::not_found("reply not found"))?;
        if reply.owner != owner {
            return Err(AppError::forbidden("you are not allowed to access this resource"));
        }
        Ok(())
    }

    async fn soft_delete(&self, reply_id: &str) -> Result<()> {
        if let Some(mut reply) = self.replies.get_mut(reply_id) {
            reply.is_deleted = true;
        }
        Ok(())
    }

    async fn list_by_comment_ids(&self, comment_ids: &[String]) -> Result<Vec<ReplyRecord>> {
        if comment_ids.is_empty() {
            debug!("no comment ids, skipping reply scan");
            return Ok(Vec::new());
        }

        let mut rows: Vec<(DateTime<Utc>, u64, ReplyRecord)> = self
            .replies
            .iter()
            .filter(|entry| comment_ids.contains(&entry.comment_id))
            .map(|entry| {
                let r = entry.value();
                let record = ReplyRecord {
                    id: entry.key().clone(),
                    comment_id: r.comment_id.clone(),
                    username: self.username(&r.owner),
                    date: r.date,
                    content: r.content.clone(),
                    is_deleted: r.is_deleted,
                };
                (r.date, r.seq, record)
            })
            .collect();
        rows.sort_by_key(|(date, seq, _)| (*date, *seq));
        Ok(rows.into_iter().map(|(_, _, record)| record).collect())
    }
}
