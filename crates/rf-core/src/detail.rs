//! # Thread detail view
//!
//! Read-only projections served by the thread-detail endpoint. Deleted comments
//! and replies keep their place in the view but have their content replaced by
//! a fixed placeholder; the stored text is never touched.
//!
//! The view is built leaf-first: replies, then comments holding their replies,
//! then the thread holding its comments. Nothing is mutated after construction.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::Value;

use crate::error::ValidationError;
use crate::models::{CommentRecord, ReplyRecord, ThreadRecord};
use crate::payload::Payload;

pub const DELETED_COMMENT_CONTENT: &str = "**komentar telah dihapus**";
pub const DELETED_REPLY_CONTENT: &str = "**balasan telah dihapus**";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DetailReply {
    pub id: String,
    pub content: String,
    pub date: DateTime<Utc>,
    pub username: String,
}

impl DetailReply {
    /// Validates a raw bag (`id`, `username`, `date`, `content`, `is_delete`).
    pub fn from_payload(payload: &Value) -> Result<Self, ValidationError> {
        Ok(Self::from(reply_record_from_payload(payload)?))
    }
}

impl From<ReplyRecord> for DetailReply {
    fn from(record: ReplyRecord) -> Self {
        Self {
            id: record.id,
            content: masked(record.content, record.is_deleted, DELETED_REPLY_CONTENT),
            date: record.date,
            username: record.username,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DetailComment {
    pub id: String,
    pub username: String,
    pub date: DateTime<Utc>,
    pub content: String,
    pub replies: Vec<DetailReply>,
}

impl DetailComment {
    pub fn new(record: CommentRecord, replies: Vec<DetailReply>) -> Self {
        Self {
            id: record.id,
            username: record.username,
            date: record.date,
            content: masked(record.content, record.is_deleted, DELETED_COMMENT_CONTENT),
            replies,
        }
    }

    /// Validates a raw bag; the resulting comment has no replies.
    pub fn from_payload(payload: &Value) -> Result<Self, ValidationError> {
        let payload = Payload::parse(
            "DETAIL_COMMENT",
            payload,
            &["id", "username", "date", "content"],
            &["is_delete"],
        )?;
        let record = CommentRecord {
            id: payload.text("id")?,
            username: payload.text("username")?,
            date: payload.timestamp("date")?,
            content: payload.text("content")?,
            is_deleted: payload.flag("is_delete")?,
        };
        Ok(Self::new(record, Vec::new()))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DetailThread {
    pub id: String,
    pub title: String,
    pub body: String,
    pub date: DateTime<Utc>,
    pub username: String,
    pub comments: Vec<DetailComment>,
}

impl DetailThread {
    pub fn new(record: ThreadRecord, comments: Vec<DetailComment>) -> Self {
        Self {
            id: record.id,
            title: record.title,
            body: record.body,
            date: record.date,
            username: record.username,
            comments,
        }
    }

    /// Validates a raw bag (`id`, `title`, `body`, `date`, `username`); the thread has no comments.
    pub fn from_payload(payload: &Value) -> Result<Self, ValidationError> {
        let payload = Payload::parse(
            "DETAIL_THREAD",
            payload,
            &["id", "title", "body", "date", "username"],
            &[],
        )?;
        let record = ThreadRecord {
            id: payload.text("id")?,
            title: payload.text("title")?,
            body: payload.text("body")?,
            date: payload.timestamp("date")?,
            username: payload.text("username")?,
        };
        Ok(Self::new(record, Vec::new()))
    }
}

/// Validates a raw reply bag into a record. `comment_id` is optional here so
/// that bare detail payloads validate too.
pub fn reply_record_from_payload(payload: &Value) -> Result<ReplyRecord, ValidationError> {
    let payload = Payload::parse(
        "DETAIL_REPLY",
        payload,
        &["id", "username", "date", "content"],
        &["is_delete"],
    )?;
    Ok(ReplyRecord {
        id: payload.text("id")?,
        comment_id: payload.optional_text("comment_id")?.unwrap_or_default(),
        username: payload.text("username")?,
        date: payload.timestamp("date")?,
        content: payload.text("content")?,
        is_deleted: payload.flag("is_delete")?,
    })
}

/// Joins a thread with its comments and the replies of those comments.
///
/// Comments keep the order they were fetched in. Each comment receives the
/// replies whose `comment_id` matches its id, in fetch order; replies pointing
/// at a comment not in `comments` are dropped.
pub fn assemble_thread(
    thread: ThreadRecord,
    comments: Vec<CommentRecord>,
    replies: Vec<ReplyRecord>,
) -> DetailThread {
    let mut by_comment: HashMap<String, Vec<DetailReply>> = HashMap::new();
    for reply in replies {
        by_comment
            .entry(reply.comment_id.clone())
            .or_default()
            .push(DetailReply::from(reply));
    }

    let comments = comments
        .into_iter()
        .map(|comment| {
            let replies = by_comment.remove(&comment.id).unwrap_or_default();
            DetailComment::new(comment, replies)
        })
        .collect();

    DetailThread::new(thread, comments)
}

fn masked(content: String, is_deleted: bool, placeholder: &str) -> String {
    if is_deleted {
        placeholder.to_string()
    } else {
        content
    }
}
