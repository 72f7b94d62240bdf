//! # Domain Models
//!
//! These structs represent the core entities of Rusty-Forum as they cross the
//! repository boundary. Threads, comments and replies are identified by
//! prefixed, time-ordered UUID v7 strings (`thread-…`, `comment-…`, `reply-…`).

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

use crate::error::ValidationError;
use crate::payload::Payload;

/// Generates a new identifier such as `comment-0190a1b2c3…`.
pub fn new_id(prefix: &str) -> String {
    format!("{}-{}", prefix, Uuid::now_v7().simple())
}

/// Command payload for starting a thread.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewThread {
    pub title: String,
    pub body: String,
    pub owner: String,
}

impl NewThread {
    /// Validates a request body (`title`, `body`) on behalf of `owner`.
    pub fn from_payload(owner: &str, payload: &Value) -> Result<Self, ValidationError> {
        let payload = Payload::parse("NEW_THREAD", payload, &["title", "body"], &[])?;
        Ok(Self {
            title: payload.text("title")?,
            body: payload.text("body")?,
            owner: owner.to_string(),
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AddedThread {
    pub id: String,
    pub title: String,
    pub owner: String,
}

/// Command payload for commenting on a thread.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewComment {
    pub thread_id: String,
    pub owner: String,
    pub content: String,
}

impl NewComment {
    pub fn from_payload(thread_id: &str, owner: &str, payload: &Value) -> Result<Self, ValidationError> {
        let payload = Payload::parse("NEW_COMMENT", payload, &["content"], &[])?;
        Ok(Self {
            thread_id: thread_id.to_string(),
            owner: owner.to_string(),
            content: payload.text("content")?,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AddedComment {
    pub id: String,
    pub content: String,
    pub owner: String,
}

/// Command payload for replying to a comment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewReply {
    pub comment_id: String,
    pub owner: String,
    pub content: String,
}

impl NewReply {
    pub fn from_payload(comment_id: &str, owner: &str, payload: &Value) -> Result<Self, ValidationError> {
        let payload = Payload::parse("NEW_REPLY", payload, &["content"], &[])?;
        Ok(Self {
            comment_id: comment_id.to_string(),
            owner: owner.to_string(),
            content: payload.text("content")?,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AddedReply {
    pub id: String,
    pub content: String,
    pub owner: String,
}

/// A thread as stored, with the owner's username joined in.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ThreadRecord {
    pub id: String,
    pub title: String,
    pub body: String,
    pub date: DateTime<Utc>,
    pub username: String,
}

/// A comment as stored. `content` is always the original text, even when deleted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommentRecord {
    pub id: String,
    pub username: String,
    pub date: DateTime<Utc>,
    pub content: String,
    pub is_deleted: bool,
}

/// A reply as stored, carrying the id of the comment it answers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReplyRecord {
    pub id: String,
    pub comment_id: String,
    pub username: String,
    pub date: DateTime<Utc>,
    pub content: String,
    pub is_deleted: bool,
}
