//! # Core Traits (Ports)
//!
//! Any storage plugin must implement these traits to be used by the binary.
//! The use cases depend only on these contracts, never on a concrete engine.

use async_trait::async_trait;

use crate::error::Result;
use crate::models::{
    AddedComment, AddedReply, AddedThread, CommentRecord, NewComment, NewReply, NewThread,
    ReplyRecord, ThreadRecord,
};

/// Persistence contract for threads.
#[cfg_attr(any(test, feature = "testing"), mockall::automock)]
#[async_trait]
pub trait ThreadRepo: Send + Sync {
    async fn add_thread(&self, new_thread: NewThread) -> Result<AddedThread>;

    /// Fails with `NotFound` when no thread has this id.
    async fn verify_available(&self, thread_id: &str) -> Result<()>;

    /// Thread with the owner's username joined in.
    async fn get_by_id(&self, thread_id: &str) -> Result<ThreadRecord>;
}

/// Persistence contract for comments.
#[cfg_attr(any(test, feature = "testing"), mockall::automock)]
#[async_trait]
pub trait CommentRepo: Send + Sync {
    async fn add_comment(&self, new_comment: NewComment) -> Result<AddedComment>;

    /// Fails with `NotFound` unless the comment exists and is not deleted.
    async fn verify_available(&self, comment_id: &str) -> Result<()>;

    /// Fails with `NotFound` unless the comment exists, belongs to the thread and is not deleted.
    async fn verify_available_in_thread(&self, comment_id: &str, thread_id: &str) -> Result<()>;

    /// `NotFound` for an unknown comment, `Forbidden` when `owner` differs.
    async fn verify_owner(&self, comment_id: &str, owner: &str) -> Result<()>;

    /// Flags the comment deleted. Stored content is left as is.
    async fn soft_delete(&self, comment_id: &str) -> Result<()>;

    /// Every comment of the thread, deleted ones included, oldest first.
    async fn list_by_thread(&self, thread_id: &str) -> Result<Vec<CommentRecord>>;
}

/// Persistence contract for replies.
#[cfg_attr(any(test, feature = "testing"), mockall::automock)]
#[async_trait]
pub trait ReplyRepo: Send + Sync {
    async fn add_reply(&self, new_reply: NewReply) -> Result<AddedReply>;

    /// Fails with `NotFound` unless the reply exists, belongs to the comment and is not deleted.
    async fn verify_available_in_comment(&self, reply_id: &str, comment_id: &str) -> Result<()>;

    /// `NotFound` for an unknown reply, `Forbidden` when `owner` differs.
    async fn verify_owner(&self, reply_id: &str, owner: &str) -> Result<()>;

    async fn soft_delete(&self, reply_id: &str) -> Result<()>;

    /// Replies of all the given comments, deleted ones included, oldest first.
    /// An empty id list yields an empty list without touching storage; unknown
    /// ids simply contribute nothing.
    async fn list_by_comment_ids(&self, comment_ids: &[String]) -> Result<Vec<ReplyRecord>>;
}
