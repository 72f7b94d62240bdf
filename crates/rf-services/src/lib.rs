//! # rf-services
//!
//! The use-case layer of Rusty-Forum. Each public method of [`ForumService`] is
//! one operation of the forum: it runs the required verifications against the
//! repository ports, in order, and only then reads or writes.

mod authorization;
mod comments;
mod replies;
mod threads;

use std::sync::Arc;

use rf_core::traits::{CommentRepo, ReplyRepo, ThreadRepo};

/// Entry point shared by every request handler.
///
/// Holds no mutable state of its own; concurrent requests only meet in storage.
#[derive(Clone)]
pub struct ForumService {
    threads: Arc<dyn ThreadRepo>,
    comments: Arc<dyn CommentRepo>,
    replies: Arc<dyn ReplyRepo>,
}

impl ForumService {
    pub fn new(
        threads: Arc<dyn ThreadRepo>,
        comments: Arc<dyn CommentRepo>,
        replies: Arc<dyn ReplyRepo>,
    ) -> Self {
        Self { threads, comments, replies }
    }
}
