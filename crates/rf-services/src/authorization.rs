//! Delete-authorization chain.
//!
//! Scope first, then the target inside that scope, ownership last. Each step
//! short-circuits, so an unknown target is always reported as `NotFound` and
//! ownership is only ever compared against a record known to exist.

use rf_core::error::{AppError, Result};
use tracing::warn;

use crate::ForumService;

impl ForumService {
    pub(crate) async fn authorize_comment_deletion(
        &self,
        thread_id: &str,
        comment_id: &str,
        actor: &str,
    ) -> Result<()> {
        self.threads.verify_available(thread_id).await?;
        self.comments.verify_available_in_thread(comment_id, thread_id).await?;
        self.comments
            .verify_owner(comment_id, actor)
            .await
            .inspect_err(|err| log_refusal(err, "comment", comment_id, actor))
    }

    pub(crate) async fn authorize_reply_deletion(
        &self,
        thread_id: &str,
        comment_id: &str,
        reply_id: &str,
        actor: &str,
    ) -> Result<()> {
        self.threads.verify_available(thread_id).await?;
        self.comments.verify_available_in_thread(comment_id, thread_id).await?;
        self.replies.verify_available_in_comment(reply_id, comment_id).await?;
        self.replies
            .verify_owner(reply_id, actor)
            .await
            .inspect_err(|err| log_refusal(err, "reply", reply_id, actor))
    }
}

fn log_refusal(err: &AppError, target: &str, id: &str, actor: &str) {
    if matches!(err, AppError::Forbidden(_)) {
        warn!(target_kind = target, id, actor, "delete refused: actor is not the owner");
    }
}
