//! Comment creation and soft deletion.

use rf_core::error::Result;
use rf_core::models::{AddedComment, NewComment};
use tracing::{info, instrument};

use crate::ForumService;

impl ForumService {
    /// Adds a comment to an existing thread.
    #[instrument(skip(self, new_comment), fields(thread_id = %new_comment.thread_id, owner = %new_comment.owner))]
    pub async fn add_comment(&self, new_comment: NewComment) -> Result<AddedComment> {
        self.threads.verify_available(&new_comment.thread_id).await?;
        let added = self.comments.add_comment(new_comment).await?;
        info!(comment_id = %added.id, "comment created");
        Ok(added)
    }

    /// Soft-deletes a comment once the thread, the comment within it, and the
    /// actor's ownership have all been confirmed.
    #[instrument(skip(self))]
    pub async fn delete_comment(&self, thread_id: &str, comment_id: &str, actor: &str) -> Result<()> {
        self.authorize_comment_deletion(thread_id, comment_id, actor).await?;
        self.comments.soft_delete(comment_id).await?;
        info!("comment deleted");
        Ok(())
    }
}
