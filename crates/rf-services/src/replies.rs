//! Reply creation and soft deletion.

use rf_core::error::Result;
use rf_core::models::{AddedReply, NewReply};
use tracing::{info, instrument};

use crate::ForumService;

impl ForumService {
    /// Adds a reply to a comment that exists and is not deleted.
    #[instrument(skip(self, new_reply), fields(comment_id = %new_reply.comment_id, owner = %new_reply.owner))]
    pub async fn add_reply(&self, new_reply: NewReply) -> Result<AddedReply> {
        self.comments.verify_available(&new_reply.comment_id).await?;
        self.insert_reply(new_reply).await
    }

    /// Like [`ForumService::add_reply`], but also requires the comment to sit in `thread_id`.
    #[instrument(skip(self, new_reply), fields(comment_id = %new_reply.comment_id, owner = %new_reply.owner))]
    pub async fn add_reply_in_thread(&self, thread_id: &str, new_reply: NewReply) -> Result<AddedReply> {
        self.threads.verify_available(thread_id).await?;
        self.comments
            .verify_available_in_thread(&new_reply.comment_id, thread_id)
            .await?;
        self.insert_reply(new_reply).await
    }

    /// Soft-deletes a reply once the thread, the comment, the reply within
    /// that comment, and the actor's ownership have all been confirmed.
    #[instrument(skip(self))]
    pub async fn delete_reply(
        &self,
        thread_id: &str,
        comment_id: &str,
        reply_id: &str,
        actor: &str,
    ) -> Result<()> {
        self.authorize_reply_deletion(thread_id, comment_id, reply_id, actor)
            .await?;
        self.replies.soft_delete(reply_id).await?;
        info!("reply deleted");
        Ok(())
    }

    async fn insert_reply(&self, new_reply: NewReply) -> Result<AddedReply> {
        let added = self.replies.add_reply(new_reply).await?;
        info!(reply_id = %added.id, "reply created");
        Ok(added)
    }
}
