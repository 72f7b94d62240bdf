//! Thread creation and the thread-detail read.

use rf_core::detail::{assemble_thread, DetailThread};
use rf_core::error::Result;
use rf_core::models::{AddedThread, NewThread};
use tracing::{debug, info, instrument};

use crate::ForumService;

impl ForumService {
    #[instrument(skip(self, new_thread), fields(owner = %new_thread.owner))]
    pub async fn add_thread(&self, new_thread: NewThread) -> Result<AddedThread> {
        let added = self.threads.add_thread(new_thread).await?;
        info!(thread_id = %added.id, "thread created");
        Ok(added)
    }

    /// Builds the full thread view: thread, its comments oldest first, and each
    /// comment's replies oldest first, with deleted content masked.
    ///
    /// Replies for all comments are fetched in one call. A thread without
    /// comments never reaches the reply store.
    #[instrument(skip(self))]
    pub async fn get_thread_detail(&self, thread_id: &str) -> Result<DetailThread> {
        self.threads.verify_available(thread_id).await?;

        let thread = self.threads.get_by_id(thread_id).await?;
        let comments = self.comments.list_by_thread(thread_id).await?;
        if comments.is_empty() {
            debug!("thread has no comments, skipping reply fetch");
            return Ok(DetailThread::new(thread, Vec::new()));
        }

        let comment_ids: Vec<String> = comments.iter().map(|c| c.id.clone()).collect();
        let replies = self.replies.list_by_comment_ids(&comment_ids).await?;
        debug!(comments = comments.len(), replies = replies.len(), "assembling thread detail");

        Ok(assemble_thread(thread, comments, replies))
    }
}
