//! Source-thread lookup.

use async_trait::async_trait;
use std::sync::Arc;

use crate::error::Result;
use crate::types::thread::Thread;

/// Read access to ingested threads.
#[async_trait]
pub trait ThreadSource: Send + Sync {
    /// Get a thread by id. `Ok(None)` means the thread does not exist.
    async fn get_thread(&self, id: &str) -> Result<Option<Thread>>;

    /// Store or replace a thread.
    async fn store_thread(&self, thread: &Thread) -> Result<()>;
}

#[async_trait]
impl<T: ThreadSource + ?Sized> ThreadSource for Arc<T> {
    async fn get_thread(&self, id: &str) -> Result<Option<Thread>> {
        (**self).get_thread(id).await
    }

    async fn store_thread(&self, thread: &Thread) -> Result<()> {
        (**self).store_thread(thread).await
    }
}
