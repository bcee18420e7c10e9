use std::sync::Arc;

use tokio::sync::oneshot;
use tokio::task::JoinHandle;
use tracing::{debug, error, info};

use super::{CacheError, ResultCache};
use crate::media::{MediaCriteria, TorrentItem};

/// Handle to a background caching job.
///
/// Dropping the handle detaches the job; it keeps running to completion.
pub struct CacheTask {
    cancel_tx: Option<oneshot::Sender<()>>,
    handle: JoinHandle<Result<usize, CacheError>>,
}

impl CacheTask {
    /// Spawn a job storing `items` for `media`.
    pub fn spawn(cache: Arc<dyn ResultCache>, media: MediaCriteria, items: Vec<TorrentItem>) -> Self {
        let (cancel_tx, mut cancel_rx) = oneshot::channel::<()>();

        let handle = tokio::spawn(async move {
            let result = tokio::select! {
                biased;
                // A dropped sender means the handle was detached, not cancelled
                Ok(()) = &mut cancel_rx => Err(CacheError::Cancelled),
                result = cache.store(&media, &items) => result,
            };

            match &result {
                Ok(count) => debug!("Cached {} items for {}", count, media.cache_key()),
                Err(CacheError::Cancelled) => info!("Caching for {} cancelled", media.cache_key()),
                Err(e) => error!("Failed to cache items for {}: {}", media.cache_key(), e),
            }
            result
        });

        Self {
            cancel_tx: Some(cancel_tx),
            handle,
        }
    }

    /// Ask the job to stop. Has no effect once it has finished.
    pub fn cancel(&mut self) {
        if let Some(tx) = self.cancel_tx.take() {
            let _ = tx.send(());
        }
    }

    pub fn is_finished(&self) -> bool {
        self.handle.is_finished()
    }

    /// Wait for the job and return how many items it stored.
    pub async fn wait(self) -> Result<usize, CacheError> {
        self.handle
            .await
            .map_err(|e| CacheError::TaskFailed(e.to_string()))?
    }
}
