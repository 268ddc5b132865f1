use crate::platform_adapter::PlatformAdapter;
use crate::types::{IngestData, IngestStatOptions, IngestStatResult};
use std::sync::{Arc, Mutex};

/// Stats interface handle, obtained from [`crate::platform::Platform`].
pub struct Stats<A: PlatformAdapter> {
    adapter: Arc<Mutex<A>>,
}

impl<A: PlatformAdapter> Clone for Stats<A> {
    fn clone(&self) -> Self {
        Stats {
            adapter: self.adapter.clone(),
        }
    }
}

impl<A: PlatformAdapter> Stats<A> {
    pub(crate) fn new(adapter: Arc<Mutex<A>>) -> Stats<A> {
        Stats { adapter }
    }

    pub fn ingest<F>(
        &self,
        local_user_id: &str,
        target_user_id: &str,
        stats: &[IngestData],
        callback: F,
    ) where
        F: FnOnce(IngestStatResult) + Send + 'static,
    {
        let options = IngestStatOptions {
            local_user_id: local_user_id.to_owned(),
            target_user_id: target_user_id.to_owned(),
            stats: stats.to_vec(),
        };
        self.adapter
            .lock()
            .unwrap()
            .ingest_stat(options, Box::new(callback));
    }
}
