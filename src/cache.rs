use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{anyhow, Result};
use moka::future::Cache;
use tracing::{debug, trace};

/// A TTL-bounded in-memory store of upstream response bodies, keyed by request URL.
#[derive(Clone)]
pub struct ResponseCache {
    inner: Cache<String, Arc<str>>,
}

impl ResponseCache {
    pub fn new(ttl: Duration, max_capacity: u64) -> Self {
        debug!(
            "Using an in-memory response cache (ttl: {}s, capacity: {max_capacity})",
            ttl.as_secs()
        );

        Self {
            inner: Cache::builder()
                .time_to_live(ttl)
                .max_capacity(max_capacity)
                .build(),
        }
    }

    /// Returns the fresh cached value for `key`, or runs `fill` and stores its result.
    ///
    /// Concurrent callers with the same key share a single `fill`. Failures are not cached.
    pub async fn try_get<F>(&self, key: &str, fill: F) -> Result<Arc<str>>
    where
        F: Future<Output = Result<String>>,
    {
        if let Some(value) = self.inner.get(key).await {
            trace!(key, "Cache hit");

            return Ok(value);
        }

        self.inner
            .try_get_with_by_ref(key, async {
                debug!(key, "Cache miss");
                fill.await.map(Arc::from)
            })
            .await
            .map_err(|e| anyhow!("{e:#}"))
    }
}
