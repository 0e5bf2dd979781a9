use std::{
    collections::HashMap,
    sync::Arc,
    time::{Duration, Instant},
};

use reqwest::{Client, Url};
use tokio::sync::Mutex;
use tracing::debug;

use crate::error::Result;

/// HTTP collaborator shared by the provider clients.
///
/// Wraps a single [`reqwest::Client`] and, when a TTL is configured, an
/// in-memory response cache keyed by the full request URL. The cache is
/// explicit and owned by the fetcher: clones share it, separate fetchers
/// do not.
#[derive(Clone)]
pub struct Fetcher {
    client: Client,
    cache: Option<Arc<ResponseCache>>,
}

#[bon::bon]
impl Fetcher {
    /// Build a fetcher, optionally caching responses for `ttl`.
    #[builder]
    pub fn new(
        ttl: Option<Duration>,
        #[builder(default = Duration::from_secs(10))] timeout: Duration,
    ) -> Result<Self> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            cache: ttl.map(|ttl| Arc::new(ResponseCache::new(ttl))),
        })
    }
}

impl Fetcher {
    /// Fetch a URL as text, serving from the cache while the entry is fresh.
    ///
    /// Non-success statuses fail; failed responses are never cached.
    pub async fn get_text(&self, url: Url) -> Result<String> {
        if let Some(cache) = &self.cache
            && let Some(body) = cache.get(url.as_str()).await
        {
            debug!(url = %url, "serving from the cache");
            return Ok(body);
        }
        let body = self
            .client
            .get(url.clone())
            .send()
            .await?
            .error_for_status()?
            .text()
            .await?;
        if let Some(cache) = &self.cache {
            cache.put(url.as_str().to_owned(), body.clone()).await;
        }
        Ok(body)
    }
}

struct ResponseCache {
    ttl: Duration,
    entries: Mutex<HashMap<String, Entry>>,
}

struct Entry {
    body: String,
    expires_at: Instant,
}

impl ResponseCache {
    fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            entries: Mutex::new(HashMap::new()),
        }
    }

    async fn get(&self, key: &str) -> Option<String> {
        let mut entries = self.entries.lock().await;
        if let Some(entry) = entries.get(key)
            && Instant::now() <= entry.expires_at
        {
            return Some(entry.body.clone());
        }
        entries.remove(key);
        None
    }

    /// Insert a fresh entry and sweep out whatever has expired, including
    /// entries whose keys are never looked up again.
    async fn put(&self, key: String, body: String) {
        let now = Instant::now();
        let mut entries = self.entries.lock().await;
        entries.retain(|_, entry| now <= entry.expires_at);
        entries.insert(
            key,
            Entry {
                body,
                expires_at: now + self.ttl,
            },
        );
    }
}

#[cfg(test)]
mod tests {
    use httpmock::prelude::*;

    use super::*;

    fn init_tracing() {
        let _ = tracing_subscriber::fmt().with_test_writer().try_init();
    }

    #[tokio::test]
    async fn serves_from_cache_within_ttl() -> anyhow::Result<()> {
        init_tracing();
        let server = MockServer::start_async().await;
        let mock = server
            .mock_async(|when, then| {
                when.method(GET).path("/payload");
                then.status(200).body("body");
            })
            .await;

        let fetcher = Fetcher::builder().ttl(Duration::from_secs(600)).build()?;
        let url = Url::parse(&server.url("/payload"))?;
        assert_eq!(fetcher.get_text(url.clone()).await?, "body");
        assert_eq!(fetcher.get_text(url).await?, "body");

        mock.assert_hits_async(1).await;
        Ok(())
    }

    #[tokio::test]
    async fn refetches_without_ttl() -> anyhow::Result<()> {
        init_tracing();
        let server = MockServer::start_async().await;
        let mock = server
            .mock_async(|when, then| {
                when.method(GET).path("/payload");
                then.status(200).body("body");
            })
            .await;

        let fetcher = Fetcher::builder().build()?;
        let url = Url::parse(&server.url("/payload"))?;
        fetcher.get_text(url.clone()).await?;
        fetcher.get_text(url).await?;

        mock.assert_hits_async(2).await;
        Ok(())
    }

    #[tokio::test]
    async fn cache_distinguishes_urls() -> anyhow::Result<()> {
        let server = MockServer::start_async().await;
        let first = server
            .mock_async(|when, then| {
                when.method(GET).path("/payload").query_param("id", "1");
                then.status(200).body("first");
            })
            .await;
        let second = server
            .mock_async(|when, then| {
                when.method(GET).path("/payload").query_param("id", "2");
                then.status(200).body("second");
            })
            .await;

        let fetcher = Fetcher::builder().ttl(Duration::from_secs(600)).build()?;
        assert_eq!(
            fetcher.get_text(Url::parse(&server.url("/payload?id=1"))?).await?,
            "first"
        );
        assert_eq!(
            fetcher.get_text(Url::parse(&server.url("/payload?id=2"))?).await?,
            "second"
        );

        first.assert_async().await;
        second.assert_async().await;
        Ok(())
    }

    #[tokio::test]
    async fn put_sweeps_expired_entries() {
        let cache = ResponseCache::new(Duration::from_secs(600));
        cache.put("stale".to_owned(), "body".to_owned()).await;
        cache.entries.lock().await.get_mut("stale").unwrap().expires_at =
            Instant::now() - Duration::from_secs(1);

        cache.put("fresh".to_owned(), "body".to_owned()).await;

        let entries = cache.entries.lock().await;
        assert_eq!(entries.len(), 1);
        assert!(entries.contains_key("fresh"));
    }

    #[tokio::test]
    async fn fails_on_error_status() -> anyhow::Result<()> {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(GET).path("/payload");
                then.status(500);
            })
            .await;

        let fetcher = Fetcher::builder().build()?;
        let url = Url::parse(&server.url("/payload"))?;
        assert!(fetcher.get_text(url).await.is_err());
        Ok(())
    }
}
