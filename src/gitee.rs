pub mod events;

use std::time::Duration;

use anyhow::{anyhow, Context, Result};
use serde::Serialize;
use tracing::{debug, instrument};
use url::Url;

use crate::cache::ResponseCache;

pub use self::events::Event;

const CONNECT_TIMEOUT: Duration = Duration::from_secs(30);
const READ_TIMEOUT: Duration = Duration::from_secs(10);
const TOTAL_TIMEOUT: Duration = Duration::from_secs(300);

/// Gitee REST API client for the public events endpoint.
#[derive(Clone)]
pub struct Client {
    http: reqwest::Client,
    api_base: Url,
    access_token: Option<String>,
}

#[derive(Serialize)]
struct EventsQuery<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    access_token: Option<&'a str>,

    limit: u32,
}

impl Client {
    pub fn new(api_base: Url, access_token: Option<String>) -> Result<Self> {
        if api_base.cannot_be_a_base() {
            return Err(anyhow!("the API base `{api_base}` cannot be used as a base URL"));
        }

        let http = reqwest::Client::builder()
            .connect_timeout(CONNECT_TIMEOUT)
            .read_timeout(READ_TIMEOUT)
            .timeout(TOTAL_TIMEOUT)
            .user_agent(concat!("gitee-feed/", env!("CARGO_PKG_VERSION")))
            .build()
            .context("could not create an HTTP client")?;

        Ok(Self {
            http,
            api_base,
            access_token,
        })
    }

    pub fn public_events_url(&self, username: &str) -> Url {
        let mut url = self.api_base.clone();
        url.set_query(None);
        url.set_fragment(None);

        if let Ok(mut segments) = url.path_segments_mut() {
            segments
                .pop_if_empty()
                .extend(["users", username, "events", "public"]);
        }

        url
    }

    /// Fetches the public timeline of `username`, reusing a cached response when available.
    ///
    /// The cache key is the endpoint URL without the query, so neither `limit` nor the access
    /// token affect it.
    #[instrument(level = "DEBUG", skip(self, cache))]
    pub async fn public_events(
        &self,
        cache: &ResponseCache,
        username: &str,
        limit: u32,
    ) -> Result<Vec<Event>> {
        let url = self.public_events_url(username);

        let body = cache
            .try_get(url.as_str(), async {
                debug!(%url, "Requesting public events");

                let response = self
                    .http
                    .get(url.clone())
                    .query(&EventsQuery {
                        access_token: self.access_token.as_deref(),
                        limit,
                    })
                    .send()
                    .await
                    .map_err(Into::into)
                    .and_then(|r| r.error_for_status().context("server returned an error"))
                    .with_context(|| anyhow!("could not fetch `{url}`"))?;

                response
                    .text()
                    .await
                    .with_context(|| anyhow!("could not read the response when fetching `{url}`"))
            })
            .await?;

        serde_json::from_str(&body)
            .with_context(|| anyhow!("could not parse the events of `{username}`"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client(base: &str) -> Client {
        Client::new(Url::parse(base).unwrap(), None).unwrap()
    }

    #[test]
    fn builds_public_events_url() {
        let url = client("https://gitee.com/api/v5/").public_events_url("y_project");

        assert_eq!(
            url.as_str(),
            "https://gitee.com/api/v5/users/y_project/events/public"
        );
    }

    #[test]
    fn base_without_trailing_slash() {
        let url = client("http://127.0.0.1:8080/api/v5?x=1").public_events_url("bob");

        assert_eq!(
            url.as_str(),
            "http://127.0.0.1:8080/api/v5/users/bob/events/public"
        );
    }

    #[test]
    fn username_is_a_single_segment() {
        let url = client("https://gitee.com/api/v5/").public_events_url("a/../b c");

        assert_eq!(
            url.as_str(),
            "https://gitee.com/api/v5/users/a%2F..%2Fb%20c/events/public"
        );
    }

    #[test]
    fn rejects_non_base_urls() {
        assert!(Client::new(Url::parse("mailto:someone@example.com").unwrap(), None).is_err());
    }
}
