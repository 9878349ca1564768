//! News provider — the latest entries of an RSS or Atom feed as a `list`
//! widget.

use std::time::Duration;

use chrono::Utc;
use feed_rs::model::Entry;
use serde::Deserialize;
use serde_json::{Value, json};

use dashdeck_app::ports::WidgetProvider;
use dashdeck_domain::error::ProviderError;
use dashdeck_domain::widget::{WidgetConfig, WidgetKind};

/// Default refresh period, in milliseconds.
pub const REFRESH_INTERVAL_MS: u64 = 600_000;

/// Time allowed to download one feed.
pub const FETCH_TIMEOUT: Duration = Duration::from_secs(15);

/// Feeds selectable by `source` name.
pub const FEEDS: [(&str, &str); 3] = [
    ("tech", "https://sspai.com/feed"),
    ("general", "https://tingtalk.me/atom.xml"),
    ("finance", "https://www.mobile01.com/rss/news.xml"),
];

#[derive(Debug, thiserror::Error)]
pub enum NewsError {
    #[error("cannot build http client")]
    Client(#[source] reqwest::Error),

    #[error("cannot download feed {url}: {source}")]
    Request {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("cannot parse feed {url}: {source}")]
    Parse {
        url: String,
        #[source]
        source: feed_rs::parser::ParseFeedError,
    },
}

impl From<NewsError> for ProviderError {
    fn from(err: NewsError) -> Self {
        Self::new(err)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct NewsSettings {
    /// One of the [`FEEDS`] names; unknown names fall back to `tech`.
    pub source: String,
    /// Feed to read instead of the one named by `source`.
    pub feed_url: Option<String>,
    pub max_items: usize,
}

impl Default for NewsSettings {
    fn default() -> Self {
        Self {
            source: "tech".to_string(),
            feed_url: None,
            max_items: 5,
        }
    }
}

impl NewsSettings {
    #[must_use]
    pub fn url(&self) -> &str {
        if let Some(url) = &self.feed_url {
            return url;
        }
        FEEDS
            .iter()
            .find(|(name, _)| *name == self.source)
            .unwrap_or(&FEEDS[0])
            .1
    }
}

#[derive(Debug, Clone)]
pub struct NewsProvider {
    client: reqwest::Client,
    settings: NewsSettings,
}

impl NewsProvider {
    /// # Errors
    ///
    /// Returns [`NewsError::Client`] if the HTTP client cannot be built.
    pub fn new(settings: NewsSettings) -> Result<Self, NewsError> {
        let client = reqwest::Client::builder()
            .timeout(FETCH_TIMEOUT)
            .build()
            .map_err(NewsError::Client)?;
        Ok(Self { client, settings })
    }

    async fn download(&self, url: &str) -> Result<Vec<u8>, NewsError> {
        let request = |source| NewsError::Request {
            url: url.to_string(),
            source,
        };
        let response = self
            .client
            .get(url)
            .send()
            .await
            .and_then(reqwest::Response::error_for_status)
            .map_err(request)?;
        let body = response.bytes().await.map_err(request)?;
        Ok(body.to_vec())
    }

    /// Payload built from a downloaded feed body.
    ///
    /// # Errors
    ///
    /// Returns [`NewsError::Parse`] when `body` is neither RSS nor Atom.
    pub fn data_from(&self, url: &str, body: &[u8]) -> Result<Value, NewsError> {
        let feed = feed_rs::parser::parse(body).map_err(|source| NewsError::Parse {
            url: url.to_string(),
            source,
        })?;
        let items: Vec<Value> = feed
            .entries
            .iter()
            .take(self.settings.max_items)
            .map(item)
            .collect();

        Ok(json!({
            "total": items.len(),
            "items": items,
            "source": self.settings.source,
            "last_updated": Utc::now().to_rfc3339(),
        }))
    }
}

fn item(entry: &Entry) -> Value {
    let published = entry.published.or(entry.updated);
    json!({
        "title": entry.title.as_ref().map(|t| t.content.trim()).unwrap_or_default(),
        "author": entry.authors.first().map(|p| p.name.as_str()).unwrap_or_default(),
        "summary": entry.summary.as_ref().map(|t| t.content.trim()).unwrap_or_default(),
        "link": entry.links.first().map(|l| l.href.as_str()).unwrap_or_default(),
        "published": published.map(|at| at.to_rfc3339()).unwrap_or_default(),
        "meta": published.map(|at| at.format("%m-%d %H:%M").to_string()).unwrap_or_default(),
    })
}

impl WidgetProvider for NewsProvider {
    fn default_config(&self) -> WidgetConfig {
        WidgetConfig::new(WidgetKind::List, REFRESH_INTERVAL_MS).with_title("News")
    }

    async fn fetch_data(&self) -> Result<Value, ProviderError> {
        let url = self.settings.url();
        let body = self.download(url).await?;
        let data = self.data_from(url, &body)?;
        tracing::debug!(%url, items = %data["total"], "feed read");
        Ok(data)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::Router;
    use axum::http::{StatusCode, header};
    use axum::routing::get;

    const RSS: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<rss version="2.0">
  <channel>
    <title>Example</title>
    <link>https://example.com</link>
    <description>Example feed</description>
    <item>
      <title>Rust 2024 is out</title>
      <link>https://example.com/rust-2024</link>
      <author>ferris@example.com (Ferris)</author>
      <description>A new edition</description>
      <pubDate>Fri, 18 Oct 2024 09:30:00 +0000</pubDate>
    </item>
    <item>
      <title>Second</title>
      <link>https://example.com/second</link>
      <pubDate>Thu, 17 Oct 2024 08:00:00 +0000</pubDate>
    </item>
    <item>
      <title>Third</title>
      <link>https://example.com/third</link>
    </item>
  </channel>
</rss>"#;

    async fn serve() -> String {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let app = Router::new()
            .route(
                "/feed.xml",
                get(|| async { ([(header::CONTENT_TYPE, "application/rss+xml")], RSS) }),
            )
            .route("/broken.xml", get(|| async { "not a feed" }))
            .route("/gone.xml", get(|| async { StatusCode::NOT_FOUND }));
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        format!("http://{addr}")
    }

    fn provider(feed_url: String, max_items: usize) -> NewsProvider {
        NewsProvider::new(NewsSettings {
            source: "tech".to_string(),
            feed_url: Some(feed_url),
            max_items,
        })
        .unwrap()
    }

    #[tokio::test]
    async fn should_list_latest_entries_up_to_max_items() {
        let base = serve().await;
        let data = provider(format!("{base}/feed.xml"), 2)
            .fetch_data()
            .await
            .unwrap();

        assert_eq!(data["total"], 2);
        assert_eq!(data["source"], "tech");
        assert!(data["last_updated"].as_str().is_some());

        let items = data["items"].as_array().unwrap();
        assert_eq!(items.len(), 2);
        assert_eq!(items[0]["title"], "Rust 2024 is out");
        assert_eq!(items[0]["summary"], "A new edition");
        assert_eq!(items[0]["link"], "https://example.com/rust-2024");
        assert_eq!(items[0]["meta"], "10-18 09:30");
        assert!(items[0]["author"].as_str().unwrap().contains("Ferris"));
        assert_eq!(items[1]["title"], "Second");
        assert_eq!(items[1]["summary"], "");
    }

    #[tokio::test]
    async fn should_leave_meta_empty_without_publication_date() {
        let base = serve().await;
        let data = provider(format!("{base}/feed.xml"), 10)
            .fetch_data()
            .await
            .unwrap();

        assert_eq!(data["total"], 3);
        assert_eq!(data["items"][2]["meta"], "");
        assert_eq!(data["items"][2]["published"], "");
    }

    #[tokio::test]
    async fn should_fail_when_body_is_not_a_feed() {
        let base = serve().await;
        let err = provider(format!("{base}/broken.xml"), 5)
            .fetch_data()
            .await
            .unwrap_err();
        assert!(err.to_string().starts_with("cannot parse feed"));
    }

    #[tokio::test]
    async fn should_fail_when_feed_answers_with_error_status() {
        let base = serve().await;
        let err = provider(format!("{base}/gone.xml"), 5)
            .fetch_data()
            .await
            .unwrap_err();
        assert!(err.to_string().starts_with("cannot download feed"));
    }

    #[test]
    fn should_pick_feed_by_source_name() {
        let settings = |source: &str| NewsSettings {
            source: source.to_string(),
            ..NewsSettings::default()
        };
        assert_eq!(settings("general").url(), "https://tingtalk.me/atom.xml");
        assert_eq!(settings("finance").url(), "https://www.mobile01.com/rss/news.xml");
        assert_eq!(settings("sports").url(), "https://sspai.com/feed");
    }

    #[test]
    fn should_default_to_list_refreshed_every_ten_minutes() {
        let config = provider("http://localhost/feed".to_string(), 5).default_config();
        assert_eq!(config.kind, WidgetKind::List);
        assert_eq!(config.refresh_interval, 600_000);
    }
}
