//! Article-page fetch and extraction. Only the background worker depends on
//! this crate; the interactive pass never touches it.

mod extract;

use std::time::Duration;

use palabra_fetch::url_for_word;
use palabra_types::Article;

pub use extract::extract_articles;

#[derive(Debug, thiserror::Error)]
pub enum ScrapeError {
    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("article page returned HTTP {0}")]
    Status(reqwest::StatusCode),
}

/// Client for the dictionary's article pages.
#[derive(Clone)]
pub struct DetailClient {
    client: reqwest::Client,
    search_url: String,
    timeout: Duration,
}

impl DetailClient {
    pub fn new(search_url: String, timeout: Duration) -> Self {
        Self {
            client: reqwest::Client::new(),
            search_url,
            timeout,
        }
    }

    /// Fetch and extract every article for exactly one word. A page with no
    /// articles yields an empty list, not an error.
    pub async fn fetch(&self, word: &str) -> Result<Vec<Article>, ScrapeError> {
        let url = url_for_word(&self.search_url, word);
        tracing::debug!("fetching articles from {url}");

        let response = self.client.get(&url).timeout(self.timeout).send().await?;
        if !response.status().is_success() {
            return Err(ScrapeError::Status(response.status()));
        }

        let body = response.text().await?;
        let articles = extract_articles(&body);
        tracing::info!("extracted {} article(s) for '{word}'", articles.len());
        Ok(articles)
    }
}
