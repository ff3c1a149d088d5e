use std::time::Duration;

use crate::FetchError;
use crate::url::escape_word;

/// Source of word suggestions for a partial query.
#[async_trait::async_trait]
pub trait SuggestSource: Send + Sync {
    /// Matching words, in the order the source ranks them.
    async fn suggestions(&self, query: &str) -> Result<Vec<String>, FetchError>;
}

/// Client for the dictionary's suggestion endpoint.
#[derive(Clone)]
pub struct SuggestClient {
    client: reqwest::Client,
    suggest_url: String,
    timeout: Duration,
}

impl SuggestClient {
    pub fn new(suggest_url: String, timeout: Duration) -> Self {
        Self {
            client: reqwest::Client::new(),
            suggest_url,
            timeout,
        }
    }
}

#[async_trait::async_trait]
impl SuggestSource for SuggestClient {
    async fn suggestions(&self, query: &str) -> Result<Vec<String>, FetchError> {
        let url = format!("{}{}", self.suggest_url, escape_word(query));
        tracing::debug!("fetching suggestions from {url}");

        let response = self.client.get(&url).timeout(self.timeout).send().await?;
        if !response.status().is_success() {
            return Err(FetchError::Status(response.status()));
        }

        let words: Vec<String> = response.json().await?;
        tracing::debug!("{} suggestions for '{query}'", words.len());
        Ok(words)
    }
}
