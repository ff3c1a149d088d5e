mod suggest;
mod url;

pub use suggest::{SuggestClient, SuggestSource};
pub use url::url_for_word;

#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("suggestion endpoint returned HTTP {0}")]
    Status(reqwest::StatusCode),
}
