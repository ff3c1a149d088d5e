use percent_encoding::{NON_ALPHANUMERIC, utf8_percent_encode};

pub(crate) fn escape_word(word: &str) -> String {
    utf8_percent_encode(word, NON_ALPHANUMERIC).to_string()
}

/// Lookup-page URL for a word. Display/open target only; never fetched here.
pub fn url_for_word(search_url: &str, word: &str) -> String {
    format!("{search_url}{}", escape_word(word))
}
