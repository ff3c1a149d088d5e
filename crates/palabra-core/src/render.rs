//! Preview and copy-text rendering for a word's cached articles.

use palabra_types::Article;

/// Subtitle line: the first article's etymology and first meaning.
pub fn preview(articles: &[Article]) -> String {
    let Some(first) = articles.first() else {
        return "No details found".to_string();
    };

    let etymology = first.etymology.as_deref().unwrap_or("");
    let meaning = first.meanings.first().map(String::as_str).unwrap_or("");
    format!("{etymology} {meaning}").trim().to_string()
}

/// Copy/large-type text: every article as a title block, etymology, and
/// meaning lines, blank-line separated.
pub fn full_text(articles: &[Article]) -> String {
    let mut out = String::new();
    for article in articles {
        out.push_str(article.title.as_deref().unwrap_or(""));
        out.push_str("\n-\n");
        out.push_str(article.etymology.as_deref().unwrap_or(""));
        out.push_str("\n\n");
        for meaning in &article.meanings {
            out.push_str(meaning);
            out.push('\n');
        }
        out.push_str("\n\n\n");
    }
    out
}

/// Details too thin to be worth autocompleting into. The preview length
/// (in chars, not bytes) stands in for "no real content".
pub fn is_effectively_empty(articles: &[Article]) -> bool {
    preview(articles).chars().count() < 5
}
