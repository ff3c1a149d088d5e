use std::sync::OnceLock;

use palabra_types::Article;
use regex::Regex;

struct Patterns {
    article: Regex,
    header: Regex,
    etymology: Regex,
    meaning: Regex,
    tag: Regex,
}

fn patterns() -> &'static Patterns {
    static PATTERNS: OnceLock<Patterns> = OnceLock::new();
    PATTERNS.get_or_init(|| Patterns {
        article: Regex::new(r"(?s)<article\b[^>]*>(.*?)</article>").unwrap(),
        header: Regex::new(r"(?s)<header\b[^>]*>(.*?)</header>").unwrap(),
        // Etymology paragraphs are marked n/n1/n2…; meanings j/j1/j2…
        etymology: Regex::new(r#"(?s)<p class="n[^"]*"[^>]*>(.*?)</p>"#).unwrap(),
        meaning: Regex::new(r#"(?s)<p class="j[^"]*"[^>]*>(.*?)</p>"#).unwrap(),
        tag: Regex::new(r"<[^>]*>").unwrap(),
    })
}

/// Pull every dictionary article out of a result page.
pub fn extract_articles(html: &str) -> Vec<Article> {
    let patterns = patterns();

    patterns
        .article
        .captures_iter(html)
        .map(|article| {
            let body = &article[1];

            let title = patterns
                .header
                .captures(body)
                .map(|c| text_of(&c[1]))
                .filter(|t| !t.is_empty());

            let etymology = patterns
                .etymology
                .captures(body)
                .map(|c| text_of(&c[1]))
                .filter(|t| !t.is_empty());

            let meanings = patterns
                .meaning
                .captures_iter(body)
                .map(|c| text_of(&c[1]))
                .filter(|m| !m.is_empty())
                .collect();

            Article {
                title,
                etymology,
                meanings,
            }
        })
        .collect()
}

/// Markup fragment to plain text: tags stripped, entities decoded,
/// whitespace collapsed.
fn text_of(fragment: &str) -> String {
    let stripped = patterns().tag.replace_all(fragment, " ");
    let decoded = stripped
        .replace("&nbsp;", " ")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&#39;", "'")
        .replace("&amp;", "&");

    decoded.split_whitespace().collect::<Vec<_>>().join(" ")
}
