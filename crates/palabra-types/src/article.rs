use serde::{Deserialize, Serialize};

/// One dictionary article for a word.
///
/// A word maps to zero or more articles (separate senses get separate
/// articles on the remote site). "Not found" is the empty list, not an error.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Article {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub etymology: Option<String>,
    #[serde(default)]
    pub meanings: Vec<String>,
}
