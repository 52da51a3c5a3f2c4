use serde::{Deserialize, Serialize};

/// One scraped article, as handed over by a site parser.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ArticleDocument {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub url: String,
    /// Headline on the source site.
    pub title: String,
    /// Generated video title.
    #[serde(default)]
    pub new_title: String,
    /// Generated text under the thumbnail.
    #[serde(default)]
    pub thumb_text: String,
    /// Generated secondary overlay for the first column.
    #[serde(default)]
    pub text2: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub thumbnail_pattern: Option<u32>,
    /// Text fragments and image URLs in page order.
    pub tokens: Vec<String>,
}

/// Front matter of the `markdown` article format.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ArticleFrontMatter {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub url: String,
    pub title: String,
    #[serde(default)]
    pub new_title: String,
    #[serde(default)]
    pub thumb_text: String,
    #[serde(default)]
    pub text2: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub thumbnail_pattern: Option<u32>,
}

/// What `build --format json` writes per article.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SheetDocument {
    pub article_id: String,
    pub url: String,
    pub generated_at: String,
    pub rows: Vec<Vec<String>>,
}
