use std::collections::{BTreeMap, HashSet};
use std::path::Path;

use anyhow::Context as _;

use crate::formats::{ArticleDocument, ArticleFrontMatter};

/// Turns one saved article page into an [`ArticleDocument`].
pub trait SiteParser {
    fn name(&self) -> &'static str;
    fn parse_article(&self, contents: &str) -> anyhow::Result<ArticleDocument>;
}

/// `ArticleDocument` serialized as JSON.
#[derive(Debug, Default)]
pub struct JsonArticleParser;

impl SiteParser for JsonArticleParser {
    fn name(&self) -> &'static str {
        "json"
    }

    fn parse_article(&self, contents: &str) -> anyhow::Result<ArticleDocument> {
        serde_json::from_str(contents).context("deserialize article json")
    }
}

/// YAML front matter between `---` lines, then one token per non-empty line.
#[derive(Debug, Default)]
pub struct MarkdownArticleParser;

impl SiteParser for MarkdownArticleParser {
    fn name(&self) -> &'static str {
        "markdown"
    }

    fn parse_article(&self, contents: &str) -> anyhow::Result<ArticleDocument> {
        let mut lines = contents.lines();
        let first = lines
            .next()
            .ok_or_else(|| anyhow::anyhow!("article page is empty"))?;
        if first.trim_end() != "---" {
            anyhow::bail!("article page must start with YAML front matter ('---')");
        }

        let mut yaml_lines = Vec::new();
        let mut closed = false;
        for line in lines.by_ref() {
            if line.trim_end() == "---" {
                closed = true;
                break;
            }
            yaml_lines.push(line);
        }
        if !closed {
            anyhow::bail!("article front matter is not closed ('---')");
        }

        let yaml = yaml_lines.join("\n");
        let front: ArticleFrontMatter =
            serde_yaml::from_str(&yaml).context("deserialize article front matter")?;

        let tokens = lines
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .map(str::to_owned)
            .collect();

        Ok(ArticleDocument {
            id: front.id,
            url: front.url,
            title: front.title,
            new_title: front.new_title,
            thumb_text: front.thumb_text,
            text2: front.text2,
            thumbnail_pattern: front.thumbnail_pattern,
            tokens,
        })
    }
}

/// Site parsers by name; the channel config picks one when it is loaded.
pub struct ParserRegistry {
    parsers: BTreeMap<&'static str, Box<dyn SiteParser>>,
}

impl ParserRegistry {
    pub fn empty() -> Self {
        Self {
            parsers: BTreeMap::new(),
        }
    }

    pub fn builtin() -> Self {
        let mut registry = Self::empty();
        registry.register(Box::new(JsonArticleParser));
        registry.register(Box::new(MarkdownArticleParser));
        registry
    }

    pub fn register(&mut self, parser: Box<dyn SiteParser>) {
        self.parsers.insert(parser.name(), parser);
    }

    pub fn names(&self) -> Vec<&'static str> {
        self.parsers.keys().copied().collect()
    }

    pub fn resolve(&self, name: &str) -> anyhow::Result<&dyn SiteParser> {
        self.parsers
            .get(name)
            .map(|parser| &**parser)
            .ok_or_else(|| {
                anyhow::anyhow!(
                    "unknown site parser: {name} (available: {})",
                    self.names().join(", ")
                )
            })
    }
}

pub fn read_article(parser: &dyn SiteParser, path: &Path) -> anyhow::Result<ArticleDocument> {
    let contents = std::fs::read_to_string(path)
        .with_context(|| format!("read article: {}", path.display()))?;
    let mut article = parser
        .parse_article(&contents)
        .with_context(|| format!("parse article ({}): {}", parser.name(), path.display()))?;
    article.tokens = dedupe_tokens(std::mem::take(&mut article.tokens));
    Ok(article)
}

/// Drops repeated tokens, keeping the first occurrence. Scraped pages often repeat a post or
/// an image in quote blocks.
pub fn dedupe_tokens(tokens: Vec<String>) -> Vec<String> {
    let mut seen = HashSet::new();
    tokens
        .into_iter()
        .filter(|token| seen.insert(token.clone()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn markdown_parser_reads_front_matter_and_tokens() -> anyhow::Result<()> {
        let page = "---\n\
url: https://example.com/articles/123.html\n\
title: 元タイトル\n\
new_title: 新タイトル\n\
thumbnail_pattern: 2\n\
---\n\
\n\
一つ目のレス\n\
https://img.example.com/a.jpg\n\
\n\
  二つ目のレス  \n";

        let article = MarkdownArticleParser.parse_article(page)?;
        assert_eq!(article.url, "https://example.com/articles/123.html");
        assert_eq!(article.new_title, "新タイトル");
        assert_eq!(article.thumbnail_pattern, Some(2));
        assert_eq!(article.thumb_text, "");
        assert_eq!(
            article.tokens,
            vec!["一つ目のレス", "https://img.example.com/a.jpg", "二つ目のレス"]
        );
        Ok(())
    }

    #[test]
    fn markdown_parser_requires_front_matter() {
        assert!(MarkdownArticleParser.parse_article("本文だけ\n").is_err());
        assert!(
            MarkdownArticleParser
                .parse_article("---\nurl: x\ntitle: y\n")
                .is_err()
        );
    }

    #[test]
    fn json_parser_fills_optional_fields() -> anyhow::Result<()> {
        let json = r#"{"url":"https://example.com/a","title":"t","tokens":["a","b"]}"#;
        let article = JsonArticleParser.parse_article(json)?;
        assert_eq!(article.tokens, vec!["a", "b"]);
        assert!(article.id.is_none());
        assert_eq!(article.text2, "");
        Ok(())
    }

    #[test]
    fn dedupe_keeps_first_occurrence_order() {
        let tokens = ["a", "http://x/1.jpg", "b", "a", "http://x/1.jpg", "c"]
            .map(str::to_owned)
            .to_vec();
        assert_eq!(dedupe_tokens(tokens), vec!["a", "http://x/1.jpg", "b", "c"]);
    }

    #[test]
    fn read_article_drops_repeated_tokens() -> anyhow::Result<()> {
        let dir = tempfile::tempdir()?;
        let path = dir.path().join("page.md");
        std::fs::write(
            &path,
            "---\nurl: https://example.com/9.html\ntitle: t\n---\n一つ目\n二つ目\n一つ目\n",
        )?;

        let article = read_article(&MarkdownArticleParser, &path)?;
        assert_eq!(article.tokens, vec!["一つ目", "二つ目"]);
        Ok(())
    }

    #[test]
    fn registry_resolves_builtin_parsers_by_name() -> anyhow::Result<()> {
        let registry = ParserRegistry::builtin();
        assert_eq!(registry.names(), vec!["json", "markdown"]);
        assert_eq!(registry.resolve("markdown")?.name(), "markdown");

        let err = registry.resolve("yahoo_news").err().map(|err| err.to_string());
        assert!(err.is_some_and(|msg| msg.contains("available: json, markdown")));
        Ok(())
    }
}
