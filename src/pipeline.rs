use anyhow::Context as _;
use rand::Rng;
use sha2::{Digest, Sha256};
use url::Url;

use crate::align::{self, Alignment};
use crate::assemble;
use crate::cleanup;
use crate::config::ChannelConfig;
use crate::formats::ArticleDocument;
use crate::sentiment::SentimentClassifier;
use crate::sheet::InstructionSheet;
use crate::split;

/// Stable identifier for an article: its explicit id, else the stem of the last URL path
/// segment, else a hash of the URL.
pub fn article_id(article: &ArticleDocument) -> String {
    if let Some(id) = article.id.as_deref().map(str::trim)
        && !id.is_empty()
    {
        return id.to_owned();
    }

    if let Some(stem) = url_stem(&article.url) {
        return stem;
    }

    let mut hasher = Sha256::new();
    hasher.update(article.url.as_bytes());
    let hash = hasher.finalize();
    format!("a_{}", hex::encode(&hash[..16]))
}

fn url_stem(url: &str) -> Option<String> {
    let parsed = Url::parse(url).ok()?;
    let segment = parsed
        .path_segments()?
        .rev()
        .find(|segment| !segment.is_empty())?;
    let stem = segment.split('.').next().unwrap_or_default();
    let valid = !stem.is_empty()
        && stem
            .chars()
            .all(|ch| ch.is_ascii_alphanumeric() || ch == '-' || ch == '_');
    valid.then(|| stem.to_owned())
}

/// Aligns the article tokens into narration units.
pub fn align_article(article: &ArticleDocument) -> anyhow::Result<Alignment> {
    align::align_raw(&article.tokens).context("align article tokens")
}

/// One article through align, assemble, split and cleanup. Nothing is returned unless every
/// stage succeeds.
pub fn build_sheet<R: Rng + ?Sized>(
    article: &ArticleDocument,
    config: &ChannelConfig,
    classifier: &dyn SentimentClassifier,
    rng: &mut R,
) -> anyhow::Result<(String, InstructionSheet)> {
    let id = article_id(article);
    let alignment = align_article(article)?;
    tracing::debug!(article = %id, units = alignment.len(), "aligned article");

    let sheet = assemble::assemble(article, &id, &alignment, config, classifier, rng)
        .with_context(|| format!("assemble sheet: {id}"))?;
    let mut sheet =
        split::split_sheet(&sheet, &config.split).with_context(|| format!("split sheet: {id}"))?;
    cleanup::cleanup(&mut sheet, config);

    tracing::info!(article = %id, columns = sheet.columns(), "built sheet");
    Ok((id, sheet))
}
