use std::sync::LazyLock;

use regex::Regex;
use url::Url;

static JAPANESE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[ぁ-んァ-ン一-龥]").expect("japanese pattern"));

static QUOTE_REFERENCE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^>>\d+").expect("quote reference pattern"));

static EMBEDDED_URL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)(https?://\S+|www\.\S+)").expect("embedded url pattern"));

static BRACKET_TAG: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"【[^】]*】").expect("bracket tag pattern"));

static NEWLINE_RUN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\n+").expect("newline run pattern"));

static EMPHASIS_RUN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[ｗw]+").expect("emphasis run pattern"));

pub fn contains_japanese(text: &str) -> bool {
    JAPANESE.is_match(text)
}

/// A scraped token is an image reference when it is a bare URL. Comment text that quotes a
/// link always carries Japanese, which a URL never does.
pub fn is_url(text: &str) -> bool {
    text.starts_with("http") && !contains_japanese(text)
}

/// Strips a leading `>>123` reply marker.
pub fn strip_quote_reference(text: &str) -> &str {
    match QUOTE_REFERENCE.find(text) {
        Some(m) => &text[m.end()..],
        None => text,
    }
}

/// Removes embedded URLs and collapses the whitespace left behind.
pub fn remove_urls(text: &str) -> String {
    let cleaned = EMBEDDED_URL.replace_all(text, "");
    cleaned.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Removes `【…】` tags, e.g. `ラオウ…【なんJ】` becomes `ラオウ…`.
pub fn remove_bracket_tags(text: &str) -> String {
    BRACKET_TAG.replace_all(text, "").trim().to_owned()
}

/// Trims the block and collapses runs of newlines into one.
pub fn normalize_block(text: &str) -> String {
    NEWLINE_RUN.replace_all(text.trim(), "\n").into_owned()
}

/// Flattens a block into a single spoken line.
pub fn normalize_inline(text: &str) -> String {
    let text = strip_quote_reference(text);
    let text = text.trim_start_matches('、');
    let text = text.replace('\n', "、");
    EMPHASIS_RUN
        .replace_all(&text, |caps: &regex::Captures<'_>| {
            caps[0].chars().next().map(String::from).unwrap_or_default()
        })
        .into_owned()
}

pub fn char_len(text: &str) -> usize {
    text.chars().count()
}

/// Local filename for a scraped image URL: `<stem><ext>` from the last path segment, where the
/// stem ends at the first `.` and the extension starts at the last one.
pub fn image_filename(url: &str) -> String {
    let segment = match Url::parse(url) {
        Ok(parsed) => parsed
            .path_segments()
            .and_then(|mut segments| segments.next_back())
            .unwrap_or_default()
            .to_owned(),
        Err(_) => {
            let without_query = url.split(['?', '#']).next().unwrap_or(url);
            without_query
                .rsplit('/')
                .next()
                .unwrap_or(without_query)
                .to_owned()
        }
    };

    let stem = segment.split('.').next().unwrap_or_default();
    let ext = extension(&segment);
    format!("{stem}{ext}")
}

fn extension(segment: &str) -> &str {
    let body = segment.trim_start_matches('.');
    match body.rfind('.') {
        Some(idx) => &body[idx..],
        None => "",
    }
}

pub fn is_gif(filename: &str) -> bool {
    filename.to_ascii_lowercase().ends_with(".gif")
}
