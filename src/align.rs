//! Pairs each narration line of a scraped thread with the image shown while it is read.

use std::collections::VecDeque;

use serde::{Deserialize, Serialize};

use crate::text;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RawToken {
    Text(String),
    Image(String),
}

impl RawToken {
    pub fn classify(raw: &str) -> Self {
        if text::is_url(raw) {
            RawToken::Image(raw.to_owned())
        } else {
            RawToken::Text(raw.to_owned())
        }
    }

    pub fn is_image(&self) -> bool {
        matches!(self, RawToken::Image(_))
    }

    pub fn as_str(&self) -> &str {
        match self {
            RawToken::Text(s) | RawToken::Image(s) => s,
        }
    }
}

/// `threads[i]` is read while `pictures[i]` is on screen.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Alignment {
    pub threads: Vec<String>,
    pub pictures: Vec<String>,
}

impl Alignment {
    pub fn len(&self) -> usize {
        self.threads.len()
    }

    pub fn is_empty(&self) -> bool {
        self.threads.is_empty()
    }

    fn push(&mut self, thread: String, picture: String) {
        self.threads.push(thread);
        self.pictures.push(picture);
    }

    fn last_picture(&self) -> String {
        self.pictures.last().cloned().unwrap_or_default()
    }
}

pub fn align_raw(raw: &[String]) -> anyhow::Result<Alignment> {
    let tokens = raw.iter().map(|s| RawToken::classify(s)).collect::<Vec<_>>();
    align(tokens)
}

pub fn align(mut tokens: Vec<RawToken>) -> anyhow::Result<Alignment> {
    if tokens.len() < 2 {
        anyhow::bail!(
            "thread needs at least 2 tokens to align, got {}",
            tokens.len()
        );
    }

    // Single-image summaries: [image, text].
    if let [RawToken::Image(url), RawToken::Text(body)] = tokens.as_slice() {
        let mut alignment = Alignment::default();
        alignment.push(body.clone(), text::image_filename(url));
        return Ok(alignment);
    }

    // A leading image would be lost to the short-item filter, so let the first text claim it.
    if tokens[0].is_image() {
        tokens.swap(0, 1);
    }

    let mut alignment = Alignment::default();
    let mut buffered: VecDeque<String> = VecDeque::new();
    let mut media_index = 1usize;
    let last = tokens.len() - 1;

    for (idx, token) in tokens.iter().enumerate() {
        let item = text::strip_quote_reference(token.as_str());
        if text::char_len(item) <= 1 {
            continue;
        }

        if token.is_image() {
            if idx > 0 && tokens[idx - 1].is_image() {
                buffered.push_back(text::image_filename(item));
                media_index += 1;
            }
            continue;
        }

        let thread = text::remove_urls(item).trim_end().to_owned();

        if idx == last {
            let picture = alignment.last_picture();
            alignment.push(thread, picture);
            continue;
        }

        match &tokens[idx + 1] {
            RawToken::Image(next) => {
                media_index -= buffered.len();
                buffered.clear();

                let picture = text::image_filename(next);
                if media_index == 1
                    && let Some(previous) = alignment.pictures.last_mut()
                {
                    *previous = picture.clone();
                }
                alignment.push(thread, picture);
                media_index += 1;
            }
            RawToken::Text(_) => {
                let picture = match buffered.pop_front() {
                    Some(picture) => picture,
                    None => alignment.last_picture(),
                };
                alignment.push(thread, picture);
            }
        }
    }

    if alignment.threads.len() != alignment.pictures.len() {
        anyhow::bail!(
            "alignment produced {} threads but {} pictures",
            alignment.threads.len(),
            alignment.pictures.len()
        );
    }

    tracing::debug!(
        units = alignment.len(),
        images = alignment.pictures.iter().filter(|p| !p.is_empty()).count(),
        "aligned thread"
    );
    Ok(alignment)
}
