use std::collections::BTreeMap;
use std::path::Path;

use anyhow::Context as _;
use serde::{Deserialize, Serialize};

use crate::sentiment::Emotion;

/// Per-channel settings. Every field has a default so a channel file only lists overrides.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ChannelConfig {
    pub channel_name: String,
    /// Site parser used for article inputs (see `source::ParserRegistry`).
    pub site: String,
    pub closing_message: String,
    pub min_required_pictures: usize,
    pub title_suffix: String,

    /// Filename templates; `{uid}` is replaced by the article id.
    pub thumbnail_filename: String,
    pub placeholder_filenames: [String; 3],
    pub article_element_slots: usize,

    pub thumbnail_patterns: BTreeMap<u32, String>,
    pub text2_patterns: Vec<String>,
    pub text2_disable_probability: f64,
    pub default_text2_setting: String,

    pub gif_image_setting: String,
    pub image_setting: String,
    pub opening_video: String,
    pub video_material_column_setting: String,

    pub base_speaker: String,
    pub speakers: Vec<SpeakerProfile>,
    pub cues: CueConfig,
    pub thumbnail_style: String,
    pub narration_style: String,

    pub bgm_map: BTreeMap<Emotion, String>,
    pub split: SplitRule,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpeakerProfile {
    pub id: String,
    pub transition_cue: String,
    pub overlay_style: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CueConfig {
    pub intro: String,
    pub cut: String,
    pub leading_edge: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SplitRule {
    pub max_len: usize,
    pub range_start: usize,
    pub range_end: usize,
    pub delimiters: Vec<char>,
}

impl Default for ChannelConfig {
    fn default() -> Self {
        Self {
            channel_name: "default".to_owned(),
            site: "json".to_owned(),
            closing_message: String::new(),
            min_required_pictures: 3,
            title_suffix: String::new(),
            thumbnail_filename: "thumbnail_{uid}.jpg".to_owned(),
            placeholder_filenames: [
                "1_{uid}.jpg".to_owned(),
                "2_{uid}.jpg".to_owned(),
                "3_{uid}.jpg".to_owned(),
            ],
            article_element_slots: 1,
            thumbnail_patterns: BTreeMap::new(),
            text2_patterns: Vec::new(),
            text2_disable_probability: 0.0,
            default_text2_setting: String::new(),
            gif_image_setting: String::new(),
            image_setting: "そのまま張り付け画面上部".to_owned(),
            opening_video: "テンプレ1.mp4".to_owned(),
            video_material_column_setting: String::new(),
            base_speaker: "2".to_owned(),
            speakers: default_speakers(),
            cues: CueConfig::default(),
            thumbnail_style: "サムネ用、黄色い長方形、黒文字".to_owned(),
            narration_style: "本文解説、半透明黄色長方形、画像、白袋文字黒、文字サイズ75、改行20"
                .to_owned(),
            bgm_map: default_bgm_map(),
            split: SplitRule::default(),
        }
    }
}

impl Default for CueConfig {
    fn default() -> Self {
        Self {
            intro: "オンSE.mp3".to_owned(),
            cut: "シャッター音.mp3".to_owned(),
            leading_edge: "SE先頭".to_owned(),
        }
    }
}

impl Default for SplitRule {
    fn default() -> Self {
        Self {
            max_len: 60,
            range_start: 25,
            range_end: 60,
            delimiters: vec!['。', '、', '」'],
        }
    }
}

fn default_speakers() -> Vec<SpeakerProfile> {
    let overlay = |color: &str| {
        format!("動画反応解説、半透明{color}長方形、画像、白袋文字黒、文字サイズ75、改行20")
    };
    [
        ("3", "テキスト切り替えSE①.mp3", overlay("ミドリ")),
        ("8", "テキスト切り替えSE②.mp3", overlay("黄緑")),
        ("12", "テキスト切り替えSE③.mp3", overlay("青")),
        ("21", "テキスト切り替えSE④.mp3", overlay("むらさき")),
        ("11", "テキスト切り替えSE⑤.mp3", overlay("濃い青")),
    ]
    .into_iter()
    .map(|(id, cue, style)| SpeakerProfile {
        id: id.to_owned(),
        transition_cue: cue.to_owned(),
        overlay_style: style,
    })
    .collect()
}

fn default_bgm_map() -> BTreeMap<Emotion, String> {
    let bright = "喜び①BGM20251208.mp3";
    let calm = "カエルのピアノ.mp3";
    let tense = "怒り①BGM1209.mp3";
    BTreeMap::from([
        (Emotion::Joy, bright.to_owned()),
        (Emotion::Sadness, calm.to_owned()),
        (Emotion::Anticipation, bright.to_owned()),
        (Emotion::Surprise, bright.to_owned()),
        (Emotion::Anger, tense.to_owned()),
        (Emotion::Fear, tense.to_owned()),
        (Emotion::Disgust, tense.to_owned()),
        (Emotion::Trust, calm.to_owned()),
    ])
}

impl ChannelConfig {
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let yaml = std::fs::read_to_string(path)
            .with_context(|| format!("read channel config: {}", path.display()))?;
        let config: Self = serde_yaml::from_str(&yaml)
            .with_context(|| format!("parse channel config: {}", path.display()))?;
        config
            .validate()
            .with_context(|| format!("validate channel config: {}", path.display()))?;
        tracing::debug!(channel = %config.channel_name, site = %config.site, "loaded channel config");
        Ok(config)
    }

    pub fn validate(&self) -> anyhow::Result<()> {
        self.split.validate().context("split rule")?;
        if self.speakers.is_empty() {
            anyhow::bail!("speakers must not be empty");
        }
        if !(0.0..=1.0).contains(&self.text2_disable_probability) {
            anyhow::bail!(
                "text2_disable_probability must be within 0..=1, got {}",
                self.text2_disable_probability
            );
        }
        Ok(())
    }

    pub fn thumbnail_filename(&self, unique_id: &str) -> String {
        self.thumbnail_filename.replace("{uid}", unique_id)
    }

    pub fn placeholder_filename(&self, bucket: usize, unique_id: &str) -> String {
        let idx = bucket.min(self.placeholder_filenames.len() - 1);
        self.placeholder_filenames[idx].replace("{uid}", unique_id)
    }

    /// Falls back to the last profile for ids outside the table.
    pub fn speaker_profile(&self, id: &str) -> Option<&SpeakerProfile> {
        self.speakers
            .iter()
            .find(|profile| profile.id == id)
            .or_else(|| self.speakers.last())
    }

    pub fn speaker_candidates(&self) -> Vec<&str> {
        self.speakers.iter().map(|profile| profile.id.as_str()).collect()
    }
}

impl SplitRule {
    pub fn validate(&self) -> anyhow::Result<()> {
        if self.max_len == 0 {
            anyhow::bail!("max_len must be > 0");
        }
        if self.range_start >= self.range_end {
            anyhow::bail!(
                "range_start ({}) must be < range_end ({})",
                self.range_start,
                self.range_end
            );
        }
        if self.delimiters.is_empty() {
            anyhow::bail!("delimiters must not be empty");
        }
        Ok(())
    }

    pub fn is_delimiter(&self, ch: char) -> bool {
        self.delimiters.contains(&ch)
    }
}
