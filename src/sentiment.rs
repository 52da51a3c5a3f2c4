use std::collections::BTreeMap;
use std::fmt;
use std::io::Write as _;
use std::process::{Command, Stdio};
use std::str::FromStr;

use anyhow::Context as _;
use serde::{Deserialize, Serialize};

/// Classifier inputs beyond this many characters are cut down to their head and tail.
pub const CLASSIFIER_MAX_CHARS: usize = 800;
const CLASSIFIER_EDGE_CHARS: usize = 400;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Emotion {
    Joy,
    Sadness,
    Anticipation,
    Surprise,
    Anger,
    Fear,
    Disgust,
    Trust,
}

impl Emotion {
    pub const ALL: [Emotion; 8] = [
        Emotion::Joy,
        Emotion::Sadness,
        Emotion::Anticipation,
        Emotion::Surprise,
        Emotion::Anger,
        Emotion::Fear,
        Emotion::Disgust,
        Emotion::Trust,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Emotion::Joy => "joy",
            Emotion::Sadness => "sadness",
            Emotion::Anticipation => "anticipation",
            Emotion::Surprise => "surprise",
            Emotion::Anger => "anger",
            Emotion::Fear => "fear",
            Emotion::Disgust => "disgust",
            Emotion::Trust => "trust",
        }
    }

    pub fn japanese_label(self) -> &'static str {
        match self {
            Emotion::Joy => "喜び",
            Emotion::Sadness => "悲しみ",
            Emotion::Anticipation => "期待",
            Emotion::Surprise => "驚き",
            Emotion::Anger => "怒り",
            Emotion::Fear => "恐れ",
            Emotion::Disgust => "嫌悪",
            Emotion::Trust => "信頼",
        }
    }
}

impl fmt::Display for Emotion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Emotion {
    type Err = anyhow::Error;

    /// Accepts the English label (any case) or the Japanese display label.
    fn from_str(label: &str) -> Result<Self, Self::Err> {
        let label = label.trim();
        Emotion::ALL
            .into_iter()
            .find(|emotion| {
                emotion.as_str().eq_ignore_ascii_case(label) || emotion.japanese_label() == label
            })
            .ok_or_else(|| anyhow::anyhow!("unknown emotion label: {label:?}"))
    }
}

/// Text → emotion label. Implementations block and do not retry.
pub trait SentimentClassifier {
    fn classify(&self, text: &str) -> anyhow::Result<String>;
}

/// Always answers with the same label.
#[derive(Debug, Clone)]
pub struct FixedClassifier {
    label: String,
}

impl FixedClassifier {
    pub fn new(emotion: Emotion) -> Self {
        Self {
            label: emotion.as_str().to_owned(),
        }
    }
}

impl SentimentClassifier for FixedClassifier {
    fn classify(&self, _text: &str) -> anyhow::Result<String> {
        Ok(self.label.clone())
    }
}

/// Runs an external model wrapper: the text goes to stdin, the label comes back on stdout.
#[derive(Debug, Clone)]
pub struct CommandClassifier {
    pub program: String,
    pub args: Vec<String>,
}

impl SentimentClassifier for CommandClassifier {
    fn classify(&self, text: &str) -> anyhow::Result<String> {
        tracing::info!(command = %self.program, chars = text.chars().count(), "classify sentiment");

        let mut child = Command::new(&self.program)
            .args(&self.args)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::inherit())
            .spawn()
            .with_context(|| format!("spawn classifier command: {}", self.program))?;

        let written = match child.stdin.take() {
            Some(mut stdin) => stdin
                .write_all(text.as_bytes())
                .context("write classifier stdin"),
            None => Err(anyhow::anyhow!("open classifier stdin")),
        };
        if let Err(err) = written {
            // Reap the child before reporting.
            let _ = child.kill();
            let _ = child.wait();
            return Err(err);
        }

        let output = child
            .wait_with_output()
            .context("wait classifier process")?;
        if !output.status.success() {
            anyhow::bail!(
                "classifier command failed: {} ({})",
                self.program,
                output.status
            );
        }

        let stdout =
            String::from_utf8(output.stdout).context("classifier stdout is not valid UTF-8")?;
        let label = stdout.trim();
        if label.is_empty() {
            anyhow::bail!("classifier command printed no label: {}", self.program);
        }
        Ok(label.to_owned())
    }
}

/// Keeps the first and last 400 characters of inputs longer than 800.
pub fn truncate_for_classifier(text: &str) -> String {
    let len = text.chars().count();
    if len <= CLASSIFIER_MAX_CHARS {
        return text.to_owned();
    }
    let head = text.chars().take(CLASSIFIER_EDGE_CHARS);
    let tail = text.chars().skip(len - CLASSIFIER_EDGE_CHARS);
    head.chain(tail).collect()
}

pub fn classify_emotion(
    classifier: &dyn SentimentClassifier,
    narration: &str,
) -> anyhow::Result<Emotion> {
    let input = truncate_for_classifier(narration);
    let label = classifier.classify(&input).context("sentiment classifier")?;
    let emotion = label.parse::<Emotion>()?;
    tracing::debug!(%emotion, label = emotion.japanese_label(), "classified narration");
    Ok(emotion)
}

/// Background music for an emotion. A gap in the table is a configuration bug.
pub fn emotion_to_bgm(bgm_map: &BTreeMap<Emotion, String>, emotion: Emotion) -> anyhow::Result<&str> {
    bgm_map
        .get(&emotion)
        .map(String::as_str)
        .ok_or_else(|| anyhow::anyhow!("bgm_map has no entry for emotion: {emotion}"))
}
