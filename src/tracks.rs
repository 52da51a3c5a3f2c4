//! Auxiliary tracks derived from the column count, the speakers and the image slots.

use rand::Rng;
use rand::seq::SliceRandom as _;

use crate::config::ChannelConfig;

const SPEAKER_REDRAWS: usize = 100;

/// Columns 0 and 1 (thumbnail and title) and the closing column belong to the base speaker;
/// every other column gets a random voice different from its predecessor.
pub fn speaker_rotation<R: Rng + ?Sized>(
    config: &ChannelConfig,
    count: usize,
    rng: &mut R,
) -> Vec<String> {
    let base = config.base_speaker.as_str();
    let candidates = config.speaker_candidates();
    let mut speakers: Vec<String> = Vec::with_capacity(count);

    for idx in 0..count {
        if idx < 2 || idx + 1 == count {
            speakers.push(base.to_owned());
            continue;
        }

        let previous = speakers.last().map(String::as_str);
        let mut choice = candidates.choose(&mut *rng).copied().unwrap_or(base);
        let mut redraws = 0;
        while Some(choice) == previous && redraws < SPEAKER_REDRAWS {
            choice = candidates.choose(&mut *rng).copied().unwrap_or(base);
            redraws += 1;
        }
        speakers.push(choice.to_owned());
    }

    speakers
}

pub fn video_materials(config: &ChannelConfig, count: usize) -> Vec<String> {
    (0..count)
        .map(|idx| {
            if idx == 0 {
                config.opening_video.clone()
            } else {
                config.video_material_column_setting.clone()
            }
        })
        .collect()
}

/// Sound cue per column: intro on the first, a shutter cut where the image changes, and the
/// speaker's transition sound otherwise. The trailing cue is dropped, so the result is one
/// column shorter than `image_files`; see [`pad_to`].
pub fn se_cues(
    config: &ChannelConfig,
    image_files: &[String],
    speakers: &[String],
) -> anyhow::Result<Vec<String>> {
    if speakers.len() < image_files.len() {
        anyhow::bail!(
            "sound cues need a speaker per image column: {} speakers for {} columns",
            speakers.len(),
            image_files.len()
        );
    }

    let mut cues = Vec::with_capacity(image_files.len());
    for (idx, image) in image_files.iter().enumerate() {
        if idx == 0 {
            cues.push(config.cues.intro.clone());
            continue;
        }
        if image_files[idx - 1] != *image {
            cues.push(config.cues.cut.clone());
            continue;
        }
        let cue = config
            .speaker_profile(&speakers[idx])
            .map(|profile| profile.transition_cue.clone())
            .unwrap_or_default();
        cues.push(cue);
    }
    cues.pop();
    Ok(cues)
}

/// Marks the cells where the renderer restarts the sound effect.
pub fn se_leading_edge(config: &ChannelConfig, cues: &[String]) -> Vec<String> {
    cues.iter()
        .map(|cue| {
            if cue.is_empty() {
                String::new()
            } else {
                config.cues.leading_edge.clone()
            }
        })
        .collect()
}

/// Overlay style per column: thumbnail, main narration, then the speaker's color, closing with
/// the main narration style again.
pub fn overlay_styles(config: &ChannelConfig, speakers: &[String]) -> Vec<String> {
    let mut styles = Vec::with_capacity(speakers.len());
    for (idx, speaker) in speakers.iter().enumerate() {
        let style = match idx {
            0 => config.thumbnail_style.clone(),
            1 => config.narration_style.clone(),
            _ => config
                .speaker_profile(speaker)
                .map(|profile| profile.overlay_style.clone())
                .unwrap_or_default(),
        };
        styles.push(style);
    }
    if speakers.len() > 1
        && let Some(last) = styles.last_mut()
    {
        *last = config.narration_style.clone();
    }
    styles
}

/// Pads `cells` with trailing blanks up to `len`. Longer inputs are an error.
pub fn pad_to(mut cells: Vec<String>, len: usize, track: &str) -> anyhow::Result<Vec<String>> {
    if cells.len() > len {
        anyhow::bail!("{track} has {} cells, expected at most {len}", cells.len());
    }
    cells.resize(len, String::new());
    Ok(cells)
}
