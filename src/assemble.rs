use anyhow::Context as _;
use rand::Rng;
use rand::seq::SliceRandom as _;

use crate::align::Alignment;
use crate::config::ChannelConfig;
use crate::formats::ArticleDocument;
use crate::images;
use crate::sentiment::{self, SentimentClassifier};
use crate::sheet::{InstructionSheet, Track, TrackKind, end_cells};
use crate::text;
use crate::tracks;

/// Builds the unsplit sheet for one article. Column 0 is the thumbnail text, column 1 the
/// title, then one column per narration unit and a closing column.
pub fn assemble<R: Rng + ?Sized>(
    article: &ArticleDocument,
    unique_id: &str,
    alignment: &Alignment,
    config: &ChannelConfig,
    classifier: &dyn SentimentClassifier,
    rng: &mut R,
) -> anyhow::Result<InstructionSheet> {
    let title = text::normalize_block(&article.title);
    let thumb_text = text::normalize_block(&article.thumb_text);

    let sheet_title = format!("{}{}", article.new_title, config.title_suffix);
    let text2_after = text::remove_bracket_tags(&sheet_title);

    let mut units = alignment.threads.clone();
    units.push(config.closing_message.clone());
    let units = units
        .iter()
        .map(|unit| text::normalize_block(unit))
        .collect::<Vec<_>>();

    let mut text1 = Vec::with_capacity(units.len() + 2);
    text1.push(thumb_text);
    text1.push(title);
    text1.extend(units.iter().cloned());
    let talk = text1
        .iter()
        .map(|cell| text::normalize_inline(cell))
        .collect::<Vec<_>>();
    let count = text1.len();

    let image_files = images::fill_image_slots(config, unique_id, count, &alignment.pictures)
        .context("fill image slots")?;

    let speakers = tracks::speaker_rotation(config, count, rng);
    let se = tracks::se_cues(config, &image_files, &speakers).context("sound cues")?;
    // The cue list lags the image list by one column; the closing column gets no cue.
    let se = tracks::pad_to(se, count, "SE")?;
    let se_setting = tracks::se_leading_edge(config, &se);
    let text1_settings = tracks::overlay_styles(config, &speakers);

    let picture_pattern = article
        .thumbnail_pattern
        .and_then(|pattern| config.thumbnail_patterns.get(&pattern))
        .cloned()
        .unwrap_or_default();

    let (text2_first, text2_setting_first) = if rng.r#gen::<f64>() < config.text2_disable_probability
    {
        (String::new(), String::new())
    } else {
        let setting = config
            .text2_patterns
            .choose(&mut *rng)
            .cloned()
            .unwrap_or_else(|| config.default_text2_setting.clone());
        (article.text2.clone(), setting)
    };

    let narration = units.concat();
    let emotion = sentiment::classify_emotion(classifier, &narration)?;
    let bgm = sentiment::emotion_to_bgm(&config.bgm_map, emotion)?.to_owned();

    let blank = || vec![String::new(); count];
    let first_then = |first: String, rest: &str| {
        let mut cells = Vec::with_capacity(count);
        cells.push(first);
        cells.extend(std::iter::repeat_n(rest.to_owned(), count - 1));
        cells
    };

    let tracks = vec![
        Track::new(TrackKind::Start, blank()),
        Track::new(TrackKind::Title, first_then(sheet_title.clone(), "")),
        Track::new(
            TrackKind::Number,
            (1..=count).map(|n| n.to_string()).collect(),
        ),
        Track::new(TrackKind::Talk, talk),
        Track::new(TrackKind::Speaker, speakers),
        Track::new(TrackKind::TalkSetting, blank()),
        Track::new(
            TrackKind::VideoMaterial,
            tracks::video_materials(config, count),
        ),
        Track::new(TrackKind::VideoSetting, blank()),
        Track::new(TrackKind::ImageMaterial, image_files),
        Track::new(
            TrackKind::ImageSetting,
            first_then(picture_pattern, &config.image_setting),
        ),
        Track::new(TrackKind::Se, se),
        Track::new(TrackKind::SeSetting, se_setting),
        Track::new(TrackKind::Text1, text1),
        Track::new(TrackKind::Text1Setting, text1_settings),
        Track::new(TrackKind::Text2, first_then(text2_first, &text2_after)),
        Track::new(
            TrackKind::Text2Setting,
            first_then(text2_setting_first, &config.default_text2_setting),
        ),
        Track::new(TrackKind::FixedText, blank()),
        Track::new(TrackKind::FixedTextSetting, blank()),
        Track::new(TrackKind::FixedBgm, first_then(String::new(), &bgm)),
        Track::new(TrackKind::End, end_cells(count)),
    ];

    let sheet = InstructionSheet::new(tracks).context("assemble instruction sheet")?;
    tracing::debug!(
        article = unique_id,
        columns = sheet.columns(),
        %emotion,
        bgm = %bgm,
        "assembled sheet"
    );
    Ok(sheet)
}
