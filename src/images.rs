use crate::config::ChannelConfig;
use crate::text;

/// One still image per content column. `pictures` holds a slot per column after the
/// thumbnail; blanks are resolved to a neighbor.
pub fn build_image_files(thumbnail: &str, pictures: &[String]) -> Vec<String> {
    let mut slots = Vec::with_capacity(pictures.len() + 2);
    slots.push(thumbnail.to_owned());
    slots.extend(pictures.iter().cloned());

    let mut filled = Vec::with_capacity(slots.len() + 1);
    let mut last_non_empty = thumbnail.to_owned();

    for (idx, slot) in slots.iter().enumerate() {
        if !slot.trim().is_empty() {
            filled.push(slot.clone());
            last_non_empty = slot.clone();
            continue;
        }

        let next_non_empty = slots[idx + 1..].iter().find(|s| !s.trim().is_empty());
        match next_non_empty {
            Some(next) if !text::is_gif(next) => filled.push(next.clone()),
            _ => filled.push(last_non_empty.clone()),
        }
    }

    if let Some(last) = filled.last().cloned() {
        filled.push(last);
    }
    filled
}

/// Filler sequence for articles with too few usable images: the article image for the
/// leading slots, then stock placeholders in buckets of 2, 2 and the rest.
pub fn build_image_files_synthetic(
    config: &ChannelConfig,
    unique_id: &str,
    count: usize,
    sole_image: Option<&str>,
) -> Vec<String> {
    let thumbnail = config.thumbnail_filename(unique_id);
    let article_image = sole_image.unwrap_or(&thumbnail).to_owned();
    let article_slots = config.article_element_slots.min(count.saturating_sub(1));

    let mut files = Vec::with_capacity(count);
    files.push(thumbnail.clone());
    files.extend(std::iter::repeat_n(article_image, article_slots));

    let placeholders = count.saturating_sub(1 + article_slots);
    for idx in 0..placeholders {
        let bucket = match idx {
            0 | 1 => 0,
            2 | 3 => 1,
            _ => 2,
        };
        files.push(config.placeholder_filename(bucket, unique_id));
    }
    files
}

/// Unique non-blank pictures, first occurrence order.
pub fn unique_pictures(pictures: &[String]) -> Vec<&str> {
    let mut unique: Vec<&str> = Vec::new();
    for picture in pictures {
        let picture = picture.as_str();
        if picture.trim().is_empty() || unique.contains(&picture) {
            continue;
        }
        unique.push(picture);
    }
    unique
}

/// Chooses the fill policy from the number of usable images and returns `count` filenames.
pub fn fill_image_slots(
    config: &ChannelConfig,
    unique_id: &str,
    count: usize,
    pictures: &[String],
) -> anyhow::Result<Vec<String>> {
    let unique = unique_pictures(pictures);
    let files = if unique.len() < config.min_required_pictures {
        tracing::debug!(
            unique = unique.len(),
            min = config.min_required_pictures,
            "too few images; using placeholder slots"
        );
        build_image_files_synthetic(config, unique_id, count, unique.first().copied())
    } else {
        // The title column has no image of its own; it borrows from its neighbors.
        let mut slots = Vec::with_capacity(pictures.len() + 1);
        slots.push(String::new());
        slots.extend(pictures.iter().cloned());
        build_image_files(&config.thumbnail_filename(unique_id), &slots)
    };

    if files.len() != count {
        anyhow::bail!(
            "image slots cover {} columns, expected {count}",
            files.len()
        );
    }
    Ok(files)
}
