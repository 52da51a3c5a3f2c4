use crate::config::ChannelConfig;
use crate::sheet::{InstructionSheet, TrackKind};

/// Blanks setting cells whose driving cell is empty. Each pass writes a different setting
/// track, so the order does not matter.
pub fn cleanup(sheet: &mut InstructionSheet, config: &ChannelConfig) {
    // Silent columns show the GIF as-is and need no voice.
    let silent = blank_columns(sheet, TrackKind::Talk);
    for &col in &silent {
        sheet.cells_mut(TrackKind::Speaker)[col].clear();
        sheet.cells_mut(TrackKind::ImageSetting)[col] = config.gif_image_setting.clone();
    }

    blank_where_empty(sheet, TrackKind::ImageMaterial, TrackKind::ImageSetting);
    blank_where_empty(sheet, TrackKind::Text1, TrackKind::Text1Setting);
    blank_where_empty(sheet, TrackKind::Text2, TrackKind::Text2Setting);

    tracing::debug!(silent = silent.len(), "cleaned up setting tracks");
}

fn blank_columns(sheet: &InstructionSheet, kind: TrackKind) -> Vec<usize> {
    sheet
        .cells(kind)
        .iter()
        .enumerate()
        .filter(|(_, cell)| cell.is_empty())
        .map(|(col, _)| col)
        .collect()
}

fn blank_where_empty(sheet: &mut InstructionSheet, driver: TrackKind, setting: TrackKind) {
    for col in blank_columns(sheet, driver) {
        sheet.cells_mut(setting)[col].clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sheet::Track;

    fn sheet_with(cells: &[(TrackKind, [&str; 3])]) -> anyhow::Result<InstructionSheet> {
        let tracks = TrackKind::ALL
            .into_iter()
            .map(|kind| {
                let values = cells
                    .iter()
                    .find(|(k, _)| *k == kind)
                    .map(|(_, values)| values.iter().map(|v| (*v).to_owned()).collect())
                    .unwrap_or_else(|| vec!["x".to_owned(); 3]);
                Track::new(kind, values)
            })
            .collect();
        InstructionSheet::new(tracks)
    }

    #[test]
    fn silent_columns_drop_speaker_and_show_gif() -> anyhow::Result<()> {
        let config = ChannelConfig {
            gif_image_setting: "GIFそのまま".to_owned(),
            ..ChannelConfig::default()
        };
        let mut sheet = sheet_with(&[(TrackKind::Talk, ["話す", "", "話す"])])?;

        cleanup(&mut sheet, &config);

        assert_eq!(sheet.cells(TrackKind::Speaker), ["x", "", "x"]);
        assert_eq!(sheet.cells(TrackKind::ImageSetting), ["x", "GIFそのまま", "x"]);
        Ok(())
    }

    #[test]
    fn empty_drivers_blank_their_settings() -> anyhow::Result<()> {
        let mut sheet = sheet_with(&[
            (TrackKind::ImageMaterial, ["", "a.jpg", "a.jpg"]),
            (TrackKind::Text1, ["a", "", "c"]),
            (TrackKind::Text2, ["", "", "c"]),
        ])?;

        cleanup(&mut sheet, &ChannelConfig::default());

        assert_eq!(sheet.cells(TrackKind::ImageSetting), ["", "x", "x"]);
        assert_eq!(sheet.cells(TrackKind::Text1Setting), ["x", "", "x"]);
        assert_eq!(sheet.cells(TrackKind::Text2Setting), ["", "", "x"]);
        assert_eq!(sheet.cells(TrackKind::Speaker), ["x", "x", "x"]);
        Ok(())
    }
}
