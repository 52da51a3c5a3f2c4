//! Re-segments overlong narration cells and re-expands every other track in lockstep.

use anyhow::Context as _;

use crate::config::SplitRule;
use crate::sheet::{InstructionSheet, Track, TrackKind, end_cells};
use crate::text;

/// Splits `text` into pieces that concatenate back to it. Pieces longer than `max_len` are cut
/// after the last delimiter in `[range_start, range_end)`, else after the first delimiter
/// anywhere, else left whole.
pub fn split_by_rules(text: &str, rule: &SplitRule) -> Vec<String> {
    let chars = text.chars().collect::<Vec<_>>();
    if chars.is_empty() {
        return vec![String::new()];
    }

    let mut pieces = Vec::new();
    let mut remaining = chars.as_slice();

    while !remaining.is_empty() {
        if remaining.len() <= rule.max_len {
            pieces.push(remaining.iter().collect());
            break;
        }

        let search_end = rule.range_end.min(remaining.len());
        let in_range = (rule.range_start..search_end)
            .rev()
            .find(|&idx| rule.is_delimiter(remaining[idx]));
        let cut = in_range.or_else(|| remaining.iter().position(|&ch| rule.is_delimiter(ch)));

        let Some(cut) = cut else {
            pieces.push(remaining.iter().collect());
            break;
        };

        let (head, tail) = remaining.split_at(cut + 1);
        pieces.push(head.iter().collect());
        remaining = tail;
    }

    pieces
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Expansion {
    /// The split pieces themselves.
    Pieces,
    /// The split pieces, flattened for speech.
    SpokenPieces,
    /// Value in the first sub-column, blanks after.
    FirstOnly,
    /// Value in every sub-column.
    Repeat,
    /// All blank; regenerated after expansion.
    Blank,
}

fn expansion(kind: TrackKind) -> Expansion {
    match kind {
        TrackKind::Text1 => Expansion::Pieces,
        TrackKind::Talk => Expansion::SpokenPieces,
        TrackKind::Se | TrackKind::SeSetting | TrackKind::Start | TrackKind::Title => {
            Expansion::FirstOnly
        }
        TrackKind::Number | TrackKind::TalkSetting | TrackKind::End => Expansion::Blank,
        _ => Expansion::Repeat,
    }
}

fn expand_cell(policy: Expansion, value: &str, pieces: &[String]) -> Vec<String> {
    let n = pieces.len();
    match policy {
        Expansion::Pieces => pieces.to_vec(),
        Expansion::SpokenPieces => pieces
            .iter()
            .map(|piece| text::normalize_inline(piece))
            .collect(),
        Expansion::FirstOnly => {
            let mut cells = vec![String::new(); n];
            if let Some(first) = cells.first_mut() {
                *first = value.to_owned();
            }
            cells
        }
        Expansion::Repeat => vec![value.to_owned(); n],
        Expansion::Blank => vec![String::new(); n],
    }
}

/// Splits every on-screen text cell by `rule` and rebuilds the sheet with matching columns in
/// every track, fresh numbering and the end marker on the new last column.
pub fn split_sheet(sheet: &InstructionSheet, rule: &SplitRule) -> anyhow::Result<InstructionSheet> {
    let columns = sheet.columns();
    let text1 = sheet.cells(TrackKind::Text1);

    let mut expanded: Vec<Vec<String>> = vec![Vec::new(); TrackKind::ALL.len()];
    for col in 0..columns {
        let pieces = split_by_rules(&text1[col], rule);
        let n = pieces.len();

        for (row, track) in sheet.tracks().iter().enumerate() {
            let value = &track.cells[col];
            let cells = expand_cell(expansion(track.kind), value, &pieces);
            if cells.len() != n {
                anyhow::bail!(
                    "track {:?} expanded column {col} to {} cells, expected {n}",
                    track.kind,
                    cells.len()
                );
            }
            expanded[row].extend(cells);
        }
    }

    let total = expanded
        .first()
        .map(Vec::len)
        .context("sheet has no tracks")?;
    let tracks = sheet
        .tracks()
        .iter()
        .zip(expanded)
        .map(|(track, cells)| {
            let cells = match track.kind {
                TrackKind::Number => (1..=total).map(|n| n.to_string()).collect(),
                TrackKind::End => end_cells(total),
                _ => cells,
            };
            Track::new(track.kind, cells)
        })
        .collect::<Vec<_>>();

    let split = InstructionSheet::new(tracks).context("resynchronize split sheet")?;
    tracing::debug!(before = columns, after = total, "split narration columns");
    Ok(split)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rule(max_len: usize, range_start: usize, range_end: usize) -> SplitRule {
        SplitRule {
            max_len,
            range_start,
            range_end,
            ..SplitRule::default()
        }
    }

    #[test]
    fn short_text_is_not_split() {
        let text = "あいうえお、かきくけこ。さしすせそたちつてと";
        assert_eq!(split_by_rules(text, &SplitRule::default()), vec![text]);
    }

    #[test]
    fn cuts_after_last_delimiter_in_range() {
        let text = "あいうえお、かきくけこ。さしすせそ、たちつてと";
        let pieces = split_by_rules(text, &rule(10, 3, 10));
        assert_eq!(pieces, vec!["あいうえお、", "かきくけこ。", "さしすせそ、", "たちつてと"]);
    }

    #[test]
    fn falls_back_to_first_delimiter_outside_range() {
        let text = "あいうえおかきくけこさしすせそ。たちつてと";
        let pieces = split_by_rules(text, &rule(10, 3, 10));
        assert_eq!(pieces, vec!["あいうえおかきくけこさしすせそ。", "たちつてと"]);
    }

    #[test]
    fn leaves_delimiterless_text_whole() {
        let text = "あ".repeat(80);
        assert_eq!(split_by_rules(&text, &SplitRule::default()), vec![text]);
    }

    #[test]
    fn empty_text_yields_one_empty_piece() {
        assert_eq!(split_by_rules("", &SplitRule::default()), vec![""]);
    }

    #[test]
    fn pieces_rejoin_and_respect_max_len() {
        let text = "今日はとても良い天気でした、公園に行って散歩をしました。".repeat(6);
        let rule = SplitRule::default();
        let pieces = split_by_rules(&text, &rule);

        assert_eq!(pieces.concat(), text);
        assert!(pieces.len() > 1);
        for piece in &pieces[..pieces.len() - 1] {
            assert!(piece.chars().count() <= rule.max_len, "piece={piece}");
        }
    }

    fn sheet_with_text1(text1: [&str; 3]) -> anyhow::Result<InstructionSheet> {
        let tracks = TrackKind::ALL
            .into_iter()
            .map(|kind| {
                let cells = (0..3)
                    .map(|col| match kind {
                        TrackKind::Text1 => text1[col].to_owned(),
                        _ => format!("{kind:?}{col}"),
                    })
                    .collect();
                Track::new(kind, cells)
            })
            .collect();
        InstructionSheet::new(tracks)
    }

    fn strings(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| (*s).to_owned()).collect()
    }

    #[test]
    fn split_sheet_expands_every_track_in_lockstep() -> anyhow::Result<()> {
        let sheet = sheet_with_text1(["前", "あいうえお、かきくけこ。さしすせそ", "後"])?;
        let split = split_sheet(&sheet, &rule(10, 3, 10))?;

        assert_eq!(split.columns(), 5);
        assert_eq!(
            split.cells(TrackKind::Text1),
            strings(&["前", "あいうえお、", "かきくけこ。", "さしすせそ", "後"])
        );
        assert_eq!(split.cells(TrackKind::Talk), split.cells(TrackKind::Text1));

        for kind in [
            TrackKind::Se,
            TrackKind::SeSetting,
            TrackKind::Start,
            TrackKind::Title,
        ] {
            let expected = [
                format!("{kind:?}0"),
                format!("{kind:?}1"),
                String::new(),
                String::new(),
                format!("{kind:?}2"),
            ];
            assert_eq!(split.cells(kind), expected, "track={kind:?}");
        }

        for kind in [
            TrackKind::ImageMaterial,
            TrackKind::Speaker,
            TrackKind::Text1Setting,
            TrackKind::FixedBgm,
        ] {
            let expected = [
                format!("{kind:?}0"),
                format!("{kind:?}1"),
                format!("{kind:?}1"),
                format!("{kind:?}1"),
                format!("{kind:?}2"),
            ];
            assert_eq!(split.cells(kind), expected, "track={kind:?}");
        }

        assert!(split.cells(TrackKind::TalkSetting).iter().all(String::is_empty));
        assert_eq!(
            split.cells(TrackKind::Number),
            strings(&["1", "2", "3", "4", "5"])
        );
        assert_eq!(split.cells(TrackKind::End), strings(&["", "", "", "", "end"]));
        Ok(())
    }

    #[test]
    fn spoken_pieces_flatten_line_breaks() -> anyhow::Result<()> {
        let sheet = sheet_with_text1(["前", "一行目\n二行目", ">>12 ｗｗｗ"])?;
        let split = split_sheet(&sheet, &SplitRule::default())?;

        assert_eq!(split.columns(), 3);
        assert_eq!(split.cells(TrackKind::Text1)[1], "一行目\n二行目");
        assert_eq!(split.cells(TrackKind::Talk)[1], "一行目、二行目");
        assert_eq!(split.cells(TrackKind::Talk)[2], " ｗ");
        Ok(())
    }

    #[test]
    fn rejoin_holds_for_awkward_inputs() {
        let inputs = [
            "」」」」」」」」」」」」」」」」」」",
            "abc、def。ghi」jkl",
            "改行を\n含む、長い文章。\nこれも、続く。",
        ];
        for text in inputs {
            for rule in [rule(3, 1, 3), rule(5, 0, 2), SplitRule::default()] {
                assert_eq!(split_by_rules(text, &rule).concat(), text, "text={text}");
            }
        }
    }
}
