//! The instruction sheet: a fixed set of named tracks sharing one column index.

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TrackKind {
    Start,
    Title,
    Number,
    Talk,
    Speaker,
    TalkSetting,
    VideoMaterial,
    VideoSetting,
    ImageMaterial,
    ImageSetting,
    Se,
    SeSetting,
    Text1,
    Text1Setting,
    Text2,
    Text2Setting,
    FixedText,
    FixedTextSetting,
    FixedBgm,
    End,
}

pub const END_MARKER: &str = "end";

impl TrackKind {
    /// Sheet row order.
    pub const ALL: [TrackKind; 20] = [
        TrackKind::Start,
        TrackKind::Title,
        TrackKind::Number,
        TrackKind::Talk,
        TrackKind::Speaker,
        TrackKind::TalkSetting,
        TrackKind::VideoMaterial,
        TrackKind::VideoSetting,
        TrackKind::ImageMaterial,
        TrackKind::ImageSetting,
        TrackKind::Se,
        TrackKind::SeSetting,
        TrackKind::Text1,
        TrackKind::Text1Setting,
        TrackKind::Text2,
        TrackKind::Text2Setting,
        TrackKind::FixedText,
        TrackKind::FixedTextSetting,
        TrackKind::FixedBgm,
        TrackKind::End,
    ];

    pub fn label(self) -> &'static str {
        match self {
            TrackKind::Start => "start",
            TrackKind::Title => "タイトル",
            TrackKind::Number => "番号",
            TrackKind::Talk => "話す内容",
            TrackKind::Speaker => "話者設定",
            TrackKind::TalkSetting => "話す内容設定",
            TrackKind::VideoMaterial => "動画素材",
            TrackKind::VideoSetting => "動画設定",
            TrackKind::ImageMaterial => "静止画素材",
            TrackKind::ImageSetting => "静止画設定",
            TrackKind::Se => "SE",
            TrackKind::SeSetting => "SE設定",
            TrackKind::Text1 => "テキスト1",
            TrackKind::Text1Setting => "テキスト1設定",
            TrackKind::Text2 => "テキスト2",
            TrackKind::Text2Setting => "テキスト2設定",
            TrackKind::FixedText => "固定テキスト",
            TrackKind::FixedTextSetting => "固定テキスト設定",
            TrackKind::FixedBgm => "固定BGM",
            TrackKind::End => "",
        }
    }

    fn index(self) -> usize {
        self as usize
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Track {
    pub kind: TrackKind,
    pub cells: Vec<String>,
}

impl Track {
    pub fn new(kind: TrackKind, cells: Vec<String>) -> Self {
        Self { kind, cells }
    }

    pub fn label(&self) -> &'static str {
        self.kind.label()
    }

    /// Label followed by the cells, as written to the spreadsheet.
    pub fn row(&self) -> Vec<String> {
        let mut row = Vec::with_capacity(self.cells.len() + 1);
        row.push(self.label().to_owned());
        row.extend(self.cells.iter().cloned());
        row
    }
}

/// All 20 tracks, in [`TrackKind::ALL`] order, with the same number of content columns.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InstructionSheet {
    tracks: Vec<Track>,
    columns: usize,
}

impl InstructionSheet {
    pub fn new(tracks: Vec<Track>) -> anyhow::Result<Self> {
        if tracks.len() != TrackKind::ALL.len() {
            anyhow::bail!(
                "instruction sheet needs {} tracks, got {}",
                TrackKind::ALL.len(),
                tracks.len()
            );
        }
        for (track, expected) in tracks.iter().zip(TrackKind::ALL) {
            if track.kind != expected {
                anyhow::bail!(
                    "track {:?} is out of order (expected {:?})",
                    track.kind,
                    expected
                );
            }
        }

        let columns = tracks[0].cells.len();
        if let Some(ragged) = tracks.iter().find(|track| track.cells.len() != columns) {
            anyhow::bail!(
                "track {:?} has {} columns, expected {columns}",
                ragged.kind,
                ragged.cells.len()
            );
        }

        Ok(Self { tracks, columns })
    }

    /// Content columns, not counting the label column.
    pub fn columns(&self) -> usize {
        self.columns
    }

    pub fn tracks(&self) -> &[Track] {
        &self.tracks
    }

    pub fn track(&self, kind: TrackKind) -> &Track {
        &self.tracks[kind.index()]
    }

    pub fn cells(&self, kind: TrackKind) -> &[String] {
        &self.track(kind).cells
    }

    /// Mutable access to one track's cells; the length cannot change through a slice.
    pub fn cells_mut(&mut self, kind: TrackKind) -> &mut [String] {
        &mut self.tracks[kind.index()].cells
    }

    pub fn into_tracks(self) -> Vec<Track> {
        self.tracks
    }

    /// The rectangular table handed to the spreadsheet writer.
    pub fn to_rows(&self) -> Vec<Vec<String>> {
        self.tracks.iter().map(Track::row).collect()
    }
}

/// An end row whose last cell carries the terminal marker.
pub fn end_cells(columns: usize) -> Vec<String> {
    let mut cells = vec![String::new(); columns];
    if let Some(last) = cells.last_mut() {
        *last = END_MARKER.to_owned();
    }
    cells
}
