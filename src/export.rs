use std::fs::OpenOptions;
use std::io::Write as _;
use std::path::{Path, PathBuf};

use anyhow::Context as _;
use chrono::SecondsFormat;

use crate::cli::SheetFormat;
use crate::formats::SheetDocument;
use crate::sheet::InstructionSheet;

impl SheetFormat {
    pub fn extension(self) -> &'static str {
        match self {
            SheetFormat::Json => "json",
            SheetFormat::Tsv => "tsv",
        }
    }
}

pub fn sheet_document(article_id: &str, url: &str, sheet: &InstructionSheet) -> SheetDocument {
    SheetDocument {
        article_id: article_id.to_owned(),
        url: url.to_owned(),
        generated_at: chrono::Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true),
        rows: sheet.to_rows(),
    }
}

pub fn render_tsv(rows: &[Vec<String>]) -> String {
    let mut out = String::new();
    for row in rows {
        let line = row
            .iter()
            .map(|cell| tsv_cell(cell))
            .collect::<Vec<_>>()
            .join("\t");
        out.push_str(&line);
        out.push('\n');
    }
    out
}

fn tsv_cell(cell: &str) -> String {
    if cell.contains(['\t', '\n', '\r', '"']) {
        format!("\"{}\"", cell.replace('"', "\"\""))
    } else {
        cell.to_owned()
    }
}

/// Writes `<out_dir>/<article_id>.<ext>`. Refuses to overwrite an existing file.
pub fn write_sheet(
    out_dir: &Path,
    document: &SheetDocument,
    format: SheetFormat,
) -> anyhow::Result<PathBuf> {
    let path = out_dir.join(format!("{}.{}", document.article_id, format.extension()));
    let contents = match format {
        SheetFormat::Json => {
            let mut json =
                serde_json::to_string_pretty(document).context("serialize sheet document")?;
            json.push('\n');
            json
        }
        SheetFormat::Tsv => render_tsv(&document.rows),
    };

    let mut file = OpenOptions::new()
        .write(true)
        .create_new(true)
        .open(&path)
        .with_context(|| format!("open output: {}", path.display()))?;
    file.write_all(contents.as_bytes())
        .with_context(|| format!("write output: {}", path.display()))?;
    file.flush()
        .with_context(|| format!("flush output: {}", path.display()))?;

    tracing::info!(path = %path.display(), format = format.extension(), "wrote sheet");
    Ok(path)
}
