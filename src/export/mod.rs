pub mod docx;

use std::cmp::Ordering;
use std::fs;
use std::io::BufWriter;
use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use rust_i18n::t;
use tracing::{info, warn};

use crate::entry::VocabEntry;
use crate::error::VocabError;
use crate::export::docx::{ExportLabels, write_docx};

/// One table row of the exported list.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ExportRow {
    pub index: usize,
    pub original: String,
    pub part_of_speech: String,
    pub phonetics: String,
    pub meanings: Vec<String>,
    pub example: String,
}

/// Case-insensitive by original text; raw text breaks ties so the order is
/// total.
pub fn compare_for_export(a: &VocabEntry, b: &VocabEntry) -> Ordering {
    a.original
        .to_lowercase()
        .cmp(&b.original.to_lowercase())
        .then_with(|| a.original.cmp(&b.original))
}

pub fn sort_for_export(entries: &[VocabEntry]) -> Vec<&VocabEntry> {
    let mut sorted: Vec<&VocabEntry> = entries.iter().collect();
    sorted.sort_by(|a, b| compare_for_export(a, b));
    sorted
}

pub fn export_rows(entries: &[VocabEntry]) -> Vec<ExportRow> {
    sort_for_export(entries)
        .into_iter()
        .enumerate()
        .map(|(i, entry)| ExportRow {
            index: i + 1,
            original: entry.original.clone(),
            part_of_speech: entry.part_of_speech.clone(),
            phonetics: entry.phonetics.clone(),
            meanings: entry
                .vietnamese_meaning
                .split('\n')
                .map(|m| m.trim_end_matches('\r').to_string())
                .collect(),
            example: entry.example.clone(),
        })
        .collect()
}

pub fn export_file_name(date: NaiveDate) -> String {
    format!("Vocab_List_{}.docx", date.format("%Y-%m-%d"))
}

pub fn localized_labels() -> ExportLabels {
    ExportLabels {
        title: t!("export.title").to_string(),
        headers: [
            t!("export.col_index").to_string(),
            t!("export.col_term").to_string(),
            t!("export.col_pos").to_string(),
            t!("export.col_phonetics").to_string(),
            t!("export.col_meaning").to_string(),
            t!("export.col_example").to_string(),
        ],
    }
}

fn export_failure(e: impl std::fmt::Display) -> VocabError {
    VocabError::ExportFailure(e.to_string())
}

/// Write the sorted list into `dir`. Returns `Ok(None)` when there is
/// nothing to export.
pub fn export_to_dir(
    entries: &[VocabEntry],
    dir: &Path,
    date: NaiveDate,
) -> Result<Option<PathBuf>, VocabError> {
    if entries.is_empty() {
        return Ok(None);
    }
    fs::create_dir_all(dir).map_err(export_failure)?;
    let path = dir.join(export_file_name(date));
    let tmp = path.with_extension("docx.tmp");

    let rows = export_rows(entries);
    let written =
        write_rows(&tmp, &rows).and_then(|()| fs::rename(&tmp, &path).map_err(export_failure));
    if let Err(e) = written {
        // Never leave a half-written document behind.
        let _ = fs::remove_file(&tmp);
        warn!(path = %path.display(), error = %e, "export aborted");
        return Err(e);
    }

    info!(count = rows.len(), path = %path.display(), "vocabulary exported");
    Ok(Some(path))
}

fn write_rows(path: &Path, rows: &[ExportRow]) -> Result<(), VocabError> {
    let file = fs::File::create(path).map_err(export_failure)?;
    let writer =
        write_docx(rows, &localized_labels(), BufWriter::new(file)).map_err(export_failure)?;
    let file = writer.into_inner().map_err(|e| export_failure(e.error()))?;
    file.sync_all().map_err(export_failure)
}
