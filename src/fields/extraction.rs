use std::path::{Path, PathBuf};

use crate::errors::FileError;
use crate::file_utils::{DecodedFile, FileManager};
use crate::progress::{ProgressEvent, ProgressSink};

use super::classifier::{
    classify_line, has_ascii_letter, has_brackets, char_len, is_excluded_value,
    starts_with_drive_path, LineShape,
};

// @module: Extraction of translatable spans from data file lines

/// Structural kind of an item, carrying exactly what reconstruction needs
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ItemKind {
    /// `key=value`
    KeyValue { key: String },
    /// `key: value`
    ColonValue { key: String },
    /// One field of a `;`-delimited record
    CsvCell { column_index: usize },
    /// Whole free-text line
    FullLine,
}

impl ItemKind {
    /// Short label used in reports
    pub fn label(&self) -> &'static str {
        match self {
            Self::KeyValue { .. } => "key_value",
            Self::ColonValue { .. } => "colon_value",
            Self::CsvCell { .. } => "csv_cell",
            Self::FullLine => "full_line",
        }
    }
}

/// A candidate span awaiting translation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TranslatableItem {
    /// File the item was found in
    pub file_path: PathBuf,
    /// Zero-based line index
    pub line_num: usize,
    /// Exact text to translate
    pub value: String,
    /// Untouched source line, terminator included
    pub original_line: String,
    /// Structural kind and positional metadata
    pub kind: ItemKind,
}

/// Result of reading and scanning one file
#[derive(Debug, Clone)]
pub struct FileExtraction {
    /// The decoded file
    pub file: DecodedFile,
    /// Items in line order
    pub items: Vec<TranslatableItem>,
}

/// Extract the translatable items of a single line.
///
/// Returns several items only for delimited records with more than one
/// qualifying field.
pub fn extract_line(file_path: &Path, line_num: usize, line: &str) -> Vec<TranslatableItem> {
    let item = |value: &str, kind: ItemKind| TranslatableItem {
        file_path: file_path.to_path_buf(),
        line_num,
        value: value.to_string(),
        original_line: line.to_string(),
        kind,
    };

    match classify_line(line) {
        LineShape::Skipped => Vec::new(),

        LineShape::KeyValue { key, value } => {
            // A path on either side of the '=' means the whole line is data
            if starts_with_drive_path(key) || starts_with_drive_path(value) {
                return Vec::new();
            }
            if is_excluded_value(value) || !has_ascii_letter(value) || value.starts_with("http") {
                return Vec::new();
            }
            vec![item(value, ItemKind::KeyValue { key: key.to_string() })]
        }

        LineShape::Delimited(fields) => fields
            .iter()
            .enumerate()
            .filter_map(|(column_index, field)| {
                let field = field.trim();
                if field == "-" || is_excluded_value(field) || !has_ascii_letter(field) {
                    return None;
                }
                Some(item(field, ItemKind::CsvCell { column_index }))
            })
            .collect(),

        LineShape::ColonValue { key, value } => {
            if is_excluded_value(value) || !has_ascii_letter(value) {
                return Vec::new();
            }
            vec![item(value, ItemKind::ColonValue { key: key.to_string() })]
        }

        LineShape::FreeText(text) => {
            if has_brackets(text) || !has_ascii_letter(text) || char_len(text) < 2 {
                return Vec::new();
            }
            vec![item(text, ItemKind::FullLine)]
        }
    }
}

/// Extract every translatable item from already decoded lines
pub fn extract_from_lines(file_path: &Path, lines: &[String]) -> Vec<TranslatableItem> {
    lines
        .iter()
        .enumerate()
        .flat_map(|(line_num, line)| extract_line(file_path, line_num, line))
        .collect()
}

/// Read a file with encoding fallback and extract its items.
///
/// An unreadable file is reported to the sink and surfaces as an error so the
/// caller can treat it as contributing zero items.
pub fn extract_translatable_content(
    path: &Path,
    sink: &dyn ProgressSink,
) -> Result<FileExtraction, FileError> {
    let file = match FileManager::read_lines(path) {
        Ok(file) => file,
        Err(e) => {
            sink.report(ProgressEvent::FileUnreadable {
                path: path.to_path_buf(),
                reason: e.to_string(),
            });
            return Err(e);
        }
    };

    let items = extract_from_lines(path, &file.lines);
    Ok(FileExtraction { file, items })
}
