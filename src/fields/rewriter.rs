use std::collections::HashMap;

use crate::errors::FileError;

use super::extraction::{ItemKind, TranslatableItem};

// @module: Reinsertion of translated values into the original line layout

/// Everything the rewriter needs to rebuild one line
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TranslationUpdate {
    /// Zero-based line index
    pub line_num: usize,
    /// Replacement value
    pub translated_value: String,
    /// Structural kind with positional metadata
    pub kind: ItemKind,
    /// Source line, used to re-split delimited records
    pub original_line: String,
}

impl TranslationUpdate {
    /// Pair an item with its translation
    pub fn from_item(item: &TranslatableItem, translated_value: impl Into<String>) -> Self {
        Self {
            line_num: item.line_num,
            translated_value: translated_value.into(),
            kind: item.kind.clone(),
            original_line: item.original_line.clone(),
        }
    }
}

/// Apply updates to a copy of the original lines.
///
/// Lines without an update are returned untouched. Rebuilt lines always end
/// with a single `\n`. Several cell updates on the same delimited record are
/// accumulated so that none of them overwrites another column.
pub fn apply_updates(lines: &[String], updates: &[TranslationUpdate]) -> Result<Vec<String>, FileError> {
    let mut output = lines.to_vec();
    let mut records: HashMap<usize, Vec<String>> = HashMap::new();

    for update in updates {
        if update.line_num >= lines.len() {
            return Err(FileError::LineOutOfRange {
                line_num: update.line_num,
                line_count: lines.len(),
            });
        }

        let new_line = match &update.kind {
            ItemKind::KeyValue { key } => format!("{}={}\n", key, update.translated_value),
            ItemKind::ColonValue { key } => format!("{}: {}\n", key, update.translated_value),
            ItemKind::CsvCell { column_index } => {
                let fields = records.entry(update.line_num).or_insert_with(|| {
                    update
                        .original_line
                        .trim()
                        .split(';')
                        .map(str::to_string)
                        .collect()
                });
                if let Some(field) = fields.get_mut(*column_index) {
                    *field = update.translated_value.clone();
                }
                format!("{}\n", fields.join(";"))
            }
            ItemKind::FullLine => format!("{}\n", update.translated_value),
        };

        output[update.line_num] = new_line;
    }

    Ok(output)
}
