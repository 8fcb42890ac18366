/*!
 * Field handling for structured data files.
 *
 * - `classifier`: line shape detection and numeric/path/bracket heuristics
 * - `extraction`: per-file scan producing ordered translatable items
 * - `rewriter`: reinsertion of translations into the original layout
 */

pub use self::extraction::{
    extract_from_lines, extract_line, extract_translatable_content, FileExtraction, ItemKind,
    TranslatableItem,
};
pub use self::rewriter::{apply_updates, TranslationUpdate};

pub mod classifier;
pub mod extraction;
pub mod rewriter;
