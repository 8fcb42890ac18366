/*!
 * Block translation of item texts.
 *
 * - `batch`: groups texts into size-bounded blocks, submits each block to a
 *   backend with bounded retries, and splits the result back per item
 */

pub use self::batch::{plan_blocks, reconcile, BatchOptions, BatchTranslator, BLOCK_SEPARATOR};

pub mod batch;
