/*!
 * Line-level diff of canonical event lines.
 *
 * - `matcher`: Ratcliff/Obershelp sequence matcher used for both lines and characters
 * - `classifier`: alignment of two line sequences into render instructions,
 *   with inline highlight ranges for similar removed/added pairs
 */

// Re-export main types for easier usage
pub use self::classifier::{
    classify, Classifier, DiffOptions, DiffSummary, DiffTag, Highlight, RenderInstruction,
};
pub use self::matcher::{Match, OpTag, Opcode, SequenceMatcher};

// Submodules
pub mod classifier;
pub mod matcher;
