/*!
 * # AegiChanges - changes between two subtitle scripts
 *
 * A Rust library for comparing the events of two Advanced SubStation Alpha
 * (`.ass`) subtitle scripts, typically two revisions of a translation.
 *
 * ## Features
 *
 * - Extract the `[Events]` section and normalize every event to its type,
 *   timing and text, ignoring styles, actors, margins and effects
 * - Skip translation-mode (`TLmode`) annotation rows
 * - Line-level diff with inline highlights for edited lines
 * - Plain text, `.diff`, HTML and coloured terminal output
 *
 * ## Architecture
 *
 * The library is organized in these main modules:
 * - `subtitle_processor`: Event extraction and normalization
 * - `diff`: Sequence matching and line classification:
 *   - `diff::matcher`: Ratcliff/Obershelp sequence matcher
 *   - `diff::classifier`: Render instructions with inline highlight ranges
 * - `render`: Output formats behind a common `Renderer` trait
 * - `session`: Comparison session owning the loaded scripts
 * - `app_config`: Configuration management
 * - `file_utils`: File system operations
 * - `app_controller`: Main application controller
 * - `errors`: Custom error types for the application
 *
 * ## License
 *
 * This project is licensed under the MIT License
 */

// Global lints configuration
// These lints will be allowed but not auto-fixed
#![allow(clippy::uninlined_format_args)]
#![allow(clippy::redundant_closure_for_method_calls)]

// Public modules
pub mod app_config;
pub mod app_controller;
pub mod diff;
pub mod errors;
pub mod file_utils;
pub mod render;
pub mod session;
pub mod subtitle_processor;

// Re-export main types for easier usage
pub use app_config::{Config, OutputFormat};
pub use diff::{classify, Classifier, DiffOptions, DiffSummary, DiffTag, Highlight, RenderInstruction};
pub use errors::{AppError, CompareError, Side, SubtitleError};
pub use render::Renderer;
pub use session::{ComparisonSession, RawFile};
pub use subtitle_processor::normalize;
