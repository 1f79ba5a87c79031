/*!
 * Comparison session holding the two loaded scripts.
 *
 * The session owns the raw lines of the old and new file until a comparison
 * is requested, and turns missing inputs or missing event sections into
 * errors that say which side failed.
 */

use log::{debug, info};

use crate::diff::{Classifier, DiffOptions, RenderInstruction};
use crate::errors::{CompareError, Side, SubtitleError};
use crate::subtitle_processor;

/// Raw lines of a loaded script
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawFile {
    // @field: Display name, usually the file name
    pub name: String,

    // @field: Lines without terminators
    pub lines: Vec<String>,
}

impl RawFile {
    pub fn new(name: impl Into<String>, lines: Vec<String>) -> Self {
        Self {
            name: name.into(),
            lines,
        }
    }

    /// Build from file content, splitting it into lines
    pub fn from_content(name: impl Into<String>, content: &str) -> Self {
        Self::new(name, subtitle_processor::split_lines(content))
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }
}

/// Holds the old and new script between loading and comparing
#[derive(Debug, Default)]
pub struct ComparisonSession {
    old: Option<RawFile>,
    new: Option<RawFile>,
}

impl ComparisonSession {
    pub fn new() -> Self {
        Self::default()
    }

    // @sets: Old script, replacing any previous one
    pub fn load_old(&mut self, file: RawFile) {
        debug!("Loaded old file '{}' ({} lines)", file.name, file.lines.len());
        self.old = Some(file);
    }

    // @sets: New script, replacing any previous one
    pub fn load_new(&mut self, file: RawFile) {
        debug!("Loaded new file '{}' ({} lines)", file.name, file.lines.len());
        self.new = Some(file);
    }

    pub fn old(&self) -> Option<&RawFile> {
        self.old.as_ref()
    }

    pub fn new_file(&self) -> Option<&RawFile> {
        self.new.as_ref()
    }

    pub fn clear(&mut self) {
        self.old = None;
        self.new = None;
    }

    /// Normalize both scripts and classify their differences.
    ///
    /// An empty file counts as not selected. Both sides are checked before
    /// failing so the error names every side that is missing.
    pub fn compare(&self, options: &DiffOptions) -> Result<Vec<RenderInstruction>, CompareError> {
        let (old, new) = match (
            self.old.as_ref().filter(|f| !f.is_empty()),
            self.new.as_ref().filter(|f| !f.is_empty()),
        ) {
            (Some(old), Some(new)) => (old, new),
            (old, new) => {
                let side = Side::from_flags(old.is_none(), new.is_none()).unwrap_or(Side::Both);
                return Err(CompareError::NoInputSelected(side));
            }
        };

        let old_events = subtitle_processor::normalize(&old.lines);
        let new_events = subtitle_processor::normalize(&new.lines);

        let missing = Side::from_flags(
            matches!(old_events, Err(SubtitleError::SectionNotFound)),
            matches!(new_events, Err(SubtitleError::SectionNotFound)),
        );
        if let Some(side) = missing {
            return Err(CompareError::SectionNotFound(side));
        }

        let old_events = old_events.map_err(|source| CompareError::Malformed { side: Side::Old, source })?;
        let new_events = new_events.map_err(|source| CompareError::Malformed { side: Side::New, source })?;

        info!(
            "Comparing {} event(s) of '{}' with {} event(s) of '{}'",
            old_events.len(),
            old.name,
            new_events.len(),
            new.name
        );

        Ok(Classifier::with_options(*options).classify(&old_events, &new_events))
    }
}
