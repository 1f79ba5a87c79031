use log::{debug, warn};
use crate::errors::SubtitleError;

// @module: Event extraction and normalization for ASS subtitle scripts

// @const: Header line opening the event section
pub const EVENTS_HEADER: &str = "[Events]";

// @const: Prefix of the column declaration following the header
pub const FORMAT_PREFIX: &str = "Format:";

// @const: Style name marking technical translation-mode rows
pub const TRANSLATION_MODE_STYLE: &str = "TLmode";

// @const: Format tag that gets padded in canonical lines
pub const COMMENT_FORMAT: &str = "Comment";

// @const: Padding appended after "Comment: " so timings line up with "Dialogue: "
pub const COMMENT_PADDING: char = '\u{00A0}';

// Layer/Start/End/Style/Name/MarginL/MarginR/MarginV/Effect/Text
const MAX_EVENT_FIELDS: usize = 10;
const MIN_EVENT_FIELDS: usize = 4;

/// Single event row split into the fields relevant for comparison
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EventRecord<'a> {
    // @field: Event type tag ("Dialogue", "Comment", ...)
    pub format: &'a str,

    // @field: Start timestamp as written in the script
    pub start: &'a str,

    // @field: End timestamp as written in the script
    pub end: &'a str,

    // @field: Style column, only used for filtering
    pub mode: &'a str,

    // @field: Remaining payload, may contain commas
    pub text: &'a str,
}

impl<'a> EventRecord<'a> {
    /// Parse a raw event row.
    ///
    /// The row is split on commas into at most ten fields so that commas in the
    /// dialogue text stay part of the payload. `line_number` is only used for
    /// error reporting.
    pub fn parse(line: &'a str, line_number: usize) -> Result<Self, SubtitleError> {
        let fields: Vec<&str> = line.splitn(MAX_EVENT_FIELDS, ',').collect();

        if fields.len() < MIN_EVENT_FIELDS {
            return Err(SubtitleError::MalformedEvent {
                line_number,
                fields: fields.len(),
            });
        }

        let format = fields[0].split(':').next().unwrap_or_default();

        Ok(EventRecord {
            format,
            start: fields[1],
            end: fields[2],
            mode: fields[3],
            text: fields[fields.len() - 1],
        })
    }

    /// Rows styled as translation-mode annotations are not visible subtitles
    pub fn is_translation_mode(&self) -> bool {
        self.mode == TRANSLATION_MODE_STYLE
    }

    pub fn is_comment(&self) -> bool {
        self.format == COMMENT_FORMAT
    }

    /// Canonical comparison form: `<format>: <start>, <end>, <text>`
    pub fn canonical(&self) -> String {
        let mut line = String::with_capacity(
            self.format.len() + self.start.len() + self.end.len() + self.text.len() + 8,
        );

        line.push_str(self.format);
        line.push_str(": ");
        if self.is_comment() {
            line.push(COMMENT_PADDING);
        }
        line.push_str(self.start);
        line.push_str(", ");
        line.push_str(self.end);
        line.push_str(", ");
        line.push_str(self.text);

        line
    }
}

/// Split file content into raw lines, dropping line terminators and a leading BOM
pub fn split_lines(content: &str) -> Vec<String> {
    let content = content.strip_prefix('\u{FEFF}').unwrap_or(content);
    content.lines().map(String::from).collect()
}

// @checks: Line opens another script section
fn is_section_header(line: &str) -> bool {
    let line = line.trim_end();
    line.starts_with('[') && line.ends_with(']')
}

/// Extract the event section of a script and convert every visible event to
/// its canonical line.
///
/// The header and the column declaration right after it are skipped. The
/// section ends at the next section header or at the end of the file. Blank
/// lines and translation-mode rows are dropped; the order of the remaining
/// events is preserved.
pub fn normalize<S: AsRef<str>>(raw_lines: &[S]) -> Result<Vec<String>, SubtitleError> {
    let header_index = raw_lines
        .iter()
        .position(|line| line.as_ref() == EVENTS_HEADER)
        .ok_or(SubtitleError::SectionNotFound)?;

    if let Some(format_line) = raw_lines.get(header_index + 1) {
        if !format_line.as_ref().starts_with(FORMAT_PREFIX) {
            warn!(
                "Line {} after {} is not a column declaration, skipping it anyway",
                header_index + 2,
                EVENTS_HEADER
            );
        }
    }

    let mut canonical = Vec::new();
    let mut filtered = 0usize;

    for (index, raw) in raw_lines.iter().enumerate().skip(header_index + 2) {
        let line = raw.as_ref();

        if is_section_header(line) {
            debug!("Event section ends at line {}: {}", index + 1, line);
            break;
        }

        if line.trim().is_empty() {
            continue;
        }

        let record = EventRecord::parse(line, index + 1)?;
        if record.is_translation_mode() {
            filtered += 1;
            continue;
        }

        canonical.push(record.canonical());
    }

    debug!(
        "Normalized {} event(s), filtered {} {} row(s)",
        canonical.len(),
        filtered,
        TRANSLATION_MODE_STYLE
    );

    Ok(canonical)
}
