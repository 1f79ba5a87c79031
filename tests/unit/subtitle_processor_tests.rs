/*!
 * Tests for event extraction and normalization
 */

use aegichanges::errors::SubtitleError;
use aegichanges::subtitle_processor::{normalize, split_lines, COMMENT_PADDING};
use crate::common;

/// An event section without rows is valid and yields nothing
#[test]
fn test_normalize_withEmptyEventSection_shouldReturnEmpty() {
    let lines = common::script_lines(&[]);
    let result = normalize(&lines).unwrap();
    assert!(result.is_empty());
}

/// A header followed by nothing at all is also an empty section
#[test]
fn test_normalize_withHeaderAtEndOfFile_shouldReturnEmpty() {
    let lines = vec!["[Script Info]".to_string(), "[Events]".to_string()];
    assert_eq!(normalize(&lines).unwrap(), Vec::<String>::new());
}

/// Scripts without the [Events] marker are rejected
#[test]
fn test_normalize_withoutEventsMarker_shouldFailWithSectionNotFound() {
    let lines = split_lines("[Script Info]\nTitle: nothing here\n\n[V4+ Styles]\n");
    assert_eq!(normalize(&lines), Err(SubtitleError::SectionNotFound));
}

/// The marker has to match the whole line
#[test]
fn test_normalize_withIndentedMarker_shouldNotMatch() {
    let lines = vec![" [Events]".to_string(), common::EVENTS_FORMAT_LINE.to_string()];
    assert_eq!(normalize(&lines), Err(SubtitleError::SectionNotFound));
}

/// Translation-mode rows and blank lines are dropped, everything else keeps its order
#[test]
fn test_normalize_withTlModeRows_shouldFilterThemAndKeepOrder() {
    let first = common::dialogue("0:00:01.00", "0:00:02.00", "First");
    let second = common::dialogue("0:00:03.00", "0:00:04.00", "Second");
    let lines = common::script_lines(&[
        &first,
        "Comment: 0,0:00:01.00,0:00:02.00,TLmode,,0,0,0,,Erster",
        "",
        &second,
    ]);

    let result = normalize(&lines).unwrap();

    assert_eq!(
        result,
        vec![
            "Dialogue: 0:00:01.00, 0:00:02.00, First".to_string(),
            "Dialogue: 0:00:03.00, 0:00:04.00, Second".to_string(),
        ]
    );
}

/// Fields outside format, start, end and text do not affect the canonical line
#[test]
fn test_normalize_withDifferentStyleAndActor_shouldProduceEqualLines() {
    let old = common::script_lines(&["Dialogue: 0,0:00:01.00,0:00:02.00,Default,Alice,0,0,0,,Hi"]);
    let new = common::script_lines(&["Dialogue: 1,0:00:01.00,0:00:02.00,Sign,Bob,10,10,20,fade,Hi"]);

    assert_eq!(normalize(&old).unwrap(), normalize(&new).unwrap());
}

/// Comment tags get exactly one padding character more than other formats
#[test]
fn test_normalize_withComment_shouldPadFormatByOneCharacter() {
    let lines = common::script_lines(&[
        "Comment: 0,0:00:01.00,0:00:02.00,Default,,0,0,0,,note",
        "Dialogue: 0,0:00:01.00,0:00:02.00,Default,,0,0,0,,note",
    ]);

    let result = normalize(&lines).unwrap();
    let comment_prefix = result[0].split("0:00").next().unwrap();
    let dialogue_prefix = result[1].split("0:00").next().unwrap();

    assert_eq!(comment_prefix, format!("Comment: {}", COMMENT_PADDING));
    assert_eq!(dialogue_prefix, "Dialogue: ");
    assert_eq!(comment_prefix.chars().count(), "Comment: ".chars().count() + 1);
    assert!(COMMENT_PADDING.is_whitespace());
}

/// Dialogue text keeps its commas and override tags
#[test]
fn test_normalize_withCommasInText_shouldKeepPayloadWhole() {
    let lines = common::script_lines(&[
        "Dialogue: 0,0:00:05.00,0:00:07.50,Default,,0,0,0,,{\\i1}Wait,{\\i0} what, now?",
    ]);

    assert_eq!(
        normalize(&lines).unwrap(),
        vec!["Dialogue: 0:00:05.00, 0:00:07.50, {\\i1}Wait,{\\i0} what, now?".to_string()]
    );
}

/// Rows with too few fields produce an error naming the line
#[test]
fn test_normalize_withTruncatedRow_shouldReportMalformedEvent() {
    let lines = common::script_lines(&["Dialogue: 0,0:00:01.00,0:00:02.00"]);

    assert_eq!(
        normalize(&lines),
        Err(SubtitleError::MalformedEvent { line_number: 12, fields: 3 })
    );
}

/// Windows line endings are handled by split_lines
#[test]
fn test_normalize_withCrLfContent_shouldMatchMarker() {
    let content = common::script_content(&["Dialogue: 0,0:00:01.00,0:00:02.00,Default,,0,0,0,,Hi"])
        .replace('\n', "\r\n");

    let result = normalize(&split_lines(&content)).unwrap();
    assert_eq!(result, vec!["Dialogue: 0:00:01.00, 0:00:02.00, Hi".to_string()]);
}
