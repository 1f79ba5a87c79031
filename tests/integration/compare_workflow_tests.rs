/*!
 * End-to-end comparison of subtitle scripts
 */

use aegichanges::app_config::OutputFormat;
use aegichanges::app_controller::Controller;
use aegichanges::diff::{DiffOptions, DiffTag, Highlight};
use aegichanges::errors::{CompareError, Side, SubtitleError};
use aegichanges::session::{ComparisonSession, RawFile};
use anyhow::Result;
use crate::common;

fn raw(name: &str, events: &[&str]) -> RawFile {
    RawFile::new(name, common::script_lines(events))
}

/// Translator comments and annotation rows only, nothing else differs
#[test]
fn test_compare_withOnlyTlModeDifferences_shouldReportNoChanges() -> Result<()> {
    let line = common::dialogue("0:00:01.00", "0:00:02.00", "Hello");
    let comment = "Comment: 0,0:00:03.00,0:00:04.00,Default,,0,0,0,,check timing";
    let old = raw("old.ass", &[&line, comment]);
    let new = raw("new.ass", &[
        "Comment: 0,0:00:01.00,0:00:02.00,TLmode,,0,0,0,,Hallo",
        &line,
        comment,
        "Dialogue: 0,0:00:05.00,0:00:06.00,TLmode,,0,0,0,,ignored",
    ]);

    let comparison = Controller::new_for_test()?.compare_loaded(old, new)?;

    assert!(!comparison.summary.has_changes());
    assert_eq!(comparison.summary.unchanged, 2);
    assert_eq!(
        comparison.instructions[1].line,
        "Comment: \u{00A0}0:00:03.00, 0:00:04.00, check timing"
    );
    Ok(())
}

#[test]
fn test_compare_withEditedLine_shouldRefineThePair() -> Result<()> {
    let old = raw("old.ass", &[
        &common::dialogue("0:00:01.00", "0:00:02.00", "Hello"),
        &common::dialogue("0:00:03.00", "0:00:04.00", "Bye"),
    ]);
    let new = raw("new.ass", &[
        &common::dialogue("0:00:01.00", "0:00:02.00", "Hello"),
        &common::dialogue("0:00:03.50", "0:00:04.00", "Bye"),
    ]);

    let comparison = Controller::new_for_test()?.compare_loaded(old, new)?;
    let tags: Vec<DiffTag> = comparison.instructions.iter().map(|i| i.tag).collect();

    assert_eq!(tags, vec![DiffTag::Unchanged, DiffTag::Removed, DiffTag::Added]);
    assert_eq!(comparison.instructions[2].highlight, Highlight::Ranges(vec![18..19]));
    Ok(())
}

#[test]
fn test_session_withMissingSections_shouldReportEverySide() {
    let mut session = ComparisonSession::new();
    session.load_old(RawFile::new("old.ass", vec!["[Script Info]".to_string()]));
    session.load_new(RawFile::new("new.ass", vec!["[V4+ Styles]".to_string()]));

    assert_eq!(
        session.compare(&DiffOptions::default()),
        Err(CompareError::SectionNotFound(Side::Both))
    );

    session.load_new(raw("new.ass", &[]));
    assert_eq!(
        session.compare(&DiffOptions::default()),
        Err(CompareError::SectionNotFound(Side::Old))
    );
}

#[test]
fn test_session_withOnlyOneFile_shouldNameTheMissingOne() {
    let mut session = ComparisonSession::new();
    session.load_new(raw("new.ass", &[]));

    let error = session.compare(&DiffOptions::default()).unwrap_err();

    assert_eq!(error, CompareError::NoInputSelected(Side::Old));
    assert_eq!(error.to_string(), "Old file not selected");
}

#[test]
fn test_session_withMalformedNewFile_shouldPointAtTheLine() {
    let mut session = ComparisonSession::new();
    session.load_old(raw("old.ass", &[]));
    session.load_new(raw("new.ass", &["Dialogue: 0,0:00:01.00"]));

    assert_eq!(
        session.compare(&DiffOptions::default()),
        Err(CompareError::Malformed {
            side: Side::New,
            source: SubtitleError::MalformedEvent { line_number: 12, fields: 2 },
        })
    );
}

/// Files on disk are compared and written as an HTML report
#[test]
fn test_run_withHtmlOutput_shouldWriteReport() -> Result<()> {
    common::init_test_logging();
    let temp_dir = common::create_temp_dir()?;
    let dir = temp_dir.path().to_path_buf();
    let old = common::create_test_script(&dir, "ep01_v1.ass", &[
        &common::dialogue("0:00:01.00", "0:00:02.00", "Hello"),
    ])?;
    let new = common::create_test_script(&dir, "ep01_v2.ass", &[
        &common::dialogue("0:00:01.00", "0:00:02.00", "Hello <world>"),
    ])?;
    let report = dir.join("report.html");

    let controller = Controller::new_for_test()?;
    let summary = tokio_test::block_on(controller.run(old, new, Some(report.clone()), OutputFormat::Html, false))?;

    let summary = summary.expect("report should have been written");
    assert_eq!((summary.removed, summary.added), (1, 1));

    let page = std::fs::read_to_string(&report)?;
    assert!(page.contains("<title>ep01_v1.ass vs ep01_v2.ass</title>"));
    assert!(page.contains("&lt;world&gt;"));
    Ok(())
}

#[test]
fn test_run_withOutputDirectory_shouldNameReportAfterScripts() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let dir = temp_dir.path().to_path_buf();
    let line = common::dialogue("0:00:01.00", "0:00:02.00", "Same");
    let old = common::create_test_script(&dir, "a.ass", &[&line])?;
    let new = common::create_test_script(&dir, "b.ass", &[&line])?;

    let controller = Controller::new_for_test()?;
    let summary = tokio_test::block_on(controller.run(old, new, Some(dir.clone()), OutputFormat::Diff, false))?;

    assert_eq!(summary.map(|s| s.has_changes()), Some(false));
    let written = std::fs::read_to_string(dir.join("a.vs.b.diff"))?;
    assert_eq!(written, "  Dialogue: 0:00:01.00, 0:00:02.00, Same\n");
    Ok(())
}

#[test]
fn test_run_withExistingOutput_shouldSkipUnlessForced() -> Result<()> {
    common::init_test_logging();
    let temp_dir = common::create_temp_dir()?;
    let dir = temp_dir.path().to_path_buf();
    let old = common::create_test_script(&dir, "a.ass", &[&common::dialogue("1", "2", "x")])?;
    let new = common::create_test_script(&dir, "b.ass", &[&common::dialogue("1", "2", "y")])?;
    let report = common::create_test_file(&dir, "report.txt", "keep me")?;

    let controller = Controller::new_for_test()?;

    let skipped = tokio_test::block_on(controller.run(
        old.clone(),
        new.clone(),
        Some(report.clone()),
        OutputFormat::Text,
        false,
    ))?;
    assert!(skipped.is_none());
    assert_eq!(std::fs::read_to_string(&report)?, "keep me");

    let forced = tokio_test::block_on(controller.run(old, new, Some(report.clone()), OutputFormat::Text, true))?;
    assert!(forced.is_some());
    assert_eq!(
        std::fs::read_to_string(&report)?,
        "- Dialogue: 1, 2, x\n+ Dialogue: 1, 2, y\n"
    );
    Ok(())
}

#[test]
fn test_compareFiles_withMissingInput_shouldFail() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let dir = temp_dir.path().to_path_buf();
    let old = common::create_test_script(&dir, "a.ass", &[])?;

    let controller = Controller::new_for_test()?;
    let result = tokio_test::block_on(controller.compare_files(&old, &dir.join("missing.ass")));

    assert!(result.is_err());
    Ok(())
}
