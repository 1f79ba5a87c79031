/*!
 * Tests for controller construction and rendering
 */

use aegichanges::app_config::{Config, OutputFormat};
use aegichanges::app_controller::Controller;
use aegichanges::errors::{AppError, CompareError, Side};
use aegichanges::session::RawFile;
use anyhow::Result;
use crate::common;

/// Test creating a controller with the default configuration
#[test]
fn test_controller_newForTest_shouldUseDefaultConfig() -> Result<()> {
    let controller = Controller::new_for_test()?;
    assert_eq!(controller.config(), &Config::default());
    Ok(())
}

#[test]
fn test_controller_withInvalidConfig_shouldBeRejected() {
    let mut config = Config::default();
    config.output.theme.background = "black".to_string();
    assert!(Controller::with_config(config).is_err());

    let mut config = Config::default();
    config.diff.similarity_cutoff = -0.5;
    assert!(Controller::with_config(config).is_err());
}

#[test]
fn test_controller_withStrictCutoff_shouldNotRefinePairs() -> Result<()> {
    let mut config = Config::default();
    config.diff.similarity_cutoff = 1.0;
    let controller = Controller::with_config(config)?;

    let old = RawFile::new("a.ass", common::script_lines(&[&common::dialogue("1", "2", "Hello")]));
    let new = RawFile::new("b.ass", common::script_lines(&[&common::dialogue("1", "2", "Hello world")]));
    let comparison = controller.compare_loaded(old, new)?;

    let text = controller.render(&comparison, OutputFormat::Text)?;
    assert_eq!(text, "- Dialogue: 1, 2, Hello\n+ Dialogue: 1, 2, Hello world\n");
    Ok(())
}

#[test]
fn test_controller_render_shouldTitleHtmlWithFileNames() -> Result<()> {
    let controller = Controller::new_for_test()?;
    let old = RawFile::new("first.ass", common::script_lines(&[]));
    let new = RawFile::new("second.ass", common::script_lines(&[]));

    let comparison = controller.compare_loaded(old, new)?;
    let page = controller.render(&comparison, OutputFormat::Html)?;

    assert!(comparison.instructions.is_empty());
    assert!(page.contains("<title>first.ass vs second.ass</title>"));
    Ok(())
}

#[test]
fn test_controller_withEmptyFile_shouldReportItAsNotSelected() -> Result<()> {
    let controller = Controller::new_for_test()?;
    let old = RawFile::new("empty.ass", Vec::new());
    let new = RawFile::new("b.ass", common::script_lines(&[]));

    let error = controller.compare_loaded(old, new).unwrap_err();

    assert!(matches!(
        error.downcast_ref::<AppError>(),
        Some(AppError::Compare(CompareError::NoInputSelected(Side::Old)))
    ));
    assert_eq!(error.to_string(), "Compare error: Old file not selected");
    Ok(())
}

/// Loading from disk runs both reads on the runtime
#[test]
fn test_controller_compareFiles_shouldLoadBothScripts() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let dir = temp_dir.path().to_path_buf();
    let old = common::create_test_script(&dir, "old.ass", &[&common::dialogue("1", "2", "a")])?;
    let new = common::create_test_file(&dir, "new.txt", &common::script_content(&[
        &common::dialogue("1", "2", "a"),
        &common::dialogue("3", "4", "b"),
    ]))?;

    let controller = Controller::new_for_test()?;
    let comparison = tokio_test::block_on(controller.compare_files(&old, &new))?;

    assert_eq!(comparison.old_name, "old.ass");
    assert_eq!(comparison.new_name, "new.txt");
    assert_eq!((comparison.summary.unchanged, comparison.summary.added), (1, 1));
    Ok(())
}
