/*!
 * Tests for file utility functions
 */

use aegichanges::errors::AppError;
use aegichanges::file_utils::FileManager;
use anyhow::Result;
use std::path::{Path, PathBuf};
use crate::common;

/// Test file and directory existence checks
#[test]
fn test_exists_withFileAndDir_shouldDistinguishThem() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let dir = temp_dir.path().to_path_buf();
    let file = common::create_test_file(&dir, "a.ass", "content")?;

    assert!(FileManager::file_exists(&file));
    assert!(!FileManager::dir_exists(&file));
    assert!(FileManager::dir_exists(&dir));
    assert!(!FileManager::file_exists(&dir));
    assert!(!FileManager::file_exists(dir.join("missing.ass")));
    Ok(())
}

#[test]
fn test_isSubtitleScript_shouldIgnoreExtensionCase() {
    assert!(FileManager::is_subtitle_script("episode01.ass"));
    assert!(FileManager::is_subtitle_script("EPISODE01.ASS"));
    assert!(!FileManager::is_subtitle_script("episode01.srt"));
    assert!(!FileManager::is_subtitle_script("ass"));
}

#[test]
fn test_generateOutputPath_shouldCombineBothStems() {
    let path = FileManager::generate_output_path(
        "/work/ep01_v1.ass",
        "/other/ep01_v2.ass",
        "/reports",
        "html",
    );
    assert_eq!(path, PathBuf::from("/reports/ep01_v1.vs.ep01_v2.html"));
}

#[test]
fn test_readLines_shouldSplitAndNameAfterFile() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let dir = temp_dir.path().to_path_buf();
    let file = common::create_test_file(&dir, "ep01.ass", "\u{FEFF}[Events]\r\nFormat: x\r\n\r\nlast")?;

    let raw = FileManager::read_lines(&file)?;

    assert_eq!(raw.name, "ep01.ass");
    assert_eq!(raw.lines, vec!["[Events]", "Format: x", "", "last"]);
    Ok(())
}

#[test]
fn test_readLinesAsync_shouldMatchBlockingRead() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let dir = temp_dir.path().to_path_buf();
    let file = common::create_test_script(&dir, "ep02.ass", &["Dialogue: 0,0:00:01.00,0:00:02.00,Default,,0,0,0,,Hi"])?;

    let blocking = FileManager::read_lines(&file)?;
    let async_read = tokio_test::block_on(FileManager::read_lines_async(&file))?;

    assert_eq!(blocking, async_read);
    Ok(())
}

#[test]
fn test_readLines_withMissingFile_shouldReturnFileError() {
    let result = FileManager::read_lines(Path::new("/definitely/not/here.ass"));
    assert!(matches!(result, Err(AppError::File(_))));
}

#[test]
fn test_writeToFile_shouldCreateParentDirectories() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let target = temp_dir.path().join("nested").join("deeper").join("report.txt");

    FileManager::write_to_file(&target, "  same\n")?;

    assert_eq!(std::fs::read_to_string(&target)?, "  same\n");
    Ok(())
}

#[test]
fn test_displayName_shouldUseFileName() {
    assert_eq!(FileManager::display_name(Path::new("/a/b/c.ass")), "c.ass");
    assert_eq!(FileManager::display_name(Path::new("/")), "/");
}
