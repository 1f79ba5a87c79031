use anyhow::{Result, Context};
use std::fs;
use std::path::{Path, PathBuf};

use crate::errors::AppError;
use crate::session::RawFile;

// @module: File and directory utilities

// @const: Extension of Advanced SubStation Alpha scripts
pub const SUBTITLE_SCRIPT_EXTENSION: &str = "ass";

// @struct: File operations utility
pub struct FileManager;

impl FileManager {
    // @checks: File existence
    pub fn file_exists<P: AsRef<Path>>(path: P) -> bool {
        path.as_ref().exists() && path.as_ref().is_file()
    }

    // @checks: Directory existence
    pub fn dir_exists<P: AsRef<Path>>(path: P) -> bool {
        path.as_ref().exists() && path.as_ref().is_dir()
    }

    // @creates: Directory and parents if needed
    pub fn ensure_dir<P: AsRef<Path>>(path: P) -> Result<()> {
        let path = path.as_ref();
        if !path.exists() {
            fs::create_dir_all(path)?;
        }
        Ok(())
    }

    // @checks: Path has the .ass extension (case-insensitive)
    pub fn is_subtitle_script<P: AsRef<Path>>(path: P) -> bool {
        path.as_ref()
            .extension()
            .is_some_and(|ext| ext.to_string_lossy().eq_ignore_ascii_case(SUBTITLE_SCRIPT_EXTENSION))
    }

    // @generates: Output path for a comparison report
    // @params: old_file, new_file, output_dir, extension
    pub fn generate_output_path<P1: AsRef<Path>, P2: AsRef<Path>, P3: AsRef<Path>>(
        old_file: P1,
        new_file: P2,
        output_dir: P3,
        extension: &str,
    ) -> PathBuf {
        let old_stem = old_file.as_ref().file_stem().unwrap_or_default().to_string_lossy();
        let new_stem = new_file.as_ref().file_stem().unwrap_or_default().to_string_lossy();

        let output_filename = format!("{}.vs.{}.{}", old_stem, new_stem, extension);

        output_dir.as_ref().join(output_filename)
    }

    /// Read a UTF-8 file to a string
    pub fn read_to_string<P: AsRef<Path>>(path: P) -> Result<String, AppError> {
        let path = path.as_ref();
        fs::read_to_string(path)
            .map_err(|e| AppError::File(format!("Failed to read file {:?}: {}", path, e)))
    }

    /// Read a script into raw lines, named after its file name
    pub fn read_lines<P: AsRef<Path>>(path: P) -> Result<RawFile, AppError> {
        let path = path.as_ref();
        let content = Self::read_to_string(path)?;
        Ok(RawFile::from_content(Self::display_name(path), &content))
    }

    /// Read a script into raw lines without blocking the runtime
    pub async fn read_lines_async<P: AsRef<Path>>(path: P) -> Result<RawFile, AppError> {
        let path = path.as_ref();
        let content = tokio::fs::read_to_string(path)
            .await
            .map_err(|e| AppError::File(format!("Failed to read file {:?}: {}", path, e)))?;
        Ok(RawFile::from_content(Self::display_name(path), &content))
    }

    /// Write a string to a file
    pub fn write_to_file<P: AsRef<Path>>(path: P, content: &str) -> Result<()> {
        // Ensure the parent directory exists
        if let Some(parent) = path.as_ref().parent() {
            Self::ensure_dir(parent)?;
        }

        fs::write(&path, content)
            .with_context(|| format!("Failed to write to file: {:?}", path.as_ref()))?;

        Ok(())
    }

    // @returns: File name component, or the whole path if there is none
    pub fn display_name(path: &Path) -> String {
        path.file_name()
            .map(|name| name.to_string_lossy().to_string())
            .unwrap_or_else(|| path.to_string_lossy().to_string())
    }
}
