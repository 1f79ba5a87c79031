use anyhow::{anyhow, Result};
use log::{debug, info, warn};
use std::io::Write;
use std::path::{Path, PathBuf};

use crate::app_config::{Config, OutputFormat};
use crate::diff::{DiffSummary, RenderInstruction};
use crate::errors::AppError;
use crate::file_utils::FileManager;
use crate::render::{create_renderer, render_all, HtmlRenderer, Renderer};
use crate::session::{ComparisonSession, RawFile};

// @module: Application controller for script comparison

/// Result of comparing two scripts
#[derive(Debug, Clone)]
pub struct Comparison {
    // @field: Display name of the old script
    pub old_name: String,

    // @field: Display name of the new script
    pub new_name: String,

    // @field: Classified lines in diff order
    pub instructions: Vec<RenderInstruction>,

    // @field: Line counts per tag
    pub summary: DiffSummary,
}

/// Main application controller wiring loading, comparison and rendering
pub struct Controller {
    // @field: App configuration
    config: Config,
}

impl Controller {
    /// Create a new controller for test purposes with default configuration
    pub fn new_for_test() -> Result<Self> {
        Self::with_config(Config::default())
    }

    // @method: Create a new controller with the given configuration
    pub fn with_config(config: Config) -> Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Compare two already loaded scripts
    pub fn compare_loaded(&self, old: RawFile, new: RawFile) -> Result<Comparison> {
        let old_name = old.name.clone();
        let new_name = new.name.clone();

        let mut session = ComparisonSession::new();
        session.load_old(old);
        session.load_new(new);

        let instructions = session
            .compare(&self.config.diff.to_options())
            .map_err(AppError::Compare)?;
        let summary = DiffSummary::from_instructions(&instructions);

        Ok(Comparison {
            old_name,
            new_name,
            instructions,
            summary,
        })
    }

    /// Load both scripts concurrently and compare them
    pub async fn compare_files(&self, old_path: &Path, new_path: &Path) -> Result<Comparison> {
        for path in [old_path, new_path] {
            if !FileManager::file_exists(path) {
                return Err(anyhow!("Input file does not exist: {:?}", path));
            }
            if !FileManager::is_subtitle_script(path) {
                warn!("{:?} does not have the .ass extension, comparing anyway", path);
            }
        }

        let (old, new) = tokio::try_join!(
            FileManager::read_lines_async(old_path),
            FileManager::read_lines_async(new_path)
        )?;

        self.compare_loaded(old, new)
    }

    /// Render a comparison in the given format
    pub fn render(&self, comparison: &Comparison, format: OutputFormat) -> Result<String> {
        let theme = &self.config.output.theme;
        let mut renderer: Box<dyn Renderer> = match format {
            OutputFormat::Html => Box::new(
                HtmlRenderer::new(theme.clone())
                    .with_title(format!("{} vs {}", comparison.old_name, comparison.new_name)),
            ),
            other => create_renderer(other, theme)?,
        };

        Ok(render_all(renderer.as_mut(), &comparison.instructions))
    }

    /// Run the main workflow: compare, render and write to `output` or stdout.
    ///
    /// `output` may be a file or an existing directory, in which case the
    /// report is named after both scripts. Returns `None` when an existing
    /// report was left untouched.
    pub async fn run(
        &self,
        old_path: PathBuf,
        new_path: PathBuf,
        output: Option<PathBuf>,
        format: OutputFormat,
        force_overwrite: bool,
    ) -> Result<Option<DiffSummary>> {
        let start_time = std::time::Instant::now();

        let output_path = output.map(|path| {
            if FileManager::dir_exists(&path) {
                FileManager::generate_output_path(&old_path, &new_path, &path, format.extension())
            } else {
                path
            }
        });

        if let Some(path) = &output_path {
            if path.exists() && !force_overwrite {
                warn!("Skipping, output already exists (use -f to force overwrite): {:?}", path);
                return Ok(None);
            }
        }

        let comparison = self.compare_files(&old_path, &new_path).await?;
        let summary = comparison.summary;

        if summary.has_changes() {
            info!(
                "{} unchanged, {} removed, {} added line(s)",
                summary.unchanged, summary.removed, summary.added
            );
        } else {
            info!("No differences in {} event line(s)", summary.unchanged);
        }

        let rendered = self.render(&comparison, format)?;

        match &output_path {
            Some(path) => {
                FileManager::write_to_file(path, &rendered)?;
                info!("{} report written to {:?}", format.display_name(), path);
            }
            None => {
                let stdout = std::io::stdout();
                let mut handle = stdout.lock();
                handle.write_all(rendered.as_bytes())?;
                handle.flush()?;
            }
        }

        debug!("Comparison finished in {:.2?}", start_time.elapsed());

        Ok(Some(summary))
    }
}
