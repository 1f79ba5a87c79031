use anyhow::{anyhow, Result};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::default::Default;

use crate::diff::DiffOptions;
use crate::errors::AppError;

// @const: #RRGGBB colour
static HEX_COLOR_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^#[0-9A-Fa-f]{6}$").unwrap()
});

/// Comparison settings read from conf.json
/// Every section falls back to its defaults when missing, so a partial file
/// only overrides what it names.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Config {
    /// Output settings
    #[serde(default)]
    pub output: OutputConfig,

    /// Diff settings
    #[serde(default)]
    pub diff: DiffConfig,

    /// Log level
    #[serde(default)]
    pub log_level: LogLevel,
}

/// Rendering format of a comparison
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    // @format: Plain text with diff prefixes
    Text,
    // @format: Same content as text, saved with a .diff extension
    Diff,
    // @format: Standalone HTML document
    Html,
    // @format: Coloured terminal output
    #[default]
    Ansi,
}

impl OutputFormat {
    // @returns: Capitalized format name
    pub fn display_name(&self) -> &str {
        match self {
            Self::Text => "Text",
            Self::Diff => "Diff",
            Self::Html => "HTML",
            Self::Ansi => "ANSI terminal",
        }
    }

    // @returns: File extension used when saving
    pub fn extension(&self) -> &str {
        match self {
            Self::Text => "txt",
            Self::Diff => "diff",
            Self::Html => "html",
            Self::Ansi => "ansi",
        }
    }

    // @returns: Lowercase format identifier
    pub fn to_lowercase_string(&self) -> String {
        match self {
            Self::Text => "text".to_string(),
            Self::Diff => "diff".to_string(),
            Self::Html => "html".to_string(),
            Self::Ansi => "ansi".to_string(),
        }
    }
}

// Implement Display trait for OutputFormat
impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.to_lowercase_string())
    }
}

// Implement FromStr trait for OutputFormat
impl std::str::FromStr for OutputFormat {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "text" | "txt" => Ok(Self::Text),
            "diff" => Ok(Self::Diff),
            "html" => Ok(Self::Html),
            "ansi" => Ok(Self::Ansi),
            _ => Err(anyhow!("Invalid output format: {}", s)),
        }
    }
}

/// Output configuration
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Default)]
pub struct OutputConfig {
    /// Format used when none is given on the command line
    #[serde(default)]
    pub format: OutputFormat,

    /// Colours and font of rendered output
    #[serde(default)]
    pub theme: ThemeConfig,
}

/// Colour theme shared by the HTML and terminal renderers
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct ThemeConfig {
    // @field: Page background
    #[serde(default = "default_background")]
    pub background: String,

    // @field: Text colour
    #[serde(default = "default_foreground")]
    pub foreground: String,

    // @field: Background of removed lines
    #[serde(default = "default_removed")]
    pub removed: String,

    // @field: Background of added lines
    #[serde(default = "default_added")]
    pub added: String,

    // @field: Background of changed characters in removed lines
    #[serde(default = "default_removed_highlight")]
    pub removed_highlight: String,

    // @field: Background of changed characters in added lines
    #[serde(default = "default_added_highlight")]
    pub added_highlight: String,

    // @field: Monospace font for HTML output
    #[serde(default = "default_font_family")]
    pub font_family: String,
}

impl ThemeConfig {
    // @returns: (name, value) of every colour field
    pub fn colors(&self) -> [(&'static str, &str); 6] {
        [
            ("background", self.background.as_str()),
            ("foreground", self.foreground.as_str()),
            ("removed", self.removed.as_str()),
            ("added", self.added.as_str()),
            ("removed_highlight", self.removed_highlight.as_str()),
            ("added_highlight", self.added_highlight.as_str()),
        ]
    }
}

impl Default for ThemeConfig {
    fn default() -> Self {
        Self {
            background: default_background(),
            foreground: default_foreground(),
            removed: default_removed(),
            added: default_added(),
            removed_highlight: default_removed_highlight(),
            added_highlight: default_added_highlight(),
            font_family: default_font_family(),
        }
    }
}

/// Diff configuration
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct DiffConfig {
    /// Prune lines that repeat a lot in long scripts before matching.
    /// Faster, but can misalign scripts full of identical lines.
    #[serde(default)]
    pub autojunk: bool,

    /// Minimum similarity (0.0 to 1.0) for an edited line to get inline highlights
    #[serde(default = "default_similarity_cutoff")]
    pub similarity_cutoff: f64,
}

impl DiffConfig {
    pub fn to_options(&self) -> DiffOptions {
        DiffOptions {
            autojunk: self.autojunk,
            similarity_cutoff: self.similarity_cutoff,
        }
    }
}

impl Default for DiffConfig {
    fn default() -> Self {
        Self {
            autojunk: false,
            similarity_cutoff: default_similarity_cutoff(),
        }
    }
}

/// Log verbosity level
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Error,
    Warn,
    #[default]
    Info,
    Debug,
    Trace,
}

fn default_background() -> String {
    "#24292E".to_string()
}

fn default_foreground() -> String {
    "#FFFFFF".to_string()
}

fn default_removed() -> String {
    "#450C0F".to_string()
}

fn default_added() -> String {
    "#113A1B".to_string()
}

fn default_removed_highlight() -> String {
    "#B31D28".to_string()
}

fn default_added_highlight() -> String {
    "#22863A".to_string()
}

fn default_font_family() -> String {
    "Consolas".to_string()
}

fn default_similarity_cutoff() -> f64 {
    0.75
}

impl Config {
    /// Validate the configuration for consistency and required values
    pub fn validate(&self) -> Result<(), AppError> {
        for (name, value) in self.output.theme.colors() {
            if !HEX_COLOR_REGEX.is_match(value) {
                return Err(AppError::Config(format!(
                    "Theme colour '{}' must be #RRGGBB, got '{}'",
                    name, value
                )));
            }
        }

        if self.output.theme.font_family.trim().is_empty() {
            return Err(AppError::Config("Theme font family must not be empty".to_string()));
        }

        let cutoff = self.diff.similarity_cutoff;
        if !(cutoff > 0.0 && cutoff <= 1.0) {
            return Err(AppError::Config(format!(
                "Similarity cutoff must be in (0, 1], got {}",
                cutoff
            )));
        }

        Ok(())
    }
}

/// Default implementation for Config
impl Default for Config {
    fn default() -> Self {
        Config {
            output: OutputConfig::default(),
            diff: DiffConfig::default(),
            log_level: LogLevel::default(),
        }
    }
}
