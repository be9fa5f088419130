//! Annotator settings and configuration file support.
//!
//! Settings can be loaded from a `.ferro-annotate.toml` file:
//!
//! ```toml
//! [annotate]
//! splice_window = 2
//! shuffle_direction = "three_prime"
//! error_mode = "lenient"
//! genome_build = "GRCh38"
//! ```
//!
//! # Config File Locations
//!
//! Configuration is searched in this order (first found wins):
//! 1. `.ferro-annotate.toml` in current directory
//! 2. `~/.config/ferro/annotate.toml`
//!
//! CLI flags take precedence over config file settings.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use crate::error::AnnotateError;
use crate::reference::dict::GenomeBuild;
use crate::variant::ShuffleDirection;

/// Default number of intronic bases at each exon boundary treated as splice site
pub const DEFAULT_SPLICE_WINDOW: u64 = 2;

/// How recoverable annotation problems are surfaced.
///
/// Applies to reference mismatches and incomplete translations. Invalid input
/// and unsupported variant types are always returned as errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ErrorMode {
    /// Return the problem as an error instead of an annotation.
    Strict,

    /// Produce the annotation, attach the message and log a warning.
    #[default]
    Lenient,

    /// Produce the annotation and attach the message without logging.
    Silent,
}

impl ErrorMode {
    /// Returns true if recoverable problems become errors.
    pub fn is_strict(&self) -> bool {
        matches!(self, ErrorMode::Strict)
    }

    /// Returns true if this mode should emit warnings.
    pub fn emits_warnings(&self) -> bool {
        matches!(self, ErrorMode::Lenient)
    }
}

impl fmt::Display for ErrorMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ErrorMode::Strict => write!(f, "strict"),
            ErrorMode::Lenient => write!(f, "lenient"),
            ErrorMode::Silent => write!(f, "silent"),
        }
    }
}

impl FromStr for ErrorMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "strict" => Ok(ErrorMode::Strict),
            "lenient" => Ok(ErrorMode::Lenient),
            "silent" => Ok(ErrorMode::Silent),
            _ => Err(format!("Invalid error mode: {}", s)),
        }
    }
}

/// Settings used by the annotator
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AnnotateConfig {
    /// Intronic bases at each exon boundary classified as splice donor/acceptor
    pub splice_window: u64,
    /// Direction ambiguous indels are shifted within an exon
    pub shuffle_direction: ShuffleDirection,
    pub error_mode: ErrorMode,
    /// Build whose contig dictionary validates input variants
    pub genome_build: GenomeBuild,
}

impl Default for AnnotateConfig {
    fn default() -> Self {
        Self {
            splice_window: DEFAULT_SPLICE_WINDOW,
            shuffle_direction: ShuffleDirection::default(),
            error_mode: ErrorMode::default(),
            genome_build: GenomeBuild::default(),
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct ConfigFile {
    #[serde(default)]
    annotate: AnnotateConfig,
}

impl AnnotateConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_splice_window(mut self, width: u64) -> Self {
        self.splice_window = width;
        self
    }

    pub fn with_shuffle_direction(mut self, direction: ShuffleDirection) -> Self {
        self.shuffle_direction = direction;
        self
    }

    pub fn with_error_mode(mut self, mode: ErrorMode) -> Self {
        self.error_mode = mode;
        self
    }

    pub fn with_genome_build(mut self, build: GenomeBuild) -> Self {
        self.genome_build = build;
        self
    }

    /// Load configuration from the default locations.
    ///
    /// Returns `Ok(None)` when no config file exists.
    pub fn load() -> Result<Option<Self>, AnnotateError> {
        let cwd_config = PathBuf::from(".ferro-annotate.toml");
        if cwd_config.exists() {
            return Self::load_from_path(&cwd_config).map(Some);
        }

        if let Some(home) = dirs_home() {
            let home_config = home.join(".config").join("ferro").join("annotate.toml");
            if home_config.exists() {
                return Self::load_from_path(&home_config).map(Some);
            }
        }

        Ok(None)
    }

    /// Load configuration from a specific path.
    pub fn load_from_path<P: AsRef<Path>>(path: P) -> Result<Self, AnnotateError> {
        let content = fs::read_to_string(path.as_ref()).map_err(|e| AnnotateError::Config {
            msg: format!("{}: {}", path.as_ref().display(), e),
        })?;
        Self::parse(&content)
    }

    /// Parse configuration from TOML content.
    pub fn parse(content: &str) -> Result<Self, AnnotateError> {
        let file: ConfigFile = toml::from_str(content)?;
        Ok(file.annotate)
    }
}

/// Get the user's home directory.
fn dirs_home() -> Option<PathBuf> {
    std::env::var("HOME").ok().map(PathBuf::from)
}
