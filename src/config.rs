use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use serde::Deserialize;

/// Config file picked up from the working directory when no `--config` is
/// given.
pub const DEFAULT_CONFIG_FILE: &str = "plotis.toml";

/// Knobs for recognising capture blocks and shaping the synthesized script.
///
/// Every field has a default, so a config file only needs the keys it
/// changes:
///
/// ```toml
/// constructor = "Capture"
/// figure_name = "plot.svg"
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CaptureConfig {
    /// Name of the constructor in `with <constructor>(...):`.
    pub constructor: String,
    /// File name of the synthesized script.
    pub script_name: String,
    /// File name the appended save statement writes the figure to.
    pub figure_name: String,
    /// Substring that marks a save-to-file call.
    pub save_marker: String,
    /// Substring that marks a display call.
    pub display_marker: String,
    /// Import lines at the top of the script, followed by one blank line.
    pub preamble: Vec<String>,
}

impl Default for CaptureConfig {
    fn default() -> Self {
        Self {
            constructor: "PlotIs".to_string(),
            script_name: "run.py".to_string(),
            figure_name: "figure.png".to_string(),
            save_marker: "savefig(".to_string(),
            display_marker: ".show()".to_string(),
            preamble: vec![
                "import pandas as pd".to_string(),
                "import matplotlib.pyplot as plt".to_string(),
            ],
        }
    }
}

impl CaptureConfig {
    /// Parse and validate a TOML config document.
    pub fn from_toml(text: &str) -> Result<Self> {
        let config: CaptureConfig = toml::from_str(text).context("parsing config TOML")?;
        config.validate()?;
        Ok(config)
    }

    /// Load a config file.
    pub fn load(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path)
            .with_context(|| format!("reading config {}", path.display()))?;
        Self::from_toml(&text).with_context(|| format!("in config {}", path.display()))
    }

    /// Resolve the effective config: an explicit path must exist; otherwise
    /// `plotis.toml` in `dir` is used when present, else the defaults.
    pub fn resolve(explicit: Option<&Path>, dir: &Path) -> Result<Self> {
        if let Some(path) = explicit {
            return Self::load(path);
        }
        let implicit: PathBuf = dir.join(DEFAULT_CONFIG_FILE);
        if implicit.is_file() {
            log::debug!("using config {}", implicit.display());
            return Self::load(&implicit);
        }
        Ok(Self::default())
    }

    fn validate(&self) -> Result<()> {
        if !is_identifier(&self.constructor) {
            bail!("constructor '{}' is not an identifier", self.constructor);
        }
        for (key, value) in [
            ("script_name", &self.script_name),
            ("figure_name", &self.figure_name),
            ("save_marker", &self.save_marker),
            ("display_marker", &self.display_marker),
        ] {
            if value.trim().is_empty() {
                bail!("{key} must not be empty");
            }
        }
        if self.script_name.contains(['/', '\\']) || self.figure_name.contains(['/', '\\']) {
            bail!("script_name and figure_name must be plain file names");
        }
        Ok(())
    }
}

/// Python's hard keywords; none of them can name a variable.
const PYTHON_KEYWORDS: &[&str] = &[
    "False", "None", "True", "and", "as", "assert", "async", "await", "break", "class",
    "continue", "def", "del", "elif", "else", "except", "finally", "for", "from", "global", "if",
    "import", "in", "is", "lambda", "nonlocal", "not", "or", "pass", "raise", "return", "try",
    "while", "with", "yield",
];

/// Whether `s` is a Python identifier (ASCII subset) that is not a keyword.
pub fn is_identifier(s: &str) -> bool {
    let mut chars = s.chars();
    match chars.next() {
        Some(c) if c == '_' || c.is_ascii_alphabetic() => {}
        _ => return false,
    }
    chars.all(|c| c == '_' || c.is_ascii_alphanumeric()) && !PYTHON_KEYWORDS.contains(&s)
}
