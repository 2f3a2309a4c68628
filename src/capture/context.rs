use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{CaptureError, CaptureResult};

/// Where a capture block is opened: the caller names the file and the
/// 1-based line of its `with` statement.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CaptureContext {
    pub source_file: PathBuf,
    pub opening_line: usize,
}

impl CaptureContext {
    pub fn new(source_file: impl Into<PathBuf>, opening_line: usize) -> Self {
        Self {
            source_file: source_file.into(),
            opening_line,
        }
    }

    /// Read the source and recover the opening statement's literal text.
    ///
    /// Fails with `ContextUnavailable` when the file cannot be read or the
    /// line does not exist.
    pub fn inspect(&self) -> CaptureResult<Frame> {
        let unavailable = |reason: String| CaptureError::ContextUnavailable {
            file: self.source_file.clone(),
            line: self.opening_line,
            reason,
        };

        let path = fs::canonicalize(&self.source_file).map_err(|e| unavailable(e.to_string()))?;
        let source = SourceText::read(&path).map_err(|e| unavailable(e.to_string()))?;

        if self.opening_line == 0 {
            return Err(unavailable("line numbers start at 1".to_string()));
        }
        let opening_text = source
            .line(self.opening_line)
            .ok_or_else(|| unavailable(format!("file has only {} lines", source.len())))?
            .to_string();

        Ok(Frame {
            source_file: path,
            opening_line: self.opening_line,
            opening_text,
            source,
        })
    }
}

/// What the inspector recovered about a call site.
#[derive(Debug, Clone)]
pub struct Frame {
    /// Absolute path of the file holding the block.
    pub source_file: PathBuf,
    pub opening_line: usize,
    /// The opening line verbatim, line terminator included.
    pub opening_text: String,
    pub source: SourceText,
}

/// A source file split into lines that keep their terminators.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SourceText {
    lines: Vec<String>,
}

impl SourceText {
    pub fn read(path: &Path) -> std::io::Result<Self> {
        Ok(Self::from(fs::read_to_string(path)?.as_str()))
    }

    /// The 1-based line `n`, terminator included.
    pub fn line(&self, n: usize) -> Option<&str> {
        n.checked_sub(1)
            .and_then(|i| self.lines.get(i))
            .map(String::as_str)
    }

    /// Lines `start..=end` (1-based), clamped to the file.
    pub fn range(&self, start: usize, end: usize) -> &[String] {
        let lo = start.saturating_sub(1).min(self.lines.len());
        let hi = end.min(self.lines.len()).max(lo);
        &self.lines[lo..hi]
    }

    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }
}

impl From<&str> for SourceText {
    fn from(text: &str) -> Self {
        Self {
            lines: text.split_inclusive('\n').map(str::to_string).collect(),
        }
    }
}
