//! Error types for capture sessions.

use std::fmt;
use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// The two kinds of call that finalize a figure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TerminalCall {
    Save,
    Display,
}

impl fmt::Display for TerminalCall {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TerminalCall::Save => write!(f, "save-to-file"),
            TerminalCall::Display => write!(f, "display"),
        }
    }
}

/// Every way entering or exiting a capture session can fail.
#[derive(Debug, Error)]
pub enum CaptureError {
    /// The source text of the call site cannot be read.
    #[error("no source context for {}:{line}: {reason}", file.display())]
    ContextUnavailable {
        file: PathBuf,
        line: usize,
        reason: String,
    },

    /// The opening statement is not `with <constructor>(...):`.
    #[error("line {line}: capture must be opened by a `with` statement: {}", text.trim_end())]
    InvalidInvocationSyntax { line: usize, text: String },

    /// A second opening statement inside the block.
    #[error("line {line}: nested capture blocks are not supported")]
    NestedCaptureNotSupported { line: usize },

    /// More than one save or display call inside the block.
    #[error("a capture block may hold one figure, found {count} {call} calls")]
    MultipleFiguresNotSupported { call: TerminalCall, count: usize },

    /// The `data` argument does not name something the script can rebind.
    #[error("cannot recover the data binding from: {}", text.trim_end())]
    DataBindingUnresolvable { text: String },

    /// Writing an output file failed.
    #[error("writing {}", path.display())]
    Persist {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl CaptureError {
    pub(crate) fn persist(path: impl Into<PathBuf>, source: impl Into<io::Error>) -> Self {
        CaptureError::Persist {
            path: path.into(),
            source: source.into(),
        }
    }
}

/// Result type alias for capture operations.
pub type CaptureResult<T> = Result<T, CaptureError>;
