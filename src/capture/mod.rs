/// Capture layer: from a `with` statement in a source file to a standalone
/// script next to its data.
///
/// ```text
///   CaptureContext (file, line)
///        │
///        ▼
///   ┌──────────┐
///   │ context   │  read file → opening text
///   └──────────┘
///        │
///        ▼
///   ┌────────────┐   ┌──────────┐   ┌──────────┐
///   │ invocation  │ → │  extent   │ → │ validate  │   CaptureSession::enter
///   └────────────┘   └──────────┘   └──────────┘
///        │
///        ▼
///   ┌──────────┐   ┌──────────┐
///   │  synth    │ → │ persist   │                    CaptureSession::exit
///   └──────────┘   └──────────┘
/// ```

pub mod context;
pub mod extent;
pub mod invocation;
pub mod persist;
pub mod session;
pub mod synth;
pub mod validate;

pub use context::{CaptureContext, SourceText};
pub use extent::{resolve_extent, BlockDelimiter, IndentationDelimiter};
pub use invocation::{Binding, Invocation};
pub use session::{capture, with_capture, CaptureReport, CaptureSession};

use crate::config::CaptureConfig;

/// An opening statement found by [`locate_openings`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Opening {
    pub line: usize,
    pub text: String,
}

/// Every line of `source` that opens a capture block, in file order.
pub fn locate_openings(source: &SourceText, config: &CaptureConfig) -> Vec<Opening> {
    source
        .lines()
        .iter()
        .enumerate()
        .filter(|(_, text)| invocation::is_opening(text, &config.constructor))
        .map(|(i, text)| Opening {
            line: i + 1,
            text: text.clone(),
        })
        .collect()
}
