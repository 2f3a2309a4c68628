use crate::config::CaptureConfig;
use crate::error::{CaptureError, CaptureResult, TerminalCall};

use super::invocation::is_opening;

/// Check a captured body before the session is created.
///
/// `first_line` is the 1-based line number of `lines[0]`. Nested openings
/// are reported before terminal-call counts.
pub fn validate_block<S: AsRef<str>>(
    lines: &[S],
    first_line: usize,
    config: &CaptureConfig,
) -> CaptureResult<()> {
    if let Some(offset) = lines
        .iter()
        .position(|l| is_opening(l.as_ref(), &config.constructor))
    {
        return Err(CaptureError::NestedCaptureNotSupported {
            line: first_line + offset,
        });
    }

    for (call, marker) in [
        (TerminalCall::Save, &config.save_marker),
        (TerminalCall::Display, &config.display_marker),
    ] {
        let count = count_marker(lines, marker);
        if count > 1 {
            return Err(CaptureError::MultipleFiguresNotSupported { call, count });
        }
    }
    Ok(())
}

/// Occurrences of `marker` across all lines.
pub fn count_marker<S: AsRef<str>>(lines: &[S], marker: &str) -> usize {
    lines.iter().map(|l| l.as_ref().matches(marker).count()).sum()
}
