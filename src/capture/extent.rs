//! Finding where a capture block ends.

/// Strategy for deciding the last line of a block.
pub trait BlockDelimiter {
    /// Return the 1-based inclusive last line of the block anchored at
    /// `anchor_line`.
    ///
    /// With `include_opening_line` false the scan starts on the line after
    /// the anchor (the first body line); otherwise on the anchor itself.
    fn resolve_extent<S: AsRef<str>>(
        &self,
        lines: &[S],
        anchor_line: usize,
        include_opening_line: bool,
    ) -> usize;
}

/// Indentation-based delimiter: the block ends before the first non-blank
/// line indented less than the starting line.
///
/// This is a whitespace scan, not a parse. A dedented line inside a
/// multi-line string or bracketed expression ends the block early.
#[derive(Debug, Clone, Copy, Default)]
pub struct IndentationDelimiter;

impl BlockDelimiter for IndentationDelimiter {
    fn resolve_extent<S: AsRef<str>>(
        &self,
        lines: &[S],
        anchor_line: usize,
        include_opening_line: bool,
    ) -> usize {
        let start = if include_opening_line {
            anchor_line
        } else {
            anchor_line + 1
        };
        if start == 0 || start > lines.len() {
            return lines.len().min(anchor_line);
        }

        // Base indentation comes from the first non-blank line so a body
        // that opens with an empty line is still delimited.
        let Some(base_line) = (start..=lines.len()).find(|&n| !is_blank(lines[n - 1].as_ref()))
        else {
            return anchor_line;
        };
        let base = indentation(lines[base_line - 1].as_ref());

        let mut last = base_line;
        for n in base_line + 1..=lines.len() {
            let line = lines[n - 1].as_ref();
            if is_blank(line) {
                continue;
            }
            if indentation(line) < base {
                break;
            }
            last = n;
        }
        last
    }
}

/// Convenience wrapper for [`IndentationDelimiter`].
pub fn resolve_extent<S: AsRef<str>>(
    lines: &[S],
    anchor_line: usize,
    include_opening_line: bool,
) -> usize {
    IndentationDelimiter.resolve_extent(lines, anchor_line, include_opening_line)
}

/// Number of leading whitespace characters.
pub fn indentation(line: &str) -> usize {
    line.chars().take_while(|c| c.is_whitespace()).count()
}

fn is_blank(line: &str) -> bool {
    line.trim().is_empty()
}
