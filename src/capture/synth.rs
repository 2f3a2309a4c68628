//! Building the standalone script.

use crate::config::CaptureConfig;
use crate::data::model::Dataset;
use crate::error::{CaptureError, CaptureResult};

use super::invocation::Binding;

/// Produce the lines of the standalone script, each ending in `\n`.
///
/// Layout: import preamble and a blank line, the data-reload statement(s),
/// the cleaned body, and for a single dataset a trailing save statement.
/// Paths are relative to the output directory.
pub fn synthesize<S: AsRef<str>>(
    opening_text: &str,
    body: &[S],
    dataset: &Dataset<'_>,
    config: &CaptureConfig,
) -> CaptureResult<Vec<String>> {
    let mut out: Vec<String> = config.preamble.iter().map(|l| format!("{l}\n")).collect();
    out.push("\n".to_string());
    out.extend(reload_statements(opening_text, dataset)?);

    let strip_saves = !dataset.is_many();
    out.extend(
        clean_body(body)
            .into_iter()
            .filter(|l| !(strip_saves && l.contains(config.save_marker.as_str()))),
    );

    if strip_saves {
        out.push(format!("plt.savefig({})\n", python_str(&config.figure_name)));
    }
    Ok(out)
}

/// Strip indentation, normalise blank lines and terminators.
pub fn clean_body<S: AsRef<str>>(body: &[S]) -> Vec<String> {
    body.iter()
        .map(|line| {
            let text = line.as_ref().trim_start().trim_end_matches(['\r', '\n']);
            format!("{text}\n")
        })
        .collect()
}

fn reload_statements(opening_text: &str, dataset: &Dataset<'_>) -> CaptureResult<Vec<String>> {
    let read = |i: usize| format!("pd.read_csv({})", python_str(&dataset.file_name(i)));
    let n = dataset.tables().len();

    match (Binding::resolve(opening_text)?, dataset) {
        (Binding::Name(name), Dataset::Single(_)) => Ok(vec![format!("{name} = {}\n", read(0))]),
        (Binding::Name(name), Dataset::Many(_)) => {
            let frames: Vec<String> = (0..n).map(read).collect();
            Ok(vec![format!("{name} = [{}]\n", frames.join(", "))])
        }
        (Binding::List(names), Dataset::Many(_)) if names.len() == n => Ok(names
            .iter()
            .enumerate()
            .map(|(i, name)| format!("{name} = {}\n", read(i)))
            .collect()),
        _ => Err(CaptureError::DataBindingUnresolvable {
            text: opening_text.to_string(),
        }),
    }
}

/// Quote `s` as a Python string literal.
///
/// Printable ASCII stays as is; everything else uses the escapes Python
/// reads back (`\xNN`, `\uNNNN`, `\UNNNNNNNN`), so the literal is the
/// same string under any source encoding.
fn python_str(s: &str) -> String {
    let mut out = String::with_capacity(s.len() + 2);
    out.push('"');
    for c in s.chars() {
        match c {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            ' '..='~' => out.push(c),
            c if (c as u32) < 0x100 => out.push_str(&format!("\\x{:02x}", c as u32)),
            c if (c as u32) < 0x10000 => out.push_str(&format!("\\u{:04x}", c as u32)),
            c => out.push_str(&format!("\\U{:08x}", c as u32)),
        }
    }
    out.push('"');
    out
}
