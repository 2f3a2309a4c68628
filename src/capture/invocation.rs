//! Parsing of the statement that opens a capture block.
//!
//! The accepted form is one physical line:
//!
//! ```text
//! with PlotIs(<figpath>, <data>):
//! with PlotIs(figpath=<figpath>, data=<data>) as session:
//! ```
//!
//! This is a line regex plus a bracket- and quote-aware argument splitter,
//! not a Python parser: calls spread over several lines or carrying a
//! trailing comment are rejected.

use std::sync::LazyLock;

use regex::Regex;

use crate::config::{is_identifier, CaptureConfig};
use crate::error::{CaptureError, CaptureResult};

static OPENING: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"^[ \t]*with (?P<ctor>[A-Za-z_][A-Za-z0-9_]*)\((?P<args>.*)\)(?: as (?P<alias>[A-Za-z_][A-Za-z0-9_]*))?:\r?\n$",
    )
    .expect("opening pattern compiles")
});

/// Whether `line` is an opening statement for `constructor`, regardless of
/// whether its arguments are valid.
pub fn is_opening(line: &str, constructor: &str) -> bool {
    OPENING
        .captures(line)
        .is_some_and(|caps| &caps["ctor"] == constructor)
}

/// One argument of the constructor call, as source text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Argument {
    Positional(String),
    Keyword { name: String, value: String },
}

/// A parsed opening statement.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    pub constructor: String,
    pub arguments: Vec<Argument>,
    /// Name bound by `as <name>`, if any.
    pub alias: Option<String>,
    /// Source text of the output directory argument.
    pub figpath: String,
    /// Source text of the data argument, if given.
    pub data: Option<String>,
}

impl Invocation {
    /// Parse and validate the opening statement on `line`.
    pub fn parse(text: &str, line: usize, config: &CaptureConfig) -> CaptureResult<Self> {
        let invalid = || CaptureError::InvalidInvocationSyntax {
            line,
            text: text.to_string(),
        };
        let invocation = Self::parse_any(text).ok_or_else(invalid)?;
        if invocation.constructor != config.constructor {
            return Err(invalid());
        }
        log::debug!("line {line}: parsed invocation {invocation:?}");
        Ok(invocation)
    }

    /// Parse a call of any constructor name.
    fn parse_any(text: &str) -> Option<Self> {
        let caps = OPENING.captures(text)?;
        let arguments = split_args(&caps["args"])?
            .into_iter()
            .map(|piece| classify(&piece))
            .collect::<Vec<_>>();
        if arguments.is_empty() || arguments.len() > 2 {
            return None;
        }

        let mut figpath = None;
        let mut data = None;
        let mut seen_keyword = false;
        for (i, arg) in arguments.iter().enumerate() {
            let (slot, value) = match arg {
                Argument::Positional(value) => {
                    if seen_keyword {
                        return None;
                    }
                    (if i == 0 { &mut figpath } else { &mut data }, value)
                }
                Argument::Keyword { name, value } => {
                    seen_keyword = true;
                    match name.as_str() {
                        "figpath" | "path" => (&mut figpath, value),
                        "data" => (&mut data, value),
                        _ => return None,
                    }
                }
            };
            if slot.replace(value.clone()).is_some() {
                return None;
            }
        }

        Some(Invocation {
            constructor: caps["ctor"].to_string(),
            arguments,
            alias: caps.name("alias").map(|m| m.as_str().to_string()),
            figpath: figpath?,
            data,
        })
    }
}

fn classify(piece: &str) -> Argument {
    let name_len = piece
        .find(|c: char| !(c == '_' || c.is_ascii_alphanumeric()))
        .unwrap_or(piece.len());
    let (name, rest) = piece.split_at(name_len);
    let rest = rest.trim_start();
    if is_identifier(name) && rest.starts_with('=') && !rest.starts_with("==") {
        return Argument::Keyword {
            name: name.to_string(),
            value: rest[1..].trim().to_string(),
        };
    }
    Argument::Positional(piece.to_string())
}

/// Split call arguments at top-level commas.
///
/// Commas inside brackets or string literals do not split. Returns `None`
/// for unbalanced brackets, unterminated strings or empty arguments.
pub fn split_args(args: &str) -> Option<Vec<String>> {
    let mut pieces = Vec::new();
    let mut current = String::new();
    let mut stack: Vec<char> = Vec::new();
    let mut quote: Option<char> = None;
    let mut escaped = false;

    for c in args.chars() {
        if let Some(q) = quote {
            current.push(c);
            if escaped {
                escaped = false;
            } else if c == '\\' {
                escaped = true;
            } else if c == q {
                quote = None;
            }
            continue;
        }
        match c {
            '\'' | '"' => quote = Some(c),
            '(' => stack.push(')'),
            '[' => stack.push(']'),
            '{' => stack.push('}'),
            ')' | ']' | '}' => {
                if stack.pop() != Some(c) {
                    return None;
                }
            }
            ',' if stack.is_empty() => {
                pieces.push(std::mem::take(&mut current).trim().to_string());
                continue;
            }
            _ => {}
        }
        current.push(c);
    }
    if quote.is_some() || !stack.is_empty() {
        return None;
    }
    if !current.trim().is_empty() || !pieces.is_empty() {
        pieces.push(current.trim().to_string());
    }
    if pieces.iter().any(String::is_empty) {
        return None;
    }
    Some(pieces)
}

// ---------------------------------------------------------------------------
// Data binding
// ---------------------------------------------------------------------------

/// What the `data` argument names in the captured code.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Binding {
    /// A plain variable: `data=df`.
    Name(String),
    /// A list literal of variables: `data=[train, test]`.
    List(Vec<String>),
}

impl Binding {
    /// Recover the data binding from an opening statement's text.
    ///
    /// Takes the `data=` keyword value if present, otherwise the second
    /// positional argument. Any constructor name is accepted.
    pub fn resolve(opening_text: &str) -> CaptureResult<Self> {
        let unresolvable = || CaptureError::DataBindingUnresolvable {
            text: opening_text.to_string(),
        };
        let invocation = Invocation::parse_any(opening_text).ok_or_else(unresolvable)?;
        let raw = invocation.data.ok_or_else(unresolvable)?;
        let value = raw.trim_end_matches(|c: char| c == ':' || c.is_whitespace());

        if is_identifier(value) {
            return Ok(Binding::Name(value.to_string()));
        }
        let names = value
            .strip_prefix('[')
            .and_then(|v| v.strip_suffix(']'))
            .and_then(split_args)
            .filter(|names| !names.is_empty() && names.iter().all(|n| is_identifier(n)))
            .ok_or_else(unresolvable)?;
        Ok(Binding::List(names))
    }
}
