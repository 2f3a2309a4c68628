use std::io::Write;
use std::path::Path;

use anyhow::{bail, Context, Result};

use crate::capture::{
    locate_openings, resolve_extent, CaptureContext, CaptureSession, SourceText,
};
use crate::cli::{Cli, Command};
use crate::config::CaptureConfig;
use crate::data::loader::load_file;
use crate::data::model::{Dataset, Table};

// ---------------------------------------------------------------------------
// Command dispatch
// ---------------------------------------------------------------------------

/// Run one CLI command, printing results to `out`.
pub fn run(cli: Cli, out: &mut impl Write) -> Result<()> {
    let cwd = std::env::current_dir().context("reading working directory")?;
    let config = CaptureConfig::resolve(cli.config.as_deref(), &cwd)?;

    match cli.command {
        Command::Capture {
            source,
            figpath,
            data,
            line,
            many,
        } => capture(&config, &source, &figpath, &data, line, many, out),
        Command::List { source } => list(&config, &source, out),
        Command::Extent {
            source,
            line,
            include_opening_line,
        } => {
            let text = read_source(&source)?;
            let end = resolve_extent(text.lines(), line, include_opening_line);
            writeln!(out, "{end}")?;
            Ok(())
        }
    }
}

fn capture(
    config: &CaptureConfig,
    source: &Path,
    figpath: &Path,
    data: &[std::path::PathBuf],
    line: Option<usize>,
    many: bool,
    out: &mut impl Write,
) -> Result<()> {
    let tables: Vec<Table> = data
        .iter()
        .map(|p| load_file(p).with_context(|| format!("loading {}", p.display())))
        .collect::<Result<_>>()?;

    let line = match line {
        Some(line) => line,
        None => sole_opening(config, source)?,
    };

    let dataset = match tables.as_slice() {
        [single] if !many => Dataset::Single(single),
        all => Dataset::Many(all),
    };

    let context = CaptureContext::new(source, line);
    let report = CaptureSession::enter(&context, figpath, dataset, config)
        .and_then(CaptureSession::exit)
        .with_context(|| format!("capturing {}:{line}", source.display()))?;

    writeln!(
        out,
        "captured lines {}..={} of {}",
        report.block_start,
        report.block_end,
        report.source_file.display()
    )?;
    for path in report.data_files.iter().chain(Some(&report.script)) {
        writeln!(out, "  {}", path.display())?;
    }
    Ok(())
}

fn list(config: &CaptureConfig, source: &Path, out: &mut impl Write) -> Result<()> {
    let text = read_source(source)?;
    for opening in locate_openings(&text, config) {
        let context = CaptureContext::new(source, opening.line);
        // Entry validation never looks at the data.
        let empty = Table::default();
        match CaptureSession::enter(&context, "", Dataset::Single(&empty), config) {
            Ok(session) => {
                let (start, end) = session.block();
                writeln!(out, "{}: lines {start}..={end}", opening.line)?
            }
            Err(err) => writeln!(out, "{}: {err}", opening.line)?,
        }
    }
    Ok(())
}

fn sole_opening(config: &CaptureConfig, source: &Path) -> Result<usize> {
    let text = read_source(source)?;
    match locate_openings(&text, config).as_slice() {
        [only] => Ok(only.line),
        [] => bail!(
            "no `with {}(...)` block in {}",
            config.constructor,
            source.display()
        ),
        several => {
            let lines: Vec<String> = several.iter().map(|o| o.line.to_string()).collect();
            bail!(
                "{} has several capture blocks (lines {}); pass --line",
                source.display(),
                lines.join(", ")
            )
        }
    }
}

fn read_source(path: &Path) -> Result<SourceText> {
    SourceText::read(path).with_context(|| format!("reading {}", path.display()))
}
