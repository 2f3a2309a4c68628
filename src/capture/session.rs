use std::path::{Path, PathBuf};

use crate::config::CaptureConfig;
use crate::data::model::Dataset;
use crate::error::CaptureResult;

use super::context::CaptureContext;
use super::extent::{BlockDelimiter, IndentationDelimiter};
use super::invocation::Invocation;
use super::persist::persist;
use super::synth::synthesize;
use super::validate::validate_block;

/// A live capture of one plotting block.
///
/// Created by [`CaptureSession::enter`], which validates the block, and
/// consumed by [`CaptureSession::exit`], which writes the output. A session
/// is single-use.
#[derive(Debug)]
pub struct CaptureSession<'a> {
    output_dir: PathBuf,
    dataset: Dataset<'a>,
    config: &'a CaptureConfig,
    source_file: PathBuf,
    invocation: Invocation,
    opening_text: String,
    block_start: usize,
    block_end: usize,
    captured_lines: Vec<String>,
}

/// What a successful [`CaptureSession::exit`] wrote.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CaptureReport {
    pub output_dir: PathBuf,
    pub data_files: Vec<PathBuf>,
    pub script: PathBuf,
    pub source_file: PathBuf,
    pub block_start: usize,
    pub block_end: usize,
}

impl<'a> CaptureSession<'a> {
    /// Open a session for the block whose `with` statement is at `context`.
    pub fn enter(
        context: &CaptureContext,
        figpath: impl AsRef<Path>,
        dataset: Dataset<'a>,
        config: &'a CaptureConfig,
    ) -> CaptureResult<Self> {
        Self::enter_with(&IndentationDelimiter, context, figpath, dataset, config)
    }

    /// Like [`enter`](Self::enter) with a custom block delimiter.
    pub fn enter_with<D: BlockDelimiter>(
        delimiter: &D,
        context: &CaptureContext,
        figpath: impl AsRef<Path>,
        dataset: Dataset<'a>,
        config: &'a CaptureConfig,
    ) -> CaptureResult<Self> {
        let frame = context.inspect()?;
        let invocation = Invocation::parse(&frame.opening_text, frame.opening_line, config)?;

        let block_start = frame.opening_line + 1;
        let block_end = delimiter.resolve_extent(frame.source.lines(), frame.opening_line, false);
        let captured_lines = frame.source.range(block_start, block_end).to_vec();
        log::debug!(
            "{}: block spans lines {block_start}..={block_end}",
            frame.source_file.display()
        );

        validate_block(&captured_lines, block_start, config)?;

        Ok(CaptureSession {
            output_dir: figpath.as_ref().to_path_buf(),
            dataset,
            config,
            source_file: frame.source_file,
            invocation,
            opening_text: frame.opening_text,
            block_start,
            block_end,
            captured_lines,
        })
    }

    pub fn source_file(&self) -> &Path {
        &self.source_file
    }

    pub fn opening_text(&self) -> &str {
        &self.opening_text
    }

    pub fn invocation(&self) -> &Invocation {
        &self.invocation
    }

    /// 1-based inclusive line range of the body. Empty when `end < start`.
    pub fn block(&self) -> (usize, usize) {
        (self.block_start, self.block_end)
    }

    pub fn captured_lines(&self) -> &[String] {
        &self.captured_lines
    }

    /// The script [`exit`](Self::exit) would write.
    pub fn script(&self) -> CaptureResult<Vec<String>> {
        synthesize(
            &self.opening_text,
            &self.captured_lines,
            &self.dataset,
            self.config,
        )
    }

    /// Close the session: synthesize the script, then write data and script.
    ///
    /// Nothing is written if synthesis fails.
    pub fn exit(self) -> CaptureResult<CaptureReport> {
        let script = self.script()?;
        let written = persist(
            &self.output_dir,
            &self.dataset,
            &self.config.script_name,
            &script,
        )?;

        Ok(CaptureReport {
            output_dir: self.output_dir,
            data_files: written.data_files,
            script: written.script,
            source_file: self.source_file,
            block_start: self.block_start,
            block_end: self.block_end,
        })
    }
}

/// Run `body` inside a capture scope: enter, run, exit.
///
/// The body's result is returned together with the report. If entry fails
/// the body never runs.
pub fn with_capture<'a, T>(
    context: &CaptureContext,
    figpath: impl AsRef<Path>,
    dataset: Dataset<'a>,
    config: &'a CaptureConfig,
    body: impl FnOnce(&CaptureSession<'a>) -> T,
) -> CaptureResult<(T, CaptureReport)> {
    let session = CaptureSession::enter(context, figpath, dataset, config)?;
    let value = body(&session);
    Ok((value, session.exit()?))
}

/// Enter and immediately exit a session.
pub fn capture<'a>(
    context: &CaptureContext,
    figpath: impl AsRef<Path>,
    dataset: Dataset<'a>,
    config: &'a CaptureConfig,
) -> CaptureResult<CaptureReport> {
    CaptureSession::enter(context, figpath, dataset, config)?.exit()
}
