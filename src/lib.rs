//! Package a plotting block and the data it plots into a standalone,
//! re-runnable script.
//!
//! A capture block is a `with PlotIs(figpath, data):` statement in a
//! Python source file. Given the file and the block's line, a
//! [`CaptureSession`] checks the block's shape, then writes the data as CSV
//! and a `run.py` that reloads it and replays the block.
//!
//! ```no_run
//! use plotis::{capture, CaptureConfig, CaptureContext, Dataset};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let df = plotis::data::loader::load_file("sinus.csv".as_ref())?;
//! let config = CaptureConfig::default();
//! let report = capture(
//!     &CaptureContext::new("analysis.py", 18),
//!     "figures/sinus",
//!     Dataset::Single(&df),
//!     &config,
//! )?;
//! println!("wrote {}", report.script.display());
//! # Ok(())
//! # }
//! ```

pub mod app;
pub mod capture;
pub mod cli;
pub mod config;
pub mod data;
pub mod error;

pub use capture::{capture, with_capture, CaptureContext, CaptureReport, CaptureSession};
pub use config::CaptureConfig;
pub use data::model::{CellValue, Dataset, Table};
pub use error::{CaptureError, CaptureResult, TerminalCall};
