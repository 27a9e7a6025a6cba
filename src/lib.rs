//! mkv-check - Batch integrity checking for Matroska files
//!
//! Validates every `.mkv` file under a scan root by remuxing it through
//! ffmpeg's null muxer and classifying the error-severity diagnostics:
//! - known-benign warnings are filtered out
//! - any surviving diagnostic line marks the file corrupt
//! - a decode that overruns its time budget is a failure in itself
//!
//! ## Library use
//! ```rust,ignore
//! use mkv_check::{classify, validate, RunOutcome};
//! use std::path::Path;
//! use std::time::Duration;
//!
//! let outcome = validate(Path::new("ffmpeg"), Path::new("movie.mkv"), Duration::from_secs(10))?;
//! if let RunOutcome::Completed(diagnostics) = outcome {
//!     let verdict = classify(&diagnostics)?;
//!     println!("passed: {}", verdict.passed());
//! }
//! ```

pub mod classifier;
pub mod errors;
pub mod logging;
pub mod runner;
pub mod tally;
pub mod transcript;
pub mod walker;

pub use classifier::{classify, ClassifyError, LineRule, Verdict};
pub use errors::{CheckError, Result};
pub use runner::{validate, RunOutcome, DEFAULT_TIMEOUT_SECS};
pub use tally::{DirTally, ScanStats};
pub use transcript::{transcript_file_name, Transcript};
pub use walker::{is_candidate, scan, ScanConfig, TARGET_EXTENSIONS};
