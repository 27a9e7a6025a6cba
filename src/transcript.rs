//! Run transcript duplicated to the console and a log file.
//!
//! Every report line is printed to stdout and appended to a log file
//! named after the run's start time. The file is flushed per line so an
//! interrupted run keeps its partial transcript.

use crate::errors::Result;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

/// Dual-sink writer for the run transcript.
pub struct Transcript {
    path: PathBuf,
    file: BufWriter<File>,
}

impl Transcript {
    pub fn create(path: &Path) -> Result<Self> {
        let file = BufWriter::new(File::create(path)?);
        Ok(Self {
            path: path.to_path_buf(),
            file,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Emit one line to both sinks.
    pub fn line(&mut self, text: &str) -> Result<()> {
        println!("{}", text);
        writeln!(self.file, "{}", text)?;
        self.file.flush()?;
        Ok(())
    }
}

/// Log file name for a run started at `stamp`, e.g.
/// `mkvcheck_20260806_174530.log`.
pub fn transcript_file_name(stamp: &chrono::DateTime<chrono::Local>) -> String {
    format!("mkvcheck_{}.log", stamp.format("%Y%m%d_%H%M%S"))
}
