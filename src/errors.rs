use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum CheckError {
    #[error("Scan root not found: {}", .0.display())]
    RootNotFound(PathBuf),

    #[error("Scan root is not a directory: {}", .0.display())]
    RootNotADirectory(PathBuf),

    #[error("External tool not found: {0}")]
    ToolNotFound(String),

    #[error("Failed to run {tool} on {}: {source}", .file.display())]
    Process {
        tool: String,
        file: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, CheckError>;
