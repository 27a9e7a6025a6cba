use chrono::Local;
use clap::Parser;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::info;

use mkv_check::errors::CheckError;
use mkv_check::logging::{self, LogConfig};
use mkv_check::runner::DEFAULT_TIMEOUT_SECS;
use mkv_check::transcript::{transcript_file_name, Transcript};
use mkv_check::walker::{scan, ScanConfig};

#[derive(Parser)]
#[command(name = "mkv-check")]
#[command(version, about = "Batch integrity checker for Matroska files", long_about = None)]
struct Cli {
    /// Root directory to scan for .mkv files
    #[arg(value_name = "ROOT")]
    root: PathBuf,

    /// Per-file validation budget in seconds; a hung decode counts as failure
    #[arg(long, default_value_t = DEFAULT_TIMEOUT_SECS)]
    timeout: u64,
}

fn main() -> anyhow::Result<()> {
    let _ = logging::init_logging("mkv_check", LogConfig::default());

    let cli = Cli::parse();

    if !cli.root.exists() {
        eprintln!("❌ {}", CheckError::RootNotFound(cli.root.clone()));
        std::process::exit(2);
    }
    if !cli.root.is_dir() {
        eprintln!("❌ {}", CheckError::RootNotADirectory(cli.root.clone()));
        std::process::exit(2);
    }

    let tool = match which::which("ffmpeg") {
        Ok(path) => path,
        Err(_) => {
            eprintln!("❌ {}", CheckError::ToolNotFound("ffmpeg".to_string()));
            eprintln!("💡 Please ensure ffmpeg is installed and in PATH");
            std::process::exit(1);
        }
    };

    let started = Local::now();
    let log_name = transcript_file_name(&started);
    let mut out = Transcript::create(Path::new(&log_name))?;

    info!(
        root = %cli.root.display(),
        tool = %tool.display(),
        transcript = %out.path().display(),
        timeout_secs = cli.timeout,
        "Starting scan"
    );

    let config = ScanConfig {
        root: cli.root,
        tool,
        timeout: Duration::from_secs(cli.timeout),
    };
    scan(&config, &mut out)?;

    Ok(())
}
