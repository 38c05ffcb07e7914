use std::{
    env,
    fs::OpenOptions,
    io::Write,
    path::{Path, PathBuf},
};

use anyhow::{Context, Result};
use env_logger::{Env, Target};
use log::LevelFilter;

pub const DEFAULT_LOG_FILE_NAME: &str = "pure-tags.log";

/// The terminal belongs to the editor, so log output goes to a file.
pub fn default_log_path() -> PathBuf {
    env::temp_dir().join(DEFAULT_LOG_FILE_NAME)
}

/// Installs the global logger. `RUST_LOG` directives take precedence over `level`.
pub fn init(path: &Path, level: LevelFilter) -> Result<()> {
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .with_context(|| format!("failed to open log file {}", path.display()))?;

    env_logger::Builder::new()
        .filter_level(level)
        .parse_env(Env::default())
        .target(Target::Pipe(Box::new(file)))
        .format(|buf, record| {
            writeln!(
                buf,
                "{} [{}] {}: {}",
                buf.timestamp_millis(),
                record.level(),
                record.target(),
                record.args()
            )
        })
        .try_init()
        .context("failed to initialize logger")
}
