//! Opt-in file logging for match runs.
//!
//! The referee itself only emits `tracing` events; nothing is written
//! anywhere until a subscriber is installed. [`init_match_logger`] is the
//! one the crate ships: it drops a per-run log file into a directory of the
//! caller's choosing, which is where the referee's phase traces and the
//! disqualification warnings end up.

use std::fs::{self, File};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{anyhow, Context};
use time::{format_description, OffsetDateTime, UtcOffset};
use tracing::Level;
use tracing_subscriber::fmt::time::OffsetTime;

/// Install a global subscriber that writes every referee trace to a fresh
/// `match-<timestamp>.log` file under `dir`, creating the directory if
/// needed. Returns the path of the log file.
///
/// # Errors
///
/// Fails if the directory or file cannot be created, or if another global
/// subscriber is already installed.
pub fn init_match_logger<P: AsRef<Path>>(dir: P) -> anyhow::Result<PathBuf> {
    let dir = dir.as_ref();
    fs::create_dir_all(dir)
        .with_context(|| format!("could not create log directory {}", dir.display()))?;
    let path = dir.join(log_file_name()?);
    let file = File::create(&path)
        .with_context(|| format!("could not create log file {}", path.display()))?;

    // Timestamps in local time where the offset is known, UTC otherwise.
    let offset = UtcOffset::current_local_offset().unwrap_or(UtcOffset::UTC);
    let timer = OffsetTime::new(
        offset,
        format_description::parse("[year]-[month]-[day] [hour]:[minute]:[second]")?,
    );

    tracing_subscriber::fmt()
        .with_max_level(Level::TRACE)
        .with_ansi(false)
        .with_timer(timer)
        .with_writer(Arc::new(file))
        .try_init()
        .map_err(|e| anyhow!("could not install the match logger: {e}"))?;
    Ok(path)
}

fn log_file_name() -> anyhow::Result<String> {
    let format =
        format_description::parse("match-[year][month][day]-[hour][minute][second].log")?;
    let now = OffsetDateTime::now_local().unwrap_or_else(|_| OffsetDateTime::now_utc());
    Ok(now.format(&format)?)
}
