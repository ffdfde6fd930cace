//! Audit logging and the discoverable log link.
//!
//! Every mutating or reading operation appends one timestamped line to the
//! hunt's log file. Logging is best-effort: it runs after the operation it
//! describes, and a logging failure never rolls that operation back. The
//! discoverable link is refreshed only after mutations (add and
//! remove-treasure), so it can lag behind log lines written by reads.

use std::fs::OpenOptions;
use std::io::{ErrorKind, Write};
use std::path::PathBuf;

use chrono::Local;
use tracing::debug;

use crate::error::{Error, Result};
use crate::hunt::{Hunt, LOG_FILE};

#[cfg(unix)]
use std::os::unix::fs::symlink;
#[cfg(windows)]
use std::os::windows::fs::symlink_file as symlink;

/// Timestamp format of audit log lines.
const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Append one event line to the hunt's log file.
///
/// The log is created on first use. Lines are formatted as
/// `[YYYY-MM-DD HH:MM:SS] <message>` in local wall-clock time.
///
/// # Errors
///
/// Returns an error if the log cannot be opened or written. Callers treat
/// this as a warning; the operation that triggered the event stands.
pub fn append_event(hunt: &Hunt, message: &str) -> Result<()> {
    let path = hunt.log_path();
    let mut file = OpenOptions::new().append(true).create(true).open(&path)?;
    writeln!(
        file,
        "[{}] {}",
        Local::now().format(TIMESTAMP_FORMAT),
        message
    )?;

    debug!("hunt {}: {}", hunt.id(), message);
    Ok(())
}

/// Point `logged_hunt-<hunt_id>` in the hunts root at the hunt's log file.
///
/// Any existing link is removed first (an absent link is fine). The link
/// target is relative to the hunts root, so the link stays valid however
/// the root itself is addressed.
///
/// # Errors
///
/// Returns an error if the old link cannot be removed or the new one
/// cannot be created.
pub fn refresh_link(hunt: &Hunt) -> Result<()> {
    let link = hunt.link_path();
    match std::fs::remove_file(&link) {
        Ok(()) => {}
        Err(e) if e.kind() == ErrorKind::NotFound => {}
        Err(e) => return Err(e.into()),
    }

    let target = PathBuf::from(hunt.id()).join(LOG_FILE);
    symlink(&target, &link).map_err(|source| Error::LinkCreate { path: link, source })?;
    Ok(())
}
