//! File and directory metadata

use chrono::{DateTime, Local};
use serde::Serialize;
use std::fs;
use std::io;
use std::path::Path;
use std::time::SystemTime;

/// Metadata about a file or directory
///
/// Times are `None` when the platform does not record them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FileStatData {
    pub creation_time: Option<DateTime<Local>>,
    pub access_time: Option<DateTime<Local>>,
    pub modification_time: Option<DateTime<Local>>,
    /// Size in bytes, 0 for directories
    pub size: u64,
    pub is_directory: bool,
    /// Directories always report read-only
    pub is_read_only: bool,
}

/// Read metadata for `path`, following symlinks
pub fn stat<P: AsRef<Path>>(path: P) -> io::Result<FileStatData> {
    let metadata = fs::metadata(path.as_ref())?;
    let is_directory = metadata.is_dir();

    Ok(FileStatData {
        creation_time: local_time(metadata.created()),
        access_time: local_time(metadata.accessed()),
        modification_time: local_time(metadata.modified()),
        size: if is_directory { 0 } else { metadata.len() },
        is_directory,
        is_read_only: is_directory || metadata.permissions().readonly(),
    })
}

fn local_time(time: io::Result<SystemTime>) -> Option<DateTime<Local>> {
    time.ok().map(DateTime::<Local>::from)
}
