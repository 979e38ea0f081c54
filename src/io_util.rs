use std::{path::Path, fs::read_to_string, time::SystemTime};

use anyhow::{Result, anyhow, Context};

pub fn my_read_to_string<P: AsRef<Path>>(path: P) -> Result<String> {
    read_to_string(&path).with_context(
        || anyhow!("opening path for reading: {:?}", path.as_ref()))
}

/// Seconds since the epoch; times before it count as 0.
pub fn unixtime(t: SystemTime) -> u64 {
    t.duration_since(SystemTime::UNIX_EPOCH).map(|d| d.as_secs()).unwrap_or(0)
}

pub fn now_unixtime() -> u64 {
    unixtime(SystemTime::now())
}

/// Modification time of the file at `path`, in seconds since the
/// epoch. Used to tell apart versions of a template file.
pub fn modified_unixtime(path: &Path) -> std::io::Result<u64> {
    Ok(unixtime(path.metadata()?.modified()?))
}
