//! On-disk lock record: one line holding the holder's decimal PID.

use std::fs::{self, OpenOptions};
use std::io::{self, Write};
use std::path::Path;
use std::time::{SystemTime, UNIX_EPOCH};

/// Read the recorded PID, trimmed of trailing whitespace.
pub(super) fn read_pid(path: &Path) -> io::Result<String> {
    let content = fs::read_to_string(path)?;
    Ok(content.trim_end().to_string())
}

/// Whole seconds since the lock file was last modified.
///
/// Both instants are truncated to whole seconds before subtracting; a file
/// stamped in the future yields a negative age.
pub(super) fn age_secs(path: &Path) -> io::Result<i64> {
    let modified = fs::metadata(path)?.modified()?;
    Ok(epoch_secs(SystemTime::now()) - epoch_secs(modified))
}

fn epoch_secs(t: SystemTime) -> i64 {
    match t.duration_since(UNIX_EPOCH) {
        Ok(d) => d.as_secs() as i64,
        Err(e) => -(e.duration().as_secs() as i64),
    }
}

/// Write `<pid>\n` to the lock file.
///
/// With `exclusive` the file must not already exist; otherwise any existing
/// content is replaced.
pub(super) fn write_pid(path: &Path, pid: u32, exclusive: bool) -> io::Result<()> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
        && !parent.exists()
    {
        fs::create_dir_all(parent)?;
    }

    let mut options = OpenOptions::new();
    options.write(true);
    if exclusive {
        options.create_new(true);
    } else {
        options.create(true).truncate(true);
    }

    let mut file = options.open(path)?;
    writeln!(file, "{}", pid)?;
    file.sync_all()
}

pub(super) fn remove(path: &Path) -> io::Result<()> {
    fs::remove_file(path)
}
