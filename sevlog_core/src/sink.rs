//! Destination streams for log lines.
//!
//! A [`Sink`] is a cloneable handle to one locked writer. Every line is
//! written with a single `write_all` while the lock is held, so lines from
//! concurrent callers never interleave. File targets additionally take an
//! exclusive advisory lock around each line so several processes can share
//! one file.

use crate::Result;
use fs2::FileExt;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs::{File, OpenOptions};
use std::io::{self, Write};
use std::path::PathBuf;
use std::sync::{Arc, Mutex};

/// Where a sink writes, as named in configuration
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Target {
    Stdout,
    Stderr,
    /// Append to a file, creating it and its parent directory if needed
    File(PathBuf),
}

/// Shared, thread-safe destination for formatted lines
#[derive(Clone)]
pub struct Sink {
    inner: Arc<Mutex<Box<dyn Write + Send>>>,
}

impl Sink {
    /// Wrap any writer
    pub fn new<W: Write + Send + 'static>(writer: W) -> Self {
        Self {
            inner: Arc::new(Mutex::new(Box::new(writer))),
        }
    }

    pub fn stdout() -> Self {
        Self::new(io::stdout())
    }

    pub fn stderr() -> Self {
        Self::new(io::stderr())
    }

    /// Open the sink described by `target`
    pub fn open(target: &Target) -> Result<Self> {
        match target {
            Target::Stdout => Ok(Self::stdout()),
            Target::Stderr => Ok(Self::stderr()),
            Target::File(path) => {
                if let Some(parent) = path.parent() {
                    if !parent.as_os_str().is_empty() {
                        std::fs::create_dir_all(parent)?;
                    }
                }
                let file = OpenOptions::new().create(true).append(true).open(path)?;
                tracing::debug!("Opened log file {:?}", path);
                Ok(Self::new(LockedFile { file }))
            }
        }
    }

    /// True when both handles point at the same writer
    pub fn same_as(&self, other: &Sink) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }

    /// Write one complete line and flush it
    pub(crate) fn write_line(&self, line: &str) -> io::Result<()> {
        // A panic in another writer leaves the stream itself usable
        let mut writer = self.inner.lock().unwrap_or_else(|e| e.into_inner());
        writer.write_all(line.as_bytes())?;
        writer.flush()
    }
}

impl fmt::Debug for Sink {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Sink")
            .field("ptr", &Arc::as_ptr(&self.inner))
            .finish()
    }
}

/// Append-only file that holds an exclusive lock for each write
struct LockedFile {
    file: File,
}

impl Write for LockedFile {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.write_all(buf)?;
        Ok(buf.len())
    }

    fn write_all(&mut self, buf: &[u8]) -> io::Result<()> {
        self.file.lock_exclusive()?;
        let result = (&self.file).write_all(buf);
        // Lock is released even when the write failed
        let unlocked = FileExt::unlock(&self.file);
        result.and(unlocked)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.file.flush()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clones_share_writer() {
        let a = Sink::new(Vec::new());
        let b = a.clone();
        let c = Sink::new(Vec::new());
        assert!(a.same_as(&b));
        assert!(!a.same_as(&c));
    }

    #[test]
    fn test_file_target_appends() {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = temp_dir.path().join("logs").join("app.log");
        let target = Target::File(path.clone());

        let sink = Sink::open(&target).unwrap();
        sink.write_line("first\n").unwrap();
        drop(sink);

        // Reopening must not truncate
        let sink = Sink::open(&target).unwrap();
        sink.write_line("second\n").unwrap();

        let contents = std::fs::read_to_string(&path).unwrap();
        assert_eq!(contents, "first\nsecond\n");
    }

    #[test]
    fn test_target_from_toml() {
        #[derive(Deserialize)]
        struct Holder {
            a: Target,
            b: Target,
        }

        let parsed: Holder = toml::from_str(
            r#"
a = "stderr"
b = { file = "/var/log/app.log" }
"#,
        )
        .unwrap();
        assert_eq!(parsed.a, Target::Stderr);
        assert_eq!(parsed.b, Target::File(PathBuf::from("/var/log/app.log")));
    }
}
