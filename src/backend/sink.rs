//! Output destinations for the JSON backend

use crate::domain::{LogError, Result};
use std::fs::{File, OpenOptions};
use std::io::{self, Write};
use std::path::Path;
use std::sync::{Arc, Mutex, MutexGuard};

/// A line-oriented destination
///
/// Each record line is written with a single `write_all` under a lock, so
/// lines from concurrent writers never interleave. A failed write is latched
/// and returned by the next [`flush`](Sink::flush).
#[derive(Debug)]
pub struct Sink {
    target: Mutex<Target>,
    failure: Mutex<Option<String>>,
}

#[derive(Debug)]
enum Target {
    Stdout(io::Stdout),
    Stderr(io::Stderr),
    File(File),
    Buffer(SharedBuffer),
}

impl Sink {
    /// Open a sink by path: `stdout`, `stderr`, or a file opened for appending
    ///
    /// Missing parent directories are created.
    pub fn open(path: &str) -> Result<Self> {
        match path {
            "stdout" => Ok(Self::stdout()),
            "stderr" => Ok(Self::stderr()),
            "" => Err(LogError::Configuration(
                "output path must not be empty".to_string(),
            )),
            file => {
                let file_path = Path::new(file);
                if let Some(parent) = file_path.parent().filter(|p| !p.as_os_str().is_empty()) {
                    std::fs::create_dir_all(parent).map_err(|e| {
                        LogError::Io(format!(
                            "Failed to create log directory {}: {}",
                            parent.display(),
                            e
                        ))
                    })?;
                }
                let handle = OpenOptions::new()
                    .create(true)
                    .append(true)
                    .open(file_path)
                    .map_err(|e| LogError::Io(format!("Failed to open log file {file}: {e}")))?;
                Ok(Self::from_target(Target::File(handle)))
            }
        }
    }

    pub fn stdout() -> Self {
        Self::from_target(Target::Stdout(io::stdout()))
    }

    pub fn stderr() -> Self {
        Self::from_target(Target::Stderr(io::stderr()))
    }

    /// An in-memory sink; `buffer` keeps a handle to the written bytes
    pub fn buffer(buffer: &SharedBuffer) -> Self {
        Self::from_target(Target::Buffer(buffer.clone()))
    }

    fn from_target(target: Target) -> Self {
        Self {
            target: Mutex::new(target),
            failure: Mutex::new(None),
        }
    }

    /// Write `line` followed by a newline
    pub fn write_line(&self, line: &[u8]) {
        let mut bytes = Vec::with_capacity(line.len() + 1);
        bytes.extend_from_slice(line);
        bytes.push(b'\n');

        let outcome = match &mut *lock(&self.target) {
            Target::Stdout(out) => out.write_all(&bytes),
            Target::Stderr(err) => err.write_all(&bytes),
            Target::File(file) => file.write_all(&bytes),
            Target::Buffer(buffer) => buffer.write_all(&bytes),
        };

        if let Err(e) = outcome {
            self.latch(e.to_string());
        }
    }

    /// Flush the destination, reporting any write failure since the last flush
    pub fn flush(&self) -> Result<()> {
        if let Some(failure) = lock(&self.failure).take() {
            return Err(LogError::Io(format!("Failed to write log record: {failure}")));
        }

        match &mut *lock(&self.target) {
            Target::Stdout(out) => out.flush()?,
            Target::Stderr(err) => err.flush()?,
            Target::File(file) => {
                file.flush()?;
                file.sync_all()?;
            }
            Target::Buffer(_) => {}
        }
        Ok(())
    }

    pub(crate) fn latch(&self, failure: String) {
        let mut slot = lock(&self.failure);
        if slot.is_none() {
            *slot = Some(failure);
        }
    }
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    // A panicking writer cannot leave a half-written line behind, so a
    // poisoned lock is still usable.
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

/// Cloneable in-memory byte buffer, mainly for capturing output in tests
#[derive(Debug, Clone, Default)]
pub struct SharedBuffer {
    bytes: Arc<Mutex<Vec<u8>>>,
}

impl SharedBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Everything written so far, lossily decoded
    pub fn contents(&self) -> String {
        String::from_utf8_lossy(&lock(&self.bytes)).into_owned()
    }

    /// Each non-empty line parsed as JSON
    pub fn records(&self) -> Result<Vec<serde_json::Value>> {
        self.contents()
            .lines()
            .filter(|line| !line.trim().is_empty())
            .map(|line| serde_json::from_str(line).map_err(LogError::from))
            .collect()
    }

    pub fn is_empty(&self) -> bool {
        lock(&self.bytes).is_empty()
    }
}

impl Write for SharedBuffer {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        lock(&self.bytes).extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}
