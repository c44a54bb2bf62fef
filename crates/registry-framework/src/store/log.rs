//! Append-only log file: the storage primitive under both the map and the pool.

use std::ffi::OsString;
use std::fs::{self, File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::{debug, error, warn};

use super::codec::{self, Decoded};
use super::error::{StoreError, StoreResult};

/// Durability knobs shared by every log.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StoreOptions {
    /// fsync after every append.
    pub sync_writes: bool,
    /// Frame count below which the map never compacts.
    pub compact_after: usize,
}

impl Default for StoreOptions {
    fn default() -> Self {
        Self {
            sync_writes: true,
            compact_after: 1024,
        }
    }
}

/// Named failure points, switched on by tests to exercise the rollback paths.
#[cfg(test)]
#[derive(Debug, Default, Clone, Copy)]
pub(crate) struct Faults {
    /// The next append writes half its frame, then fails.
    pub append: bool,
    /// Every truncation fails.
    pub truncate: bool,
}

/// Where the bytes of a torn tail are kept before the log is cut back.
pub(crate) fn torn_path(path: &Path) -> PathBuf {
    let mut name = OsString::from(path.as_os_str());
    name.push(".torn");
    PathBuf::from(name)
}

pub(crate) struct LogFile {
    path: PathBuf,
    file: File,
    len: u64,
    frames: usize,
    sync_writes: bool,
    /// Length and frame count before the most recent append.
    last_append: Option<(u64, usize)>,
    /// Set when a rollback failed; the file may hold a partial frame.
    poisoned: bool,
    #[cfg(test)]
    pub(crate) faults: Faults,
}

impl LogFile {
    /// Opens (or creates) the log at `path`, feeding every stored frame to `apply`
    /// in file order.
    ///
    /// A frame that runs past the end of the file is a torn tail only when nothing
    /// intact follows it. Its bytes are copied to `<path>.torn` before the log is cut
    /// back.
    pub(crate) fn open<V, F>(
        path: &Path,
        options: &StoreOptions,
        mut apply: F,
    ) -> StoreResult<Self>
    where
        V: DeserializeOwned,
        F: FnMut(V),
    {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).map_err(|e| {
                    StoreError::io(format!("failed to create {}", parent.display()), e)
                })?;
            }
        }

        let buf = match fs::read(path) {
            Ok(buf) => buf,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Vec::new(),
            Err(e) => {
                return Err(StoreError::io(format!("failed to read {}", path.display()), e))
            }
        };

        let corrupt = |offset: usize, reason: String| StoreError::Corrupt {
            path: path.to_path_buf(),
            offset: offset as u64,
            reason,
        };

        let mut offset = 0;
        let mut frames = 0;
        while offset < buf.len() {
            match codec::decode::<V>(&buf, offset) {
                Decoded::Frame { value, next } => {
                    apply(value);
                    frames += 1;
                    offset = next;
                }
                Decoded::TornTail => {
                    if let Some(intact) = codec::next_intact_frame(&buf, offset) {
                        let reason = format!(
                            "frame runs past end of file but an intact frame follows at {intact}"
                        );
                        return Err(corrupt(offset, reason));
                    }
                    break;
                }
                Decoded::Corrupt(reason) => return Err(corrupt(offset, reason)),
            }
        }

        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)
            .map_err(|e| StoreError::io(format!("failed to open {}", path.display()), e))?;

        let len = offset as u64;
        if offset < buf.len() {
            let sidecar = torn_path(path);
            warn!(
                path = %path.display(),
                offset,
                dropped = buf.len() - offset,
                sidecar = %sidecar.display(),
                "Truncating torn tail"
            );
            OpenOptions::new()
                .create(true)
                .append(true)
                .open(&sidecar)
                .and_then(|mut torn| {
                    torn.write_all(&buf[offset..])?;
                    torn.sync_all()
                })
                .map_err(|e| {
                    let context = format!("failed to save torn tail to {}", sidecar.display());
                    StoreError::io(context, e)
                })?;
            file.set_len(len)
                .map_err(|e| StoreError::io(format!("failed to truncate {}", path.display()), e))?;
        }

        debug!(path = %path.display(), frames, bytes = len, "Log opened");
        Ok(Self {
            path: path.to_path_buf(),
            file,
            len,
            frames,
            sync_writes: options.sync_writes,
            last_append: None,
            poisoned: false,
            #[cfg(test)]
            faults: Faults::default(),
        })
    }

    /// Appends one frame. On failure the file is cut back to its previous length;
    /// if even that fails, the log is poisoned and refuses further appends.
    pub(crate) fn append<V: Serialize>(&mut self, value: &V) -> StoreResult<()> {
        if self.poisoned {
            return Err(StoreError::Poisoned {
                path: self.path.clone(),
            });
        }
        let frame = codec::encode(value)?;
        if let Err(e) = self.write_frame(&frame) {
            self.last_append = None;
            // A failed rollback poisons the log; the caller sees the write error.
            if self.truncate_to(self.len).is_err() {
                debug_assert!(self.poisoned);
            }
            return Err(e);
        }
        self.last_append = Some((self.len, self.frames));
        self.len += frame.len() as u64;
        self.frames += 1;
        Ok(())
    }

    /// Removes the frame written by the most recent successful append.
    pub(crate) fn undo_append(&mut self) -> StoreResult<()> {
        let Some((len, frames)) = self.last_append.take() else {
            return Ok(());
        };
        self.truncate_to(len)?;
        self.len = len;
        self.frames = frames;
        Ok(())
    }

    fn write_frame(&mut self, frame: &[u8]) -> StoreResult<()> {
        #[cfg(test)]
        {
            if std::mem::take(&mut self.faults.append) {
                let _ = self.file.write_all(&frame[..frame.len() / 2]);
                return Err(StoreError::io(
                    format!("failed to append to {}", self.path.display()),
                    std::io::Error::other("injected append failure"),
                ));
            }
        }
        let path = &self.path;
        self.file
            .write_all(frame)
            .map_err(|e| StoreError::io(format!("failed to append to {}", path.display()), e))?;
        if self.sync_writes {
            self.file
                .sync_data()
                .map_err(|e| StoreError::io(format!("fsync failed on {}", path.display()), e))?;
        }
        Ok(())
    }

    fn truncate_to(&mut self, len: u64) -> StoreResult<()> {
        if let Err(e) = self.set_len(len) {
            self.poisoned = true;
            error!(
                path = %self.path.display(),
                len,
                error = %e,
                "Rollback failed, log poisoned"
            );
            return Err(StoreError::io(format!("failed to truncate {}", self.path.display()), e));
        }
        Ok(())
    }

    fn set_len(&mut self, len: u64) -> std::io::Result<()> {
        #[cfg(test)]
        {
            if self.faults.truncate {
                return Err(std::io::Error::other("injected truncate failure"));
            }
        }
        self.file.set_len(len)
    }

    /// Replaces the whole log with `values`, via a temp file and an atomic rename.
    /// A poisoned log is healthy again afterwards.
    pub(crate) fn rewrite<'a, V, I>(&mut self, values: I) -> StoreResult<()>
    where
        V: Serialize + 'a,
        I: IntoIterator<Item = &'a V>,
    {
        let tmp_path = self.path.with_extension("compact");
        let mut buf = Vec::new();
        let mut frames = 0;
        for value in values {
            buf.extend(codec::encode(value)?);
            frames += 1;
        }

        let mut tmp = File::create(&tmp_path)
            .map_err(|e| StoreError::io(format!("failed to create {}", tmp_path.display()), e))?;
        tmp.write_all(&buf)
            .and_then(|_| tmp.sync_all())
            .map_err(|e| StoreError::io(format!("failed to write {}", tmp_path.display()), e))?;
        drop(tmp);

        fs::rename(&tmp_path, &self.path).map_err(|e| {
            StoreError::io(
                format!("failed to replace {} with compacted log", self.path.display()),
                e,
            )
        })?;

        self.file = OpenOptions::new()
            .append(true)
            .open(&self.path)
            .map_err(|e| StoreError::io(format!("failed to reopen {}", self.path.display()), e))?;
        self.len = buf.len() as u64;
        self.frames = frames;
        self.last_append = None;
        self.poisoned = false;
        Ok(())
    }

    pub(crate) fn path(&self) -> &Path {
        &self.path
    }

    pub(crate) fn frames(&self) -> usize {
        self.frames
    }
}
