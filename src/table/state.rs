//! Per-file change detection.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::time::{Duration, SystemTime};

/// A file modified this close to the moment it was stamped may be rewritten
/// again within the same mtime tick (1 s on ext3/HFS+), leaving an identical
/// stamp. Such stamps are re-checked by content until they age out.
pub const RACY_WINDOW: Duration = Duration::from_secs(1);

/// Last observed state of one source file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileStamp {
    /// The file did not exist.
    Absent,
    /// The file existed with this modification time and length.
    ///
    /// An equal-length rewrite inside one mtime tick produces the same
    /// stamp; see [`RACY_WINDOW`] for how that case is still caught.
    Present { modified: SystemTime, len: u64 },
    /// The file existed or could not be inspected, and no modification time
    /// is available. Always treated as changed.
    Untracked,
}

impl FileStamp {
    /// Stat `path` without reading it.
    pub fn observe(path: &Path) -> Self {
        match fs::metadata(path) {
            Ok(meta) => match meta.modified() {
                Ok(modified) => FileStamp::Present {
                    modified,
                    len: meta.len(),
                },
                Err(_) => FileStamp::Untracked,
            },
            Err(e) if e.kind() == io::ErrorKind::NotFound => FileStamp::Absent,
            Err(_) => FileStamp::Untracked,
        }
    }

    /// Whether an unchanged stamp can still hide an edit, given when it was
    /// taken.
    fn is_racy(&self, observed_at: SystemTime) -> bool {
        match self {
            FileStamp::Present { modified, .. } => match observed_at.duration_since(*modified) {
                Ok(age) => age < RACY_WINDOW,
                // Modified in the future relative to the stat.
                Err(_) => true,
            },
            FileStamp::Absent => false,
            FileStamp::Untracked => true,
        }
    }
}

/// Stamps for the whole source set, in source order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadState {
    stamps: Vec<(PathBuf, FileStamp)>,
    observed_at: SystemTime,
}

impl Default for LoadState {
    fn default() -> Self {
        Self {
            stamps: Vec::new(),
            observed_at: SystemTime::UNIX_EPOCH,
        }
    }
}

impl LoadState {
    /// Observe every path in `sources`.
    pub fn observe(sources: &[PathBuf]) -> Self {
        let stamps = sources
            .iter()
            .map(|p| (p.clone(), FileStamp::observe(p)))
            .collect();
        Self {
            stamps,
            observed_at: SystemTime::now(),
        }
    }

    /// Whether `current` differs from `self` in a way that requires a reload.
    ///
    /// Equal stamps still require a reload while `self` was taken within
    /// [`RACY_WINDOW`] of the file's modification time.
    pub fn needs_reload(&self, current: &LoadState) -> bool {
        if self.stamps.len() != current.stamps.len() {
            return true;
        }
        self.stamps.iter().zip(&current.stamps).any(|(old, new)| {
            old.0 != new.0 || old.1 != new.1 || old.1.is_racy(self.observed_at)
        })
    }

    /// Paths that were present in `self` and are absent in `current`.
    pub fn removed<'a>(&'a self, current: &'a LoadState) -> impl Iterator<Item = &'a Path> + 'a {
        self.stamps
            .iter()
            .zip(&current.stamps)
            .filter(|(old, new)| {
                !matches!(old.1, FileStamp::Absent) && matches!(new.1, FileStamp::Absent)
            })
            .map(|(_, new)| new.0.as_path())
    }
}
