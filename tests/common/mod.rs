//! Shared utilities for table integration tests.

use std::fs;
use std::future::Future;
use std::path::{Path, PathBuf};
use std::time::Duration;

use file_table::{FileTable, TableConfig};

/// Reload interval used by the integration tests.
pub const RELOAD_INTERVAL: Duration = Duration::from_millis(100);

/// A scratch directory holding one table source file.
pub struct Source {
    _dir: tempfile::TempDir,
    pub path: PathBuf,
}

impl Source {
    pub fn new(contents: &str) -> Self {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("table");
        fs::write(&path, contents).unwrap();
        Self { _dir: dir, path }
    }

    pub fn write(&self, contents: &str) {
        fs::write(&self.path, contents).unwrap();
    }

    pub fn remove(&self) {
        fs::remove_file(&self.path).unwrap();
    }
}

/// Config for `paths` with the fast test reload interval.
pub fn config<P: AsRef<Path>>(paths: &[P]) -> TableConfig {
    let mut config = TableConfig::with_files(paths.iter().map(|p| p.as_ref().to_path_buf()));
    config.name = "test".to_string();
    config.reload_interval_ms = RELOAD_INTERVAL.as_millis() as u64;
    config
}

/// Build and start a table over `paths`.
pub fn start<P: AsRef<Path>>(paths: &[P]) -> FileTable {
    let mut table = FileTable::new(&config(paths)).unwrap();
    table.init().unwrap();
    table
}

/// Poll `check` once per reload interval until it holds or `attempts` run out.
#[allow(dead_code)]
pub async fn eventually<F>(attempts: usize, mut check: F) -> bool
where
    F: FnMut() -> bool,
{
    for _ in 0..attempts {
        if check() {
            return true;
        }
        tokio::time::sleep(RELOAD_INTERVAL + Duration::from_millis(20)).await;
    }
    check()
}

/// Fail the test if `fut` does not finish within `limit`.
#[allow(dead_code)]
pub async fn within<F: Future>(limit: Duration, fut: F) -> F::Output {
    tokio::time::timeout(limit, fut)
        .await
        .expect("operation did not complete in time")
}
