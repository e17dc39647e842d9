//! File-backed table with background reload.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use tokio::runtime::Handle;
use tokio::sync::Notify;
use tracing::Instrument;

use crate::config::loader::validate;
use crate::config::TableConfig;
use crate::error::{Result, TableError};
use crate::lifecycle::Shutdown;
use crate::observability::metrics;
use crate::table::loader::{load_snapshot, Mapping};
use crate::table::reload::ReloadLoop;
use crate::table::state::LoadState;
use crate::table::store::Store;

/// A key → value table backed by one or more text files.
///
/// [`FileTable::new`] performs the initial load and fails if any source is
/// malformed or unreadable. [`FileTable::init`] starts the reload loop and
/// [`FileTable::close`] stops it. Lookups work in every state.
pub struct FileTable {
    name: String,
    sources: Arc<[PathBuf]>,
    interval: Duration,
    store: Arc<Store>,
    /// Stamps for the initial snapshot, handed to the first reload loop.
    initial_state: Option<LoadState>,
    trigger: Arc<Notify>,
    shutdown: Shutdown,
}

impl FileTable {
    /// Validate `config` and load every source once.
    pub fn new(config: &TableConfig) -> Result<Self> {
        validate(config)?;

        let sources: Arc<[PathBuf]> = config.files.clone().into();
        let state = LoadState::observe(&sources);
        let mapping = load_snapshot(&sources)?;

        tracing::info!(
            table = %config.name,
            sources = sources.len(),
            entries = mapping.len(),
            "table loaded"
        );
        metrics::record_entries(&config.name, mapping.len());

        Ok(Self {
            name: config.name.clone(),
            sources,
            interval: config.reload_interval(),
            store: Arc::new(Store::new(mapping)),
            initial_state: Some(state),
            trigger: Arc::new(Notify::new()),
            shutdown: Shutdown::new(),
        })
    }

    /// Start the background reload loop on the current tokio runtime.
    ///
    /// File I/O for each check runs on the runtime's blocking pool, so this
    /// works on `current_thread` runtimes without stalling other tasks.
    pub fn init(&mut self) -> Result<()> {
        if self.shutdown.is_running() {
            return Err(TableError::AlreadyRunning);
        }
        let runtime = Handle::try_current().map_err(|_| TableError::NoRuntime)?;

        // After a close the loop's stamps are gone; an empty state makes the
        // first tick reload unconditionally.
        let state = self.initial_state.take().unwrap_or_default();
        let reload = ReloadLoop::new(
            self.name.clone(),
            Arc::clone(&self.sources),
            Arc::clone(&self.store),
            state,
            self.interval,
            Arc::clone(&self.trigger),
        );

        let span = tracing::info_span!("file_table", table = %self.name);
        self.shutdown
            .spawn(&runtime, move |rx| reload.run(rx).instrument(span));
        Ok(())
    }

    /// Stop the reload loop and wait for it to exit.
    ///
    /// Safe to call more than once, or without a prior `init`.
    pub async fn close(&mut self) {
        let was_running = self.shutdown.is_running();
        self.shutdown.shutdown().await;
        if was_running {
            tracing::info!(table = %self.name, "table closed");
        }
    }

    /// Value for `key` in the current snapshot.
    pub fn lookup(&self, key: &str) -> Option<String> {
        self.store.get(key)
    }

    /// Ask the reload loop to re-read all sources now.
    ///
    /// Has no effect until [`FileTable::init`] has been called; a request made
    /// while a reload is in progress runs once that reload finishes.
    pub fn reload_now(&self) {
        self.trigger.notify_one();
    }

    /// The current snapshot, for consistent multi-key reads.
    pub fn snapshot(&self) -> Arc<Mapping> {
        self.store.snapshot()
    }

    /// All keys of the current snapshot, sorted.
    pub fn keys(&self) -> Vec<String> {
        let mut keys: Vec<String> = self.store.snapshot().keys().cloned().collect();
        keys.sort();
        keys
    }

    pub fn len(&self) -> usize {
        self.store.len()
    }

    pub fn is_empty(&self) -> bool {
        self.store.is_empty()
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn sources(&self) -> &[PathBuf] {
        &self.sources
    }

    /// Whether the reload loop is currently running.
    pub fn is_running(&self) -> bool {
        self.shutdown.is_running()
    }
}

impl Drop for FileTable {
    fn drop(&mut self) {
        self.shutdown.trigger();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn test_new_rejects_empty_source_set() {
        let err = FileTable::new(&TableConfig::default()).err().unwrap();
        assert!(matches!(err, TableError::Config(_)));
    }

    #[test]
    fn test_new_fails_on_malformed_source() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("t");
        fs::write(&path, "a: b\n:").unwrap();

        let err = FileTable::new(&TableConfig::with_files([&path])).err().unwrap();
        assert!(matches!(err, TableError::Parse { line_no: 2, .. }));
    }

    #[test]
    fn test_new_fails_on_non_utf8_source() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("t");
        fs::write(&path, b"cat: \xff\xfe").unwrap();

        let err = FileTable::new(&TableConfig::with_files([&path])).err().unwrap();
        assert!(matches!(err, TableError::Io { .. }));
    }

    #[test]
    fn test_sources_keep_configured_order() {
        let dir = tempfile::tempdir().unwrap();
        let first = dir.path().join("first");
        let second = dir.path().join("second");
        fs::write(&first, "a: 1").unwrap();

        let table = FileTable::new(&TableConfig::with_files([&second, &first])).unwrap();
        assert_eq!(table.sources(), &[second, first][..]);
        assert_eq!(table.name(), "file");
    }

    #[test]
    fn test_new_with_missing_source_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let table = FileTable::new(&TableConfig::with_files([dir.path().join("missing")])).unwrap();
        assert!(table.is_empty());
        assert_eq!(table.lookup("cat"), None);
    }

    #[test]
    fn test_init_outside_runtime_fails() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("t");
        fs::write(&path, "cat: dog").unwrap();

        let mut table = FileTable::new(&TableConfig::with_files([&path])).unwrap();
        assert!(matches!(table.init(), Err(TableError::NoRuntime)));
        assert_eq!(table.lookup("cat").as_deref(), Some("dog"));
    }

    #[tokio::test]
    async fn test_double_init_fails() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("t");
        fs::write(&path, "b: 2\na: 1").unwrap();

        let mut table = FileTable::new(&TableConfig::with_files([&path])).unwrap();
        table.init().unwrap();
        assert!(matches!(table.init(), Err(TableError::AlreadyRunning)));
        assert_eq!(table.keys(), vec!["a".to_string(), "b".to_string()]);

        table.close().await;
        assert!(!table.is_running());
    }
}
