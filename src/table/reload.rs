//! Background reload loop.
//!
//! # Responsibilities
//! - Poll source file stamps on a fixed interval
//! - Reload the snapshot when a stamp changed (or on demand)
//! - Install successful snapshots, keep the old one on failure
//!
//! # State machine
//! ```text
//! Running → Sleeping → Checking → (Reloading | Sleeping) → … → Stopped
//! ```

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{broadcast, Notify};
use tokio::task;
use tokio::time::{self, Instant, MissedTickBehavior};

use crate::error::Result;
use crate::observability::metrics;
use crate::table::loader::{load_snapshot, Mapping};
use crate::table::state::LoadState;
use crate::table::store::Store;

/// What a single check did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    /// No stamp changed; nothing was read.
    Unchanged,
    /// A new snapshot with this many entries was installed.
    Reloaded { entries: usize },
    /// The load failed and the previous snapshot was kept.
    Failed,
}

impl TickOutcome {
    fn label(self) -> &'static str {
        match self {
            TickOutcome::Unchanged => "unchanged",
            TickOutcome::Reloaded { .. } => "reloaded",
            TickOutcome::Failed => "failed",
        }
    }
}

/// Result of stat-ing and, if needed, reading the sources.
enum Check {
    Unchanged,
    Load {
        current: LoadState,
        result: Result<Mapping>,
    },
}

// Stamps are taken before reading so a write racing the read shows up as a
// change on the next tick.
fn check(sources: &[PathBuf], state: &LoadState, force: bool) -> Check {
    let current = LoadState::observe(sources);
    if !force && !state.needs_reload(&current) {
        return Check::Unchanged;
    }
    let result = load_snapshot(sources);
    Check::Load { current, result }
}

/// Owns the load state and installs snapshots into a shared [`Store`].
pub struct ReloadLoop {
    name: String,
    sources: Arc<[PathBuf]>,
    store: Arc<Store>,
    state: LoadState,
    interval: Duration,
    trigger: Arc<Notify>,
}

impl ReloadLoop {
    /// `state` is the stamp set observed for the snapshot currently in `store`.
    pub fn new(
        name: impl Into<String>,
        sources: Arc<[PathBuf]>,
        store: Arc<Store>,
        state: LoadState,
        interval: Duration,
        trigger: Arc<Notify>,
    ) -> Self {
        Self {
            name: name.into(),
            sources,
            store,
            state,
            interval,
            trigger,
        }
    }

    /// Run one check on the calling thread. With `force`, reload even if no
    /// stamp changed.
    pub fn tick(&mut self, force: bool) -> TickOutcome {
        let check = check(&self.sources, &self.state, force);
        self.apply(check, force)
    }

    /// Like [`ReloadLoop::tick`], but stats and reads the sources on the
    /// blocking pool so the runtime's workers keep serving other tasks.
    pub async fn tick_async(&mut self, force: bool) -> TickOutcome {
        let sources = Arc::clone(&self.sources);
        let state = self.state.clone();
        match task::spawn_blocking(move || check(&sources, &state, force)).await {
            Ok(check) => self.apply(check, force),
            Err(e) => {
                tracing::error!(
                    table = %self.name,
                    error = %e,
                    "reload task failed, keeping previous contents"
                );
                metrics::record_reload(&self.name, TickOutcome::Failed.label());
                TickOutcome::Failed
            }
        }
    }

    fn apply(&mut self, check: Check, force: bool) -> TickOutcome {
        let (current, result) = match check {
            Check::Unchanged => {
                tracing::debug!(table = %self.name, "sources unchanged");
                metrics::record_reload(&self.name, TickOutcome::Unchanged.label());
                return TickOutcome::Unchanged;
            }
            Check::Load { current, result } => (current, result),
        };

        for path in self.state.removed(&current) {
            tracing::warn!(table = %self.name, path = %path.display(), "source file removed");
        }

        let outcome = match result {
            Ok(mapping) => {
                let entries = mapping.len();
                self.store.replace(mapping);
                self.state = current;
                metrics::record_entries(&self.name, entries);
                tracing::info!(table = %self.name, entries, forced = force, "table reloaded");
                TickOutcome::Reloaded { entries }
            }
            Err(e) => {
                tracing::error!(
                    table = %self.name,
                    error = %e,
                    "failed to reload table, keeping previous contents"
                );
                TickOutcome::Failed
            }
        };

        metrics::record_reload(&self.name, outcome.label());
        outcome
    }

    /// Tick until `shutdown` fires or its sender is dropped.
    pub async fn run(mut self, mut shutdown: broadcast::Receiver<()>) {
        tracing::info!(
            table = %self.name,
            interval_ms = self.interval.as_millis() as u64,
            sources = self.sources.len(),
            "reload loop starting"
        );

        // tokio panics on a zero period.
        let period = self.interval.max(Duration::from_millis(1));
        let mut ticker = time::interval_at(Instant::now() + period, period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        let trigger = Arc::clone(&self.trigger);

        loop {
            tokio::select! {
                biased;
                _ = shutdown.recv() => {
                    tracing::info!(table = %self.name, "reload loop received shutdown signal, exiting");
                    break;
                }
                _ = trigger.notified() => {
                    self.tick_async(true).await;
                }
                _ = ticker.tick() => {
                    self.tick_async(false).await;
                }
            }
        }
    }
}
