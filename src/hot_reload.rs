//! # Hot Reload Module
//!
//! Development-mode driver that re-runs the full compile pipeline whenever
//! the app directory changes.
//!
//! ## Behavior
//!
//! - A filesystem watcher accumulates change notifications in a channel
//! - A background thread waits for a quiet window (the debounce) after the
//!   last observed change, then triggers one regeneration
//! - Triggers arriving inside the window coalesce into a single run
//! - Regeneration is non-reentrant: events arriving during a run queue up
//!   and schedule the next run after the current one completes
//!
//! Every run re-scans and regenerates from scratch. Runs are idempotent, so
//! repeating one is always safe; there is no incremental update path.
//!
//! ## Error Handling
//!
//! A failed run is logged and the previously generated file stays in place.
//! The watcher keeps running, so fixing the offending source triggers the
//! next regeneration.

use notify::{Config, Event, EventKind, RecommendedWatcher, RecursiveMode, Watcher};
use std::path::Path;
use std::sync::mpsc::{self, RecvTimeoutError};
use std::time::Duration;
use tracing::{info, warn};

/// Default quiet window between the last observed change and a run.
pub const DEFAULT_DEBOUNCE: Duration = Duration::from_millis(300);

/// Watch an app directory and invoke `on_change` after each debounced burst
/// of filesystem events.
///
/// The returned watcher must be kept alive for the callback to keep firing.
/// `on_change` runs on a dedicated thread, one invocation at a time.
pub fn watch_app<P, F>(
    app_dir: P,
    debounce: Duration,
    mut on_change: F,
) -> notify::Result<RecommendedWatcher>
where
    P: AsRef<Path>,
    F: FnMut() + Send + 'static,
{
    let (tx, rx) = mpsc::channel();

    let mut watcher = RecommendedWatcher::new(
        move |res: Result<Event, notify::Error>| match res {
            Ok(event) => {
                if matches!(
                    event.kind,
                    EventKind::Create(_) | EventKind::Modify(_) | EventKind::Remove(_)
                ) {
                    let _ = tx.send(());
                }
            }
            Err(e) => warn!("watch error: {e}"),
        },
        Config::default(),
    )?;
    watcher.watch(app_dir.as_ref(), RecursiveMode::Recursive)?;

    std::thread::spawn(move || {
        while rx.recv().is_ok() {
            // Drain the burst until the directory goes quiet.
            loop {
                match rx.recv_timeout(debounce) {
                    Ok(()) => continue,
                    Err(RecvTimeoutError::Timeout) => break,
                    Err(RecvTimeoutError::Disconnected) => return,
                }
            }
            info!("app directory changed, regenerating routes");
            on_change();
        }
    });

    Ok(watcher)
}
