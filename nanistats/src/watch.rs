//! Watch mode: re-run the analysis when files under the root change.

use std::path::Path;
use std::sync::mpsc::channel;
use std::time::Duration;

use notify::event::{AccessKind, AccessMode};
use notify::{Event, EventKind, RecursiveMode, Watcher};

/// Watch `root` and call `on_change` once up front and after every burst of
/// changes. Events arriving within `interval` of each other are coalesced.
///
/// Blocks until the watcher shuts down.
pub fn watch_loop<F>(root: &Path, interval: Duration, mut on_change: F) -> anyhow::Result<()>
where
    F: FnMut(),
{
    let (tx, rx) = channel();

    let mut watcher = notify::recommended_watcher(move |res: notify::Result<Event>| match res {
        Ok(event) => {
            if is_relevant(&event) {
                let _ = tx.send(event);
            }
        }
        Err(e) => tracing::warn!(error = %e, "watch error"),
    })?;
    watcher.watch(root, RecursiveMode::Recursive)?;

    eprintln!("[nanistats] watching {} (Ctrl-C to stop)", root.display());
    on_change();

    while let Ok(event) = rx.recv() {
        tracing::debug!(paths = ?event.paths, "change detected");
        std::thread::sleep(interval);
        while rx.try_recv().is_ok() {}

        on_change();
    }

    Ok(())
}

/// Reads (including our own) must not trigger a new pass.
fn is_relevant(event: &Event) -> bool {
    match event.kind {
        EventKind::Access(AccessKind::Close(AccessMode::Write)) => true,
        EventKind::Access(_) => false,
        _ => true,
    }
}
