//! Dev live-reload: a change-notification stream for the static client.
//!
//! The core simulation does not depend on this; it exists so a developer
//! editing files under the public directory sees the page refresh. Clients
//! subscribe to `/events` (SSE) and reload on any `reload` event.

use std::convert::Infallible;
use std::path::{Path, PathBuf};
use std::time::{Duration, SystemTime};

use axum::extract::State;
use axum::response::sse::{Event, KeepAlive, Sse};
use futures::stream::Stream;
use futures::StreamExt;
use tokio::sync::broadcast;
use tracing::debug;

use crate::app::AppState;

/// How often the public directory is rescanned for changes
const POLL_PERIOD: Duration = Duration::from_secs(1);

/// SSE handler: relays watcher notifications as `reload` events
pub async fn reload_events_handler(
    State(state): State<AppState>,
) -> Sse<impl Stream<Item = Result<Event, Infallible>>> {
    let rx = state.reload_tx.subscribe();

    // Ask clients to retry quickly after a server restart
    let hello = futures::stream::iter([Ok(Event::default()
        .retry(Duration::from_millis(1000))
        .comment("connected"))]);

    let reloads = futures::stream::unfold(rx, |mut rx| async move {
        loop {
            match rx.recv().await {
                Ok(()) => return Some((Ok(Event::default().data("reload")), rx)),
                Err(broadcast::error::RecvError::Lagged(_)) => continue,
                Err(broadcast::error::RecvError::Closed) => return None,
            }
        }
    });

    Sse::new(hello.chain(reloads)).keep_alive(KeepAlive::default())
}

/// Watch the public directory and notify subscribers on any change.
/// Polling keeps this free of platform notification APIs; a one second
/// period is plenty for a dev convenience.
pub async fn watch_public_dir(dir: PathBuf, reload_tx: broadcast::Sender<()>) {
    let mut ticker = tokio::time::interval(POLL_PERIOD);
    let mut last = scan(&dir);

    loop {
        ticker.tick().await;
        let current = scan(&dir);
        if current != last {
            debug!(dir = %dir.display(), "Public directory changed, notifying clients");
            last = current;
            let _ = reload_tx.send(());
        }
    }
}

/// Cheap change fingerprint: file count plus newest modification time
fn scan(dir: &Path) -> (usize, Option<SystemTime>) {
    fn walk(dir: &Path, acc: &mut (usize, Option<SystemTime>)) {
        let Ok(entries) = std::fs::read_dir(dir) else {
            return;
        };
        for entry in entries.flatten() {
            let path = entry.path();
            if path.is_dir() {
                walk(&path, acc);
                continue;
            }
            acc.0 += 1;
            if let Ok(modified) = entry.metadata().and_then(|m| m.modified()) {
                if acc.1.map_or(true, |newest| modified > newest) {
                    acc.1 = Some(modified);
                }
            }
        }
    }

    let mut acc = (0, None);
    walk(dir, &mut acc);
    acc
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    #[test]
    fn scan_fingerprint_changes_when_files_change() {
        let dir = std::env::temp_dir().join(format!("presence-reload-{}", Uuid::new_v4()));
        std::fs::create_dir_all(dir.join("nested")).unwrap();

        let empty = scan(&dir);
        assert_eq!(empty.0, 0);

        std::fs::write(dir.join("index.html"), "<html></html>").unwrap();
        std::fs::write(dir.join("nested").join("app.js"), "console.log(1)").unwrap();
        let populated = scan(&dir);
        assert_eq!(populated.0, 2);
        assert_ne!(empty, populated);

        std::fs::remove_file(dir.join("index.html")).unwrap();
        assert_eq!(scan(&dir).0, 1);

        std::fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn scan_of_a_missing_directory_is_empty_not_a_fault() {
        let dir = std::env::temp_dir().join(format!("presence-missing-{}", Uuid::new_v4()));
        assert_eq!(scan(&dir), (0, None));
    }
}
