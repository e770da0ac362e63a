//! Watcher for out-of-process store changes
//!
//! A second session (or anything else) writing the same database should show
//! up here without polling. Uses notify with adaptive debouncing: SQLite in
//! WAL mode touches the `-wal`/`-shm` siblings in bursts, so sustained bursts
//! stretch the debounce delay instead of refreshing per write.

use crate::event::StoreEvent;
use crate::remote::STORE_FILE;
use crate::store::ProblemStore;
use notify::{Config, Event, EventKind, RecommendedWatcher, RecursiveMode, Watcher};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::mpsc;
use tracing::{debug, error, info, trace};

/// Debounce tuning for the store watcher
#[derive(Debug, Clone)]
pub struct WatcherConfig {
    /// Delay applied while traffic is light
    pub debounce_delay: Duration,

    /// Ceiling the delay stretches to under sustained writes
    pub max_debounce_delay: Duration,

    /// Events per second that count as a burst
    pub burst_threshold: u32,
}

impl Default for WatcherConfig {
    fn default() -> Self {
        Self {
            debounce_delay: Duration::from_millis(500),
            max_debounce_delay: Duration::from_secs(3),
            burst_threshold: 10,
        }
    }
}

/// Watches the store's database directory and refreshes the problem store
pub struct StoreWatcher {
    /// Keeps the OS-level watch registered
    _watcher: RecommendedWatcher,

    /// Closes the background select loop
    shutdown_tx: mpsc::Sender<()>,
}

impl StoreWatcher {
    /// Start watching the directory holding `db_path`.
    ///
    /// The directory, not the file, is watched: SQLite recreates and renames
    /// the WAL siblings, which silently drops a file-level watch on some
    /// platforms.
    pub async fn start(
        store: Arc<ProblemStore>,
        db_path: PathBuf,
        config: WatcherConfig,
    ) -> Result<Self, notify::Error> {
        let (event_tx, mut event_rx) = mpsc::channel::<notify::Result<Event>>(100);
        let (shutdown_tx, mut shutdown_rx) = mpsc::channel::<()>(1);

        let mut watcher = RecommendedWatcher::new(
            move |res| {
                let _ = event_tx.blocking_send(res);
            },
            Config::default().with_poll_interval(Duration::from_secs(2)),
        )?;

        let watch_dir = db_path
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_else(|| PathBuf::from("."));
        watcher.watch(&watch_dir, RecursiveMode::NonRecursive)?;

        info!(dir = %watch_dir.display(), "Store watcher started");

        let event_bus = store.event_bus().clone();
        tokio::spawn(async move {
            let mut debounce = DebounceState::new(config);

            loop {
                tokio::select! {
                    Some(result) = event_rx.recv() => {
                        match result {
                            Ok(event) => {
                                if is_store_event(&event) && debounce.should_emit() {
                                    debug!("Store changed on disk, refreshing");
                                    store.refresh().await;
                                }
                            }
                            Err(e) => {
                                error!(error = %e, "Store watcher error");
                                event_bus.publish(StoreEvent::SyncError(e.to_string()));
                            }
                        }
                    }
                    _ = shutdown_rx.recv() => {
                        info!("Store watcher shutting down");
                        break;
                    }
                }
            }
        });

        Ok(Self {
            _watcher: watcher,
            shutdown_tx,
        })
    }

    /// Ask the background loop to exit
    pub async fn stop(&self) {
        let _ = self.shutdown_tx.send(()).await;
    }
}

/// Whether a notify event touches the store file family.
///
/// Matches by file-name prefix so `leetboard.db`, `leetboard.db-wal` and
/// `leetboard.db-shm` all count.
fn is_store_event(event: &Event) -> bool {
    match event.kind {
        EventKind::Create(_) | EventKind::Modify(_) => {}
        _ => return false,
    }

    event.paths.iter().any(|path| {
        let matched = path
            .file_name()
            .and_then(|n| n.to_str())
            .map(|n| n.starts_with(STORE_FILE))
            .unwrap_or(false);
        if matched {
            trace!(path = %path.display(), "Store file event");
        }
        matched
    })
}

/// Debounce state with burst-adaptive delay.
///
/// All store-file events collapse into one logical "store changed" signal,
/// so the state is a single last-emit mark plus a one-second rate window.
struct DebounceState {
    config: WatcherConfig,
    last_emit: Option<Instant>,
    event_window: std::collections::VecDeque<Instant>,
}

impl DebounceState {
    fn new(config: WatcherConfig) -> Self {
        Self {
            config,
            last_emit: None,
            event_window: std::collections::VecDeque::new(),
        }
    }

    fn should_emit(&mut self) -> bool {
        let now = Instant::now();

        // Slide the one-second rate window forward
        self.event_window.push_back(now);
        while self
            .event_window
            .front()
            .map(|t| now.duration_since(*t) > Duration::from_secs(1))
            .unwrap_or(false)
        {
            self.event_window.pop_front();
        }

        let delay = if self.event_window.len() as u32 > self.config.burst_threshold {
            self.config.max_debounce_delay
        } else {
            self.config.debounce_delay
        };

        if let Some(last) = self.last_emit {
            if now.duration_since(last) < delay {
                trace!("Debouncing store event");
                return false;
            }
        }

        self.last_emit = Some(now);
        true
    }
}
