//! Debounced background analysis.
//!
//! Editors submit every keystroke; the debouncer waits for the source to
//! stay unchanged for a quiet interval, analyzes only the latest version,
//! and publishes the result on a watch channel.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;
use tokio::time::sleep;

use crate::analysis::{analyze_with, InputFormat};
use crate::config::Config;

/// Settings for a [`Debouncer`].
#[derive(Debug, Clone)]
pub struct DebounceConfig {
    /// How long the source must stay unchanged before it is analyzed.
    pub interval: Duration,
    /// Analyzer settings.
    pub config: Config,
}

impl DebounceConfig {
    pub fn from_config(config: Config) -> Self {
        Self {
            interval: config.debounce_interval(),
            config,
        }
    }
}

impl Default for DebounceConfig {
    fn default() -> Self {
        Self::from_config(Config::default())
    }
}

/// The most recent published analysis.
#[derive(Debug, Clone, PartialEq)]
pub struct Snapshot {
    /// Incremented on every publish; 0 before the first one.
    pub revision: u64,
    pub format: InputFormat,
}

struct Request {
    generation: u64,
    source: String,
    tag: String,
}

/// Handle to a background debouncing task.
pub struct Debouncer {
    requests: mpsc::UnboundedSender<Request>,
    snapshots: watch::Receiver<Snapshot>,
    submitted: AtomicU64,
    settled: Arc<AtomicU64>,
    task: JoinHandle<()>,
}

impl Debouncer {
    /// Spawn the debouncing task on the current tokio runtime.
    pub fn spawn(settings: DebounceConfig) -> Self {
        let (requests, rx) = mpsc::unbounded_channel();
        let (tx, snapshots) = watch::channel(Snapshot {
            revision: 0,
            format: InputFormat::empty(),
        });
        let settled = Arc::new(AtomicU64::new(0));

        let task = tokio::spawn(run_debounce_loop(settings, rx, tx, Arc::clone(&settled)));

        Self {
            requests,
            snapshots,
            submitted: AtomicU64::new(0),
            settled,
            task,
        }
    }

    /// Submit a new version of the source.
    ///
    /// Restarts the quiet interval and replaces any submission still
    /// waiting. Blank source is published as an empty format right away.
    pub fn submit(&self, source: impl Into<String>, tag: impl Into<String>) {
        let generation = self.submitted.fetch_add(1, Ordering::SeqCst) + 1;
        let request = Request {
            generation,
            source: source.into(),
            tag: tag.into(),
        };
        if self.requests.send(request).is_err() {
            tracing::debug!("debounce task has stopped; submission dropped");
        }
    }

    /// Receive published snapshots.
    pub fn subscribe(&self) -> watch::Receiver<Snapshot> {
        self.snapshots.clone()
    }

    /// The latest published snapshot.
    pub fn latest(&self) -> Snapshot {
        self.snapshots.borrow().clone()
    }

    /// Whether a submission has not been settled yet.
    pub fn is_pending(&self) -> bool {
        self.submitted.load(Ordering::SeqCst) > self.settled.load(Ordering::SeqCst)
    }

    /// Stop the task, discarding any submission still waiting.
    pub async fn stop(self) {
        let Debouncer { requests, task, .. } = self;
        drop(requests);
        if let Err(e) = task.await {
            tracing::warn!(error = %e, "debounce task ended abnormally");
        }
    }
}

async fn run_debounce_loop(
    settings: DebounceConfig,
    mut rx: mpsc::UnboundedReceiver<Request>,
    tx: watch::Sender<Snapshot>,
    settled: Arc<AtomicU64>,
) {
    let mut waiting: Option<Request> = None;
    let mut last_analyzed: Option<(String, String)> = None;
    let mut revision = 0u64;

    loop {
        let next = match waiting.take() {
            None => match rx.recv().await {
                Some(request) => request,
                None => break,
            },
            Some(request) => {
                tokio::select! {
                    incoming = rx.recv() => match incoming {
                        Some(newer) => newer,
                        None => break,
                    },
                    _ = sleep(settings.interval) => {
                        let key = (request.source, request.tag);
                        if last_analyzed.as_ref() == Some(&key) {
                            tracing::debug!(tag = %key.1, "source unchanged; skipping analysis");
                        } else {
                            let format = analyze_with(&key.0, &key.1, &settings.config);
                            revision += 1;
                            tx.send_replace(Snapshot { revision, format });
                            last_analyzed = Some(key);
                        }
                        settled.store(request.generation, Ordering::SeqCst);
                        continue;
                    }
                }
            }
        };

        if next.source.trim().is_empty() {
            revision += 1;
            settled.store(next.generation, Ordering::SeqCst);
            tx.send_replace(Snapshot {
                revision,
                format: InputFormat::empty(),
            });
            last_analyzed = None;
            continue;
        }

        waiting = Some(next);
    }
}
