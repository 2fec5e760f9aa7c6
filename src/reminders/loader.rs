use std::sync::Arc;
use std::time::Duration;

use tokio::runtime::Runtime;
use tokio::sync::mpsc;

use super::reminder::Batch;
use super::store::{ReminderSource, StoreError};

/// A completed fetch, tagged with the request that produced it.
#[derive(Debug)]
pub struct FetchResponse {
    pub generation: u64,
    pub weeks: u32,
    pub result: Result<Batch, StoreError>,
}

/// Fetches reminders in the background. Only the newest request counts:
/// responses to requests that were superseded before they finished are
/// dropped in [`Loader::poll`].
pub struct Loader {
    runtime: Runtime,
    source: Arc<dyn ReminderSource>,
    timeout: Duration,
    tx: mpsc::UnboundedSender<FetchResponse>,
    rx: mpsc::UnboundedReceiver<FetchResponse>,
    latest: u64,
    settled: bool,
}

impl Loader {
    pub fn new(source: Arc<dyn ReminderSource>, timeout: Duration) -> std::io::Result<Self> {
        let runtime = tokio::runtime::Builder::new_multi_thread()
            .worker_threads(1)
            .thread_name("reminder-fetch")
            .enable_time()
            .build()?;
        let (tx, rx) = mpsc::unbounded_channel();
        Ok(Self {
            runtime,
            source,
            timeout,
            tx,
            rx,
            latest: 0,
            settled: true,
        })
    }

    /// Start a fetch for a `weeks` horizon and return its generation.
    pub fn request(&mut self, weeks: u32) -> u64 {
        self.latest += 1;
        self.settled = false;
        let generation = self.latest;
        let source = Arc::clone(&self.source);
        let tx = self.tx.clone();
        let timeout = self.timeout;

        self.runtime.spawn(async move {
            let fetch = tokio::task::spawn_blocking(move || source.fetch());
            let result = match tokio::time::timeout(timeout, fetch).await {
                Ok(Ok(result)) => result,
                Ok(Err(join)) => Err(StoreError::Worker(join.to_string())),
                Err(_) => Err(StoreError::Worker(format!(
                    "timed out after {}s",
                    timeout.as_secs_f32()
                ))),
            };
            // The receiver only goes away when the app shuts down.
            let _ = tx.send(FetchResponse {
                generation,
                weeks,
                result,
            });
        });

        tracing::debug!(generation, weeks, "fetch requested");
        generation
    }

    /// Whether the newest request is still in flight.
    pub fn is_pending(&self) -> bool {
        !self.settled
    }

    /// Drain finished fetches. Returns the response to the newest request once
    /// it has arrived; everything older is discarded.
    pub fn poll(&mut self) -> Option<FetchResponse> {
        let mut current = None;
        while let Ok(response) = self.rx.try_recv() {
            if response.generation == self.latest {
                self.settled = true;
                current = Some(response);
            } else {
                tracing::debug!(
                    generation = response.generation,
                    latest = self.latest,
                    "dropping stale fetch response"
                );
            }
        }
        current
    }
}
