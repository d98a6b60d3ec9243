//! Detection Worker
//!
//! Pops events, classifies on the blocking pool under a timeout, decides,
//! and posts alerts. Every per-event failure ends at a log line.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use serde::{Deserialize, Serialize};

use super::queue::EventQueue;
use crate::logic::alert::{AlertDecider, DebounceCache, Decision, IgnoreReason};
use crate::logic::classifier::{ClassificationResult, Classifier};
use crate::logic::events::{AccessibilityEvent, EventFilter};
use crate::logic::notifier::Notifier;

// ============================================================================
// COUNTERS
// ============================================================================

#[derive(Debug, Default)]
pub struct ServiceCounters {
    pub received: AtomicU64,
    pub dropped: AtomicU64,
    pub classified: AtomicU64,
    pub fired: AtomicU64,
    pub suppressed: AtomicU64,
    pub ignored: AtomicU64,
    pub failed: AtomicU64,
    pub timed_out: AtomicU64,
    pub notify_failed: AtomicU64,
}

impl ServiceCounters {
    fn bump(counter: &AtomicU64) {
        counter.fetch_add(1, Ordering::Relaxed);
    }

    pub fn snapshot(&self) -> ServiceStats {
        ServiceStats {
            received: self.received.load(Ordering::Relaxed),
            dropped: self.dropped.load(Ordering::Relaxed),
            classified: self.classified.load(Ordering::Relaxed),
            fired: self.fired.load(Ordering::Relaxed),
            suppressed: self.suppressed.load(Ordering::Relaxed),
            ignored: self.ignored.load(Ordering::Relaxed),
            failed: self.failed.load(Ordering::Relaxed),
            timed_out: self.timed_out.load(Ordering::Relaxed),
            notify_failed: self.notify_failed.load(Ordering::Relaxed),
        }
    }
}

/// Counter snapshot
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServiceStats {
    pub received: u64,
    pub dropped: u64,
    pub classified: u64,
    pub fired: u64,
    pub suppressed: u64,
    pub ignored: u64,
    pub failed: u64,
    pub timed_out: u64,
    pub notify_failed: u64,
}

// ============================================================================
// WORKER
// ============================================================================

pub(crate) struct Worker {
    pub classifier: Arc<Classifier>,
    pub decider: AlertDecider,
    pub cache: Arc<DebounceCache>,
    pub notifier: Arc<dyn Notifier>,
    pub filter: EventFilter,
    pub timeout: Duration,
    pub counters: Arc<ServiceCounters>,
}

impl Worker {
    /// Run on a dedicated thread with its own runtime
    pub fn spawn(
        self,
        queue: Arc<EventQueue<AccessibilityEvent>>,
        inference_threads: usize,
    ) -> std::io::Result<JoinHandle<()>> {
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .max_blocking_threads(inference_threads.max(1))
            .build()?;

        thread::Builder::new()
            .name("scam-detector-worker".to_string())
            .spawn(move || {
                let grace = self.timeout;
                runtime.block_on(self.run(queue));
                // abandoned inference calls must not hold up shutdown
                runtime.shutdown_timeout(grace);
            })
    }

    async fn run(self, queue: Arc<EventQueue<AccessibilityEvent>>) {
        log::info!("Detection worker started (inference timeout {:?})", self.timeout);
        while let Some(event) = queue.pop().await {
            self.process(event).await;
        }
        log::info!("Detection worker stopped");
    }

    async fn process(&self, event: AccessibilityEvent) {
        let Some(candidate) = event.candidate(&self.filter) else {
            log::trace!("Event without classifiable text skipped");
            return;
        };

        let Some(result) = self.classify(&candidate.text).await else {
            return;
        };
        ServiceCounters::bump(&self.counters.classified);
        log::debug!(
            "Prediction for {}: {}, confidence {:.3}",
            candidate.package,
            result.label,
            result.confidence
        );

        match self.decider.decide(&candidate, &result, &self.cache, Instant::now()) {
            Decision::Fire(alert) => {
                ServiceCounters::bump(&self.counters.fired);
                match self.notifier.post(&alert) {
                    Ok(()) => log::info!("Notification sent for potential scam from {}", alert.package),
                    Err(e) => {
                        ServiceCounters::bump(&self.counters.notify_failed);
                        log::error!("Failed to post alert: {}", e);
                    }
                }
            }
            Decision::Suppressed { key, elapsed } => {
                ServiceCounters::bump(&self.counters.suppressed);
                log::debug!("Duplicate alert {:?} suppressed ({:?} since last)", key, elapsed);
            }
            Decision::Ignore(IgnoreReason::ClassifierError) => {
                ServiceCounters::bump(&self.counters.failed);
            }
            Decision::Ignore(reason) => {
                ServiceCounters::bump(&self.counters.ignored);
                log::trace!("No alert: {:?}", reason);
            }
        }
    }

    /// `None` when the call timed out or panicked
    async fn classify(&self, text: &str) -> Option<ClassificationResult> {
        let classifier = Arc::clone(&self.classifier);
        let text = text.to_string();
        let task = tokio::task::spawn_blocking(move || classifier.classify(&text));

        match tokio::time::timeout(self.timeout, task).await {
            Ok(Ok(result)) => Some(result),
            Ok(Err(e)) => {
                ServiceCounters::bump(&self.counters.failed);
                log::error!("Classification crashed, event dropped: {}", e);
                None
            }
            Err(_) => {
                ServiceCounters::bump(&self.counters.timed_out);
                log::warn!("Inference exceeded {:?}, event dropped", self.timeout);
                None
            }
        }
    }
}
