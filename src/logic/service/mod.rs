//! Detection Service - lifecycle around the pipeline
//!
//! ```ignore
//! let mut service = DetectionService::new(config, classifier, notifier)
//!     .with_source(Box::new(JsonLinesSource::new(BufReader::new(stdin()))));
//! service.start()?;
//! service.join_source();
//! service.stop();
//! ```
//!
//! Platform callbacks that push events instead of being polled call
//! `submit` from any thread; it never blocks.

pub mod queue;
pub mod worker;


use std::sync::Arc;
use std::thread::{self, JoinHandle};

use thiserror::Error;

use crate::logic::alert::{AlertDecider, DebounceCache};
use crate::logic::classifier::Classifier;
use crate::logic::config::ServiceConfig;
use crate::logic::events::{AccessibilityEvent, EventSource};
use crate::logic::notifier::Notifier;
use queue::{EventQueue, PushOutcome};
use worker::{ServiceCounters, Worker};

pub use queue::QueueStatus;
pub use worker::ServiceStats;

#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("service is already running")]
    AlreadyRunning,

    #[error("failed to spawn service thread: {0}")]
    Spawn(#[from] std::io::Error),
}

/// Explicit start/stop in place of a platform callback object
pub trait Lifecycle {
    fn start(&mut self) -> Result<(), ServiceError>;
    fn stop(&mut self);
    fn is_running(&self) -> bool;
}

pub struct DetectionService {
    config: ServiceConfig,
    classifier: Arc<Classifier>,
    notifier: Arc<dyn Notifier>,
    cache: Arc<DebounceCache>,
    counters: Arc<ServiceCounters>,
    source: Option<Box<dyn EventSource>>,
    queue: Option<Arc<EventQueue<AccessibilityEvent>>>,
    worker: Option<JoinHandle<()>>,
    pump: Option<JoinHandle<()>>,
}

impl DetectionService {
    pub fn new(config: ServiceConfig, classifier: Arc<Classifier>, notifier: Arc<dyn Notifier>) -> Self {
        let cache = Arc::new(config.alert.build_cache());
        Self {
            config,
            classifier,
            notifier,
            cache,
            counters: Arc::new(ServiceCounters::default()),
            source: None,
            queue: None,
            worker: None,
            pump: None,
        }
    }

    /// Pull events from `source` once started
    pub fn with_source(mut self, source: Box<dyn EventSource>) -> Self {
        self.source = Some(source);
        self
    }

    /// Hand an event to the worker. `false` when the service is not running.
    pub fn submit(&self, event: AccessibilityEvent) -> bool {
        match &self.queue {
            Some(queue) => enqueue(queue, &self.counters, event),
            None => {
                log::debug!("Service not running, event dropped");
                false
            }
        }
    }

    /// Block until the attached source is exhausted
    pub fn join_source(&mut self) {
        if let Some(pump) = self.pump.take() {
            if pump.join().is_err() {
                log::error!("Event source thread panicked");
            }
        }
    }

    pub fn stats(&self) -> ServiceStats {
        self.counters.snapshot()
    }

    pub fn queue_status(&self) -> Option<QueueStatus> {
        self.queue.as_ref().map(|q| q.status())
    }

    pub fn classifier(&self) -> &Classifier {
        &self.classifier
    }

    pub fn debounce_cache(&self) -> &DebounceCache {
        &self.cache
    }

    pub fn config(&self) -> &ServiceConfig {
        &self.config
    }

    fn spawn_pump(
        mut source: Box<dyn EventSource>,
        queue: Arc<EventQueue<AccessibilityEvent>>,
        counters: Arc<ServiceCounters>,
    ) -> std::io::Result<JoinHandle<()>> {
        thread::Builder::new()
            .name("scam-detector-source".to_string())
            .spawn(move || {
                while let Some(event) = source.next_event() {
                    if !enqueue(&queue, &counters, event) {
                        break;
                    }
                }
                log::info!("Event source exhausted");
            })
    }
}

fn enqueue(
    queue: &EventQueue<AccessibilityEvent>,
    counters: &ServiceCounters,
    event: AccessibilityEvent,
) -> bool {
    match queue.push(event) {
        PushOutcome::Queued => {
            counters.received.fetch_add(1, std::sync::atomic::Ordering::Relaxed);
            true
        }
        PushOutcome::DroppedOldest => {
            counters.received.fetch_add(1, std::sync::atomic::Ordering::Relaxed);
            counters.dropped.fetch_add(1, std::sync::atomic::Ordering::Relaxed);
            log::warn!("Event queue full, oldest event dropped");
            true
        }
        PushOutcome::Closed => false,
    }
}

impl Lifecycle for DetectionService {
    fn start(&mut self) -> Result<(), ServiceError> {
        if self.is_running() {
            return Err(ServiceError::AlreadyRunning);
        }

        let queue = Arc::new(EventQueue::new(self.config.worker.queue_capacity));
        let worker = Worker {
            classifier: Arc::clone(&self.classifier),
            decider: AlertDecider::new(self.config.alert.clone()),
            cache: Arc::clone(&self.cache),
            notifier: Arc::clone(&self.notifier),
            filter: self.config.filter.clone(),
            timeout: self.config.worker.inference_timeout(),
            counters: Arc::clone(&self.counters),
        };
        self.worker = Some(worker.spawn(Arc::clone(&queue), self.config.worker.inference_threads)?);

        if let Some(source) = self.source.take() {
            match Self::spawn_pump(source, Arc::clone(&queue), Arc::clone(&self.counters)) {
                Ok(pump) => self.pump = Some(pump),
                Err(e) => {
                    queue.close();
                    if let Some(worker) = self.worker.take() {
                        let _ = worker.join();
                    }
                    return Err(e.into());
                }
            }
        }

        self.queue = Some(queue);
        log::info!(
            "Scam detection service started (classifier ready: {}, threshold {:.2})",
            self.classifier.is_ready(),
            self.config.alert.thresholds.alert_threshold
        );
        Ok(())
    }

    fn stop(&mut self) {
        let Some(queue) = self.queue.take() else {
            return;
        };

        queue.close();
        if let Some(worker) = self.worker.take() {
            if worker.join().is_err() {
                log::error!("Detection worker panicked");
            }
        }

        // A source blocked on input cannot be interrupted; it exits on its next event
        if let Some(pump) = self.pump.take() {
            if pump.is_finished() {
                let _ = pump.join();
            } else {
                log::debug!("Event source still blocked, detaching");
            }
        }

        self.cache.clear();

        let stats = self.stats();
        log::info!(
            "Scam detection service stopped: received={} classified={} fired={} suppressed={} dropped={} failed={} timed_out={}",
            stats.received,
            stats.classified,
            stats.fired,
            stats.suppressed,
            stats.dropped,
            stats.failed,
            stats.timed_out
        );
    }

    fn is_running(&self) -> bool {
        self.queue.is_some()
    }
}

impl Drop for DetectionService {
    fn drop(&mut self) {
        self.stop();
    }
}
