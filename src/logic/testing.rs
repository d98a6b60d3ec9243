//! Shared test fixtures

use std::sync::Arc;
use std::time::Duration;

use ndarray::Array2;
use parking_lot::Mutex;

use crate::logic::model::{InferenceEngine, InferenceError};
use crate::logic::notifier::{Alert, Notifier, NotifyError};
use crate::logic::text::Vocabulary;

pub fn fixture_vocab() -> Vocabulary {
    Vocabulary::from_json_str(r#"{"the":2,"bank":3,"<OOV>":1}"#).unwrap()
}

/// Always returns the same confidence
pub struct FixedEngine(pub f32);

impl InferenceEngine for FixedEngine {
    fn infer(&self, _batch: Array2<f32>) -> Result<f32, InferenceError> {
        Ok(self.0)
    }

    fn name(&self) -> &str {
        "fixed"
    }
}

/// Always errors
pub struct FailingEngine;

impl InferenceEngine for FailingEngine {
    fn infer(&self, _batch: Array2<f32>) -> Result<f32, InferenceError> {
        Err(InferenceError::Run("boom".to_string()))
    }

    fn name(&self) -> &str {
        "failing"
    }
}

/// Sleeps before answering
pub struct SlowEngine {
    pub delay: Duration,
    pub confidence: f32,
}

impl InferenceEngine for SlowEngine {
    fn infer(&self, _batch: Array2<f32>) -> Result<f32, InferenceError> {
        std::thread::sleep(self.delay);
        Ok(self.confidence)
    }

    fn name(&self) -> &str {
        "slow"
    }
}

/// Panics on texts whose first token is "the"
pub struct PanickyEngine;

impl InferenceEngine for PanickyEngine {
    fn infer(&self, batch: Array2<f32>) -> Result<f32, InferenceError> {
        if batch[[0, 0]] == 2.0 {
            panic!("native crash");
        }
        Ok(0.95)
    }

    fn name(&self) -> &str {
        "panicky"
    }
}

/// Keeps every posted alert
#[derive(Default)]
pub struct RecordingNotifier {
    pub posted: Mutex<Vec<Alert>>,
}

impl RecordingNotifier {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn count(&self) -> usize {
        self.posted.lock().len()
    }
}

impl Notifier for RecordingNotifier {
    fn post(&self, alert: &Alert) -> Result<(), NotifyError> {
        self.posted.lock().push(alert.clone());
        Ok(())
    }
}

/// Every post fails
pub struct BrokenNotifier;

impl Notifier for BrokenNotifier {
    fn post(&self, _alert: &Alert) -> Result<(), NotifyError> {
        Err(NotifyError::Unavailable("tray gone".to_string()))
    }
}
