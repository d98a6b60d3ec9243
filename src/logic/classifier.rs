//! Classification Facade
//!
//! clean → tokenize → pad → infer → label, behind one `classify` call.
//! A failed asset load is permanent for the instance: every call returns
//! the `Label::Error` sentinel instead of touching the engine.

use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Instant;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::constants::{MODEL_FILE, VOCAB_FILE};
use crate::logic::model::{InferenceEngine, InferenceError, Label, OnnxEngine};
use crate::logic::text::{Tokenizer, VocabError, Vocabulary};

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("vocabulary load failed: {0}")]
    Vocab(#[from] VocabError),

    #[error("model load failed: {0}")]
    Model(#[from] InferenceError),
}

/// Locations of the bundled assets
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AssetPaths {
    pub model: PathBuf,
    pub vocab: PathBuf,
}

impl AssetPaths {
    pub fn in_dir(dir: &Path) -> Self {
        Self {
            model: dir.join(MODEL_FILE),
            vocab: dir.join(VOCAB_FILE),
        }
    }
}

/// Label + confidence for one text
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ClassificationResult {
    pub label: Label,
    pub confidence: f32,
}

impl ClassificationResult {
    /// Error sentinel
    pub fn error() -> Self {
        Self {
            label: Label::Error,
            confidence: 0.0,
        }
    }

    pub fn is_scam(&self) -> bool {
        self.label == Label::Scam
    }
}

/// Classifier status for logs / embedders
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClassifierStatus {
    pub ready: bool,
    pub engine: String,
    pub load_error: Option<String>,
    pub avg_latency_ms: f32,
    pub inference_count: u64,
    pub failure_count: u64,
}

struct Ready {
    tokenizer: Tokenizer,
    engine: Box<dyn InferenceEngine>,
}

pub struct Classifier {
    state: Result<Ready, LoadError>,
    latency_sum_us: AtomicU64,
    inference_count: AtomicU64,
    failure_count: AtomicU64,
}

impl Classifier {
    /// Ready classifier from already-loaded parts
    pub fn new(vocab: Vocabulary, engine: Box<dyn InferenceEngine>) -> Self {
        Self::from_state(Ok(Ready {
            tokenizer: Tokenizer::new(Arc::new(vocab)),
            engine,
        }))
    }

    /// Permanently failed classifier
    pub fn failed(error: LoadError) -> Self {
        Self::from_state(Err(error))
    }

    /// Load vocabulary and ONNX model. Never fails; check `is_ready`.
    pub fn load(paths: &AssetPaths) -> Self {
        match Self::try_load(paths) {
            Ok(classifier) => {
                log::info!("Classifier initialized successfully");
                classifier
            }
            Err(e) => {
                log::error!("!!! CRITICAL: classifier assets unavailable: {}", e);
                log::error!(
                    "!!! Expected '{}' and '{}'. Every classification will return Error.",
                    paths.model.display(),
                    paths.vocab.display()
                );
                Self::failed(e)
            }
        }
    }

    fn try_load(paths: &AssetPaths) -> Result<Self, LoadError> {
        let vocab = Vocabulary::load(&paths.vocab)?;
        log::info!("Vocabulary loaded with {} words", vocab.len());
        let engine = OnnxEngine::load(&paths.model)?;
        Ok(Self::new(vocab, Box::new(engine)))
    }

    fn from_state(state: Result<Ready, LoadError>) -> Self {
        Self {
            state,
            latency_sum_us: AtomicU64::new(0),
            inference_count: AtomicU64::new(0),
            failure_count: AtomicU64::new(0),
        }
    }

    pub fn is_ready(&self) -> bool {
        self.state.is_ok()
    }

    pub fn load_error(&self) -> Option<&LoadError> {
        self.state.as_ref().err()
    }

    /// Classify raw text
    pub fn classify(&self, text: &str) -> ClassificationResult {
        let ready = match &self.state {
            Ok(ready) => ready,
            Err(_) => {
                log::debug!("Cannot classify: classifier not initialized");
                return ClassificationResult::error();
            }
        };

        let start = Instant::now();
        let batch = ready.tokenizer.encode(text).to_batch();
        let outcome = ready.engine.infer(batch);

        self.latency_sum_us.fetch_add(start.elapsed().as_micros() as u64, Ordering::Relaxed);
        self.inference_count.fetch_add(1, Ordering::Relaxed);

        match outcome {
            Ok(confidence) if (0.0..=1.0).contains(&confidence) => ClassificationResult {
                label: Label::from_confidence(confidence),
                confidence,
            },
            Ok(confidence) => {
                log::warn!("Model returned confidence {} outside [0, 1], rejected", confidence);
                self.failure_count.fetch_add(1, Ordering::Relaxed);
                ClassificationResult::error()
            }
            Err(e) => {
                log::error!("Error during classification: {}", e);
                self.failure_count.fetch_add(1, Ordering::Relaxed);
                ClassificationResult::error()
            }
        }
    }

    pub fn status(&self) -> ClassifierStatus {
        let sum = self.latency_sum_us.load(Ordering::Relaxed);
        let count = self.inference_count.load(Ordering::Relaxed);
        let avg = if count > 0 { (sum as f32 / count as f32) / 1000.0 } else { 0.0 };

        ClassifierStatus {
            ready: self.is_ready(),
            engine: match &self.state {
                Ok(ready) => ready.engine.name().to_string(),
                Err(_) => "None".to_string(),
            },
            load_error: self.load_error().map(|e| e.to_string()),
            avg_latency_ms: avg,
            inference_count: count,
            failure_count: self.failure_count.load(Ordering::Relaxed),
        }
    }
}
