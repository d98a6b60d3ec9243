//! Scam Detector Core
//!
//! Classifies notification text with a bundled model and raises a local,
//! debounced alert when the model and heuristics agree.

pub mod constants;
pub mod logic;

pub use logic::alert::{AlertConfig, AlertDecider, DebounceCache, Decision, KeyMode};
pub use logic::classifier::{AssetPaths, ClassificationResult, Classifier, LoadError};
pub use logic::config::{ConfigError, ServiceConfig};
pub use logic::events::{AccessibilityEvent, EventFilter, EventSource, JsonLinesSource, TextCandidate};
pub use logic::model::{InferenceEngine, Label, OnnxEngine};
pub use logic::notifier::{Alert, FileNotifier, LogNotifier, Notifier};
pub use logic::service::{DetectionService, Lifecycle, ServiceError, ServiceStats};
