//! Central Configuration Constants
//!
//! Single source of truth for all configuration defaults.
//! Every value here can be overridden through `ServiceConfig` (JSON file)
//! or through the `SCAM_DETECTOR_*` environment variables below.

use std::path::PathBuf;

/// App version
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

/// App name
pub const APP_NAME: &str = "Scam Detector";

/// Package name the detector posts its own alerts under.
/// Events from this package are never classified.
pub const APP_PACKAGE: &str = "com.example.scamdetector";

// ============================================
// Assets
// ============================================

/// Bundled model artifact
pub const MODEL_FILE: &str = "scam_detector.onnx";

/// Bundled vocabulary (`{token: id}`)
pub const VOCAB_FILE: &str = "tokenizer_vocab.json";

/// Reserved out-of-vocabulary token
pub const OOV_TOKEN: &str = "<OOV>";

/// OOV id used when the vocabulary does not define `<OOV>`
pub const DEFAULT_OOV_ID: u32 = 1;

/// Fixed model input length
pub const MAX_SEQUENCE_LENGTH: usize = 100;

// ============================================
// Decision defaults
// ============================================

/// Raw label cutoff inside the classifier. Not configurable.
pub const LABEL_CUTOFF: f32 = 0.5;

/// Default alert threshold applied by the decision step
pub const DEFAULT_ALERT_THRESHOLD: f32 = 0.8;

/// Default debounce window (seconds)
pub const DEFAULT_DEBOUNCE_SECS: u64 = 60;

/// Default number of debounce keys remembered
pub const DEFAULT_DEBOUNCE_CAPACITY: usize = 1024;

/// Number of leading characters of the text mixed into the debounce key
pub const DEFAULT_KEY_PREFIX_CHARS: usize = 50;

// ============================================
// Worker defaults
// ============================================

/// Default pending event capacity
pub const DEFAULT_QUEUE_CAPACITY: usize = 64;

/// Default inference timeout (milliseconds)
pub const DEFAULT_INFERENCE_TIMEOUT_MS: u64 = 2_000;

/// Fixed identity of the posted alert
pub const NOTIFICATION_ID: u32 = 1;

/// Title of the posted alert
pub const NOTIFICATION_TITLE: &str = "Potential Scam Detected!";

// ============================================
// Helper functions to read from env with fallback
// ============================================

/// Path of the JSON config file, if any
pub fn get_config_path() -> Option<PathBuf> {
    std::env::var("SCAM_DETECTOR_CONFIG").ok().map(PathBuf::from)
}

/// Default assets directory: `$SCAM_DETECTOR_ASSETS` or `<data dir>/scam-detector/assets`
pub fn get_assets_dir() -> PathBuf {
    std::env::var("SCAM_DETECTOR_ASSETS")
        .map(PathBuf::from)
        .unwrap_or_else(|_| {
            dirs::data_local_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join("scam-detector")
                .join("assets")
        })
}

/// Get alert threshold from environment
pub fn get_alert_threshold() -> Option<f32> {
    std::env::var("SCAM_DETECTOR_THRESHOLD")
        .ok()
        .and_then(|s| s.parse().ok())
}

/// Get debounce window (seconds) from environment
pub fn get_debounce_secs() -> Option<u64> {
    std::env::var("SCAM_DETECTOR_DEBOUNCE_SECS")
        .ok()
        .and_then(|s| s.parse().ok())
}

/// Get inference timeout (milliseconds) from environment
pub fn get_inference_timeout_ms() -> Option<u64> {
    std::env::var("SCAM_DETECTOR_INFERENCE_TIMEOUT_MS")
        .ok()
        .and_then(|s| s.parse().ok())
}

/// Get alert file path from environment
pub fn get_alert_file() -> Option<PathBuf> {
    std::env::var("SCAM_DETECTOR_ALERT_FILE").ok().map(PathBuf::from)
}

/// Check if window content monitoring is enabled
pub fn is_window_content_enabled() -> Option<bool> {
    std::env::var("SCAM_DETECTOR_WINDOW_CONTENT")
        .ok()
        .map(|s| s.to_lowercase() == "true" || s == "1")
}
