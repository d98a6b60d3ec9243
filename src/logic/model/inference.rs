//! Inference Engine - ONNX Runtime Integration
//!
//! Wraps the bundled pre-trained classifier.
//! Contract: `[1 x MAX_SEQUENCE_LENGTH]` f32 batch in, one scalar out.

use std::path::Path;

use ndarray::Array2;
use ort::session::{Session, builder::GraphOptimizationLevel};
use ort::value::Value;
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::constants::MAX_SEQUENCE_LENGTH;

// ============================================================================
// ERROR HANDLING
// ============================================================================

#[derive(Debug, Error)]
pub enum InferenceError {
    #[error("model not found: {0}")]
    ModelNotFound(String),

    #[error("failed to build session: {0}")]
    Session(String),

    #[error("unexpected input shape {0:?}, expected [1, 100]")]
    Shape(Vec<usize>),

    #[error("tensor error: {0}")]
    Tensor(String),

    #[error("inference failed: {0}")]
    Run(String),

    #[error("model produced no output")]
    NoOutput,
}

// ============================================================================
// INFERENCE ENGINE TRAIT
// ============================================================================

/// Seam between the classifier and the model runtime
pub trait InferenceEngine: Send + Sync {
    /// Raw model output for one padded sequence. Range is not checked here.
    fn infer(&self, batch: Array2<f32>) -> Result<f32, InferenceError>;

    /// Short name for status reporting
    fn name(&self) -> &str;
}

/// Model metadata
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelMetadata {
    pub model_path: String,
    pub sequence_length: usize,
    pub loaded_at: chrono::DateTime<chrono::Utc>,
}

// ============================================================================
// ONNX IMPLEMENTATION
// ============================================================================

pub struct OnnxEngine {
    session: Mutex<Session>,
    metadata: ModelMetadata,
}

impl OnnxEngine {
    /// Load ONNX model from file
    pub fn load(model_path: &Path) -> Result<Self, InferenceError> {
        log::info!("Loading ONNX model from: {}", model_path.display());

        if !model_path.exists() {
            return Err(InferenceError::ModelNotFound(model_path.display().to_string()));
        }

        let session = Session::builder()
            .map_err(|e| InferenceError::Session(format!("session builder: {}", e)))?
            .with_optimization_level(GraphOptimizationLevel::Level3)
            .map_err(|e| InferenceError::Session(format!("optimization: {}", e)))?
            .commit_from_file(model_path)
            .map_err(|e| InferenceError::Session(format!("load: {}", e)))?;

        log::info!("ONNX model loaded successfully");
        Ok(Self::with_session(session, model_path.display().to_string()))
    }

    /// Load ONNX model from bytes
    pub fn from_bytes(model_bytes: &[u8]) -> Result<Self, InferenceError> {
        log::info!("Loading ONNX model from memory ({} bytes)", model_bytes.len());

        let session = Session::builder()
            .map_err(|e| InferenceError::Session(format!("session builder: {}", e)))?
            .with_optimization_level(GraphOptimizationLevel::Level3)
            .map_err(|e| InferenceError::Session(format!("optimization: {}", e)))?
            .commit_from_memory(model_bytes)
            .map_err(|e| InferenceError::Session(format!("load from memory: {}", e)))?;

        Ok(Self::with_session(session, "<memory>".to_string()))
    }

    fn with_session(session: Session, model_path: String) -> Self {
        Self {
            session: Mutex::new(session),
            metadata: ModelMetadata {
                model_path,
                sequence_length: MAX_SEQUENCE_LENGTH,
                loaded_at: chrono::Utc::now(),
            },
        }
    }

    pub fn metadata(&self) -> &ModelMetadata {
        &self.metadata
    }
}

impl InferenceEngine for OnnxEngine {
    fn infer(&self, batch: Array2<f32>) -> Result<f32, InferenceError> {
        if batch.shape() != [1, MAX_SEQUENCE_LENGTH] {
            return Err(InferenceError::Shape(batch.shape().to_vec()));
        }

        let mut session = self.session.lock();

        let output_name = session.outputs.first()
            .map(|o| o.name.clone())
            .ok_or(InferenceError::NoOutput)?;

        let input_tensor = Value::from_array(batch)
            .map_err(|e| InferenceError::Tensor(e.to_string()))?;

        let outputs = session.run(ort::inputs![input_tensor])
            .map_err(|e| InferenceError::Run(e.to_string()))?;

        let output = outputs.get(&output_name)
            .ok_or(InferenceError::NoOutput)?;

        let (_, data) = output.try_extract_tensor::<f32>()
            .map_err(|e| InferenceError::Tensor(e.to_string()))?;

        let confidence = data.first().copied();
        confidence.ok_or(InferenceError::NoOutput)
    }

    fn name(&self) -> &str {
        "onnx"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_model_file() {
        let dir = tempfile::tempdir().unwrap();
        let result = OnnxEngine::load(&dir.path().join("missing.onnx"));
        assert!(matches!(result, Err(InferenceError::ModelNotFound(_))));
    }

    #[test]
    fn test_shape_error_message() {
        let err = InferenceError::Shape(vec![2, 5]);
        assert_eq!(err.to_string(), "unexpected input shape [2, 5], expected [1, 100]");
    }
}
