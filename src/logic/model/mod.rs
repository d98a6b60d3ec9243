//! Model Module - AI/ML Inference Engine
//!
//! Separates inference from text preparation.
//! The engine is a trait so the runtime can be swapped or stubbed.

pub mod inference;
pub mod threshold;

// Re-export common types
pub use inference::{InferenceEngine, InferenceError, ModelMetadata, OnnxEngine};
pub use threshold::{Label, ThresholdConfig};
