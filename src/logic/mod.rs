//! Logic Module - detection pipeline
//!
//! Event Source → queue → worker → Classifier → Alert Decision → Notifier
//!
//! - `text/` - cleaning, vocabulary, tokenization
//! - `model/` - inference engine, thresholds
//! - `alert/` - heuristics, debounce, decision

pub mod text;
pub mod model;
pub mod classifier;
pub mod events;
pub mod alert;
pub mod notifier;
pub mod config;
pub mod service;

#[cfg(test)]
pub(crate) mod testing;
