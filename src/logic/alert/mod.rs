//! Alert Module - decision & debounce
//!
//! ## Structure
//! - `heuristics`: keyword / OTP signals on raw text
//! - `debounce`: bounded LRU of hashed (package, text prefix) keys
//! - `decision`: threshold + heuristics + debounce → `Decision`

pub mod heuristics;
pub mod debounce;
pub mod decision;

pub use heuristics::{scan, HeuristicMatch};
pub use debounce::{AlertKey, DebounceCache, DebounceOutcome, KeyMode};
pub use decision::{AlertConfig, AlertDecider, Decision, IgnoreReason};
