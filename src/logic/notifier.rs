//! Notifier - output side of the pipeline
//!
//! One alert identity (`NOTIFICATION_ID`): each post replaces the previous
//! alert. Failures are reported to the caller, which only logs them.

use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::constants::{NOTIFICATION_ID, NOTIFICATION_TITLE};
use crate::logic::alert::AlertKey;
use crate::logic::events::TextCandidate;

#[derive(Debug, Error)]
pub enum NotifyError {
    #[error("notification I/O failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to serialize alert: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("notifier unavailable: {0}")]
    Unavailable(String),
}

/// Alert posted to the user
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Alert {
    pub id: u32,
    pub title: String,
    pub body: String,
    pub package: String,
    pub confidence: f32,
    pub signals: Vec<String>,
    /// Hex debounce key
    pub key: String,
    pub raised_at: DateTime<Utc>,
}

impl Alert {
    pub fn new(candidate: &TextCandidate, confidence: f32, signals: Vec<String>, key: AlertKey) -> Self {
        Self {
            id: NOTIFICATION_ID,
            title: NOTIFICATION_TITLE.to_string(),
            body: format!(
                "Scam detected in a notification from {}:\n\"{}\"",
                candidate.package, candidate.display_text
            ),
            package: candidate.package.clone(),
            confidence,
            signals,
            key: key.to_string(),
            raised_at: Utc::now(),
        }
    }
}

pub trait Notifier: Send + Sync {
    fn post(&self, alert: &Alert) -> Result<(), NotifyError>;
}

// ============================================================================
// LOG NOTIFIER
// ============================================================================

/// Writes alerts to the log only
#[derive(Debug, Default)]
pub struct LogNotifier;

impl Notifier for LogNotifier {
    fn post(&self, alert: &Alert) -> Result<(), NotifyError> {
        log::warn!(
            "[SCAM ALERT #{}] {} (confidence {:.2}, signals: {:?})\n{}",
            alert.id,
            alert.title,
            alert.confidence,
            alert.signals,
            alert.body
        );
        Ok(())
    }
}

// ============================================================================
// FILE NOTIFIER
// ============================================================================

/// Current alert at a fixed path (replaced on each post) + JSONL history
pub struct FileNotifier {
    current: PathBuf,
    history: PathBuf,
    tmp: PathBuf,
    write_lock: Mutex<()>,
}

impl FileNotifier {
    pub fn new(current: PathBuf) -> Result<Self, NotifyError> {
        if let Some(parent) = current.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        let name = current
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .ok_or_else(|| NotifyError::Unavailable(format!("{:?} is not a file path", current)))?;
        let stem = current
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| name.clone());

        // Siblings are derived by suffix so they never collide with `current`
        let history = current.with_file_name(format!("{}.history.jsonl", stem));
        let tmp = current.with_file_name(format!("{}.tmp", name));
        if history == current || tmp == current {
            return Err(NotifyError::Unavailable(format!(
                "alert file {:?} collides with its history or temp file",
                current
            )));
        }

        Ok(Self {
            current,
            history,
            tmp,
            write_lock: Mutex::new(()),
        })
    }

    pub fn current_path(&self) -> &Path {
        &self.current
    }

    pub fn history_path(&self) -> &Path {
        &self.history
    }
}

impl Notifier for FileNotifier {
    fn post(&self, alert: &Alert) -> Result<(), NotifyError> {
        let _guard = self.write_lock.lock();

        fs::write(&self.tmp, serde_json::to_vec_pretty(alert)?)?;
        fs::rename(&self.tmp, &self.current)?;

        let mut history = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.history)?;
        writeln!(history, "{}", serde_json::to_string(alert)?)?;

        log::info!("Alert written to {:?}", self.current);
        Ok(())
    }
}
