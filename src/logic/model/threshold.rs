//! Threshold Configuration
//!
//! Two separate cutoffs live here and must not be mixed up:
//! - `Label::from_confidence` uses the fixed `LABEL_CUTOFF` (0.5)
//! - `ThresholdConfig::alert_threshold` decides escalation to an alert

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::constants::{DEFAULT_ALERT_THRESHOLD, LABEL_CUTOFF};

/// Classifier label
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Label {
    Scam,
    NotScam,
    /// Sentinel for load/inference failures
    Error,
}

impl Label {
    /// Deterministic label for a valid confidence
    pub fn from_confidence(confidence: f32) -> Self {
        if confidence > LABEL_CUTOFF {
            Label::Scam
        } else {
            Label::NotScam
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Label::Scam => "Scam",
            Label::NotScam => "Not Scam",
            Label::Error => "Error",
        }
    }
}

impl fmt::Display for Label {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Alert threshold configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ThresholdConfig {
    /// Minimum confidence (0.0 - 1.0) before a Scam label becomes an alert
    pub alert_threshold: f32,

    /// Also require a keyword / OTP hit
    pub require_heuristic_match: bool,
}

impl Default for ThresholdConfig {
    fn default() -> Self {
        Self {
            alert_threshold: DEFAULT_ALERT_THRESHOLD,
            require_heuristic_match: false,
        }
    }
}

impl ThresholdConfig {
    pub fn new(alert_threshold: f32) -> Self {
        Self {
            alert_threshold,
            ..Default::default()
        }
    }

    /// Fewer alerts: 0.9 and a heuristic hit required
    pub fn strict() -> Self {
        Self {
            alert_threshold: 0.9,
            require_heuristic_match: true,
        }
    }

    pub fn is_valid(&self) -> bool {
        (LABEL_CUTOFF..=1.0).contains(&self.alert_threshold)
    }

    /// Confidence meets the alert threshold
    pub fn exceeds(&self, confidence: f32) -> bool {
        confidence >= self.alert_threshold
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_label_cutoff() {
        assert_eq!(Label::from_confidence(0.95), Label::Scam);
        assert_eq!(Label::from_confidence(0.51), Label::Scam);
        assert_eq!(Label::from_confidence(0.5), Label::NotScam);
        assert_eq!(Label::from_confidence(0.3), Label::NotScam);
    }

    #[test]
    fn test_label_display() {
        assert_eq!(Label::Scam.to_string(), "Scam");
        assert_eq!(Label::NotScam.to_string(), "Not Scam");
        assert_eq!(Label::Error.to_string(), "Error");
    }

    #[test]
    fn test_thresholds_are_distinct() {
        // 0.6 is a Scam label but below the alert threshold
        let config = ThresholdConfig::default();
        assert_eq!(Label::from_confidence(0.6), Label::Scam);
        assert!(!config.exceeds(0.6));
        assert!(config.exceeds(0.8));
    }

    #[test]
    fn test_threshold_validation() {
        assert!(ThresholdConfig::default().is_valid());
        assert!(ThresholdConfig::strict().is_valid());
        assert!(!ThresholdConfig::new(0.2).is_valid());
        assert!(!ThresholdConfig::new(1.5).is_valid());
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let config: ThresholdConfig = serde_json::from_str(r#"{"alert_threshold":0.9}"#).unwrap();
        assert_eq!(config.alert_threshold, 0.9);
        assert!(!config.require_heuristic_match);
    }
}
