//! Alert Decision
//!
//! Classification result + heuristics + debounce → fire / suppress / ignore.

use std::time::{Duration, Instant};

use serde::{Deserialize, Serialize};

use super::debounce::{AlertKey, DebounceCache, DebounceOutcome, KeyMode};
use super::heuristics;
use crate::constants::{DEFAULT_DEBOUNCE_CAPACITY, DEFAULT_DEBOUNCE_SECS, DEFAULT_KEY_PREFIX_CHARS};
use crate::logic::classifier::ClassificationResult;
use crate::logic::events::TextCandidate;
use crate::logic::model::{Label, ThresholdConfig};
use crate::logic::notifier::Alert;

/// Decision + debounce settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AlertConfig {
    pub thresholds: ThresholdConfig,
    pub key_mode: KeyMode,
    pub key_prefix_chars: usize,
    pub debounce_secs: u64,
    pub debounce_capacity: usize,
}

impl Default for AlertConfig {
    fn default() -> Self {
        Self {
            thresholds: ThresholdConfig::default(),
            key_mode: KeyMode::default(),
            key_prefix_chars: DEFAULT_KEY_PREFIX_CHARS,
            debounce_secs: DEFAULT_DEBOUNCE_SECS,
            debounce_capacity: DEFAULT_DEBOUNCE_CAPACITY,
        }
    }
}

impl AlertConfig {
    pub fn debounce_window(&self) -> Duration {
        Duration::from_secs(self.debounce_secs)
    }

    /// Fresh cache sized from this config
    pub fn build_cache(&self) -> DebounceCache {
        DebounceCache::new(self.debounce_capacity, self.debounce_window())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum IgnoreReason {
    ClassifierError,
    NotScam,
    BelowThreshold,
    NoHeuristicMatch,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Decision {
    Ignore(IgnoreReason),
    /// Same key alerted `elapsed` ago
    Suppressed { key: AlertKey, elapsed: Duration },
    Fire(Alert),
}

#[derive(Debug, Clone)]
pub struct AlertDecider {
    config: AlertConfig,
}

impl AlertDecider {
    pub fn new(config: AlertConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &AlertConfig {
        &self.config
    }

    pub fn decide(
        &self,
        candidate: &TextCandidate,
        result: &ClassificationResult,
        cache: &DebounceCache,
        now: Instant,
    ) -> Decision {
        match result.label {
            Label::Error => return Decision::Ignore(IgnoreReason::ClassifierError),
            Label::NotScam => return Decision::Ignore(IgnoreReason::NotScam),
            Label::Scam => {}
        }

        let thresholds = &self.config.thresholds;
        if !thresholds.exceeds(result.confidence) {
            return Decision::Ignore(IgnoreReason::BelowThreshold);
        }

        let hits = heuristics::scan(&candidate.text);
        if thresholds.require_heuristic_match && !hits.is_hit() {
            return Decision::Ignore(IgnoreReason::NoHeuristicMatch);
        }

        let key = AlertKey::derive(
            self.config.key_mode,
            &candidate.package,
            &candidate.text,
            self.config.key_prefix_chars,
        );

        match cache.check_and_record(key, now) {
            DebounceOutcome::Suppressed { elapsed } => Decision::Suppressed { key, elapsed },
            DebounceOutcome::Fresh => {
                Decision::Fire(Alert::new(candidate, result.confidence, hits.signals(), key))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn candidate(package: &str, text: &str) -> TextCandidate {
        TextCandidate {
            package: package.to_string(),
            text: text.to_string(),
            display_text: text.to_string(),
        }
    }

    fn scam(confidence: f32) -> ClassificationResult {
        ClassificationResult { label: Label::from_confidence(confidence), confidence }
    }

    #[test]
    fn test_fires_with_signals() {
        let decider = AlertDecider::new(AlertConfig::default());
        let cache = decider.config().build_cache();

        match decider.decide(&candidate("com.sms", "The Bank Urgent"), &scam(0.95), &cache, Instant::now()) {
            Decision::Fire(alert) => {
                assert!(alert.signals.contains(&"bank".to_string()));
                assert!(alert.signals.contains(&"urgent".to_string()));
                assert_eq!(alert.confidence, 0.95);
            }
            other => panic!("expected Fire, got {:?}", other),
        }
    }

    #[test]
    fn test_ignore_reasons() {
        let decider = AlertDecider::new(AlertConfig::default());
        let cache = decider.config().build_cache();
        let c = candidate("com.sms", "The Bank Urgent");
        let now = Instant::now();

        assert_eq!(
            decider.decide(&c, &ClassificationResult::error(), &cache, now),
            Decision::Ignore(IgnoreReason::ClassifierError)
        );
        assert_eq!(decider.decide(&c, &scam(0.3), &cache, now), Decision::Ignore(IgnoreReason::NotScam));
        // Scam label, but under the 0.8 alert threshold
        assert_eq!(decider.decide(&c, &scam(0.7), &cache, now), Decision::Ignore(IgnoreReason::BelowThreshold));
        assert!(cache.is_empty());
    }

    #[test]
    fn test_threshold_is_inclusive() {
        let decider = AlertDecider::new(AlertConfig::default());
        let cache = decider.config().build_cache();
        let decision = decider.decide(&candidate("a", "b"), &scam(0.8), &cache, Instant::now());
        assert!(matches!(decision, Decision::Fire(_)));
    }

    #[test]
    fn test_heuristic_requirement() {
        let config = AlertConfig {
            thresholds: ThresholdConfig::strict(),
            ..Default::default()
        };
        let decider = AlertDecider::new(config);
        let cache = decider.config().build_cache();
        let now = Instant::now();

        assert_eq!(
            decider.decide(&candidate("com.chat", "see you at lunch"), &scam(0.95), &cache, now),
            Decision::Ignore(IgnoreReason::NoHeuristicMatch)
        );
        assert!(matches!(
            decider.decide(&candidate("com.chat", "Your code is 4821"), &scam(0.95), &cache, now),
            Decision::Fire(_)
        ));
    }

    #[test]
    fn test_debounce_sequence() {
        let decider = AlertDecider::new(AlertConfig::default());
        let cache = decider.config().build_cache();
        let c = candidate("com.sms", "The Bank Urgent");
        let t0 = Instant::now();

        assert!(matches!(decider.decide(&c, &scam(0.95), &cache, t0), Decision::Fire(_)));
        assert!(matches!(
            decider.decide(&c, &scam(0.95), &cache, t0 + Duration::from_secs(5)),
            Decision::Suppressed { .. }
        ));
        assert!(matches!(
            decider.decide(&c, &scam(0.95), &cache, t0 + Duration::from_secs(DEFAULT_DEBOUNCE_SECS + 1)),
            Decision::Fire(_)
        ));
    }

    #[test]
    fn test_package_scoped_keys() {
        let decider = AlertDecider::new(AlertConfig::default());
        let cache = decider.config().build_cache();
        let now = Instant::now();

        assert!(matches!(decider.decide(&candidate("com.a", "Bank urgent"), &scam(0.9), &cache, now), Decision::Fire(_)));
        assert!(matches!(decider.decide(&candidate("com.b", "Bank urgent"), &scam(0.9), &cache, now), Decision::Fire(_)));

        let text_only = AlertDecider::new(AlertConfig { key_mode: KeyMode::TextOnly, ..Default::default() });
        let cache = text_only.config().build_cache();
        assert!(matches!(text_only.decide(&candidate("com.a", "Bank urgent"), &scam(0.9), &cache, now), Decision::Fire(_)));
        assert!(matches!(
            text_only.decide(&candidate("com.b", "Bank urgent"), &scam(0.9), &cache, now),
            Decision::Suppressed { .. }
        ));
    }
}
