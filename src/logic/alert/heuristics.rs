//! Keyword / OTP heuristics
//!
//! Runs on the raw text so digits (OTP codes) are still present.

use once_cell::sync::Lazy;
use regex::Regex;

static KEYWORD_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?i)\b(urgent|bank|verify|account|suspended|password|otp|prize|winner|lottery|refund|kyc|click|login|expired?|blocked|reward|claim|gift|payment)\b",
    )
    .expect("valid keyword regex")
});

/// Standalone 4-8 digit code
static OTP_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\b\d{4,8}\b").expect("valid OTP regex"));

pub const OTP_SIGNAL: &str = "otp_code";

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HeuristicMatch {
    /// Lowercased keywords, first-seen order, no duplicates
    pub keywords: Vec<String>,
    pub otp_code: bool,
}

impl HeuristicMatch {
    pub fn is_hit(&self) -> bool {
        !self.keywords.is_empty() || self.otp_code
    }

    /// Keywords plus `otp_code` when a code was seen
    pub fn signals(&self) -> Vec<String> {
        let mut signals = self.keywords.clone();
        if self.otp_code {
            signals.push(OTP_SIGNAL.to_string());
        }
        signals
    }
}

pub fn scan(text: &str) -> HeuristicMatch {
    let mut keywords: Vec<String> = Vec::new();
    for m in KEYWORD_RE.find_iter(text) {
        let word = m.as_str().to_lowercase();
        if !keywords.contains(&word) {
            keywords.push(word);
        }
    }

    HeuristicMatch {
        keywords,
        otp_code: OTP_RE.is_match(text),
    }
}
