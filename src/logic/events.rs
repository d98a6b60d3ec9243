//! Accessibility Events - input side of the pipeline
//!
//! Platform glue (an Android accessibility service, a desktop notification
//! listener, a replay file) turns whatever it receives into
//! `AccessibilityEvent` and hands it over through an `EventSource` or
//! `DetectionService::submit`.

use std::collections::VecDeque;
use std::io::BufRead;

use serde::{Deserialize, Serialize};

use crate::constants::APP_PACKAGE;

// ============================================================================
// EVENT MODEL
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum AccessibilityEvent {
    /// A notification was posted by `package`
    NotificationPosted {
        package: String,
        #[serde(default)]
        title: Option<String>,
        #[serde(default)]
        text: Option<String>,
        /// Expanded text (BigTextStyle)
        #[serde(default)]
        big_text: Option<String>,
    },

    /// Visible window text changed
    WindowContentChanged {
        package: String,
        #[serde(default)]
        texts: Vec<String>,
    },

    /// Anything else the platform forwards
    #[serde(other)]
    Unknown,
}

impl AccessibilityEvent {
    pub fn notification(package: &str, title: &str, text: &str) -> Self {
        Self::NotificationPosted {
            package: package.to_string(),
            title: Some(title.to_string()),
            text: Some(text.to_string()),
            big_text: None,
        }
    }

    pub fn package(&self) -> Option<&str> {
        match self {
            Self::NotificationPosted { package, .. } | Self::WindowContentChanged { package, .. } => {
                Some(package.as_str())
            }
            Self::Unknown => None,
        }
    }

    /// Extract the text to classify, if this event carries any
    pub fn candidate(&self, filter: &EventFilter) -> Option<TextCandidate> {
        let package = self.package()?;
        if filter.is_ignored(package) {
            return None;
        }

        match self {
            Self::NotificationPosted { title, text, big_text, .. } => {
                let title = title.as_deref().unwrap_or("");
                let body = big_text
                    .as_deref()
                    .filter(|t| !t.trim().is_empty())
                    .or(text.as_deref())
                    .unwrap_or("");
                let full = format!("{}\n{}", title, body);
                if full.trim().is_empty() {
                    return None;
                }
                Some(TextCandidate {
                    package: package.to_string(),
                    text: full,
                    display_text: if body.trim().is_empty() { title.to_string() } else { body.to_string() },
                })
            }
            Self::WindowContentChanged { texts, .. } => {
                if !filter.monitor_window_content {
                    return None;
                }
                let joined = texts
                    .iter()
                    .map(|t| t.trim())
                    .filter(|t| !t.is_empty())
                    .collect::<Vec<_>>()
                    .join("\n");
                if joined.is_empty() {
                    return None;
                }
                Some(TextCandidate {
                    package: package.to_string(),
                    display_text: joined.clone(),
                    text: joined,
                })
            }
            Self::Unknown => None,
        }
    }
}

/// Text pulled out of an event, ready for classification
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TextCandidate {
    pub package: String,
    /// Full text fed to the classifier
    pub text: String,
    /// Text quoted in the alert
    pub display_text: String,
}

/// Which events are worth classifying
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EventFilter {
    pub monitor_window_content: bool,
    pub ignored_packages: Vec<String>,
}

impl Default for EventFilter {
    fn default() -> Self {
        Self {
            monitor_window_content: false,
            ignored_packages: vec![APP_PACKAGE.to_string()],
        }
    }
}

impl EventFilter {
    pub fn is_ignored(&self, package: &str) -> bool {
        self.ignored_packages.iter().any(|p| p == package)
    }
}

// ============================================================================
// EVENT SOURCES
// ============================================================================

/// Blocking pull-style event stream. `None` ends the stream.
pub trait EventSource: Send {
    fn next_event(&mut self) -> Option<AccessibilityEvent>;
}

/// One JSON event per line (stdin, replay files)
pub struct JsonLinesSource<R> {
    reader: R,
    line: String,
    line_no: usize,
}

impl<R: BufRead> JsonLinesSource<R> {
    pub fn new(reader: R) -> Self {
        Self {
            reader,
            line: String::new(),
            line_no: 0,
        }
    }
}

impl<R: BufRead + Send> EventSource for JsonLinesSource<R> {
    fn next_event(&mut self) -> Option<AccessibilityEvent> {
        loop {
            self.line.clear();
            match self.reader.read_line(&mut self.line) {
                Ok(0) => return None,
                Ok(_) => {
                    self.line_no += 1;
                    let trimmed = self.line.trim();
                    if trimmed.is_empty() {
                        continue;
                    }
                    match serde_json::from_str(trimmed) {
                        Ok(event) => return Some(event),
                        Err(e) => log::warn!("Skipping malformed event on line {}: {}", self.line_no, e),
                    }
                }
                Err(e) => {
                    log::error!("Event stream read failed: {}", e);
                    return None;
                }
            }
        }
    }
}

/// Replays a fixed list
#[derive(Debug, Default)]
pub struct VecSource(VecDeque<AccessibilityEvent>);

impl VecSource {
    pub fn new(events: Vec<AccessibilityEvent>) -> Self {
        Self(events.into())
    }
}

impl EventSource for VecSource {
    fn next_event(&mut self) -> Option<AccessibilityEvent> {
        self.0.pop_front()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_notification_candidate() {
        let event = AccessibilityEvent::notification("com.bank.fake", "Bank Alert", "Account suspended");
        let candidate = event.candidate(&EventFilter::default()).unwrap();

        assert_eq!(candidate.package, "com.bank.fake");
        assert_eq!(candidate.text, "Bank Alert\nAccount suspended");
        assert_eq!(candidate.display_text, "Account suspended");
    }

    #[test]
    fn test_big_text_preferred() {
        let event = AccessibilityEvent::NotificationPosted {
            package: "com.chat".to_string(),
            title: Some("Ana".to_string()),
            text: Some("Hey, click...".to_string()),
            big_text: Some("Hey, click this link to claim your prize".to_string()),
        };
        let candidate = event.candidate(&EventFilter::default()).unwrap();
        assert_eq!(candidate.text, "Ana\nHey, click this link to claim your prize");
    }

    #[test]
    fn test_blank_notification_skipped() {
        let event = AccessibilityEvent::notification("com.x", "  ", "");
        assert!(event.candidate(&EventFilter::default()).is_none());
    }

    #[test]
    fn test_own_package_ignored() {
        let event = AccessibilityEvent::notification(APP_PACKAGE, "Potential Scam Detected!", "...");
        assert!(event.candidate(&EventFilter::default()).is_none());
    }

    #[test]
    fn test_window_content_needs_opt_in() {
        let event = AccessibilityEvent::WindowContentChanged {
            package: "com.browser".to_string(),
            texts: vec!["Verify your account".to_string(), " ".to_string(), "now".to_string()],
        };
        assert!(event.candidate(&EventFilter::default()).is_none());

        let filter = EventFilter { monitor_window_content: true, ..Default::default() };
        let candidate = event.candidate(&filter).unwrap();
        assert_eq!(candidate.text, "Verify your account\nnow");
    }

    #[test]
    fn test_parse_json_events() {
        let json = r#"{"type":"notification_posted","package":"com.sms","title":"Bank","text":"Urgent"}"#;
        let event: AccessibilityEvent = serde_json::from_str(json).unwrap();
        assert_eq!(event, AccessibilityEvent::notification("com.sms", "Bank", "Urgent"));

        let other: AccessibilityEvent = serde_json::from_str(r#"{"type":"view_clicked"}"#).unwrap();
        assert_eq!(other, AccessibilityEvent::Unknown);
        assert!(other.candidate(&EventFilter::default()).is_none());
    }

    #[test]
    fn test_json_lines_source_skips_bad_lines() {
        let input = concat!(
            r#"{"type":"notification_posted","package":"a","text":"one"}"#, "\n",
            "not json\n",
            "\n",
            r#"{"type":"notification_posted","package":"b","text":"two"}"#, "\n",
        );
        let mut source = JsonLinesSource::new(input.as_bytes());

        assert_eq!(source.next_event().and_then(|e| e.package().map(String::from)), Some("a".to_string()));
        assert_eq!(source.next_event().and_then(|e| e.package().map(String::from)), Some("b".to_string()));
        assert!(source.next_event().is_none());
    }
}
