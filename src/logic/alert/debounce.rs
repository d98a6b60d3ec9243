//! Debounce Cache
//!
//! Bounded LRU map from hashed alert key → last alert instant.
//! A suppressed repeat keeps the original timestamp, so the window is
//! measured from the alert that was actually posted.

use std::fmt;
use std::num::NonZeroUsize;
use std::time::{Duration, Instant};

use lru::LruCache;
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

/// What goes into the debounce key
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum KeyMode {
    /// Text prefix only: same text from any app is one alert
    TextOnly,
    /// Package + text prefix: scoped per source app
    #[default]
    PackageAndText,
}

/// SHA-256 of the key material
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct AlertKey([u8; 32]);

impl AlertKey {
    pub fn derive(mode: KeyMode, package: &str, text: &str, prefix_chars: usize) -> Self {
        let prefix: String = text.trim().chars().take(prefix_chars).collect();

        let mut hasher = Sha256::new();
        if mode == KeyMode::PackageAndText {
            hasher.update(package.as_bytes());
            hasher.update([0x1f]);
        }
        hasher.update(prefix.as_bytes());

        let mut bytes = [0u8; 32];
        bytes.copy_from_slice(&hasher.finalize());
        Self(bytes)
    }
}

impl fmt::Display for AlertKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&hex::encode(self.0))
    }
}

impl fmt::Debug for AlertKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "AlertKey({})", &hex::encode(self.0)[..12])
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DebounceOutcome {
    /// No record, or the record is older than the window. Recorded now.
    Fresh,
    /// Alerted `elapsed` ago, inside the window
    Suppressed { elapsed: Duration },
}

pub struct DebounceCache {
    entries: Mutex<LruCache<AlertKey, Instant>>,
    window: Duration,
}

impl DebounceCache {
    pub fn new(capacity: usize, window: Duration) -> Self {
        let capacity = NonZeroUsize::new(capacity).unwrap_or(NonZeroUsize::MIN);
        Self {
            entries: Mutex::new(LruCache::new(capacity)),
            window,
        }
    }

    /// Check the key at `now`; record it unless suppressed
    pub fn check_and_record(&self, key: AlertKey, now: Instant) -> DebounceOutcome {
        let mut entries = self.entries.lock();

        if let Some(last) = entries.get(&key) {
            let elapsed = now.saturating_duration_since(*last);
            if elapsed < self.window {
                return DebounceOutcome::Suppressed { elapsed };
            }
        }

        if let Some((evicted, _)) = entries.push(key, now) {
            if evicted != key {
                log::debug!("Debounce cache full, evicted {:?}", evicted);
            }
        }
        DebounceOutcome::Fresh
    }

    pub fn window(&self) -> Duration {
        self.window
    }

    pub fn capacity(&self) -> usize {
        self.entries.lock().cap().get()
    }

    pub fn len(&self) -> usize {
        self.entries.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn clear(&self) {
        self.entries.lock().clear();
    }
}
