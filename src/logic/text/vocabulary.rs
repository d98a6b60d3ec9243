//! Vocabulary - word → id table
//!
//! Loaded once from the bundled JSON asset, read-only afterwards.

use std::collections::HashMap;
use std::path::Path;

use thiserror::Error;

use crate::constants::{DEFAULT_OOV_ID, OOV_TOKEN};

#[derive(Debug, Error)]
pub enum VocabError {
    #[error("vocabulary file not found: {0}")]
    NotFound(String),

    #[error("failed to read vocabulary: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid vocabulary JSON: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("vocabulary is empty")]
    Empty,
}

/// Immutable token table with a reserved OOV id
#[derive(Debug, Clone)]
pub struct Vocabulary {
    ids: HashMap<String, u32>,
    oov_id: u32,
}

impl Vocabulary {
    /// Build from an in-memory map. An empty map is rejected.
    pub fn from_map(ids: HashMap<String, u32>) -> Result<Self, VocabError> {
        if ids.is_empty() {
            return Err(VocabError::Empty);
        }
        let oov_id = ids.get(OOV_TOKEN).copied().unwrap_or(DEFAULT_OOV_ID);
        Ok(Self { ids, oov_id })
    }

    /// Parse `{"token": id, ...}`
    pub fn from_json_str(json: &str) -> Result<Self, VocabError> {
        let ids: HashMap<String, u32> = serde_json::from_str(json)?;
        Self::from_map(ids)
    }

    /// Load the vocabulary asset from disk
    pub fn load(path: &Path) -> Result<Self, VocabError> {
        if !path.exists() {
            return Err(VocabError::NotFound(path.display().to_string()));
        }
        let json = std::fs::read_to_string(path)?;
        let vocab = Self::from_json_str(&json)?;
        log::debug!("Vocabulary loaded with {} words", vocab.len());
        Ok(vocab)
    }

    /// Id for a cleaned word, OOV id when unknown
    pub fn id_of(&self, word: &str) -> u32 {
        self.ids.get(word).copied().unwrap_or(self.oov_id)
    }

    pub fn oov_id(&self) -> u32 {
        self.oov_id
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_known_and_unknown_words() {
        let vocab = Vocabulary::from_json_str(r#"{"the":2,"bank":3,"<OOV>":1}"#).unwrap();
        assert_eq!(vocab.id_of("the"), 2);
        assert_eq!(vocab.id_of("bank"), 3);
        assert_eq!(vocab.id_of("urgent"), 1);
        assert_eq!(vocab.len(), 3);
    }

    #[test]
    fn test_oov_defaults_to_one() {
        let vocab = Vocabulary::from_json_str(r#"{"hello":7}"#).unwrap();
        assert_eq!(vocab.oov_id(), DEFAULT_OOV_ID);
        assert_eq!(vocab.id_of("missing"), DEFAULT_OOV_ID);
    }

    #[test]
    fn test_custom_oov_id() {
        let vocab = Vocabulary::from_json_str(r#"{"<OOV>":42,"a":5}"#).unwrap();
        assert_eq!(vocab.id_of("zzz"), 42);
    }

    #[test]
    fn test_empty_vocab_rejected() {
        assert!(matches!(Vocabulary::from_json_str("{}"), Err(VocabError::Empty)));
    }

    #[test]
    fn test_invalid_json_rejected() {
        assert!(matches!(
            Vocabulary::from_json_str(r#"{"a": "not a number"}"#),
            Err(VocabError::Parse(_))
        ));
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"scam":9,"<OOV>":1}}"#).unwrap();

        let vocab = Vocabulary::load(file.path()).unwrap();
        assert_eq!(vocab.id_of("scam"), 9);
    }

    #[test]
    fn test_load_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let result = Vocabulary::load(&dir.path().join("nope.json"));
        assert!(matches!(result, Err(VocabError::NotFound(_))));
    }
}
