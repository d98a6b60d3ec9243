//! Tokenizer - cleaned text → fixed-length id sequence

use std::sync::Arc;

use ndarray::Array2;

use super::cleaner::clean;
use super::vocabulary::Vocabulary;
use crate::constants::MAX_SEQUENCE_LENGTH;

/// Exactly `MAX_SEQUENCE_LENGTH` ids, right-padded with 0
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenSequence([u32; MAX_SEQUENCE_LENGTH]);

impl TokenSequence {
    pub fn ids(&self) -> &[u32] {
        &self.0
    }

    /// Number of non-padding entries
    pub fn filled(&self) -> usize {
        self.0.iter().take_while(|&&id| id != 0).count()
    }

    /// `[1 x MAX_SEQUENCE_LENGTH]` model batch
    pub fn to_batch(&self) -> Array2<f32> {
        Array2::from_shape_fn((1, MAX_SEQUENCE_LENGTH), |(_, i)| self.0[i] as f32)
    }
}

#[derive(Debug, Clone)]
pub struct Tokenizer {
    vocab: Arc<Vocabulary>,
}

impl Tokenizer {
    pub fn new(vocab: Arc<Vocabulary>) -> Self {
        Self { vocab }
    }

    /// Map already-cleaned text to ids. Never fails.
    pub fn tokenize(&self, cleaned: &str) -> TokenSequence {
        let mut ids = [0u32; MAX_SEQUENCE_LENGTH];
        let words = cleaned.split(' ').filter(|w| !w.is_empty());
        for (slot, word) in ids.iter_mut().zip(words) {
            *slot = self.vocab.id_of(word);
        }
        TokenSequence(ids)
    }

    /// Clean + tokenize + pad
    pub fn encode(&self, text: &str) -> TokenSequence {
        self.tokenize(&clean(text))
    }

    pub fn vocabulary(&self) -> &Vocabulary {
        &self.vocab
    }
}
