//! Text Module - cleaning, vocabulary, tokenization
//!
//! ## Structure
//! - `cleaner`: raw text → normalized lowercase words
//! - `vocabulary`: word → id table with OOV fallback
//! - `tokenizer`: normalized text → fixed-length `TokenSequence`

pub mod cleaner;
pub mod vocabulary;
pub mod tokenizer;

pub use cleaner::clean;
pub use vocabulary::{Vocabulary, VocabError};
pub use tokenizer::{Tokenizer, TokenSequence};
