//! Text analysis: cleaning, tokenization, stopword removal and stemming.
//!
//! ```text
//! raw text → char filters → tokenizer → token filters → root tokens
//! ```

pub mod analyzer;
pub mod char_filter;
pub mod token;
pub mod token_filter;
pub mod tokenizer;
