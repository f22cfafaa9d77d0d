//! Char filters that clean raw text before tokenization.
//!
//! Char filters operate on the whole input string. Token offsets produced
//! afterwards refer to the filtered text, not to the raw input.
//!
//! # Available Filters
//!
//! - [`escape::EscapeCharFilter`] - Removes literal escape sequences (`\n`, `\t`, `\uXXXX`)
//! - [`pattern_replace::PatternReplaceCharFilter`] - Regex-based replacement
//!
//! # Examples
//!
//! ```
//! use akar::analysis::char_filter::CharFilter;
//! use akar::analysis::char_filter::pattern_replace::PatternReplaceCharFilter;
//!
//! let filter = PatternReplaceCharFilter::new(r"\d+", "").unwrap();
//! assert_eq!(filter.filter("tahun 2024 ini"), "tahun  ini");
//! ```

/// Trait for character filters that transform text before tokenization.
pub trait CharFilter: Send + Sync {
    /// Apply this filter to the input text and return the filtered text.
    fn filter(&self, input: &str) -> String;

    /// Get the name of this char filter.
    fn name(&self) -> &'static str;
}

pub mod escape;
pub mod pattern_replace;

pub use escape::EscapeCharFilter;
pub use pattern_replace::PatternReplaceCharFilter;
