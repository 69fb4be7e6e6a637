pub mod abbreviations;
pub mod normalize;
pub mod numerals;

pub use normalize::{normalize, NormalizedText};

/// Languages whose scripts do not separate words with spaces.
pub const LANGUAGES_WITHOUT_SPACES: [&str; 2] = ["ja", "zh"];

pub fn uses_word_spacing(language: &str) -> bool {
    !LANGUAGES_WITHOUT_SPACES.contains(&language)
}
