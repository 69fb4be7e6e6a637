pub mod interpolation;
pub mod merge;
pub mod speech;
pub mod time_mapping;
pub mod tokenization;
pub mod viterbi;
