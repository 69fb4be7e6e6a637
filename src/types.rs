use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// Index of the CTC blank symbol unless the vocabulary names another one.
pub const DEFAULT_BLANK_ID: usize = 0;

#[derive(Debug, Clone)]
pub struct AlignmentRequest {
    pub text: String,
    pub samples: Vec<f32>,
    pub sample_rate_hz: u32,
    pub language_code: String,
    /// Keep one segment per character instead of merging into words.
    pub letter_wise: bool,
}

/// Symbol <-> index mapping of the acoustic model's output layer.
#[derive(Debug, Clone, PartialEq)]
pub struct LabelVocabulary {
    symbols: HashMap<char, usize>,
    num_labels: usize,
    blank_id: usize,
}

fn output_size(indices: impl Iterator<Item = usize>, blank_id: usize) -> usize {
    indices
        .chain(std::iter::once(blank_id))
        .max()
        .map_or(0, |max| max + 1)
}

impl LabelVocabulary {
    pub fn new(symbols: HashMap<char, usize>, blank_id: usize) -> Self {
        let num_labels = output_size(symbols.values().copied(), blank_id);
        let mut vocab = Self {
            symbols,
            num_labels,
            blank_id,
        };
        vocab.symbols.retain(|_, idx| *idx != blank_id);
        vocab
    }

    /// Builds a vocabulary from raw model labels.
    ///
    /// Labels are lower-cased, the `|` word delimiter becomes a plain space and
    /// multi-character specials (`<pad>`, `<s>`, ...) only count towards the
    /// output size. `<pad>` marks the blank when present, otherwise index 0 does.
    pub fn from_labels<I, S>(labels: I) -> Self
    where
        I: IntoIterator<Item = (S, usize)>,
        S: AsRef<str>,
    {
        let mut sorted: Vec<(String, usize)> = labels
            .into_iter()
            .map(|(label, idx)| (label.as_ref().to_lowercase(), idx))
            .collect();
        sorted.sort_by_key(|(_, idx)| *idx);

        let blank_id = sorted
            .iter()
            .find(|(label, _)| label == "<pad>")
            .map(|(_, idx)| *idx)
            .unwrap_or(DEFAULT_BLANK_ID);

        let num_labels = output_size(sorted.iter().map(|(_, idx)| *idx), blank_id);
        let mut symbols = HashMap::new();
        for (label, idx) in sorted {
            let label = if label == "|" { " ".to_string() } else { label };
            let mut chars = label.chars();
            if let (Some(c), None) = (chars.next(), chars.next()) {
                if idx != blank_id {
                    symbols.entry(c).or_insert(idx);
                }
            }
        }

        Self {
            symbols,
            num_labels,
            blank_id,
        }
    }

    pub fn index_of(&self, symbol: char) -> Option<usize> {
        self.symbols.get(&symbol).copied()
    }

    pub fn blank_id(&self) -> usize {
        self.blank_id
    }

    /// Index of the inter-word delimiter, if the model has one.
    pub fn word_boundary_id(&self) -> Option<usize> {
        self.index_of(' ')
    }

    /// Number of output columns the model is expected to emit.
    pub fn size(&self) -> usize {
        self.num_labels
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct TokenSequence {
    pub tokens: Vec<usize>,
    /// `positions[j]` is the original-text character index of `tokens[j]`.
    pub positions: Vec<usize>,
}

impl TokenSequence {
    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }
}

/// One frame on the optimal path.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PathPoint {
    pub token_index: usize,
    pub time_index: usize,
    /// Posterior probability of the transition taken at this frame.
    pub score: f32,
}

/// Half-open token range aligned to a half-open frame range.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Segment {
    pub start_token_index: usize,
    pub end_token_index: usize,
    pub start_time_index: usize,
    pub end_time_index: usize,
    pub score: f32,
}

impl Segment {
    pub fn frame_count(&self) -> usize {
        self.end_time_index.saturating_sub(self.start_time_index)
    }
}

/// Half-open sample interval `[start, end)` flagged as speech.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpeechRange {
    pub start: usize,
    pub end: usize,
}

impl SpeechRange {
    pub fn len(&self) -> usize {
        self.end.saturating_sub(self.start)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Half-open frame interval `[start, end)` in the concatenated emission.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrameRange {
    pub start: usize,
    pub end: usize,
}

impl FrameRange {
    pub fn len(&self) -> usize {
        self.end.saturating_sub(self.start)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn contains(&self, frame: usize) -> bool {
        self.start <= frame && frame < self.end
    }
}

/// Final per-character or per-word result.
///
/// Token indices refer to character positions in the original text, so
/// `text == original[start_token_index..end_token_index]`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Alignment {
    /// Seconds from the start of the waveform.
    pub start: f64,
    pub end: f64,
    pub start_time_index: usize,
    pub end_time_index: usize,
    pub start_token_index: usize,
    pub end_token_index: usize,
    pub score: f32,
    pub text: String,
}
