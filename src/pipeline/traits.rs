use crate::error::AlignmentError;
use crate::types::{LabelVocabulary, SpeechRange};

/// Per-frame log-probabilities produced by an acoustic model.
#[derive(Debug, Clone, PartialEq)]
pub struct Emission {
    /// One row per frame, one column per vocabulary index.
    pub log_probs: Vec<Vec<f32>>,
    pub vocab_size: usize,
}

impl Emission {
    pub fn num_frames(&self) -> usize {
        self.log_probs.len()
    }
}

/// Turns raw mono samples into an emission matrix.
pub trait EmissionModel: Send + Sync {
    fn infer(&self, samples: &[f32]) -> Result<Emission, AlignmentError>;

    fn device_label(&self) -> &str {
        "cpu"
    }
}

/// Splits a waveform into speech-only sample ranges, in order.
pub trait SpeechDetector: Send + Sync {
    fn detect_speech(&self, samples: &[f32], sample_rate_hz: u32) -> Vec<SpeechRange>;
}

/// A model together with the vocabulary its output columns use.
pub struct ModelBundle {
    pub model: Box<dyn EmissionModel>,
    pub vocabulary: LabelVocabulary,
}

impl std::fmt::Debug for ModelBundle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ModelBundle")
            .field("device", &self.model.device_label())
            .field("vocab_size", &self.vocabulary.size())
            .finish()
    }
}

/// Resolves a language code and device to a loaded model.
pub trait ModelLoader: Send + Sync {
    fn load(&self, language_code: &str, device: &str) -> Result<ModelBundle, AlignmentError>;
}
