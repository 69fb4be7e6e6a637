pub mod alignment;
pub mod config;
pub mod error;
pub mod pipeline;
pub mod text;
pub mod types;

pub use alignment::speech::EnergySpeechDetector;
pub use config::{AlignerConfig, SpeechDetectorConfig};
pub use error::AlignmentError;
pub use pipeline::builder::ForcedAlignerBuilder;
pub use pipeline::model_runtime::{CandleEmissionModel, DirectoryModelLoader};
pub use pipeline::runtime::{AlignProgress, ForcedAligner};
pub use pipeline::traits::{Emission, EmissionModel, ModelBundle, ModelLoader, SpeechDetector};
pub use types::{
    Alignment, AlignmentRequest, LabelVocabulary, PathPoint, Segment, SpeechRange, TokenSequence,
};
