use crate::alignment::speech::EnergySpeechDetector;
use crate::config::AlignerConfig;
use crate::error::AlignmentError;
use crate::pipeline::cache::ModelCache;
use crate::pipeline::model_runtime::DirectoryModelLoader;
use crate::pipeline::runtime::{ForcedAligner, ForcedAlignerParts};
use crate::pipeline::traits::{ModelLoader, SpeechDetector};

pub struct ForcedAlignerBuilder {
    config: AlignerConfig,
    model_loader: Option<Box<dyn ModelLoader>>,
    speech_detector: Option<Box<dyn SpeechDetector>>,
}

impl ForcedAlignerBuilder {
    pub fn new(config: AlignerConfig) -> Self {
        Self {
            config,
            model_loader: None,
            speech_detector: None,
        }
    }

    pub fn with_model_loader(mut self, model_loader: Box<dyn ModelLoader>) -> Self {
        self.model_loader = Some(model_loader);
        self
    }

    pub fn with_speech_detector(mut self, speech_detector: Box<dyn SpeechDetector>) -> Self {
        self.speech_detector = Some(speech_detector);
        self
    }

    pub fn build(self) -> Result<ForcedAligner, AlignmentError> {
        let device = self.config.device.trim().to_string();
        if device.is_empty() {
            return Err(AlignmentError::invalid_input("device must not be empty"));
        }
        let expected_sample_rate_hz = if self.config.expected_sample_rate_hz == 0 {
            AlignerConfig::DEFAULT_SAMPLE_RATE_HZ
        } else {
            self.config.expected_sample_rate_hz
        };

        let model_loader = match self.model_loader {
            Some(model_loader) => model_loader,
            None => Box::new(DirectoryModelLoader::new(&self.config.model_dir)),
        };
        let speech_detector = match self.speech_detector {
            Some(speech_detector) => speech_detector,
            None => Box::new(EnergySpeechDetector::new(self.config.speech.clone())),
        };

        Ok(ForcedAligner::from_parts(ForcedAlignerParts {
            models: ModelCache::new(model_loader),
            speech_detector,
            device,
            expected_sample_rate_hz,
        }))
    }
}
