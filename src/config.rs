use std::path::Path;

use serde::Deserialize;

use crate::error::AlignmentError;

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct AlignerConfig {
    /// Directory holding one sub-directory per acoustic model checkpoint.
    pub model_dir: String,
    pub device: String,
    pub expected_sample_rate_hz: u32,
    pub speech: SpeechDetectorConfig,
}

impl AlignerConfig {
    pub const DEFAULT_SAMPLE_RATE_HZ: u32 = 16_000;

    pub fn load(path: &Path) -> Result<Self, AlignmentError> {
        let data = std::fs::read_to_string(path)
            .map_err(|e| AlignmentError::io("read aligner config", e))?;
        serde_json::from_str(&data).map_err(|e| AlignmentError::json("parse aligner config", e))
    }
}

impl Default for AlignerConfig {
    fn default() -> Self {
        Self {
            model_dir: "models".to_string(),
            device: "cpu".to_string(),
            expected_sample_rate_hz: Self::DEFAULT_SAMPLE_RATE_HZ,
            speech: SpeechDetectorConfig::default(),
        }
    }
}

/// Tuning for the energy-based speech detector.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct SpeechDetectorConfig {
    pub frame_ms: f64,
    /// Speech threshold as a multiple of the noise floor.
    pub threshold_multiplier: f32,
    /// Lower bound on the RMS threshold.
    pub min_threshold: f32,
    pub min_speech_ms: f64,
    /// Silences shorter than this are bridged.
    pub min_silence_ms: f64,
    pub speech_pad_ms: f64,
}

impl Default for SpeechDetectorConfig {
    fn default() -> Self {
        Self {
            frame_ms: 30.0,
            threshold_multiplier: 3.0,
            min_threshold: 0.0075,
            min_speech_ms: 250.0,
            min_silence_ms: 100.0,
            speech_pad_ms: 30.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn aligner_config_default() {
        let config = AlignerConfig::default();
        assert_eq!(config.device, "cpu");
        assert_eq!(
            config.expected_sample_rate_hz,
            AlignerConfig::DEFAULT_SAMPLE_RATE_HZ
        );
        assert_eq!(config.expected_sample_rate_hz, 16_000);
        assert_eq!(config.speech.frame_ms, 30.0);
        assert_eq!(config.speech.min_threshold, 0.0075);
    }

    #[test]
    fn partial_json_keeps_defaults() {
        let json = r#"{ "device": "cuda:0", "speech": { "min_speech_ms": 400 } }"#;
        let config: AlignerConfig = serde_json::from_str(json).expect("valid config json");
        assert_eq!(config.device, "cuda:0");
        assert_eq!(config.model_dir, "models");
        assert_eq!(config.speech.min_speech_ms, 400.0);
        assert_eq!(config.speech.threshold_multiplier, 3.0);
    }

    #[test]
    fn load_reads_file_and_reports_missing_one() {
        let path = std::env::temp_dir().join(format!("aligner-config-{}.json", std::process::id()));
        std::fs::write(&path, r#"{ "model_dir": "/opt/models" }"#).expect("write temp config");
        let config = AlignerConfig::load(&path).expect("load config");
        assert_eq!(config.model_dir, "/opt/models");
        std::fs::remove_file(&path).ok();

        let err = AlignerConfig::load(&path).unwrap_err();
        assert!(matches!(err, AlignmentError::Io { .. }));
    }
}
