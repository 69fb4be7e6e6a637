use std::collections::HashMap;
use std::path::{Path, PathBuf};

use candle_core::{Device, Module, Tensor, D};

use crate::error::AlignmentError;
use crate::pipeline::traits::{Emission, EmissionModel, ModelBundle, ModelLoader};
use crate::types::LabelVocabulary;

/// Checkpoint used for languages without a dedicated model.
pub const DEFAULT_MODEL_NAME: &str = "WAV2VEC2_ASR_BASE_960H";

const ALIGN_MODELS: &[(&str, &str)] = &[
    ("en", "WAV2VEC2_ASR_BASE_960H"),
    ("fr", "VOXPOPULI_ASR_BASE_10K_FR"),
    ("de", "VOXPOPULI_ASR_BASE_10K_DE"),
    ("es", "VOXPOPULI_ASR_BASE_10K_ES"),
    ("it", "VOXPOPULI_ASR_BASE_10K_IT"),
    ("ja", "jonatasgrosman/wav2vec2-large-xlsr-53-japanese"),
    ("zh", "jonatasgrosman/wav2vec2-large-xlsr-53-chinese-zh-cn"),
    ("nl", "jonatasgrosman/wav2vec2-large-xlsr-53-dutch"),
    ("uk", "Yehor/wav2vec2-xls-r-300m-uk-with-small-lm"),
    ("pt", "jonatasgrosman/wav2vec2-large-xlsr-53-portuguese"),
    ("ar", "jonatasgrosman/wav2vec2-large-xlsr-53-arabic"),
    ("cs", "comodoro/wav2vec2-xls-r-300m-cs-250"),
    ("ru", "jonatasgrosman/wav2vec2-large-xlsr-53-russian"),
    ("pl", "jonatasgrosman/wav2vec2-large-xlsr-53-polish"),
    ("hu", "jonatasgrosman/wav2vec2-large-xlsr-53-hungarian"),
    ("fi", "jonatasgrosman/wav2vec2-large-xlsr-53-finnish"),
    ("fa", "jonatasgrosman/wav2vec2-large-xlsr-53-persian"),
    ("el", "jonatasgrosman/wav2vec2-large-xlsr-53-greek"),
    ("tr", "mpoyraz/wav2vec2-xls-r-300m-cv7-turkish"),
    ("da", "saattrupdan/wav2vec2-xls-r-300m-ftspeech"),
    ("he", "imvladikon/wav2vec2-xls-r-300m-hebrew"),
    ("vi", "nguyenvulebinh/wav2vec2-base-vi"),
    ("ko", "kresnik/wav2vec2-large-xlsr-korean"),
];

pub fn model_name_for_language(language_code: &str) -> &'static str {
    ALIGN_MODELS
        .iter()
        .find(|(code, _)| *code == language_code)
        .map_or(DEFAULT_MODEL_NAME, |(_, name)| name)
}

fn device_label(device: &Device) -> &'static str {
    if device.is_cuda() {
        "cuda"
    } else if device.is_metal() {
        "metal"
    } else {
        "cpu"
    }
}

/// Zero-mean, unit-variance scaling expected by wav2vec2-style encoders.
pub(crate) fn normalize_audio(samples: &[f32]) -> Vec<f32> {
    if samples.is_empty() {
        return Vec::new();
    }
    let n = samples.len() as f64;
    let mean = samples.iter().map(|&x| x as f64).sum::<f64>() / n;
    let var = samples
        .iter()
        .map(|&x| {
            let d = x as f64 - mean;
            d * d
        })
        .sum::<f64>()
        / n;
    let std = var.sqrt().max(1e-7);
    samples
        .iter()
        .map(|&x| ((x as f64 - mean) / std) as f32)
        .collect()
}

/// Log-softmax over the vocabulary axis of `(1, T, V)` or `(T, V)` logits.
pub fn log_probs_from_logits(logits: &Tensor) -> Result<Emission, AlignmentError> {
    let logits = match logits.rank() {
        3 => logits
            .squeeze(0)
            .map_err(|e| AlignmentError::runtime("squeeze batch", e))?,
        2 => logits.clone(),
        rank => {
            return Err(AlignmentError::invalid_input(format!(
                "unsupported logits rank {rank}; expected [1, T, V] or [T, V]"
            )))
        }
    };
    let log_probs_t = candle_nn::ops::log_softmax(&logits, D::Minus1)
        .map_err(|e| AlignmentError::runtime("log_softmax", e))?;
    let (_, vocab_size) = log_probs_t
        .dims2()
        .map_err(|e| AlignmentError::runtime("log_probs dims2", e))?;
    let log_probs = log_probs_t
        .to_vec2()
        .map_err(|e| AlignmentError::runtime("to_vec2", e))?;
    Ok(Emission {
        log_probs,
        vocab_size,
    })
}

/// Adapts any candle module mapping `(1, samples)` audio to `(1, T, V)` logits.
pub struct CandleEmissionModel<M> {
    module: M,
    device: Device,
}

impl<M: Module> CandleEmissionModel<M> {
    pub fn new(module: M, device: Device) -> Self {
        Self { module, device }
    }
}

impl<M: Module + Send + Sync> EmissionModel for CandleEmissionModel<M> {
    fn infer(&self, samples: &[f32]) -> Result<Emission, AlignmentError> {
        let normalized = normalize_audio(samples);
        let audio_tensor = Tensor::from_vec(normalized, (1, samples.len()), &self.device)
            .map_err(|e| AlignmentError::runtime("tensor creation", e))?;
        let logits = self
            .module
            .forward(&audio_tensor)
            .map_err(|e| AlignmentError::runtime("forward pass", e))?;
        log_probs_from_logits(&logits)
    }

    fn device_label(&self) -> &str {
        device_label(&self.device)
    }
}

/// Reads a HuggingFace-style `vocab.json` (`{"label": index}`).
pub fn load_vocab(path: &Path) -> Result<LabelVocabulary, AlignmentError> {
    let data =
        std::fs::read_to_string(path).map_err(|e| AlignmentError::io("read vocab.json", e))?;
    let raw: HashMap<String, usize> =
        serde_json::from_str(&data).map_err(|e| AlignmentError::json("parse vocab.json", e))?;
    Ok(LabelVocabulary::from_labels(raw))
}

/// Loads exported checkpoints from `<root>/<model name>/`.
///
/// Slashes in hub-style names become `--`, so
/// `jonatasgrosman/wav2vec2-large-xlsr-53-dutch` lives in
/// `<root>/jonatasgrosman--wav2vec2-large-xlsr-53-dutch/`. Each directory holds
/// `vocab.json` and `model.onnx`.
#[derive(Debug, Clone)]
pub struct DirectoryModelLoader {
    root: PathBuf,
}

impl DirectoryModelLoader {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn model_dir(&self, language_code: &str) -> PathBuf {
        self.root
            .join(model_name_for_language(language_code).replace('/', "--"))
    }
}

impl ModelLoader for DirectoryModelLoader {
    fn load(&self, language_code: &str, device: &str) -> Result<ModelBundle, AlignmentError> {
        let dir = self.model_dir(language_code);
        let vocabulary = load_vocab(&dir.join("vocab.json"))?;
        let model = build_onnx_model(&dir.join("model.onnx"), device)?;
        tracing::info!(
            language = language_code,
            device,
            model = model_name_for_language(language_code),
            vocab = vocabulary.size(),
            "acoustic model loaded"
        );
        Ok(ModelBundle { model, vocabulary })
    }
}

fn build_onnx_model(path: &Path, device: &str) -> Result<Box<dyn EmissionModel>, AlignmentError> {
    #[cfg(feature = "onnx")]
    {
        Ok(Box::new(onnx::OnnxEmissionModel::load(path, device)?))
    }

    #[cfg(not(feature = "onnx"))]
    {
        let _ = (path, device);
        Err(AlignmentError::runtime(
            "load acoustic model",
            "ONNX runtime support is disabled; enable the `onnx` cargo feature",
        ))
    }
}

#[cfg(feature = "onnx")]
mod onnx {
    use std::path::Path;
    use std::sync::Mutex;

    use candle_core::{Device, Tensor};
    use ort::execution_providers::{
        CPUExecutionProvider, CUDAExecutionProvider, ExecutionProviderDispatch,
    };
    use ort::session::Session;
    use ort::value::Value;

    use super::{log_probs_from_logits, normalize_audio};
    use crate::error::AlignmentError;
    use crate::pipeline::traits::{Emission, EmissionModel};

    pub(super) struct OnnxEmissionModel {
        session: Mutex<Session>,
        input_name: String,
        device_label: String,
    }

    impl OnnxEmissionModel {
        pub(super) fn load(path: &Path, device: &str) -> Result<Self, AlignmentError> {
            let (device_label, providers) = execution_providers(device)?;
            let session = Session::builder()
                .map_err(|e| AlignmentError::runtime("onnx session builder", e))?
                .with_execution_providers(providers)
                .map_err(|e| AlignmentError::runtime("onnx execution providers", e))?
                .commit_from_file(path)
                .map_err(|e| AlignmentError::runtime("onnx model load", e))?;
            let input_name = session
                .inputs
                .first()
                .map(|input| input.name.clone())
                .ok_or_else(|| AlignmentError::runtime("onnx model load", "model has no inputs"))?;

            tracing::debug!(
                inputs = session.inputs.len(),
                outputs = session.outputs.len(),
                model_path = %path.display(),
                device = device_label,
                "ONNX session ready"
            );

            Ok(Self {
                session: Mutex::new(session),
                input_name,
                device_label: device_label.to_string(),
            })
        }
    }

    impl EmissionModel for OnnxEmissionModel {
        fn infer(&self, samples: &[f32]) -> Result<Emission, AlignmentError> {
            let normalized = normalize_audio(samples);
            let input: Value = Value::from_array(([1usize, normalized.len()], normalized))
                .map_err(|e| AlignmentError::runtime("onnx input tensor", e))?
                .into();
            let mut session = self
                .session
                .lock()
                .map_err(|_| AlignmentError::runtime("onnx session lock", "session mutex poisoned"))?;
            let outputs = session
                .run(vec![(self.input_name.as_str(), input)])
                .map_err(|e| AlignmentError::runtime("onnx forward pass", e))?;
            if outputs.len() == 0 {
                return Err(AlignmentError::runtime(
                    "onnx forward pass",
                    "model produced no outputs",
                ));
            }
            let (shape, logits) = outputs[0]
                .try_extract_tensor::<f32>()
                .map_err(|e| AlignmentError::runtime("onnx extract logits", e))?;
            let dims: Vec<i64> = shape.iter().copied().collect();
            let (num_frames, vocab_size) = parse_output_shape(&dims, logits.len())?;
            let logits = Tensor::from_slice(logits, (num_frames, vocab_size), &Device::Cpu)
                .map_err(|e| AlignmentError::runtime("logits tensor", e))?;
            log_probs_from_logits(&logits)
        }

        fn device_label(&self) -> &str {
            &self.device_label
        }
    }

    fn execution_providers(
        device: &str,
    ) -> Result<(&'static str, Vec<ExecutionProviderDispatch>), AlignmentError> {
        if device.eq_ignore_ascii_case("cpu") {
            Ok(("cpu", vec![CPUExecutionProvider::default().build()]))
        } else if device.to_ascii_lowercase().starts_with("cuda") {
            Ok((
                "cuda",
                vec![
                    CUDAExecutionProvider::default().build(),
                    CPUExecutionProvider::default().build(),
                ],
            ))
        } else {
            Err(AlignmentError::invalid_input(format!(
                "unsupported ONNX device '{device}', expected 'cpu' or 'cuda'"
            )))
        }
    }

    pub(super) fn parse_output_shape(
        dims: &[i64],
        logits_len: usize,
    ) -> Result<(usize, usize), AlignmentError> {
        let (num_frames, vocab_size) = match dims {
            [1, t, v] | [t, v] => (non_negative_dim(*t, "time")?, positive_dim(*v, "vocab")?),
            [batch, _, _] => {
                return Err(AlignmentError::invalid_input(format!(
                    "ONNX logits batch size must be 1, got {batch}"
                )))
            }
            _ => {
                return Err(AlignmentError::invalid_input(format!(
                    "unsupported ONNX logits rank {}; expected [1, T, V] or [T, V]",
                    dims.len()
                )))
            }
        };
        let expected_len = num_frames
            .checked_mul(vocab_size)
            .ok_or_else(|| AlignmentError::invalid_input("ONNX logits shape is too large"))?;
        if expected_len != logits_len {
            return Err(AlignmentError::invalid_input(format!(
                "ONNX logits shape/data mismatch: shape implies {expected_len} values, got {logits_len}"
            )));
        }
        Ok((num_frames, vocab_size))
    }

    fn non_negative_dim(value: i64, name: &'static str) -> Result<usize, AlignmentError> {
        usize::try_from(value).map_err(|_| {
            AlignmentError::invalid_input(format!(
                "ONNX output {name} dimension must be >= 0, got {value}"
            ))
        })
    }

    fn positive_dim(value: i64, name: &'static str) -> Result<usize, AlignmentError> {
        match non_negative_dim(value, name)? {
            0 => Err(AlignmentError::invalid_input(format!(
                "ONNX output {name} dimension must be > 0"
            ))),
            dim => Ok(dim),
        }
    }

    #[cfg(test)]
    mod tests {
        use super::*;

        #[test]
        fn parse_shape_accepts_batched_logits() {
            let (t, v) = parse_output_shape(&[1, 7, 32], 7 * 32).expect("shape should be valid");
            assert_eq!((t, v), (7, 32));
        }

        #[test]
        fn parse_shape_rejects_non_unit_batch() {
            let err = parse_output_shape(&[2, 7, 32], 2 * 7 * 32)
                .expect_err("non-unit batch must be rejected");
            assert!(err.to_string().contains("batch size must be 1"));
        }

        #[test]
        fn parse_shape_rejects_len_mismatch() {
            let err = parse_output_shape(&[7, 32], 7 * 32 - 1)
                .expect_err("shape/data mismatch must be rejected");
            assert!(err.to_string().contains("shape/data mismatch"));
        }
    }
}
