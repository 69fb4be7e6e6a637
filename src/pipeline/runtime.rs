use crate::alignment::interpolation::{interpolate, place_segments};
use crate::alignment::merge::{merge_repeats, merge_words};
use crate::alignment::time_mapping::map_time;
use crate::alignment::tokenization::tokenize;
use crate::alignment::viterbi::{check_emission_shape, forced_align};
use crate::error::AlignmentError;
use crate::pipeline::cache::ModelCache;
use crate::pipeline::traits::{EmissionModel, SpeechDetector};
use crate::text::{normalize, uses_word_spacing};
use crate::types::{Alignment, AlignmentRequest, FrameRange, Segment, SpeechRange};

/// Reported after each speech range has been through the acoustic model.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AlignProgress {
    pub completed_ranges: usize,
    pub total_ranges: usize,
}

pub struct ForcedAligner {
    models: ModelCache,
    speech_detector: Box<dyn SpeechDetector>,
    device: String,
    expected_sample_rate_hz: u32,
}

pub(crate) struct ForcedAlignerParts {
    pub models: ModelCache,
    pub speech_detector: Box<dyn SpeechDetector>,
    pub device: String,
    pub expected_sample_rate_hz: u32,
}

/// Emission rows of every speech range, concatenated in range order.
struct SpeechEmission {
    log_probs: Vec<Vec<f32>>,
    speech_ranges: Vec<SpeechRange>,
    frame_ranges: Vec<FrameRange>,
}

impl ForcedAligner {
    pub(crate) fn from_parts(parts: ForcedAlignerParts) -> Self {
        Self {
            models: parts.models,
            speech_detector: parts.speech_detector,
            device: parts.device,
            expected_sample_rate_hz: parts.expected_sample_rate_hz,
        }
    }

    pub fn device(&self) -> &str {
        &self.device
    }

    /// Number of `(language, device)` models loaded so far.
    pub fn loaded_models(&self) -> usize {
        self.models.len()
    }

    pub fn align(&self, request: &AlignmentRequest) -> Result<Vec<Alignment>, AlignmentError> {
        self.align_with_progress(request, |_| {})
    }

    /// Aligns `request.text` to `request.samples`.
    ///
    /// Returns one alignment per original character when `letter_wise` is set
    /// or the language does not separate words with spaces, otherwise one per
    /// word. Fails with [`AlignmentError::Infeasible`] when the audio has too
    /// few frames for the transcript.
    pub fn align_with_progress<F>(
        &self,
        request: &AlignmentRequest,
        mut on_progress: F,
    ) -> Result<Vec<Alignment>, AlignmentError>
    where
        F: FnMut(AlignProgress),
    {
        if request.text.is_empty() {
            return Ok(Vec::new());
        }
        if request.sample_rate_hz == 0 {
            return Err(AlignmentError::invalid_input("sample rate must be positive"));
        }
        if request.sample_rate_hz != self.expected_sample_rate_hz {
            tracing::warn!(
                expected_rate_hz = self.expected_sample_rate_hz,
                actual_rate_hz = request.sample_rate_hz,
                "aligner expects a specific sample rate; quality may degrade"
            );
        }

        let bundle = self
            .models
            .get_or_load(&request.language_code, &self.device)?;
        let vocab = &bundle.vocabulary;
        let word_spacing = uses_word_spacing(&request.language_code);
        let normalized = normalize(&request.text, &request.language_code);
        let tokens = tokenize(&normalized, vocab, word_spacing);
        let original: Vec<char> = request.text.chars().collect();

        let emission = self.emit(
            bundle.model.as_ref(),
            vocab.size(),
            &request.samples,
            request.sample_rate_hz,
            &mut on_progress,
        )?;
        let num_frames = emission.log_probs.len();
        tracing::debug!(
            characters = original.len(),
            tokens = tokens.len(),
            speech_ranges = emission.speech_ranges.len(),
            frames = num_frames,
            "aligning transcript"
        );
        if num_frames == 0 {
            return Err(AlignmentError::Infeasible {
                num_frames,
                num_tokens: tokens.len(),
            });
        }

        check_emission_shape(&emission.log_probs, &tokens.tokens, vocab.blank_id())?;
        let path = forced_align(&emission.log_probs, &tokens.tokens, vocab.blank_id()).ok_or(
            AlignmentError::Infeasible {
                num_frames,
                num_tokens: tokens.len(),
            },
        )?;

        let slots = place_segments(&merge_repeats(&path), &tokens.positions, original.len());
        let mut segments = interpolate(&slots, num_frames);
        if word_spacing && !request.letter_wise {
            segments = merge_words(&segments, &original);
        }

        segments
            .iter()
            .map(|segment| finalize(segment, &original, &emission, request.sample_rate_hz))
            .collect()
    }

    fn emit<F>(
        &self,
        model: &dyn EmissionModel,
        vocab_size: usize,
        samples: &[f32],
        sample_rate_hz: u32,
        on_progress: &mut F,
    ) -> Result<SpeechEmission, AlignmentError>
    where
        F: FnMut(AlignProgress),
    {
        let mut speech_ranges: Vec<SpeechRange> = self
            .speech_detector
            .detect_speech(samples, sample_rate_hz)
            .into_iter()
            .map(|range| SpeechRange {
                start: range.start,
                end: range.end.min(samples.len()),
            })
            .filter(|range| !range.is_empty())
            .collect();
        if speech_ranges.is_empty() && !samples.is_empty() {
            tracing::warn!(
                samples = samples.len(),
                "speech detector found no speech; aligning over the whole waveform"
            );
            speech_ranges.push(SpeechRange {
                start: 0,
                end: samples.len(),
            });
        }

        let total_ranges = speech_ranges.len();
        let mut log_probs = Vec::new();
        let mut frame_ranges = Vec::with_capacity(total_ranges);
        for (i, range) in speech_ranges.iter().enumerate() {
            let emission = model.infer(&samples[range.start..range.end])?;
            if emission.vocab_size < vocab_size {
                return Err(AlignmentError::invalid_input(format!(
                    "model emits {} columns but its vocabulary has {vocab_size} labels",
                    emission.vocab_size
                )));
            }
            if let Some(row) = emission
                .log_probs
                .iter()
                .find(|row| row.len() != emission.vocab_size)
            {
                return Err(AlignmentError::internal(format!(
                    "emission row has {} columns, model declared {}",
                    row.len(),
                    emission.vocab_size
                )));
            }
            let start = log_probs.len();
            log_probs.extend(emission.log_probs);
            frame_ranges.push(FrameRange {
                start,
                end: log_probs.len(),
            });
            on_progress(AlignProgress {
                completed_ranges: i + 1,
                total_ranges,
            });
        }

        Ok(SpeechEmission {
            log_probs,
            speech_ranges,
            frame_ranges,
        })
    }
}

fn finalize(
    segment: &Segment,
    original: &[char],
    emission: &SpeechEmission,
    sample_rate_hz: u32,
) -> Result<Alignment, AlignmentError> {
    let (start, end) = map_time(
        segment,
        &emission.speech_ranges,
        &emission.frame_ranges,
        sample_rate_hz,
    )?;
    let text = original
        .get(segment.start_token_index..segment.end_token_index)
        .ok_or_else(|| {
            AlignmentError::internal(format!(
                "segment tokens {}..{} exceed text of {} characters",
                segment.start_token_index,
                segment.end_token_index,
                original.len()
            ))
        })?
        .iter()
        .collect();
    Ok(Alignment {
        start,
        end,
        start_time_index: segment.start_time_index,
        end_time_index: segment.end_time_index,
        start_token_index: segment.start_token_index,
        end_token_index: segment.end_token_index,
        score: segment.score,
        text,
    })
}
