use crate::config::SpeechDetectorConfig;
use crate::pipeline::traits::SpeechDetector;
use crate::types::SpeechRange;

const BASELINE_FRAMES: usize = 10;

/// Frame-RMS voice activity detector.
///
/// The noise floor is the mean RMS of the quietest frames; frames at or above
/// `max(noise_floor * threshold_multiplier, min_threshold)` count as speech.
#[derive(Debug, Clone, Default)]
pub struct EnergySpeechDetector {
    config: SpeechDetectorConfig,
}

impl EnergySpeechDetector {
    pub fn new(config: SpeechDetectorConfig) -> Self {
        Self { config }
    }
}

impl SpeechDetector for EnergySpeechDetector {
    fn detect_speech(&self, samples: &[f32], sample_rate_hz: u32) -> Vec<SpeechRange> {
        let Some((frame_len, frame_rms)) =
            compute_frame_rms(samples, sample_rate_hz, self.config.frame_ms)
        else {
            return Vec::new();
        };
        let to_samples = |ms: f64| ((sample_rate_hz as f64 * ms) / 1000.0).round() as usize;

        let threshold = (quiet_noise_floor(&frame_rms) * self.config.threshold_multiplier)
            .max(self.config.min_threshold);
        let voiced = runs_above_threshold(&frame_rms, threshold)
            .into_iter()
            .map(|(start, end)| SpeechRange {
                start: start * frame_len,
                end: (end * frame_len).min(samples.len()),
            })
            .collect();

        let bridged = merge_close(voiced, to_samples(self.config.min_silence_ms));
        let min_speech = to_samples(self.config.min_speech_ms);
        let pad = to_samples(self.config.speech_pad_ms);
        let padded = bridged
            .into_iter()
            .filter(|range| range.len() >= min_speech)
            .map(|range| SpeechRange {
                start: range.start.saturating_sub(pad),
                end: (range.end + pad).min(samples.len()),
            })
            .collect();
        merge_close(padded, 0)
    }
}

fn quiet_noise_floor(frame_rms: &[f32]) -> f32 {
    let mut sorted = frame_rms.to_vec();
    sorted.sort_by(f32::total_cmp);
    let baseline_frames = sorted.len().min(BASELINE_FRAMES);
    sorted.iter().take(baseline_frames).sum::<f32>() / baseline_frames as f32
}

/// Half-open frame runs whose RMS reaches `threshold`.
fn runs_above_threshold(frame_rms: &[f32], threshold: f32) -> Vec<(usize, usize)> {
    let mut runs = Vec::new();
    let mut run_start = None;
    for (frame_idx, rms) in frame_rms.iter().copied().enumerate() {
        match (rms >= threshold, run_start) {
            (true, None) => run_start = Some(frame_idx),
            (false, Some(start)) => {
                runs.push((start, frame_idx));
                run_start = None;
            }
            _ => {}
        }
    }
    if let Some(start) = run_start {
        runs.push((start, frame_rms.len()));
    }
    runs
}

/// Joins ranges separated by fewer than `max_gap` samples.
fn merge_close(ranges: Vec<SpeechRange>, max_gap: usize) -> Vec<SpeechRange> {
    let mut merged: Vec<SpeechRange> = Vec::with_capacity(ranges.len());
    for range in ranges {
        match merged.last_mut() {
            Some(prev) if range.start <= prev.end + max_gap => prev.end = prev.end.max(range.end),
            _ => merged.push(range),
        }
    }
    merged
}

fn compute_frame_rms(
    samples: &[f32],
    sample_rate_hz: u32,
    frame_ms: f64,
) -> Option<(usize, Vec<f32>)> {
    if samples.is_empty() || sample_rate_hz == 0 {
        return None;
    }
    let frame_len = ((sample_rate_hz as f64 * frame_ms) / 1000.0).round() as usize;
    let frame_len = frame_len.max(1);

    let frame_rms = samples
        .chunks(frame_len)
        .map(|chunk| {
            let mean_sq =
                chunk.iter().map(|&x| (x as f64) * (x as f64)).sum::<f64>() / chunk.len() as f64;
            mean_sq.sqrt() as f32
        })
        .collect();
    Some((frame_len, frame_rms))
}

#[cfg(test)]
mod tests {
    use super::*;

    const RATE: u32 = 16_000;

    /// Concatenates (seconds, amplitude) blocks of a 220 Hz tone.
    fn signal(blocks: &[(f64, f32)]) -> Vec<f32> {
        let mut out = Vec::new();
        for &(seconds, amplitude) in blocks {
            let n = (seconds * RATE as f64) as usize;
            out.extend((0..n).map(|i| {
                let t = i as f32 / RATE as f32;
                amplitude * (2.0 * std::f32::consts::PI * 220.0 * t).sin()
            }));
        }
        out
    }

    fn detector() -> EnergySpeechDetector {
        EnergySpeechDetector::default()
    }

    #[test]
    fn silence_has_no_speech() {
        let samples = vec![0.0; RATE as usize];
        assert!(detector().detect_speech(&samples, RATE).is_empty());
    }

    #[test]
    fn empty_input_has_no_speech() {
        assert!(detector().detect_speech(&[], RATE).is_empty());
        assert!(detector().detect_speech(&[0.5; 100], 0).is_empty());
    }

    #[test]
    fn single_burst_is_found_and_padded() {
        let samples = signal(&[(0.5, 0.0), (1.0, 0.5), (0.5, 0.0)]);
        let ranges = detector().detect_speech(&samples, RATE);
        assert_eq!(ranges.len(), 1);
        // 30 ms frames and 30 ms padding are both 480 samples
        assert!(ranges[0].start < 8_000 && ranges[0].start >= 8_000 - 2 * 480);
        assert!(ranges[0].end > 24_000 && ranges[0].end <= 24_000 + 2 * 480);
    }

    #[test]
    fn short_silence_is_bridged() {
        let samples = signal(&[(0.3, 0.0), (0.5, 0.5), (0.05, 0.0), (0.5, 0.5), (0.3, 0.0)]);
        assert_eq!(detector().detect_speech(&samples, RATE).len(), 1);
    }

    #[test]
    fn long_silence_separates_ranges() {
        let samples = signal(&[(0.3, 0.0), (0.5, 0.5), (0.6, 0.0), (0.5, 0.5), (0.3, 0.0)]);
        let ranges = detector().detect_speech(&samples, RATE);
        assert_eq!(ranges.len(), 2);
        assert!(ranges[0].end < ranges[1].start);
    }

    #[test]
    fn short_bursts_are_dropped() {
        let samples = signal(&[(0.5, 0.0), (0.06, 0.5), (0.5, 0.0)]);
        assert!(detector().detect_speech(&samples, RATE).is_empty());
    }

    #[test]
    fn ranges_stay_inside_the_waveform() {
        let samples = signal(&[(0.6, 0.5), (0.6, 0.0)]);
        let ranges = detector().detect_speech(&samples, RATE);
        assert_eq!(ranges[0].start, 0);
        assert!(ranges.iter().all(|r| r.end <= samples.len()));
    }

    #[test]
    fn runs_are_half_open() {
        let runs = runs_above_threshold(&[0.0, 1.0, 1.0, 0.0, 1.0], 0.5);
        assert_eq!(runs, vec![(1, 3), (4, 5)]);
    }
}
