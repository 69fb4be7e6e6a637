use crate::error::AlignmentError;
use crate::types::{FrameRange, Segment, SpeechRange};

/// Converts a segment's frame bounds into seconds of the original waveform.
///
/// Frame indices count frames of the concatenated speech-only emission. The
/// `(speech, frame)` pair containing the segment's last frame is located and
/// both bounds are projected linearly from that frame range onto its speech
/// range. The final range also owns the frame index one past its end, so a
/// segment reaching the very last frame still resolves.
pub fn map_time(
    segment: &Segment,
    speech_ranges: &[SpeechRange],
    frame_ranges: &[FrameRange],
    sample_rate_hz: u32,
) -> Result<(f64, f64), AlignmentError> {
    if speech_ranges.len() != frame_ranges.len() {
        return Err(AlignmentError::internal(format!(
            "{} speech ranges but {} frame ranges",
            speech_ranges.len(),
            frame_ranges.len()
        )));
    }
    if sample_rate_hz == 0 {
        return Err(AlignmentError::invalid_input("sample rate must be positive"));
    }

    let lookup = if segment.end_time_index > segment.start_time_index {
        segment.end_time_index - 1
    } else {
        segment.start_time_index
    };
    let last = frame_ranges.iter().rposition(|r| !r.is_empty());
    let found = speech_ranges
        .iter()
        .zip(frame_ranges)
        .enumerate()
        .find(|(i, (_, frames))| {
            !frames.is_empty()
                && (frames.contains(lookup) || (Some(*i) == last && lookup == frames.end))
        });

    let Some((_, (speech, frames))) = found else {
        return Err(AlignmentError::internal(format!(
            "frame {lookup} is outside every frame range (segment {}..{})",
            segment.start_time_index, segment.end_time_index
        )));
    };

    let ratio = speech.len() as f64 / frames.len() as f64;
    let project = |frame: usize| {
        let offset = (frame as f64 - frames.start as f64) * ratio;
        (speech.start as f64 + offset).max(0.0) / f64::from(sample_rate_hz)
    };
    Ok((
        project(segment.start_time_index),
        project(segment.end_time_index),
    ))
}
