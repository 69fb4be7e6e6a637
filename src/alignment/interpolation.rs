use crate::types::Segment;

/// Per-original-character alignment state.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Slot {
    Placed(Segment),
    /// The decoder never observed this character directly.
    Pending,
}

/// Re-expands token segments to one slot per original-text character.
///
/// `positions[k]` is the original index of token `k`. When several tokens
/// land on the same character (an expanded abbreviation or numeral) their
/// segments are merged into one spanning all of them.
pub fn place_segments(segments: &[Segment], positions: &[usize], original_len: usize) -> Vec<Slot> {
    let mut slots = vec![Slot::Pending; original_len];
    for segment in segments {
        let Some(&index) = positions.get(segment.start_token_index) else {
            continue;
        };
        let Some(slot) = slots.get_mut(index) else {
            continue;
        };
        let placed = Segment {
            start_token_index: index,
            end_token_index: index + 1,
            ..*segment
        };
        *slot = match *slot {
            Slot::Placed(existing) => Slot::Placed(extend(existing, placed)),
            Slot::Pending => Slot::Placed(placed),
        };
    }
    slots
}

fn extend(existing: Segment, next: Segment) -> Segment {
    let frames = existing.frame_count() + next.frame_count();
    let score = if frames == 0 {
        0.0
    } else {
        (existing.score * existing.frame_count() as f32 + next.score * next.frame_count() as f32)
            / frames as f32
    };
    Segment {
        start_time_index: existing.start_time_index.min(next.start_time_index),
        end_time_index: existing.end_time_index.max(next.end_time_index),
        score,
        ..existing
    }
}

/// Fills every pending slot with a zero-confidence placeholder.
///
/// Each maximal run of pending slots splits the frames between its placed
/// neighbours (frame 0 and `max_frame_index` at the ends) into equal shares.
/// The output has exactly one segment per slot.
pub fn interpolate(slots: &[Slot], max_frame_index: usize) -> Vec<Segment> {
    let mut resolved: Vec<Segment> = Vec::with_capacity(slots.len());
    let mut i = 0;
    while i < slots.len() {
        if let Slot::Placed(segment) = slots[i] {
            resolved.push(segment);
            i += 1;
            continue;
        }

        let run_end = (i..slots.len())
            .find(|&j| matches!(slots[j], Slot::Placed(_)))
            .unwrap_or(slots.len());
        let range_start = resolved.last().map_or(0, |s| s.end_time_index);
        let range_end = match slots.get(run_end) {
            Some(Slot::Placed(next)) => next.start_time_index,
            _ => max_frame_index,
        }
        .max(range_start);

        let size = run_end - i;
        let span = range_end - range_start;
        for offset in 0..size {
            resolved.push(Segment {
                start_token_index: i + offset,
                end_token_index: i + offset + 1,
                start_time_index: range_start + offset * span / size,
                end_time_index: range_start + (offset + 1) * span / size,
                score: 0.0,
            });
        }
        i = run_end;
    }
    resolved
}
