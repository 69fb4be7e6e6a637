use crate::types::{PathPoint, Segment};

/// Collapses consecutive path points on the same token into one segment.
///
/// The segment spans the group's first frame up to one past its last frame
/// and scores the mean posterior of the group.
pub fn merge_repeats(path: &[PathPoint]) -> Vec<Segment> {
    path.chunk_by(|a, b| a.token_index == b.token_index)
        .map(|group| {
            let first = group[0];
            let last = group[group.len() - 1];
            let score = group.iter().map(|p| p.score).sum::<f32>() / group.len() as f32;
            Segment {
                start_token_index: first.token_index,
                end_token_index: first.token_index + 1,
                start_time_index: first.time_index,
                end_time_index: last.time_index + 1,
                score,
            }
        })
        .collect()
}

/// Groups per-character segments into words.
///
/// A segment whose first character is whitespace in `original` is a word
/// boundary and belongs to no word. Word scores are weighted by segment
/// duration so longer segments dominate.
pub fn merge_words(segments: &[Segment], original: &[char]) -> Vec<Segment> {
    let is_boundary = |segment: &Segment| {
        original
            .get(segment.start_token_index)
            .is_some_and(|c| c.is_whitespace())
    };

    segments
        .split(is_boundary)
        .filter(|word| !word.is_empty())
        .map(merge_word)
        .collect()
}

fn merge_word(word: &[Segment]) -> Segment {
    let first = word[0];
    let last = word[word.len() - 1];
    let total_frames: usize = word.iter().map(Segment::frame_count).sum();
    let score = if total_frames == 0 {
        0.0
    } else {
        word.iter()
            .map(|s| s.score * s.frame_count() as f32)
            .sum::<f32>()
            / total_frames as f32
    };
    Segment {
        start_token_index: first.start_token_index,
        end_token_index: last.end_token_index,
        start_time_index: first.start_time_index,
        end_time_index: last.end_time_index,
        score,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn point(token_index: usize, time_index: usize, score: f32) -> PathPoint {
        PathPoint {
            token_index,
            time_index,
            score,
        }
    }

    fn char_segment(index: usize, start: usize, end: usize, score: f32) -> Segment {
        Segment {
            start_token_index: index,
            end_token_index: index + 1,
            start_time_index: start,
            end_time_index: end,
            score,
        }
    }

    /// One segment per character of `text`, each two frames long.
    fn per_char(text: &str) -> Vec<Segment> {
        (0..text.chars().count())
            .map(|i| char_segment(i, 2 * i, 2 * i + 2, 1.0))
            .collect()
    }

    #[test]
    fn repeats_merge_into_one_segment_per_token() {
        let path = vec![
            point(0, 3, 0.5),
            point(0, 4, 1.0),
            point(1, 5, 0.9),
            point(2, 6, 0.2),
            point(2, 7, 0.4),
            point(2, 8, 0.6),
        ];
        let segments = merge_repeats(&path);
        assert_eq!(segments.len(), 3);
        assert_eq!(segments[0], char_segment(0, 3, 5, 0.75));
        assert_eq!(segments[1], char_segment(1, 5, 6, 0.9));
        assert_eq!(segments[2].start_time_index, 6);
        assert_eq!(segments[2].end_time_index, 9);
        assert!((segments[2].score - 0.4).abs() < 1e-6);
    }

    #[test]
    fn repeat_segments_are_never_empty() {
        let path: Vec<PathPoint> = (0..10).map(|t| point(t / 3, t, 1.0)).collect();
        for s in merge_repeats(&path) {
            assert!(s.start_time_index < s.end_time_index);
            assert!(s.start_token_index < s.end_token_index);
        }
    }

    #[test]
    fn empty_path_has_no_segments() {
        assert!(merge_repeats(&[]).is_empty());
    }

    #[test]
    fn three_word_sentence_yields_three_disjoint_words() {
        let text = "the cat sat";
        let chars: Vec<char> = text.chars().collect();
        let words = merge_words(&per_char(text), &chars);
        assert_eq!(words.len(), 3);

        let mut covered: Vec<usize> = words
            .iter()
            .flat_map(|w| w.start_token_index..w.end_token_index)
            .collect();
        let boundaries: Vec<usize> = (0..chars.len()).filter(|&i| chars[i] == ' ').collect();
        assert!(words
            .windows(2)
            .all(|w| w[0].end_token_index <= w[1].start_token_index));
        covered.extend(boundaries);
        covered.sort_unstable();
        assert_eq!(covered, (0..chars.len()).collect::<Vec<_>>());

        assert_eq!(words[0].start_token_index, 0);
        assert_eq!(words[0].end_token_index, 3);
        assert_eq!(words[0].start_time_index, 0);
        assert_eq!(words[0].end_time_index, 6);
    }

    #[test]
    fn repeated_whitespace_produces_no_empty_words() {
        let text = " a  b ";
        let chars: Vec<char> = text.chars().collect();
        let words = merge_words(&per_char(text), &chars);
        assert_eq!(words.len(), 2);
        assert_eq!(words[0].start_token_index, 1);
        assert_eq!(words[1].start_token_index, 4);
    }

    #[test]
    fn word_score_is_duration_weighted() {
        let chars: Vec<char> = "ab".chars().collect();
        let segments = vec![char_segment(0, 0, 3, 1.0), char_segment(1, 3, 4, 0.2)];
        let words = merge_words(&segments, &chars);
        assert_eq!(words.len(), 1);
        // (1.0 * 3 + 0.2 * 1) / 4
        assert!((words[0].score - 0.8).abs() < 1e-6);
    }

    #[test]
    fn zero_duration_word_scores_zero() {
        let chars: Vec<char> = "-".chars().collect();
        let words = merge_words(&[char_segment(0, 4, 4, 0.0)], &chars);
        assert_eq!(words[0].score, 0.0);
    }
}
