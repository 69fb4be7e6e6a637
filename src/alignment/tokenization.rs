use unicode_normalization::char::is_combining_mark;
use unicode_normalization::UnicodeNormalization;

use crate::text::NormalizedText;
use crate::types::{LabelVocabulary, TokenSequence};

/// Converts normalized text into vocabulary indices.
///
/// Characters the vocabulary lacks are retried without their accents and
/// dropped when that fails too. Spaces become the word-boundary symbol when
/// `word_spacing` is set (never leading, trailing or doubled) and are dropped
/// otherwise. `positions` is carried forward in lockstep.
pub fn tokenize(
    normalized: &NormalizedText,
    vocab: &LabelVocabulary,
    word_spacing: bool,
) -> TokenSequence {
    let boundary_id = if word_spacing {
        vocab.word_boundary_id()
    } else {
        None
    };

    let mut seq = TokenSequence::default();
    let mut pending_boundary: Option<usize> = None;
    let push = |seq: &mut TokenSequence, pending: &mut Option<usize>, id: usize, pos: usize| {
        if let (Some(boundary_pos), Some(boundary)) = (pending.take(), boundary_id) {
            if !seq.is_empty() {
                seq.tokens.push(boundary);
                seq.positions.push(boundary_pos);
            }
        }
        seq.tokens.push(id);
        seq.positions.push(pos);
    };

    for (c, pos) in normalized.text.chars().zip(normalized.positions.iter().copied()) {
        if c == ' ' {
            if boundary_id.is_some() && pending_boundary.is_none() {
                pending_boundary = Some(pos);
            }
            continue;
        }
        if let Some(id) = vocab.index_of(c) {
            push(&mut seq, &mut pending_boundary, id, pos);
            continue;
        }
        for stripped in strip_accents(c) {
            if let Some(id) = vocab.index_of(stripped) {
                push(&mut seq, &mut pending_boundary, id, pos);
            }
        }
    }

    debug_assert_eq!(seq.tokens.len(), seq.positions.len());
    debug_assert!(seq.positions.windows(2).all(|w| w[0] <= w[1]));
    seq
}

fn strip_accents(c: char) -> impl Iterator<Item = char> {
    std::iter::once(c).nfd().filter(|&d| !is_combining_mark(d))
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;
    use crate::text::normalize;

    const BLANK_ID: usize = 0;
    const SPACE_ID: usize = 9;

    fn vocab_lower() -> LabelVocabulary {
        let mut m = HashMap::new();
        m.insert('a', 1);
        m.insert('b', 2);
        m.insert('c', 3);
        m.insert('e', 4);
        m.insert(' ', SPACE_ID);
        LabelVocabulary::new(m, BLANK_ID)
    }

    #[test]
    fn empty_text_produces_no_tokens() {
        let seq = tokenize(&normalize("", "en"), &vocab_lower(), true);
        assert!(seq.is_empty());
        assert!(seq.positions.is_empty());
    }

    #[test]
    fn unknown_chars_are_dropped_with_their_positions() {
        let seq = tokenize(&normalize("aXb", "en"), &vocab_lower(), true);
        // 'x' after case folding is still unknown
        assert_eq!(seq.tokens, vec![1, 2]);
        assert_eq!(seq.positions, vec![0, 2]);
    }

    #[test]
    fn spaces_become_word_boundaries() {
        let seq = tokenize(&normalize("a b c", "en"), &vocab_lower(), true);
        assert_eq!(seq.tokens, vec![1, SPACE_ID, 2, SPACE_ID, 3]);
        assert_eq!(seq.positions, vec![0, 1, 2, 3, 4]);
    }

    #[test]
    fn boundaries_are_not_leading_trailing_or_doubled() {
        let seq = tokenize(&normalize(" a . b ", "en"), &vocab_lower(), true);
        assert_eq!(seq.tokens, vec![1, SPACE_ID, 2]);
        assert_eq!(seq.positions, vec![1, 2, 5]);
    }

    #[test]
    fn spaces_dropped_without_word_spacing() {
        let seq = tokenize(&normalize("a b", "ja"), &vocab_lower(), false);
        assert_eq!(seq.tokens, vec![1, 2]);
        assert_eq!(seq.positions, vec![0, 2]);
    }

    #[test]
    fn accents_stripped_only_when_missing_from_vocab() {
        let seq = tokenize(&normalize("Éa", "fr"), &vocab_lower(), true);
        assert_eq!(seq.tokens, vec![4, 1]);
        assert_eq!(seq.positions, vec![0, 1]);

        let mut with_accent = HashMap::new();
        with_accent.insert('é', 7);
        with_accent.insert('e', 4);
        let vocab = LabelVocabulary::new(with_accent, BLANK_ID);
        let seq = tokenize(&normalize("é", "fr"), &vocab, true);
        assert_eq!(seq.tokens, vec![7]);
    }

    #[test]
    fn recognized_text_maps_to_identity_positions() {
        let text = "abc cab bee";
        let seq = tokenize(&normalize(text, "en"), &vocab_lower(), true);
        assert_eq!(seq.positions, (0..text.len()).collect::<Vec<_>>());
        assert!(seq.len() <= text.len());
    }

    #[test]
    fn expanded_numeral_tokens_share_clamped_positions() {
        let mut m = HashMap::new();
        for (i, c) in "twelv".chars().enumerate() {
            m.insert(c, i + 1);
        }
        let vocab = LabelVocabulary::new(m, BLANK_ID);
        let seq = tokenize(&normalize("12", "en"), &vocab, true);
        assert_eq!(seq.len(), 6);
        assert_eq!(seq.positions, vec![0, 1, 1, 1, 1, 1]);
    }
}
