use crate::text::abbreviations;
use crate::text::numerals::{spell_numeral, NUMERAL_RE};

/// Text paired with its position map.
///
/// `positions[i]` is the index (in characters) of the original-text character
/// that produced character `i` of `text`. The map is non-decreasing and has
/// exactly one entry per character of `text`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NormalizedText {
    pub text: String,
    pub positions: Vec<usize>,
}

/// A single rewrite pass over `(text, positions)`.
pub type NormalizationPass = fn(NormalizedText, &str) -> NormalizedText;

/// Passes applied by [`normalize`], in order. Accent stripping needs the
/// vocabulary and happens in the tokenizer.
pub const PASSES: [NormalizationPass; 4] = [
    collapse_whitespace,
    fold_case,
    expand_abbreviations,
    expand_numerals,
];

pub fn normalize(text: &str, language: &str) -> NormalizedText {
    normalize_with(text, language, &PASSES)
}

pub fn normalize_with(
    text: &str,
    language: &str,
    passes: &[NormalizationPass],
) -> NormalizedText {
    passes
        .iter()
        .fold(NormalizedText::identity(text), |acc, pass| pass(acc, language))
}

impl NormalizedText {
    pub fn identity(text: &str) -> Self {
        Self {
            text: text.to_string(),
            positions: (0..text.chars().count()).collect(),
        }
    }

    pub fn char_len(&self) -> usize {
        self.positions.len()
    }

    fn from_pairs(pairs: impl IntoIterator<Item = (char, usize)>) -> Self {
        let (text, positions) = pairs.into_iter().unzip();
        Self { text, positions }
    }

    fn pairs(&self) -> impl Iterator<Item = (char, usize)> + '_ {
        self.text.chars().zip(self.positions.iter().copied())
    }

    /// Replaces characters `[start, end)` with `value`.
    ///
    /// Inserted character `k` maps to `min(mapped_start + k, mapped_end)`
    /// where `mapped_start`/`mapped_end` are the original indices of the first
    /// and last replaced characters, so the inserted run never points past
    /// the span it replaced.
    pub(crate) fn splice(&mut self, start: usize, end: usize, value: &str) {
        debug_assert!(start < end && end <= self.char_len());
        let mapped_start = self.positions[start];
        let mapped_end = self.positions[end - 1];
        let insertion = (0..value.chars().count()).map(|k| (mapped_start + k).min(mapped_end));

        let byte_start = byte_offset(&self.text, start);
        let byte_end = byte_offset(&self.text, end);
        self.text.replace_range(byte_start..byte_end, value);
        self.positions.splice(start..end, insertion);
    }
}

/// Every run of whitespace becomes one space mapped to the run's first character.
pub fn collapse_whitespace(input: NormalizedText, _language: &str) -> NormalizedText {
    let mut in_run = false;
    let pairs = input
        .pairs()
        .filter_map(|(c, pos)| {
            if c.is_whitespace() {
                let first = !in_run;
                in_run = true;
                first.then_some((' ', pos))
            } else {
                in_run = false;
                Some((c, pos))
            }
        })
        .collect::<Vec<_>>();
    NormalizedText::from_pairs(pairs)
}

/// Lower-cases with the language's default rules; expanded characters share
/// the position of the character they came from.
pub fn fold_case(input: NormalizedText, language: &str) -> NormalizedText {
    let dotless = matches!(language, "tr" | "az");
    let mut pairs = Vec::with_capacity(input.char_len());
    for (c, pos) in input.pairs() {
        match c {
            'I' if dotless => pairs.push(('ı', pos)),
            'İ' if dotless => pairs.push(('i', pos)),
            _ => pairs.extend(c.to_lowercase().map(|lc| (lc, pos))),
        }
    }
    NormalizedText::from_pairs(pairs)
}

pub fn expand_abbreviations(mut input: NormalizedText, language: &str) -> NormalizedText {
    let Some(table) = abbreviations::table(language) else {
        return input;
    };
    for (abbreviation, expansion) in table {
        let pattern: Vec<char> = abbreviation.chars().collect();
        let expansion_len = expansion.chars().count();
        let mut from = 0;
        loop {
            let chars: Vec<char> = input.text.chars().collect();
            let Some(start) = find_at_word_start(&chars, &pattern, from) else {
                break;
            };
            input.splice(start, start + pattern.len(), expansion);
            from = start + expansion_len;
        }
    }
    input
}

/// Replaces numerals with spelled-out words; unconvertible numerals stay as-is.
pub fn expand_numerals(mut input: NormalizedText, language: &str) -> NormalizedText {
    let mut from_byte = 0;
    loop {
        let Some(found) = NUMERAL_RE.find_at(&input.text, from_byte) else {
            break;
        };
        let (byte_start, byte_end) = (found.start(), found.end());
        match spell_numeral(found.as_str(), language) {
            Some(words) => {
                let start = input.text[..byte_start].chars().count();
                let end = start + input.text[byte_start..byte_end].chars().count();
                input.splice(start, end, &words);
                from_byte = byte_start + words.len();
            }
            None => {
                tracing::debug!(
                    numeral = found.as_str(),
                    language,
                    "numeral left unexpanded"
                );
                from_byte = byte_end;
            }
        }
    }
    input
}

fn find_at_word_start(chars: &[char], pattern: &[char], from: usize) -> Option<usize> {
    if pattern.is_empty() || chars.len() < pattern.len() {
        return None;
    }
    (from..=chars.len() - pattern.len()).find(|&i| {
        chars[i..i + pattern.len()] == *pattern && (i == 0 || !chars[i - 1].is_alphanumeric())
    })
}

fn byte_offset(text: &str, char_index: usize) -> usize {
    text.char_indices()
        .nth(char_index)
        .map_or(text.len(), |(offset, _)| offset)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_map_contract(normalized: &NormalizedText) {
        assert_eq!(normalized.positions.len(), normalized.text.chars().count());
        assert!(normalized.positions.windows(2).all(|w| w[0] <= w[1]));
    }

    fn run(pass: NormalizationPass, text: &str, language: &str) -> NormalizedText {
        let out = pass(NormalizedText::identity(text), language);
        assert_map_contract(&out);
        out
    }

    #[test]
    fn whitespace_runs_collapse_to_single_space() {
        let out = run(collapse_whitespace, "a \n\t b\nc", "en");
        assert_eq!(out.text, "a b c");
        assert_eq!(out.positions, vec![0, 1, 5, 6, 7]);
    }

    #[test]
    fn case_folding_keeps_positions() {
        let out = run(fold_case, "HeLLo", "en");
        assert_eq!(out.text, "hello");
        assert_eq!(out.positions, vec![0, 1, 2, 3, 4]);
    }

    #[test]
    fn case_folding_expanding_character_repeats_position() {
        let out = run(fold_case, "İx", "en");
        assert_eq!(out.text, "i\u{307}x");
        assert_eq!(out.positions, vec![0, 0, 1]);
    }

    #[test]
    fn turkish_case_folding_uses_dotless_i() {
        let out = run(fold_case, "IİI", "tr");
        assert_eq!(out.text, "ıiı");
    }

    #[test]
    fn abbreviation_expansion_clamps_inserted_positions() {
        let out = run(expand_abbreviations, "hi dr. who", "en");
        assert_eq!(out.text, "hi doctor who");
        // "dr." spans original 3..=5; "doctor" maps to 3,4,5,5,5,5
        assert_eq!(&out.positions[3..9], &[3, 4, 5, 5, 5, 5]);
        assert_eq!(&out.positions[9..], &[6, 7, 8, 9]);
    }

    #[test]
    fn abbreviation_expansion_replaces_every_occurrence() {
        let out = run(expand_abbreviations, "mr. and mrs. smith and mr. x", "en");
        assert_eq!(out.text, "mister and missus smith and mister x");
    }

    #[test]
    fn abbreviation_requires_word_start() {
        let out = run(expand_abbreviations, "hundr. dr.", "en");
        assert_eq!(out.text, "hundr. doctor");
    }

    #[test]
    fn language_without_table_is_untouched() {
        let out = run(expand_abbreviations, "dr. x", "ja");
        assert_eq!(out.text, "dr. x");
        assert_eq!(out.positions, vec![0, 1, 2, 3, 4]);
    }

    #[test]
    fn twelve_maps_into_the_two_character_span() {
        let out = normalize("12", "en");
        assert_eq!(out.text, "twelve");
        assert_eq!(out.positions.len(), 6);
        assert!(out.positions.iter().all(|&p| p <= 1));
        assert_eq!(out.positions, vec![0, 1, 1, 1, 1, 1]);
    }

    #[test]
    fn numerals_expand_left_to_right_with_offsets_recomputed() {
        let out = run(expand_numerals, "1 versus 2, which?", "en");
        assert_eq!(out.text, "one versus two, which?");
        assert_eq!(&out.positions[0..3], &[0, 0, 0]);
        assert_eq!(&out.positions[11..14], &[9, 9, 9]);
        assert_eq!(out.positions[14], 10);
    }

    #[test]
    fn currency_numeral_gets_suffix() {
        let out = run(expand_numerals, "$1,000", "en");
        assert_eq!(out.text, "one thousand dollars");
        assert_eq!(out.positions[0], 0);
        assert_eq!(*out.positions.last().unwrap(), 5);
    }

    #[test]
    fn french_numeral_is_clamped_into_its_span() {
        let out = normalize("12", "fr");
        assert_eq!(out.text, "douze");
        assert_eq!(out.positions, vec![0, 1, 1, 1, 1]);

        let out = run(expand_numerals, "le 12 mai", "fr");
        assert_eq!(out.text, "le douze mai");
        assert_map_contract(&out);
    }

    #[test]
    fn unconvertible_numeral_is_left_unchanged() {
        let out = run(expand_numerals, "le 12 mai, 3", "ja");
        assert_eq!(out.text, "le 12 mai, 3");
        assert_eq!(out.positions, (0..12).collect::<Vec<_>>());
    }

    #[test]
    fn full_pipeline_keeps_map_contract() {
        let text = "Hello  Dr. George.\nIt costs $5, about 50%!";
        let out = normalize(text, "en");
        assert_map_contract(&out);
        assert_eq!(
            out.text,
            "hello doctor george. it costs five dollars, about fifty percent!"
        );
        assert!(out.positions.iter().all(|&p| p < text.chars().count()));
    }

    #[test]
    fn plain_text_normalization_is_identity_map() {
        let out = normalize("hello world", "en");
        assert_eq!(out.text, "hello world");
        assert_eq!(out.positions, (0..11).collect::<Vec<_>>());
    }
}
