//! Numeral literal detection and spelled-out expansion.

use once_cell::sync::Lazy;
use regex::Regex;

mod french;
mod german;
mod italian;
mod portuguese;
mod spanish;

/// `$`-prefixed or `%`-suffixed numerals with optional thousands separators
/// and an optional decimal part.
pub(crate) static NUMERAL_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\$?(?:\d+,)*\d+(?:\.\d+)?%?").unwrap());

const ONES: [&str; 20] = [
    "zero",
    "one",
    "two",
    "three",
    "four",
    "five",
    "six",
    "seven",
    "eight",
    "nine",
    "ten",
    "eleven",
    "twelve",
    "thirteen",
    "fourteen",
    "fifteen",
    "sixteen",
    "seventeen",
    "eighteen",
    "nineteen",
];

const TENS: [&str; 10] = [
    "", "", "twenty", "thirty", "forty", "fifty", "sixty", "seventy", "eighty", "ninety",
];

const SCALES: [&str; 7] = [
    "",
    "thousand",
    "million",
    "billion",
    "trillion",
    "quadrillion",
    "quintillion",
];

/// Per-language number words.
struct Speller {
    /// `None` when the value is outside the language's supported range.
    integer: fn(u64) -> Option<String>,
    digits: [&'static str; 10],
    decimal_point: &'static str,
}

fn speller(language: &str) -> Option<Speller> {
    let speller = match language {
        "en" => Speller {
            integer: |value| Some(english_integer(value)),
            digits: [
                ONES[0], ONES[1], ONES[2], ONES[3], ONES[4], ONES[5], ONES[6], ONES[7], ONES[8],
                ONES[9],
            ],
            decimal_point: "point",
        },
        "fr" => Speller {
            integer: french::integer,
            digits: french::DIGITS,
            decimal_point: "virgule",
        },
        "es" => Speller {
            integer: spanish::integer,
            digits: spanish::DIGITS,
            decimal_point: "punto",
        },
        "de" => Speller {
            integer: german::integer,
            digits: german::DIGITS,
            decimal_point: "komma",
        },
        "it" => Speller {
            integer: italian::integer,
            digits: italian::DIGITS,
            decimal_point: "virgola",
        },
        "pt" => Speller {
            integer: portuguese::integer,
            digits: portuguese::DIGITS,
            decimal_point: "vírgula",
        },
        _ => return None,
    };
    Some(speller)
}

/// Spells out a numeral literal matched by [`NUMERAL_RE`] in `language`.
///
/// Returns `None` when the language has no speller or the literal cannot be
/// converted; callers keep the literal untouched in that case.
pub fn spell_numeral(literal: &str, language: &str) -> Option<String> {
    let digits = literal.replace(',', "");
    let (digits, suffix) = if let Some(rest) = digits.strip_prefix('$') {
        (rest.to_string(), " dollars")
    } else if let Some(rest) = digits.strip_suffix('%') {
        (rest.to_string(), " percent")
    } else {
        (digits, "")
    };

    let words = spell(&digits, &speller(language)?)?;
    Some(format!("{words}{suffix}"))
}

fn spell(digits: &str, speller: &Speller) -> Option<String> {
    let (integer, fraction) = match digits.split_once('.') {
        Some((integer, fraction)) => (integer, Some(fraction)),
        None => (digits, None),
    };
    let value: u64 = integer.parse().ok()?;
    let mut words = (speller.integer)(value)?;

    if let Some(fraction) = fraction {
        if fraction.is_empty() {
            return None;
        }
        words.push(' ');
        words.push_str(speller.decimal_point);
        for c in fraction.chars() {
            let d = c.to_digit(10)? as usize;
            words.push(' ');
            words.push_str(speller.digits[d]);
        }
    }
    Some(words)
}

fn english_integer(value: u64) -> String {
    if value == 0 {
        return ONES[0].to_string();
    }

    let mut groups = Vec::new();
    let mut rest = value;
    while rest > 0 {
        groups.push((rest % 1000) as usize);
        rest /= 1000;
    }

    let mut parts: Vec<String> = Vec::new();
    for (scale, &group) in groups.iter().enumerate().rev() {
        if group == 0 {
            continue;
        }
        let mut part = english_below_thousand(group);
        if scale > 0 {
            part.push(' ');
            part.push_str(SCALES[scale]);
        }
        parts.push(part);
    }

    let units = groups[0];
    if value >= 1000 && units > 0 && units < 100 && parts.len() > 1 {
        let last = parts.pop().unwrap_or_default();
        format!("{} and {last}", parts.join(", "))
    } else {
        parts.join(", ")
    }
}

fn english_below_thousand(value: usize) -> String {
    let hundreds = value / 100;
    let rest = value % 100;
    match (hundreds, rest) {
        (0, _) => english_below_hundred(rest),
        (_, 0) => format!("{} hundred", ONES[hundreds]),
        _ => format!(
            "{} hundred and {}",
            ONES[hundreds],
            english_below_hundred(rest)
        ),
    }
}

fn english_below_hundred(value: usize) -> String {
    if value < 20 {
        return ONES[value].to_string();
    }
    let tens = TENS[value / 10];
    match value % 10 {
        0 => tens.to_string(),
        ones => format!("{tens}-{}", ONES[ones]),
    }
}
