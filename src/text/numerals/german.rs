const UNITS: [&str; 20] = [
    "null",
    "eins",
    "zwei",
    "drei",
    "vier",
    "fünf",
    "sechs",
    "sieben",
    "acht",
    "neun",
    "zehn",
    "elf",
    "zwölf",
    "dreizehn",
    "vierzehn",
    "fünfzehn",
    "sechzehn",
    "siebzehn",
    "achtzehn",
    "neunzehn",
];

const TENS: [&str; 10] = [
    "", "", "zwanzig", "dreißig", "vierzig", "fünfzig", "sechzig", "siebzig", "achtzig",
    "neunzig",
];

pub(super) const DIGITS: [&str; 10] = [
    "null", "eins", "zwei", "drei", "vier", "fünf", "sechs", "sieben", "acht", "neun",
];

/// Form of a unit inside a compound: `ein` rather than `eins`.
fn prefix(unit: u64) -> &'static str {
    if unit == 1 {
        "ein"
    } else {
        UNITS[unit as usize]
    }
}

fn below_hundred(n: u64) -> String {
    if n < 20 {
        return UNITS[n as usize].to_string();
    }
    let tens = TENS[(n / 10) as usize];
    match n % 10 {
        0 => tens.to_string(),
        unit => format!("{}und{tens}", prefix(unit)),
    }
}

fn below_thousand(n: u64) -> String {
    let (hundreds, rest) = (n / 100, n % 100);
    let mut words = String::new();
    if hundreds > 0 {
        words.push_str(prefix(hundreds));
        words.push_str("hundert");
    }
    if rest > 0 {
        words.push_str(&below_hundred(rest));
    }
    words
}

fn multiplier(n: u64) -> String {
    let words = below_thousand(n);
    match words.strip_suffix("eins") {
        Some(stem) => format!("{stem}ein"),
        None => words,
    }
}

pub(super) fn integer(value: u64) -> Option<String> {
    if value >= 1_000_000_000 {
        return None;
    }
    if value == 0 {
        return Some(UNITS[0].to_string());
    }
    let millions = value / 1_000_000;
    let thousands = value / 1_000 % 1_000;
    let units = value % 1_000;

    let mut below_million = String::new();
    if thousands > 0 {
        below_million.push_str(&multiplier(thousands));
        below_million.push_str("tausend");
    }
    if units > 0 {
        below_million.push_str(&below_thousand(units));
    }

    let mut parts = Vec::new();
    match millions {
        0 => {}
        1 => parts.push("eine million".to_string()),
        m => parts.push(format!("{} millionen", multiplier(m))),
    }
    if !below_million.is_empty() {
        parts.push(below_million);
    }
    Some(parts.join(" "))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn units_come_before_tens() {
        assert_eq!(integer(12).as_deref(), Some("zwölf"));
        assert_eq!(integer(21).as_deref(), Some("einundzwanzig"));
        assert_eq!(integer(99).as_deref(), Some("neunundneunzig"));
    }

    #[test]
    fn compounds_use_ein() {
        assert_eq!(integer(101).as_deref(), Some("einhunderteins"));
        assert_eq!(integer(1_000).as_deref(), Some("eintausend"));
        assert_eq!(integer(21_500).as_deref(), Some("einundzwanzigtausendfünfhundert"));
        assert_eq!(integer(3_000_000).as_deref(), Some("drei millionen"));
    }
}
