const UNITS: [&str; 20] = [
    "zero",
    "uno",
    "due",
    "tre",
    "quattro",
    "cinque",
    "sei",
    "sette",
    "otto",
    "nove",
    "dieci",
    "undici",
    "dodici",
    "tredici",
    "quattordici",
    "quindici",
    "sedici",
    "diciassette",
    "diciotto",
    "diciannove",
];

const TENS: [&str; 10] = [
    "", "", "venti", "trenta", "quaranta", "cinquanta", "sessanta", "settanta", "ottanta",
    "novanta",
];

pub(super) const DIGITS: [&str; 10] = [
    "zero", "uno", "due", "tre", "quattro", "cinque", "sei", "sette", "otto", "nove",
];

fn below_hundred(n: u64) -> String {
    if n < 20 {
        return UNITS[n as usize].to_string();
    }
    let tens = TENS[(n / 10) as usize];
    match n % 10 {
        0 => tens.to_string(),
        // ventuno, trentotto
        unit @ (1 | 8) => format!("{}{}", &tens[..tens.len() - 1], UNITS[unit as usize]),
        3 => format!("{tens}tré"),
        unit => format!("{tens}{}", UNITS[unit as usize]),
    }
}

fn below_thousand(n: u64) -> String {
    let (hundreds, rest) = (n / 100, n % 100);
    let head = match hundreds {
        0 => return below_hundred(rest),
        1 => "cento".to_string(),
        h => format!("{}cento", UNITS[h as usize]),
    };
    match rest {
        0 => head,
        3 => format!("{head}tré"),
        r => format!("{head}{}", below_hundred(r)),
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

    let mut below_million = match thousands {
        0 => String::new(),
        1 => "mille".to_string(),
        t => format!("{}mila", below_thousand(t)),
    };
    if units > 0 {
        below_million.push_str(&below_thousand(units));
    }

    let mut parts = Vec::new();
    match millions {
        0 => {}
        1 => parts.push("un milione".to_string()),
        m => parts.push(format!("{} milioni", below_thousand(m))),
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
    fn tens_elide_before_uno_and_otto() {
        assert_eq!(integer(12).as_deref(), Some("dodici"));
        assert_eq!(integer(21).as_deref(), Some("ventuno"));
        assert_eq!(integer(38).as_deref(), Some("trentotto"));
        assert_eq!(integer(23).as_deref(), Some("ventitré"));
        assert_eq!(integer(45).as_deref(), Some("quarantacinque"));
    }

    #[test]
    fn thousands_join_into_one_word() {
        assert_eq!(integer(1_200).as_deref(), Some("milleduecento"));
        assert_eq!(integer(3_000).as_deref(), Some("tremila"));
        assert_eq!(integer(2_000_005).as_deref(), Some("due milioni cinque"));
    }
}
