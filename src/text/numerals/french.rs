const UNITS: [&str; 17] = [
    "zéro", "un", "deux", "trois", "quatre", "cinq", "six", "sept", "huit", "neuf", "dix", "onze",
    "douze", "treize", "quatorze", "quinze", "seize",
];

const TENS: [&str; 7] = ["", "", "vingt", "trente", "quarante", "cinquante", "soixante"];

pub(super) const DIGITS: [&str; 10] = [
    "zéro", "un", "deux", "trois", "quatre", "cinq", "six", "sept", "huit", "neuf",
];

fn below_hundred(n: u64) -> String {
    match n {
        0..=16 => UNITS[n as usize].to_string(),
        17..=19 => format!("dix-{}", UNITS[(n - 10) as usize]),
        71 => "soixante et onze".to_string(),
        70..=79 => format!("soixante-{}", below_hundred(n - 60)),
        80 => "quatre-vingts".to_string(),
        81..=99 => format!("quatre-vingt-{}", below_hundred(n - 80)),
        _ => {
            let tens = TENS[(n / 10) as usize];
            match n % 10 {
                0 => tens.to_string(),
                1 => format!("{tens} et un"),
                unit => format!("{tens}-{}", UNITS[unit as usize]),
            }
        }
    }
}

/// `cents` only takes the plural when nothing follows it.
fn below_thousand(n: u64, trailing: bool) -> String {
    let (hundreds, rest) = (n / 100, n % 100);
    let head = match hundreds {
        0 => return below_hundred(rest),
        1 => "cent".to_string(),
        h if rest == 0 && trailing => format!("{} cents", UNITS[h as usize]),
        h => format!("{} cent", UNITS[h as usize]),
    };
    if rest == 0 {
        head
    } else {
        format!("{head} {}", below_hundred(rest))
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

    let mut parts = Vec::new();
    match millions {
        0 => {}
        1 => parts.push("un million".to_string()),
        m => parts.push(format!("{} millions", below_thousand(m, true))),
    }
    match thousands {
        0 => {}
        1 => parts.push("mille".to_string()),
        t => parts.push(format!("{} mille", below_thousand(t, false))),
    }
    if units > 0 {
        parts.push(below_thousand(units, true));
    }
    Some(parts.join(" "))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tens_follow_the_vigesimal_forms() {
        assert_eq!(integer(12).as_deref(), Some("douze"));
        assert_eq!(integer(21).as_deref(), Some("vingt et un"));
        assert_eq!(integer(71).as_deref(), Some("soixante et onze"));
        assert_eq!(integer(77).as_deref(), Some("soixante-dix-sept"));
        assert_eq!(integer(80).as_deref(), Some("quatre-vingts"));
        assert_eq!(integer(91).as_deref(), Some("quatre-vingt-onze"));
    }

    #[test]
    fn hundreds_and_thousands() {
        assert_eq!(integer(200).as_deref(), Some("deux cents"));
        assert_eq!(integer(205).as_deref(), Some("deux cent cinq"));
        assert_eq!(integer(1_200).as_deref(), Some("mille deux cents"));
        assert_eq!(integer(200_000).as_deref(), Some("deux cent mille"));
        assert_eq!(integer(2_000_001).as_deref(), Some("deux millions un"));
        assert_eq!(integer(1_000_000_000), None);
    }
}
