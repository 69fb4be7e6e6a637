const UNITS: [&str; 20] = [
    "zero",
    "um",
    "dois",
    "três",
    "quatro",
    "cinco",
    "seis",
    "sete",
    "oito",
    "nove",
    "dez",
    "onze",
    "doze",
    "treze",
    "catorze",
    "quinze",
    "dezasseis",
    "dezassete",
    "dezoito",
    "dezanove",
];

const TENS: [&str; 10] = [
    "", "", "vinte", "trinta", "quarenta", "cinquenta", "sessenta", "setenta", "oitenta",
    "noventa",
];

const HUNDREDS: [&str; 10] = [
    "",
    "cento",
    "duzentos",
    "trezentos",
    "quatrocentos",
    "quinhentos",
    "seiscentos",
    "setecentos",
    "oitocentos",
    "novecentos",
];

pub(super) const DIGITS: [&str; 10] = [
    "zero", "um", "dois", "três", "quatro", "cinco", "seis", "sete", "oito", "nove",
];

fn below_hundred(n: u64) -> String {
    if n < 20 {
        return UNITS[n as usize].to_string();
    }
    let tens = TENS[(n / 10) as usize];
    match n % 10 {
        0 => tens.to_string(),
        unit => format!("{tens} e {}", UNITS[unit as usize]),
    }
}

fn below_thousand(n: u64) -> String {
    match (n / 100, n % 100) {
        (0, rest) => below_hundred(rest),
        (1, 0) => "cem".to_string(),
        (h, 0) => HUNDREDS[h as usize].to_string(),
        (h, rest) => format!("{} e {}", HUNDREDS[h as usize], below_hundred(rest)),
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

    let mut words = String::new();
    match millions {
        0 => {}
        1 => words.push_str("um milhão"),
        m => words.push_str(&format!("{} milhões", below_thousand(m))),
    }
    if thousands > 0 {
        if !words.is_empty() {
            words.push(' ');
        }
        match thousands {
            1 => words.push_str("mil"),
            t => words.push_str(&format!("{} mil", below_thousand(t))),
        }
    }
    if units > 0 {
        // "e" joins a last group that is a round hundred or below one hundred
        if !words.is_empty() {
            words.push_str(if units < 100 || units % 100 == 0 { " e " } else { " " });
        }
        words.push_str(&below_thousand(units));
    }
    Some(words)
}
