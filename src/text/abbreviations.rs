//! Per-language abbreviation tables, matched after case folding.

const EN: &[(&str, &str)] = &[
    ("dr.", "doctor"),
    ("mr.", "mister"),
    ("mrs.", "missus"),
    ("prof.", "professor"),
];

const ES: &[(&str, &str)] = &[
    ("dr.", "doctor"),
    ("sr.", "señor"),
    ("sra.", "señora"),
    ("prof.", "profesor"),
];

const FR: &[(&str, &str)] = &[
    ("dr.", "docteur"),
    ("m.", "monsieur"),
    ("mme.", "madame"),
    ("prof.", "professeur"),
];

const DE: &[(&str, &str)] = &[("dr.", "doktor"), ("prof.", "professor")];

const IT: &[(&str, &str)] = &[("dr.", "dottore"), ("prof.", "professore")];

const PT: &[(&str, &str)] = &[("dr.", "doutor"), ("prof.", "professor")];

/// Returns `(abbreviation, expansion)` pairs for `language`, if it has any.
pub fn table(language: &str) -> Option<&'static [(&'static str, &'static str)]> {
    match language {
        "en" => Some(EN),
        "es" => Some(ES),
        "fr" => Some(FR),
        "de" => Some(DE),
        "it" => Some(IT),
        "pt" => Some(PT),
        _ => None,
    }
}
