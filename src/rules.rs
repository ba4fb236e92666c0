use std::sync::LazyLock;

use unicode_normalization::UnicodeNormalization;

// Basic shape check: non-whitespace local part, a domain with a dot, and a
// top-level segment of at least two characters.
static EMAIL_RE: LazyLock<fancy_regex::Regex> = LazyLock::new(|| {
    fancy_regex::Regex::new(r#"^[^\s@]+@[^\s@]+\.[^\s@]{2,}$"#)
        .unwrap_or_else(|err| panic!("email pattern failed to compile: {err}"))
});

static SPECIAL_RE: LazyLock<fancy_regex::Regex> = LazyLock::new(|| {
    fancy_regex::Regex::new(r##"[!@#$%^&*(),.?":{}|<>]"##)
        .unwrap_or_else(|err| panic!("special-character pattern failed to compile: {err}"))
});

pub fn email_is_valid(value: &str) -> bool {
    EMAIL_RE.is_match(value).unwrap_or(false)
}

/// The five independent password-strength predicates, evaluated fresh on
/// every call. Each predicate is a pure function of the value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PasswordRules {
    pub length: bool,
    pub upper: bool,
    pub lower: bool,
    pub digit: bool,
    pub special: bool,
}

impl PasswordRules {
    pub fn evaluate(value: &str) -> Self {
        Self {
            length: value.chars().count() >= 8,
            upper: value.chars().any(|ch| ch.is_ascii_uppercase()),
            lower: value.chars().any(|ch| ch.is_ascii_lowercase()),
            digit: value.chars().any(|ch| ch.is_ascii_digit()),
            special: SPECIAL_RE.is_match(value).unwrap_or(false),
        }
    }

    pub fn all_satisfied(&self) -> bool {
        self.length && self.upper && self.lower && self.digit && self.special
    }

    pub fn score(&self) -> usize {
        [self.length, self.upper, self.lower, self.digit, self.special]
            .iter()
            .filter(|ok| **ok)
            .count()
    }

    pub(crate) fn by_name(&self) -> [(&'static str, bool); 5] {
        [
            ("length", self.length),
            ("upper", self.upper),
            ("lower", self.lower),
            ("digit", self.digit),
            ("special", self.special),
        ]
    }
}

// Row-filter matching: NFC-normalize both sides, lowercase, substring.
pub(crate) fn fold_for_search(text: &str) -> String {
    text.nfc().collect::<String>().to_lowercase()
}

pub(crate) fn row_matches_query(row_text: &str, query: &str) -> bool {
    fold_for_search(row_text).contains(&fold_for_search(query))
}
