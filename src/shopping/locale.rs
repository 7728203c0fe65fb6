//! Locale services used when rendering the shopping list: plural categories,
//! number formatting and string collation.
//!
//! Only Russian carries real data. Any other tag still works but falls back to
//! neutral behavior: no plural rules, plain number formatting, and a collation
//! that puts Latin before Cyrillic.

use std::cmp::Ordering;

const GROUPING_SEPARATOR: char = '\u{00A0}';
const MAX_FRACTION_DIGITS: usize = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PluralCategory {
    One,
    Few,
    Many,
    Other,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Locale {
    tag: String,
}

impl Default for Locale {
    fn default() -> Self {
        Self::ru()
    }
}

impl Locale {
    pub fn new(tag: &str) -> Self {
        Self { tag: tag.trim().to_string() }
    }

    pub fn ru() -> Self {
        Self::new("ru-RU")
    }

    pub fn tag(&self) -> &str {
        &self.tag
    }

    fn is_russian(&self) -> bool {
        self.tag
            .split(['-', '_'])
            .next()
            .map(|lang| lang.eq_ignore_ascii_case("ru"))
            .unwrap_or(false)
    }

    /// CLDR plural category for `value`, or `None` when this locale has no rules.
    pub fn plural_category(&self, value: f64) -> Option<PluralCategory> {
        if !self.is_russian() {
            return None;
        }
        Some(russian_plural_category(value))
    }

    /// Formats a quantity for display (`1 500,5`, `12 000`, `0,333`).
    pub fn format_number(&self, value: f64) -> String {
        if !self.is_russian() {
            return format!("{}", value);
        }
        if value.is_nan() {
            return "не число".to_string();
        }
        if value.is_infinite() {
            return if value < 0.0 { "-∞".to_string() } else { "∞".to_string() };
        }

        let (int_part, frac_part) = round_decimal(&format!("{}", value.abs()), MAX_FRACTION_DIGITS);
        let mut out = String::new();
        if value < 0.0 {
            out.push('-');
        }
        out.push_str(&group_digits(&int_part));
        if !frac_part.is_empty() {
            out.push(',');
            out.push_str(&frac_part);
        }
        out
    }

    /// Locale-aware string comparison.
    pub fn compare(&self, a: &str, b: &str) -> Ordering {
        let cyrillic_first = self.is_russian();
        let ka = collation_key(a, cyrillic_first);
        let kb = collation_key(b, cyrillic_first);
        ka.primary
            .cmp(&kb.primary)
            .then_with(|| ka.secondary.cmp(&kb.secondary))
            .then_with(|| ka.tertiary.cmp(&kb.tertiary))
            .then_with(|| a.cmp(b))
    }
}

fn russian_plural_category(value: f64) -> PluralCategory {
    let n = value.abs();
    if !n.is_finite() || n.fract() != 0.0 {
        return PluralCategory::Other;
    }
    let mod10 = n % 10.0;
    let mod100 = n % 100.0;
    if mod10 == 1.0 && mod100 != 11.0 {
        PluralCategory::One
    } else if (2.0..=4.0).contains(&mod10) && !(12.0..=14.0).contains(&mod100) {
        PluralCategory::Few
    } else {
        PluralCategory::Many
    }
}

/// Rounds a plain decimal string half away from zero to `max_digits` fraction
/// digits and drops trailing zeros.
fn round_decimal(plain: &str, max_digits: usize) -> (String, String) {
    let (int_part, frac_part) = plain.split_once('.').unwrap_or((plain, ""));
    let mut int_digits: Vec<u8> = int_part.bytes().map(|b| b - b'0').collect();
    let mut frac_digits: Vec<u8> = frac_part.bytes().map(|b| b - b'0').collect();

    if frac_digits.len() > max_digits {
        let round_up = frac_digits[max_digits] >= 5;
        frac_digits.truncate(max_digits);
        if round_up {
            let mut carry = true;
            for d in frac_digits.iter_mut().rev().chain(int_digits.iter_mut().rev()) {
                if *d == 9 {
                    *d = 0;
                } else {
                    *d += 1;
                    carry = false;
                    break;
                }
            }
            if carry {
                int_digits.insert(0, 1);
            }
        }
    }
    while frac_digits.last() == Some(&0) {
        frac_digits.pop();
    }

    let to_string = |digits: &[u8]| digits.iter().map(|d| char::from(b'0' + d)).collect::<String>();
    (to_string(&int_digits), to_string(&frac_digits))
}

// Thousands are grouped once the integer part has more than three digits.
fn group_digits(int_part: &str) -> String {
    if int_part.len() <= 3 {
        return int_part.to_string();
    }
    let mut out = String::with_capacity(int_part.len() + int_part.len() / 3 * 2);
    for (idx, ch) in int_part.chars().enumerate() {
        if idx > 0 && (int_part.len() - idx) % 3 == 0 {
            out.push(GROUPING_SEPARATOR);
        }
        out.push(ch);
    }
    out
}

struct CollationKey {
    primary: Vec<(u8, u32)>,
    secondary: Vec<u8>,
    tertiary: Vec<u8>,
}

// Primary groups
const GROUP_PUNCT: u8 = 0;
const GROUP_DIGIT: u8 = 1;
const GROUP_OTHER: u8 = 4;

fn collation_key(s: &str, cyrillic_first: bool) -> CollationKey {
    let (cyrillic_group, latin_group) = if cyrillic_first { (2, 3) } else { (3, 2) };
    let mut key = CollationKey {
        primary: Vec::with_capacity(s.len()),
        secondary: Vec::with_capacity(s.len()),
        tertiary: Vec::with_capacity(s.len()),
    };

    for ch in s.chars() {
        let (primary, secondary, tertiary) = match ch {
            '0'..='9' => ((GROUP_DIGIT, ch as u32), 0, 0),
            'a'..='z' => ((latin_group, ch as u32), 0, 0),
            'A'..='Z' => ((latin_group, ch.to_ascii_lowercase() as u32), 0, 1),
            'ё' => ((cyrillic_group, 'е' as u32), 1, 0),
            'Ё' => ((cyrillic_group, 'е' as u32), 1, 1),
            'а'..='я' => ((cyrillic_group, ch as u32), 0, 0),
            'А'..='Я' => ((cyrillic_group, ch as u32 + 0x20), 0, 1),
            // Remaining Cyrillic letters (і, ї, є, ...) sort after я.
            '\u{0400}'..='\u{04FF}' => {
                let lower = ch.to_lowercase().next().unwrap_or(ch);
                let tertiary = u8::from(lower != ch);
                ((cyrillic_group, 0x1000 + lower as u32), 0, tertiary)
            }
            c if c.is_whitespace() || c.is_ascii_punctuation() || is_general_punctuation(c) => {
                ((GROUP_PUNCT, c as u32), 0, 0)
            }
            c => ((GROUP_OTHER, c as u32), 0, 0),
        };
        key.primary.push(primary);
        key.secondary.push(secondary);
        key.tertiary.push(tertiary);
    }
    key
}

fn is_general_punctuation(c: char) -> bool {
    matches!(c, '\u{00A0}'..='\u{00BF}' | '\u{2000}'..='\u{206F}')
}
