// Formatting of raw dictionary readings.
//
// Raw readings are lowercase ASCII with an optional trailing tone digit and
// `u:` for ü (`lu:4`, `zhong1`, `de5`). Everything here is a pure function of
// the reading and the requested `PinyinFormat`.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::format::{CaseType, PinyinFormat, ToneType, YuCharType};

static TONE_DIGITS: Lazy<Regex> = Lazy::new(|| Regex::new("[1-5]").expect("valid tone digit regex"));

static READING_SHAPE: Lazy<Regex> =
    Lazy::new(|| Regex::new("^[a-z]*[1-5]?$").expect("valid reading shape regex"));

/// Marked forms per vowel, indexed by tone - 1. Tone 5 is the bare vowel.
static MARKED_VOWELS: phf::Map<char, [char; 5]> = phf::phf_map! {
    'a' => ['ā', 'á', 'ǎ', 'à', 'a'],
    'e' => ['ē', 'é', 'ě', 'è', 'e'],
    'i' => ['ī', 'í', 'ǐ', 'ì', 'i'],
    'o' => ['ō', 'ó', 'ǒ', 'ò', 'o'],
    'u' => ['ū', 'ú', 'ǔ', 'ù', 'u'],
    'v' => ['ǖ', 'ǘ', 'ǚ', 'ǜ', 'ü'],
};

/// Render `raw` according to `format`.
///
/// Abbreviation short-circuits everything else. Tone marks force the
/// Unicode ü. Case folding is applied last.
///
/// # Example
/// ```
/// use pinyin_analysis::formatter::format;
/// use pinyin_analysis::{PinyinFormat, ToneType, YuCharType};
///
/// assert_eq!(format("lv4", &PinyinFormat::unicode()), "lǜ");
/// assert_eq!(format("zhong1", &PinyinFormat::toneless()), "zhong");
/// let with_v = PinyinFormat::new(YuCharType::WithV, ToneType::WithToneNumber);
/// assert_eq!(format("lu:4", &with_v), "lv4");
/// ```
pub fn format(raw: &str, format: &PinyinFormat) -> String {
    if raw.is_empty() {
        return String::new();
    }
    if format.tone_type == ToneType::WithAbbr {
        return abbr(raw);
    }

    let formatted = match format.tone_type {
        ToneType::WithoutTone => TONE_DIGITS.replace_all(raw, "").into_owned(),
        ToneType::WithToneMark => tone_number_to_mark(&raw.replace("u:", "v")),
        ToneType::WithToneNumber | ToneType::WithAbbr => raw.to_string(),
    };

    let formatted = if format.tone_type == ToneType::WithToneMark {
        formatted
    } else {
        match format.yu_char_type {
            YuCharType::WithV => formatted.replace("u:", "v"),
            YuCharType::WithUUnicode => formatted.replace("u:", "ü"),
            YuCharType::WithUAndColon => formatted,
        }
    };

    match format.case_type {
        CaseType::Uppercase => formatted.to_uppercase(),
        CaseType::Capitalize => capitalize(&formatted),
        CaseType::Lowercase => formatted,
    }
}

/// First codepoint of `reading`.
pub fn abbr(reading: &str) -> String {
    reading.chars().next().map(String::from).unwrap_or_default()
}

fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Replace the trailing tone digit with a diacritic on the tone-bearing
/// vowel: `a`, else `e`, else the `o` of `ou`, else the last vowel.
fn tone_number_to_mark(reading: &str) -> String {
    let lower = reading.to_lowercase();
    if !READING_SHAPE.is_match(&lower) {
        return lower;
    }

    let tone = match lower.chars().last().and_then(|c| c.to_digit(10)) {
        Some(tone) => tone as usize,
        None => return lower.replace('v', "ü"),
    };
    let body = &lower[..lower.len() - 1];

    let vowel_at = body
        .find('a')
        .or_else(|| body.find('e'))
        .or_else(|| body.find("ou"))
        .or_else(|| body.rfind(|c| "aeiouv".contains(c)));

    let Some(idx) = vowel_at else {
        return lower;
    };
    // body is ASCII, so byte indices are char indices
    let vowel = char::from(body.as_bytes()[idx]);
    let Some(marks) = MARKED_VOWELS.get(&vowel) else {
        return lower;
    };

    let mut out = String::with_capacity(body.len() + 2);
    out.push_str(&body[..idx].replace('v', "ü"));
    out.push(marks[tone - 1]);
    out.push_str(&body[idx + 1..].replace('v', "ü"));
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn marked(raw: &str) -> String {
        format(raw, &PinyinFormat::unicode())
    }

    #[test]
    fn test_tone_mark_vowel_precedence() {
        assert_eq!(marked("da3"), "dǎ");
        assert_eq!(marked("hao3"), "hǎo");
        assert_eq!(marked("xue2"), "xué");
        assert_eq!(marked("gou3"), "gǒu");
        assert_eq!(marked("liu2"), "liú");
        assert_eq!(marked("gui4"), "guì");
        assert_eq!(marked("zhong1"), "zhōng");
    }

    #[test]
    fn test_tone_mark_umlaut() {
        assert_eq!(marked("lv4"), "lǜ");
        assert_eq!(marked("lu:4"), "lǜ");
        assert_eq!(marked("nve4"), "nüè");
        assert_eq!(marked("lv"), "lü");
    }

    #[test]
    fn test_neutral_tone_keeps_plain_vowel() {
        assert_eq!(marked("de5"), "de");
        assert_eq!(marked("ma5"), "ma");
    }

    #[test]
    fn test_tone_mark_ignores_unexpected_shapes() {
        assert_eq!(marked("ng2"), "ng2");
        assert_eq!(marked("a-b1"), "a-b1");
    }

    #[test]
    fn test_without_tone_and_yu_types() {
        let toneless = PinyinFormat::toneless();
        assert_eq!(format("lu:4", &toneless), "lu:");
        let toneless_v = PinyinFormat::new(YuCharType::WithV, ToneType::WithoutTone);
        assert_eq!(format("lu:4", &toneless_v), "lv");
        let unicode_num = PinyinFormat::new(YuCharType::WithUUnicode, ToneType::WithToneNumber);
        assert_eq!(format("lu:4", &unicode_num), "lü4");
        assert_eq!(format("lu:4", &PinyinFormat::tone_number()), "lu:4");
    }

    #[test]
    fn test_abbr_ignores_everything_else() {
        let fmt = PinyinFormat::abbr().with_case(CaseType::Uppercase);
        assert_eq!(format("zhong1", &fmt), "z");
        assert_eq!(abbr("ǎi"), "ǎ");
        assert_eq!(format("", &fmt), "");
    }

    #[test]
    fn test_case_types() {
        let upper = PinyinFormat::unicode().with_case(CaseType::Uppercase);
        assert_eq!(format("lv4", &upper), "LǛ");
        let cap = PinyinFormat::toneless().with_case(CaseType::Capitalize);
        assert_eq!(format("zhong1", &cap), "Zhong");
    }
}
