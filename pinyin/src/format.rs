//! Output representations for a pinyin reading.

use serde::{Deserialize, Serialize};

/// How the ü vowel is written.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum YuCharType {
    /// `lu:4`, the raw dictionary form
    WithUAndColon,
    /// `lv4`
    WithV,
    /// `lü4`
    WithUUnicode,
}

/// How the tone is written.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ToneType {
    /// Trailing digit 1-5, as stored in the dictionaries.
    WithToneNumber,
    WithoutTone,
    /// Diacritic over the tone-bearing vowel.
    WithToneMark,
    /// First letter only.
    WithAbbr,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CaseType {
    Lowercase,
    Uppercase,
    Capitalize,
}

/// A complete description of one output representation.
///
/// ```
/// use pinyin_analysis::{PinyinFormat, ToneType};
///
/// let fmt = PinyinFormat::unicode();
/// assert_eq!(fmt.tone_type, ToneType::WithToneMark);
/// assert_eq!(fmt.format("da3"), "dǎ");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(default)]
pub struct PinyinFormat {
    pub yu_char_type: YuCharType,
    pub tone_type: ToneType,
    pub case_type: CaseType,
    /// Joins readings when a conversion result is rendered as one string.
    pub separator: String,
    /// Drop positions without a reading instead of keeping them empty.
    pub only_pinyin: bool,
}

impl Default for PinyinFormat {
    fn default() -> Self {
        Self::new(YuCharType::WithUAndColon, ToneType::WithToneNumber)
    }
}

impl PinyinFormat {
    pub fn new(yu_char_type: YuCharType, tone_type: ToneType) -> Self {
        Self {
            yu_char_type,
            tone_type,
            case_type: CaseType::Lowercase,
            separator: " ".to_string(),
            only_pinyin: false,
        }
    }

    /// Tone-numbered readings, `zhong1 guo2`.
    pub fn tone_number() -> Self {
        Self::default()
    }

    /// Tone marks with a Unicode ü, `zhōng guó`.
    pub fn unicode() -> Self {
        Self::new(YuCharType::WithUUnicode, ToneType::WithToneMark)
    }

    /// Tone digits stripped, `zhong guo`.
    pub fn toneless() -> Self {
        Self::new(YuCharType::WithUAndColon, ToneType::WithoutTone)
    }

    /// First letters, `z g`.
    pub fn abbr() -> Self {
        Self::new(YuCharType::WithUAndColon, ToneType::WithAbbr)
    }

    pub fn with_case(mut self, case_type: CaseType) -> Self {
        self.case_type = case_type;
        self
    }

    pub fn with_separator(mut self, separator: impl Into<String>) -> Self {
        self.separator = separator.into();
        self
    }

    pub fn with_only_pinyin(mut self, only_pinyin: bool) -> Self {
        self.only_pinyin = only_pinyin;
        self
    }

    /// Render one raw dictionary reading in this format.
    pub fn format(&self, raw: &str) -> String {
        crate::formatter::format(raw, self)
    }
}

/// Join readings with `separator`, writing `NULL` for positions without one.
///
/// ```
/// use pinyin_analysis::list_to_string;
///
/// let readings = vec!["zhong".to_string(), String::new(), "guo".to_string()];
/// assert_eq!(list_to_string(&readings, " "), "zhong NULL guo");
/// ```
pub fn list_to_string<S: AsRef<str>>(readings: &[S], separator: &str) -> String {
    readings
        .iter()
        .map(|r| {
            let r: &str = r.as_ref();
            if r.is_empty() {
                "NULL"
            } else {
                r
            }
        })
        .collect::<Vec<_>>()
        .join(separator)
}

/// Join readings with `separator`, leaving out empty positions.
pub fn list_to_string_skip_null<S: AsRef<str>>(readings: &[S], separator: &str) -> String {
    readings
        .iter()
        .map(|r| -> &str { r.as_ref() })
        .filter(|r| !r.is_empty())
        .collect::<Vec<_>>()
        .join(separator)
}
