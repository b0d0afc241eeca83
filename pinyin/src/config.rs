use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Options controlling which terms the tokenizer emits.
///
/// Field names follow the widely used pinyin analysis plugin settings, so an
/// existing analyzer definition can be carried over as TOML:
///
/// ```rust
/// use pinyin_analysis::TokenizerConfig;
///
/// let config = TokenizerConfig::from_toml_str(
///     "keep_original = true\nremove_duplicated_term = true\n",
/// ).unwrap();
/// assert!(config.keep_original);
/// assert!(config.remove_duplicate_term);
/// assert!(config.keep_full_pinyin); // defaults fill the rest
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct TokenizerConfig {
    // Chinese readings
    pub keep_first_letter: bool,           // 刘德华 -> ldh
    pub keep_separate_first_letter: bool,  // 刘德华 -> l, d, h
    pub keep_full_pinyin: bool,            // 刘德华 -> liu, de, hua
    pub keep_joined_full_pinyin: bool,     // 刘德华 -> liudehua
    pub keep_original: bool,
    pub keep_separate_chinese: bool,       // 刘德华 -> 刘, 德, 华

    // Latin and digit runs
    pub keep_none_chinese: bool,
    pub keep_none_chinese_together: bool,  // DJ -> dj rather than d, j
    pub keep_none_chinese_in_first_letter: bool,
    pub keep_none_chinese_in_joined_full_pinyin: bool,
    pub none_chinese_pinyin_tokenize: bool, // liudehua -> liu, de, hua

    // Term normalization
    pub lowercase: bool,
    pub trim_whitespace: bool,
    #[serde(alias = "remove_duplicated_term")]
    pub remove_duplicate_term: bool,
    /// Cap on the joined first-letter term, in characters. 0 disables it.
    pub limit_first_letter_length: usize,
    /// Longest emitted term, in characters. 0 disables it.
    pub max_token_length: usize,

    // Offsets
    #[serde(alias = "ignore_pinyin_offset")]
    pub ignore_offset_tracking: bool,
    /// Give each Latin segment a one-byte offset span.
    pub fixed_pinyin_offset: bool,
}

impl Default for TokenizerConfig {
    fn default() -> Self {
        Self {
            keep_first_letter: true,
            keep_separate_first_letter: false,
            keep_full_pinyin: true,
            keep_joined_full_pinyin: false,
            keep_original: false,
            keep_separate_chinese: false,

            keep_none_chinese: true,
            keep_none_chinese_together: true,
            keep_none_chinese_in_first_letter: true,
            keep_none_chinese_in_joined_full_pinyin: false,
            none_chinese_pinyin_tokenize: true,

            lowercase: true,
            trim_whitespace: true,
            remove_duplicate_term: false,
            limit_first_letter_length: 16,
            max_token_length: 255,

            ignore_offset_tracking: true,
            fixed_pinyin_offset: false,
        }
    }
}

impl TokenizerConfig {
    /// Check that at least one reading-producing output is enabled.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let retains_reading = self.keep_first_letter
            || self.keep_separate_first_letter
            || self.keep_full_pinyin
            || self.keep_joined_full_pinyin
            || self.keep_separate_chinese;
        if retains_reading {
            Ok(())
        } else {
            Err(ConfigError::NoReadingRetained)
        }
    }

    /// Load and validate configuration from a TOML file.
    pub fn load_toml<P: AsRef<std::path::Path>>(path: P) -> Result<Self, ConfigError> {
        let p = path.as_ref();
        let content = std::fs::read_to_string(p).map_err(|source| ConfigError::Read {
            path: p.to_path_buf(),
            source,
        })?;
        let config = Self::from_toml_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Parse configuration from a TOML string. Missing keys take defaults.
    pub fn from_toml_str(content: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(content)
    }

    /// Serialize configuration to a TOML string.
    pub fn to_toml_string(&self) -> Result<String, toml::ser::Error> {
        toml::to_string_pretty(self)
    }
}
