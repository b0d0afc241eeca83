use std::path::PathBuf;

/// Rejected tokenizer configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Every reading-producing output is switched off, so the tokenizer
    /// could never emit a pinyin term.
    #[error(
        "at least one of keep_first_letter, keep_separate_first_letter, keep_full_pinyin, \
         keep_joined_full_pinyin or keep_separate_chinese must be enabled"
    )]
    NoReadingRetained,

    #[error("failed to read config {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid config: {0}")]
    Parse(#[from] toml::de::Error),
}
