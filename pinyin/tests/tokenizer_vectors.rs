// End-to-end tokenizer behaviour through the public API.
//
// Fixture dictionaries are built in code; Latin segmentation uses the
// built-in syllable list.

use std::sync::Arc;

use pinyin_analysis::{
    CharTable, Dictionaries, PhraseTrie, PinyinFormat, PinyinTokenizer, SyllableDict, Token,
    TokenizerConfig,
};

fn dictionaries() -> Arc<Dictionaries> {
    let chars = CharTable::from_entries([
        ('刘', "liu2"),
        ('德', "de2"),
        ('华', "hua2"),
        ('中', "zhong1,zhong4"),
        ('国', "guo2"),
        ('人', "ren2"),
        ('长', "zhang3,chang2"),
        ('江', "jiang1"),
    ]);
    let mut phrases = PhraseTrie::new();
    phrases.insert("中国人", vec!["zhong1".into(), "guo2".into(), "ren2".into()]);
    Arc::new(Dictionaries::new(phrases, chars, SyllableDict::builtin()))
}

fn tokenizer(config: TokenizerConfig) -> PinyinTokenizer {
    PinyinTokenizer::new(dictionaries(), config).unwrap()
}

fn terms(tokenizer: &PinyinTokenizer, text: &str) -> Vec<String> {
    tokenizer.tokenize(text).map(|t| t.term).collect()
}

#[test]
fn output_is_deterministic() {
    let config = TokenizerConfig {
        keep_original: true,
        keep_joined_full_pinyin: true,
        keep_separate_chinese: true,
        ignore_offset_tracking: false,
        ..TokenizerConfig::default()
    };
    let text = "刘德华 DJ liudehua 中国人2024";
    let a: Vec<Token> = tokenizer(config.clone()).tokenize(text).collect();
    let b: Vec<Token> = tokenizer(config).tokenize(text).collect();
    assert!(!a.is_empty());
    assert_eq!(a, b);
}

#[test]
fn position_increments_follow_candidate_positions() {
    let t = tokenizer(TokenizerConfig::default());
    let tokens: Vec<(String, usize)> = t
        .tokenize("刘德华")
        .map(|t| (t.term, t.position_increment))
        .collect();
    assert_eq!(
        tokens,
        vec![
            ("de".to_string(), 2),
            ("hua".to_string(), 1),
            ("ldh".to_string(), 0),
            ("liu".to_string(), 0),
        ]
    );
}

#[test]
fn offsets_reported_only_when_tracked() {
    let ignored = tokenizer(TokenizerConfig::default());
    assert!(ignored
        .tokenize("刘德华")
        .all(|t| t.start_offset == 0 && t.end_offset == 0));

    let tracked = tokenizer(TokenizerConfig {
        ignore_offset_tracking: false,
        keep_first_letter: false,
        ..TokenizerConfig::default()
    });
    let spans: Vec<(String, usize, usize)> = tracked
        .tokenize("刘德华")
        .map(|t| (t.term, t.start_offset, t.end_offset))
        .collect();
    assert_eq!(
        spans,
        vec![
            ("de".to_string(), 3, 6),
            ("hua".to_string(), 6, 9),
            ("liu".to_string(), 0, 3),
        ]
    );
}

#[test]
fn duplicate_terms_collapse_when_asked() {
    let config = TokenizerConfig {
        keep_first_letter: false,
        ..TokenizerConfig::default()
    };
    let keep = tokenizer(config.clone());
    assert_eq!(terms(&keep, "中国中国"), vec!["guo", "guo", "zhong", "zhong"]);

    let dedup = tokenizer(TokenizerConfig {
        remove_duplicate_term: true,
        ..config
    });
    assert_eq!(terms(&dedup, "中国中国"), vec!["guo", "zhong"]);
}

#[test]
fn phrase_override_reaches_tokens() {
    let dicts = dictionaries();
    let t = PinyinTokenizer::new(dicts.clone(), TokenizerConfig::default())
        .unwrap()
        .with_format(PinyinFormat::tone_number());
    assert_eq!(terms(&t, "长江"), vec!["jiang1", "zhang3", "zj"]);

    dicts.insert_phrase("长江", vec!["chang1".into(), "jiang1".into()]);
    assert_eq!(terms(&t, "长江"), vec!["chang1", "cj", "jiang1"]);
}

#[test]
fn latin_runs_are_segmented() {
    let t = tokenizer(TokenizerConfig {
        keep_first_letter: false,
        ..TokenizerConfig::default()
    });
    let mut expected = vec!["zhong", "hua", "ren", "min", "gong", "he", "guo"];
    expected.sort_unstable();
    assert_eq!(terms(&t, "ZhongHuaRenMinGongHeGuo"), expected);
}

#[test]
fn mixed_script_input() {
    let t = tokenizer(TokenizerConfig::default());
    // the letters of "dj" feed the joined first letters
    assert_eq!(terms(&t, "DJ刘德华"), vec!["d", "de", "djldh", "hua", "j", "liu"]);
}

#[test]
fn digits_stay_whole() {
    let t = tokenizer(TokenizerConfig {
        keep_first_letter: false,
        ..TokenizerConfig::default()
    });
    assert_eq!(terms(&t, "中国2024"), vec!["2024", "guo", "zhong"]);
}

#[test]
fn tone_marks_in_full_pinyin() {
    let t = tokenizer(TokenizerConfig {
        keep_first_letter: false,
        ..TokenizerConfig::default()
    })
    .with_format(PinyinFormat::unicode());
    assert_eq!(terms(&t, "中国人"), vec!["guó", "rén", "zhōng"]);
}

#[test]
fn config_from_toml() {
    let config = TokenizerConfig::from_toml_str(
        "keep_first_letter = false\nkeep_separate_first_letter = true\nremove_duplicated_term = true\n",
    )
    .unwrap();
    let t = tokenizer(config);
    assert_eq!(terms(&t, "刘刘"), vec!["l", "liu"]);
}
