//! Tokenize text from stdin into pinyin index terms
//!
//! Each input line is analyzed independently. Output is one token per line,
//! tab-separated (`term start end increment`) or JSON with `--json`; a blank
//! line separates inputs.
//!
//! Usage:
//!   echo 刘德华 | cargo run -p pinyin-analysis -- --dict-dir data/pinyin
//!   echo 中国 | cargo run -p pinyin-analysis -- --dict-dir data/pinyin --convert --format unicode
//!   cargo run -p pinyin-analysis -- --dict-dir data/pinyin --save-snapshot data/pinyin.bincode

use std::io::{self, BufRead, BufWriter, Write};
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use pinyin_analysis::{list_to_string, Dictionaries, PinyinFormat, PinyinTokenizer, TokenizerConfig};

#[derive(clap::Parser, Debug)]
#[command(name = "pinyin-analyze")]
#[command(about = "Tokenize lines from stdin into pinyin index terms")]
struct Args {
    /// Directory holding pinyin.txt, polyphone.txt and pinyin_alphabet.dict
    #[arg(short, long)]
    dict_dir: Option<PathBuf>,

    /// Bincode dictionary snapshot (used instead of --dict-dir)
    #[arg(long)]
    snapshot: Option<PathBuf>,

    /// Write the loaded dictionaries to a snapshot and exit
    #[arg(long)]
    save_snapshot: Option<PathBuf>,

    /// Tokenizer options as TOML
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Reading format: toneless, tone-number, unicode or abbr
    #[arg(short, long, default_value = "toneless")]
    format: String,

    /// Print per-character readings instead of tokens
    #[arg(long)]
    convert: bool,

    /// Print tokens as JSON lines
    #[arg(long)]
    json: bool,
}

fn parse_format(name: &str) -> anyhow::Result<PinyinFormat> {
    match name {
        "toneless" => Ok(PinyinFormat::toneless()),
        "tone-number" => Ok(PinyinFormat::tone_number()),
        "unicode" => Ok(PinyinFormat::unicode()),
        "abbr" => Ok(PinyinFormat::abbr()),
        _ => anyhow::bail!(
            "Unsupported format: {}. Use 'toneless', 'tone-number', 'unicode' or 'abbr'",
            name
        ),
    }
}

fn load_dictionaries(args: &Args) -> anyhow::Result<Dictionaries> {
    if let Some(path) = &args.snapshot {
        let dicts = Dictionaries::load_bincode(path)
            .with_context(|| format!("loading snapshot {}", path.display()))?;
        eprintln!("✓ Loaded dictionary snapshot {}", path.display());
        return Ok(dicts);
    }
    match &args.dict_dir {
        Some(dir) => {
            let dicts = Dictionaries::from_dir(dir);
            eprintln!(
                "✓ Loaded {} phrases, {} characters from {}",
                dicts.phrase_count(),
                dicts.chars().len(),
                dir.display()
            );
            Ok(dicts)
        }
        None => {
            eprintln!("ℹ No dictionaries given, only Latin runs will be segmented");
            Ok(Dictionaries::default())
        }
    }
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let format = parse_format(&args.format)?;
    let dicts = load_dictionaries(&args)?;

    if let Some(path) = &args.save_snapshot {
        dicts
            .save_bincode(path)
            .with_context(|| format!("writing snapshot {}", path.display()))?;
        eprintln!("✓ Wrote snapshot {}", path.display());
        return Ok(());
    }

    let config = match &args.config {
        Some(path) => TokenizerConfig::load_toml(path)?,
        None => TokenizerConfig::default(),
    };
    let tokenizer = PinyinTokenizer::new(Arc::new(dicts), config)?.with_format(format);

    let stdin = io::stdin();
    let mut out = BufWriter::new(io::stdout().lock());

    for line in stdin.lock().lines() {
        let line = line.context("reading stdin")?;

        if args.convert {
            let readings = tokenizer.dictionaries().convert(&line, tokenizer.format());
            writeln!(out, "{}", list_to_string(&readings, &tokenizer.format().separator))?;
            continue;
        }

        for token in tokenizer.tokenize(&line) {
            if args.json {
                writeln!(out, "{}", serde_json::to_string(&token)?)?;
            } else {
                writeln!(
                    out,
                    "{}\t{}\t{}\t{}",
                    token.term, token.start_offset, token.end_offset, token.position_increment
                )?;
            }
        }
        writeln!(out)?;
    }
    out.flush()?;
    Ok(())
}
