use anyhow::Result;
use clap::{Args as ClapArgs, Parser, Subcommand};
use lectern::navigation::{resolve_highlight, Highlight};
use lectern::position::{paragraph_range_at, sentence_index_for, word_range_at};
use lectern::reader::{InputReader, ReadStats, ReaderConfig};
use lectern::reading_stats::{is_supported_rate, summary_line, word_count, DEFAULT_RATE, SPEED_OPTIONS};
use lectern::sentence_detector::{normalize_sentence_into, AbbreviationConfig, SentenceDetector, SentenceSpan};
use serde::Serialize;
use std::io::{BufWriter, Write};
use std::ops::Range;
use std::path::{Path, PathBuf};
use tracing::{info, Level};

#[derive(Parser, Debug)]
#[command(name = "lectern")]
#[command(about = "Sentence segmentation and position lookup for read-aloud text")]
#[command(version)]
struct Args {
    /// Log at DEBUG level
    #[arg(long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(ClapArgs, Debug)]
struct InputArgs {
    /// Use memory-mapped I/O instead of async buffered
    #[arg(long)]
    use_mmap: bool,

    /// Abort on first unreadable input
    #[arg(long)]
    fail_fast: bool,

    /// TOML file with extra title/common abbreviations
    #[arg(long)]
    abbreviations: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Split text into sentences (reads stdin when no paths are given)
    Segment {
        paths: Vec<PathBuf>,

        /// Emit one JSON object per sentence instead of TSV
        #[arg(long)]
        json: bool,

        #[command(flatten)]
        input: InputArgs,
    },
    /// Resolve a byte offset to its sentence, word and paragraph
    Locate {
        path: PathBuf,

        #[arg(long)]
        offset: usize,

        #[command(flatten)]
        input: InputArgs,
    },
    /// Word count and estimated read-aloud time
    Stats {
        path: Option<PathBuf>,

        #[arg(long, default_value_t = DEFAULT_RATE)]
        rate: f64,

        #[command(flatten)]
        input: InputArgs,
    },
}

#[derive(Serialize)]
struct SentenceRecord<'a> {
    source: &'a str,
    index: usize,
    start: usize,
    end: usize,
    text: &'a str,
}

#[derive(Serialize)]
struct LocateReport<'a> {
    offset: usize,
    sentence_index: Option<usize>,
    sentence: Option<SentenceSpan<'a>>,
    word: Range<usize>,
    paragraph: Range<usize>,
    highlight: Highlight,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    // WHY: structured JSON logging on stderr keeps stdout clean for sentence output
    tracing_subscriber::fmt()
        .with_target(false)
        .with_max_level(if args.verbose { Level::DEBUG } else { Level::INFO })
        .with_writer(std::io::stderr)
        .json()
        .init();

    info!(?args, "Parsed CLI arguments");

    match args.command {
        Command::Segment { paths, json, input } => run_segment(&paths, json, &input).await,
        Command::Locate { path, offset, input } => run_locate(&path, offset, &input).await,
        Command::Stats { path, rate, input } => run_stats(path.as_deref(), rate, &input).await,
    }
}

fn build_detector(input: &InputArgs) -> Result<SentenceDetector> {
    match &input.abbreviations {
        Some(path) => {
            let config = AbbreviationConfig::load(path)?;
            info!("Loaded abbreviation dictionary from {}", path.display());
            Ok(SentenceDetector::with_abbreviations(&config))
        }
        None => Ok(SentenceDetector::with_default_rules()),
    }
}

fn build_reader(input: &InputArgs) -> InputReader {
    InputReader::new(ReaderConfig {
        fail_fast: input.fail_fast,
        use_mmap: input.use_mmap,
    })
}

async fn read_one(reader: &InputReader, path: Option<&Path>) -> Result<(String, ReadStats)> {
    match path {
        Some(path) => reader.read_text(path).await,
        None => reader.read_stdin().await,
    }
}

async fn run_segment(paths: &[PathBuf], json: bool, input: &InputArgs) -> Result<()> {
    let detector = build_detector(input)?;
    let reader = build_reader(input);

    let documents = if paths.is_empty() {
        vec![reader.read_stdin().await?]
    } else {
        reader.read_many(paths).await?
    };

    let stdout = std::io::stdout();
    let mut out = BufWriter::new(stdout.lock());
    let mut buffer = String::new();
    let mut failed = 0;

    for (text, stats) in &documents {
        if stats.read_error.is_some() {
            failed += 1;
            continue;
        }
        let spans = detector.detect_sentences(text);
        info!("Segmented {}: {} sentences", stats.source, spans.len());

        for (index, span) in spans.iter().enumerate() {
            if json {
                let record = SentenceRecord {
                    source: &stats.source,
                    index,
                    start: span.start,
                    end: span.end,
                    text: span.text,
                };
                serde_json::to_writer(&mut out, &record)?;
                writeln!(out)?;
            } else {
                normalize_sentence_into(span.text, &mut buffer);
                writeln!(out, "{}\t{}\t({},{})", index, buffer, span.start, span.end)?;
            }
        }
    }
    out.flush()?;

    if failed > 0 {
        anyhow::bail!("{failed} of {} inputs could not be read", documents.len());
    }
    Ok(())
}

async fn run_locate(path: &Path, offset: usize, input: &InputArgs) -> Result<()> {
    let detector = build_detector(input)?;
    let (text, _) = build_reader(input).read_text(path).await?;

    let spans = detector.detect_sentences(&text);
    let sentence_index = (!spans.is_empty()).then(|| sentence_index_for(&spans, &text, offset));
    let report = LocateReport {
        offset,
        sentence_index,
        sentence: sentence_index.and_then(|i| spans.get(i).copied()),
        word: word_range_at(&text, offset),
        paragraph: paragraph_range_at(&text, offset),
        highlight: resolve_highlight(&spans, &text, offset, sentence_index.unwrap_or(0)),
    };

    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}

async fn run_stats(path: Option<&Path>, rate: f64, input: &InputArgs) -> Result<()> {
    if !is_supported_rate(rate) {
        anyhow::bail!("Unsupported rate {rate}; expected one of {SPEED_OPTIONS:?}");
    }
    let detector = build_detector(input)?;
    let (text, _) = read_one(&build_reader(input), path).await?;

    let sentences = detector.detect_sentences(&text).len();
    println!("{}", summary_line(word_count(&text), rate));
    println!("{sentences} sentences");
    Ok(())
}
