// Copyright (c) 2024-2025 Fulcrum Genomics LLC
// SPDX-License-Identifier: MIT

//! ferro-annotate CLI
//!
//! Command-line interface for annotating genomic variants against a set of
//! transcript models.

use clap::{Parser, Subcommand, ValueEnum};
use ferro_annotate::{
    AnnotateConfig, AnnotateError, Annotator, BatchOutcome, ErrorMode, GenomeBuild, RawVariant,
    ShuffleDirection, TranscriptDb,
};
use serde::Serialize;
use std::fs::File;
use std::io::{self, BufRead, BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "ferro-annotate")]
#[command(author, version, about = "Genomic variant consequence annotator")]
#[command(
    long_about = "Annotate genomic variants with their consequence on overlapping transcripts.

Examples:
  ferro-annotate annotate --transcripts tx.json 14-23896042-C-T
  ferro-annotate annotate --transcripts tx.json -i variants.txt --format json
  ferro-annotate validate --transcripts tx.json"
)]
struct Cli {
    /// Log level or filter directive (overrides RUST_LOG)
    #[arg(long, global = true)]
    log_level: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Annotate variants against transcript models
    Annotate {
        /// Transcript models (JSON array)
        #[arg(short, long)]
        transcripts: PathBuf,

        /// Variants as contig-pos-ref-alt, e.g. 14-23896042-C-T
        variants: Vec<String>,

        /// Input file with one variant per line (use - for stdin)
        #[arg(short, long)]
        input: Option<PathBuf>,

        /// Output format
        #[arg(short = 'f', long, value_enum, default_value_t = OutputFormat::Tsv)]
        format: OutputFormat,

        /// Intronic bases at each exon boundary treated as splice sites
        #[arg(long)]
        splice_window: Option<u64>,

        /// Direction ambiguous indels are shifted (3prime or 5prime)
        #[arg(long)]
        shuffle: Option<ShuffleDirection>,

        /// strict, lenient or silent
        #[arg(long)]
        error_mode: Option<ErrorMode>,

        /// Genome build used to validate contigs (GRCh37 or GRCh38)
        #[arg(long)]
        build: Option<GenomeBuild>,

        /// Configuration file (default: .ferro-annotate.toml, then ~/.config/ferro/annotate.toml)
        #[arg(short, long)]
        config: Option<PathBuf>,
    },

    /// Load and validate a transcript file
    Validate {
        /// Transcript models (JSON array)
        #[arg(short, long)]
        transcripts: PathBuf,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    Tsv,
    Json,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    init_tracing(cli.log_level.as_deref())?;

    match cli.command {
        Commands::Annotate {
            transcripts,
            variants,
            input,
            format,
            splice_window,
            shuffle,
            error_mode,
            build,
            config,
        } => {
            let mut settings = load_config(config.as_deref())?;
            if let Some(width) = splice_window {
                settings.splice_window = width;
            }
            if let Some(direction) = shuffle {
                settings.shuffle_direction = direction;
            }
            if let Some(mode) = error_mode {
                settings.error_mode = mode;
            }
            if let Some(build) = build {
                settings.genome_build = build;
            }
            run_annotate(&transcripts, &variants, input.as_deref(), format, settings)
        }
        Commands::Validate { transcripts } => run_validate(&transcripts),
    }
}

fn init_tracing(level: Option<&str>) -> Result<(), Box<dyn std::error::Error>> {
    use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

    let filter = match level {
        Some(level) => EnvFilter::try_new(level)
            .map_err(|e| format!("Invalid log level '{}': {}", level, e))?,
        None => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
    };

    // `init` also routes `log` records from the library into tracing
    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(io::stderr))
        .try_init()?;
    Ok(())
}

fn load_config(path: Option<&Path>) -> Result<AnnotateConfig, AnnotateError> {
    match path {
        Some(path) => AnnotateConfig::load_from_path(path),
        None => Ok(AnnotateConfig::load()?.unwrap_or_default()),
    }
}

fn load_transcripts(path: &Path) -> Result<TranscriptDb, AnnotateError> {
    let mut db = TranscriptDb::new();
    db.load_json_path(path)?;
    Ok(db)
}

fn run_validate(path: &Path) -> Result<(), Box<dyn std::error::Error>> {
    match load_transcripts(path) {
        Ok(db) => {
            let coding = db.iter().filter(|t| t.is_coding()).count();
            println!(
                "{}: {} transcripts ({} coding, {} noncoding)",
                path.display(),
                db.len(),
                coding,
                db.len() - coding
            );
            Ok(())
        }
        Err(e) => {
            eprintln!("{}", e.detailed_message());
            std::process::exit(1);
        }
    }
}

/// An input line that did or did not parse
enum InputLine {
    Variant(RawVariant),
    Malformed { line: String, error: AnnotateError },
}

fn read_inputs(variants: &[String], input: Option<&Path>) -> io::Result<Vec<InputLine>> {
    let mut lines: Vec<String> = variants.to_vec();
    match input {
        Some(path) if path.as_os_str() == "-" => {
            lines.extend(io::stdin().lock().lines().collect::<io::Result<Vec<_>>>()?);
        }
        Some(path) => {
            let reader = BufReader::new(File::open(path)?);
            lines.extend(reader.lines().collect::<io::Result<Vec<_>>>()?);
        }
        None if variants.is_empty() => {
            lines.extend(io::stdin().lock().lines().collect::<io::Result<Vec<_>>>()?);
        }
        None => {}
    }

    Ok(lines
        .into_iter()
        .filter(|l| !l.trim().is_empty() && !l.starts_with('#'))
        .map(|line| match RawVariant::parse_line(&line) {
            Ok(raw) => InputLine::Variant(raw),
            Err(error) => InputLine::Malformed { line, error },
        })
        .collect())
}

#[cfg(feature = "parallel")]
fn annotate_batch(
    annotator: &Annotator<TranscriptDb>,
    variants: &[RawVariant],
) -> Vec<BatchOutcome> {
    ferro_annotate::parallel::annotate_batch_parallel(annotator, variants, None).0
}

#[cfg(not(feature = "parallel"))]
fn annotate_batch(
    annotator: &Annotator<TranscriptDb>,
    variants: &[RawVariant],
) -> Vec<BatchOutcome> {
    annotator.annotate_batch(variants, None).0
}

fn run_annotate(
    transcripts: &Path,
    variants: &[String],
    input: Option<&Path>,
    format: OutputFormat,
    config: AnnotateConfig,
) -> Result<(), Box<dyn std::error::Error>> {
    tracing::debug!(?config, "annotation settings");
    let db = load_transcripts(transcripts)?;
    let annotator = Annotator::new(db, config);

    let lines = read_inputs(variants, input)?;
    let raw: Vec<RawVariant> = lines
        .iter()
        .filter_map(|l| match l {
            InputLine::Variant(raw) => Some(raw.clone()),
            InputLine::Malformed { .. } => None,
        })
        .collect();
    let mut outcomes = annotate_batch(&annotator, &raw).into_iter();

    let stdout = io::stdout();
    let mut out = BufWriter::new(stdout.lock());
    if format == OutputFormat::Tsv {
        writeln!(
            out,
            "#input\ttranscript\tgene\teffect\tgenomic\tcoding\tprotein\tmessages\terror"
        )?;
    }

    for line in &lines {
        let record = match line {
            InputLine::Malformed { line, error } => Record::failed(line.trim(), error),
            InputLine::Variant(_) => match outcomes.next() {
                Some(outcome) => Record::from_outcome(&outcome),
                None => break,
            },
        };
        match format {
            OutputFormat::Tsv => record.write_tsv(&mut out)?,
            OutputFormat::Json => writeln!(out, "{}", serde_json::to_string(&record)?)?,
        }
    }
    out.flush()?;
    Ok(())
}

/// Output for one input line
#[derive(Serialize)]
struct Record {
    input: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    annotations: Vec<ferro_annotate::Annotation>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    errors: Vec<RecordError>,
}

#[derive(Serialize)]
struct RecordError {
    #[serde(skip_serializing_if = "Option::is_none")]
    transcript: Option<String>,
    code: String,
    message: String,
}

impl RecordError {
    fn new(transcript: Option<&str>, error: &AnnotateError) -> Self {
        Self {
            transcript: transcript.map(str::to_string),
            code: error.code().as_str(),
            message: error.to_string(),
        }
    }
}

impl Record {
    fn failed(input: &str, error: &AnnotateError) -> Self {
        Self {
            input: input.to_string(),
            annotations: Vec::new(),
            errors: vec![RecordError::new(None, error)],
        }
    }

    fn from_outcome(outcome: &BatchOutcome) -> Self {
        let input = outcome.input().to_string();
        match outcome {
            BatchOutcome::Annotated(result) => Self {
                input,
                annotations: result.annotations.as_slice().to_vec(),
                errors: result
                    .failures
                    .iter()
                    .map(|f| RecordError::new(Some(&f.transcript), &f.error))
                    .collect(),
            },
            BatchOutcome::Failed { error, .. } => Self::failed(&input, error),
            BatchOutcome::Cancelled { .. } => Self {
                input,
                annotations: Vec::new(),
                errors: Vec::new(),
            },
        }
    }

    fn write_tsv<W: Write>(&self, out: &mut W) -> io::Result<()> {
        let or_dot = |s: Option<&str>| s.filter(|s| !s.is_empty()).unwrap_or(".").to_string();
        for a in &self.annotations {
            let messages = a
                .messages
                .iter()
                .map(|m| m.to_string())
                .collect::<Vec<_>>()
                .join(",");
            writeln!(
                out,
                "{}\t{}\t{}\t{}\t{}\t{}\t{}\t{}\t.",
                self.input,
                or_dot(Some(a.transcript.as_str())),
                or_dot(Some(a.gene_symbol.as_str())),
                a.effect.so_term(),
                a.genomic_change,
                or_dot(a.cds_change.as_deref()),
                or_dot(a.protein_change.as_deref()),
                or_dot(Some(messages.as_str())),
            )?;
        }
        for e in &self.errors {
            writeln!(
                out,
                "{}\t{}\t.\t.\t.\t.\t.\t.\t[{}] {}",
                self.input,
                or_dot(e.transcript.as_deref()),
                e.code,
                e.message
            )?;
        }
        Ok(())
    }
}
