//! pdf-outline CLI - PDF title and heading outline extraction tool

use std::fs;
use std::path::{Path, PathBuf};

use clap::{Args, Parser, Subcommand};
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};

use pdf_outline::batch::list_pdf_files;
use pdf_outline::parser::{DEFAULT_MIN_FONT_SIZE, DEFAULT_MIN_TEXT_LENGTH};
use pdf_outline::{process_folder_with, FileOutcome, JsonFormat, OutlineExtractor, OutlineOptions};

#[derive(Parser)]
#[command(name = "pdf-outline")]
#[command(version)]
#[command(about = "Extract document titles and H1/H2/H3 outlines from PDF files", long_about = None)]
struct Cli {
    /// Directory containing PDF files
    #[arg(value_name = "INPUT_DIR", default_value = "input")]
    input: PathBuf,

    /// Directory for JSON outlines
    #[arg(value_name = "OUTPUT_DIR", default_value = "output")]
    output: PathBuf,

    #[command(flatten)]
    tuning: Tuning,

    #[command(subcommand)]
    command: Option<Commands>,
}

/// Heuristic and processing options shared by all commands.
#[derive(Args, Clone)]
struct Tuning {
    /// Ignore text smaller than this font size
    #[arg(
        long,
        global = true,
        env = "PDF_OUTLINE_MIN_FONT_SIZE",
        default_value_t = DEFAULT_MIN_FONT_SIZE
    )]
    min_font_size: f32,

    /// Ignore headings and title lines shorter than this many characters
    #[arg(
        long,
        global = true,
        env = "PDF_OUTLINE_MIN_TEXT_LENGTH",
        default_value_t = DEFAULT_MIN_TEXT_LENGTH
    )]
    min_text_length: usize,

    /// Treat unreadable pages as empty instead of failing the document
    #[arg(long, global = true)]
    lenient: bool,

    /// Process files one at a time
    #[arg(long, global = true)]
    sequential: bool,
}

impl Tuning {
    fn extractor(&self) -> OutlineExtractor {
        let mut options = OutlineOptions::new()
            .with_min_font_size(self.min_font_size)
            .with_min_text_length(self.min_text_length)
            .with_parallel(!self.sequential);
        if self.lenient {
            options = options.lenient();
        }
        OutlineExtractor::with_options(options)
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Extract outlines for every PDF in a directory
    Batch {
        /// Directory containing PDF files
        #[arg(value_name = "INPUT_DIR")]
        input: PathBuf,

        /// Directory for JSON outlines
        #[arg(short, long, value_name = "DIR", default_value = "output")]
        output: PathBuf,
    },

    /// Extract the outline of a single PDF
    File {
        /// Input PDF file
        #[arg(value_name = "FILE")]
        input: PathBuf,

        /// Output file (stdout if not specified)
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,

        /// Output compact JSON
        #[arg(long)]
        compact: bool,
    },

    /// Show version information
    Version,
}

fn main() {
    env_logger::init();

    let cli = Cli::parse();
    let extractor = cli.tuning.extractor();

    let result = match cli.command {
        Some(Commands::Batch { input, output }) => cmd_batch(&input, &output, &extractor),
        Some(Commands::File {
            input,
            output,
            compact,
        }) => cmd_file(&input, output.as_deref(), compact, &extractor),
        Some(Commands::Version) => {
            cmd_version();
            Ok(())
        }
        None => cmd_batch(&cli.input, &cli.output, &extractor),
    };

    if let Err(e) = result {
        eprintln!("{}: {}", "Error".red().bold(), e);
        std::process::exit(1);
    }
}

fn cmd_batch(
    input: &Path,
    output: &Path,
    extractor: &OutlineExtractor,
) -> Result<(), Box<dyn std::error::Error>> {
    println!("{}", "PDF Outline Extractor".cyan().bold());
    println!("{}", "─".repeat(40).dimmed());

    if !input.is_dir() {
        return Err(format!("Input directory not found: {}", input.display()).into());
    }

    let found = list_pdf_files(input)?.len();
    if found == 0 {
        fs::create_dir_all(output)?;
        println!("{} {}", "No PDF files found in".yellow(), input.display());
        return Ok(());
    }
    println!("Found {} PDF files to process", found.to_string().bold());

    let pb = ProgressBar::new(found as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{bar:40.cyan/blue}] {pos}/{len} {msg}")?
            .progress_chars("#>-"),
    );

    let report = process_folder_with(input, output, extractor, |outcome| {
        pb.println(outcome_lines(outcome));
        pb.inc(1);
    })?;

    pb.finish_and_clear();

    println!();
    println!(
        "{} {} saved, {} failed",
        "Done!".green().bold(),
        report.saved(),
        report.failed()
    );
    println!("{}: {}", "Output".bold(), output.display());

    Ok(())
}

/// Console lines for one finished file.
fn outcome_lines(outcome: &FileOutcome) -> String {
    let mut lines = format!("{} {}", "Processing:".cyan(), outcome.input_name());

    if let Some(ref e) = outcome.extract_error {
        lines.push_str(&format!(
            "\n  {} {}: {}",
            "Error processing".red(),
            outcome.input_name(),
            e
        ));
    }

    match outcome.save_error {
        Some(ref e) => lines.push_str(&format!(
            "\n  {} {}: {}",
            "Error saving".red(),
            outcome.output_name(),
            e
        )),
        None => lines.push_str(&format!(
            "\n  {} {} (found {} headings)",
            "Saved:".green(),
            outcome.output_name(),
            outcome.heading_count
        )),
    }

    if let Some(ref winner) = outcome.overwritten_by {
        lines.push_str(&format!(
            "\n  {} {} by {}",
            "Overwritten:".yellow(),
            outcome.output_name(),
            winner.file_name().map(|n| n.to_string_lossy()).unwrap_or_default()
        ));
    }

    lines
}

fn cmd_file(
    input: &Path,
    output: Option<&Path>,
    compact: bool,
    extractor: &OutlineExtractor,
) -> Result<(), Box<dyn std::error::Error>> {
    let outline = extractor.extract_file(input)?;

    let format = if compact {
        JsonFormat::Compact
    } else {
        JsonFormat::Pretty
    };

    let json = pdf_outline::render::to_json(&outline, format)?;

    if let Some(path) = output {
        fs::write(path, &json)?;
        println!(
            "{} {} (found {} headings)",
            "Saved to".green(),
            path.display(),
            outline.heading_count()
        );
    } else {
        println!("{}", json);
    }

    Ok(())
}

fn cmd_version() {
    println!("{} {}", "pdf-outline".cyan().bold(), env!("CARGO_PKG_VERSION"));
    println!("PDF title and heading outline extraction tool");
    println!();
    println!("License: MIT");
}
