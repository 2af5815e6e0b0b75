//! pdfspan CLI - positioned PDF text extraction tool

use std::path::{Path, PathBuf};

use clap::Parser;
use colored::Colorize;

use pdfspan::{default_output_path, ExtractOptions, JsonFormat, PageSelection};

#[derive(Parser)]
#[command(name = "pdfspan")]
#[command(version)]
#[command(about = "Extract PDF text spans with positions, fonts and colors to JSON", long_about = None)]
struct Cli {
    /// Input PDF file
    #[arg(value_name = "FILE", default_value = "test.pdf")]
    input: PathBuf,

    /// Output file (default: output.json next to the input)
    #[arg(short, long, value_name = "FILE", env = "PDFSPAN_OUTPUT")]
    output: Option<PathBuf>,

    /// Write compact JSON
    #[arg(long)]
    compact: bool,

    /// Page range (e.g., "1-10", "1,3,5")
    #[arg(long)]
    pages: Option<String>,

    /// Keep going past pages that cannot be read
    #[arg(long)]
    lenient: bool,

    /// Print JSON to stdout instead of writing a file
    #[arg(long, conflicts_with = "output")]
    stdout: bool,
}

fn main() {
    env_logger::init();

    let cli = Cli::parse();

    if !cli.input.exists() {
        println!("{}: {} not found!", "Error".red().bold(), cli.input.display());
        return;
    }

    if let Err(e) = run(&cli) {
        eprintln!("{}: {}", "Error".red().bold(), e);
        std::process::exit(1);
    }
}

fn run(cli: &Cli) -> Result<(), Box<dyn std::error::Error>> {
    let options = build_options(cli)?;

    if cli.stdout {
        let extraction = pdfspan::extract_file(&cli.input, &options)?;
        println!("{}", extraction.to_json(options.json_format)?);
        return Ok(());
    }

    let output = output_path(&cli.input, cli.output.as_deref());
    let extraction = pdfspan::extract_to(&cli.input, &output, &options)?;
    log::info!(
        "{} spans on {} pages",
        extraction.span_count(),
        extraction.page_count()
    );

    println!(
        "{} JSON saved as {}",
        "Extraction complete.".green(),
        output.display()
    );
    Ok(())
}

fn build_options(cli: &Cli) -> Result<ExtractOptions, Box<dyn std::error::Error>> {
    let pages = match cli.pages.as_deref() {
        Some(p) => PageSelection::parse(p)?,
        None => PageSelection::All,
    };

    let format = if cli.compact {
        JsonFormat::Compact
    } else {
        JsonFormat::Pretty
    };

    let mut options = ExtractOptions::new()
        .with_pages(pages)
        .with_json_format(format);
    if cli.lenient {
        options = options.lenient();
    }
    Ok(options)
}

fn output_path(input: &Path, output: Option<&Path>) -> PathBuf {
    match output {
        Some(path) => path.to_path_buf(),
        None => default_output_path(input),
    }
}
