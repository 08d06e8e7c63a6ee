//! Paperfix CLI - pandoc JSON filter for LaTeX papers headed for Word
//!
//! Used as `pandoc paper.tex --filter paperfix -o paper.docx`, or run by
//! hand on `pandoc -t json` output.

use std::fs;
use std::io::{self, Read, Write};
use std::path::PathBuf;
use std::process::ExitCode;

use clap::{ArgAction, Parser};
use paperfix::{filter_json, ConversionError, ConversionResult, FilterOptions, PassKind};

#[derive(Parser)]
#[command(name = "paperfix")]
#[command(version)]
#[command(about = "Paperfix - pandoc JSON filter for LaTeX papers", long_about = None)]
struct Cli {
    /// Output format pandoc passes to filters (ignored)
    target_format: Option<String>,

    /// Read the document from this file instead of stdin
    #[arg(short, long)]
    input: Option<PathBuf>,

    /// Write the document to this file instead of stdout
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// TOML file with filter options
    #[arg(short, long, env = "PAPERFIX_CONFIG")]
    config: Option<PathBuf>,

    /// Directory with the LaTeX sources and figures
    #[arg(long)]
    resource_root: Option<PathBuf>,

    /// Acronym definitions (\newacronym lines)
    #[arg(long)]
    acronyms: Option<PathBuf>,

    /// Rasterizer executable (pdftoppm-compatible)
    #[arg(long)]
    rasterizer: Option<String>,

    /// Longest side of rasterized images, in pixels
    #[arg(long)]
    raster_scale: Option<u32>,

    /// Skip a pass (repeatable)
    #[arg(long, value_enum)]
    disable: Vec<PassKind>,

    /// Write the report of unresolved nodes as JSON to this path
    #[arg(long)]
    report: Option<PathBuf>,

    /// More logging on stderr (-v info, -vv debug)
    #[arg(short, long, action = ArgAction::Count)]
    verbose: u8,
}

impl Cli {
    fn options(&self) -> ConversionResult<FilterOptions> {
        let mut options = match &self.config {
            Some(path) => FilterOptions::load(path)?,
            None => FilterOptions::default(),
        };
        if let Some(root) = &self.resource_root {
            options.resource_root = root.clone();
        }
        if let Some(acronyms) = &self.acronyms {
            options.acronyms = Some(acronyms.clone());
        }
        if let Some(rasterizer) = &self.rasterizer {
            options.rasterizer = rasterizer.clone();
        }
        if let Some(scale) = self.raster_scale {
            options.raster_scale = scale;
        }
        for kind in &self.disable {
            if !options.disable.contains(kind) {
                options.disable.push(*kind);
            }
        }
        Ok(options)
    }
}

fn init_logging(verbose: u8) {
    let default_level = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level))
        .format_timestamp(None)
        .init();
}

fn read_input(path: Option<&PathBuf>) -> ConversionResult<String> {
    match path {
        Some(path) => fs::read_to_string(path).map_err(|e| ConversionError::io_at(path, e)),
        None => {
            let mut buffer = String::new();
            io::stdin().read_to_string(&mut buffer)?;
            Ok(buffer)
        }
    }
}

fn write_output(path: Option<&PathBuf>, content: &str) -> ConversionResult<()> {
    match path {
        Some(path) => fs::write(path, content).map_err(|e| ConversionError::io_at(path, e)),
        None => {
            let mut stdout = io::stdout().lock();
            stdout.write_all(content.as_bytes())?;
            stdout.flush()?;
            Ok(())
        }
    }
}

fn run(cli: &Cli) -> ConversionResult<()> {
    if let Some(format) = &cli.target_format {
        log::debug!("target format {}", format);
    }
    let options = cli.options()?;
    let input = read_input(cli.input.as_ref())?;
    let output = filter_json(&input, &options)?;

    if let Some(path) = &cli.report {
        let json = serde_json::to_string_pretty(&output.report)?;
        fs::write(path, json).map_err(|e| ConversionError::io_at(path, e))?;
    }
    if output.has_misses() {
        log::warn!("{} node(s) left unresolved", output.report.misses.len());
    }
    write_output(cli.output.as_ref(), &output.content)
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);
    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("paperfix: {}", err);
            ExitCode::FAILURE
        }
    }
}
