//! footsplit CLI - footnote-aware PDF content extraction tool

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use clap::{Parser, Subcommand, ValueEnum};
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};

use footsplit::render::{self, JsonFormat, RenderFormat};
use footsplit::{FootnoteConfig, Footsplit, PageDiagnostics, PageSelection, RowSheet};

#[derive(Parser)]
#[command(name = "footsplit")]
#[command(version)]
#[command(about = "Split PDF body text and footnotes into ordered rows", long_about = None)]
struct Cli {
    /// Input PDF file
    #[arg(value_name = "FILE")]
    input: Option<PathBuf>,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Convert a PDF to content/footnote rows
    Convert {
        /// Input PDF file
        #[arg(value_name = "FILE")]
        input: PathBuf,

        /// Output file (stdout if not specified)
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,

        /// Output format
        #[arg(short, long, value_enum, default_value = "tsv")]
        format: OutputFormat,

        /// Page range (e.g., "1-10", "1,3,5")
        #[arg(long)]
        pages: Option<String>,

        /// Process pages in parallel
        #[arg(long)]
        parallel: bool,

        /// Marker font ratio (digit size relative to its line)
        #[arg(long, env = "FOOTSPLIT_MARKER_RATIO")]
        marker_ratio: Option<f32>,
    },

    /// Show per-page footnote diagnostics
    Inspect {
        /// Input PDF file
        #[arg(value_name = "FILE")]
        input: PathBuf,

        /// Page range (e.g., "1-10", "1,3,5")
        #[arg(long)]
        pages: Option<String>,
    },

    /// Show version information
    Version,
}

#[derive(Copy, Clone, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    /// Tab-separated values with a header row
    Tsv,
    /// Pretty-printed JSON
    Json,
    /// Compact JSON
    JsonCompact,
}

impl From<OutputFormat> for RenderFormat {
    fn from(format: OutputFormat) -> Self {
        match format {
            OutputFormat::Tsv => RenderFormat::Tsv,
            OutputFormat::Json => RenderFormat::Json(JsonFormat::Pretty),
            OutputFormat::JsonCompact => RenderFormat::Json(JsonFormat::Compact),
        }
    }
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let result = match cli.command {
        Some(Commands::Convert {
            input,
            output,
            format,
            pages,
            parallel,
            marker_ratio,
        }) => cmd_convert(
            &input,
            output.as_deref(),
            format,
            pages.as_deref(),
            parallel,
            marker_ratio,
        ),
        Some(Commands::Inspect { input, pages }) => cmd_inspect(&input, pages.as_deref()),
        Some(Commands::Version) => {
            cmd_version();
            Ok(())
        }
        None => {
            if let Some(input) = cli.input {
                cmd_convert(&input, None, OutputFormat::Tsv, None, false, None)
            } else {
                println!("{}", "Usage: footsplit <FILE>".yellow());
                println!("       footsplit --help for more information");
                Ok(())
            }
        }
    };

    if let Err(e) = result {
        eprintln!("{}: {}", "Error".red().bold(), e);
        std::process::exit(1);
    }
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level)).init();
}

fn parse_pages(pages: Option<&str>) -> Result<PageSelection, Box<dyn std::error::Error>> {
    match pages {
        Some(p) => Ok(PageSelection::parse(p).map_err(|e| format!("Invalid page range: {}", e))?),
        None => Ok(PageSelection::All),
    }
}

fn spinner(message: &'static str) -> Result<ProgressBar, Box<dyn std::error::Error>> {
    let pb = ProgressBar::new_spinner();
    pb.set_style(ProgressStyle::default_spinner().template("{spinner:.green} {msg}")?);
    pb.enable_steady_tick(Duration::from_millis(100));
    pb.set_message(message);
    Ok(pb)
}

fn cmd_convert(
    input: &Path,
    output: Option<&Path>,
    format: OutputFormat,
    pages: Option<&str>,
    parallel: bool,
    marker_ratio: Option<f32>,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut config = FootnoteConfig::default();
    if let Some(ratio) = marker_ratio {
        config = config.with_marker_font_ratio(ratio);
    }

    let mut builder = Footsplit::new()
        .with_config(config)
        .with_pages(parse_pages(pages)?);
    if parallel {
        builder = builder.parallel();
    }

    // Keep stdout clean when it carries the rows.
    let pb = match output {
        Some(_) => Some(spinner("Processing pages...")?),
        None => None,
    };

    let rows = builder.process_file(input);
    if let Some(pb) = &pb {
        pb.finish_and_clear();
    }
    let rows = rows?;
    log::info!(
        "{}: {} rows, {} footnotes",
        input.display(),
        rows.len(),
        rows.footnote_count()
    );

    let rendered = render::render(&rows, format.into())?;

    if let Some(path) = output {
        write_output(path, &rendered)?;
        print_summary(&rows);
        println!("{} {}", "Saved to".green(), path.display());
    } else {
        print!("{}", rendered);
    }

    Ok(())
}

fn write_output(path: &Path, rendered: &str) -> std::io::Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }
    fs::write(path, rendered)
}

fn print_summary(rows: &RowSheet) {
    println!("{}", "Summary".cyan().bold());
    println!("{}", "─".repeat(40).dimmed());
    println!("{}: {}", "Pages".bold(), rows.page_marker_count());
    println!("{}: {}", "Rows".bold(), rows.len());
    println!("{}: {}", "Footnotes".bold(), rows.footnote_count());
}

fn cmd_inspect(input: &Path, pages: Option<&str>) -> Result<(), Box<dyn std::error::Error>> {
    let pb = spinner("Inspecting pages...")?;
    let diagnostics = Footsplit::new()
        .with_pages(parse_pages(pages)?)
        .inspect_file(input);
    pb.finish_and_clear();
    let diagnostics = diagnostics?;

    println!("{}", "Footnote Diagnostics".cyan().bold());
    println!("{}: {}", "File".bold(), input.display());
    if let Ok(version) = footsplit::pdf_version_from_path(input) {
        println!("{}: PDF {}", "Format".bold(), version);
    }

    for page in &diagnostics {
        print_page(page);
    }

    let incomplete = diagnostics.iter().filter(|d| !d.report.is_complete()).count();
    println!();
    if incomplete == 0 {
        println!("{}", "All references matched.".green().bold());
    } else {
        println!(
            "{} {} of {} pages have unmatched references or footnotes",
            "Warning:".yellow().bold(),
            incomplete,
            diagnostics.len()
        );
    }

    Ok(())
}

fn print_page(page: &PageDiagnostics) {
    println!();
    println!("{}", format!("Page {}", page.page).bold());
    println!("{}", "─".repeat(40).dimmed());

    let separators = page.separators.iter().filter(|s| s.is_separator).count();
    println!("  {}: {}", "Separator candidates".bold(), separators);
    match &page.section {
        Some(section) => println!(
            "  {}: starts at y={:.1}",
            "Footnote section".bold(),
            section.section_start
        ),
        None => println!("  {}: {}", "Footnote section".bold(), "none".dimmed()),
    }

    let references: Vec<&str> = page
        .extraction
        .references
        .iter()
        .map(|r| r.text.as_str())
        .collect();
    println!("  {}: {}", "References".bold(), references.join(", "));

    for (number, text) in page.extraction.footnotes.iter() {
        println!("  {} {}. {}", "├─".dimmed(), number, text);
    }

    if !page.report.missing.is_empty() {
        println!(
            "  {} {}",
            "Missing footnotes:".yellow(),
            page.report.missing.join(", ")
        );
    }
    if !page.report.orphaned.is_empty() {
        println!(
            "  {} {}",
            "Unreferenced footnotes:".yellow(),
            page.report.orphaned.join(", ")
        );
    }
}

fn cmd_version() {
    println!("{} {}", "footsplit".cyan().bold(), env!("CARGO_PKG_VERSION"));
    println!("Footnote-aware PDF content extraction tool");
}

#[cfg(test)]
mod tests {
    use super::*;
    use footsplit::{ContentRow, Page};

    #[test]
    fn test_output_format_mapping() {
        assert_eq!(RenderFormat::from(OutputFormat::Tsv), RenderFormat::Tsv);
        assert_eq!(
            RenderFormat::from(OutputFormat::JsonCompact),
            RenderFormat::Json(JsonFormat::Compact)
        );
    }

    #[test]
    fn test_parse_pages() {
        assert_eq!(parse_pages(None).unwrap(), PageSelection::All);
        assert_eq!(
            parse_pages(Some("2-4")).unwrap(),
            PageSelection::Range(2..=4)
        );
        assert!(parse_pages(Some("5-1")).is_err());
    }

    #[test]
    fn test_write_output_creates_parent() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("rows.tsv");

        let mut rows = footsplit::process_pages(vec![Page::letter(1)]).unwrap();
        rows.push(ContentRow::body("tail"));
        let rendered = render::render(&rows, OutputFormat::Tsv.into()).unwrap();
        write_output(&path, &rendered).unwrap();

        let written = fs::read_to_string(&path).unwrap();
        assert_eq!(written, "Content\tFootnotes\n**** Page 2 ****\t\ntail\t\n");
    }

    #[test]
    fn test_cli_parses_convert() {
        let cli = Cli::try_parse_from([
            "footsplit",
            "convert",
            "paper.pdf",
            "--format",
            "json-compact",
            "--pages",
            "1-3",
            "--parallel",
        ])
        .unwrap();

        match cli.command {
            Some(Commands::Convert {
                input,
                format,
                pages,
                parallel,
                ..
            }) => {
                assert_eq!(input, PathBuf::from("paper.pdf"));
                assert!(format == OutputFormat::JsonCompact);
                assert_eq!(pages.as_deref(), Some("1-3"));
                assert!(parallel);
            }
            _ => panic!("expected convert command"),
        }
    }
}
