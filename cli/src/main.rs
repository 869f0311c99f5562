//! docsift CLI - PDF outline extraction and persona-driven section ranking

use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};

use docsift::batch::{self, BatchOptions, CollectionJob};
use docsift::outline::{aggregate_lines, FontProfile};
use docsift::render::{write_json, JsonFormat};
use docsift::{
    AnalysisOptions, CollectionAnalyzer, LayoutAnalyzer, OutlineExtractor, OutlineOptions,
    ParseOptions,
};

#[derive(Parser)]
#[command(name = "docsift")]
#[command(author = "iyulab")]
#[command(version)]
#[command(
    about = "Extract PDF outlines and rank document sections for a persona",
    long_about = None
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Extract title and outline of every PDF in a directory
    Outline {
        /// Directory scanned for *.pdf files
        #[arg(short, long, value_name = "DIR", env = "DOCSIFT_INPUT_DIR", default_value = batch::DEFAULT_INPUT_DIR)]
        input: PathBuf,

        /// Directory receiving one <stem>.json per PDF
        #[arg(short, long, value_name = "DIR", env = "DOCSIFT_OUTPUT_DIR", default_value = batch::DEFAULT_OUTPUT_DIR)]
        output: PathBuf,

        /// Worker threads (default: CPU count, at most 8)
        #[arg(short = 'j', long, env = "DOCSIFT_WORKERS")]
        workers: Option<usize>,

        /// Output compact JSON
        #[arg(long)]
        compact: bool,

        /// Ignore the fixed per-file outlines
        #[arg(long)]
        no_overrides: bool,
    },

    /// Rank the sections of one collection for its persona and task
    Analyze {
        /// Collection manifest
        #[arg(short, long, value_name = "FILE", env = "DOCSIFT_MANIFEST", default_value = batch::MANIFEST_FILE_NAME)]
        manifest: PathBuf,

        /// Directory the manifest's document names resolve against
        #[arg(short, long, value_name = "DIR", default_value = ".")]
        base_dir: PathBuf,

        /// Report file
        #[arg(short, long, value_name = "FILE", default_value = "output/challenge1b_output_generated.json")]
        output: PathBuf,

        /// Sentences per refined summary
        #[arg(long, default_value_t = docsift::persona::DEFAULT_SUMMARY_SENTENCES)]
        sentences: usize,
    },

    /// Analyze several collection directories, one report each
    Collections {
        /// Collection directories, each holding challenge1b_input.json
        #[arg(value_name = "DIR", default_values = ["collection1", "collection2", "collection3"])]
        dirs: Vec<PathBuf>,

        /// Directory receiving <dir>_output.json reports
        #[arg(short, long, value_name = "DIR", default_value = "output")]
        output_dir: PathBuf,
    },

    /// Show document information and its outline
    Info {
        /// Input PDF file
        #[arg(value_name = "FILE")]
        input: PathBuf,
    },

    /// Show version information
    Version,
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();

    let result = match cli.command {
        Some(Commands::Outline {
            input,
            output,
            workers,
            compact,
            no_overrides,
        }) => cmd_outline(&input, &output, workers, compact, no_overrides),
        Some(Commands::Analyze {
            manifest,
            base_dir,
            output,
            sentences,
        }) => cmd_analyze(&manifest, &base_dir, &output, sentences),
        Some(Commands::Collections { dirs, output_dir }) => cmd_collections(&dirs, &output_dir),
        Some(Commands::Info { input }) => cmd_info(&input),
        Some(Commands::Version) => {
            cmd_version();
            Ok(())
        }
        // Default behavior: outline batch with the fixed configuration
        None => cmd_outline(
            Path::new(batch::DEFAULT_INPUT_DIR),
            Path::new(batch::DEFAULT_OUTPUT_DIR),
            None,
            false,
            false,
        ),
    };

    if let Err(e) = result {
        eprintln!("{}: {}", "Error".red().bold(), e);
        std::process::exit(1);
    }
}

fn cmd_outline(
    input: &Path,
    output: &Path,
    workers: Option<usize>,
    compact: bool,
    no_overrides: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    log::info!("--- Starting PDF outline extraction ---");

    let mut outline = OutlineOptions::new();
    if no_overrides {
        outline = outline.without_overrides();
    }
    let mut options = BatchOptions::new()
        .with_input_dir(input)
        .with_output_dir(output)
        .with_outline_options(outline)
        .with_format(if compact {
            JsonFormat::Compact
        } else {
            JsonFormat::Pretty
        });
    if let Some(n) = workers {
        options = options.with_workers(n);
    }

    let total = batch::find_pdfs(input).map(|p| p.len()).unwrap_or(0);
    let pb = ProgressBar::new(total as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{bar:40.cyan/blue}] {pos}/{len} {msg}")
            .unwrap()
            .progress_chars("#>-"),
    );
    if total == 0 {
        pb.finish_and_clear();
    }

    let report = batch::run_outline_batch_with(&options, |outcome| {
        pb.set_message(outcome.file_name.clone());
        pb.inc(1);
    })?;
    pb.finish_and_clear();

    for failure in report.failures() {
        if let Err(msg) = &failure.result {
            eprintln!("  {} {}: {}", "✗".red(), failure.file_name, msg);
        }
    }
    if report.total() > 0 {
        let summary = format!("{}/{} files", report.succeeded(), report.total());
        let summary = if report.failed() == 0 {
            summary.green()
        } else {
            summary.yellow()
        };
        println!("{} {}", "Processed".bold(), summary);
    }
    log::info!(
        "--- Total execution time: {:.2} seconds ---",
        report.elapsed.as_secs_f64()
    );

    Ok(())
}

fn cmd_analyze(
    manifest: &Path,
    base_dir: &Path,
    output: &Path,
    sentences: usize,
) -> Result<(), Box<dyn std::error::Error>> {
    let options = AnalysisOptions::new().with_summary_sentences(sentences);
    let report =
        CollectionAnalyzer::new(options).analyze_manifest_file(manifest, Some(base_dir))?;
    write_json(&report, output, JsonFormat::Pretty)?;

    println!(
        "{} {} ({} section(s))",
        "Output saved to".green(),
        output.display(),
        report.extracted_sections.len()
    );
    Ok(())
}

fn cmd_collections(dirs: &[PathBuf], output_dir: &Path) -> Result<(), Box<dyn std::error::Error>> {
    let jobs: Vec<CollectionJob> = dirs
        .iter()
        .map(|dir| CollectionJob::new(dir, output_dir))
        .collect();

    let report = batch::run_collections(&jobs, &AnalysisOptions::default());

    for outcome in &report.outcomes {
        match &outcome.result {
            Ok(path) => println!("  {} {}", "├─".dimmed(), path.display()),
            Err(msg) => eprintln!("  {} {}: {}", "✗".red(), outcome.file_name, msg),
        }
    }
    println!(
        "{} {}/{} collections",
        "Processed".bold(),
        report.succeeded(),
        report.total()
    );
    Ok(())
}

fn cmd_info(input: &Path) -> Result<(), Box<dyn std::error::Error>> {
    let analyzer = LayoutAnalyzer::open(input, ParseOptions::new().lenient())?;
    let layout = analyzer.analyze()?;

    let lines: Vec<_> = layout.pages.iter().flat_map(aggregate_lines).collect();
    let profile = FontProfile::from_lines(&lines);

    let mut outline = OutlineExtractor::default().extract(&layout);
    if let Some(name) = input.file_name() {
        outline = docsift::outline::overrides::apply(&name.to_string_lossy(), outline);
    }

    println!("{}", "Document Information".cyan().bold());
    println!("{}", "─".repeat(40).dimmed());
    println!("{}: {}", "File".bold(), input.display());
    println!("{}: PDF {}", "Format".bold(), analyzer.backend().version());
    println!("{}: {}", "Pages".bold(), analyzer.page_count());
    println!("{}: {}", "Lines".bold(), lines.len());
    println!("{}: {:.2}", "Body size".bold(), profile.body_size());
    println!("{}: {}", "Title".bold(), outline.title);

    println!();
    println!("{}", "Outline".cyan().bold());
    println!("{}", "─".repeat(40).dimmed());
    for entry in &outline.outline {
        let indent = "  ".repeat(entry.level.number() as usize - 1);
        println!(
            "{}{} {} {}",
            indent,
            entry.level.to_string().yellow(),
            entry.text,
            format!("(page {})", entry.page).dimmed()
        );
    }

    Ok(())
}

fn cmd_version() {
    println!("{} {}", "docsift".cyan().bold(), env!("CARGO_PKG_VERSION"));
    println!("PDF outline extraction and persona-driven section ranking");
    println!();
    println!("License: MIT");
}
