//! Directory-level drivers: outline batches and collection runs.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use rayon::prelude::*;

use crate::detect::has_pdf_extension;
use crate::error::{Error, Result};
use crate::outline::{OutlineExtractor, OutlineOptions};
use crate::persona::{AnalysisOptions, CollectionAnalyzer};
use crate::render::{write_json, JsonFormat};

/// Default input directory of an outline batch.
pub const DEFAULT_INPUT_DIR: &str = "/app/input";
/// Default output directory of an outline batch.
pub const DEFAULT_OUTPUT_DIR: &str = "/app/output";
/// Upper bound on outline workers.
pub const MAX_WORKERS: usize = 8;
/// Manifest file name inside a collection directory.
pub const MANIFEST_FILE_NAME: &str = "challenge1b_input.json";

/// Default worker count: available parallelism, at most [`MAX_WORKERS`].
pub fn default_workers() -> usize {
    std::thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(1)
        .min(MAX_WORKERS)
}

/// Options for an outline batch.
#[derive(Debug, Clone)]
pub struct BatchOptions {
    pub input_dir: PathBuf,
    pub output_dir: PathBuf,
    /// Worker threads (at least one is used)
    pub workers: usize,
    pub outline: OutlineOptions,
    pub format: JsonFormat,
}

impl Default for BatchOptions {
    fn default() -> Self {
        Self {
            input_dir: PathBuf::from(DEFAULT_INPUT_DIR),
            output_dir: PathBuf::from(DEFAULT_OUTPUT_DIR),
            workers: default_workers(),
            outline: OutlineOptions::default(),
            format: JsonFormat::Pretty,
        }
    }
}

impl BatchOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_input_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.input_dir = dir.into();
        self
    }

    pub fn with_output_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.output_dir = dir.into();
        self
    }

    pub fn with_workers(mut self, workers: usize) -> Self {
        self.workers = workers;
        self
    }

    pub fn with_outline_options(mut self, outline: OutlineOptions) -> Self {
        self.outline = outline;
        self
    }

    pub fn with_format(mut self, format: JsonFormat) -> Self {
        self.format = format;
        self
    }
}

/// Result of processing one input file.
#[derive(Debug, Clone)]
pub struct FileOutcome {
    pub file_name: String,
    /// Output path, or the error message
    pub result: std::result::Result<PathBuf, String>,
}

impl FileOutcome {
    pub fn is_success(&self) -> bool {
        self.result.is_ok()
    }
}

/// Summary of a batch run.
#[derive(Debug, Clone, Default)]
pub struct BatchReport {
    pub outcomes: Vec<FileOutcome>,
    pub elapsed: Duration,
}

impl BatchReport {
    pub fn total(&self) -> usize {
        self.outcomes.len()
    }

    pub fn succeeded(&self) -> usize {
        self.outcomes.iter().filter(|o| o.is_success()).count()
    }

    pub fn failed(&self) -> usize {
        self.total() - self.succeeded()
    }

    pub fn failures(&self) -> impl Iterator<Item = &FileOutcome> {
        self.outcomes.iter().filter(|o| !o.is_success())
    }
}

/// PDF files directly inside `dir`, sorted by name.
pub fn find_pdfs(dir: &Path) -> Result<Vec<PathBuf>> {
    if !dir.is_dir() {
        return Err(Error::InputDirNotFound(dir.to_path_buf()));
    }

    let mut pdfs = Vec::new();
    for entry in fs::read_dir(dir)? {
        let path = entry?.path();
        if path.is_file() && has_pdf_extension(&path) {
            pdfs.push(path);
        }
    }
    pdfs.sort();
    Ok(pdfs)
}

/// Output path of the outline of `pdf`: `<output_dir>/<stem>.json`.
pub fn outline_output_path(output_dir: &Path, pdf: &Path) -> PathBuf {
    let stem = pdf
        .file_stem()
        .map(|s| s.to_string_lossy().to_string())
        .unwrap_or_default();
    output_dir.join(format!("{}.json", stem))
}

/// Extract and write the outline of one file.
pub fn process_outline_file(
    extractor: &OutlineExtractor,
    pdf: &Path,
    output_dir: &Path,
    format: JsonFormat,
) -> FileOutcome {
    let file_name = pdf
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_default();
    log::info!("Processing {}...", file_name);

    let result = extractor.extract_file(pdf).and_then(|outline| {
        let out = outline_output_path(output_dir, pdf);
        write_json(&outline, &out, format)?;
        Ok(out)
    });

    match result {
        Ok(out) => {
            log::info!("Successfully processed and saved {}", out.display());
            FileOutcome {
                file_name,
                result: Ok(out),
            }
        }
        Err(e) => {
            log::error!("Failed to process {}. Error: {}", file_name, e);
            FileOutcome {
                file_name,
                result: Err(e.to_string()),
            }
        }
    }
}

/// Extract outlines for every PDF in the input directory.
pub fn run_outline_batch(options: &BatchOptions) -> Result<BatchReport> {
    run_outline_batch_with(options, |_| {})
}

/// Like [`run_outline_batch`], calling `on_done` as each file finishes.
///
/// A missing input directory is fatal. Per-file failures are recorded in
/// the report and do not stop the batch.
pub fn run_outline_batch_with<F>(options: &BatchOptions, on_done: F) -> Result<BatchReport>
where
    F: Fn(&FileOutcome) + Sync,
{
    let start = Instant::now();

    let pdfs = find_pdfs(&options.input_dir)?;
    fs::create_dir_all(&options.output_dir)?;

    if pdfs.is_empty() {
        log::warn!("No PDF files found in '{}'.", options.input_dir.display());
        return Ok(BatchReport {
            outcomes: Vec::new(),
            elapsed: start.elapsed(),
        });
    }

    let workers = options.workers.max(1);
    log::info!(
        "Found {} PDF(s) to process with {} workers.",
        pdfs.len(),
        workers
    );

    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(workers)
        .build()
        .map_err(|e| Error::Other(format!("Failed to start worker pool: {}", e)))?;

    let extractor = OutlineExtractor::new(options.outline.clone());
    let outcomes: Vec<FileOutcome> = pool.install(|| {
        pdfs.par_iter()
            .map(|pdf| {
                let outcome =
                    process_outline_file(&extractor, pdf, &options.output_dir, options.format);
                on_done(&outcome);
                outcome
            })
            .collect()
    });

    let report = BatchReport {
        outcomes,
        elapsed: start.elapsed(),
    };
    log::info!(
        "Processing complete. Successfully processed {}/{} files.",
        report.succeeded(),
        report.total()
    );
    Ok(report)
}

/// One collection directory to analyze.
#[derive(Debug, Clone)]
pub struct CollectionJob {
    /// Directory holding the manifest and its PDFs
    pub dir: PathBuf,
    /// Where the report is written
    pub output: PathBuf,
}

impl CollectionJob {
    /// Job for `dir`, writing `<output_dir>/<dir name>_output.json`.
    pub fn new(dir: impl Into<PathBuf>, output_dir: &Path) -> Self {
        let dir = dir.into();
        let name = dir
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_else(|| "collection".to_string());
        let output = output_dir.join(format!("{}_output.json", name));
        Self { dir, output }
    }

    pub fn manifest_path(&self) -> PathBuf {
        self.dir.join(MANIFEST_FILE_NAME)
    }
}

/// Analyze each collection in turn, one report per collection.
///
/// A collection without a readable manifest is recorded as failed and the
/// run moves on.
pub fn run_collections(jobs: &[CollectionJob], options: &AnalysisOptions) -> BatchReport {
    let start = Instant::now();
    let analyzer = CollectionAnalyzer::new(options.clone());

    let outcomes = jobs
        .iter()
        .map(|job| {
            let file_name = job.dir.display().to_string();
            log::info!("Processing collection {}", file_name);

            let result = analyzer
                .analyze_manifest_file(&job.manifest_path(), Some(&job.dir))
                .and_then(|report| write_json(&report, &job.output, JsonFormat::Pretty))
                .map(|()| job.output.clone());

            match &result {
                Ok(out) => log::info!("Output saved to '{}'", out.display()),
                Err(e) => log::error!("Collection {} failed: {}", file_name, e),
            }
            FileOutcome {
                file_name,
                result: result.map_err(|e| e.to_string()),
            }
        })
        .collect();

    BatchReport {
        outcomes,
        elapsed: start.elapsed(),
    }
}
