//! Generic batch file processing
//!
//! A [`BatchProcessor`] discovers input files, fans them out over a
//! bounded worker pool, and aggregates per-file outcomes into summary
//! statistics. Per-file failures are data, not errors: one bad file never
//! aborts the batch, and the worker boundary only ever carries a
//! [`FileOutcome`] or a [`FileError`].

use std::fs;
use std::path::{Path, PathBuf};

use globset::{Glob, GlobSet, GlobSetBuilder};
use indicatif::{ProgressBar, ProgressStyle};
use rayon::prelude::*;
use thiserror::Error;
use walkdir::WalkDir;

/// Batch-level failures. These abort the whole run, unlike per-file
/// failures which are collected in the report.
#[derive(Debug, Error)]
pub enum BatchError {
    #[error("input path does not exist: {0}")]
    InputMissing(PathBuf),

    #[error("output path exists but is not a directory: {0}")]
    OutputNotDir(PathBuf),

    #[error("no matching files found under {0}")]
    NoFiles(PathBuf),

    #[error("invalid exclude pattern {pattern:?}: {message}")]
    InvalidExclude { pattern: String, message: String },

    #[error("worker pool error: {0}")]
    Pool(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// A single file that could not be processed
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileError {
    pub message: String,
}

impl FileError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// A successfully processed file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileOutcome {
    /// Short human-readable summary, e.g. "compressed 4.2 MB -> 1.1 MB"
    pub message: String,
    /// Size of the input file in bytes
    pub old_size: u64,
    /// Size of the produced output in bytes
    pub new_size: u64,
    /// Where the output landed, when the job writes one file per input
    pub output_path: Option<PathBuf>,
}

/// Per-file result paired with the input path, in discovery order
#[derive(Debug, Clone)]
pub struct FileReport {
    pub path: PathBuf,
    pub result: Result<FileOutcome, FileError>,
}

/// Aggregate statistics over a finished batch
#[derive(Debug, Clone, PartialEq)]
pub struct BatchStats {
    pub total_files: usize,
    pub success_count: usize,
    pub error_count: usize,
    /// Percentage in `0.0..=100.0`
    pub success_rate: f64,
    /// Total bytes across every discovered input file, failed ones
    /// included (best-effort; unreadable files count as zero)
    pub input_size: u64,
    /// Bytes under the output root after the run; zero without one
    pub output_size: u64,
    /// `input_size - output_size`, clamped at zero
    pub space_saved: u64,
    /// `output_size / input_size`, or 1.0 when there was no input
    pub compression_ratio: f64,
}

impl BatchStats {
    fn compute(reports: &[FileReport], input_size: u64, output_size: u64) -> Self {
        let total_files = reports.len();
        let success_count = reports.iter().filter(|r| r.result.is_ok()).count();
        let error_count = total_files - success_count;
        Self {
            total_files,
            success_count,
            error_count,
            success_rate: if total_files == 0 {
                0.0
            } else {
                success_count as f64 / total_files as f64 * 100.0
            },
            input_size,
            output_size,
            space_saved: input_size.saturating_sub(output_size),
            compression_ratio: if input_size == 0 {
                1.0
            } else {
                output_size as f64 / input_size as f64
            },
        }
    }
}

/// Everything a finished batch produced
#[derive(Debug)]
pub struct BatchReport {
    pub reports: Vec<FileReport>,
    pub stats: BatchStats,
}

/// The unit of work a batch runs per file.
///
/// Implementations must be shareable across worker threads and must
/// express failure through the returned [`FileError`], never by
/// panicking.
pub trait FileJob: Sync {
    /// Process one file. `output_dir` is `None` for in-place or
    /// read-only batches that configured no output root.
    fn process(&self, input: &Path, output_dir: Option<&Path>) -> Result<FileOutcome, FileError>;
}

impl<F> FileJob for F
where
    F: Fn(&Path, Option<&Path>) -> Result<FileOutcome, FileError> + Sync,
{
    fn process(&self, input: &Path, output_dir: Option<&Path>) -> Result<FileOutcome, FileError> {
        self(input, output_dir)
    }
}

/// Configurable batch runner. Built with chained setters, consumed by
/// [`run`](Self::run).
pub struct BatchProcessor {
    input: PathBuf,
    output: Option<PathBuf>,
    extensions: Vec<String>,
    recursive: bool,
    exclude_patterns: Vec<String>,
    exclude_globs: GlobSet,
    parallel: bool,
    max_workers: Option<usize>,
    show_progress: bool,
}

impl BatchProcessor {
    pub fn new(input: impl Into<PathBuf>) -> Self {
        Self {
            input: input.into(),
            output: None,
            extensions: Vec::new(),
            recursive: false,
            exclude_patterns: Vec::new(),
            exclude_globs: GlobSet::empty(),
            parallel: true,
            max_workers: None,
            show_progress: false,
        }
    }

    /// Write outputs under this root. Without one the job runs output-less
    /// (analysis or in-place work) and nothing is created on disk.
    pub fn output(mut self, dir: impl Into<PathBuf>) -> Self {
        self.output = Some(dir.into());
        self
    }

    /// Restrict discovery to these extensions. Leading dots and case are
    /// ignored; an empty set matches every file.
    pub fn extensions<I, S>(mut self, exts: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.extensions = exts
            .into_iter()
            .map(|e| e.as_ref().trim_start_matches('.').to_lowercase())
            .collect();
        self
    }

    /// Descend into subdirectories during discovery
    pub fn recursive(mut self, yes: bool) -> Self {
        self.recursive = yes;
        self
    }

    /// Skip files whose name matches any of these patterns. A pattern is
    /// treated as a glob when it contains glob metacharacters, otherwise
    /// as a substring of the file name.
    pub fn excludes<I, S>(mut self, patterns: I) -> Result<Self, BatchError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut builder = GlobSetBuilder::new();
        let mut plain = Vec::new();
        for pattern in patterns {
            let pattern = pattern.as_ref().to_string();
            if pattern.contains(['*', '?', '[']) {
                let glob = Glob::new(&pattern).map_err(|e| BatchError::InvalidExclude {
                    pattern: pattern.clone(),
                    message: e.to_string(),
                })?;
                builder.add(glob);
            } else {
                plain.push(pattern);
            }
        }
        self.exclude_globs = builder.build().map_err(|e| BatchError::InvalidExclude {
            pattern: String::new(),
            message: e.to_string(),
        })?;
        self.exclude_patterns = plain;
        Ok(self)
    }

    /// Process files in parallel (the default) or one at a time
    pub fn parallel(mut self, yes: bool) -> Self {
        self.parallel = yes;
        self
    }

    /// Cap the worker pool size. Defaults to
    /// `min(available cores, file count)`.
    pub fn max_workers(mut self, n: usize) -> Self {
        self.max_workers = Some(n.max(1));
        self
    }

    /// Draw a progress bar while processing
    pub fn show_progress(mut self, yes: bool) -> Self {
        self.show_progress = yes;
        self
    }

    fn matches_extension(&self, path: &Path) -> bool {
        if self.extensions.is_empty() {
            return true;
        }
        path.extension()
            .and_then(|e| e.to_str())
            .map(|e| self.extensions.iter().any(|want| want == &e.to_lowercase()))
            .unwrap_or(false)
    }

    fn is_excluded(&self, path: &Path) -> bool {
        let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
            return false;
        };
        if self.exclude_globs.is_match(name) {
            return true;
        }
        self.exclude_patterns.iter().any(|p| name.contains(p.as_str()))
    }

    /// Find the files this batch will process, sorted for deterministic
    /// report order. A file input becomes a single-entry batch when it
    /// matches the extension filter.
    pub fn discover_files(&self) -> Result<Vec<PathBuf>, BatchError> {
        if !self.input.exists() {
            return Err(BatchError::InputMissing(self.input.clone()));
        }

        if self.input.is_file() {
            if self.matches_extension(&self.input) && !self.is_excluded(&self.input) {
                return Ok(vec![self.input.clone()]);
            }
            return Err(BatchError::NoFiles(self.input.clone()));
        }

        let max_depth = if self.recursive { usize::MAX } else { 1 };
        let mut files: Vec<PathBuf> = WalkDir::new(&self.input)
            .max_depth(max_depth)
            .sort_by_file_name()
            .into_iter()
            .filter_map(|entry| entry.ok())
            .filter(|entry| entry.file_type().is_file())
            .map(|entry| entry.into_path())
            .filter(|path| self.matches_extension(path) && !self.is_excluded(path))
            .collect();
        files.sort();

        if files.is_empty() {
            return Err(BatchError::NoFiles(self.input.clone()));
        }
        Ok(files)
    }

    fn worker_count(&self, file_count: usize) -> usize {
        let cores = std::thread::available_parallelism()
            .map(|n| n.get())
            .unwrap_or(1);
        self.max_workers
            .unwrap_or(cores)
            .min(file_count)
            .max(1)
    }

    /// Run a job over every discovered file and aggregate the results.
    ///
    /// The input-size total covers every discovered file, failed ones
    /// included; the output-size total is measured from the output root
    /// after the last file finishes, so it reflects what actually landed
    /// on disk.
    pub fn run<J: FileJob>(&self, job: &J) -> Result<BatchReport, BatchError> {
        let files = self.discover_files()?;

        if let Some(output) = &self.output {
            if output.exists() {
                if !output.is_dir() {
                    return Err(BatchError::OutputNotDir(output.clone()));
                }
            } else {
                fs::create_dir_all(output)?;
            }
        }

        let input_size: u64 = files
            .iter()
            .filter_map(|path| fs::metadata(path).ok())
            .map(|meta| meta.len())
            .sum();

        let bar = if self.show_progress {
            let bar = ProgressBar::new(files.len() as u64);
            bar.set_style(
                ProgressStyle::with_template(
                    "{bar:40} {pos}/{len} [{elapsed_precise}] {msg}",
                )
                .unwrap_or_else(|_| ProgressStyle::default_bar()),
            );
            bar
        } else {
            ProgressBar::hidden()
        };

        let process_one = |path: &PathBuf| -> FileReport {
            let result = job.process(path, self.output.as_deref());
            if let Err(e) = &result {
                tracing::warn!(path = %path.display(), error = %e.message, "file failed");
            }
            bar.inc(1);
            FileReport {
                path: path.clone(),
                result,
            }
        };

        let reports: Vec<FileReport> = if self.parallel && files.len() > 1 {
            let workers = self.worker_count(files.len());
            tracing::debug!(workers, files = files.len(), "starting batch");
            let pool = rayon::ThreadPoolBuilder::new()
                .num_threads(workers)
                .build()
                .map_err(|e| BatchError::Pool(e.to_string()))?;
            pool.install(|| files.par_iter().map(process_one).collect())
        } else {
            files.iter().map(process_one).collect()
        };
        bar.finish_and_clear();

        let output_size = self.output.as_deref().map_or(0, dir_size);
        let stats = BatchStats::compute(&reports, input_size, output_size);
        tracing::info!(
            total = stats.total_files,
            ok = stats.success_count,
            failed = stats.error_count,
            "batch finished"
        );
        Ok(BatchReport { reports, stats })
    }
}

/// Total bytes of all files under a directory, best-effort
fn dir_size(root: &Path) -> u64 {
    WalkDir::new(root)
        .into_iter()
        .filter_map(|entry| entry.ok())
        .filter(|entry| entry.file_type().is_file())
        .filter_map(|entry| entry.metadata().ok())
        .map(|meta| meta.len())
        .sum()
}
