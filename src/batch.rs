//! Recursive directory compression.
//!
//! Walks an input tree with [walkdir](https://docs.rs/walkdir), compresses
//! every supported image through the [`Encoder`] facade, and mirrors the
//! relative layout under the output directory with the target format's
//! suffix. Files are processed in parallel with
//! [rayon](https://docs.rs/rayon); a failure on one file is recorded in the
//! report and never aborts the run.

use std::fs;
use std::path::{Path, PathBuf};

use rayon::prelude::*;
use serde::Serialize;
use thiserror::Error;
use walkdir::WalkDir;

use crate::encoder::Encoder;
use crate::engine::ImageEngine;
use crate::error::Error;

/// Errors that stop a batch run outright. Per-file failures are not here;
/// they land in the report instead.
#[derive(Error, Debug)]
pub enum BatchError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to walk input directory: {0}")]
    Walk(#[from] walkdir::Error),
}

/// Settings for one batch run.
#[derive(Debug, Clone)]
pub struct BatchConfig {
    /// Bounding box width; 0 leaves the axis unconstrained.
    pub max_width: u32,
    /// Bounding box height; 0 leaves the axis unconstrained.
    pub max_height: u32,
    /// Compress quality; `None` uses the compress default.
    pub quality: Option<u32>,
    /// Export everything as low-quality WEBP instead of the source format.
    pub tiny: bool,
}

impl Default for BatchConfig {
    fn default() -> Self {
        Self {
            max_width: 1600,
            max_height: 1600,
            quality: None,
            tiny: false,
        }
    }
}

/// Outcome for a single file.
#[derive(Debug, Clone, Serialize)]
pub struct FileReport {
    /// Path relative to the input directory.
    pub source: PathBuf,
    /// Output path relative to the output directory, when the file succeeded.
    pub output: Option<PathBuf>,
    pub input_bytes: u64,
    pub output_bytes: u64,
    /// Failure message, when the file failed.
    pub error: Option<String>,
}

impl FileReport {
    fn failed(source: PathBuf, input_bytes: u64, error: String) -> Self {
        Self {
            source,
            output: None,
            input_bytes,
            output_bytes: 0,
            error: Some(error),
        }
    }
}

/// Aggregate outcome of a batch run.
#[derive(Debug, Clone, Serialize)]
pub struct BatchReport {
    pub files: Vec<FileReport>,
    pub total_input_bytes: u64,
    pub total_output_bytes: u64,
    pub failures: usize,
}

impl BatchReport {
    fn from_files(mut files: Vec<FileReport>) -> Self {
        // Parallel processing scrambles completion order.
        files.sort_by(|a, b| a.source.cmp(&b.source));
        let total_input_bytes = files.iter().map(|f| f.input_bytes).sum();
        let total_output_bytes = files.iter().map(|f| f.output_bytes).sum();
        let failures = files.iter().filter(|f| f.error.is_some()).count();
        Self {
            files,
            total_input_bytes,
            total_output_bytes,
            failures,
        }
    }
}

/// File extensions picked up by the walk, lowercase.
const INPUT_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png", "gif", "webp"];

fn has_input_extension(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| INPUT_EXTENSIONS.contains(&e.to_ascii_lowercase().as_str()))
        .unwrap_or(false)
}

/// Compress every supported image under `input_dir` into `output_dir`.
///
/// Relative paths are preserved; only the extension changes, to the output
/// format's suffix. Parent directories are created as needed.
pub fn run<E>(
    engine: E,
    input_dir: &Path,
    output_dir: &Path,
    config: &BatchConfig,
) -> Result<BatchReport, BatchError>
where
    E: ImageEngine + Copy + Send + Sync,
{
    let mut sources = Vec::new();
    for entry in WalkDir::new(input_dir) {
        let entry = entry?;
        if entry.file_type().is_file() && has_input_extension(entry.path()) {
            sources.push(entry.into_path());
        }
    }
    sources.sort();

    fs::create_dir_all(output_dir)?;

    let files: Vec<FileReport> = sources
        .par_iter()
        .map(|source| process_file(engine, source, input_dir, output_dir, config))
        .collect();

    Ok(BatchReport::from_files(files))
}

fn process_file<E>(
    engine: E,
    source: &Path,
    input_dir: &Path,
    output_dir: &Path,
    config: &BatchConfig,
) -> FileReport
where
    E: ImageEngine,
{
    let relative = source.strip_prefix(input_dir).unwrap_or(source).to_path_buf();

    let data = match fs::read(source) {
        Ok(data) => data,
        Err(e) => return FileReport::failed(relative, 0, e.to_string()),
    };
    let input_bytes = data.len() as u64;

    match compress_one(engine, data, config) {
        Ok((bytes, suffix)) => {
            let output_rel = relative.with_extension(suffix);
            let output_path = output_dir.join(&output_rel);
            if let Some(parent) = output_path.parent() {
                if let Err(e) = fs::create_dir_all(parent) {
                    return FileReport::failed(relative, input_bytes, e.to_string());
                }
            }
            let output_bytes = bytes.len() as u64;
            match fs::write(&output_path, bytes) {
                Ok(()) => FileReport {
                    source: relative,
                    output: Some(output_rel),
                    input_bytes,
                    output_bytes,
                    error: None,
                },
                Err(e) => FileReport::failed(relative, input_bytes, e.to_string()),
            }
        }
        Err(e) => FileReport::failed(relative, input_bytes, e.to_string()),
    }
}

fn compress_one<E>(
    engine: E,
    data: Vec<u8>,
    config: &BatchConfig,
) -> Result<(Vec<u8>, &'static str), Error>
where
    E: ImageEngine,
{
    let encoder = Encoder::load(engine, data)?;
    if config.tiny {
        let bytes = encoder.tiny(config.max_width, config.max_height)?;
        Ok((bytes, "webp"))
    } else {
        let bytes = encoder.compress(config.max_width, config.max_height, config.quality)?;
        Ok((bytes, encoder.suffix()))
    }
}
