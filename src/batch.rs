//! Batch driver: manifest in, report out.
//!
//! Files are processed strictly in manifest order, one at a time. A failure
//! on one file is logged and the file is left out of the report; the batch
//! itself only stops on manifest or report I/O errors.

use crate::metrics::{self, ExtractError, MappedPercentage};
use crate::report::{BamStats, ReportWriter};
use crate::samtools::ToolRunner;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use tracing::{error, info, warn};

/// Outcome counts for a finished batch.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BatchSummary {
    pub processed: usize,
    pub failed: usize,
}

/// Errors that stop the whole batch.
#[derive(Debug)]
pub enum BatchError {
    Manifest {
        path: PathBuf,
        source: std::io::Error,
    },
    Report {
        path: PathBuf,
        source: std::io::Error,
    },
}

impl std::fmt::Display for BatchError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BatchError::Manifest { path, source } => {
                write!(f, "failed to read manifest {}: {}", path.display(), source)
            }
            BatchError::Report { path, source } => {
                write!(f, "failed to write report {}: {}", path.display(), source)
            }
        }
    }
}

impl std::error::Error for BatchError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            BatchError::Manifest { source, .. } => Some(source),
            BatchError::Report { source, .. } => Some(source),
        }
    }
}

/// Split manifest text into BAM paths, one per line, trimmed.
///
/// Blank lines are kept; they fail path validation downstream and show up as
/// per-file errors.
pub fn parse_manifest(contents: &str) -> Vec<String> {
    contents.lines().map(|line| line.trim().to_string()).collect()
}

pub fn read_manifest(path: &Path) -> Result<Vec<String>, BatchError> {
    let contents = std::fs::read_to_string(path).map_err(|e| BatchError::Manifest {
        path: path.to_path_buf(),
        source: e,
    })?;
    Ok(parse_manifest(&contents))
}

/// Compute depth and mapped percentage for one BAM file.
pub fn collect_stats(
    runner: &dyn ToolRunner,
    bam: &str,
    threads: u32,
) -> Result<BamStats, ExtractError> {
    let depth = metrics::mean_depth(runner, bam, threads)?;
    let mapped = metrics::proportion_mapped(runner, bam, threads)?;
    Ok(BamStats {
        path: bam.to_string(),
        depth,
        mapped,
    })
}

/// Process every path in order, writing a row per success to `out`.
pub fn write_report<W: Write>(
    runner: &dyn ToolRunner,
    bam_files: &[String],
    threads: u32,
    out: W,
) -> std::io::Result<BatchSummary> {
    let mut report = ReportWriter::new(out)?;
    let mut summary = BatchSummary::default();

    for bam in bam_files {
        match collect_stats(runner, bam, threads) {
            Ok(stats) => {
                if stats.mapped == MappedPercentage::NotFound {
                    warn!(file = %bam, "no mapped line in flagstat output, reporting 0");
                }
                report.write_row(&stats)?;
                summary.processed += 1;
            }
            Err(e) => {
                error!(file = %bam, "error processing {bam}: {e}");
                summary.failed += 1;
            }
        }
    }

    report.finish()?;
    Ok(summary)
}

/// Read the manifest at `input`, and write the report to `output`.
pub fn process_bam_files(
    runner: &dyn ToolRunner,
    input: &Path,
    output: &Path,
    threads: u32,
) -> Result<BatchSummary, BatchError> {
    let bam_files = read_manifest(input)?;
    info!(
        manifest = %input.display(),
        files = bam_files.len(),
        threads,
        "processing BAM files"
    );

    let report_err = |e: std::io::Error| BatchError::Report {
        path: output.to_path_buf(),
        source: e,
    };
    let file = std::fs::File::create(output).map_err(report_err)?;
    let summary =
        write_report(runner, &bam_files, threads, BufWriter::new(file)).map_err(report_err)?;

    info!(
        processed = summary.processed,
        failed = summary.failed,
        report = %output.display(),
        "batch complete"
    );
    Ok(summary)
}
