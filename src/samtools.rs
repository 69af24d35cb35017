//! External statistics tool invocation.
//!
//! Expands the configured argument templates into an argv, runs the tool
//! without a shell, and hands back captured stdout. A non-zero exit becomes
//! [`ToolError::CommandFailed`] carrying the tool's stderr verbatim.

use crate::config::ToolConfig;
use std::process::Command;

/// Which statistics the tool is asked for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ToolMode {
    /// Per-position depth lines (`samtools depth`).
    Depth,
    /// Human-readable flag summary (`samtools flagstat`).
    Flagstat,
}

impl std::fmt::Display for ToolMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ToolMode::Depth => write!(f, "depth"),
            ToolMode::Flagstat => write!(f, "flagstat"),
        }
    }
}

/// Errors from running the external tool.
#[derive(Debug)]
pub enum ToolError {
    /// The BAM path was refused before anything was spawned.
    InvalidPath { path: String, reason: &'static str },
    /// Failed to spawn the tool at all.
    Execute {
        command: String,
        source: std::io::Error,
    },
    /// The tool exited with non-zero status.
    CommandFailed { command: String, stderr: String },
}

impl std::fmt::Display for ToolError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ToolError::InvalidPath { path, reason } => {
                write!(f, "refusing BAM path '{path}': {reason}")
            }
            ToolError::Execute { command, source } => {
                write!(f, "failed to execute '{command}': {source}")
            }
            ToolError::CommandFailed { command, stderr } => {
                write!(f, "'{command}' failed: {}", stderr.trim_end())
            }
        }
    }
}

impl std::error::Error for ToolError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ToolError::Execute { source, .. } => Some(source),
            _ => None,
        }
    }
}

/// Runs the statistics tool for one BAM file and returns its stdout.
pub trait ToolRunner {
    fn run(&self, mode: ToolMode, bam: &str, threads: u32) -> Result<String, ToolError>;
}

/// Process-backed runner driven by a [`ToolConfig`].
pub struct Samtools {
    config: ToolConfig,
}

impl Samtools {
    pub fn new(config: ToolConfig) -> Self {
        Self { config }
    }

    /// Build the argv for `mode`, substituting `{threads}` then `{bam}`.
    ///
    /// Threads go first so a path that happens to contain `{threads}` is
    /// passed through untouched.
    pub fn build_args(&self, mode: ToolMode, bam: &str, threads: u32) -> Vec<String> {
        let template = match mode {
            ToolMode::Depth => &self.config.depth_args,
            ToolMode::Flagstat => &self.config.flagstat_args,
        };
        let threads = threads.to_string();
        template
            .iter()
            .map(|arg| arg.replace("{threads}", &threads).replace("{bam}", bam))
            .collect()
    }
}

/// Reject paths the tool would misread.
fn validate_path(bam: &str) -> Result<(), ToolError> {
    if bam.is_empty() {
        return Err(ToolError::InvalidPath {
            path: bam.to_string(),
            reason: "empty path",
        });
    }
    if bam.starts_with('-') {
        return Err(ToolError::InvalidPath {
            path: bam.to_string(),
            reason: "path would be parsed as an option",
        });
    }
    Ok(())
}

impl ToolRunner for Samtools {
    fn run(&self, mode: ToolMode, bam: &str, threads: u32) -> Result<String, ToolError> {
        validate_path(bam)?;

        let args = self.build_args(mode, bam, threads);
        let command_line = std::iter::once(self.config.command.as_str())
            .chain(args.iter().map(String::as_str))
            .collect::<Vec<_>>()
            .join(" ");
        tracing::debug!(%mode, command = %self.config.command, args = ?args, "running tool");

        let output = Command::new(&self.config.command)
            .args(&args)
            .output()
            .map_err(|e| ToolError::Execute {
                command: command_line.clone(),
                source: e,
            })?;

        if !output.status.success() {
            return Err(ToolError::CommandFailed {
                command: command_line,
                stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
            });
        }

        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }
}
