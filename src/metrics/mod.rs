//! Metric extraction from statistics tool output.
//!
//! Each extractor runs the tool once through a [`ToolRunner`] and parses the
//! text it prints. Parsing is kept in separate pure functions so it can be
//! checked against captured tool output.
pub mod depth;
pub mod flagstat;

pub use depth::{mean_depth, DepthSummary};
pub use flagstat::{proportion_mapped, MappedPercentage};

use crate::samtools::ToolError;

/// Errors produced while extracting a metric for one BAM file.
#[derive(Debug)]
pub enum ExtractError {
    Tool(ToolError),
    /// Tool succeeded but printed a line we could not interpret.
    Parse {
        line_number: usize,
        line: String,
        detail: String,
    },
}

impl std::fmt::Display for ExtractError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ExtractError::Tool(e) => write!(f, "{e}"),
            ExtractError::Parse {
                line_number,
                line,
                detail,
            } => write!(f, "parse error on output line {line_number} ({line:?}): {detail}"),
        }
    }
}

impl std::error::Error for ExtractError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ExtractError::Tool(e) => Some(e),
            ExtractError::Parse { .. } => None,
        }
    }
}

impl From<ToolError> for ExtractError {
    fn from(e: ToolError) -> Self {
        ExtractError::Tool(e)
    }
}

#[cfg(test)]
pub(crate) mod testing {
    use crate::samtools::{ToolError, ToolMode, ToolRunner};
    use std::collections::HashMap;

    /// Canned tool output keyed by (mode, bam).
    #[derive(Default)]
    pub struct CannedRunner {
        outputs: HashMap<(ToolMode, String), Result<String, String>>,
    }

    impl CannedRunner {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn ok(mut self, mode: ToolMode, bam: &str, stdout: &str) -> Self {
            self.outputs
                .insert((mode, bam.to_string()), Ok(stdout.to_string()));
            self
        }

        pub fn fail(mut self, mode: ToolMode, bam: &str, stderr: &str) -> Self {
            self.outputs
                .insert((mode, bam.to_string()), Err(stderr.to_string()));
            self
        }
    }

    impl ToolRunner for CannedRunner {
        fn run(&self, mode: ToolMode, bam: &str, _threads: u32) -> Result<String, ToolError> {
            match self.outputs.get(&(mode, bam.to_string())) {
                Some(Ok(stdout)) => Ok(stdout.clone()),
                Some(Err(stderr)) => Err(ToolError::CommandFailed {
                    command: format!("samtools {mode} {bam}"),
                    stderr: stderr.clone(),
                }),
                None => Err(ToolError::CommandFailed {
                    command: format!("samtools {mode} {bam}"),
                    stderr: format!("[E::hts_open_format] Failed to open file \"{bam}\"\n"),
                }),
            }
        }
    }
}
