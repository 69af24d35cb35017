use super::ExtractError;
use crate::samtools::{ToolMode, ToolRunner};

/// Marker identifying the mapped-reads line in `samtools flagstat` output.
const MAPPED_MARKER: &str = "mapped (";

/// Mapped-read percentage as printed by the tool.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MappedPercentage {
    /// Token taken from the mapped line with `(`, `)` and `%` trimmed.
    /// Not validated as numeric.
    Found(String),
    /// No mapped line in the output. Renders as `0` in the report.
    NotFound,
}

impl std::fmt::Display for MappedPercentage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MappedPercentage::Found(token) => write!(f, "{token}"),
            MappedPercentage::NotFound => write!(f, "0"),
        }
    }
}

/// Scan flagstat output for the first line containing `mapped (` and take
/// its fifth whitespace-separated token.
///
/// ```text
/// 100 + 0 mapped (95.50% : N/A)
///                 ^^^^^^^ -> "95.50"
/// ```
///
/// No matching line yields [`MappedPercentage::NotFound`]; a matching line
/// without a fifth token is a parse error.
pub fn parse_flagstat_output(stdout: &str) -> Result<MappedPercentage, ExtractError> {
    let Some((idx, line)) = stdout
        .lines()
        .enumerate()
        .find(|(_, line)| line.contains(MAPPED_MARKER))
    else {
        return Ok(MappedPercentage::NotFound);
    };
    let token = line.split_whitespace().nth(4).ok_or_else(|| ExtractError::Parse {
        line_number: idx + 1,
        line: line.to_string(),
        detail: "missing percentage token".to_string(),
    })?;
    Ok(MappedPercentage::Found(
        token.trim_matches(|c| matches!(c, '(' | ')' | '%')).to_string(),
    ))
}

/// Run the tool in flagstat mode over `bam` and extract the mapped percentage.
pub fn proportion_mapped(
    runner: &dyn ToolRunner,
    bam: &str,
    threads: u32,
) -> Result<MappedPercentage, ExtractError> {
    let stdout = runner.run(ToolMode::Flagstat, bam, threads)?;
    parse_flagstat_output(&stdout)
}
