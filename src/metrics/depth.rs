use super::ExtractError;
use crate::samtools::{ToolMode, ToolRunner};

/// Accumulated per-position depth for one BAM file.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DepthSummary {
    /// Number of positions reported by the tool.
    pub positions: u64,
    /// Sum of depth over all reported positions.
    pub total_depth: u128,
}

impl DepthSummary {
    /// Mean depth, or 0.0 when the tool reported no positions.
    pub fn mean(&self) -> f64 {
        if self.positions == 0 {
            0.0
        } else {
            self.total_depth as f64 / self.positions as f64
        }
    }
}

/// Report rendering: `0` for no positions, otherwise see [`format_mean`].
impl std::fmt::Display for DepthSummary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.positions == 0 {
            return write!(f, "0");
        }
        write!(f, "{}", format_mean(self.mean()))
    }
}

/// Shortest round-trip rendering of a mean depth.
///
/// Positional with at least one fractional digit (`15.0`, `0.0001`) for
/// decimal exponents in `-4..16`; scientific with a signed, two-digit
/// exponent (`5e-05`, `1.5e+16`) outside that range.
pub fn format_mean(mean: f64) -> String {
    let scientific = format!("{mean:e}");
    let (mantissa, exponent) = scientific
        .split_once('e')
        .unwrap_or((scientific.as_str(), "0"));
    let exponent: i32 = exponent.parse().unwrap_or(0);

    if (-4..16).contains(&exponent) {
        let positional = mean.to_string();
        if positional.contains('.') {
            positional
        } else {
            format!("{positional}.0")
        }
    } else {
        let sign = if exponent < 0 { '-' } else { '+' };
        format!("{mantissa}e{sign}{:02}", exponent.abs())
    }
}

/// Parse `samtools depth` output: the third whitespace-separated field of
/// every line is an integer depth.
pub fn parse_depth_output(stdout: &str) -> Result<DepthSummary, ExtractError> {
    let mut summary = DepthSummary::default();
    for (idx, line) in stdout.lines().enumerate() {
        let field = line.split_whitespace().nth(2).ok_or_else(|| ExtractError::Parse {
            line_number: idx + 1,
            line: line.to_string(),
            detail: "missing depth column".to_string(),
        })?;
        let depth: u64 = field.parse().map_err(|e| ExtractError::Parse {
            line_number: idx + 1,
            line: line.to_string(),
            detail: format!("invalid depth '{field}': {e}"),
        })?;
        summary.total_depth = summary
            .total_depth
            .checked_add(u128::from(depth))
            .ok_or_else(|| ExtractError::Parse {
                line_number: idx + 1,
                line: line.to_string(),
                detail: "depth total overflows".to_string(),
            })?;
        summary.positions += 1;
    }
    Ok(summary)
}

/// Run the tool in depth mode over `bam` and summarize its output.
pub fn mean_depth(
    runner: &dyn ToolRunner,
    bam: &str,
    threads: u32,
) -> Result<DepthSummary, ExtractError> {
    let stdout = runner.run(ToolMode::Depth, bam, threads)?;
    parse_depth_output(&stdout)
}
