//! Tab-separated summary report.
//!
//! Header first, then one row per successfully processed BAM file, written
//! as soon as the file's metrics are known.
use crate::metrics::{DepthSummary, MappedPercentage};
use std::io::Write;

pub const HEADER: &str = "File\tMean_depth\tPercentage_of_mapped_reads";

/// Metrics for one BAM file.
#[derive(Debug, Clone, PartialEq)]
pub struct BamStats {
    pub path: String,
    pub depth: DepthSummary,
    pub mapped: MappedPercentage,
}

/// Incremental writer for the report.
pub struct ReportWriter<W: Write> {
    out: W,
}

impl<W: Write> ReportWriter<W> {
    /// Wrap `out` and write the header row.
    pub fn new(mut out: W) -> std::io::Result<Self> {
        writeln!(out, "{HEADER}")?;
        Ok(Self { out })
    }

    pub fn write_row(&mut self, stats: &BamStats) -> std::io::Result<()> {
        writeln!(self.out, "{}\t{}\t{}", stats.path, stats.depth, stats.mapped)
    }

    /// Flush and hand back the underlying writer.
    pub fn finish(mut self) -> std::io::Result<W> {
        self.out.flush()?;
        Ok(self.out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_header_only() {
        let report = ReportWriter::new(Vec::new()).unwrap();
        let bytes = report.finish().unwrap();
        assert_eq!(
            String::from_utf8(bytes).unwrap(),
            "File\tMean_depth\tPercentage_of_mapped_reads\n"
        );
    }

    #[test]
    fn test_rows() {
        let mut report = ReportWriter::new(Vec::new()).unwrap();
        report
            .write_row(&BamStats {
                path: "a.bam".to_string(),
                depth: DepthSummary {
                    positions: 2,
                    total_depth: 30,
                },
                mapped: MappedPercentage::Found("95.50".to_string()),
            })
            .unwrap();
        report
            .write_row(&BamStats {
                path: "empty.bam".to_string(),
                depth: DepthSummary::default(),
                mapped: MappedPercentage::NotFound,
            })
            .unwrap();
        let text = String::from_utf8(report.finish().unwrap()).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[1], "a.bam\t15.0\t95.50");
        assert_eq!(lines[2], "empty.bam\t0\t0");
    }
}
