//! Plain-text summary export.

use std::io::{self, Write};

use super::{Exporter, Summary};
use crate::analysis::AnalysisOutcome;

/// Number of cycles listed before the rest are elided.
pub const MAX_LISTED_CYCLES: usize = 5;

/// Prints the totals followed by the first [`MAX_LISTED_CYCLES`] cycles.
pub struct SummaryExporter;

impl Exporter for SummaryExporter {
    fn export<W: Write>(&self, outcome: &AnalysisOutcome, writer: &mut W) -> io::Result<()> {
        let summary = Summary::new(outcome);

        writeln!(writer, "Total files: {}", summary.total_files)?;
        writeln!(writer, "Total dependencies: {}", summary.total_dependencies)?;
        writeln!(
            writer,
            "Files with circular dependencies: {}",
            summary.files_with_circular_dependencies
        )?;
        writeln!(writer, "Total cycles: {}", summary.total_cycles)?;

        if outcome.cycles.is_empty() {
            return Ok(());
        }

        writeln!(writer)?;
        writeln!(writer, "Warning: Circular dependencies detected:")?;
        for (i, cycle) in outcome.cycles.iter().take(MAX_LISTED_CYCLES).enumerate() {
            writeln!(writer, "  Cycle {}: {}", i + 1, cycle)?;
        }

        if outcome.cycles.len() > MAX_LISTED_CYCLES {
            writeln!(
                writer,
                "  ... and {} more cycles (see the JSON output for details)",
                outcome.cycles.len() - MAX_LISTED_CYCLES
            )?;
        }

        Ok(())
    }
}
