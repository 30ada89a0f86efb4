//! Utility functions and structures for the optimizer.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;
use std::time::Duration;

use crate::assignment::Assignment;
use crate::ranking::VendorRankingGrid;

/// Round a money amount to whole cents.
pub fn round_cents(amount: f64) -> f64 {
    (amount * 100.0).round() / 100.0
}

/// Format a duration as seconds and milliseconds.
pub fn format_duration(duration: Duration) -> String {
    let total_millis = duration.as_millis();
    let seconds = total_millis / 1000;
    let millis = total_millis % 1000;

    format!("{}.{:03}s", seconds, millis)
}

/// Save assignments to a file as pretty-printed JSON.
pub fn save_assignments<P: AsRef<Path>>(
    assignments: &[Assignment],
    path: P,
) -> std::io::Result<()> {
    let mut writer = BufWriter::new(File::create(path)?);
    serde_json::to_writer_pretty(&mut writer, assignments)?;
    writeln!(writer)?;
    writer.flush()
}

/// Counters describing one optimization run.
#[derive(Debug, Clone, Default)]
pub struct SearchStatistics {
    pub items: usize,
    pub vendors_quoted: usize,
    pub fallback_quotes: usize,
    pub subsets: usize,
    pub candidate_subsets: usize,
    pub partitions_evaluated: usize,
    pub partitions_rejected: usize,
    pub runtime: Duration,
}

impl SearchStatistics {
    /// Format the statistics as a string.
    pub fn format(&self) -> String {
        format!(
            "Search Statistics:
- Items: {}
- Vendors Quoted: {} ({} fallback)
- Subsets Priced: {}
- Candidate Subsets: {}
- Partitions Evaluated: {}
- Partitions Rejected: {}
- Runtime: {}",
            self.items,
            self.vendors_quoted,
            self.fallback_quotes,
            self.subsets,
            self.candidate_subsets,
            self.partitions_evaluated,
            self.partitions_rejected,
            format_duration(self.runtime)
        )
    }
}

/// Render the ranking grid as a plain-text table.
pub fn format_ranking(grid: &VendorRankingGrid) -> String {
    let mut out = String::new();

    for drug in grid.drugs() {
        out.push_str(drug);
        out.push('\n');
        for entry in grid.entries(drug) {
            let when = entry
                .cheapest_when
                .map_or_else(|| "never".to_string(), |k| k.to_string());
            out.push_str(&format!(
                "  {:<20} unit {:>8.2}  items {:>8.2}  shipping {:>8.2}  total {:>8.2}  cheapest when {}\n",
                entry.vendor, entry.unit_cost, entry.subtotal, entry.shipping, entry.order_total, when
            ));
        }
    }

    out
}
