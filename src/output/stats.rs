//! Run statistics display

use crate::harvest::HarvestReport;

/// Prints statistics to stdout in a formatted manner
pub fn print_statistics(report: &HarvestReport) {
    println!("=== Harvest Statistics ===\n");

    println!("Overview:");
    println!(
        "  Chapters completed: {}/{}",
        report.chapters_completed, report.chapters_total
    );
    println!("  Nodes expanded: {}", report.nodes_expanded);
    println!("  Failed nodes: {}", report.failed_nodes);
    println!("  Entries collected: {}", report.raw_entries);
    println!("  Unique codes: {}", report.unique_count());
    println!(
        "  Duplicates removed: {}",
        report.raw_entries.saturating_sub(report.unique_count())
    );
    println!("  Elapsed: {:.1}s", report.elapsed.as_secs_f64());
    println!();

    println!("Completeness: {:.1}%", completeness(report));
}

/// Share of attempted nodes that were expanded successfully
pub fn completeness(report: &HarvestReport) -> f64 {
    let attempted = report.nodes_expanded + report.failed_nodes;
    if attempted == 0 {
        return 100.0;
    }
    report.nodes_expanded as f64 / attempted as f64 * 100.0
}
