//! Output module for turning collected entries into the final artifact
//!
//! This module handles:
//! - Deduplicating and sorting entries from all workers
//! - Writing the `Code,Description` CSV file
//! - Printing run statistics

mod aggregate;
mod csv;
pub mod stats;

pub use aggregate::aggregate;
pub use csv::{write_csv, write_csv_file, HEADER};
pub use stats::{completeness, print_statistics};
