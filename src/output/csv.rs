//! CSV export of harvested entries

use crate::catalog::Entry;
use std::borrow::Cow;
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;

/// Header row written before any entry
pub const HEADER: [&str; 2] = ["Code", "Description"];

/// Quotes a field when it contains a delimiter, quote, line break, or leading space
fn escape_field(field: &str) -> Cow<'_, str> {
    let needs_quotes = field.starts_with(' ')
        || field
            .chars()
            .any(|c| matches!(c, ',' | '"' | '\r' | '\n'));

    if needs_quotes {
        Cow::Owned(format!("\"{}\"", field.replace('"', "\"\"")))
    } else {
        Cow::Borrowed(field)
    }
}

fn write_record<W: Write>(writer: &mut W, fields: &[&str]) -> io::Result<()> {
    let line = fields
        .iter()
        .map(|field| escape_field(field))
        .collect::<Vec<_>>()
        .join(",");
    writeln!(writer, "{}", line)
}

/// Writes the header and one row per entry, in the given order
pub fn write_csv<W: Write>(writer: &mut W, entries: &[Entry]) -> io::Result<()> {
    write_record(writer, &HEADER)?;
    for entry in entries {
        write_record(writer, &[entry.code.as_str(), entry.description.as_str()])?;
    }
    writer.flush()
}

/// Creates (or truncates) `path` and writes the entries to it
pub fn write_csv_file(path: &Path, entries: &[Entry]) -> io::Result<()> {
    let mut writer = BufWriter::new(File::create(path)?);
    write_csv(&mut writer, entries)
}
