//! CSV renderings of signups and weekly assignments.
//!
//! Both exporters quote every cell, double embedded quotes and end each row
//! with `\n`, matching what the spreadsheets downstream already ingest.

#![forbid(unsafe_code)]

mod assignments;
mod error;
mod naming;
mod signups;

pub use assignments::assignments_csv;
pub use error::ExportError;
pub use naming::{ExportKind, ExportKindParseError, export_file_name};
pub use signups::signups_csv;

pub(crate) fn writer() -> csv::Writer<Vec<u8>> {
    csv::WriterBuilder::new()
        .quote_style(csv::QuoteStyle::Always)
        .terminator(csv::Terminator::Any(b'\n'))
        .flexible(false)
        .from_writer(Vec::new())
}

pub(crate) fn finish(writer: csv::Writer<Vec<u8>>) -> Result<String, ExportError> {
    let bytes = writer
        .into_inner()
        .map_err(|err| ExportError::Io(err.into_error()))?;
    Ok(String::from_utf8(bytes)?)
}
