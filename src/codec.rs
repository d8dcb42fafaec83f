//! Delimited line reading and writing shared by both stores.
//!
//! Quoting is disabled in both directions, so a field must never contain the
//! delimiter or a line break: writers refuse such fields up front. A
//! hand-edited line with a stray delimiter is rejected on read for having the
//! wrong number of fields.

use crate::error::{LedgerError, LineError, Result};
use csv::{QuoteStyle, ReaderBuilder, Writer, WriterBuilder};
use log::warn;
use serde::de::DeserializeOwned;
use std::io::{Read, Write};
use std::path::Path;

/// Field delimiter of transaction lines.
pub const TRANSACTION_DELIMITER: u8 = b',';

/// Field delimiter of account lines.
pub const ACCOUNT_DELIMITER: u8 = b'|';

/// Builds a header-less, unquoted writer for `delimiter`-separated lines.
pub fn line_writer<W: Write>(writer: W, delimiter: u8) -> Writer<W> {
    WriterBuilder::new()
        .has_headers(false)
        .delimiter(delimiter)
        .quote_style(QuoteStyle::Never)
        .from_writer(writer)
}

/// Returns `true` if `value` fits in one field of a `delimiter`-separated line.
pub fn is_storable(value: &str, delimiter: u8) -> bool {
    !value
        .bytes()
        .any(|b| b == delimiter || b == b'\n' || b == b'\r')
}

/// Fails on the first field that would split or break its line.
pub fn check_storable<S: AsRef<str>>(fields: &[S], delimiter: u8) -> Result<()> {
    match fields.iter().find(|f| !is_storable(f.as_ref(), delimiter)) {
        Some(field) => Err(LedgerError::UnstorableField(field.as_ref().to_string())),
        None => Ok(()),
    }
}

/// Reads every well-formed line from `reader`.
///
/// A line is kept only if it has exactly `fields` fields, deserializes into
/// `Raw` and passes `parse`. Anything else is logged with its location in
/// `source` and skipped. Only underlying I/O failures are returned as errors.
pub fn read_lines<R, Raw, T, F>(
    reader: R,
    delimiter: u8,
    fields: usize,
    source: &Path,
    parse: F,
) -> Result<Vec<T>>
where
    R: Read,
    Raw: DeserializeOwned,
    F: Fn(Raw) -> std::result::Result<T, LineError>,
{
    let mut csv_reader = ReaderBuilder::new()
        .has_headers(false)
        .delimiter(delimiter)
        .quoting(false)
        .flexible(true)
        .from_reader(reader);

    let mut parsed = Vec::new();

    for result in csv_reader.records() {
        let record = match result {
            Ok(record) => record,
            Err(e) if e.is_io_error() => return Err(e.into()),
            Err(e) => {
                warn!("{}: skipping unreadable line: {}", source.display(), e);
                continue;
            }
        };
        let line = record.position().map(|p| p.line()).unwrap_or_default();

        if record.len() != fields {
            let err = LineError::Arity {
                expected: fields,
                found: record.len(),
            };
            warn!("{}:{}: skipping malformed line: {}", source.display(), line, err);
            continue;
        }

        match record.deserialize::<Raw>(None) {
            Ok(raw) => match parse(raw) {
                Ok(value) => parsed.push(value),
                Err(err) => {
                    warn!("{}:{}: skipping malformed line: {}", source.display(), line, err);
                }
            },
            Err(e) => {
                warn!("{}:{}: skipping malformed line: {}", source.display(), line, e);
            }
        }
    }

    Ok(parsed)
}
