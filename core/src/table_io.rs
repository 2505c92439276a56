//! Shared CSV reader/writer setup for the tabular files.

use crate::error::{DeskError, DeskResult};
use std::io::Read;

/// Header names are trimmed; cell values are taken verbatim because
/// marketer names and passwords match exactly.
pub fn reader<R: Read>(input: R) -> csv::Reader<R> {
    csv::ReaderBuilder::new()
        .trim(csv::Trim::Headers)
        .from_reader(input)
}

/// Flush an in-memory writer and hand back its bytes.
pub fn finish(writer: csv::Writer<Vec<u8>>) -> DeskResult<Vec<u8>> {
    writer
        .into_inner()
        .map_err(|e| DeskError::Other(anyhow::anyhow!("Cannot flush tabular buffer: {}", e.error())))
}
