//! CSV-backed ledger: the spreadsheet-style customer table.

use super::{stale, LedgerStore};
use crate::{
    customer::{CustomerRecord, ProductSold},
    error::{DeskError, DeskResult, IoError},
    ledger::Ledger,
    table_io,
};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::io::Read;

pub const CUSTOMER_HEADERS: [&str; 7] = [
    "Company Name",
    "Next Meeting",
    "Rating",
    "Product Sold",
    "Product Name",
    "Product Quantity",
    "Marketer",
];

/// On-disk shape of one ledger row.
#[derive(Debug, Serialize, Deserialize)]
struct CustomerRow {
    #[serde(rename = "Company Name")]
    company_name: String,
    #[serde(rename = "Next Meeting")]
    next_meeting: String,
    #[serde(rename = "Rating")]
    rating: u8,
    #[serde(rename = "Product Sold")]
    product_sold: String,
    #[serde(rename = "Product Name", default)]
    product_name: String,
    #[serde(rename = "Product Quantity", default)]
    product_quantity: u64,
    #[serde(rename = "Marketer")]
    marketer: String,
}

impl CustomerRow {
    fn from_record(r: &CustomerRecord, date_format: &str) -> Self {
        Self {
            company_name: r.company_name.clone(),
            next_meeting: r.next_meeting.format(date_format).to_string(),
            rating: r.rating,
            product_sold: ProductSold::from_bool(r.product_sold).label().to_string(),
            product_name: r.product_name.clone(),
            product_quantity: r.product_quantity,
            marketer: r.marketer.clone(),
        }
    }

    fn into_record(self, date_format: &str, path: &str, row: usize) -> DeskResult<CustomerRecord> {
        let malformed = |reason: String| DeskError::MalformedRow {
            path: path.to_string(),
            row,
            reason,
        };
        let next_meeting = NaiveDate::parse_from_str(self.next_meeting.trim(), date_format)
            .map_err(|e| malformed(format!("Next Meeting {:?}: {e}", self.next_meeting)))?;
        let sold = ProductSold::parse(&self.product_sold)
            .ok_or_else(|| malformed(format!("Product Sold {:?} is not Yes/No", self.product_sold)))?;
        CustomerRecord {
            company_name: self.company_name,
            next_meeting,
            rating: self.rating,
            product_sold: sold.as_bool(),
            product_name: self.product_name,
            product_quantity: self.product_quantity,
            marketer: self.marketer,
        }
        .checked()
        .map_err(malformed)
    }
}

/// Encode `records` as a CSV table with the standard headers.
/// An empty ledger still yields the header row.
pub fn encode_customers(records: &[CustomerRecord], date_format: &str) -> DeskResult<Vec<u8>> {
    let mut writer = csv::WriterBuilder::new()
        .has_headers(false)
        .from_writer(Vec::new());
    writer.write_record(CUSTOMER_HEADERS)?;
    for r in records {
        writer.serialize(CustomerRow::from_record(r, date_format))?;
    }
    table_io::finish(writer)
}

/// Decode a CSV ledger table. `path` is only used in error messages.
pub fn decode_customers<R: Read>(
    input: R,
    date_format: &str,
    path: &str,
) -> DeskResult<Vec<CustomerRecord>> {
    let mut reader = table_io::reader(input);
    reader
        .deserialize::<CustomerRow>()
        .enumerate()
        .map(|(i, row)| row?.into_record(date_format, path, i + 1))
        .collect()
}

/// Per-process temp file next to `path`.
pub fn temp_path(path: &str) -> String {
    format!("{path}.{}.tmp", std::process::id())
}

pub struct TabularLedgerStore {
    path: String,
    date_format: String,
}

impl TabularLedgerStore {
    /// Open an existing ledger file. A missing file is a read failure.
    pub fn open(path: &str, date_format: &str) -> DeskResult<Self> {
        let store = Self {
            path: path.to_string(),
            date_format: date_format.to_string(),
        };
        std::fs::metadata(path).map_err(|source| store.read_failed(source))?;
        Ok(store)
    }

    /// Create an empty, header-only ledger file at `path`.
    pub fn create(path: &str, date_format: &str) -> DeskResult<Self> {
        let store = Self {
            path: path.to_string(),
            date_format: date_format.to_string(),
        };
        store.write_file(&encode_customers(&[], date_format)?)?;
        Ok(store)
    }

    fn open_file(&self) -> DeskResult<std::fs::File> {
        std::fs::File::open(&self.path).map_err(|source| self.read_failed(source).into())
    }

    fn read_failed(&self, source: std::io::Error) -> IoError {
        IoError::ReadFailed {
            path: self.path.clone(),
            source,
        }
    }

    fn write_failed(&self, source: std::io::Error) -> IoError {
        IoError::WriteFailed {
            path: self.path.clone(),
            source,
        }
    }

    /// Write to a sibling temp file, then rename over the target so a
    /// failed write never truncates the existing table.
    /// The temp name carries the process id so concurrent writers never
    /// share one; the stale check before it and the rename are still not
    /// atomic together.
    fn write_file(&self, bytes: &[u8]) -> DeskResult<()> {
        let tmp = temp_path(&self.path);
        if let Err(source) = std::fs::write(&tmp, bytes) {
            let _ = std::fs::remove_file(&tmp);
            return Err(self.write_failed(source).into());
        }
        std::fs::rename(&tmp, &self.path).map_err(|source| {
            let _ = std::fs::remove_file(&tmp);
            self.write_failed(source).into()
        })
    }
}

impl LedgerStore for TabularLedgerStore {
    fn location(&self) -> &str {
        &self.path
    }

    fn load(&self) -> DeskResult<Ledger> {
        let records = decode_customers(self.open_file()?, &self.date_format, &self.path)?;
        log::debug!("store: loaded {} rows from {}", records.len(), self.path);
        Ok(Ledger::loaded(records))
    }

    fn stored_len(&self) -> DeskResult<usize> {
        let mut reader = table_io::reader(self.open_file()?);
        let mut count = 0;
        for record in reader.records() {
            record?;
            count += 1;
        }
        Ok(count)
    }

    fn replace_all(&mut self, expected_len: usize, records: &[CustomerRecord]) -> DeskResult<()> {
        let on_disk = self.stored_len()?;
        if on_disk != expected_len {
            return Err(stale(&self.path, expected_len, on_disk).into());
        }
        let bytes = encode_customers(records, &self.date_format)?;
        self.write_file(&bytes)
    }
}
