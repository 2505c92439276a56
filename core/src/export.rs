//! Downloadable copies of the marketer and customer tables.

use crate::{
    credential::CredentialStore,
    customer::CustomerRecord,
    error::DeskResult,
    store::encode_customers,
    types::EXPORT_MIME_TYPE,
};
use serde::Serialize;

pub const MARKETERS_EXPORT_NAME: &str = "marketers_data.xlsx";
pub const CUSTOMERS_EXPORT_NAME: &str = "updated_customers.xlsx";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Export {
    pub file_name: String,
    pub mime_type: String,
    pub bytes: Vec<u8>,
}

pub fn export_marketers(credentials: &CredentialStore) -> DeskResult<Export> {
    let bytes = credentials.to_tabular_bytes()?;
    log::info!(
        "export: {MARKETERS_EXPORT_NAME} with {} marketers ({} bytes)",
        credentials.marketers().len(),
        bytes.len()
    );
    Ok(Export {
        file_name: MARKETERS_EXPORT_NAME.into(),
        mime_type: EXPORT_MIME_TYPE.into(),
        bytes,
    })
}

/// Export the full ledger, every marketer included.
pub fn export_customers(records: &[CustomerRecord], date_format: &str) -> DeskResult<Export> {
    let bytes = encode_customers(records, date_format)?;
    log::info!(
        "export: {CUSTOMERS_EXPORT_NAME} with {} customers ({} bytes)",
        records.len(),
        bytes.len()
    );
    Ok(Export {
        file_name: CUSTOMERS_EXPORT_NAME.into(),
        mime_type: EXPORT_MIME_TYPE.into(),
        bytes,
    })
}
