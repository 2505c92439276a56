//! Customer records and the add-customer form.

use crate::{error::ValidationError, session::Identity, types::MarketerName};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

pub const MIN_RATING: i64 = 1;
pub const MAX_RATING: i64 = 5;

/// One visit/sale row in the ledger.
///
/// Invariant: `product_sold == false` implies an empty `product_name`
/// and a zero `product_quantity`. Records built through
/// `NewCustomer::into_record` always satisfy it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CustomerRecord {
    pub company_name: String,
    pub next_meeting: NaiveDate,
    pub rating: u8,
    pub product_sold: bool,
    pub product_name: String,
    pub product_quantity: u64,
    pub marketer: MarketerName,
}

impl CustomerRecord {
    /// Check a row read back from a store.
    ///
    /// A rating outside 1..=5 is refused. Product fields on an unsold row
    /// are cleared, the same normalization `into_record` applies on append.
    pub fn checked(mut self) -> Result<Self, String> {
        if !(MIN_RATING..=MAX_RATING).contains(&i64::from(self.rating)) {
            return Err(format!(
                "Rating {} outside {MIN_RATING}..={MAX_RATING}",
                self.rating
            ));
        }
        if !self.product_sold && (!self.product_name.is_empty() || self.product_quantity != 0) {
            log::warn!(
                "customer: unsold row for {:?} carried product {:?} x {}, cleared",
                self.company_name,
                self.product_name,
                self.product_quantity
            );
            self.product_name.clear();
            self.product_quantity = 0;
        }
        Ok(self)
    }
}

/// The Yes/No selector on the form and in the `Product Sold` column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ProductSold {
    Yes,
    No,
}

impl ProductSold {
    pub fn as_bool(self) -> bool {
        matches!(self, ProductSold::Yes)
    }

    pub fn from_bool(sold: bool) -> Self {
        if sold { ProductSold::Yes } else { ProductSold::No }
    }

    pub fn label(self) -> &'static str {
        match self {
            ProductSold::Yes => "Yes",
            ProductSold::No  => "No",
        }
    }

    pub fn parse(label: &str) -> Option<Self> {
        match label.trim() {
            "Yes" => Some(ProductSold::Yes),
            "No"  => Some(ProductSold::No),
            _     => None,
        }
    }
}

/// Raw add-customer form input. Numbers are signed so that out-of-range
/// input reaches validation instead of failing to parse.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewCustomer {
    pub company_name: String,
    pub next_meeting: NaiveDate,
    pub rating: i64,
    pub product_sold: ProductSold,
    #[serde(default)]
    pub product_name: String,
    #[serde(default)]
    pub product_quantity: i64,
}

impl NewCustomer {
    /// Validate and normalize into a ledger record owned by `identity`.
    ///
    /// The marketer tag always comes from the identity; the form has no
    /// way to name another marketer.
    pub fn into_record(self, identity: &Identity) -> Result<CustomerRecord, ValidationError> {
        if !(MIN_RATING..=MAX_RATING).contains(&self.rating) {
            return Err(ValidationError::RatingOutOfRange { rating: self.rating });
        }

        let sold = self.product_sold.as_bool();
        let (product_name, product_quantity) = if sold {
            if self.product_quantity < 0 {
                return Err(ValidationError::NegativeQuantity {
                    quantity: self.product_quantity,
                });
            }
            (self.product_name, self.product_quantity as u64)
        } else {
            (String::new(), 0)
        };

        Ok(CustomerRecord {
            company_name: self.company_name,
            next_meeting: self.next_meeting,
            rating: self.rating as u8,
            product_sold: sold,
            product_name,
            product_quantity,
            marketer: identity.name().to_string(),
        })
    }
}
