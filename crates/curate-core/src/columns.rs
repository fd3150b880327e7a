//! # Required Columns
//!
//! The fixed, ordered set of columns every curated order row must carry
//! with a non-empty value. Order matters: the reject-first policy stops at
//! the first missing column in this order.

use crate::table::Header;

/// The eight columns required on every order row, in check order.
pub const ORDER_COLUMNS: [&str; 8] = [
    "order_id",
    "order_date",
    "customer_id",
    "product_name",
    "quantity",
    "unit_price",
    "order_status",
    "created_at",
];

/// An ordered sequence of required column names.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequiredColumns {
    names: Vec<&'static str>,
}

impl RequiredColumns {
    /// The order-file column set ([`ORDER_COLUMNS`]).
    pub fn orders() -> Self {
        Self {
            names: ORDER_COLUMNS.to_vec(),
        }
    }

    /// A custom column set, checked in the given order.
    pub fn new(names: impl IntoIterator<Item = &'static str>) -> Self {
        Self {
            names: names.into_iter().collect(),
        }
    }

    /// Column names in check order.
    pub fn names(&self) -> &[&'static str] {
        &self.names
    }

    /// Number of required columns.
    pub fn len(&self) -> usize {
        self.names.len()
    }

    /// True when nothing is required.
    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    /// Required columns the header does not declare at all.
    ///
    /// Every data row will report these as missing.
    pub fn absent_from(&self, header: &Header) -> Vec<&'static str> {
        self.names
            .iter()
            .copied()
            .filter(|name| header.position(name).is_none())
            .collect()
    }
}

impl Default for RequiredColumns {
    fn default() -> Self {
        Self::orders()
    }
}
