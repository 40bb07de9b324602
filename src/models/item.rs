//! Items submitted in request bodies.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// An item built from a request body. Never stored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Item {
    /// Item name.
    pub name: String,
    /// Optional free-form description.
    #[serde(default)]
    pub description: Option<String>,
    /// Net price.
    pub price: f64,
    /// Optional tax added on top of the price.
    #[serde(default)]
    pub tax: Option<f64>,
}

impl Item {
    /// Price including tax. A missing or zero tax yields `None`.
    pub fn price_with_tax(&self) -> Option<f64> {
        match self.tax {
            Some(tax) if tax != 0.0 => Some(self.price + tax),
            _ => None,
        }
    }
}
