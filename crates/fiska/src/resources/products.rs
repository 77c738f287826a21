//! Products: the catalog items invoice lines reference.

use serde::{Deserialize, Serialize};

use crate::endpoint::ApiResource;
use crate::types::Money;

/// Marker type selecting the products endpoint.
#[derive(Debug, Clone, Copy)]
pub struct Product;

impl ApiResource for Product {
    const KIND: &'static str = "products";
    const PATH: &'static str = "products";
    type Attributes = ProductAttributes;
    type Filter = ProductFilter;
}

/// Product attributes. Unset fields are omitted from request bodies.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProductAttributes {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Net price per unit.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub unit_price: Option<Money>,
    /// VAT percentage, e.g. 21.0.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub vat_rate: Option<f64>,
}

/// Server-side filter keys for listing products.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ProductFilter {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}
