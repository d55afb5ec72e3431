use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Upstream `bitrix_id` of a product.
pub type ProductId = u64;

/// A physical store from the stores endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Store {
    /// Upstream store `code`.
    pub id: String,
    pub name: String,
    /// Display name of the store's city, when the city id resolved.
    pub region: Option<String>,
    pub address: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct City {
    pub id: String,
    pub name: String,
    /// Short code sent as the `x-city-code` header.
    pub short: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    pub category_id: String,
    pub name: String,
}

/// One output row. Field order is the column order of the export.
///
/// `barcode`, `date_discount`, `weight` and `fatness` are never populated:
/// the product endpoint does not expose them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductRecord {
    pub name_store: String,
    pub city_store: String,
    pub address_store: String,
    pub timestamp: DateTime<Utc>,
    pub article: String,
    pub barcode: String,
    pub name: String,
    pub drink_type: String,
    pub price: String,
    pub old_price: String,
    pub date_discount: String,
    pub available: Option<bool>,
    pub weight: String,
    pub strength: String,
    pub fatness: String,
    pub pack: String,
    pub country: String,
    pub brand: String,
    pub manufacturer: String,
    pub url: String,
    pub url_img: String,
}
