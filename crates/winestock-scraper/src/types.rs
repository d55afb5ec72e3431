//! Response types for the simplewine.ru mobile API.
//!
//! Every endpoint wraps its payload as
//! `{"status": "success", "data": ...}`; failures look like
//! `{"status": "error", "code": 404, ...}`. The envelope status is checked
//! on the raw JSON before these types are deserialized.
//!
//! Identifiers are not consistently typed upstream: store codes, city ids
//! and category ids arrive as either strings or integers, so they are read
//! through [`flexible_string`].

use serde::{de, Deserialize, Deserializer};
use serde_json::Value;

use winestock_core::ProductId;

/// Typed payload of a successful envelope.
#[derive(Debug, Deserialize)]
pub struct Envelope<T> {
    pub data: T,
}

#[derive(Debug, Deserialize)]
pub struct StoreEntry {
    #[serde(deserialize_with = "flexible_string")]
    pub code: String,
    pub name: String,
    /// Id of the store's city in the cities list.
    #[serde(default, deserialize_with = "optional_flexible_string")]
    pub city: Option<String>,
    #[serde(default)]
    pub address: String,
}

#[derive(Debug, Deserialize)]
pub struct CityEntry {
    #[serde(deserialize_with = "flexible_string")]
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub short: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct CategoryEntry {
    #[serde(deserialize_with = "flexible_string")]
    pub category_id: String,
    pub name: String,
}

/// One page of `GET /api/v3/products/{category_id}/`.
#[derive(Debug, Deserialize)]
pub struct ListingPage {
    #[serde(default)]
    pub total_pages: u32,
    #[serde(default)]
    pub items: Vec<ListingItem>,
}

#[derive(Debug, Deserialize)]
pub struct ListingItem {
    #[serde(deserialize_with = "product_id")]
    pub bitrix_id: ProductId,
    #[serde(default)]
    pub available: bool,
}

/// Payload of `GET /api/v3/product/{id}`.
///
/// Scalar fields are kept as raw JSON because the API mixes strings and
/// numbers for the same field across products.
#[derive(Debug, Default, Deserialize)]
pub struct ProductDetail {
    #[serde(default)]
    pub article: Option<Value>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub drink_type: Option<Value>,
    #[serde(default)]
    pub price: Option<Value>,
    #[serde(default)]
    pub old_price: Option<Value>,
    #[serde(default)]
    pub available: Option<bool>,
    /// Spelled `strenght` by the API.
    #[serde(default, alias = "strenght")]
    pub strength: Option<Value>,
    #[serde(default)]
    pub pack: Option<Value>,
    #[serde(default)]
    pub country: Option<Country>,
    #[serde(default)]
    pub manufacturer: Option<Value>,
    #[serde(default)]
    pub url: Option<String>,
    /// Site-relative image paths; the first one is exported.
    #[serde(default)]
    pub image: Option<Vec<String>>,
}

#[derive(Debug, Default, Deserialize)]
pub struct Country {
    #[serde(default)]
    pub name: Option<String>,
}

/// Renders a loosely-typed scalar as an export cell; absent and `null`
/// become an empty string.
#[must_use]
pub fn cell(value: Option<&Value>) -> String {
    match value {
        None | Some(Value::Null) => String::new(),
        Some(Value::String(s)) => s.clone(),
        Some(other) => other.to_string(),
    }
}

fn flexible_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    match Value::deserialize(deserializer)? {
        Value::String(s) => Ok(s),
        Value::Number(n) => Ok(n.to_string()),
        other => Err(de::Error::custom(format!(
            "expected string or number id, got {other}"
        ))),
    }
}

fn optional_flexible_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<Value>::deserialize(deserializer)? {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(s)) => Ok(Some(s)),
        Some(Value::Number(n)) => Ok(Some(n.to_string())),
        Some(other) => Err(de::Error::custom(format!(
            "expected string or number id, got {other}"
        ))),
    }
}

fn product_id<'de, D>(deserializer: D) -> Result<ProductId, D::Error>
where
    D: Deserializer<'de>,
{
    match Value::deserialize(deserializer)? {
        Value::Number(n) => n
            .as_u64()
            .ok_or_else(|| de::Error::custom(format!("product id {n} is not a u64"))),
        Value::String(s) => s
            .trim()
            .parse::<ProductId>()
            .map_err(|e| de::Error::custom(format!("product id \"{s}\": {e}"))),
        other => Err(de::Error::custom(format!(
            "expected numeric product id, got {other}"
        ))),
    }
}
