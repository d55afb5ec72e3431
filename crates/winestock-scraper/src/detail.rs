//! Flattening of product detail payloads into export rows.

use chrono::{DateTime, Utc};

use winestock_core::{ProductRecord, StoreTarget};

use crate::resolve::ResolvedStore;
use crate::types::{cell, ProductDetail};

/// Store columns shared by every row of a run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordContext {
    pub store_name: String,
    pub city: String,
    pub address: String,
}

impl RecordContext {
    #[must_use]
    pub fn new(resolved: &ResolvedStore, target: &StoreTarget) -> Self {
        Self {
            store_name: resolved.store.name.clone(),
            city: target.city.clone(),
            address: target.street.clone(),
        }
    }
}

/// Builds the export row for one product.
///
/// Missing upstream fields become empty strings. `brand` repeats
/// `manufacturer`; the image URL is `site_origin` joined with the first
/// image path.
#[must_use]
pub fn to_record(
    detail: ProductDetail,
    ctx: &RecordContext,
    captured_at: DateTime<Utc>,
    site_origin: &str,
) -> ProductRecord {
    let manufacturer = cell(detail.manufacturer.as_ref());
    let url_img = detail
        .image
        .as_deref()
        .and_then(<[String]>::first)
        .map(|path| image_url(site_origin, path))
        .unwrap_or_default();
    let country = detail
        .country
        .and_then(|c| c.name)
        .unwrap_or_default();

    ProductRecord {
        name_store: ctx.store_name.clone(),
        city_store: ctx.city.clone(),
        address_store: ctx.address.clone(),
        timestamp: captured_at,
        article: cell(detail.article.as_ref()),
        barcode: String::new(),
        name: detail.name.unwrap_or_default(),
        drink_type: cell(detail.drink_type.as_ref()),
        price: cell(detail.price.as_ref()),
        old_price: cell(detail.old_price.as_ref()),
        date_discount: String::new(),
        available: detail.available,
        weight: String::new(),
        strength: cell(detail.strength.as_ref()),
        fatness: String::new(),
        pack: cell(detail.pack.as_ref()),
        country,
        brand: manufacturer.clone(),
        manufacturer,
        url: detail.url.unwrap_or_default(),
        url_img,
    }
}

fn image_url(site_origin: &str, path: &str) -> String {
    if path.starts_with("http://") || path.starts_with("https://") {
        return path.to_owned();
    }
    format!(
        "{}/{}",
        site_origin.trim_end_matches('/'),
        path.trim_start_matches('/')
    )
}
