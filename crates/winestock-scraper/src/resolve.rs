//! Resolution of the configured store and category into API identifiers.
//!
//! Lookups return `Option` and the callers turn a miss into a typed error,
//! so an unknown city or address stops the run instead of producing rows
//! with an empty store name.

use winestock_core::{
    slugify, Category, City, MissingCategoryPolicy, Store, StoreTarget,
};

use crate::client::{ListingFilter, SimpleWineClient};
use crate::error::ScraperError;

/// Display name of the city with the given id.
#[must_use]
pub fn city_name_by_id<'a>(cities: &'a [City], id: &str) -> Option<&'a str> {
    cities
        .iter()
        .find(|c| c.id == id)
        .map(|c| c.name.as_str())
}

/// Short code of the city with exactly this display name. A blank code
/// counts as none.
#[must_use]
pub fn city_short_by_name<'a>(cities: &'a [City], name: &str) -> Option<&'a str> {
    cities
        .iter()
        .find(|c| c.name == name)
        .and_then(|c| c.short.as_deref())
        .filter(|s| !s.is_empty())
}

/// First store whose address contains `address`.
#[must_use]
pub fn find_store_by_address<'a>(stores: &'a [Store], address: &str) -> Option<&'a Store> {
    stores.iter().find(|s| s.address.contains(address))
}

/// Narrows the category list to the configured name.
///
/// With no filter every category is returned. With a filter, only an exact
/// name match is returned; what happens on a miss depends on `policy`.
///
/// # Errors
///
/// Returns [`ScraperError::CategoryNotFound`] when the filter matches nothing
/// and `policy` is [`MissingCategoryPolicy::Fail`].
pub fn select_categories(
    categories: Vec<Category>,
    filter: Option<&str>,
    policy: MissingCategoryPolicy,
) -> Result<Vec<Category>, ScraperError> {
    let Some(name) = filter else {
        return Ok(categories);
    };

    match categories.into_iter().find(|c| c.name == name) {
        Some(category) => Ok(vec![category]),
        None => match policy {
            MissingCategoryPolicy::Fail => Err(ScraperError::CategoryNotFound {
                name: name.to_owned(),
            }),
            MissingCategoryPolicy::Empty => {
                tracing::warn!(category = name, "category not found; nothing to collect");
                Ok(Vec::new())
            }
        },
    }
}

/// The target store together with the identifiers the listing needs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedStore {
    pub store: Store,
    pub city_code: String,
    pub store_slug: String,
}

impl ResolvedStore {
    #[must_use]
    pub fn listing_filter(&self) -> ListingFilter {
        ListingFilter::new(self.store_slug.clone(), self.city_code.clone())
    }
}

/// Resolves the configured target into a store, its city code and its slug.
///
/// Fetches the cities list once and the stores list once.
///
/// # Errors
///
/// - [`ScraperError::CityNotFound`] if no city has the target's city name.
/// - [`ScraperError::CityWithoutCode`] if that city has no short code.
/// - [`ScraperError::StoreNotFound`] if no store address contains the
///   target address.
/// - Any error from the cities or stores requests.
pub async fn resolve_store(
    client: &SimpleWineClient,
    target: &StoreTarget,
) -> Result<ResolvedStore, ScraperError> {
    let cities = client.fetch_cities().await?;
    let city_code = match city_short_by_name(&cities, &target.city) {
        Some(code) => code.to_owned(),
        None if cities.iter().any(|c| c.name == target.city) => {
            return Err(ScraperError::CityWithoutCode {
                city: target.city.clone(),
            });
        }
        None => {
            return Err(ScraperError::CityNotFound {
                city: target.city.clone(),
            });
        }
    };

    let stores = client.fetch_stores(&cities).await?;
    tracing::info!(stores = stores.len(), "collected stores and regions");

    let store = find_store_by_address(&stores, &target.address)
        .cloned()
        .ok_or_else(|| ScraperError::StoreNotFound {
            address: target.address.clone(),
        })?;
    let store_slug = slugify(&store.name);

    tracing::info!(
        store = %store.name,
        slug = %store_slug,
        city_code = %city_code,
        "resolved target store"
    );

    Ok(ResolvedStore {
        store,
        city_code,
        store_slug,
    })
}
