//! One method per upstream endpoint.

use winestock_core::{Category, City, ProductId, Store};

use crate::error::ScraperError;
use crate::resolve::city_name_by_id;
use crate::types::{CategoryEntry, CityEntry, ListingPage, ProductDetail, StoreEntry};

use super::{decode, ListingFilter, SimpleWineClient, LISTING_API_VERSION, LISTING_PAGE_SIZE};

impl SimpleWineClient {
    /// Fetches `GET /api/{version}/cities`. Dumped as `cities_id.json`.
    ///
    /// # Errors
    ///
    /// Any error from the request, or [`ScraperError::Deserialize`] if the
    /// payload is not a list of cities.
    pub async fn fetch_cities(&self) -> Result<Vec<City>, ScraperError> {
        let url = self.api_url(&[self.api_version.as_str(), "cities"]);
        let body = self.request_json("cities", url, None).await?;
        self.dumper.save("cities_id.json", &body)?;

        let entries: Vec<CityEntry> = decode("cities", body)?;
        Ok(entries
            .into_iter()
            .map(|c| City {
                id: c.id,
                name: c.name,
                short: c.short,
            })
            .collect())
    }

    /// Fetches `GET /api/{version}/stores`, resolving each store's city id
    /// against `cities`. Dumped as `info_shops.json`.
    ///
    /// # Errors
    ///
    /// Any error from the request, or [`ScraperError::Deserialize`] if the
    /// payload is not a list of stores.
    pub async fn fetch_stores(&self, cities: &[City]) -> Result<Vec<Store>, ScraperError> {
        let url = self.api_url(&[self.api_version.as_str(), "stores"]);
        let body = self.request_json("stores", url, None).await?;
        self.dumper.save("info_shops.json", &body)?;

        let entries: Vec<StoreEntry> = decode("stores", body)?;
        Ok(entries
            .into_iter()
            .map(|s| {
                let region = s
                    .city
                    .as_deref()
                    .and_then(|id| city_name_by_id(cities, id))
                    .map(str::to_owned);
                Store {
                    id: s.code,
                    name: s.name,
                    region,
                    address: s.address,
                }
            })
            .collect())
    }

    /// Fetches `GET /api/{version}/categories`. Newlines inside category
    /// names are replaced by spaces. Dumped as `info_categories.json`.
    ///
    /// # Errors
    ///
    /// Any error from the request, or [`ScraperError::Deserialize`] if the
    /// payload is not a list of categories.
    pub async fn fetch_categories(&self) -> Result<Vec<Category>, ScraperError> {
        let url = self.api_url(&[self.api_version.as_str(), "categories"]);
        let body = self.request_json("categories", url, None).await?;
        self.dumper.save("info_categories.json", &body)?;

        let entries: Vec<CategoryEntry> = decode("categories", body)?;
        Ok(entries
            .into_iter()
            .map(|c| Category {
                category_id: c.category_id,
                name: c.name.replace('\n', " "),
            })
            .collect())
    }

    /// Fetches one page of a category listing scoped to the filter's store.
    /// Paced.
    ///
    /// # Errors
    ///
    /// [`ScraperError::Upstream`] for an error envelope, any transport
    /// error, or [`ScraperError::Deserialize`] for an unexpected payload.
    pub async fn fetch_listing_page(
        &self,
        category_id: &str,
        page: u32,
        filter: &ListingFilter,
    ) -> Result<ListingPage, ScraperError> {
        let mut url = self.api_url(&[LISTING_API_VERSION, "products", category_id, ""]);
        url.query_pairs_mut()
            .append_pair("page", &page.to_string())
            .append_pair("limit", &LISTING_PAGE_SIZE.to_string())
            .append_pair("show_filter", "Y")
            .append_pair("sort", "our_choice")
            .append_pair("filter", &filter.filter_param());

        let headers = self.device_headers(&filter.city_code)?;
        let result = self.request_json("products", url, Some(&headers)).await;
        self.pacing.pause().await;
        decode("products", result?)
    }

    /// Fetches the detail payload of one product. Paced.
    ///
    /// # Errors
    ///
    /// [`ScraperError::Upstream`] for an error envelope, any transport
    /// error, or [`ScraperError::Deserialize`] for an unexpected payload.
    pub async fn fetch_product(
        &self,
        id: ProductId,
        city_code: &str,
    ) -> Result<ProductDetail, ScraperError> {
        let id_segment = id.to_string();
        let url = self.api_url(&[LISTING_API_VERSION, "product", id_segment.as_str()]);

        let headers = self.device_headers(city_code)?;
        let result = self.request_json("product", url, Some(&headers)).await;
        self.pacing.pause().await;
        decode("product", result?)
    }
}
