//! Paginated collection of product ids across categories.

use std::collections::BTreeSet;

use winestock_core::{Category, ProductId};

use crate::client::{ListingFilter, SimpleWineClient};
use crate::error::ScraperError;
use crate::types::ListingItem;

/// Upper bound on `total_pages` for a single category. A larger value is
/// treated as a broken response rather than walked.
pub const MAX_PAGES: u32 = 500;

/// Counts reported after deduplication.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CollectionSummary {
    /// Ids collected across all pages, duplicates included.
    pub total: usize,
    pub duplicates: usize,
    pub unique: usize,
}

/// Deduplicated ids, ascending.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CollectedIds {
    pub ids: BTreeSet<ProductId>,
    pub summary: CollectionSummary,
}

impl CollectedIds {
    /// Reduces an ordered id list to a set and counts what was dropped.
    #[must_use]
    pub fn from_ids(ids: Vec<ProductId>) -> Self {
        let total = ids.len();
        let ids: BTreeSet<ProductId> = ids.into_iter().collect();
        let unique = ids.len();
        Self {
            ids,
            summary: CollectionSummary {
                total,
                duplicates: total - unique,
                unique,
            },
        }
    }
}

/// Ids from one page: every item, or only available ones.
pub fn page_ids(items: &[ListingItem], available_only: bool) -> impl Iterator<Item = ProductId> + '_ {
    items
        .iter()
        .filter(move |item| !available_only || item.available)
        .map(|item| item.bitrix_id)
}

impl SimpleWineClient {
    /// Walks every page of one category listing and returns the ids in page
    /// order, duplicates included.
    ///
    /// Page 1 also reports `total_pages`; pages `2..=total_pages` follow in
    /// ascending order, so a category of N pages costs exactly N requests.
    ///
    /// # Errors
    ///
    /// Stops at the first failing page and returns its error; no further
    /// pages are requested. Returns [`ScraperError::PaginationLimit`] if the
    /// category reports more than [`MAX_PAGES`] pages.
    pub async fn collect_category_ids(
        &self,
        category: &Category,
        filter: &ListingFilter,
        available_only: bool,
    ) -> Result<Vec<ProductId>, ScraperError> {
        let first = self
            .fetch_listing_page(&category.category_id, 1, filter)
            .await?;
        let total_pages = first.total_pages;
        if total_pages > MAX_PAGES {
            return Err(ScraperError::PaginationLimit {
                category_id: category.category_id.clone(),
                total_pages,
                max_pages: MAX_PAGES,
            });
        }
        if total_pages == 0 {
            tracing::info!(category = %category.name, "category listing is empty");
            return Ok(Vec::new());
        }

        let mut ids: Vec<ProductId> = page_ids(&first.items, available_only).collect();
        tracing::info!(category = %category.name, page = 1, total_pages, "pages collected");

        for page in 2..=total_pages {
            let response = self
                .fetch_listing_page(&category.category_id, page, filter)
                .await?;
            ids.extend(page_ids(&response.items, available_only));
            tracing::info!(category = %category.name, page, total_pages, "pages collected");
        }

        Ok(ids)
    }

    /// Collects ids for every category in order and deduplicates them.
    ///
    /// # Errors
    ///
    /// Propagates the first error from [`Self::collect_category_ids`]; ids
    /// gathered before the failure are discarded.
    pub async fn collect_product_ids(
        &self,
        categories: &[Category],
        filter: &ListingFilter,
        available_only: bool,
    ) -> Result<CollectedIds, ScraperError> {
        let mut all_ids: Vec<ProductId> = Vec::new();
        for category in categories {
            tracing::info!(
                category = %category.name,
                available_only,
                "processing category"
            );
            let ids = self
                .collect_category_ids(category, filter, available_only)
                .await?;
            all_ids.extend(ids);
        }

        let collected = CollectedIds::from_ids(all_ids);
        tracing::info!(
            total = collected.summary.total,
            duplicates = collected.summary.duplicates,
            unique = collected.summary.unique,
            "product ids collected"
        );
        Ok(collected)
    }
}
