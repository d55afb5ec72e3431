pub mod client;
pub mod collect;
pub mod detail;
pub mod dump;
pub mod error;
pub mod pacing;
mod retry;
pub mod resolve;
pub mod types;

pub use client::{ListingFilter, SimpleWineClient};
pub use collect::{CollectedIds, CollectionSummary};
pub use detail::{to_record, RecordContext};
pub use dump::RawDumper;
pub use error::ScraperError;
pub use pacing::Pacing;
pub use resolve::{resolve_store, select_categories, ResolvedStore};
