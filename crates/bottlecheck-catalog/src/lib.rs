pub mod cache;
pub mod client;
pub mod error;
pub mod store;
pub mod types;

pub use cache::{CacheStatus, CatalogCache, SharedFetchError};
pub use client::CatalogClient;
pub use error::{FetchError, StoreError};
pub use store::{CacheRecord, FileStore, CACHE_KEY};
pub use types::{decode_listings, ListingHit, ListingSource};
