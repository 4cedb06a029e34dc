//! Reconciles observed retail products against the remote catalog.
//!
//! [`compare_batch`] is the entry point: it obtains a catalog snapshot from
//! the cache and resolves each observed product with the [`matcher`].

pub mod compare;
pub mod matcher;
pub mod normalize;
pub mod volume;

pub use compare::{compare_batch, compare_batch_at, resolve_all};
pub use matcher::{match_product, CatalogIndex};
pub use normalize::{base_name, normalize_name};
pub use volume::{parse_volume, Millilitres, VolumeUnit};
