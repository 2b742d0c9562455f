//! Domain types for the membership engine

pub mod catalog;
pub mod event;
pub mod tier;

pub use catalog::CatalogItem;
pub use event::{chronological, ProgressionEvent};
pub use tier::{TierDefinition, TierTable, TierTableError};
