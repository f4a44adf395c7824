//! Table retrieval, snapshot caching and canonicalization

pub mod cache;
pub mod canonicalize;
pub mod html;
pub mod provider;
pub mod schema;
pub mod summary;

pub use cache::{parse_csv, SnapshotCache, SnapshotManifest, SnapshotMeta, SnapshotNaming};
pub use canonicalize::{ReferenceTable, PLANET_COLUMN};
pub use html::extract_first_table;
pub use provider::{DataError, HttpSource, TableSource};
pub use schema::{ConfirmedSchema, SchemaError, CONFIRMED_COLUMNS};
pub use summary::unique_counts;
