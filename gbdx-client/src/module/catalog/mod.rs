//! Catalog search and lookup.
//!
//! ## Main Components
//! - `CatalogQuery`: search parameters plus a cached last result
//! - `QueryResult`: sorted, id-indexed view of one search response
//! - `get_catalog_record`: single-record lookup by cat id

// ============ Wire Types ============
mod types;
pub use types::{
    Aoi, CatalogRecord, Platform, SearchCriteria, SearchParameters, SearchResponse, SearchStats,
    ACQUISITION_TYPE, DEFAULT_MAX_CLOUD_COVER, DEFAULT_MAX_OFF_NADIR_ANGLE, MIN_OFF_NADIR_ANGLE,
};

// ============ Query ============
mod query;
pub use query::{create_shared_query, CacheState, CatalogQuery, SharedCatalogQuery};

// ============ Results ============
mod result;
pub use result::{QueryResult, FOOTPRINT_PROPERTY};

// ============ Record Lookup ============
mod record;
pub use record::get_catalog_record;
