//! Client for the GBDX satellite-imagery platform.
//!
//! ```no_run
//! use gbdx_client::{CatalogQuery, GbdxConfig, GbdxSession, TEST_AOI};
//!
//! # async fn run() -> gbdx_client::Result<()> {
//! let config = GbdxConfig::from_file("gbdx.toml")?;
//! let session = GbdxSession::connect(&config).await?;
//!
//! let mut query = CatalogQuery::from_aoi(TEST_AOI)?;
//! let result = query.execute(&session).await?;
//! for id in result.list_ids() {
//!     println!("{} {}", id, result.get_property(id, "panResolution")?);
//! }
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod constants;
pub mod error;
pub mod module;
pub mod session;

#[cfg(test)]
pub(crate) mod testing;

pub use config::GbdxConfig;
pub use constants::{GBDX_AUTH_URL, GBDX_BASE_URL, TEST_AOI, TEST_CAT_ID, TEST_ORDER_NUM};
pub use error::{GbdxError, Result, SessionError};
pub use module::catalog::{
    Aoi, CatalogQuery, CatalogRecord, Platform, QueryResult, SearchCriteria, SearchParameters,
};
pub use session::{AccessToken, GbdxSession, HttpSession};
