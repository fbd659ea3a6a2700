//! Catalog query with a time-bounded result cache.

use chrono::NaiveDate;
use std::fmt;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;
use tokio::time::Instant;

use super::result::QueryResult;
use super::types::{Aoi, Platform, SearchCriteria, SearchParameters, SearchResponse};
use crate::constants::{join_url, QUERY_CACHE_DURATION_SECS};
use crate::error::{GbdxError, Result};
use crate::session::{self, HttpSession};

/// Cache slot of a [`CatalogQuery`].
#[derive(Debug, Clone, Default)]
pub enum CacheState {
    #[default]
    Empty,
    Valid {
        result: Arc<QueryResult>,
        fetched_at: Instant,
    },
}

/// A catalog search that remembers its last result for a bounded time.
///
/// Parameters changed through [`parameters_mut`](Self::parameters_mut) are
/// not picked up until [`refresh`](Self::refresh) is called; until then
/// `execute` keeps answering from the old criteria and cache. After a failed
/// refresh the query refuses to execute until a refresh succeeds.
#[derive(Debug, Clone)]
pub struct CatalogQuery {
    params: SearchParameters,
    criteria: SearchCriteria,
    cache: CacheState,
    cache_duration: Duration,
    /// set when the last refresh rejected the parameters
    stale: bool,
}

impl CatalogQuery {
    pub fn new(
        aoi: impl Into<Aoi>,
        date_range: (Option<NaiveDate>, Option<NaiveDate>),
        platform: Platform,
        max_cloud_cover: f64,
        max_off_nadir_angle: f64,
    ) -> Result<Self> {
        let (start, end) = date_range;
        Self::from_parameters(
            SearchParameters::new(aoi)
                .date_range(start, end)
                .platform(platform)
                .max_cloud_cover(max_cloud_cover)
                .max_off_nadir_angle(max_off_nadir_angle),
        )
    }

    /// Query over `aoi` with default platform and thresholds.
    pub fn from_aoi(aoi: impl Into<Aoi>) -> Result<Self> {
        Self::from_parameters(SearchParameters::new(aoi))
    }

    pub fn from_parameters(params: SearchParameters) -> Result<Self> {
        let criteria = params.to_criteria()?;
        Ok(Self {
            params,
            criteria,
            cache: CacheState::Empty,
            cache_duration: Duration::from_secs(QUERY_CACHE_DURATION_SECS),
            stale: false,
        })
    }

    pub fn with_cache_duration(mut self, cache_duration: Duration) -> Self {
        self.cache_duration = cache_duration;
        self
    }

    pub fn parameters(&self) -> &SearchParameters {
        &self.params
    }

    /// Mutable access to the parameters. Call [`refresh`](Self::refresh) afterwards.
    pub fn parameters_mut(&mut self) -> &mut SearchParameters {
        &mut self.params
    }

    pub fn criteria(&self) -> &SearchCriteria {
        &self.criteria
    }

    pub fn cache_state(&self) -> &CacheState {
        &self.cache
    }

    /// Whether `execute` would currently be answered from the cache.
    pub fn is_cached(&self) -> bool {
        self.cached_at(Instant::now()).is_some()
    }

    /// Drops the cache and rebuilds the criteria from the current parameters.
    ///
    /// On invalid parameters the cache is still dropped and the query stays
    /// unusable until a later refresh succeeds.
    pub fn refresh(&mut self) -> Result<()> {
        self.cache = CacheState::Empty;
        match self.params.to_criteria() {
            Ok(criteria) => {
                self.criteria = criteria;
                self.stale = false;
                tracing::debug!("Catalog query refreshed: {}", self);
                Ok(())
            }
            Err(e) => {
                self.stale = true;
                tracing::warn!("Catalog query refresh rejected: {}", e);
                Err(e)
            }
        }
    }

    /// Whether the last refresh failed, blocking `execute`.
    pub fn is_stale(&self) -> bool {
        self.stale
    }

    /// Runs the search, or returns the cached result while it is fresh.
    ///
    /// A failed search leaves the cache as it was.
    pub async fn execute<S>(&mut self, session: &S) -> Result<Arc<QueryResult>>
    where
        S: HttpSession + ?Sized,
    {
        if self.stale {
            return Err(GbdxError::InvalidParameter {
                name: "parameters",
                reason: "last refresh failed; correct the parameters and refresh".to_string(),
            });
        }

        let started = Instant::now();
        if let Some(result) = self.cached_at(started) {
            tracing::debug!("Catalog query served from cache");
            return Ok(result);
        }

        let url = join_url(session.base_url(), &["catalog", "v1", "search"]);
        let payload = session::encode(&url, &self.criteria).map_err(GbdxError::QueryExecution)?;

        tracing::info!("Searching catalog at {}", url);
        let body = session
            .post_json(&url, payload)
            .await
            .map_err(GbdxError::QueryExecution)?;
        let response: SearchResponse =
            session::decode(&url, body).map_err(GbdxError::QueryExecution)?;

        let result = Arc::new(QueryResult::new(response));
        tracing::info!(
            "Catalog search returned {} records ({} total)",
            result.records().len(),
            result.len()
        );

        self.cache = CacheState::Valid {
            result: Arc::clone(&result),
            fetched_at: started,
        };
        Ok(result)
    }

    fn cached_at(&self, now: Instant) -> Option<Arc<QueryResult>> {
        match &self.cache {
            CacheState::Valid { result, fetched_at } => {
                let fresh = fetched_at
                    .checked_add(self.cache_duration)
                    .is_none_or(|expires| now < expires);
                fresh.then(|| Arc::clone(result))
            }
            CacheState::Empty => None,
        }
    }
}

impl fmt::Display for CatalogQuery {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match serde_json::to_string(&self.criteria) {
            Ok(json) => f.write_str(&json),
            Err(_) => write!(f, "{:?}", self.criteria),
        }
    }
}

/// A query shared between tasks; the lock spans the whole cache check and fetch.
pub type SharedCatalogQuery = Arc<Mutex<CatalogQuery>>;

pub fn create_shared_query(query: CatalogQuery) -> SharedCatalogQuery {
    Arc::new(Mutex::new(query))
}
