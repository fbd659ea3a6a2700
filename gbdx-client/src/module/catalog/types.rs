//! Catalog search parameters and wire types.

use chrono::NaiveDate;
use geo::{coord, BoundingRect, Polygon, Rect};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;
use std::str::FromStr;
use wkt::ToWkt;

use crate::error::{GbdxError, Result};

/// Every catalog search is restricted to this acquisition type.
pub const ACQUISITION_TYPE: &str = "DigitalGlobeAcquisition";

/// Lower bound of the off-nadir filter. Not configurable.
pub const MIN_OFF_NADIR_ANGLE: f64 = 1.0;

pub const DEFAULT_MAX_CLOUD_COVER: f64 = 5.0;
pub const DEFAULT_MAX_OFF_NADIR_ANGLE: f64 = 15.0;

/// Area of interest, in WGS84 lon/lat.
///
/// Catalog searches filter by intersection with the AOI's bounding box, so a
/// polygon AOI is reduced to its bounds before it is sent.
#[derive(Debug, Clone, PartialEq)]
pub enum Aoi {
    /// `[lon0, lat0, lon1, lat1]`
    BoundingBox([f64; 4]),
    Polygon(Polygon<f64>),
}

impl Aoi {
    /// Builds a bounding-box AOI from a slice of exactly four values.
    pub fn from_slice(bounds: &[f64]) -> Result<Self> {
        let bounds: [f64; 4] = bounds.try_into().map_err(|_| {
            GbdxError::InvalidAoi(format!("expected 4 bounds, got {}", bounds.len()))
        })?;
        Ok(Self::BoundingBox(bounds))
    }

    /// Reduces the AOI to ordered, finite lon/lat bounds.
    pub fn bounds(&self) -> Result<Rect<f64>> {
        let rect = match self {
            Self::BoundingBox([lon0, lat0, lon1, lat1]) => {
                if [lon0, lat0, lon1, lat1].iter().any(|v| !v.is_finite()) {
                    return Err(GbdxError::InvalidAoi(
                        "bounds must be finite numbers".to_string(),
                    ));
                }
                if lon0 >= lon1 || lat0 >= lat1 {
                    return Err(GbdxError::InvalidAoi(format!(
                        "bounds must be ordered lon0 < lon1 and lat0 < lat1, got ({}, {}, {}, {})",
                        lon0, lat0, lon1, lat1
                    )));
                }
                Rect::new(coord! { x: *lon0, y: *lat0 }, coord! { x: *lon1, y: *lat1 })
            }
            Self::Polygon(polygon) => {
                let rect = polygon.bounding_rect().ok_or_else(|| {
                    GbdxError::InvalidAoi("polygon has no coordinates".to_string())
                })?;
                let (min, max) = (rect.min(), rect.max());
                if [min.x, min.y, max.x, max.y].iter().any(|v| !v.is_finite()) {
                    return Err(GbdxError::InvalidAoi(
                        "polygon coordinates must be finite".to_string(),
                    ));
                }
                if min.x >= max.x || min.y >= max.y {
                    return Err(GbdxError::InvalidAoi(
                        "polygon bounds are degenerate".to_string(),
                    ));
                }
                rect
            }
        };

        let (min, max) = (rect.min(), rect.max());
        if min.x < -180.0 || max.x > 180.0 || min.y < -90.0 || max.y > 90.0 {
            return Err(GbdxError::InvalidAoi(format!(
                "bounds ({}, {}, {}, {}) fall outside WGS84 lon/lat",
                min.x, min.y, max.x, max.y
            )));
        }
        Ok(rect)
    }

    /// WKT polygon of the AOI's bounding box.
    pub fn bounds_wkt(&self) -> Result<String> {
        Ok(self.bounds()?.to_polygon().wkt_string())
    }
}

impl From<[f64; 4]> for Aoi {
    fn from(bounds: [f64; 4]) -> Self {
        Self::BoundingBox(bounds)
    }
}

impl From<Polygon<f64>> for Aoi {
    fn from(polygon: Polygon<f64>) -> Self {
        Self::Polygon(polygon)
    }
}

/// DigitalGlobe sensor platforms known to the catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Platform {
    #[serde(rename = "WORLDVIEW01")]
    WorldView1,
    #[default]
    #[serde(rename = "WORLDVIEW02")]
    WorldView2,
    #[serde(rename = "WORLDVIEW03")]
    WorldView3,
}

impl Platform {
    pub fn as_str(&self) -> &'static str {
        match self {
            Platform::WorldView1 => "WORLDVIEW01",
            Platform::WorldView2 => "WORLDVIEW02",
            Platform::WorldView3 => "WORLDVIEW03",
        }
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Platform {
    type Err = GbdxError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_uppercase().as_str() {
            "WORLDVIEW01" | "WV1" | "WV01" => Ok(Platform::WorldView1),
            "WORLDVIEW02" | "WV2" | "WV02" => Ok(Platform::WorldView2),
            "WORLDVIEW03" | "WV3" | "WV03" => Ok(Platform::WorldView3),
            other => Err(GbdxError::InvalidParameter {
                name: "platform",
                reason: format!("unknown sensor platform '{}'", other),
            }),
        }
    }
}

/// Caller-owned catalog search parameters.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchParameters {
    pub aoi: Aoi,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub platform: Platform,
    /// Percentage, 0 to 100.
    pub max_cloud_cover: f64,
    /// Degrees.
    pub max_off_nadir_angle: f64,
}

impl SearchParameters {
    pub fn new(aoi: impl Into<Aoi>) -> Self {
        Self {
            aoi: aoi.into(),
            start_date: None,
            end_date: None,
            platform: Platform::default(),
            max_cloud_cover: DEFAULT_MAX_CLOUD_COVER,
            max_off_nadir_angle: DEFAULT_MAX_OFF_NADIR_ANGLE,
        }
    }

    pub fn date_range(mut self, start: Option<NaiveDate>, end: Option<NaiveDate>) -> Self {
        self.start_date = start;
        self.end_date = end;
        self
    }

    pub fn platform(mut self, platform: Platform) -> Self {
        self.platform = platform;
        self
    }

    pub fn max_cloud_cover(mut self, max_cloud_cover: f64) -> Self {
        self.max_cloud_cover = max_cloud_cover;
        self
    }

    pub fn max_off_nadir_angle(mut self, max_off_nadir_angle: f64) -> Self {
        self.max_off_nadir_angle = max_off_nadir_angle;
        self
    }

    pub fn validate(&self) -> Result<()> {
        self.aoi.bounds()?;

        if !(0.0..=100.0).contains(&self.max_cloud_cover) {
            return Err(GbdxError::InvalidParameter {
                name: "max_cloud_cover",
                reason: format!("{} is not a percentage", self.max_cloud_cover),
            });
        }
        if !(0.0..=90.0).contains(&self.max_off_nadir_angle) {
            return Err(GbdxError::InvalidParameter {
                name: "max_off_nadir_angle",
                reason: format!("{} is not an angle in [0, 90]", self.max_off_nadir_angle),
            });
        }
        if let (Some(start), Some(end)) = (self.start_date, self.end_date) {
            if start > end {
                return Err(GbdxError::InvalidParameter {
                    name: "date_range",
                    reason: format!("start {} is after end {}", start, end),
                });
            }
        }
        Ok(())
    }

    /// Platform, cloud-cover and off-nadir filter expressions, in that order.
    pub fn filters(&self) -> Vec<String> {
        vec![
            format!("sensorPlatformName = '{}'", self.platform),
            format!("cloudCover < {}", self.max_cloud_cover),
            format!(
                "offNadirAngle between {} and {}",
                MIN_OFF_NADIR_ANGLE, self.max_off_nadir_angle
            ),
        ]
    }

    pub fn to_criteria(&self) -> Result<SearchCriteria> {
        self.validate()?;
        Ok(SearchCriteria {
            search_area_wkt: self.aoi.bounds_wkt()?,
            start_date: self.start_date.map(|d| d.format("%Y-%m-%d").to_string()),
            end_date: self.end_date.map(|d| d.format("%Y-%m-%d").to_string()),
            filters: self.filters(),
            tag_results: false,
            types: vec![ACQUISITION_TYPE.to_string()],
        })
    }
}

/// Request body of `POST /catalog/v1/search`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchCriteria {
    pub search_area_wkt: String,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
    pub filters: Vec<String>,
    pub tag_results: bool,
    pub types: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchStats {
    /// Server-side match count; may exceed the records in the page.
    pub total_records: u64,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// One catalog entry, as returned by search and record lookups.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CatalogRecord {
    /// Catalog id (cat id).
    pub identifier: String,

    #[serde(default)]
    pub properties: Map<String, Value>,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Response body of `POST /catalog/v1/search`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchResponse {
    pub stats: SearchStats,
    pub search_tag: String,
    pub results: Vec<CatalogRecord>,
}
