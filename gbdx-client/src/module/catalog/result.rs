//! Immutable view over one catalog search response.

use geo::{Contains, Geometry, MultiPolygon, Polygon};
use serde_json::Value;
use std::collections::HashMap;
use std::fmt;
use wkt::TryFromWkt;

use super::types::{CatalogRecord, SearchResponse, SearchStats};
use crate::error::{GbdxError, Result};

/// Property holding a record's footprint as WKT.
pub const FOOTPRINT_PROPERTY: &str = "footprintWkt";

const DISPLAY_ID_LIMIT: usize = 5;

/// Catalog search result, with records sorted by identifier.
#[derive(Debug, Clone, PartialEq)]
pub struct QueryResult {
    stats: SearchStats,
    search_tag: String,
    records: Vec<CatalogRecord>,
    /// identifier -> position in `records`; first occurrence wins
    index: HashMap<String, usize>,
}

impl QueryResult {
    pub fn new(response: SearchResponse) -> Self {
        let SearchResponse {
            stats,
            search_tag,
            mut results,
        } = response;

        results.sort_by(|a, b| a.identifier.cmp(&b.identifier));

        let mut index = HashMap::with_capacity(results.len());
        for (position, record) in results.iter().enumerate() {
            index.entry(record.identifier.clone()).or_insert(position);
        }

        Self {
            stats,
            search_tag,
            records: results,
            index,
        }
    }

    pub fn from_value(value: Value) -> serde_json::Result<Self> {
        serde_json::from_value(value).map(Self::new)
    }

    /// Server-reported total (`stats.totalRecords`), not the page size.
    pub fn len(&self) -> u64 {
        self.stats.total_records
    }

    pub fn is_empty(&self) -> bool {
        self.stats.total_records == 0
    }

    pub fn stats(&self) -> &SearchStats {
        &self.stats
    }

    pub fn search_tag(&self) -> &str {
        &self.search_tag
    }

    /// Records included in the response, sorted by identifier.
    pub fn records(&self) -> &[CatalogRecord] {
        &self.records
    }

    pub fn record_at(&self, index: usize) -> Result<&CatalogRecord> {
        self.records.get(index).ok_or(GbdxError::IndexOutOfRange {
            index,
            len: self.records.len(),
        })
    }

    pub fn record_for_id(&self, identifier: &str) -> Result<&CatalogRecord> {
        self.index
            .get(identifier)
            .map(|&position| &self.records[position])
            .ok_or_else(|| GbdxError::RecordNotFound(identifier.to_string()))
    }

    /// All identifiers in ascending string order.
    pub fn list_ids(&self) -> Vec<&str> {
        self.records.iter().map(|r| r.identifier.as_str()).collect()
    }

    /// Property names of the first record. Assumes every record shares them.
    pub fn list_property_keys(&self) -> Vec<&str> {
        self.records
            .first()
            .map(|r| r.properties.keys().map(String::as_str).collect())
            .unwrap_or_default()
    }

    pub fn get_property(&self, identifier: &str, key: &str) -> Result<&Value> {
        self.record_for_id(identifier)?
            .properties
            .get(key)
            .ok_or_else(|| GbdxError::PropertyNotFound {
                identifier: identifier.to_string(),
                key: key.to_string(),
            })
    }

    /// Parses the record's `footprintWkt` property.
    ///
    /// Both `POLYGON` and `MULTIPOLYGON` footprints are accepted; a single
    /// polygon comes back as a one-member multipolygon.
    pub fn get_footprint(&self, identifier: &str) -> Result<MultiPolygon<f64>> {
        let parse_error = |reason: String| GbdxError::GeometryParse {
            identifier: identifier.to_string(),
            reason,
        };

        let value = self.get_property(identifier, FOOTPRINT_PROPERTY)?;
        let wkt = value
            .as_str()
            .ok_or_else(|| parse_error(format!("{} is not a string", FOOTPRINT_PROPERTY)))?;

        match Geometry::<f64>::try_from_wkt_str(wkt).map_err(|e| parse_error(e.to_string()))? {
            Geometry::Polygon(polygon) => Ok(MultiPolygon::new(vec![polygon])),
            Geometry::MultiPolygon(multi) => Ok(multi),
            other => Err(parse_error(format!(
                "expected a polygonal footprint, found {}",
                geometry_kind(&other)
            ))),
        }
    }

    /// Identifiers whose footprint fully contains `polygon`.
    ///
    /// Searches match on intersection with the AOI bounds; this narrows a
    /// result down to images that cover the whole area.
    pub fn ids_containing(&self, polygon: &Polygon<f64>) -> Result<Vec<&str>> {
        let mut ids = Vec::new();
        for id in self.list_ids() {
            if self.get_footprint(id)?.contains(polygon) {
                ids.push(id);
            }
        }
        Ok(ids)
    }
}

fn geometry_kind(geometry: &Geometry<f64>) -> &'static str {
    match geometry {
        Geometry::Point(_) => "Point",
        Geometry::Line(_) => "Line",
        Geometry::LineString(_) => "LineString",
        Geometry::Polygon(_) => "Polygon",
        Geometry::MultiPoint(_) => "MultiPoint",
        Geometry::MultiLineString(_) => "MultiLineString",
        Geometry::MultiPolygon(_) => "MultiPolygon",
        Geometry::GeometryCollection(_) => "GeometryCollection",
        Geometry::Rect(_) => "Rect",
        Geometry::Triangle(_) => "Triangle",
    }
}

impl fmt::Display for QueryResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Query Result: {} records returned", self.len())?;
        for id in self.records.iter().take(DISPLAY_ID_LIMIT) {
            write!(f, "\n{}", id.identifier)?;
        }
        if self.records.len() > DISPLAY_ID_LIMIT {
            write!(f, "\n...")?;
        }
        Ok(())
    }
}
