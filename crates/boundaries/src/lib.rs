//! County boundary collection.
//!
//! Parses a GeoJSON `FeatureCollection` of county polygons (the Census
//! county layout, where each feature's `id` is the 5-digit FIPS code and
//! `properties.STATE` the 2-digit state code) into a FIPS-keyed lookup used
//! by the choropleth join.

pub mod collection;
pub mod geojson;

pub use collection::{BoundaryCollection, CountyBoundary};
pub use geojson::{Bounds, Feature, FeatureCollection, Geometry};
