//! Choropleth rendering for county attribution data.
//!
//! Implements three map views:
//! - Attribution map: one factor's attribution values, scaled by the whole
//!   year's attribution range
//! - Raw-value map: one factor's raw values, scaled by that column's range
//! - State drill-down: diagnosed diabetes prevalence for one state, with each
//!   county's top features in the hover
//!
//! Output is a [`MapSpec`], a serializable description any plotting front end
//! can draw. Geometry is borrowed from the boundary collection.

pub mod map_spec;
pub mod render;

pub use map_spec::{Hover, MapSpec, Region};
pub use render::{render, render_raw, render_state_detail};
