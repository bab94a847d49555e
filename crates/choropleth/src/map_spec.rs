//! Renderer-agnostic map description.

use atlas_common::{Color, ColorScale, Fips};
use boundaries::{Bounds, Geometry};
use ranking::ValueRange;
use serde::{Serialize, Serializer};

/// A choropleth ready to draw.
#[derive(Debug, Clone, Serialize)]
pub struct MapSpec<'a> {
    pub title: String,

    /// Color bar title
    pub legend_title: String,

    /// Column whose values drive the fill
    pub color_column: String,

    /// Value domain mapped onto the scale; `None` when no value is finite
    pub domain: Option<ValueRange>,

    pub scale: ColorScale,

    pub regions: Vec<Region<'a>>,

    /// Rows with no matching boundary, drawn as holes
    pub unmatched: Vec<Fips>,

    /// Extent of the drawn geometry
    pub bounds: Option<Bounds>,

    /// Zoom the view to `bounds` instead of the national extent
    pub fit_bounds: bool,
}

impl<'a> MapSpec<'a> {
    pub fn region(&self, fips: &str) -> Option<&Region<'a>> {
        self.regions.iter().find(|r| r.fips.as_str() == fips)
    }
}

/// One county polygon with its value and fill.
#[derive(Debug, Clone, Serialize)]
pub struct Region<'a> {
    pub fips: Fips,

    /// NaN when the cell was missing; serialized as null
    pub value: f64,

    #[serde(serialize_with = "css_fill")]
    pub fill: Option<Color>,

    pub geometry: &'a Geometry,

    pub hover: Hover,
}

/// Hover text for a region.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Hover {
    pub county: String,
    pub state: String,

    /// Diagnosed diabetes prevalence (percent)
    pub outcome: f64,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub top_features: Option<Vec<String>>,
}

fn css_fill<S: Serializer>(fill: &Option<Color>, serializer: S) -> Result<S::Ok, S::Error> {
    match fill {
        Some(color) => serializer.serialize_some(&color.to_css()),
        None => serializer.serialize_none(),
    }
}
