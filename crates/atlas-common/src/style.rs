//! Color scale configuration for choropleth rendering.
//!
//! A [`ColorScale`] is a continuous gradient defined over the normalized
//! interval `[0, 1]`. Data values are mapped onto that interval by a value
//! domain chosen at render time, so the same scale can be reused for any
//! table or column.

use serde::{Deserialize, Serialize};

/// Continuous color scale over normalized positions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColorScale {
    /// Color stops, ascending by position, spanning 0.0 to 1.0
    pub stops: Vec<ColorStop>,
}

impl Default for ColorScale {
    /// The attribution palette: blue for low contributions, red for high.
    fn default() -> Self {
        ColorScale::two_stop(
            Color::Rgba {
                r: 30,
                g: 136,
                b: 229,
                a: 255,
            },
            Color::Rgba {
                r: 255,
                g: 13,
                b: 87,
                a: 255,
            },
        )
    }
}

impl ColorScale {
    /// Linear scale between a low and a high anchor.
    pub fn two_stop(low: Color, high: Color) -> Self {
        ColorScale {
            stops: vec![
                ColorStop {
                    position: 0.0,
                    color: low,
                },
                ColorStop {
                    position: 1.0,
                    color: high,
                },
            ],
        }
    }

    pub fn validate(&self) -> Result<(), StyleError> {
        if self.stops.len() != 2 {
            return Err(StyleError::ValidationError(format!(
                "Color scale must have exactly 2 stops (low and high), got {}",
                self.stops.len()
            )));
        }

        for i in 1..self.stops.len() {
            if self.stops[i].position <= self.stops[i - 1].position {
                return Err(StyleError::ValidationError(
                    "Color stops must be in ascending position order".to_string(),
                ));
            }
        }

        let first = self.stops[0].position;
        let last = self.stops[self.stops.len() - 1].position;
        if first != 0.0 || last != 1.0 {
            return Err(StyleError::ValidationError(format!(
                "Color stops must span 0.0 to 1.0, got {} to {}",
                first, last
            )));
        }

        Ok(())
    }

    /// The color at the low end of the scale.
    pub fn low(&self) -> Color {
        self.interpolate(0.0)
    }

    /// The color at the high end of the scale.
    pub fn high(&self) -> Color {
        self.interpolate(1.0)
    }

    /// Interpolate the color at normalized position `t`, clamped to `[0, 1]`.
    pub fn interpolate(&self, t: f64) -> Color {
        let t = t.clamp(0.0, 1.0);

        let (first, last) = match (self.stops.first(), self.stops.last()) {
            (Some(first), Some(last)) => (first, last),
            _ => return Color::transparent(),
        };

        if t <= first.position {
            return first.color.to_rgba_color();
        }

        for pair in self.stops.windows(2) {
            let (low, high) = (&pair[0], &pair[1]);
            if t <= high.position {
                let span = high.position - low.position;
                let local = if span > 0.0 {
                    (t - low.position) / span
                } else {
                    0.0
                };
                return low.color.lerp(&high.color, local);
            }
        }

        last.color.to_rgba_color()
    }

    /// Map a data value onto the scale using the domain `[min, max]`.
    ///
    /// NaN values have no color. A degenerate domain (`min == max`) maps
    /// every value to the low anchor.
    pub fn color_for(&self, value: f64, min: f64, max: f64) -> Option<Color> {
        if value.is_nan() {
            return None;
        }
        let span = max - min;
        let t = if span > 0.0 { (value - min) / span } else { 0.0 };
        Some(self.interpolate(t))
    }
}

/// A color stop in a scale.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColorStop {
    /// Normalized position of this stop
    pub position: f64,

    /// The color at this stop
    pub color: Color,
}

/// Color representation supporting multiple formats.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Color {
    /// Explicit RGBA
    Rgba { r: u8, g: u8, b: u8, a: u8 },

    /// RGB array: [r, g, b] or [r, g, b, a]
    Array(Vec<u8>),

    /// CSS string: "#RRGGBB", "#RRGGBBAA", "rgb(r, g, b)" or a color name
    Css(String),
}

impl Color {
    pub fn transparent() -> Self {
        Color::Rgba {
            r: 0,
            g: 0,
            b: 0,
            a: 0,
        }
    }

    /// Convert to RGBA tuple.
    pub fn to_rgba(&self) -> (u8, u8, u8, u8) {
        match self {
            Color::Rgba { r, g, b, a } => (*r, *g, *b, *a),
            Color::Array(arr) => {
                let r = arr.first().copied().unwrap_or(0);
                let g = arr.get(1).copied().unwrap_or(0);
                let b = arr.get(2).copied().unwrap_or(0);
                let a = arr.get(3).copied().unwrap_or(255);
                (r, g, b, a)
            }
            Color::Css(s) => parse_css_color(s),
        }
    }

    fn to_rgba_color(&self) -> Color {
        let (r, g, b, a) = self.to_rgba();
        Color::Rgba { r, g, b, a }
    }

    /// CSS `rgb(...)` / `rgba(...)` text, as plotting front ends expect.
    pub fn to_css(&self) -> String {
        match self.to_rgba() {
            (r, g, b, 255) => format!("rgb({}, {}, {})", r, g, b),
            (r, g, b, a) => format!("rgba({}, {}, {}, {:.3})", r, g, b, a as f64 / 255.0),
        }
    }

    /// Linear interpolation between two colors.
    pub fn lerp(&self, other: &Color, t: f64) -> Color {
        let (r1, g1, b1, a1) = self.to_rgba();
        let (r2, g2, b2, a2) = other.to_rgba();

        let t = t.clamp(0.0, 1.0);

        let lerp_u8 =
            |a: u8, b: u8, t: f64| -> u8 { ((a as f64) * (1.0 - t) + (b as f64) * t).round() as u8 };

        Color::Rgba {
            r: lerp_u8(r1, r2, t),
            g: lerp_u8(g1, g2, t),
            b: lerp_u8(b1, b2, t),
            a: lerp_u8(a1, a2, t),
        }
    }
}

fn parse_css_color(s: &str) -> (u8, u8, u8, u8) {
    let s = s.trim();
    if s.starts_with('#') {
        return parse_hex_color(s);
    }
    if let Some(inner) = s
        .strip_prefix("rgba(")
        .or_else(|| s.strip_prefix("rgb("))
        .and_then(|rest| rest.strip_suffix(')'))
    {
        return parse_rgb_function(inner);
    }
    named_color(s)
}

fn parse_hex_color(s: &str) -> (u8, u8, u8, u8) {
    let s = s.trim_start_matches('#');
    let len = s.len();

    if len == 6 {
        let r = u8::from_str_radix(&s[0..2], 16).unwrap_or(0);
        let g = u8::from_str_radix(&s[2..4], 16).unwrap_or(0);
        let b = u8::from_str_radix(&s[4..6], 16).unwrap_or(0);
        (r, g, b, 255)
    } else if len == 8 {
        let r = u8::from_str_radix(&s[0..2], 16).unwrap_or(0);
        let g = u8::from_str_radix(&s[2..4], 16).unwrap_or(0);
        let b = u8::from_str_radix(&s[4..6], 16).unwrap_or(0);
        let a = u8::from_str_radix(&s[6..8], 16).unwrap_or(255);
        (r, g, b, a)
    } else {
        (0, 0, 0, 255)
    }
}

// Components are 0-255 integers; the optional alpha is a 0-1 fraction.
fn parse_rgb_function(inner: &str) -> (u8, u8, u8, u8) {
    let parts: Vec<&str> = inner.split(',').map(str::trim).collect();
    let channel = |i: usize| -> u8 {
        parts
            .get(i)
            .and_then(|p| p.parse::<f64>().ok())
            .map(|v| v.clamp(0.0, 255.0).round() as u8)
            .unwrap_or(0)
    };
    let alpha = parts
        .get(3)
        .and_then(|p| p.parse::<f64>().ok())
        .map(|v| (v.clamp(0.0, 1.0) * 255.0).round() as u8)
        .unwrap_or(255);
    (channel(0), channel(1), channel(2), alpha)
}

fn named_color(name: &str) -> (u8, u8, u8, u8) {
    match name.to_lowercase().as_str() {
        "transparent" => (0, 0, 0, 0),
        "black" => (0, 0, 0, 255),
        "white" => (255, 255, 255, 255),
        "red" => (255, 0, 0, 255),
        "green" => (0, 255, 0, 255),
        "blue" => (0, 0, 255, 255),
        "yellow" => (255, 255, 0, 255),
        "orange" => (255, 165, 0, 255),
        "purple" => (128, 0, 128, 255),
        "gray" | "grey" => (128, 128, 128, 255),
        _ => (0, 0, 0, 255),
    }
}

/// Style-related errors.
#[derive(Debug, thiserror::Error)]
pub enum StyleError {
    #[error("Validation error: {0}")]
    ValidationError(String),
}
