//! Service configuration loading and types.

use std::path::{Path, PathBuf};

use anyhow::{ensure, Context, Result};
use atlas_common::ColorScale;
use ranking::DEFAULT_TOP_FEATURES;
use serde::{Deserialize, Serialize};

/// Atlas configuration loaded from a YAML file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AtlasConfig {
    /// Year-keyed dataset artifact (JSON).
    pub dataset_path: PathBuf,

    /// County boundary GeoJSON.
    pub boundaries_path: PathBuf,

    /// Color scale for every map.
    pub color_scale: ColorScale,

    /// Number of features listed in the state drill-down.
    pub top_features: usize,
}

impl Default for AtlasConfig {
    fn default() -> Self {
        Self {
            dataset_path: PathBuf::from("data/visual_datasets.json"),
            boundaries_path: PathBuf::from("data/geojson-counties-fips.json"),
            color_scale: ColorScale::default(),
            top_features: DEFAULT_TOP_FEATURES,
        }
    }
}

impl AtlasConfig {
    /// Load configuration from a YAML file.
    ///
    /// A missing file yields the defaults; an unreadable or malformed one is
    /// an error.
    pub fn load_from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();

        if !path.exists() {
            tracing::warn!(
                "Atlas config file {} does not exist, using defaults",
                path.display()
            );
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read: {:?}", path))?;
        let config: AtlasConfig = serde_yaml::from_str(&content)
            .with_context(|| format!("Failed to parse: {:?}", path))?;

        tracing::info!("Loaded atlas config from {:?}", path);
        Ok(config)
    }

    /// Apply command-line / environment overrides on top of the file values.
    pub fn with_overrides(
        mut self,
        dataset_path: Option<PathBuf>,
        boundaries_path: Option<PathBuf>,
        top_features: Option<usize>,
    ) -> Self {
        if let Some(path) = dataset_path {
            self.dataset_path = path;
        }
        if let Some(path) = boundaries_path {
            self.boundaries_path = path;
        }
        if let Some(n) = top_features {
            self.top_features = n;
        }
        self
    }

    pub fn validate(&self) -> Result<()> {
        self.color_scale
            .validate()
            .context("Invalid color_scale")?;
        ensure!(self.top_features > 0, "top_features must be at least 1");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_missing_file_gives_defaults() {
        let config = AtlasConfig::load_from_file("/nonexistent/atlas.yaml").unwrap();
        assert_eq!(config, AtlasConfig::default());
        assert_eq!(config.top_features, 5);
    }

    #[test]
    fn test_partial_yaml_keeps_defaults() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "dataset_path: /srv/atlas/visual_datasets.json").unwrap();
        writeln!(file, "top_features: 3").unwrap();

        let config = AtlasConfig::load_from_file(file.path()).unwrap();
        assert_eq!(
            config.dataset_path,
            PathBuf::from("/srv/atlas/visual_datasets.json")
        );
        assert_eq!(config.top_features, 3);
        assert_eq!(config.color_scale, ColorScale::default());
        config.validate().unwrap();
    }

    #[test]
    fn test_css_color_scale_from_yaml() {
        let yaml = r##"
color_scale:
  stops:
    - position: 0.0
      color: "rgb(30, 136, 229)"
    - position: 1.0
      color: "#FF0D57"
"##;
        let config: AtlasConfig = serde_yaml::from_str(yaml).unwrap();
        config.validate().unwrap();
        assert_eq!(config.color_scale.high().to_rgba(), (255, 13, 87, 255));
    }

    #[test]
    fn test_malformed_yaml_is_error() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "top_features: [not, a, number]").unwrap();
        let err = AtlasConfig::load_from_file(file.path()).unwrap_err();
        assert!(err.to_string().contains("Failed to parse"));
    }

    #[test]
    fn test_overrides_win() {
        let config = AtlasConfig::default().with_overrides(
            Some(PathBuf::from("a.json")),
            None,
            Some(10),
        );
        assert_eq!(config.dataset_path, PathBuf::from("a.json"));
        assert_eq!(
            config.boundaries_path,
            AtlasConfig::default().boundaries_path
        );
        assert_eq!(config.top_features, 10);
    }

    #[test]
    fn test_invalid_values_rejected() {
        let mut config = AtlasConfig::default();
        config.top_features = 0;
        assert!(config.validate().is_err());

        let mut config = AtlasConfig::default();
        config.color_scale.stops.truncate(1);
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_three_stop_scale_rejected() {
        let yaml = r##"
color_scale:
  stops:
    - position: 0.0
      color: "rgb(30, 136, 229)"
    - position: 0.5
      color: "white"
    - position: 1.0
      color: "#FF0D57"
"##;
        let config: AtlasConfig = serde_yaml::from_str(yaml).unwrap();
        let err = config.validate().unwrap_err();
        assert!(format!("{:#}", err).contains("exactly 2 stops"));
    }
}
