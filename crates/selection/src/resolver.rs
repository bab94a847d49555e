//! Selection values and the cascade that produces them.

use atlas_common::{AtlasError, AtlasResult, SelectionField, Year};
use dataset_registry::{DatasetRegistry, YearlyDataset};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::options::{available_counties, available_factors, available_states};

/// What the user has explicitly picked; unset fields take defaults.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct Picks {
    #[serde(default)]
    pub year: Option<String>,
    #[serde(default)]
    pub factor: Option<String>,
    #[serde(default)]
    pub state: Option<String>,
    #[serde(default)]
    pub county: Option<String>,
}

impl Picks {
    pub fn year(year: impl Into<String>) -> Self {
        Self {
            year: Some(year.into()),
            ..Self::default()
        }
    }
}

/// A resolved, valid view selection.
///
/// Fields are `None` only when the year has nothing to offer for them, e.g.
/// a table with no feature columns.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Selection {
    year: Year,
    factor: Option<String>,
    state: Option<String>,
    county: Option<String>,
}

impl Selection {
    pub fn year(&self) -> &Year {
        &self.year
    }

    pub fn factor(&self) -> Option<&str> {
        self.factor.as_deref()
    }

    pub fn state(&self) -> Option<&str> {
        self.state.as_deref()
    }

    pub fn county(&self) -> Option<&str> {
        self.county.as_deref()
    }
}

// A supplied value must be one of `available`; a missing one takes the first.
fn choose(
    field: SelectionField,
    supplied: Option<&str>,
    available: Vec<String>,
) -> AtlasResult<Option<String>> {
    match supplied {
        Some(value) if available.iter().any(|a| a == value) => Ok(Some(value.to_string())),
        Some(value) => Err(AtlasError::invalid(field, value, available)),
        None => Ok(available.into_iter().next()),
    }
}

/// Builds selections against one registry.
#[derive(Debug, Clone, Copy)]
pub struct SelectionResolver<'a> {
    registry: &'a DatasetRegistry,
}

impl<'a> SelectionResolver<'a> {
    pub fn new(registry: &'a DatasetRegistry) -> Self {
        Self { registry }
    }

    /// Build a selection from scratch.
    ///
    /// Fields are resolved top-down (year, factor, state, county), each
    /// against the values already chosen above it. An explicit pick outside
    /// its domain is an error, never silently replaced.
    pub fn resolve(&self, picks: &Picks) -> AtlasResult<Selection> {
        let dataset = match picks.year.as_deref() {
            Some(year) => self.registry.get(year)?,
            None => self.registry.get(self.registry.default_year().as_str())?,
        };

        let factor = choose(
            SelectionField::Factor,
            picks.factor.as_deref(),
            available_factors(dataset),
        )?;
        let state = choose(
            SelectionField::State,
            picks.state.as_deref(),
            available_states(dataset),
        )?;
        let county = self.county_for(dataset, state.as_deref(), picks.county.as_deref())?;

        let selection = Selection {
            year: dataset.year().clone(),
            factor,
            state,
            county,
        };
        debug!(?selection, "Resolved selection");
        Ok(selection)
    }

    fn county_for(
        &self,
        dataset: &YearlyDataset,
        state: Option<&str>,
        county: Option<&str>,
    ) -> AtlasResult<Option<String>> {
        match state {
            Some(state) => choose(
                SelectionField::County,
                county,
                available_counties(dataset, state)?,
            ),
            None => choose(SelectionField::County, county, Vec::new()),
        }
    }

    /// Switch year. Factor, state and county are re-derived for the new year.
    pub fn with_year(&self, previous: &Selection, year: &str) -> AtlasResult<Selection> {
        debug!(from = %previous.year, to = year, "Year changed");
        self.resolve(&Picks::year(year))
    }

    /// Switch factor within the current year.
    pub fn with_factor(&self, previous: &Selection, factor: &str) -> AtlasResult<Selection> {
        let dataset = self.registry.get(previous.year.as_str())?;
        let factor = choose(
            SelectionField::Factor,
            Some(factor),
            available_factors(dataset),
        )?;
        Ok(Selection {
            factor,
            ..previous.clone()
        })
    }

    /// Switch state. The county becomes the first county of the new state.
    pub fn with_state(&self, previous: &Selection, state: &str) -> AtlasResult<Selection> {
        let dataset = self.registry.get(previous.year.as_str())?;
        let state = choose(
            SelectionField::State,
            Some(state),
            available_states(dataset),
        )?;
        let county = self.county_for(dataset, state.as_deref(), None)?;
        Ok(Selection {
            state,
            county,
            ..previous.clone()
        })
    }

    /// Switch county within the current state.
    pub fn with_county(&self, previous: &Selection, county: &str) -> AtlasResult<Selection> {
        let dataset = self.registry.get(previous.year.as_str())?;
        let county = self.county_for(dataset, previous.state(), Some(county))?;
        Ok(Selection {
            county,
            ..previous.clone()
        })
    }
}
