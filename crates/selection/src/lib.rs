//! Selection resolver for the county atlas.
//!
//! A [`Selection`] names what is on screen: a year, and optionally a factor,
//! a state and a county. Every interaction produces a new Selection through
//! [`SelectionResolver`], which re-derives whatever depends on the changed
//! pick so a selection is always valid for its year.

pub mod options;
pub mod resolver;

pub use options::{available_counties, available_factors, available_raw_factors, available_states};
pub use resolver::{Picks, Selection, SelectionResolver};
