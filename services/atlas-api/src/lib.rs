//! County Atlas API Service Library
//!
//! This crate provides the HTTP server for browsing per-county feature
//! attributions: year/factor/location pickers, choropleth map specs and the
//! state drill-down.

pub mod config;
pub mod error;
pub mod handlers;
pub mod metrics;
pub mod routes;
pub mod state;
