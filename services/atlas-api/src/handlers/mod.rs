//! HTTP request handlers for the atlas API.

pub mod catalog;
pub mod health;
pub mod maps;
pub mod resolve;
