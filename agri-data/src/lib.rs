//! Data processing for the agricultural dashboard and map.
//!
//! This crate turns a [`FeatureTable`](agri_core::FeatureTable) snapshot into
//! plot-ready series, density bins, trend fits, heatmap points and popup
//! text. Every function reads immutable input and returns a fresh value;
//! nothing here mutates upstream data.

pub mod dashboard;
pub mod filter;
pub mod heatmap;
pub mod layers;
pub mod popup;
pub mod series;
pub mod stress;
pub mod trend;
