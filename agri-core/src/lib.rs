//! Core types shared by every agri crate.
//!
//! - [`table`]: the unified feature table keyed by parcel and date
//! - [`record`]: per-observation and per-parcel records
//! - [`model`]: derived values (trend fit, stress bins)
//! - [`provider`]: the collaborator contract the visualizations read from
//! - [`error`]: the explicit result taxonomy for preparers

pub mod error;
pub mod model;
pub mod provider;
pub mod record;
pub mod table;

pub use error::PrepareError;
pub use model::{StressBin, TrendResult};
pub use provider::FeatureProvider;
pub use record::{FeatureRecord, RiskMetric, YieldHistoryRecord};
pub use table::{Column, FeatureTable};
