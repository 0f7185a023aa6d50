//! Landslide risk inference for a single geographic point.
//!
//! Pipeline:
//!   validated features → environment routing → soil texture + climate →
//!   geotechnical parameters → infinite-slope stability → risk tier + reason.
//!
//! Every stage is a pure function of its inputs; [`engine::RiskEngine`] only
//! carries an immutable [`config::EngineConfig`].

pub mod batch;
pub mod climate;
pub mod config;
pub mod coords;
pub mod engine;
pub mod environment;
pub mod error;
pub mod features;
pub mod geotech;
pub mod provider;
pub mod risk;
pub mod soil;
pub mod stability;

pub use config::{EngineConfig, ScoringMode};
pub use engine::{Assessment, Diagnostics, RiskEngine};
pub use error::{EngineError, Result};
pub use features::{EnvironmentalFeatures, FeatureRequest};
pub use risk::{RiskLevel, RiskVerdict};
