//! Evaluate many independent requests.
//!
//! Each evaluation is pure, so requests are simply mapped in parallel when
//! the `threading` feature is enabled and sequentially otherwise. Output
//! order always matches input order.

#[cfg(feature = "threading")]
use rayon::prelude::*;

use crate::engine::{Assessment, RiskEngine};
use crate::error::Result;
use crate::features::FeatureRequest;
use crate::provider::SoilProvider;

pub fn assess_batch(engine: &RiskEngine, requests: &[FeatureRequest]) -> Vec<Result<Assessment>> {
    #[cfg(feature = "threading")]
    {
        requests.par_iter().map(|r| engine.assess(r)).collect()
    }
    #[cfg(not(feature = "threading"))]
    {
        requests.iter().map(|r| engine.assess(r)).collect()
    }
}

/// Like [`assess_batch`], filling missing soil samples from `provider`.
pub fn assess_batch_with_provider(
    engine: &RiskEngine,
    requests: &[FeatureRequest],
    provider: &(dyn SoilProvider + Sync),
) -> Vec<Result<Assessment>> {
    #[cfg(feature = "threading")]
    {
        requests.par_iter().map(|r| engine.assess_with_provider(r, provider)).collect()
    }
    #[cfg(not(feature = "threading"))]
    {
        requests.iter().map(|r| engine.assess_with_provider(r, provider)).collect()
    }
}
