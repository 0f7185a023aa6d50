use thiserror::Error;

/// Errors surfaced by the inference engine.
///
/// Missing upstream data is not an error: it is routed to the water /
/// no-data terrain branch instead.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum EngineError {
    #[error("{field} must be finite, got {value}")]
    NonFinite { field: &'static str, value: f64 },

    #[error("{field} = {value} is outside [{min}, {max}]")]
    OutOfRange {
        field: &'static str,
        value: f64,
        min: f64,
        max: f64,
    },

    #[error("invalid engine configuration: {0}")]
    Config(String),

    #[error("soil provider: {0}")]
    Provider(#[from] ProviderError),
}

/// Failures of an injected soil data provider.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ProviderError {
    #[error("soil raster has not been loaded")]
    NotLoaded,

    #[error("soil raster is malformed: {0}")]
    Malformed(String),
}

pub type Result<T> = std::result::Result<T, EngineError>;

/// Reject NaN / ±∞.
pub(crate) fn ensure_finite(field: &'static str, value: f64) -> Result<f64> {
    if value.is_finite() {
        Ok(value)
    } else {
        Err(EngineError::NonFinite { field, value })
    }
}

/// Reject non-finite values and values outside `[min, max]`.
pub(crate) fn ensure_range(field: &'static str, value: f64, min: f64, max: f64) -> Result<f64> {
    ensure_finite(field, value)?;
    if value < min || value > max {
        return Err(EngineError::OutOfRange { field, value, min, max });
    }
    Ok(value)
}
