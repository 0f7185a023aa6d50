//! Soil composition normalization and USDA-style texture classification.

pub mod composition;
pub mod texture;

pub use composition::SoilComposition;
pub use texture::{classify_texture, SoilTexture};
