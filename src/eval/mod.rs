pub mod checkpoint;
pub mod network;

use crate::encoder::FeatureVector;

pub use network::{Linear, ShapeError, ValueNet, PGN_WIDTHS, SELFPLAY_WIDTHS};

/// Static evaluator: scores an encoded position without further search.
/// Positive values favour white.
pub trait Evaluator: Sync {
    fn evaluate(&self, features: &FeatureVector) -> f32;
}

impl Evaluator for ValueNet {
    fn evaluate(&self, features: &FeatureVector) -> f32 { self.forward(features.as_slice()) }
}
