//! Inference collaborator: a fitted scaler followed by a binary classifier.

pub mod linear;

use crate::error::Result;
use crate::models::features::{FeatureRecord, FEATURE_COUNT};

pub use linear::LinearRiskModel;

/// A feature record after scaling, in feature contract order.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScaledRecord(pub [f64; FEATURE_COUNT]);

impl ScaledRecord {
    pub fn values(&self) -> &[f64; FEATURE_COUNT] {
        &self.0
    }
}

/// The model seen by the prediction path.
pub trait RiskClassifier: Send + Sync {
    /// Applies the fitted scaler.
    fn transform(&self, record: &FeatureRecord) -> Result<ScaledRecord>;

    /// Returns the class label, `0` or `1`, for a scaled record.
    fn predict(&self, scaled: &ScaledRecord) -> Result<u8>;
}
