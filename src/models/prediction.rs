use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// One entry of the prediction log.
#[derive(FromRow, Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PredictionRecord {
    /// Store-assigned, strictly increasing identifier.
    pub id: i64,
    /// Patient age in years.
    pub age: i64,
    /// Sex label exactly as submitted on the form.
    pub sex: String,
    /// Resting blood pressure in mm Hg.
    #[sqlx(rename = "bp")]
    pub blood_pressure: i64,
    /// Serum cholesterol in mg/dl.
    #[sqlx(rename = "chol")]
    pub cholesterol: i64,
    /// The derived risk label.
    pub result: String,
    /// Local wall-clock time of insertion.
    #[sqlx(rename = "time")]
    pub timestamp: String,
}

/// The two labels the service stores as a prediction result.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RiskLabel {
    High,
    Low,
}

impl RiskLabel {
    /// Maps a classifier output to a label.
    ///
    /// Class `0` is **high** risk and class `1` is low risk. This is the
    /// polarity the shipped model was fitted with; do not invert it without
    /// checking the artifact.
    pub fn from_class(class: u8) -> Option<Self> {
        match class {
            0 => Some(Self::High),
            1 => Some(Self::Low),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::High => "High Risk",
            Self::Low => "Low Risk",
        }
    }
}
