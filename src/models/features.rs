use serde::{Deserialize, Serialize};

/// Version of the feature contract below. Bump it whenever a field is added,
/// removed or reordered; model artifacts declare the version they were
/// fitted against.
pub const FEATURE_SCHEMA_VERSION: u32 = 1;

/// Number of features the classifier consumes.
pub const FEATURE_COUNT: usize = 13;

/// Column names in the exact order the classifier was fitted with.
pub const FEATURE_NAMES: [&str; FEATURE_COUNT] = [
    "age", "sex", "cp", "trestbps", "chol", "fbs", "restecg", "thalach", "exang", "oldpeak",
    "slope", "ca", "thal",
];

/// The numeric input to the classifier.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FeatureRecord {
    /// Age in years.
    pub age: u8,
    /// 1 = male, 0 = female.
    pub sex: u8,
    /// Chest pain type, 0..=3.
    pub cp: u8,
    /// Resting blood pressure (mm Hg).
    pub trestbps: u16,
    /// Serum cholesterol (mg/dl).
    pub chol: u16,
    /// Fasting blood sugar above 120 mg/dl.
    pub fbs: u8,
    /// Resting ECG result, 0..=2.
    pub restecg: u8,
    /// Maximum heart rate achieved.
    pub thalach: u16,
    /// Exercise induced angina.
    pub exang: u8,
    /// ST depression induced by exercise.
    pub oldpeak: f64,
    /// Slope of the peak exercise ST segment, 0..=2.
    pub slope: u8,
    /// Number of major vessels, 0..=4.
    pub ca: u8,
    /// Thalassemia, 1..=3.
    pub thal: u8,
}

impl FeatureRecord {
    /// Lays the record out in `FEATURE_NAMES` order.
    pub fn to_array(&self) -> [f64; FEATURE_COUNT] {
        [
            f64::from(self.age),
            f64::from(self.sex),
            f64::from(self.cp),
            f64::from(self.trestbps),
            f64::from(self.chol),
            f64::from(self.fbs),
            f64::from(self.restecg),
            f64::from(self.thalach),
            f64::from(self.exang),
            self.oldpeak,
            f64::from(self.slope),
            f64::from(self.ca),
            f64::from(self.thal),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn array_follows_feature_names() {
        let record = FeatureRecord {
            age: 63,
            sex: 1,
            cp: 3,
            trestbps: 145,
            chol: 233,
            fbs: 1,
            restecg: 0,
            thalach: 150,
            exang: 0,
            oldpeak: 2.3,
            slope: 0,
            ca: 0,
            thal: 1,
        };

        let values = record.to_array();
        let index = |name: &str| FEATURE_NAMES.iter().position(|n| *n == name).unwrap();

        assert_eq!(values[index("age")], 63.0);
        assert_eq!(values[index("trestbps")], 145.0);
        assert_eq!(values[index("chol")], 233.0);
        assert_eq!(values[index("thalach")], 150.0);
        assert_eq!(values[index("oldpeak")], 2.3);
        assert_eq!(values[index("thal")], 1.0);
    }
}
