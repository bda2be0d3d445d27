use std::path::Path;

use serde::Deserialize;

use super::{RiskClassifier, ScaledRecord};
use crate::error::{AppError, Result};
use crate::models::features::{FeatureRecord, FEATURE_COUNT, FEATURE_NAMES, FEATURE_SCHEMA_VERSION};

/// Classifier kinds this loader can evaluate.
const SUPPORTED_KINDS: [&str; 2] = ["logistic_regression", "linear_svc"];

#[derive(Deserialize)]
struct Artifact {
    schema_version: u32,
    features: Vec<String>,
    scaler: ScalerParams,
    classifier: ClassifierParams,
}

#[derive(Deserialize)]
struct ScalerParams {
    mean: Vec<f64>,
    scale: Vec<f64>,
}

#[derive(Deserialize)]
struct ClassifierParams {
    kind: String,
    coefficients: Vec<f64>,
    intercept: f64,
    classes: Vec<u8>,
}

/// A standard scaler followed by a linear decision function, loaded from a
/// JSON artifact exported from the fitted model.
#[derive(Debug, Clone)]
pub struct LinearRiskModel {
    mean: [f64; FEATURE_COUNT],
    scale: [f64; FEATURE_COUNT],
    coefficients: [f64; FEATURE_COUNT],
    intercept: f64,
    classes: [u8; 2],
}

fn fixed<T>(name: &str, values: Vec<T>) -> Result<[T; FEATURE_COUNT]> {
    let len = values.len();
    values.try_into().map_err(|_| {
        AppError::Inference(format!(
            "{} has {} values, expected {}",
            name, len, FEATURE_COUNT
        ))
    })
}

impl LinearRiskModel {
    /// Loads and validates a model artifact.
    ///
    /// # Arguments
    ///
    /// * `path` - Path to the JSON artifact.
    ///
    /// # Returns
    ///
    /// A `Result` containing the model, or `AppError::Inference` when the file
    /// is missing or does not match the feature contract.
    pub fn load(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path).map_err(|e| {
            AppError::Inference(format!("cannot read model artifact {}: {}", path.display(), e))
        })?;
        let model = Self::from_json(&raw)?;
        tracing::info!("✅ Risk model loaded from {}", path.display());
        Ok(model)
    }

    pub fn from_json(json: &str) -> Result<Self> {
        let artifact: Artifact = sonic_rs::from_str(json)
            .map_err(|e| AppError::Inference(format!("malformed model artifact: {}", e)))?;

        if artifact.schema_version != FEATURE_SCHEMA_VERSION {
            return Err(AppError::Inference(format!(
                "artifact targets feature schema v{}, service speaks v{}",
                artifact.schema_version, FEATURE_SCHEMA_VERSION
            )));
        }

        if artifact.features.len() != FEATURE_COUNT
            || artifact.features.iter().zip(FEATURE_NAMES).any(|(a, b)| a != b)
        {
            return Err(AppError::Inference(format!(
                "artifact feature order {:?} does not match {:?}",
                artifact.features, FEATURE_NAMES
            )));
        }

        let classifier = artifact.classifier;
        if !SUPPORTED_KINDS.contains(&classifier.kind.as_str()) {
            return Err(AppError::Inference(format!(
                "unsupported classifier kind '{}'",
                classifier.kind
            )));
        }

        let classes: [u8; 2] = classifier.classes.try_into().map_err(|c: Vec<u8>| {
            AppError::Inference(format!("expected a binary classifier, got {} classes", c.len()))
        })?;

        let model = Self {
            mean: fixed("scaler.mean", artifact.scaler.mean)?,
            scale: fixed("scaler.scale", artifact.scaler.scale)?,
            coefficients: fixed("classifier.coefficients", classifier.coefficients)?,
            intercept: classifier.intercept,
            classes,
        };

        let all_finite = model
            .mean
            .iter()
            .chain(&model.scale)
            .chain(&model.coefficients)
            .chain(std::iter::once(&model.intercept))
            .all(|v| v.is_finite());
        if !all_finite {
            return Err(AppError::Inference("artifact contains non-finite parameters".to_string()));
        }
        if model.scale.iter().any(|s| *s == 0.0) {
            return Err(AppError::Inference("scaler has a zero scale".to_string()));
        }

        Ok(model)
    }

    /// Signed distance from the decision boundary.
    pub fn decision_function(&self, scaled: &ScaledRecord) -> f64 {
        scaled
            .values()
            .iter()
            .zip(&self.coefficients)
            .map(|(x, w)| x * w)
            .sum::<f64>()
            + self.intercept
    }
}

impl RiskClassifier for LinearRiskModel {
    fn transform(&self, record: &FeatureRecord) -> Result<ScaledRecord> {
        let raw = record.to_array();
        let mut scaled = [0.0; FEATURE_COUNT];
        for (i, value) in scaled.iter_mut().enumerate() {
            *value = (raw[i] - self.mean[i]) / self.scale[i];
        }
        Ok(ScaledRecord(scaled))
    }

    fn predict(&self, scaled: &ScaledRecord) -> Result<u8> {
        let decision = self.decision_function(scaled);
        if !decision.is_finite() {
            return Err(AppError::Inference("decision function is not finite".to_string()));
        }
        Ok(if decision > 0.0 { self.classes[1] } else { self.classes[0] })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SHIPPED_MODEL: &str =
        include_str!(concat!(env!("CARGO_MANIFEST_DIR"), "/models/heart_model.json"));

    fn record(values: [f64; FEATURE_COUNT]) -> FeatureRecord {
        FeatureRecord {
            age: values[0] as u8,
            sex: values[1] as u8,
            cp: values[2] as u8,
            trestbps: values[3] as u16,
            chol: values[4] as u16,
            fbs: values[5] as u8,
            restecg: values[6] as u8,
            thalach: values[7] as u16,
            exang: values[8] as u8,
            oldpeak: values[9],
            slope: values[10] as u8,
            ca: values[11] as u8,
            thal: values[12] as u8,
        }
    }

    fn artifact_with(features: &str, mean: &str) -> String {
        format!(
            r#"{{
                "schema_version": 1,
                "features": {features},
                "scaler": {{"mean": {mean}, "scale": [1,1,1,1,1,1,1,1,1,1,1,1,1]}},
                "classifier": {{
                    "kind": "logistic_regression",
                    "coefficients": [0,0,0,0,0,0,0,0,0,0,0,0,0],
                    "intercept": 1.0,
                    "classes": [0, 1]
                }}
            }}"#
        )
    }

    const NAMES: &str =
        r#"["age","sex","cp","trestbps","chol","fbs","restecg","thalach","exang","oldpeak","slope","ca","thal"]"#;
    const ZEROS: &str = "[0,0,0,0,0,0,0,0,0,0,0,0,0]";

    #[test]
    fn reference_tuple_matches_shipped_model() {
        let model = LinearRiskModel::from_json(SHIPPED_MODEL).unwrap();
        let features = record([63.0, 1.0, 3.0, 145.0, 233.0, 1.0, 0.0, 150.0, 0.0, 2.3, 0.0, 0.0, 1.0]);

        let scaled = model.transform(&features).unwrap();
        assert!((model.decision_function(&scaled) - 1.66).abs() < 0.05);
        assert_eq!(model.predict(&scaled).unwrap(), 1);
    }

    #[test]
    fn high_risk_profile_gets_class_zero() {
        let model = LinearRiskModel::from_json(SHIPPED_MODEL).unwrap();
        let features = record([67.0, 1.0, 0.0, 160.0, 286.0, 0.0, 0.0, 108.0, 1.0, 1.5, 1.0, 3.0, 2.0]);

        let scaled = model.transform(&features).unwrap();
        assert_eq!(model.predict(&scaled).unwrap(), 0);
    }

    #[test]
    fn transform_standardizes_each_column() {
        let json = artifact_with(NAMES, "[10,0,0,0,0,0,0,0,0,0,0,0,0]");
        let model = LinearRiskModel::from_json(&json).unwrap();
        let scaled = model
            .transform(&record([63.0, 1.0, 3.0, 145.0, 233.0, 1.0, 0.0, 150.0, 0.0, 2.3, 0.0, 0.0, 1.0]))
            .unwrap();
        assert_eq!(scaled.values()[0], 53.0);
        assert_eq!(scaled.values()[9], 2.3);
    }

    #[test]
    fn reordered_features_fail_to_load() {
        let swapped =
            r#"["sex","age","cp","trestbps","chol","fbs","restecg","thalach","exang","oldpeak","slope","ca","thal"]"#;
        assert!(matches!(
            LinearRiskModel::from_json(&artifact_with(swapped, ZEROS)),
            Err(AppError::Inference(_))
        ));
    }

    #[test]
    fn short_parameter_vectors_fail_to_load() {
        assert!(matches!(
            LinearRiskModel::from_json(&artifact_with(NAMES, "[0,0,0]")),
            Err(AppError::Inference(_))
        ));
    }

    #[test]
    fn missing_artifact_is_inference_unavailable() {
        let err = LinearRiskModel::load(Path::new("/nonexistent/heart_model.json")).unwrap_err();
        assert!(matches!(err, AppError::Inference(_)));
    }
}
