use garde::Validate;
use serde::{Deserialize, Serialize};

use crate::models::features::FeatureRecord;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Sex {
    Male,
    Female,
}

impl Sex {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Male => "Male",
            Self::Female => "Female",
        }
    }

    fn code(&self) -> u8 {
        match self {
            Self::Male => 1,
            Self::Female => 0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ChestPain {
    #[serde(rename = "Typical Angina")]
    TypicalAngina,
    #[serde(rename = "Atypical Angina")]
    AtypicalAngina,
    #[serde(rename = "Non-anginal Pain")]
    NonAnginalPain,
    #[serde(rename = "Asymptomatic")]
    Asymptomatic,
}

impl ChestPain {
    fn code(&self) -> u8 {
        match self {
            Self::TypicalAngina => 0,
            Self::AtypicalAngina => 1,
            Self::NonAnginalPain => 2,
            Self::Asymptomatic => 3,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RestingEcg {
    #[serde(rename = "Normal")]
    Normal,
    #[serde(rename = "ST-T abnormality")]
    StTAbnormality,
    #[serde(rename = "Left Ventricular Hypertrophy")]
    LeftVentricularHypertrophy,
}

impl RestingEcg {
    fn code(&self) -> u8 {
        match self {
            Self::Normal => 0,
            Self::StTAbnormality => 1,
            Self::LeftVentricularHypertrophy => 2,
        }
    }
}

/// The patient form as submitted by the client.
///
/// Categorical answers arrive as the labels shown on the form and numeric
/// answers are bounded to the ranges the form offers.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct PatientForm {
    #[garde(range(min = 20, max = 80))]
    pub age: u8,
    #[garde(skip)]
    pub sex: Sex,
    #[garde(skip)]
    pub chest_pain: ChestPain,
    #[garde(range(min = 90, max = 200))]
    pub resting_bp: u16,
    #[garde(range(min = 120, max = 350))]
    pub cholesterol: u16,
    #[garde(range(min = 70, max = 210))]
    pub max_heart_rate: u16,
    #[garde(skip)]
    pub fasting_blood_sugar: bool,
    #[garde(skip)]
    pub resting_ecg: RestingEcg,
    #[garde(skip)]
    pub exercise_angina: bool,
    #[garde(range(min = 0.0, max = 6.0))]
    pub st_depression: f64,
    #[garde(range(min = 0, max = 2))]
    pub st_slope: u8,
    #[garde(range(min = 0, max = 4))]
    pub major_vessels: u8,
    #[garde(range(min = 1, max = 3))]
    pub thalassemia: u8,
}

impl PatientForm {
    /// Encodes the form into the classifier's feature contract.
    pub fn to_features(&self) -> FeatureRecord {
        FeatureRecord {
            age: self.age,
            sex: self.sex.code(),
            cp: self.chest_pain.code(),
            trestbps: self.resting_bp,
            chol: self.cholesterol,
            fbs: u8::from(self.fasting_blood_sugar),
            restecg: self.resting_ecg.code(),
            thalach: self.max_heart_rate,
            exang: u8::from(self.exercise_angina),
            oldpeak: self.st_depression,
            slope: self.st_slope,
            ca: self.major_vessels,
            thal: self.thalassemia,
        }
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    pub(crate) fn sample_form() -> PatientForm {
        PatientForm {
            age: 63,
            sex: Sex::Male,
            chest_pain: ChestPain::Asymptomatic,
            resting_bp: 145,
            cholesterol: 233,
            max_heart_rate: 150,
            fasting_blood_sugar: true,
            resting_ecg: RestingEcg::Normal,
            exercise_angina: false,
            st_depression: 2.3,
            st_slope: 0,
            major_vessels: 0,
            thalassemia: 1,
        }
    }

    #[test]
    fn form_encodes_to_reference_tuple() {
        let features = sample_form().to_features();
        assert_eq!(
            features.to_array(),
            [63.0, 1.0, 3.0, 145.0, 233.0, 1.0, 0.0, 150.0, 0.0, 2.3, 0.0, 0.0, 1.0]
        );
    }

    #[test]
    fn categorical_labels_deserialize_from_form_text() {
        let pain: ChestPain = serde_json::from_str(r#""Non-anginal Pain""#).unwrap();
        let ecg: RestingEcg = serde_json::from_str(r#""ST-T abnormality""#).unwrap();
        assert_eq!(pain.code(), 2);
        assert_eq!(ecg.code(), 1);
        assert_eq!(Sex::Female.code(), 0);
    }

    #[test]
    fn garde_rejects_out_of_range_values() {
        let mut form = sample_form();
        assert!(form.validate().is_ok());

        form.st_depression = 6.5;
        assert!(form.validate().is_err());

        form = sample_form();
        form.thalassemia = 0;
        assert!(form.validate().is_err());
    }
}
