use garde::Validate;

use crate::error::{AppError, Result};
use crate::models::patient::PatientForm;

/// Validates a submitted patient form.
///
/// # Arguments
///
/// * `form` - The form to validate.
///
/// # Returns
///
/// A `Result<()>` indicating whether every field lies within the range the
/// form offers.
pub fn validate_patient_form(form: &PatientForm) -> Result<()> {
    form.validate()
        .map_err(|report| AppError::Validation(report.to_string().trim().to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::patient::tests::sample_form;

    #[test]
    fn out_of_range_age_is_a_validation_error() {
        let mut form = sample_form();
        form.age = 95;

        match validate_patient_form(&form) {
            Err(AppError::Validation(msg)) => assert!(msg.contains("age"), "{msg}"),
            other => panic!("expected validation error, got {:?}", other),
        }
    }
}
