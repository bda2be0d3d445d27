use crate::error::{AppError, Result};
use crate::models::patient::PatientForm;
use crate::models::prediction::{PredictionRecord, RiskLabel};
use crate::models::session::Session;
use crate::repositories::prediction as prediction_repo;
use crate::services::auth::{require_history_access, require_identity};
use crate::state::AppState;
use crate::validation::prediction::validate_patient_form;

/// Header of the CSV export.
const CSV_HEADER: &str = "age,sex,bp,chol,result,time";

/// Runs the model on a submitted form and logs the outcome.
///
/// # Arguments
///
/// * `state` - The application state.
/// * `session` - The caller's session; any authenticated role may submit.
/// * `form` - The submitted patient form.
///
/// # Returns
///
/// A `Result` containing the stored `PredictionRecord`.
pub async fn submit(state: &AppState, session: &Session, form: &PatientForm) -> Result<PredictionRecord> {
    let identity = require_identity(session)?;
    validate_patient_form(form)?;

    let features = form.to_features();
    let scaled = state.model.transform(&features)?;
    let class = state.model.predict(&scaled)?;
    let label = RiskLabel::from_class(class)
        .ok_or_else(|| AppError::Inference(format!("model returned unknown label {}", class)))?;

    let record = prediction_repo::append(
        &state.db,
        i64::from(form.age),
        form.sex.as_str(),
        i64::from(form.resting_bp),
        i64::from(form.cholesterol),
        label.as_str(),
    )
    .await?;

    tracing::info!(
        "🩺 Prediction {} by {}: {}",
        record.id,
        identity.username,
        record.result
    );

    Ok(record)
}

/// Returns the full prediction log, most recent first.
///
/// # Arguments
///
/// * `state` - The application state.
/// * `session` - The caller's session; only admin and doctor may read.
pub async fn history(state: &AppState, session: &Session) -> Result<Vec<PredictionRecord>> {
    let identity = require_history_access(session)?;
    let records = prediction_repo::fetch_all(&state.db).await?;
    tracing::debug!("📋 {} read {} predictions", identity.username, records.len());
    Ok(records)
}

/// Renders the full prediction log as CSV.
pub async fn export_csv(state: &AppState, session: &Session) -> Result<String> {
    let records = history(state, session).await?;
    Ok(render_csv(&records))
}

/// Quotes a field when it contains a delimiter, quote or line break.
fn csv_field(value: &str) -> String {
    if value.contains([',', '"', '\n', '\r']) {
        format!("\"{}\"", value.replace('"', "\"\""))
    } else {
        value.to_string()
    }
}

/// Renders records as comma-separated text with a header row.
pub fn render_csv(records: &[PredictionRecord]) -> String {
    let mut out = String::with_capacity(CSV_HEADER.len() + 1 + records.len() * 64);
    out.push_str(CSV_HEADER);
    out.push('\n');

    for record in records {
        out.push_str(&format!(
            "{},{},{},{},{},{}\n",
            record.age,
            csv_field(&record.sex),
            record.blood_pressure,
            record.cholesterol,
            csv_field(&record.result),
            csv_field(&record.timestamp),
        ));
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(id: i64, result: &str) -> PredictionRecord {
        PredictionRecord {
            id,
            age: 35,
            sex: "Male".to_string(),
            blood_pressure: 110,
            cholesterol: 180,
            result: result.to_string(),
            timestamp: "2026-10-18 09:15:00.000000".to_string(),
        }
    }

    #[test]
    fn csv_has_header_and_one_line_per_record() {
        let csv = render_csv(&[record(2, "Low Risk"), record(1, "High Risk")]);
        let lines: Vec<&str> = csv.lines().collect();

        assert_eq!(lines[0], "age,sex,bp,chol,result,time");
        assert_eq!(lines[1], "35,Male,110,180,Low Risk,2026-10-18 09:15:00.000000");
        assert_eq!(lines.len(), 3);
    }

    #[test]
    fn csv_quotes_fields_with_delimiters() {
        let csv = render_csv(&[record(1, "odd, \"label\"")]);
        assert!(csv.contains(r#","odd, ""label""","#));
    }

    #[test]
    fn empty_log_exports_only_the_header() {
        assert_eq!(render_csv(&[]), "age,sex,bp,chol,result,time\n");
    }
}
