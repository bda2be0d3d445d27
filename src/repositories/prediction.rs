use chrono::Local;
use sqlx::SqlitePool;
use crate::{error::Result, models::prediction::PredictionRecord};

/// Format of the `time` column.
const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S%.6f";

/// Creates the `predictions` table if it does not exist.
///
/// Safe to run at every startup and concurrently with itself; existing rows
/// are never touched.
///
/// # Arguments
///
/// * `db` - The database connection pool.
pub async fn initialize_schema(db: &SqlitePool) -> Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS predictions (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            age INTEGER,
            sex TEXT,
            bp INTEGER,
            chol INTEGER,
            result TEXT,
            time TEXT
        )
        "#,
    )
    .execute(db)
    .await?;

    Ok(())
}

/// Appends a prediction to the log.
///
/// The store assigns the id and the timestamp. `result` is stored verbatim.
///
/// # Arguments
///
/// * `db` - The database connection pool.
/// * `age` - The patient's age.
/// * `sex` - The sex label as submitted.
/// * `blood_pressure` - Resting blood pressure.
/// * `cholesterol` - Serum cholesterol.
/// * `result` - The risk label.
///
/// # Returns
///
/// A `Result` containing the stored `PredictionRecord`.
pub async fn append(
    db: &SqlitePool,
    age: i64,
    sex: &str,
    blood_pressure: i64,
    cholesterol: i64,
    result: &str,
) -> Result<PredictionRecord> {
    let timestamp = Local::now().format(TIMESTAMP_FORMAT).to_string();

    let record = sqlx::query_as::<_, PredictionRecord>(
        r#"
        INSERT INTO predictions (age, sex, bp, chol, result, time)
        VALUES (?1, ?2, ?3, ?4, ?5, ?6)
        RETURNING id, age, sex, bp, chol, result, time
        "#,
    )
    .bind(age)
    .bind(sex)
    .bind(blood_pressure)
    .bind(cholesterol)
    .bind(result)
    .bind(timestamp)
    .fetch_one(db)
    .await?;

    tracing::debug!("📝 Prediction {} appended", record.id);
    Ok(record)
}

/// Lists every prediction, most recent first.
///
/// # Arguments
///
/// * `db` - The database connection pool.
///
/// # Returns
///
/// A `Result` containing the records ordered by id descending; empty when the
/// log holds nothing.
pub async fn fetch_all(db: &SqlitePool) -> Result<Vec<PredictionRecord>> {
    let records = sqlx::query_as::<_, PredictionRecord>(
        r#"
        SELECT id, age, sex, bp, chol, result, time
        FROM predictions
        ORDER BY id DESC
        "#,
    )
    .fetch_all(db)
    .await?;

    Ok(records)
}
