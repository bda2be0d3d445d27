use sqlx::SqlitePool;
use std::sync::Arc;
use crate::config::Config;
use crate::credentials::CredentialTable;
use crate::error::{AppError, Result};
use crate::inference::{LinearRiskModel, RiskClassifier};
use crate::repositories::prediction as prediction_repo;
use crate::session_store::SessionStore;

/// The application's state.
#[derive(Clone)]
pub struct AppState {
    /// The prediction log connection pool.
    pub db: SqlitePool,
    /// The credential table.
    pub credentials: Arc<CredentialTable>,
    /// The loaded risk model.
    pub model: Arc<dyn RiskClassifier>,
    /// Live sessions.
    pub sessions: SessionStore,
    /// The application's configuration.
    pub config: Config,
}

impl AppState {
    /// Creates a new `AppState`.
    ///
    /// Opens the prediction log, ensures its schema, loads the credential
    /// table and the model artifact. Any failure here is fatal to startup.
    ///
    /// # Arguments
    ///
    /// * `config` - The application's configuration.
    ///
    /// # Returns
    ///
    /// A `Result` containing the `AppState`.
    pub async fn new(config: &Config) -> Result<Self> {
        let db = crate::db::create_pool(&config.database_url).await?;
        prediction_repo::initialize_schema(&db).await?;
        tracing::info!("✅ Prediction log ready at {}", config.database_url);

        let credentials = CredentialTable::load(&config.credentials_path)
            .map_err(|e| AppError::Internal(format!("{:#}", e)))?;

        let model = LinearRiskModel::load(&config.model_path)?;

        Ok(Self::from_parts(db, credentials, Arc::new(model), config.clone()))
    }

    /// Assembles state from already-initialized parts.
    pub fn from_parts(
        db: SqlitePool,
        credentials: CredentialTable,
        model: Arc<dyn RiskClassifier>,
        config: Config,
    ) -> Self {
        let sessions = SessionStore::new(chrono::Duration::hours(config.session_duration_hours));
        tracing::info!("✅ Session store initialized");

        Self {
            db,
            credentials: Arc::new(credentials),
            model,
            sessions,
            config,
        }
    }
}
