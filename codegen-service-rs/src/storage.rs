// codegen-service-rs/src/storage.rs
//
// History store for code requests and responses
// Provides:
// - Append-only persistence of CodeRequest / CodeResponse records
// - Retrieval of the most recent requests, newest first
// - In-memory and PostgreSQL implementations

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use config_rs::{StoreBackend, StoreSettings};
use tokio::sync::RwLock;

use crate::models::{CodeRequest, CodeResponse, RequestType};

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("corrupt record {id}: {reason}")]
    CorruptRecord { id: String, reason: String },

    #[error("store configuration error: {0}")]
    Configuration(String),
}

pub type StoreResult<T> = Result<T, StoreError>;

/// Read/write contract for request history
#[async_trait]
pub trait HistoryStore: Send + Sync {
    /// Create tables or other structures the store needs
    async fn initialize(&self) -> StoreResult<()>;

    async fn is_healthy(&self) -> bool;

    async fn insert_request(&self, request: &CodeRequest) -> StoreResult<()>;

    async fn insert_response(&self, response: &CodeResponse) -> StoreResult<()>;

    /// The `limit` most recently created requests, newest first
    async fn recent_requests(&self, limit: usize) -> StoreResult<Vec<CodeRequest>>;

    /// Release connections; called once at shutdown
    async fn close(&self);
}

/// In-memory store for development and testing
#[derive(Default)]
pub struct InMemoryHistoryStore {
    requests: RwLock<Vec<CodeRequest>>,
    responses: RwLock<Vec<CodeResponse>>,
}

impl InMemoryHistoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn requests(&self) -> Vec<CodeRequest> {
        self.requests.read().await.clone()
    }

    pub async fn responses(&self) -> Vec<CodeResponse> {
        self.responses.read().await.clone()
    }
}

#[async_trait]
impl HistoryStore for InMemoryHistoryStore {
    async fn initialize(&self) -> StoreResult<()> {
        log::info!("In-memory history store initialized");
        Ok(())
    }

    async fn is_healthy(&self) -> bool {
        true
    }

    async fn insert_request(&self, request: &CodeRequest) -> StoreResult<()> {
        self.requests.write().await.push(request.clone());
        log::debug!("Stored code request {}", request.id);
        Ok(())
    }

    async fn insert_response(&self, response: &CodeResponse) -> StoreResult<()> {
        self.responses.write().await.push(response.clone());
        log::debug!("Stored code response {} for request {}", response.id, response.request_id);
        Ok(())
    }

    async fn recent_requests(&self, limit: usize) -> StoreResult<Vec<CodeRequest>> {
        let requests = self.requests.read().await;
        let mut recent: Vec<CodeRequest> = requests.clone();
        // Stable sort keeps insertion order for equal timestamps; reversing makes the latest insert win.
        recent.reverse();
        recent.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
        recent.truncate(limit);
        Ok(recent)
    }

    async fn close(&self) {
        log::info!("In-memory history store closed");
    }
}

type RequestRow = (String, String, String, String, Option<String>, DateTime<Utc>);

/// PostgreSQL history store
pub struct PostgresHistoryStore {
    pool: sqlx::PgPool,
}

impl PostgresHistoryStore {
    pub async fn connect(database_url: &str) -> StoreResult<Self> {
        let pool = sqlx::PgPool::connect(database_url).await?;
        Ok(Self { pool })
    }

    fn request_from_row(row: RequestRow) -> StoreResult<CodeRequest> {
        let (id, prompt, language, request_type, code_input, timestamp) = row;
        let request_type = request_type
            .parse::<RequestType>()
            .map_err(|reason| StoreError::CorruptRecord { id: id.clone(), reason })?;

        Ok(CodeRequest {
            id,
            prompt,
            language,
            request_type,
            code_input,
            timestamp,
        })
    }
}

#[async_trait]
impl HistoryStore for PostgresHistoryStore {
    async fn initialize(&self) -> StoreResult<()> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS code_requests (
                id VARCHAR(64) PRIMARY KEY,
                prompt TEXT NOT NULL,
                language VARCHAR(64) NOT NULL,
                request_type VARCHAR(16) NOT NULL,
                code_input TEXT,
                timestamp TIMESTAMP WITH TIME ZONE NOT NULL
            )
            "#,
        )
        .execute(&self.pool)
        .await?;

        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS code_responses (
                id VARCHAR(64) PRIMARY KEY,
                request_id VARCHAR(64) NOT NULL REFERENCES code_requests(id),
                generated_code TEXT NOT NULL,
                explanation TEXT NOT NULL,
                language VARCHAR(64) NOT NULL,
                timestamp TIMESTAMP WITH TIME ZONE NOT NULL
            )
            "#,
        )
        .execute(&self.pool)
        .await?;

        sqlx::query("CREATE INDEX IF NOT EXISTS code_requests_timestamp_idx ON code_requests (timestamp DESC)")
            .execute(&self.pool)
            .await?;

        log::info!("PostgreSQL history store initialized");
        Ok(())
    }

    async fn is_healthy(&self) -> bool {
        sqlx::query("SELECT 1").execute(&self.pool).await.is_ok()
    }

    async fn insert_request(&self, request: &CodeRequest) -> StoreResult<()> {
        sqlx::query(
            r#"
            INSERT INTO code_requests (id, prompt, language, request_type, code_input, timestamp)
            VALUES ($1, $2, $3, $4, $5, $6)
            "#,
        )
        .bind(&request.id)
        .bind(&request.prompt)
        .bind(&request.language)
        .bind(request.request_type.as_str())
        .bind(&request.code_input)
        .bind(request.timestamp)
        .execute(&self.pool)
        .await?;

        log::debug!("Stored code request {}", request.id);
        Ok(())
    }

    async fn insert_response(&self, response: &CodeResponse) -> StoreResult<()> {
        sqlx::query(
            r#"
            INSERT INTO code_responses (id, request_id, generated_code, explanation, language, timestamp)
            VALUES ($1, $2, $3, $4, $5, $6)
            "#,
        )
        .bind(&response.id)
        .bind(&response.request_id)
        .bind(&response.generated_code)
        .bind(&response.explanation)
        .bind(&response.language)
        .bind(response.timestamp)
        .execute(&self.pool)
        .await?;

        log::debug!("Stored code response {} for request {}", response.id, response.request_id);
        Ok(())
    }

    async fn recent_requests(&self, limit: usize) -> StoreResult<Vec<CodeRequest>> {
        let rows: Vec<RequestRow> = sqlx::query_as(
            r#"
            SELECT id, prompt, language, request_type, code_input, timestamp
            FROM code_requests
            ORDER BY timestamp DESC
            LIMIT $1
            "#,
        )
        .bind(i64::try_from(limit).unwrap_or(i64::MAX))
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(Self::request_from_row).collect()
    }

    async fn close(&self) {
        self.pool.close().await;
        log::info!("PostgreSQL history store closed");
    }
}

/// Create and initialize a history store based on configuration
pub async fn create_history_store(settings: &StoreSettings) -> StoreResult<Arc<dyn HistoryStore>> {
    let store: Arc<dyn HistoryStore> = match settings.backend {
        StoreBackend::Memory => {
            log::info!("Using in-memory history store");
            Arc::new(InMemoryHistoryStore::new())
        }
        StoreBackend::Postgres => {
            let url = settings
                .connection_string
                .as_deref()
                .ok_or_else(|| StoreError::Configuration("PostgreSQL connection string required".to_string()))?;
            log::info!("Using PostgreSQL history store");
            Arc::new(PostgresHistoryStore::connect(url).await?)
        }
    };

    store.initialize().await?;
    Ok(store)
}
