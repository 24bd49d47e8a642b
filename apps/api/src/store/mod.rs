//! Resume document store: pluggable persistence for `ResumeDocument`s.
//!
//! `AppState` holds an `Arc<dyn ResumeStore>`, chosen at startup via
//! `STORE_BACKEND`. Every backend routes mutations through `versioning` so the
//! append-only history behaves the same everywhere.

use async_trait::async_trait;
use thiserror::Error;
use uuid::Uuid;

use crate::models::content::ResumePatch;
use crate::models::resume::{FileUrls, ResumeDocument, TemplateId};

pub mod memory;
pub mod postgres;
pub mod versioning;

pub use memory::InMemoryResumeStore;
pub use postgres::PgResumeStore;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Resume {0} not found")]
    NotFound(Uuid),

    #[error("Version {version} of resume {resume_id} not found")]
    VersionNotFound { resume_id: Uuid, version: i32 },

    #[error("Store unavailable: {0}")]
    Unavailable(String),

    #[error("Database error: {0}")]
    Database(sqlx::Error),

    #[error("Corrupt resume record {id}: {reason}")]
    Corrupt { id: Uuid, reason: String },
}

impl From<sqlx::Error> for StoreError {
    fn from(e: sqlx::Error) -> Self {
        match e {
            sqlx::Error::PoolTimedOut | sqlx::Error::PoolClosed | sqlx::Error::Io(_) => {
                StoreError::Unavailable(e.to_string())
            }
            other => StoreError::Database(other),
        }
    }
}

/// The resume store trait. Implement this to swap persistence without touching
/// handlers or the generation pipeline.
#[async_trait]
pub trait ResumeStore: Send + Sync {
    /// Fetches the user's resume, creating and persisting a default one when the
    /// user has none. Absence is never an error here.
    async fn get_or_create(&self, user_id: Uuid) -> Result<ResumeDocument, StoreError>;

    async fn find_by_id(&self, resume_id: Uuid) -> Result<ResumeDocument, StoreError>;

    /// Field-replacement update. Appends one version when content changes.
    async fn update(
        &self,
        resume_id: Uuid,
        patch: ResumePatch,
    ) -> Result<ResumeDocument, StoreError>;

    async fn update_template(
        &self,
        resume_id: Uuid,
        template: TemplateId,
    ) -> Result<ResumeDocument, StoreError>;

    /// Records where the latest generated files live.
    async fn record_file_urls(
        &self,
        resume_id: Uuid,
        file_urls: FileUrls,
    ) -> Result<ResumeDocument, StoreError>;

    /// "postgres" | "memory", for logs and the health endpoint.
    fn backend_name(&self) -> &'static str;
}
