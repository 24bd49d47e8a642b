use async_trait::async_trait;
use chrono::Utc;
use sqlx::types::Json;
use sqlx::{PgConnection, PgPool, Postgres, Transaction};
use tracing::info;
use uuid::Uuid;

use crate::models::content::ResumePatch;
use crate::models::resume::{
    FileUrls, ResumeDocument, ResumeRow, ResumeVersion, ResumeVersionRow, TemplateId,
};
use crate::store::versioning::{apply_file_urls, apply_template, apply_update};
use crate::store::{ResumeStore, StoreError};

/// Postgres-backed store. Documents live in `resumes`; the history lives in the
/// append-only `resume_versions` table.
#[derive(Clone)]
pub struct PgResumeStore {
    pool: PgPool,
}

impl PgResumeStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Row-locked read-modify-write in a single transaction.
    async fn mutate<F>(&self, resume_id: Uuid, f: F) -> Result<ResumeDocument, StoreError>
    where
        F: FnOnce(&mut ResumeDocument) -> Option<ResumeVersion> + Send,
    {
        let mut tx = self.pool.begin().await?;

        let row = sqlx::query_as::<_, ResumeRow>("SELECT * FROM resumes WHERE id = $1 FOR UPDATE")
            .bind(resume_id)
            .fetch_optional(&mut *tx)
            .await?
            .ok_or(StoreError::NotFound(resume_id))?;
        let versions = load_versions(&mut tx, resume_id).await?;
        let mut doc = into_document(row, versions)?;

        let appended = f(&mut doc);

        sqlx::query(
            r#"
            UPDATE resumes
            SET title = $2, template = $3, content = $4, file_urls = $5,
                metadata = $6, updated_at = $7
            WHERE id = $1
            "#,
        )
        .bind(doc.id)
        .bind(&doc.title)
        .bind(doc.template.as_str())
        .bind(Json(&doc.content))
        .bind(Json(&doc.file_urls))
        .bind(Json(&doc.metadata))
        .bind(doc.updated_at)
        .execute(&mut *tx)
        .await?;

        if let Some(version) = appended {
            insert_version(&mut tx, resume_id, &version).await?;
            info!(resume_id = %resume_id, version = version.version_number, "Appended resume version");
        }

        tx.commit().await?;
        Ok(doc)
    }

    /// Read-only transaction over one snapshot, so a document and its versions
    /// always agree even while an update commits.
    async fn begin_snapshot(&self) -> Result<Transaction<'static, Postgres>, StoreError> {
        let mut tx = self.pool.begin().await?;
        sqlx::query("SET TRANSACTION ISOLATION LEVEL REPEATABLE READ READ ONLY")
            .execute(&mut *tx)
            .await?;
        Ok(tx)
    }

    async fn find_for_user(&self, user_id: Uuid) -> Result<Option<ResumeDocument>, StoreError> {
        let mut tx = self.begin_snapshot().await?;
        let row = sqlx::query_as::<_, ResumeRow>(
            r#"
            SELECT * FROM resumes
            WHERE user_id = $1
            ORDER BY is_default DESC, created_at ASC
            LIMIT 1
            "#,
        )
        .bind(user_id)
        .fetch_optional(&mut *tx)
        .await?;

        let doc = match row {
            Some(row) => {
                let versions = load_versions(&mut tx, row.id).await?;
                Some(into_document(row, versions)?)
            }
            None => None,
        };
        tx.commit().await?;
        Ok(doc)
    }
}

#[async_trait]
impl ResumeStore for PgResumeStore {
    async fn get_or_create(&self, user_id: Uuid) -> Result<ResumeDocument, StoreError> {
        if let Some(doc) = self.find_for_user(user_id).await? {
            return Ok(doc);
        }

        // A concurrent first read may win the race; the partial unique index turns
        // our insert into a no-op and the re-select returns the winner.
        let doc = ResumeDocument::new_default(user_id, Utc::now());
        let inserted = sqlx::query(
            r#"
            INSERT INTO resumes
                (id, user_id, title, is_default, template, content, file_urls,
                 metadata, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
            ON CONFLICT (user_id) WHERE is_default DO NOTHING
            "#,
        )
        .bind(doc.id)
        .bind(doc.user_id)
        .bind(&doc.title)
        .bind(doc.is_default)
        .bind(doc.template.as_str())
        .bind(Json(&doc.content))
        .bind(Json(&doc.file_urls))
        .bind(Json(&doc.metadata))
        .bind(doc.created_at)
        .bind(doc.updated_at)
        .execute(&self.pool)
        .await?
        .rows_affected();

        if inserted == 1 {
            info!(resume_id = %doc.id, user_id = %user_id, "Created default resume");
            return Ok(doc);
        }

        self.find_for_user(user_id)
            .await?
            .ok_or_else(|| StoreError::Unavailable(format!("default resume for {user_id} vanished")))
    }

    async fn find_by_id(&self, resume_id: Uuid) -> Result<ResumeDocument, StoreError> {
        let mut tx = self.begin_snapshot().await?;
        let row = sqlx::query_as::<_, ResumeRow>("SELECT * FROM resumes WHERE id = $1")
            .bind(resume_id)
            .fetch_optional(&mut *tx)
            .await?
            .ok_or(StoreError::NotFound(resume_id))?;

        let versions = load_versions(&mut tx, resume_id).await?;
        tx.commit().await?;
        into_document(row, versions)
    }

    async fn update(
        &self,
        resume_id: Uuid,
        patch: ResumePatch,
    ) -> Result<ResumeDocument, StoreError> {
        self.mutate(resume_id, |doc| apply_update(doc, patch, Utc::now()))
            .await
    }

    async fn update_template(
        &self,
        resume_id: Uuid,
        template: TemplateId,
    ) -> Result<ResumeDocument, StoreError> {
        self.mutate(resume_id, |doc| {
            apply_template(doc, template, Utc::now());
            None
        })
        .await
    }

    async fn record_file_urls(
        &self,
        resume_id: Uuid,
        file_urls: FileUrls,
    ) -> Result<ResumeDocument, StoreError> {
        self.mutate(resume_id, |doc| {
            apply_file_urls(doc, file_urls, Utc::now());
            None
        })
        .await
    }

    fn backend_name(&self) -> &'static str {
        "postgres"
    }
}

async fn load_versions(
    conn: &mut PgConnection,
    resume_id: Uuid,
) -> Result<Vec<ResumeVersion>, StoreError> {
    let rows = sqlx::query_as::<_, ResumeVersionRow>(
        r#"
        SELECT version_number, content, file_urls, notes, created_at
        FROM resume_versions
        WHERE resume_id = $1
        ORDER BY version_number ASC
        "#,
    )
    .bind(resume_id)
    .fetch_all(&mut *conn)
    .await?;
    Ok(rows.into_iter().map(ResumeVersion::from).collect())
}

async fn insert_version(
    conn: &mut PgConnection,
    resume_id: Uuid,
    version: &ResumeVersion,
) -> Result<(), StoreError> {
    sqlx::query(
        r#"
        INSERT INTO resume_versions
            (id, resume_id, version_number, content, file_urls, notes, created_at)
        VALUES ($1, $2, $3, $4, $5, $6, $7)
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(resume_id)
    .bind(version.version_number)
    .bind(Json(&version.content))
    .bind(Json(&version.file_urls))
    .bind(&version.notes)
    .bind(version.created_at)
    .execute(&mut *conn)
    .await?;
    Ok(())
}

fn into_document(
    row: ResumeRow,
    versions: Vec<ResumeVersion>,
) -> Result<ResumeDocument, StoreError> {
    let id = row.id;
    row.into_document(versions)
        .map_err(|e| StoreError::Corrupt {
            id,
            reason: e.to_string(),
        })
}
