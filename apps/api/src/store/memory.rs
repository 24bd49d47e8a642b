use std::collections::HashMap;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;
use tracing::info;
use uuid::Uuid;

use crate::models::content::ResumePatch;
use crate::models::resume::{FileUrls, ResumeDocument, TemplateId};
use crate::store::versioning::{apply_file_urls, apply_template, apply_update};
use crate::store::{ResumeStore, StoreError};

/// Process-local store. Each call holds the write lock for its whole
/// read-modify-write, so a single update is all-or-nothing.
#[derive(Default)]
pub struct InMemoryResumeStore {
    resumes: RwLock<HashMap<Uuid, ResumeDocument>>,
}

impl InMemoryResumeStore {
    pub fn new() -> Self {
        Self::default()
    }

    async fn mutate<F>(&self, resume_id: Uuid, f: F) -> Result<ResumeDocument, StoreError>
    where
        F: FnOnce(&mut ResumeDocument) + Send,
    {
        let mut resumes = self.resumes.write().await;
        let doc = resumes
            .get_mut(&resume_id)
            .ok_or(StoreError::NotFound(resume_id))?;
        f(doc);
        Ok(doc.clone())
    }
}

#[async_trait]
impl ResumeStore for InMemoryResumeStore {
    async fn get_or_create(&self, user_id: Uuid) -> Result<ResumeDocument, StoreError> {
        let mut resumes = self.resumes.write().await;

        let existing = resumes
            .values()
            .filter(|doc| doc.user_id == user_id)
            .min_by_key(|doc| (!doc.is_default, doc.created_at));
        if let Some(doc) = existing {
            return Ok(doc.clone());
        }

        let doc = ResumeDocument::new_default(user_id, Utc::now());
        info!(resume_id = %doc.id, user_id = %user_id, "Created default resume");
        resumes.insert(doc.id, doc.clone());
        Ok(doc)
    }

    async fn find_by_id(&self, resume_id: Uuid) -> Result<ResumeDocument, StoreError> {
        self.resumes
            .read()
            .await
            .get(&resume_id)
            .cloned()
            .ok_or(StoreError::NotFound(resume_id))
    }

    async fn update(
        &self,
        resume_id: Uuid,
        patch: ResumePatch,
    ) -> Result<ResumeDocument, StoreError> {
        self.mutate(resume_id, |doc| {
            if let Some(v) = apply_update(doc, patch, Utc::now()) {
                info!(resume_id = %resume_id, version = v.version_number, "Appended resume version");
            }
        })
        .await
    }

    async fn update_template(
        &self,
        resume_id: Uuid,
        template: TemplateId,
    ) -> Result<ResumeDocument, StoreError> {
        self.mutate(resume_id, |doc| apply_template(doc, template, Utc::now()))
            .await
    }

    async fn record_file_urls(
        &self,
        resume_id: Uuid,
        file_urls: FileUrls,
    ) -> Result<ResumeDocument, StoreError> {
        self.mutate(resume_id, |doc| apply_file_urls(doc, file_urls, Utc::now()))
            .await
    }

    fn backend_name(&self) -> &'static str {
        "memory"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::content::{Basics, ContentPatch};

    fn name_patch(name: &str) -> ResumePatch {
        ResumePatch {
            content: ContentPatch {
                basics: Some(Basics {
                    name: name.to_string(),
                    ..Default::default()
                }),
                ..Default::default()
            },
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn test_get_or_create_is_idempotent() {
        let store = InMemoryResumeStore::new();
        let user_id = Uuid::new_v4();
        let first = store.get_or_create(user_id).await.unwrap();
        let second = store.get_or_create(user_id).await.unwrap();
        assert_eq!(first.id, second.id);
        assert_eq!(first.template, TemplateId::Classic);
        assert!(first.content.education.is_empty());
    }

    #[tokio::test]
    async fn test_get_or_create_separates_users() {
        let store = InMemoryResumeStore::new();
        let a = store.get_or_create(Uuid::new_v4()).await.unwrap();
        let b = store.get_or_create(Uuid::new_v4()).await.unwrap();
        assert_ne!(a.id, b.id);
    }

    #[tokio::test]
    async fn test_update_unknown_resume_is_not_found() {
        let store = InMemoryResumeStore::new();
        let id = Uuid::new_v4();
        let err = store.update(id, name_patch("x")).await.unwrap_err();
        assert!(matches!(err, StoreError::NotFound(missing) if missing == id));
        let err = store
            .update_template(id, TemplateId::Modern)
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_updates_append_versions_in_order() {
        let store = InMemoryResumeStore::new();
        let doc = store.get_or_create(Uuid::new_v4()).await.unwrap();
        let mut last = doc.clone();
        for name in ["one", "two", "three"] {
            last = store.update(doc.id, name_patch(name)).await.unwrap();
        }
        let numbers: Vec<i32> = last.versions.iter().map(|v| v.version_number).collect();
        assert_eq!(numbers, vec![1, 2, 3]);
        assert_eq!(last.versions[2].content, last.content);

        let reread = store.find_by_id(doc.id).await.unwrap();
        assert_eq!(reread, last);
    }

    #[tokio::test]
    async fn test_template_update_keeps_history() {
        let store = InMemoryResumeStore::new();
        let doc = store.get_or_create(Uuid::new_v4()).await.unwrap();
        store.update(doc.id, name_patch("Ada")).await.unwrap();
        let updated = store
            .update_template(doc.id, TemplateId::Modern)
            .await
            .unwrap();
        assert_eq!(updated.template, TemplateId::Modern);
        assert_eq!(updated.versions.len(), 1);
        assert!(updated.metadata.last_updated >= doc.metadata.last_updated);
    }
}
