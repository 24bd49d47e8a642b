use std::path::PathBuf;

use tracing::{info, warn};
use uuid::Uuid;

use crate::capture::{load_stylesheet, CaptureError, PdfCapture};
use crate::models::content::ResumeContent;
use crate::models::resume::{FileUrls, TemplateId};
use crate::render::{render_html, render_latex, render_page};
use crate::store::{ResumeStore, StoreError};

/// Where generated PDFs go and which stylesheet the printed page uses.
#[derive(Debug, Clone)]
pub struct ArtifactSettings {
    pub output_dir: PathBuf,
    pub stylesheet_path: PathBuf,
}

impl ArtifactSettings {
    pub fn output_path(&self, resume_id: Uuid) -> PathBuf {
        self.output_dir.join(format!("{resume_id}.pdf"))
    }
}

/// Public URL of a resume's PDF. Stable across regenerations.
pub fn pdf_url_for(resume_id: Uuid) -> String {
    format!("/resumes/{resume_id}.pdf")
}

/// Result of one generation run. The LaTeX source is always present; the PDF
/// half can fail on its own.
#[derive(Debug)]
pub struct ArtifactOutcome {
    pub template: TemplateId,
    pub latex_source: String,
    pub pdf: Result<String, CaptureError>,
}

/// Renders LaTeX and HTML for a resume, then captures the HTML to PDF.
///
/// Only a missing resume (or an unavailable store) fails the whole call.
/// Capture failures come back inside `ArtifactOutcome::pdf`.
pub async fn generate_artifact(
    store: &dyn ResumeStore,
    capture: &dyn PdfCapture,
    settings: &ArtifactSettings,
    resume_id: Uuid,
    template_override: Option<&str>,
) -> Result<ArtifactOutcome, StoreError> {
    let doc = store.find_by_id(resume_id).await?;
    let template = template_override
        .map(TemplateId::from_name_or_default)
        .unwrap_or(doc.template);

    info!("Generating artifacts for resume {resume_id} (template: {template})");

    let latex_source = render_latex(&doc.content, template);
    let pdf = capture_pdf(capture, settings, &doc.content, template, resume_id).await;

    let pdf = match pdf {
        Ok(url) => {
            let file_urls = FileUrls {
                pdf: Some(url.clone()),
                ..doc.file_urls.clone()
            };
            // The PDF is already published; a failed bookkeeping write only
            // leaves fileUrls stale.
            if let Err(e) = store.record_file_urls(resume_id, file_urls).await {
                warn!("Could not record PDF location for resume {resume_id}: {e}");
            }
            Ok(url)
        }
        Err(e) => {
            warn!(
                "PDF capture failed for resume {resume_id}: {}",
                e.detailed_message()
            );
            Err(e)
        }
    };

    Ok(ArtifactOutcome {
        template,
        latex_source,
        pdf,
    })
}

async fn capture_pdf(
    capture: &dyn PdfCapture,
    settings: &ArtifactSettings,
    content: &ResumeContent,
    template: TemplateId,
    resume_id: Uuid,
) -> Result<String, CaptureError> {
    let stylesheet = load_stylesheet(&settings.stylesheet_path).await?;
    let fragment = render_html(content, template);
    let page = render_page(content, template, &fragment, Some(&stylesheet));

    capture
        .capture(&page, &settings.output_path(resume_id))
        .await?;
    Ok(pdf_url_for(resume_id))
}

/// Full HTML preview page. A missing stylesheet degrades to an unstyled page.
pub async fn preview_page(
    store: &dyn ResumeStore,
    settings: &ArtifactSettings,
    resume_id: Uuid,
    template_override: Option<&str>,
) -> Result<String, StoreError> {
    let doc = store.find_by_id(resume_id).await?;
    let template = template_override
        .map(TemplateId::from_name_or_default)
        .unwrap_or(doc.template);

    let stylesheet = match load_stylesheet(&settings.stylesheet_path).await {
        Ok(css) => Some(css),
        Err(e) => {
            warn!("Preview without stylesheet: {}", e.detailed_message());
            None
        }
    };

    let fragment = render_html(&doc.content, template);
    Ok(render_page(
        &doc.content,
        template,
        &fragment,
        stylesheet.as_deref(),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::capture::stub::{FailingCapture, WritingCapture};
    use crate::models::content::{Basics, ContentPatch, ResumePatch};
    use crate::store::InMemoryResumeStore;
    use std::sync::atomic::Ordering;
    use tempfile::TempDir;

    async fn settings_in(dir: &TempDir) -> ArtifactSettings {
        let stylesheet_path = dir.path().join("template-styles.css");
        tokio::fs::write(&stylesheet_path, ".resume { color: #111; }")
            .await
            .unwrap();
        ArtifactSettings {
            output_dir: dir.path().join("resumes"),
            stylesheet_path,
        }
    }

    async fn seeded_store() -> (InMemoryResumeStore, Uuid) {
        let store = InMemoryResumeStore::new();
        let doc = store.get_or_create(Uuid::new_v4()).await.unwrap();
        let patch = ResumePatch {
            content: ContentPatch {
                basics: Some(Basics {
                    name: "Ada Lovelace".into(),
                    email: "ada@x.com".into(),
                    ..Basics::default()
                }),
                ..ContentPatch::default()
            },
            ..ResumePatch::default()
        };
        store.update(doc.id, patch).await.unwrap();
        (store, doc.id)
    }

    #[test]
    fn test_pdf_url_is_derived_from_id() {
        let id = Uuid::new_v4();
        assert_eq!(pdf_url_for(id), format!("/resumes/{id}.pdf"));
    }

    #[tokio::test]
    async fn test_generate_writes_pdf_and_records_url() {
        let dir = tempfile::tempdir().unwrap();
        let settings = settings_in(&dir).await;
        let (store, id) = seeded_store().await;
        let capture = WritingCapture::default();

        let outcome = generate_artifact(&store, &capture, &settings, id, None)
            .await
            .unwrap();

        assert_eq!(outcome.pdf.as_deref().unwrap(), pdf_url_for(id));
        assert!(outcome.latex_source.contains("Ada Lovelace"));
        assert!(settings.output_path(id).exists());
        assert_eq!(capture.calls.load(Ordering::SeqCst), 1);

        let stored = store.find_by_id(id).await.unwrap();
        assert_eq!(stored.file_urls.pdf.as_deref(), Some(pdf_url_for(id).as_str()));
        // Recording the artifact is not a content change.
        assert_eq!(stored.versions.len(), 1);
    }

    #[tokio::test]
    async fn test_capture_failure_keeps_latex() {
        let dir = tempfile::tempdir().unwrap();
        let settings = settings_in(&dir).await;
        let (store, id) = seeded_store().await;

        let outcome = generate_artifact(&store, &FailingCapture, &settings, id, None)
            .await
            .unwrap();

        let doc = store.find_by_id(id).await.unwrap();
        assert_eq!(outcome.latex_source, render_latex(&doc.content, doc.template));
        assert!(matches!(outcome.pdf, Err(CaptureError::MissingOutput)));
        assert!(doc.file_urls.pdf.is_none());
    }

    #[tokio::test]
    async fn test_missing_stylesheet_is_a_capture_failure() {
        let dir = tempfile::tempdir().unwrap();
        let settings = ArtifactSettings {
            output_dir: dir.path().join("resumes"),
            stylesheet_path: dir.path().join("nope.css"),
        };
        let (store, id) = seeded_store().await;
        let capture = WritingCapture::default();

        let outcome = generate_artifact(&store, &capture, &settings, id, None)
            .await
            .unwrap();

        assert!(matches!(outcome.pdf, Err(CaptureError::Stylesheet { .. })));
        assert_eq!(capture.calls.load(Ordering::SeqCst), 0);
        assert!(!outcome.latex_source.is_empty());
    }

    #[tokio::test]
    async fn test_template_override_falls_back_to_classic() {
        let dir = tempfile::tempdir().unwrap();
        let settings = settings_in(&dir).await;
        let (store, id) = seeded_store().await;

        let modern = generate_artifact(&store, &FailingCapture, &settings, id, Some("modern"))
            .await
            .unwrap();
        assert_eq!(modern.template, TemplateId::Modern);

        let unknown = generate_artifact(&store, &FailingCapture, &settings, id, Some("glossy"))
            .await
            .unwrap();
        assert_eq!(unknown.template, TemplateId::Classic);
    }

    #[tokio::test]
    async fn test_generate_unknown_resume_is_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let settings = settings_in(&dir).await;
        let store = InMemoryResumeStore::new();

        let err = generate_artifact(&store, &FailingCapture, &settings, Uuid::new_v4(), None)
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_preview_without_stylesheet_still_renders() {
        let dir = tempfile::tempdir().unwrap();
        let settings = ArtifactSettings {
            output_dir: dir.path().join("resumes"),
            stylesheet_path: dir.path().join("missing.css"),
        };
        let (store, id) = seeded_store().await;

        let page = preview_page(&store, &settings, id, Some("minimal"))
            .await
            .unwrap();
        assert!(page.contains("<!DOCTYPE html>"));
        assert!(page.contains("template-minimal"));
        assert!(page.contains("Ada Lovelace"));
        assert!(!page.contains("<style>"));
    }
}
