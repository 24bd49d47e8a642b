//! Axum route handlers for the Resume API.

use axum::{
    body::Bytes,
    extract::{Path, Query, State},
    response::Html,
    Json,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::content::ResumePatch;
use crate::models::resume::{ResumeDocument, ResumeVersion, TemplateId};
use crate::resume::service::{generate_artifact, preview_page};
use crate::resume::validation::{validate_patch, validate_template};
use crate::state::AppState;
use crate::store::StoreError;

// ────────────────────────────────────────────────────────────────────────────
// Request / Response types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct UpdateTemplateRequest {
    pub template: String,
}

#[derive(Debug, Default, Deserialize)]
pub struct GenerateRequest {
    pub template: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct PreviewQuery {
    pub template: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct PdfError {
    pub code: &'static str,
    pub message: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateArtifactResponse {
    pub latex_source: String,
    /// Template actually used, after override and fallback.
    pub template: TemplateId,
    /// `null` when the PDF could not be produced; see `pdf_error`.
    pub pdf_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pdf_error: Option<PdfError>,
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// GET /api/v1/users/:user_id/resume
///
/// Returns the user's resume, creating an empty default one on first access.
/// Never 404s.
pub async fn handle_get_resume(
    State(state): State<AppState>,
    Path(user_id): Path<Uuid>,
) -> Result<Json<ResumeDocument>, AppError> {
    let doc = state.store.get_or_create(user_id).await?;
    Ok(Json(doc))
}

/// GET /api/v1/resumes/:id
pub async fn handle_get_resume_by_id(
    State(state): State<AppState>,
    Path(resume_id): Path<Uuid>,
) -> Result<Json<ResumeDocument>, AppError> {
    let doc = state.store.find_by_id(resume_id).await?;
    Ok(Json(doc))
}

/// PUT /api/v1/resumes/:id
///
/// Present fields replace stored ones wholesale. A content change appends a version.
pub async fn handle_update_resume(
    State(state): State<AppState>,
    Path(resume_id): Path<Uuid>,
    Json(patch): Json<ResumePatch>,
) -> Result<Json<ResumeDocument>, AppError> {
    validate_patch(&patch)?;
    let doc = state.store.update(resume_id, patch).await?;
    Ok(Json(doc))
}

/// PUT /api/v1/resumes/:id/template
pub async fn handle_update_template(
    State(state): State<AppState>,
    Path(resume_id): Path<Uuid>,
    Json(request): Json<UpdateTemplateRequest>,
) -> Result<Json<ResumeDocument>, AppError> {
    let template = validate_template(&request.template)?;
    let doc = state.store.update_template(resume_id, template).await?;
    Ok(Json(doc))
}

/// POST /api/v1/resumes/:id/latex
///
/// Returns the LaTeX source and the PDF URL. When only the PDF step fails the
/// response is still 200, with `pdfUrl: null` and a `pdfError`.
///
/// The body is optional; an empty body uses the stored template.
pub async fn handle_generate_artifact(
    State(state): State<AppState>,
    Path(resume_id): Path<Uuid>,
    body: Bytes,
) -> Result<Json<GenerateArtifactResponse>, AppError> {
    let request = parse_generate_request(&body)?;

    let outcome = generate_artifact(
        state.store.as_ref(),
        state.capture.as_ref(),
        &state.artifacts,
        resume_id,
        request.template.as_deref(),
    )
    .await?;

    let (pdf_url, pdf_error) = match outcome.pdf {
        Ok(url) => (Some(url), None),
        Err(e) => {
            let failure = AppError::GenerationFailed(e.detailed_message());
            (
                None,
                Some(PdfError {
                    code: failure.code(),
                    message: failure.to_string(),
                }),
            )
        }
    };

    Ok(Json(GenerateArtifactResponse {
        latex_source: outcome.latex_source,
        template: outcome.template,
        pdf_url,
        pdf_error,
    }))
}

fn parse_generate_request(body: &[u8]) -> Result<GenerateRequest, AppError> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(GenerateRequest::default());
    }
    serde_json::from_slice(body)
        .map_err(|e| AppError::Validation(format!("Invalid request body: {e}")))
}

/// GET /api/v1/resumes/:id/preview?template=modern
pub async fn handle_preview(
    State(state): State<AppState>,
    Path(resume_id): Path<Uuid>,
    Query(query): Query<PreviewQuery>,
) -> Result<Html<String>, AppError> {
    let page = preview_page(
        state.store.as_ref(),
        &state.artifacts,
        resume_id,
        query.template.as_deref(),
    )
    .await?;
    Ok(Html(page))
}

/// GET /api/v1/resumes/:id/versions
pub async fn handle_list_versions(
    State(state): State<AppState>,
    Path(resume_id): Path<Uuid>,
) -> Result<Json<Vec<ResumeVersion>>, AppError> {
    let doc = state.store.find_by_id(resume_id).await?;
    Ok(Json(doc.versions))
}

/// GET /api/v1/resumes/:id/versions/:n
pub async fn handle_get_version(
    State(state): State<AppState>,
    Path((resume_id, version)): Path<(Uuid, i32)>,
) -> Result<Json<ResumeVersion>, AppError> {
    if version < 1 {
        return Err(AppError::Validation(
            "Version numbers start at 1".to_string(),
        ));
    }
    let doc = state.store.find_by_id(resume_id).await?;
    let snapshot = doc
        .version(version)
        .cloned()
        .ok_or(StoreError::VersionNotFound { resume_id, version })?;
    Ok(Json(snapshot))
}
