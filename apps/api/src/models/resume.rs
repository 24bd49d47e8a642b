use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::types::Json;
use sqlx::FromRow;
use thiserror::Error;
use uuid::Uuid;

use crate::models::content::ResumeContent;

pub const DEFAULT_TITLE: &str = "My Resume";

/// Visual/structural style applied across HTML, LaTeX and PDF output.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TemplateId {
    #[default]
    Classic,
    Modern,
    Minimal,
}

#[derive(Debug, Error)]
#[error("unknown template '{0}', expected one of: classic, modern, minimal")]
pub struct UnknownTemplate(pub String);

impl TemplateId {
    pub fn as_str(&self) -> &'static str {
        match self {
            TemplateId::Classic => "classic",
            TemplateId::Modern => "modern",
            TemplateId::Minimal => "minimal",
        }
    }

    /// Lenient lookup for render paths: unknown ids fall back to classic.
    pub fn from_name_or_default(name: &str) -> Self {
        name.parse().unwrap_or_default()
    }
}

impl FromStr for TemplateId {
    type Err = UnknownTemplate;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "classic" => Ok(TemplateId::Classic),
            "modern" => Ok(TemplateId::Modern),
            "minimal" => Ok(TemplateId::Minimal),
            _ => Err(UnknownTemplate(s.to_string())),
        }
    }
}

impl fmt::Display for TemplateId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Last-known locations of generated files.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct FileUrls {
    pub pdf: Option<String>,
    pub docx: Option<String>,
}

/// Immutable snapshot of `content` taken when a content update succeeds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResumeVersion {
    pub version_number: i32,
    pub created_at: DateTime<Utc>,
    pub content: ResumeContent,
    pub file_urls: FileUrls,
    pub notes: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResumeMetadata {
    pub last_updated: DateTime<Utc>,
    #[serde(default)]
    pub target_position: String,
    #[serde(default)]
    pub target_company: String,
    #[serde(default)]
    pub custom_tags: Vec<String>,
}

impl ResumeMetadata {
    pub fn new(now: DateTime<Utc>) -> Self {
        Self {
            last_updated: now,
            target_position: String::new(),
            target_company: String::new(),
            custom_tags: Vec::new(),
        }
    }
}

/// A persisted resume: content plus its append-only version history.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResumeDocument {
    pub id: Uuid,
    pub user_id: Uuid,
    pub title: String,
    pub is_default: bool,
    pub template: TemplateId,
    pub content: ResumeContent,
    pub file_urls: FileUrls,
    pub versions: Vec<ResumeVersion>,
    pub metadata: ResumeMetadata,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl ResumeDocument {
    /// The document handed out the first time a user asks for their resume.
    pub fn new_default(user_id: Uuid, now: DateTime<Utc>) -> Self {
        Self {
            id: Uuid::new_v4(),
            user_id,
            title: DEFAULT_TITLE.to_string(),
            is_default: true,
            template: TemplateId::default(),
            content: ResumeContent::default(),
            file_urls: FileUrls::default(),
            versions: Vec::new(),
            metadata: ResumeMetadata::new(now),
            created_at: now,
            updated_at: now,
        }
    }

    pub fn version(&self, version_number: i32) -> Option<&ResumeVersion> {
        self.versions
            .iter()
            .find(|v| v.version_number == version_number)
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Postgres rows
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, FromRow)]
pub struct ResumeRow {
    pub id: Uuid,
    pub user_id: Uuid,
    pub title: String,
    pub is_default: bool,
    pub template: String,
    pub content: Json<ResumeContent>,
    pub file_urls: Json<FileUrls>,
    pub metadata: Json<ResumeMetadata>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// One `resume_versions` row; the key columns are implied by the query.
#[derive(Debug, Clone, FromRow)]
pub struct ResumeVersionRow {
    pub version_number: i32,
    pub content: Json<ResumeContent>,
    pub file_urls: Json<FileUrls>,
    pub notes: String,
    pub created_at: DateTime<Utc>,
}

impl From<ResumeVersionRow> for ResumeVersion {
    fn from(row: ResumeVersionRow) -> Self {
        ResumeVersion {
            version_number: row.version_number,
            created_at: row.created_at,
            content: row.content.0,
            file_urls: row.file_urls.0,
            notes: row.notes,
        }
    }
}

impl ResumeRow {
    pub fn into_document(
        self,
        versions: Vec<ResumeVersion>,
    ) -> Result<ResumeDocument, UnknownTemplate> {
        let template = self.template.parse::<TemplateId>()?;
        Ok(ResumeDocument {
            id: self.id,
            user_id: self.user_id,
            title: self.title,
            is_default: self.is_default,
            template,
            content: self.content.0,
            file_urls: self.file_urls.0,
            versions,
            metadata: self.metadata.0,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_template_parse_is_case_insensitive() {
        assert_eq!("Modern".parse::<TemplateId>().unwrap(), TemplateId::Modern);
        assert_eq!(" minimal ".parse::<TemplateId>().unwrap(), TemplateId::Minimal);
    }

    #[test]
    fn test_template_unknown_is_rejected_by_strict_parse() {
        assert!("fancy".parse::<TemplateId>().is_err());
    }

    #[test]
    fn test_template_unknown_falls_back_to_classic() {
        assert_eq!(TemplateId::from_name_or_default("fancy"), TemplateId::Classic);
        assert_eq!(TemplateId::from_name_or_default(""), TemplateId::Classic);
    }

    #[test]
    fn test_default_document_shape() {
        let user_id = Uuid::new_v4();
        let doc = ResumeDocument::new_default(user_id, Utc::now());
        assert_eq!(doc.user_id, user_id);
        assert_eq!(doc.title, "My Resume");
        assert!(doc.is_default);
        assert_eq!(doc.template, TemplateId::Classic);
        assert!(doc.versions.is_empty());
        assert_eq!(doc.content, ResumeContent::default());
    }

    #[test]
    fn test_document_serializes_camel_case() {
        let doc = ResumeDocument::new_default(Uuid::new_v4(), Utc::now());
        let value = serde_json::to_value(&doc).unwrap();
        assert_eq!(value["template"], json!("classic"));
        assert_eq!(value["isDefault"], json!(true));
        assert!(value["content"]["workExperience"].is_array());
        assert!(value["metadata"]["lastUpdated"].is_string());
        assert_eq!(value["fileUrls"]["pdf"], json!(null));
    }

    #[test]
    fn test_version_row_maps_to_snapshot() {
        let created_at = Utc::now();
        let row = ResumeVersionRow {
            version_number: 3,
            content: Json(ResumeContent::default()),
            file_urls: Json(FileUrls {
                pdf: Some("/resumes/a.pdf".into()),
                ..Default::default()
            }),
            notes: "Content updated".into(),
            created_at,
        };
        let version = ResumeVersion::from(row);
        assert_eq!(version.version_number, 3);
        assert_eq!(version.created_at, created_at);
        assert_eq!(version.file_urls.pdf.as_deref(), Some("/resumes/a.pdf"));
        assert_eq!(version.notes, "Content updated");
    }
}
