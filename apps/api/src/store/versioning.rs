//! Mutation rules shared by every `ResumeStore` backend.
//!
//! CRITICAL: `versions` is append-only. Nothing in this module edits or removes
//! an existing entry; a content change pushes exactly one new snapshot.

use chrono::{DateTime, Utc};

use crate::models::content::ResumePatch;
use crate::models::resume::{FileUrls, ResumeDocument, ResumeVersion, TemplateId};

pub const AUTO_VERSION_NOTE: &str = "Automatic version created on content update";

/// `max(versionNumber) + 1`, or 1 for an empty history.
pub fn next_version_number(versions: &[ResumeVersion]) -> i32 {
    versions
        .iter()
        .map(|v| v.version_number)
        .max()
        .unwrap_or(0)
        + 1
}

/// Snapshots the document's current content and appends it to the history.
pub fn append_version(doc: &mut ResumeDocument, now: DateTime<Utc>) -> ResumeVersion {
    let version = ResumeVersion {
        version_number: next_version_number(&doc.versions),
        created_at: now,
        content: doc.content.clone(),
        file_urls: doc.file_urls.clone(),
        notes: AUTO_VERSION_NOTE.to_string(),
    };
    doc.versions.push(version.clone());
    version
}

/// Refreshes the write timestamps. Called on every write, content or not.
pub fn touch(doc: &mut ResumeDocument, now: DateTime<Utc>) {
    doc.metadata.last_updated = now;
    doc.updated_at = now;
}

/// Applies an update request to `doc`.
///
/// Returns the appended version when the patch carried content fields; patches
/// that only touch `title`/`metadata` leave the history alone.
pub fn apply_update(
    doc: &mut ResumeDocument,
    patch: ResumePatch,
    now: DateTime<Utc>,
) -> Option<ResumeVersion> {
    let ResumePatch {
        title,
        metadata,
        content,
    } = patch;

    if let Some(title) = title {
        doc.title = title.trim().to_string();
    }
    if let Some(metadata) = metadata {
        if let Some(target_position) = metadata.target_position {
            doc.metadata.target_position = target_position;
        }
        if let Some(target_company) = metadata.target_company {
            doc.metadata.target_company = target_company;
        }
        if let Some(custom_tags) = metadata.custom_tags {
            doc.metadata.custom_tags = custom_tags;
        }
    }

    let appended = if content.is_empty() {
        None
    } else {
        content.apply_to(&mut doc.content);
        Some(append_version(doc, now))
    };

    touch(doc, now);
    appended
}

/// Template is presentation metadata: no version is appended.
pub fn apply_template(doc: &mut ResumeDocument, template: TemplateId, now: DateTime<Utc>) {
    doc.template = template;
    touch(doc, now);
}

pub fn apply_file_urls(doc: &mut ResumeDocument, file_urls: FileUrls, now: DateTime<Utc>) {
    doc.file_urls = file_urls;
    touch(doc, now);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::content::{Basics, ContentPatch, MetadataPatch};
    use chrono::Duration;
    use uuid::Uuid;

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

    #[test]
    fn test_next_version_number_empty() {
        assert_eq!(next_version_number(&[]), 1);
    }

    #[test]
    fn test_versions_are_monotonic_and_match_content() {
        let now = Utc::now();
        let mut doc = ResumeDocument::new_default(Uuid::new_v4(), now);
        for (i, name) in ["A", "B", "C", "D"].iter().enumerate() {
            let v = apply_update(&mut doc, name_patch(name), now).unwrap();
            assert_eq!(v.version_number, i as i32 + 1);
        }
        let numbers: Vec<i32> = doc.versions.iter().map(|v| v.version_number).collect();
        assert_eq!(numbers, vec![1, 2, 3, 4]);
        assert_eq!(doc.versions.last().unwrap().content, doc.content);
        assert_eq!(doc.versions[0].content.basics.name, "A");
        assert_eq!(doc.versions[0].notes, AUTO_VERSION_NOTE);
    }

    #[test]
    fn test_next_version_uses_max_not_len() {
        let now = Utc::now();
        let mut doc = ResumeDocument::new_default(Uuid::new_v4(), now);
        append_version(&mut doc, now);
        doc.versions[0].version_number = 7;
        assert_eq!(append_version(&mut doc, now).version_number, 8);
    }

    #[test]
    fn test_metadata_only_patch_appends_nothing_but_touches() {
        let created = Utc::now() - Duration::hours(1);
        let mut doc = ResumeDocument::new_default(Uuid::new_v4(), created);
        let now = Utc::now();
        let patch = ResumePatch {
            title: Some("  Platform CV ".into()),
            metadata: Some(MetadataPatch {
                target_company: Some("ACME".into()),
                ..Default::default()
            }),
            ..Default::default()
        };
        assert!(apply_update(&mut doc, patch, now).is_none());
        assert!(doc.versions.is_empty());
        assert_eq!(doc.title, "Platform CV");
        assert_eq!(doc.metadata.target_company, "ACME");
        assert_eq!(doc.metadata.last_updated, now);
    }

    #[test]
    fn test_template_change_does_not_version() {
        let now = Utc::now();
        let mut doc = ResumeDocument::new_default(Uuid::new_v4(), now);
        apply_template(&mut doc, TemplateId::Minimal, now);
        assert_eq!(doc.template, TemplateId::Minimal);
        assert!(doc.versions.is_empty());
    }

    #[test]
    fn test_snapshot_carries_file_urls() {
        let now = Utc::now();
        let mut doc = ResumeDocument::new_default(Uuid::new_v4(), now);
        apply_file_urls(
            &mut doc,
            FileUrls {
                pdf: Some("/resumes/x.pdf".into()),
                docx: None,
            },
            now,
        );
        let v = apply_update(&mut doc, name_patch("Ada"), now).unwrap();
        assert_eq!(v.file_urls.pdf.as_deref(), Some("/resumes/x.pdf"));
    }
}
