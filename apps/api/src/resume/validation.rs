use crate::errors::{AppError, FieldError};
use crate::models::content::{Basics, ContentPatch, ResumePatch};
use crate::models::resume::TemplateId;
use crate::render::format::parse_date;

const REQUIRED: &str = "is required";
const BAD_DATE: &str = "must be a date in YYYY-MM-DD, YYYY-MM or RFC 3339 format";

/// Checks an update request before it reaches the store.
///
/// Collects every failure rather than stopping at the first, so the client can
/// fix the whole form in one round trip:
/// - `title`, when sent, must not be blank
/// - `basics.email`, when non-empty, must look like `local@domain`
/// - identifying fields of list entries (company, institution, name, ...) are required
/// - non-empty dates must parse
pub fn validate_patch(patch: &ResumePatch) -> Result<(), AppError> {
    let mut errors = Vec::new();

    if let Some(title) = &patch.title {
        if title.trim().is_empty() {
            errors.push(FieldError::new("title", "must not be blank"));
        }
    }

    check_content(&patch.content, &mut errors);

    if errors.is_empty() {
        Ok(())
    } else {
        Err(AppError::ValidationFailed(errors))
    }
}

/// Parses a template id from a request body. Unlike rendering, writes do not
/// fall back to classic.
pub fn validate_template(raw: &str) -> Result<TemplateId, AppError> {
    raw.parse::<TemplateId>().map_err(|e| {
        AppError::ValidationFailed(vec![FieldError::new("template", e.to_string())])
    })
}

fn check_content(content: &ContentPatch, errors: &mut Vec<FieldError>) {
    if let Some(basics) = &content.basics {
        check_basics(basics, errors);
    }

    if let Some(education) = &content.education {
        for (i, entry) in education.iter().enumerate() {
            let at = |field: &str| format!("education[{i}].{field}");
            require(&entry.institution, at("institution"), errors);
            check_date(&entry.start_date, at("startDate"), errors);
            check_date(&entry.end_date, at("endDate"), errors);
        }
    }

    if let Some(work) = &content.work_experience {
        for (i, entry) in work.iter().enumerate() {
            let at = |field: &str| format!("workExperience[{i}].{field}");
            require(&entry.company, at("company"), errors);
            require(&entry.position, at("position"), errors);
            check_date(&entry.start_date, at("startDate"), errors);
            check_date(&entry.end_date, at("endDate"), errors);
        }
    }

    if let Some(projects) = &content.projects {
        for (i, entry) in projects.iter().enumerate() {
            let at = |field: &str| format!("projects[{i}].{field}");
            require(&entry.name, at("name"), errors);
            check_date(&entry.start_date, at("startDate"), errors);
            check_date(&entry.end_date, at("endDate"), errors);
        }
    }

    if let Some(skills) = &content.skills {
        for (i, group) in skills.iter().enumerate() {
            require(&group.category, format!("skills[{i}].category"), errors);
        }
    }

    if let Some(certifications) = &content.certifications {
        for (i, cert) in certifications.iter().enumerate() {
            require(&cert.name, format!("certifications[{i}].name"), errors);
            check_date(&cert.date, format!("certifications[{i}].date"), errors);
        }
    }

    if let Some(languages) = &content.languages {
        for (i, language) in languages.iter().enumerate() {
            require(&language.name, format!("languages[{i}].name"), errors);
        }
    }
}

fn check_basics(basics: &Basics, errors: &mut Vec<FieldError>) {
    let email = basics.email.trim();
    if !email.is_empty() && !looks_like_email(email) {
        errors.push(FieldError::new(
            "basics.email",
            "must be an email address like name@example.com",
        ));
    }

    for (i, profile) in basics.profiles.iter().enumerate() {
        require(&profile.url, format!("basics.profiles[{i}].url"), errors);
    }
}

fn looks_like_email(email: &str) -> bool {
    match email.split_once('@') {
        Some((local, domain)) => {
            !local.is_empty()
                && !domain.is_empty()
                && !domain.contains('@')
                && !email.chars().any(char::is_whitespace)
        }
        None => false,
    }
}

fn require(value: &str, field: String, errors: &mut Vec<FieldError>) {
    if value.trim().is_empty() {
        errors.push(FieldError::new(field, REQUIRED));
    }
}

fn check_date(value: &str, field: String, errors: &mut Vec<FieldError>) {
    if !value.trim().is_empty() && parse_date(value).is_none() {
        errors.push(FieldError::new(field, BAD_DATE));
    }
}
