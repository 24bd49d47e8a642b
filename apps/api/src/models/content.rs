use serde::{Deserialize, Serialize};

/// External profile link shown in the resume header (GitHub, LinkedIn, ...).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Profile {
    pub network: String,
    pub url: String,
    pub username: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Basics {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub location: String,
    pub summary: String,
    pub website: String,
    pub profiles: Vec<Profile>,
}

/// Dates are kept as the strings the client sent (`YYYY-MM-DD`, `YYYY-MM` or RFC 3339).
/// An empty string means "not set".
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct EducationEntry {
    pub institution: String,
    pub degree: String,
    pub field: String,
    pub start_date: String,
    pub end_date: String,
    pub gpa: String,
    pub courses: Vec<String>,
    pub achievements: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct WorkExperienceEntry {
    pub company: String,
    pub position: String,
    pub location: String,
    pub start_date: String,
    pub end_date: String,
    /// In-progress role. Renders its end date as "Present" regardless of `end_date`.
    pub current: bool,
    pub summary: String,
    pub highlights: Vec<String>,
    pub technologies: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ProjectEntry {
    pub name: String,
    pub description: String,
    pub start_date: String,
    pub end_date: String,
    pub url: String,
    pub technologies: Vec<String>,
    pub highlights: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SkillGroup {
    pub category: String,
    pub items: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Certification {
    pub name: String,
    pub issuer: String,
    pub date: String,
    pub url: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct LanguageEntry {
    pub name: String,
    pub proficiency: String,
}

/// The user-edited body of a resume. Both the HTML preview and the LaTeX/PDF
/// artifacts are derived from this and nothing else.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ResumeContent {
    pub basics: Basics,
    pub education: Vec<EducationEntry>,
    pub work_experience: Vec<WorkExperienceEntry>,
    pub projects: Vec<ProjectEntry>,
    pub skills: Vec<SkillGroup>,
    pub certifications: Vec<Certification>,
    pub languages: Vec<LanguageEntry>,
}

// ────────────────────────────────────────────────────────────────────────────
// Partial updates
// ────────────────────────────────────────────────────────────────────────────

/// Content fields of an update request. A present field replaces the stored
/// field wholesale; arrays are never merged element by element.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContentPatch {
    pub basics: Option<Basics>,
    pub education: Option<Vec<EducationEntry>>,
    pub work_experience: Option<Vec<WorkExperienceEntry>>,
    pub projects: Option<Vec<ProjectEntry>>,
    pub skills: Option<Vec<SkillGroup>>,
    pub certifications: Option<Vec<Certification>>,
    pub languages: Option<Vec<LanguageEntry>>,
}

impl ContentPatch {
    pub fn is_empty(&self) -> bool {
        self.basics.is_none()
            && self.education.is_none()
            && self.work_experience.is_none()
            && self.projects.is_none()
            && self.skills.is_none()
            && self.certifications.is_none()
            && self.languages.is_none()
    }

    pub fn apply_to(self, content: &mut ResumeContent) {
        if let Some(basics) = self.basics {
            content.basics = basics;
        }
        if let Some(education) = self.education {
            content.education = education;
        }
        if let Some(work_experience) = self.work_experience {
            content.work_experience = work_experience;
        }
        if let Some(projects) = self.projects {
            content.projects = projects;
        }
        if let Some(skills) = self.skills {
            content.skills = skills;
        }
        if let Some(certifications) = self.certifications {
            content.certifications = certifications;
        }
        if let Some(languages) = self.languages {
            content.languages = languages;
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MetadataPatch {
    pub target_position: Option<String>,
    pub target_company: Option<String>,
    pub custom_tags: Option<Vec<String>>,
}

/// Body of `PUT /api/v1/resumes/:id`. Content fields sit at the top level next
/// to the optional `title` and `metadata`; unknown fields are ignored.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResumePatch {
    pub title: Option<String>,
    pub metadata: Option<MetadataPatch>,
    #[serde(flatten)]
    pub content: ContentPatch,
}
