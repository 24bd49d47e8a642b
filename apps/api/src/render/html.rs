//! HTML rendering: the fragment used for the builder preview and the PDF page.
//!
//! Section order: header/contact → summary → education → experience → skills,
//! followed by projects, certifications and languages. Empty sections are omitted.

use crate::models::content::{
    Basics, Certification, EducationEntry, LanguageEntry, ProjectEntry, ResumeContent,
    SkillGroup, WorkExperienceEntry,
};
use crate::models::resume::TemplateId;
use crate::render::escape::{escape_html as esc, safe_link};
use crate::render::format::{date_range, format_date};

const DATE_SEPARATOR: &str = " - ";
pub const PLACEHOLDER_NAME: &str = "Your Name";

/// Renders `content` as an HTML fragment wrapped in a `template-*` container.
/// Pure and deterministic; every user string is escaped.
pub fn render_html(content: &ResumeContent, template: TemplateId) -> String {
    let mut html = format!("<div class=\"resume template-{template}\">\n");
    render_header(&mut html, &content.basics);

    let summary = content.basics.summary.trim();
    if !summary.is_empty() {
        open_section(&mut html, "summary", "Professional Summary");
        html.push_str(&format!(
            "    <div class=\"summary\"><p>{}</p></div>\n",
            esc(summary)
        ));
        close_section(&mut html);
    }

    if !content.education.is_empty() {
        open_section(&mut html, "education", "Education");
        content
            .education
            .iter()
            .for_each(|e| render_education(&mut html, e));
        close_section(&mut html);
    }

    if !content.work_experience.is_empty() {
        open_section(&mut html, "experience", "Experience");
        content
            .work_experience
            .iter()
            .for_each(|e| render_experience(&mut html, e));
        close_section(&mut html);
    }

    if !content.skills.is_empty() {
        open_section(&mut html, "skills", "Skills");
        html.push_str("    <div class=\"skills-grid\">\n");
        content
            .skills
            .iter()
            .for_each(|s| render_skill(&mut html, s));
        html.push_str("    </div>\n");
        close_section(&mut html);
    }

    if !content.projects.is_empty() {
        open_section(&mut html, "projects", "Projects");
        content
            .projects
            .iter()
            .for_each(|p| render_project(&mut html, p));
        close_section(&mut html);
    }

    if !content.certifications.is_empty() {
        open_section(&mut html, "certifications", "Certifications");
        html.push_str("    <ul class=\"certifications\">\n");
        content
            .certifications
            .iter()
            .for_each(|c| render_certification(&mut html, c));
        html.push_str("    </ul>\n");
        close_section(&mut html);
    }

    if !content.languages.is_empty() {
        open_section(&mut html, "languages", "Languages");
        html.push_str("    <ul class=\"languages\">\n");
        content
            .languages
            .iter()
            .for_each(|l| render_language(&mut html, l));
        html.push_str("    </ul>\n");
        close_section(&mut html);
    }

    html.push_str("</div>\n");
    html
}

fn open_section(html: &mut String, class: &str, title: &str) {
    html.push_str(&format!(
        "  <div class=\"section {class}\">\n    <h2>{title}</h2>\n"
    ));
}

fn close_section(html: &mut String) {
    html.push_str("  </div>\n");
}

fn render_header(html: &mut String, basics: &Basics) {
    let name = match basics.name.trim() {
        "" => PLACEHOLDER_NAME,
        name => name,
    };
    html.push_str("  <div class=\"header\">\n");
    html.push_str(&format!("    <h1>{}</h1>\n", esc(name)));

    let mut contact = Vec::new();
    for (label, value) in [
        ("Email", &basics.email),
        ("Phone", &basics.phone),
        ("Location", &basics.location),
        ("Website", &basics.website),
    ] {
        if !value.trim().is_empty() {
            contact.push(format!("<p>{label}: {}</p>", esc(value.trim())));
        }
    }
    for profile in basics.profiles.iter().filter(|p| !p.url.trim().is_empty()) {
        let label = match profile.network.trim() {
            "" => profile.url.trim(),
            network => network,
        };
        contact.push(format!(
            "<p class=\"profile\">{}</p>",
            link(&profile.url, label)
        ));
    }
    if !contact.is_empty() {
        html.push_str("    <div class=\"contact-info\">\n");
        for line in contact {
            html.push_str(&format!("      {line}\n"));
        }
        html.push_str("    </div>\n");
    }
    html.push_str("  </div>\n");
}

fn item_header(html: &mut String, title_class: &str, title: &str, dates: &str) {
    html.push_str("    <div class=\"item-header\">\n");
    html.push_str(&format!(
        "      <span class=\"{title_class}\">{}</span>\n",
        esc(title)
    ));
    if !dates.is_empty() {
        html.push_str(&format!("      <span class=\"date\">{}</span>\n", esc(dates)));
    }
    html.push_str("    </div>\n");
}

fn bullet_list(html: &mut String, class: &str, items: &[String]) {
    let items: Vec<&str> = items
        .iter()
        .map(|s| s.trim())
        .filter(|s| !s.is_empty())
        .collect();
    if items.is_empty() {
        return;
    }
    html.push_str(&format!("    <ul class=\"{class}\">\n"));
    for item in items {
        html.push_str(&format!("      <li>{}</li>\n", esc(item)));
    }
    html.push_str("    </ul>\n");
}

fn render_education(html: &mut String, edu: &EducationEntry) {
    html.push_str("  <div class=\"item\">\n");
    let dates = date_range(&edu.start_date, &edu.end_date, false, DATE_SEPARATOR);
    item_header(html, "institution", &edu.institution, &dates);

    let mut details = edu.degree.trim().to_string();
    if !edu.field.trim().is_empty() {
        if !details.is_empty() {
            details.push_str(", ");
        }
        details.push_str(edu.field.trim());
    }
    if !edu.gpa.trim().is_empty() {
        if !details.is_empty() {
            details.push(' ');
        }
        details.push_str(&format!("(GPA: {})", edu.gpa.trim()));
    }
    if !details.is_empty() {
        html.push_str(&format!("    <div class=\"details\">{}</div>\n", esc(&details)));
    }
    bullet_list(html, "achievements", &edu.achievements);
    html.push_str("  </div>\n");
}

fn render_experience(html: &mut String, exp: &WorkExperienceEntry) {
    html.push_str("  <div class=\"item\">\n");
    let dates = date_range(&exp.start_date, &exp.end_date, exp.current, DATE_SEPARATOR);
    item_header(html, "company", &exp.company, &dates);

    let mut position = exp.position.trim().to_string();
    if !exp.location.trim().is_empty() {
        if !position.is_empty() {
            position.push_str(" - ");
        }
        position.push_str(exp.location.trim());
    }
    if !position.is_empty() {
        html.push_str(&format!("    <div class=\"position\">{}</div>\n", esc(&position)));
    }
    if !exp.summary.trim().is_empty() {
        html.push_str(&format!(
            "    <p class=\"summary\">{}</p>\n",
            esc(exp.summary.trim())
        ));
    }
    bullet_list(html, "highlights", &exp.highlights);
    html.push_str("  </div>\n");
}

fn render_skill(html: &mut String, skill: &SkillGroup) {
    html.push_str("      <div class=\"skill-item\">\n");
    html.push_str(&format!(
        "        <strong class=\"category\">{}:</strong>\n",
        esc(skill.category.trim())
    ));
    html.push_str(&format!(
        "        <span class=\"items\">{}</span>\n",
        esc(&skill.items.join(", "))
    ));
    html.push_str("      </div>\n");
}

/// An anchor for safe schemes, plain text otherwise.
fn link(raw_url: &str, text: &str) -> String {
    match safe_link(raw_url) {
        Some(url) => format!("<a href=\"{}\">{}</a>", esc(url.as_str()), esc(text)),
        None => esc(text),
    }
}

fn render_project(html: &mut String, project: &ProjectEntry) {
    html.push_str("  <div class=\"item\">\n");
    let dates = date_range(&project.start_date, &project.end_date, false, DATE_SEPARATOR);
    item_header(html, "project", &project.name, &dates);
    if !project.url.trim().is_empty() {
        html.push_str(&format!(
            "    <div class=\"link\">{}</div>\n",
            link(&project.url, project.url.trim())
        ));
    }
    if !project.description.trim().is_empty() {
        html.push_str(&format!(
            "    <p class=\"summary\">{}</p>\n",
            esc(project.description.trim())
        ));
    }
    bullet_list(html, "highlights", &project.highlights);
    if !project.technologies.is_empty() {
        html.push_str(&format!(
            "    <div class=\"technologies\">Technologies: {}</div>\n",
            esc(&project.technologies.join(", "))
        ));
    }
    html.push_str("  </div>\n");
}

fn render_certification(html: &mut String, cert: &Certification) {
    let mut line = esc(cert.name.trim());
    if !cert.issuer.trim().is_empty() {
        line.push_str(&format!(" &mdash; {}", esc(cert.issuer.trim())));
    }
    let date = format_date(&cert.date);
    if !date.is_empty() {
        line.push_str(&format!(" <span class=\"date\">{date}</span>"));
    }
    html.push_str(&format!("      <li>{line}</li>\n"));
}

fn render_language(html: &mut String, lang: &LanguageEntry) {
    let mut line = esc(lang.name.trim());
    if !lang.proficiency.trim().is_empty() {
        line.push_str(&format!(" ({})", esc(lang.proficiency.trim())));
    }
    html.push_str(&format!("      <li>{line}</li>\n"));
}
