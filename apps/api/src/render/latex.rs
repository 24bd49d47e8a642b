//! LaTeX rendering: same data, order and omission rules as the HTML renderer,
//! emitted as a standalone `article` document.

use crate::models::content::{
    Basics, EducationEntry, ProjectEntry, ResumeContent, WorkExperienceEntry,
};
use crate::models::resume::TemplateId;
use crate::render::escape::{escape_latex as esc, escape_latex_url, safe_link};
use crate::render::format::{date_range, format_date};
use crate::render::html::PLACEHOLDER_NAME;
use crate::render::styles::TemplateStyle;

const DATE_SEPARATOR: &str = " -- ";

const PREAMBLE: &str = r"\documentclass[11pt,a4paper]{article}
\usepackage[utf8]{inputenc}
\usepackage[T1]{fontenc}
\usepackage{hyperref}
\usepackage{geometry}
\usepackage{titlesec}
\usepackage{enumitem}
\usepackage{xcolor}

\geometry{
  a4paper,
  margin=2cm
}
";

pub fn render_latex(content: &ResumeContent, template: TemplateId) -> String {
    let style = TemplateStyle::for_template(template);
    let mut tex = String::from(PREAMBLE);
    tex.push('\n');
    tex.push_str(&style.latex_directives());
    tex.push_str("\n\\begin{document}\n\n");

    render_header(&mut tex, &content.basics);

    let summary = content.basics.summary.trim();
    if !summary.is_empty() {
        tex.push_str("\\section*{Professional Summary}\n");
        tex.push_str(&esc(summary));
        tex.push_str("\n\n");
    }

    if !content.education.is_empty() {
        tex.push_str("\\section*{Education}\n");
        let items: Vec<String> = content.education.iter().map(render_education).collect();
        tex.push_str(&items.join("\n"));
        tex.push('\n');
    }

    if !content.work_experience.is_empty() {
        tex.push_str("\\section*{Experience}\n");
        let items: Vec<String> = content
            .work_experience
            .iter()
            .map(render_experience)
            .collect();
        tex.push_str(&items.join("\n"));
        tex.push('\n');
    }

    if !content.skills.is_empty() {
        tex.push_str("\\section*{Skills}\n");
        let lines: Vec<String> = content
            .skills
            .iter()
            .map(|s| {
                format!(
                    "\\textbf{{{}}}: {}",
                    esc(s.category.trim()),
                    esc(&s.items.join(", "))
                )
            })
            .collect();
        tex.push_str(&lines.join("\\\\\n"));
        tex.push_str("\n\n");
    }

    if !content.projects.is_empty() {
        tex.push_str("\\section*{Projects}\n");
        let items: Vec<String> = content.projects.iter().map(render_project).collect();
        tex.push_str(&items.join("\n"));
        tex.push('\n');
    }

    if !content.certifications.is_empty() {
        tex.push_str("\\section*{Certifications}\n");
        let lines: Vec<String> = content
            .certifications
            .iter()
            .map(|c| {
                let mut line = format!("\\textbf{{{}}}", esc(c.name.trim()));
                if !c.issuer.trim().is_empty() {
                    line.push_str(&format!(", {}", esc(c.issuer.trim())));
                }
                let date = format_date(&c.date);
                if !date.is_empty() {
                    line.push_str(&format!(" \\hfill {date}"));
                }
                line
            })
            .collect();
        tex.push_str(&lines.join("\\\\\n"));
        tex.push_str("\n\n");
    }

    if !content.languages.is_empty() {
        tex.push_str("\\section*{Languages}\n");
        let names: Vec<String> = content
            .languages
            .iter()
            .map(|l| match l.proficiency.trim() {
                "" => esc(l.name.trim()),
                level => format!("{} ({})", esc(l.name.trim()), esc(level)),
            })
            .collect();
        tex.push_str(&names.join(", "));
        tex.push_str("\n\n");
    }

    tex.push_str("\\end{document}\n");
    tex
}

fn render_header(tex: &mut String, basics: &Basics) {
    let name = match basics.name.trim() {
        "" => PLACEHOLDER_NAME,
        name => name,
    };
    tex.push_str("\\begin{center}\n");
    tex.push_str(&format!("  {{\\LARGE \\textbf{{{}}}}}\\\\[0.5em]\n", esc(name)));
    for (label, value) in [
        ("Email", &basics.email),
        ("Phone", &basics.phone),
        ("Location", &basics.location),
        ("Website", &basics.website),
    ] {
        if !value.trim().is_empty() {
            tex.push_str(&format!("  {{\\large {label}: {}}}\\\\\n", esc(value.trim())));
        }
    }
    for profile in basics.profiles.iter().filter(|p| !p.url.trim().is_empty()) {
        tex.push_str(&format!("  {{\\large {}}}\\\\\n", link(&profile.url)));
    }
    tex.push_str("\\end{center}\n\n");
}

/// Wraps non-empty lines in an itemize environment.
fn itemize(items: &[String]) -> String {
    let items: Vec<&str> = items
        .iter()
        .map(|s| s.trim())
        .filter(|s| !s.is_empty())
        .collect();
    if items.is_empty() {
        return String::new();
    }
    let mut out = String::from("\\begin{itemize}\n");
    for item in items {
        out.push_str(&format!("  \\item {}\n", esc(item)));
    }
    out.push_str("\\end{itemize}\n");
    out
}

fn heading_line(title: &str, dates: &str) -> String {
    if dates.is_empty() {
        format!("\\textbf{{{}}}\\\\\n", esc(title.trim()))
    } else {
        format!("\\textbf{{{}}} \\hfill {}\\\\\n", esc(title.trim()), dates)
    }
}

fn render_education(edu: &EducationEntry) -> String {
    let dates = date_range(&edu.start_date, &edu.end_date, false, DATE_SEPARATOR);
    let mut out = heading_line(&edu.institution, &dates);

    let mut details = esc(edu.degree.trim());
    if !edu.field.trim().is_empty() {
        if !details.is_empty() {
            details.push_str(", ");
        }
        details.push_str(&esc(edu.field.trim()));
    }
    if !edu.gpa.trim().is_empty() {
        details.push_str(&format!(" \\hfill GPA: {}", esc(edu.gpa.trim())));
    }
    if !details.is_empty() {
        out.push_str(&details);
        out.push('\n');
    }
    out.push_str(&itemize(&edu.achievements));
    out
}

fn render_experience(exp: &WorkExperienceEntry) -> String {
    let dates = date_range(&exp.start_date, &exp.end_date, exp.current, DATE_SEPARATOR);
    let mut out = heading_line(&exp.company, &dates);

    if !exp.position.trim().is_empty() || !exp.location.trim().is_empty() {
        let mut line = String::new();
        if !exp.position.trim().is_empty() {
            line.push_str(&format!("\\textit{{{}}}", esc(exp.position.trim())));
        }
        if !exp.location.trim().is_empty() {
            line.push_str(&format!(" \\hfill {}", esc(exp.location.trim())));
        }
        out.push_str(&line);
        out.push_str("\\\\\n");
    }
    if !exp.summary.trim().is_empty() {
        out.push_str(&esc(exp.summary.trim()));
        out.push_str("\\\\\n");
    }
    out.push_str(&itemize(&exp.highlights));
    out
}

/// `\href` for safe schemes, escaped text otherwise.
fn link(raw_url: &str) -> String {
    let text = esc(raw_url.trim());
    match safe_link(raw_url) {
        Some(url) => format!("\\href{{{}}}{{{text}}}", escape_latex_url(url.as_str())),
        None => text,
    }
}

fn render_project(project: &ProjectEntry) -> String {
    let dates = date_range(&project.start_date, &project.end_date, false, DATE_SEPARATOR);
    let mut out = heading_line(&project.name, &dates);
    if !project.url.trim().is_empty() {
        out.push_str(&format!("{}\\\\\n", link(&project.url)));
    }
    if !project.description.trim().is_empty() {
        out.push_str(&esc(project.description.trim()));
        out.push_str("\\\\\n");
    }
    out.push_str(&itemize(&project.highlights));
    if !project.technologies.is_empty() {
        out.push_str(&format!(
            "\\textit{{Technologies: {}}}\\\\\n",
            esc(&project.technologies.join(", "))
        ));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::content::{Profile, SkillGroup};

    fn ada() -> ResumeContent {
        ResumeContent {
            basics: Basics {
                name: "Ada Lovelace".into(),
                email: "ada@x.com".into(),
                ..Default::default()
            },
            work_experience: vec![WorkExperienceEntry {
                company: "Analytical Engines".into(),
                position: "Programmer".into(),
                start_date: "1842-01-01".into(),
                current: true,
                highlights: vec!["Cut runtime by 40% & more".into()],
                ..Default::default()
            }],
            skills: vec![SkillGroup {
                category: "C#".into(),
                items: vec!["LINQ".into()],
            }],
            ..Default::default()
        }
    }

    #[test]
    fn test_document_is_complete() {
        let tex = render_latex(&ada(), TemplateId::Classic);
        assert!(tex.starts_with(r"\documentclass[11pt,a4paper]{article}"));
        assert!(tex.contains(r"\begin{document}"));
        assert!(tex.trim_end().ends_with(r"\end{document}"));
        assert!(tex.contains(r"{\LARGE \textbf{Ada Lovelace}}\\[0.5em]"));
        assert!(tex.contains(r"{\large Email: ada@x.com}\\"));
    }

    #[test]
    fn test_current_role_and_escaping() {
        let tex = render_latex(&ada(), TemplateId::Classic);
        assert!(tex.contains(r"\textbf{Analytical Engines} \hfill Jan 1842 -- Present\\"));
        assert!(tex.contains(r"\item Cut runtime by 40\% \& more"));
        assert!(tex.contains(r"\textbf{C\#}: LINQ"));
    }

    #[test]
    fn test_bullets_are_wrapped_in_itemize() {
        let tex = render_latex(&ada(), TemplateId::Classic);
        let begin = tex.find(r"\begin{itemize}").unwrap();
        let item = tex.find(r"\item ").unwrap();
        let end = tex.find(r"\end{itemize}").unwrap();
        assert!(begin < item && item < end);
    }

    #[test]
    fn test_omits_empty_sections() {
        let tex = render_latex(&ada(), TemplateId::Classic);
        assert!(!tex.contains("Professional Summary"));
        assert!(!tex.contains(r"\section*{Education}"));
        assert!(!tex.contains("Phone:"));
    }

    #[test]
    fn test_template_directives_selected() {
        let modern = render_latex(&ada(), TemplateId::Modern);
        assert!(modern.contains(r"\definecolor{primary}"));
        let minimal = render_latex(&ada(), TemplateId::Minimal);
        assert!(minimal.contains(r"\setlist[itemize]{label=--}"));
        let classic = render_latex(&ada(), TemplateId::Classic);
        assert!(classic.contains(r"\titleformat*{\section}{\Large\bfseries}"));
    }

    #[test]
    fn test_latex_injection_is_neutralised() {
        let mut content = ada();
        content.basics.summary = r"\input{/etc/passwd}".into();
        let tex = render_latex(&content, TemplateId::Classic);
        assert!(!tex.contains(r"\input{"));
        assert!(tex.contains(r"\textbackslash{}input\{/etc/passwd\}"));
    }

    #[test]
    fn test_deterministic() {
        assert_eq!(
            render_latex(&ada(), TemplateId::Modern),
            render_latex(&ada(), TemplateId::Modern)
        );
    }

    #[test]
    fn test_links_use_href_with_raw_target() {
        let mut content = ada();
        content.basics.profiles = vec![Profile {
            network: "GitHub".into(),
            url: "javascript:alert(1)".into(),
            username: String::new(),
        }];
        content.projects = vec![ProjectEntry {
            name: "Engine".into(),
            url: "https://x.com/my_repo#notes".into(),
            ..Default::default()
        }];
        let tex = render_latex(&content, TemplateId::Classic);
        assert!(tex.contains(
            r"\href{https://x.com/my_repo\#notes}{https://x.com/my\_repo\#notes}\\"
        ));
        assert!(!tex.contains(r"\href{javascript"));
        assert!(tex.contains(r"{\large javascript:alert(1)}\\"));
    }
}
