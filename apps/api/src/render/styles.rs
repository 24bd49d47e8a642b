use crate::models::resume::TemplateId;

/// Per-template LaTeX directives: section heading format and itemize glyph.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TemplateStyle {
    pub template: TemplateId,
    pub section_format: &'static str,
    pub bullet_label: &'static str,
    /// `(name, r, g, b)` colour defined in the preamble, if any.
    pub accent_color: Option<(&'static str, u8, u8, u8)>,
}

const CLASSIC: TemplateStyle = TemplateStyle {
    template: TemplateId::Classic,
    section_format: r"\Large\bfseries",
    bullet_label: r"\textbullet",
    accent_color: None,
};

const MODERN: TemplateStyle = TemplateStyle {
    template: TemplateId::Modern,
    section_format: r"\Large\bfseries\color{primary}",
    bullet_label: r"\textbullet",
    accent_color: Some(("primary", 37, 99, 235)),
};

const MINIMAL: TemplateStyle = TemplateStyle {
    template: TemplateId::Minimal,
    section_format: r"\large\bfseries\scshape",
    bullet_label: "--",
    accent_color: None,
};

impl TemplateStyle {
    pub fn for_template(template: TemplateId) -> Self {
        match template {
            TemplateId::Classic => CLASSIC,
            TemplateId::Modern => MODERN,
            TemplateId::Minimal => MINIMAL,
        }
    }

    pub fn latex_directives(&self) -> String {
        let mut out = String::new();
        if let Some((name, r, g, b)) = self.accent_color {
            out.push_str(&format!("\\definecolor{{{name}}}{{RGB}}{{{r}, {g}, {b}}}\n"));
        }
        out.push_str(&format!(
            "\\titleformat*{{\\section}}{{{}}}\n",
            self.section_format
        ));
        out.push_str(&format!(
            "\\setlist[itemize]{{label={}}}\n",
            self.bullet_label
        ));
        out
    }
}
