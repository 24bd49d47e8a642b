use crate::models::content::ResumeContent;
use crate::models::resume::TemplateId;
use crate::render::escape::escape_html;

/// Wraps a rendered fragment into a standalone page, inlining the template
/// stylesheet so the page has no external dependencies when captured.
pub fn render_page(
    content: &ResumeContent,
    template: TemplateId,
    fragment: &str,
    stylesheet: Option<&str>,
) -> String {
    let title = match content.basics.name.trim() {
        "" => "Resume".to_string(),
        name => escape_html(name),
    };
    let style = stylesheet
        .map(|css| format!("  <style>\n{css}\n  </style>\n"))
        .unwrap_or_default();

    format!(
        "<!DOCTYPE html>\n<html>\n<head>\n  <meta charset=\"utf-8\">\n  <title>{title}</title>\n{style}</head>\n<body class=\"template-{template}\">\n<div class=\"content\">\n{fragment}</div>\n</body>\n</html>\n"
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_page_inlines_stylesheet_and_body_class() {
        let content = ResumeContent::default();
        let page = render_page(&content, TemplateId::Modern, "<p>x</p>\n", Some("h1 { color: red; }"));
        assert!(page.starts_with("<!DOCTYPE html>"));
        assert!(page.contains("<title>Resume</title>"));
        assert!(page.contains("h1 { color: red; }"));
        assert!(page.contains("<body class=\"template-modern\">"));
        assert!(page.contains("<p>x</p>"));
    }

    #[test]
    fn test_title_is_escaped() {
        let mut content = ResumeContent::default();
        content.basics.name = "</title><script>".into();
        let page = render_page(&content, TemplateId::Classic, "", None);
        assert!(page.contains("<title>&lt;/title&gt;&lt;script&gt;</title>"));
        assert!(!page.contains("<style>"));
    }
}
