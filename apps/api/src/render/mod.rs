//! Template rendering: pure functions from resume content and a template id to
//! HTML (preview and PDF) and LaTeX (display and download). No I/O, no shared state.

pub mod document;
pub mod escape;
pub mod format;
pub mod html;
pub mod latex;
pub mod styles;

pub use document::render_page;
pub use html::render_html;
pub use latex::render_latex;
