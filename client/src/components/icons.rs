//! Inline SVG line icons.
//!
//! DESIGN
//! ======
//! Icons are 24x24 stroke glyphs. Each variant carries its SVG body as a
//! static string so content tables can name an icon without owning markup.

use leptos::prelude::*;

#[cfg(test)]
#[path = "icons_test.rs"]
mod icons_test;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IconKind {
    BookOpen,
    FileText,
    GitBranch,
    Home,
    Search,
    Settings,
    Users,
}

impl IconKind {
    /// Stable name, rendered as `data-icon` for styling and tests.
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Self::BookOpen => "book-open",
            Self::FileText => "file-text",
            Self::GitBranch => "git-branch",
            Self::Home => "home",
            Self::Search => "search",
            Self::Settings => "settings",
            Self::Users => "users",
        }
    }

    /// Inner SVG markup (paths only, no `<svg>` wrapper).
    #[must_use]
    pub fn svg_body(self) -> &'static str {
        match self {
            Self::BookOpen => {
                r#"<path d="M2 3h6a4 4 0 0 1 4 4v14a3 3 0 0 0-3-3H2z"/><path d="M22 3h-6a4 4 0 0 0-4 4v14a3 3 0 0 1 3-3h7z"/>"#
            }
            Self::FileText => {
                r#"<path d="M15 2H6a2 2 0 0 0-2 2v16a2 2 0 0 0 2 2h12a2 2 0 0 0 2-2V7Z"/><path d="M14 2v4a2 2 0 0 0 2 2h4"/><path d="M10 9H8"/><path d="M16 13H8"/><path d="M16 17H8"/>"#
            }
            Self::GitBranch => {
                r#"<line x1="6" x2="6" y1="3" y2="15"/><circle cx="18" cy="6" r="3"/><circle cx="6" cy="18" r="3"/><path d="M18 9a9 9 0 0 1-9 9"/>"#
            }
            Self::Home => r#"<path d="m3 9 9-7 9 7v11a2 2 0 0 1-2 2H5a2 2 0 0 1-2-2z"/><polyline points="9 22 9 12 15 12 15 22"/>"#,
            Self::Search => r#"<circle cx="11" cy="11" r="8"/><path d="m21 21-4.3-4.3"/>"#,
            Self::Settings => {
                r#"<path d="M12.22 2h-.44a2 2 0 0 0-2 2v.18a2 2 0 0 1-1 1.73l-.43.25a2 2 0 0 1-2 0l-.15-.08a2 2 0 0 0-2.73.73l-.22.38a2 2 0 0 0 .73 2.73l.15.1a2 2 0 0 1 1 1.72v.51a2 2 0 0 1-1 1.74l-.15.09a2 2 0 0 0-.73 2.73l.22.38a2 2 0 0 0 2.73.73l.15-.08a2 2 0 0 1 2 0l.43.25a2 2 0 0 1 1 1.73V20a2 2 0 0 0 2 2h.44a2 2 0 0 0 2-2v-.18a2 2 0 0 1 1-1.73l.43-.25a2 2 0 0 1 2 0l.15.08a2 2 0 0 0 2.73-.73l.22-.39a2 2 0 0 0-.73-2.73l-.15-.08a2 2 0 0 1-1-1.74v-.5a2 2 0 0 1 1-1.74l.15-.09a2 2 0 0 0 .73-2.73l-.22-.38a2 2 0 0 0-2.73-.73l-.15.08a2 2 0 0 1-2 0l-.43-.25a2 2 0 0 1-1-1.73V4a2 2 0 0 0-2-2z"/><circle cx="12" cy="12" r="3"/>"#
            }
            Self::Users => {
                r#"<path d="M14 19a6 6 0 0 0-12 0"/><circle cx="8" cy="9" r="4"/><path d="M22 19a6 6 0 0 0-6-6 4 4 0 1 0 0-8"/>"#
            }
        }
    }
}

/// Decorative icon. Hidden from assistive technology.
#[component]
pub fn Icon(kind: IconKind, #[prop(optional, into)] class: String) -> impl IntoView {
    let class = if class.is_empty() { "icon".to_owned() } else { format!("icon {class}") };

    view! { <span class=class data-icon=kind.name() aria-hidden="true" inner_html=svg_markup(kind)></span> }
}

fn svg_markup(kind: IconKind) -> String {
    format!(
        r#"<svg xmlns="http://www.w3.org/2000/svg" viewBox="0 0 24 24" fill="none" stroke="currentColor" stroke-width="2" stroke-linecap="round" stroke-linejoin="round">{}</svg>"#,
        kind.svg_body()
    )
}
