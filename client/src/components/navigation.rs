//! Fixed-width sidebar with the logo, a search box and section links.
//!
//! DESIGN
//! ======
//! The search input is rendered without handlers; searching is not wired up.
//! Links are plain anchors so the panel renders outside a router context.

use leptos::prelude::*;

use crate::components::icons::{Icon, IconKind};

#[cfg(test)]
#[path = "navigation_test.rs"]
mod navigation_test;

pub const BRAND: &str = "SyncX";
pub const SEARCH_PLACEHOLDER: &str = "Search documentation...";

/// One sidebar link.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NavLink {
    pub label: &'static str,
    pub href: &'static str,
    pub icon: IconKind,
}

pub const NAV_LINKS: [NavLink; 4] = [
    NavLink { label: "Home", href: "/", icon: IconKind::Home },
    NavLink { label: "Documents", href: "/documents", icon: IconKind::FileText },
    NavLink { label: "Teams", href: "/teams", icon: IconKind::Users },
    NavLink { label: "Settings", href: "/settings", icon: IconKind::Settings },
];

/// Sidebar navigation panel.
#[component]
pub fn Navigation() -> impl IntoView {
    view! {
        <aside class="nav-panel">
            <div class="nav-panel__header">
                <a class="nav-panel__logo" href="/">
                    <Icon kind=IconKind::BookOpen class="nav-panel__logo-icon"/>
                    <span class="nav-panel__brand">{BRAND}</span>
                </a>
            </div>

            <div class="nav-panel__search">
                <Icon kind=IconKind::Search class="nav-panel__search-icon"/>
                <input class="nav-panel__search-input" type="search" placeholder=SEARCH_PLACEHOLDER/>
            </div>

            <nav class="nav-panel__links">
                {NAV_LINKS.iter().map(|link| view! { <NavItem link=*link/> }).collect_view()}
            </nav>
        </aside>
    }
}

#[component]
fn NavItem(link: NavLink) -> impl IntoView {
    view! {
        <a class="nav-panel__link" href=link.href>
            <Icon kind=link.icon class="nav-panel__link-icon"/>
            <span class="nav-panel__link-label">{link.label}</span>
        </a>
    }
}
