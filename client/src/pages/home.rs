//! Landing page: welcome banner, feature cards and recent activity.
//!
//! SYSTEM CONTEXT
//! ==============
//! Served at `/`. Every card, label and activity row is literal content; the
//! activity list is a placeholder and is not backed by any store.

use leptos::prelude::*;

use crate::components::activity_entry::{Activity, ActivityEntry};
use crate::components::feature_card::{Feature, FeatureCard};
use crate::components::icons::IconKind;

#[cfg(test)]
#[path = "home_test.rs"]
mod home_test;

pub const WELCOME_TITLE: &str = "Welcome to SyncX";
pub const WELCOME_SUBTITLE: &str = "Your team's central hub for documentation and knowledge sharing";

pub const FEATURES: [Feature; 4] = [
    Feature {
        title: "Documents",
        description: "Create and manage your team's documentation",
        action: "Browse Documents",
        href: "/documents",
        icon: IconKind::FileText,
    },
    Feature {
        title: "Teams",
        description: "Collaborate with your team members",
        action: "View Teams",
        href: "/teams",
        icon: IconKind::Users,
    },
    Feature {
        title: "Templates",
        description: "Start with pre-built document templates",
        action: "Browse Templates",
        href: "/templates",
        icon: IconKind::BookOpen,
    },
    Feature {
        title: "Version Control",
        description: "Track changes and manage versions",
        action: "View History",
        href: "/versions",
        icon: IconKind::GitBranch,
    },
];

pub const RECENT_ACTIVITY: [Activity; 2] = [
    Activity {
        title: "API Documentation Updated",
        detail: "Updated by John Doe • 2 hours ago",
        icon: IconKind::FileText,
    },
    Activity {
        title: "New Team Member Added",
        detail: "Jane Smith joined Engineering • 5 hours ago",
        icon: IconKind::Users,
    },
];

/// Home page.
#[component]
pub fn HomePage() -> impl IntoView {
    view! {
        <div class="home">
            <header class="home__intro">
                <h1 class="home__title">{WELCOME_TITLE}</h1>
                <p class="home__subtitle">{WELCOME_SUBTITLE}</p>
            </header>

            <div class="home__features">
                {FEATURES.iter().map(|feature| view! { <FeatureCard feature=*feature/> }).collect_view()}
            </div>

            <section class="home__activity">
                <h2 class="home__activity-title">"Recent Activity"</h2>
                <div class="home__activity-list">
                    {RECENT_ACTIVITY
                        .iter()
                        .map(|activity| view! { <ActivityEntry activity=*activity/> })
                        .collect_view()}
                </div>
            </section>
        </div>
    }
}
