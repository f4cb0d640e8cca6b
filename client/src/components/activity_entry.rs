//! Single row in the recent activity list.

use leptos::prelude::*;

use crate::components::icons::{Icon, IconKind};

/// Literal content of one activity row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Activity {
    pub title: &'static str,
    pub detail: &'static str,
    pub icon: IconKind,
}

#[component]
pub fn ActivityEntry(activity: Activity) -> impl IntoView {
    view! {
        <div class="activity-entry">
            <div class="activity-entry__badge">
                <Icon kind=activity.icon class="activity-entry__icon"/>
            </div>
            <div class="activity-entry__body">
                <p class="activity-entry__title">{activity.title}</p>
                <p class="activity-entry__detail">{activity.detail}</p>
            </div>
        </div>
    }
}
