//! Landing-page tile linking to one product section.

use leptos::prelude::*;

use crate::components::icons::{Icon, IconKind};

/// Literal content of one feature card.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Feature {
    pub title: &'static str,
    pub description: &'static str,
    pub action: &'static str,
    pub href: &'static str,
    pub icon: IconKind,
}

/// A card with an icon, title, short description and a call-to-action link.
#[component]
pub fn FeatureCard(feature: Feature) -> impl IntoView {
    view! {
        <section class="feature-card">
            <Icon kind=feature.icon class="feature-card__icon"/>
            <h2 class="feature-card__title">{feature.title}</h2>
            <p class="feature-card__description">{feature.description}</p>
            <a class="button feature-card__action" href=feature.href>
                {feature.action}
            </a>
        </section>
    }
}
