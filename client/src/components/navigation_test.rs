use super::*;
use crate::test_helpers::{opening_tags, render};

fn render_navigation() -> String {
    render(|| view! { <Navigation/> })
}

#[test]
fn nav_links_target_their_sections_in_order() {
    let pairs: Vec<(&str, &str)> = NAV_LINKS.iter().map(|link| (link.label, link.href)).collect();
    assert_eq!(
        pairs,
        vec![("Home", "/"), ("Documents", "/documents"), ("Teams", "/teams"), ("Settings", "/settings")]
    );
}

#[test]
fn renders_logo_link_to_root() {
    let html = render_navigation();
    let logo = opening_tags(&html, "a")
        .into_iter()
        .find(|tag| tag.contains(r#"class="nav-panel__logo""#))
        .expect("logo link rendered");
    assert!(logo.contains(r#"href="/""#));
    assert!(html.contains(">SyncX<"));
    assert!(html.contains(r#"data-icon="book-open""#));
}

#[test]
fn renders_search_input_with_placeholder() {
    let html = render_navigation();
    assert!(html.contains(r#"type="search""#));
    assert!(html.contains(r#"placeholder="Search documentation...""#));
    assert_eq!(html.matches("<input").count(), 1);
}

#[test]
fn renders_exactly_four_section_links() {
    let html = render_navigation();
    let links: Vec<&str> = opening_tags(&html, "a")
        .into_iter()
        .filter(|tag| tag.contains(r#"class="nav-panel__link""#))
        .collect();
    assert_eq!(links.len(), 4);
    for (tag, link) in links.iter().zip(NAV_LINKS) {
        assert!(tag.contains(&format!(r#"href="{}""#, link.href)), "missing link to {}", link.href);
        assert!(html.contains(&format!(">{}<", link.label)), "missing label {}", link.label);
    }
}

#[test]
fn opening_tags_ignore_attribute_order() {
    let tags = opening_tags(r#"<p>x</p><a href="/" class="logo">y</a><a class="link" href="/teams">z</a>"#, "a");
    assert_eq!(tags, vec![r#"<a href="/" class="logo">"#, r#"<a class="link" href="/teams">"#]);
}

#[test]
fn section_links_appear_in_order() {
    let html = render_navigation();
    let positions: Vec<usize> = NAV_LINKS
        .iter()
        .map(|link| html.find(&format!(">{}<", link.label)).expect("label rendered"))
        .collect();
    assert!(positions.windows(2).all(|w| w[0] < w[1]));
}
