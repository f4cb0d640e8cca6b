//! Reusable UI component modules.
//!
//! SYSTEM CONTEXT
//! ==============
//! Components are pure renderers of literal content. None of them reads or
//! writes context, so each can be rendered in isolation.

pub mod activity_entry;
pub mod feature_card;
pub mod icons;
pub mod navigation;
