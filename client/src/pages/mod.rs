//! Page modules for route-level screens.
//!
//! ARCHITECTURE
//! ============
//! Each page owns the literal content for its route and delegates rendering
//! details to `components`.

pub mod home;
