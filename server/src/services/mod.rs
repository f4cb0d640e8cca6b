//! Domain services behind the HTTP routes.
//!
//! SYSTEM CONTEXT
//! ==============
//! Routes stay thin: they extract input, call into these modules, and map
//! service errors to status codes.

pub mod command;
pub mod hosting;
pub mod project;
pub mod scanning;
