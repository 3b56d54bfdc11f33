//! Reactive application state provided through Leptos context.

pub mod files;
pub mod session;
