//! Page modules for route-level screens.
//!
//! ARCHITECTURE
//! ============
//! Each page owns route-scoped orchestration. The auth page hosts the login
//! and signup panels; the dashboard owns the file list.

pub mod auth;
pub mod dashboard;
pub mod login;
pub mod signup;
