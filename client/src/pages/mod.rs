//! Page modules for route-level screens.
//!
//! ARCHITECTURE
//! ============
//! Each page owns route-scoped orchestration (guards, requests) and delegates
//! rendering details to `components`.

pub mod admin_settings;
pub mod home;
pub mod login;
