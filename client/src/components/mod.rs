//! Reusable UI component modules.
//!
//! SYSTEM CONTEXT
//! ==============
//! Components render site chrome from the settings and auth signals provided
//! by `App`; they never touch storage directly.

pub mod announcement_banner;
pub mod maintenance_notice;
