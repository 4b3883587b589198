//! Utility helpers shared across client modules.
//!
//! SYSTEM CONTEXT
//! ==============
//! Utility modules isolate browser/environment concerns (storage, clock,
//! navigation) from store and page logic so the stores test natively.

pub mod auth;
pub mod clock;
pub mod listeners;
pub mod merge;
pub mod navigation;
pub mod sanitize;
pub mod stamped;
pub mod storage;
