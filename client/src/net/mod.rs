//! Network layer modules.
//!
//! SYSTEM CONTEXT
//! ==============
//! `http` wraps every REST call with bearer injection and forced logout on
//! rejected sessions; `api` holds the auth endpoint helpers built on it.

pub mod api;
pub mod http;
pub mod types;
