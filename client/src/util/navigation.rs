//! Full-page navigation outside the router.
//!
//! A forced logout must drop every in-memory signal, so it leaves the SPA
//! instead of routing client-side.

/// Replace the current document with `path`. No-op outside the browser.
pub fn hard_navigate(path: &str) {
    #[cfg(feature = "hydrate")]
    {
        if let Some(window) = web_sys::window() {
            if let Err(e) = window.location().set_href(path) {
                leptos::logging::warn!("navigation to {path} failed: {e:?}");
            }
        }
    }
    #[cfg(not(feature = "hydrate"))]
    {
        let _ = path;
    }
}
