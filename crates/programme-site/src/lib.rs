//! programme-site: router, views, navigation, accordion and search for the
//! municipal programme site, plus the `programme-site` CLI.
//!
//! [`app::App`] is the single-threaded shell: it loads the document, mounts
//! the view for the current fragment onto a
//! [`programme_web_adapter::surface::Surface`], and reacts to UI events and
//! timer expiries. Views are pure markup functions under [`views`].

pub mod accordion;
pub mod app;
pub mod cli;
pub mod navigation;
pub mod router;
pub mod search;
pub mod views;

/// Stable crate label used by bootstrap smoke tests.
pub fn crate_label() -> &'static str {
    "programme-site"
}
