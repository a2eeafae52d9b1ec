//! Markup renderers. Every function here is pure: the same document and
//! state always produce the same markup.

pub mod breadcrumb;
pub mod home;
pub mod shell;
pub mod states;
pub mod theme;

/// Glyph shown for themes without an icon.
pub const DEFAULT_ICON: &str = "📌";

pub(crate) fn theme_icon(icon: Option<&str>) -> String {
    programme_core::text::escape_html(icon.unwrap_or(DEFAULT_ICON))
}
