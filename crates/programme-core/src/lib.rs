//! programme-core: document model, loading, and text primitives for the
//! programme site.
//!
//! This crate owns everything that does not depend on a page surface: the
//! programme document (meta, themes, propositions), the read-only document
//! store with its global proposition index, site configuration, and the
//! escaping/highlighting helpers every renderer relies on.

pub mod config;
pub mod error;
pub mod model;
pub mod store;
pub mod text;

/// Crate identity label used by bootstrap smoke tests.
pub fn crate_label() -> &'static str {
    "programme-core"
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn crate_label_is_stable() {
        assert_eq!(crate_label(), "programme-core");
    }

    #[test]
    fn modules_are_accessible() {
        let _ = model::Program::default();
        let _ = config::SiteConfig::default();
        let _ = error::ConfigError::Invalid("test".into());
        let _ = text::NEUTRAL_RGB;
    }
}
