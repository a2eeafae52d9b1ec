//! Breadcrumb trail above the root content.

use std::fmt::Write as _;

use programme_core::text::escape_html;

/// What activating a clickable crumb does.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CrumbAction {
    GoHome,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Crumb {
    pub label: String,
    pub active: bool,
    pub action: Option<CrumbAction>,
}

impl Crumb {
    #[must_use]
    pub fn active(label: &str) -> Self {
        Self {
            label: label.to_owned(),
            active: true,
            action: None,
        }
    }

    #[must_use]
    pub fn link(label: &str, action: CrumbAction) -> Self {
        Self {
            label: label.to_owned(),
            active: false,
            action: Some(action),
        }
    }
}

pub const HOME_LABEL: &str = "Accueil";

#[must_use]
pub fn render(items: &[Crumb]) -> String {
    let mut out = String::new();
    for (idx, item) in items.iter().enumerate() {
        if idx > 0 {
            out.push_str(r#"<span class="crumb-sep" aria-hidden="true">›</span>"#);
        }
        if item.active {
            let _ = write!(
                out,
                r#"<span class="crumb-item active">{}</span>"#,
                escape_html(&item.label)
            );
        } else {
            let _ = write!(
                out,
                r#"<span class="crumb-item clickable" data-idx="{idx}" role="link" tabindex="0">{}</span>"#,
                escape_html(&item.label)
            );
        }
    }
    out
}
