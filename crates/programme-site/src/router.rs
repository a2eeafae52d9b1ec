//! Fragment routing.
//!
//! `""` / `"#"` → home, `theme/<id>` → theme view, `theme/<id>/<prop>` →
//! theme view with that proposition pre-opened. Anything else falls back to
//! home.

/// View descriptor parsed from a location fragment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Route {
    Home,
    Theme {
        theme_id: String,
        prop_id: Option<String>,
    },
}

impl Route {
    #[must_use]
    pub fn theme(theme_id: &str) -> Self {
        Self::Theme {
            theme_id: theme_id.to_owned(),
            prop_id: None,
        }
    }

    /// Fragment (without `#`) that routes back to this view.
    #[must_use]
    pub fn fragment(&self) -> String {
        match self {
            Self::Home => String::new(),
            Self::Theme {
                theme_id,
                prop_id: None,
            } => theme_fragment(theme_id),
            Self::Theme {
                theme_id,
                prop_id: Some(prop_id),
            } => format!("theme/{theme_id}/{prop_id}"),
        }
    }
}

/// Fragment of a theme view.
#[must_use]
pub fn theme_fragment(theme_id: &str) -> String {
    format!("theme/{theme_id}")
}

#[must_use]
pub fn parse_route(fragment: &str) -> Route {
    let fragment = fragment.strip_prefix('#').unwrap_or(fragment);
    let mut parts = fragment.split('/');
    match (parts.next(), parts.next()) {
        (Some("theme"), Some(theme_id)) if !theme_id.is_empty() => Route::Theme {
            theme_id: theme_id.to_owned(),
            prop_id: parts
                .next()
                .filter(|prop| !prop.is_empty())
                .map(str::to_owned),
        },
        _ => Route::Home,
    }
}

#[cfg(test)]
mod tests {
    use super::{parse_route, theme_fragment, Route};

    #[test]
    fn empty_and_bare_hash_are_home() {
        assert_eq!(parse_route(""), Route::Home);
        assert_eq!(parse_route("#"), Route::Home);
    }

    #[test]
    fn theme_without_proposition() {
        assert_eq!(
            parse_route("theme/environnement"),
            Route::Theme {
                theme_id: "environnement".to_owned(),
                prop_id: None
            }
        );
        assert_eq!(parse_route("#theme/environnement"), parse_route("theme/environnement"));
    }

    #[test]
    fn theme_with_proposition() {
        assert_eq!(
            parse_route("theme/environnement/compost-quartier"),
            Route::Theme {
                theme_id: "environnement".to_owned(),
                prop_id: Some("compost-quartier".to_owned())
            }
        );
    }

    #[test]
    fn missing_theme_id_or_unknown_prefix_is_home() {
        assert_eq!(parse_route("theme"), Route::Home);
        assert_eq!(parse_route("theme/"), Route::Home);
        assert_eq!(parse_route("themes/env"), Route::Home);
        assert_eq!(parse_route("about"), Route::Home);
    }

    #[test]
    fn trailing_slash_has_no_proposition() {
        assert_eq!(parse_route("theme/env/"), Route::theme("env"));
    }

    #[test]
    fn extra_segments_are_ignored() {
        assert_eq!(
            parse_route("theme/env/p1/extra"),
            Route::Theme {
                theme_id: "env".to_owned(),
                prop_id: Some("p1".to_owned())
            }
        );
    }

    #[test]
    fn fragments_render_back() {
        assert_eq!(Route::Home.fragment(), "");
        assert_eq!(Route::theme("env").fragment(), "theme/env");
        assert_eq!(theme_fragment("env"), "theme/env");
        let route = Route::Theme {
            theme_id: "env".to_owned(),
            prop_id: Some("p1".to_owned()),
        };
        assert_eq!(parse_route(&route.fragment()), route);
    }
}
