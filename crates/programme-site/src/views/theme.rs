//! Theme view: themed header and one accordion card per proposition.

use std::fmt::Write as _;

use programme_core::model::{Proposition, Theme};
use programme_core::store::DocumentStore;
use programme_core::text::{escape_html, hex_to_rgb, plural_suffix};

use super::theme_icon;
use crate::accordion::AccordionState;

/// Element id of a proposition card.
#[must_use]
pub fn card_id(prop_id: &str) -> String {
    format!("pc-{prop_id}")
}

/// A resolved cross-link from one proposition to another.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RelatedChip {
    pub theme_id: String,
    pub prop_id: String,
    pub label: String,
}

/// Resolve the related ids of `prop` (rendered inside `owner`). Ids that do
/// not resolve are dropped.
#[must_use]
pub fn related_chips(store: &DocumentStore, owner: &Theme, prop: &Proposition) -> Vec<RelatedChip> {
    prop.related
        .iter()
        .filter_map(|id| {
            let found = store.find_prop(id)?;
            let label = if found.theme.id == owner.id {
                found.proposition.title.clone()
            } else {
                format!("{} → {}", found.theme.title, found.proposition.title)
            };
            Some(RelatedChip {
                theme_id: found.theme.id.clone(),
                prop_id: id.clone(),
                label,
            })
        })
        .collect()
}

/// Per-render visual state of the proposition cards.
#[derive(Debug, Clone, Copy)]
pub struct CardState<'a> {
    pub accordion: &'a AccordionState,
    pub highlighted: Option<&'a str>,
}

#[must_use]
pub fn render(store: &DocumentStore, theme: &Theme, state: CardState<'_>) -> String {
    let props = &theme.propositions;
    let color = escape_html(&theme.color);
    let rgb = hex_to_rgb(&theme.color);

    let mut out = String::new();
    out.push_str(
        r#"<button class="back-btn" id="back-btn" aria-label="Retour à l&#x27;accueil">
  ← Retour au programme
</button>
"#,
    );
    let _ = write!(
        out,
        r#"<header class="theme-header" style="--theme-color: {color}; --theme-rgb: {rgb}">
  <div class="theme-header-icon" aria-hidden="true">{icon}</div>
  <div class="theme-header-content">
    <h1 class="theme-header-title">{title}</h1>
    <p class="theme-header-desc">{desc}</p>
    <span class="theme-header-count">{count} proposition{plural}</span>
  </div>
</header>
"#,
        icon = theme_icon(theme.icon.as_deref()),
        title = escape_html(&theme.title),
        desc = escape_html(&theme.description),
        count = props.len(),
        plural = plural_suffix(props.len()),
    );

    let _ = writeln!(
        out,
        r#"<div class="propositions-list" style="--theme-color: {color}; --theme-rgb: {rgb}">"#
    );
    for (idx, prop) in props.iter().enumerate() {
        out.push_str(&render_card(store, theme, prop, idx + 1, state));
    }
    out.push_str("</div>\n");
    out
}

fn render_card(
    store: &DocumentStore,
    theme: &Theme,
    prop: &Proposition,
    number: usize,
    state: CardState<'_>,
) -> String {
    let id = escape_html(&prop.id);
    let open = state.accordion.is_open(&prop.id);
    let mut classes = String::from("prop-card");
    if open {
        classes.push_str(" open");
    }
    if state.highlighted == Some(prop.id.as_str()) {
        classes.push_str(" highlighted");
    }
    let mel_badge = if prop.mel {
        r#"<span class="mel-badge" title="Compétence Métropole Européenne de Lille">MEL</span>"#
    } else {
        ""
    };
    let related = render_related(
        &related_chips(store, theme, prop),
        state.accordion.is_wired(&prop.id),
    );

    format!(
        r#"<div class="{classes}" id="pc-{id}">
  <div class="prop-header" id="ph-{id}" role="button" tabindex="0" aria-expanded="{expanded}" aria-controls="pb-{id}">
    <div class="prop-number" aria-hidden="true">{number}</div>
    <div class="prop-text">
      <div class="prop-title">{title}{mel_badge}</div>
      <p class="prop-summary">{summary}</p>
    </div>
    <span class="prop-chevron" aria-hidden="true">⌄</span>
  </div>
  <div class="prop-body" id="pb-{id}" role="region" aria-labelledby="ph-{id}" style="max-height: {max_height}">
    <div class="prop-body-inner">
      <p class="prop-detail">{detail}</p>
{related}    </div>
  </div>
</div>
"#,
        expanded = open,
        max_height = if open { "none" } else { "0" },
        title = escape_html(&prop.title),
        summary = escape_html(&prop.summary),
        detail = escape_html(&prop.detail),
    )
}

fn render_related(chips: &[RelatedChip], wired: bool) -> String {
    if chips.is_empty() {
        return String::new();
    }
    let wired_attr = if wired { r#" data-wired="1""# } else { "" };
    let mut out = String::from(
        "      <div class=\"prop-related\">\n        <span class=\"related-label\">Voir aussi :</span>\n",
    );
    for chip in chips {
        let label = escape_html(&chip.label);
        let _ = writeln!(
            out,
            r#"        <span class="related-chip" data-theme-id="{}" data-prop-id="{}" role="link" tabindex="0" title="Voir aussi : {label}"{wired_attr}>🔗 {label}</span>"#,
            escape_html(&chip.theme_id),
            escape_html(&chip.prop_id),
        );
    }
    out.push_str("      </div>\n");
    out
}

#[cfg(test)]
mod tests {
    use programme_core::model::{Meta, Program, Proposition, Theme};
    use programme_core::store::DocumentStore;

    use super::{related_chips, render, CardState, RelatedChip};
    use crate::accordion::AccordionState;

    fn prop(id: &str, title: &str, related: &[&str]) -> Proposition {
        Proposition {
            id: id.to_owned(),
            title: title.to_owned(),
            summary: format!("Résumé {id}"),
            detail: format!("Détail {id}"),
            mel: false,
            related: related.iter().map(|r| (*r).to_owned()).collect(),
        }
    }

    fn store() -> DocumentStore {
        DocumentStore::new(Program {
            meta: Meta::default(),
            themes: vec![
                Theme {
                    id: "env".to_owned(),
                    title: "Environnement".to_owned(),
                    description: "Vert".to_owned(),
                    color: "#2e8b57".to_owned(),
                    icon: Some("🌳".to_owned()),
                    propositions: vec![
                        prop("compost", "Compost de quartier", &["arbres", "nowhere"]),
                        prop("arbres", "Mille arbres", &["velo"]),
                        Proposition {
                            mel: true,
                            ..prop("eau", "Eau <potable>", &[])
                        },
                    ],
                },
                Theme {
                    id: "mob".to_owned(),
                    title: "Mobilité".to_owned(),
                    propositions: vec![prop("velo", "Vélo-logistique", &[])],
                    ..Theme::default()
                },
            ],
        })
    }

    fn closed_render(store: &DocumentStore, theme_id: &str) -> String {
        let accordion = AccordionState::new();
        let theme = store.theme(theme_id).cloned().unwrap_or_default();
        render(
            store,
            &theme,
            CardState {
                accordion: &accordion,
                highlighted: None,
            },
        )
    }

    #[test]
    fn same_theme_chip_uses_bare_title_and_drops_dangling_ids() {
        let store = store();
        let theme = store.theme("env").cloned().unwrap_or_default();
        let chips = related_chips(&store, &theme, &theme.propositions[0]);
        assert_eq!(
            chips,
            vec![RelatedChip {
                theme_id: "env".to_owned(),
                prop_id: "arbres".to_owned(),
                label: "Mille arbres".to_owned(),
            }]
        );
    }

    #[test]
    fn cross_theme_chip_is_prefixed_with_theme_title() {
        let store = store();
        let theme = store.theme("env").cloned().unwrap_or_default();
        let chips = related_chips(&store, &theme, &theme.propositions[1]);
        assert_eq!(chips.len(), 1);
        assert_eq!(chips[0].label, "Mobilité → Vélo-logistique");
        assert_eq!(chips[0].theme_id, "mob");
    }

    #[test]
    fn render_numbers_cards_in_order_with_header() {
        let store = store();
        let html = closed_render(&store, "env");
        assert!(html.contains(r#"<h1 class="theme-header-title">Environnement</h1>"#));
        assert!(html.contains("3 propositions"));
        assert!(html.contains("--theme-rgb: 46,139,87"));
        let one = html.find(r#"<div class="prop-number" aria-hidden="true">1</div>"#);
        let three = html.find(r#"<div class="prop-number" aria-hidden="true">3</div>"#);
        assert!(one < three);
        assert!(html.find("pc-compost") < html.find("pc-arbres"));
        assert!(html.find("pc-arbres") < html.find("pc-eau"));
    }

    #[test]
    fn render_escapes_and_badges() {
        let store = store();
        let html = closed_render(&store, "env");
        assert!(html.contains("Eau &lt;potable&gt;<span class=\"mel-badge\""));
        assert_eq!(html.matches("mel-badge").count(), 1);
    }

    #[test]
    fn one_chip_rendered_for_one_valid_related_id() {
        let store = store();
        let html = closed_render(&store, "env");
        let compost = html
            .split(r#"id="pc-arbres""#)
            .next()
            .unwrap_or_default()
            .to_owned();
        assert_eq!(compost.matches("class=\"related-chip\"").count(), 1);
        assert!(compost.contains("🔗 Mille arbres</span>"));
        assert!(!compost.contains("nowhere"));
    }

    #[test]
    fn propositions_without_related_have_no_block() {
        let store = store();
        let html = closed_render(&store, "mob");
        assert!(!html.contains("prop-related"));
        assert!(html.contains("1 proposition<"));
    }

    #[test]
    fn open_and_highlighted_state_is_reflected() {
        let store = store();
        let theme = store.theme("env").cloned().unwrap_or_default();
        let mut accordion = AccordionState::new();
        accordion.open("compost");
        let html = render(
            &store,
            &theme,
            CardState {
                accordion: &accordion,
                highlighted: Some("compost"),
            },
        );
        assert!(html.contains(r#"<div class="prop-card open highlighted" id="pc-compost">"#));
        assert!(html.contains(r#"id="ph-compost" role="button" tabindex="0" aria-expanded="true""#));
        assert!(html.contains(r#"id="ph-arbres" role="button" tabindex="0" aria-expanded="false""#));
        assert!(html.contains(r#"data-wired="1""#));
        assert_eq!(html.matches("max-height: none").count(), 1);
    }
}
