//! Substring search over the whole programme, grouped by theme.
//!
//! Matching is case-insensitive over a proposition's title, summary, detail
//! and the title of the theme that owns it. Groups follow programme order and
//! propositions keep their order inside a theme; themes without a hit are
//! omitted.

use std::fmt::Write as _;

use serde::Serialize;

use programme_core::model::{Proposition, Theme};
use programme_core::store::DocumentStore;
use programme_core::text::{contains_folded, escape_html, fold, highlight};
use programme_web_adapter::timer::TimerId;


/// Matching propositions of one theme.
#[derive(Debug, Clone)]
pub struct SearchGroup<'a> {
    pub theme: &'a Theme,
    pub propositions: Vec<&'a Proposition>,
}

/// Run `query` (already trimmed) against every proposition.
#[must_use]
pub fn perform_search<'a>(store: &'a DocumentStore, query: &str) -> Vec<SearchGroup<'a>> {
    let needle = fold(query);
    let groups: Vec<SearchGroup<'a>> = store
        .themes()
        .iter()
        .filter_map(|theme| {
            let theme_hit = contains_folded(&theme.title, &needle);
            let propositions: Vec<&Proposition> = theme
                .propositions
                .iter()
                .filter(|prop| theme_hit || proposition_matches(prop, &needle))
                .collect();
            (!propositions.is_empty()).then_some(SearchGroup {
                theme,
                propositions,
            })
        })
        .collect();
    tracing::debug!(
        query,
        groups = groups.len(),
        hits = groups.iter().map(|g| g.propositions.len()).sum::<usize>(),
        "search executed"
    );
    groups
}

fn proposition_matches(prop: &Proposition, needle: &str) -> bool {
    [&prop.title, &prop.summary, &prop.detail]
        .into_iter()
        .any(|field| contains_folded(field, needle))
}

/// Dropdown markup for `groups`. The query is highlighted in result titles.
#[must_use]
pub fn render_dropdown(groups: &[SearchGroup<'_>], query: &str) -> String {
    if groups.is_empty() {
        return format!(
            r#"<div class="search-no-results">Aucun résultat pour <strong>{}</strong></div>"#,
            escape_html(query)
        );
    }

    let mut out = String::new();
    for group in groups {
        let theme = group.theme;
        let _ = writeln!(
            out,
            r#"<div class="search-group">
  <div class="search-group-label" style="--group-color: {color}">{icon} {title}</div>"#,
            color = escape_html(&theme.color),
            icon = escape_html(theme.icon.as_deref().unwrap_or_default()),
            title = escape_html(&theme.title),
        );
        for prop in &group.propositions {
            let _ = writeln!(
                out,
                r#"  <div class="search-result-item" data-theme-id="{theme_id}" data-prop-id="{prop_id}" style="--item-color: {color}" role="option" tabindex="0">
    <div class="search-result-title">{title}</div>
    <div class="search-result-summary">{summary}</div>
  </div>"#,
                theme_id = escape_html(&theme.id),
                prop_id = escape_html(&prop.id),
                color = escape_html(&theme.color),
                title = highlight(&prop.title, query),
                summary = escape_html(&prop.summary),
            );
        }
        out.push_str("</div>\n");
    }
    out
}

/// Serializable search result, used by the CLI `--json` output.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SearchReport {
    pub query: String,
    pub total: usize,
    pub groups: Vec<GroupReport>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GroupReport {
    pub theme_id: String,
    pub theme_title: String,
    pub propositions: Vec<HitReport>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HitReport {
    pub id: String,
    pub title: String,
    pub summary: String,
}

impl SearchReport {
    #[must_use]
    pub fn from_groups(query: &str, groups: &[SearchGroup<'_>]) -> Self {
        let groups: Vec<GroupReport> = groups
            .iter()
            .map(|group| GroupReport {
                theme_id: group.theme.id.clone(),
                theme_title: group.theme.title.clone(),
                propositions: group
                    .propositions
                    .iter()
                    .map(|prop| HitReport {
                        id: prop.id.clone(),
                        title: prop.title.clone(),
                        summary: prop.summary.clone(),
                    })
                    .collect(),
            })
            .collect();
        Self {
            query: query.to_owned(),
            total: groups.iter().map(|g| g.propositions.len()).sum(),
            groups,
        }
    }
}

/// State of the search input in the navbar.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchBox {
    value: String,
    focused: bool,
    pending: Option<TimerId>,
}

impl SearchBox {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Raw input value as typed.
    #[must_use]
    pub fn value(&self) -> &str {
        &self.value
    }

    #[must_use]
    pub fn query(&self) -> &str {
        self.value.trim()
    }

    /// The clear button is active iff the trimmed query is non-empty.
    #[must_use]
    pub fn is_clear_active(&self) -> bool {
        !self.query().is_empty()
    }

    #[must_use]
    pub fn is_focused(&self) -> bool {
        self.focused
    }

    pub fn focus(&mut self) {
        self.focused = true;
    }

    pub fn blur(&mut self) {
        self.focused = false;
    }

    /// Record a keystroke. Returns the debounce timer it supersedes.
    pub fn input(&mut self, value: &str) -> Option<TimerId> {
        value.clone_into(&mut self.value);
        self.focused = true;
        self.pending.take()
    }

    pub fn set_pending(&mut self, id: TimerId) {
        self.pending = Some(id);
    }

    /// Forget the debounce timer once it has fired.
    pub fn settle(&mut self, id: TimerId) {
        if self.pending == Some(id) {
            self.pending = None;
        }
    }

    #[must_use]
    pub fn pending(&self) -> Option<TimerId> {
        self.pending
    }

    /// Empty the query. Returns the pending debounce timer, if any.
    pub fn clear(&mut self) -> Option<TimerId> {
        self.value.clear();
        self.pending.take()
    }

    /// Whether `query` is long enough to be searched.
    #[must_use]
    pub fn is_searchable(query: &str, min_chars: usize) -> bool {
        query.chars().count() >= min_chars
    }
}

#[cfg(test)]
mod tests {
    use programme_core::model::{Meta, Program, Proposition, Theme};
    use programme_core::store::DocumentStore;
    use programme_web_adapter::timer::TimerQueue;

    use super::{perform_search, render_dropdown, SearchBox, SearchReport};

    fn prop(id: &str, title: &str, summary: &str) -> Proposition {
        Proposition {
            id: id.to_owned(),
            title: title.to_owned(),
            summary: summary.to_owned(),
            ..Proposition::default()
        }
    }

    fn store() -> DocumentStore {
        DocumentStore::new(Program {
            meta: Meta::default(),
            themes: vec![
                Theme {
                    id: "env".to_owned(),
                    title: "Environnement".to_owned(),
                    color: "#2e8b57".to_owned(),
                    icon: Some("🌳".to_owned()),
                    propositions: vec![
                        prop("compost", "Compost de quartier", "Des bacs partout"),
                        prop("arbres", "Mille arbres", "Planter"),
                    ],
                    ..Theme::default()
                },
                Theme {
                    id: "mob".to_owned(),
                    title: "Mobilité".to_owned(),
                    propositions: vec![
                        prop("velo", "Vélo-logistique", "Livraisons <douces>"),
                        Proposition {
                            detail: "Navettes le dimanche".to_owned(),
                            ..prop("bus", "Bus", "")
                        },
                    ],
                    ..Theme::default()
                },
            ],
        })
    }

    #[test]
    fn uppercase_accented_query_matches_once() {
        let store = store();
        let groups = perform_search(&store, "VÉLO");
        assert_eq!(groups.len(), 1);
        assert_eq!(groups[0].theme.id, "mob");
        assert_eq!(groups[0].propositions.len(), 1);
        assert_eq!(groups[0].propositions[0].id, "velo");
    }

    #[test]
    fn accents_are_not_folded() {
        let store = store();
        assert!(perform_search(&store, "velo").is_empty());
    }

    #[test]
    fn theme_title_match_includes_every_proposition() {
        let store = store();
        let groups = perform_search(&store, "environ");
        assert_eq!(groups.len(), 1);
        assert_eq!(groups[0].propositions.len(), 2);
    }

    #[test]
    fn detail_matches_and_groups_keep_programme_order() {
        let store = store();
        let groups = perform_search(&store, "an");
        let ids: Vec<&str> = groups.iter().map(|g| g.theme.id.as_str()).collect();
        assert_eq!(ids, vec!["env", "mob"]);
        let mob: Vec<&str> = groups[1].propositions.iter().map(|p| p.id.as_str()).collect();
        assert_eq!(mob, vec!["bus"]);
    }

    #[test]
    fn dropdown_highlights_titles_and_escapes_summaries() {
        let store = store();
        let groups = perform_search(&store, "vélo");
        let html = render_dropdown(&groups, "vélo");
        assert!(html.contains("<mark>Vélo</mark>-logistique"));
        assert!(html.contains("Livraisons &lt;douces&gt;"));
        assert!(html.contains(r#"data-theme-id="mob" data-prop-id="velo""#));
        assert!(html.contains(r#""> Mobilité</div>"#));
        assert!(!html.contains("📌"));
    }

    #[test]
    fn empty_result_names_the_query() {
        let html = render_dropdown(&[], "<zzz>");
        assert_eq!(
            html,
            r#"<div class="search-no-results">Aucun résultat pour <strong>&lt;zzz&gt;</strong></div>"#
        );
    }

    #[test]
    fn report_counts_hits() {
        let store = store();
        let groups = perform_search(&store, "an");
        let report = SearchReport::from_groups("an", &groups);
        assert_eq!(report.total, 2);
        assert_eq!(report.groups[0].theme_title, "Environnement");
    }

    #[test]
    fn search_box_trims_and_supersedes_debounce() {
        let mut timers = TimerQueue::new();
        let mut search = SearchBox::new();
        assert_eq!(search.input(" v"), None);
        let first = timers.schedule(160, ());
        search.set_pending(first);
        assert!(search.is_clear_active());
        assert_eq!(search.query(), "v");

        assert_eq!(search.input("   "), Some(first));
        assert!(!search.is_clear_active());
        assert_eq!(search.pending(), None);
    }

    #[test]
    fn min_length_counts_characters() {
        assert!(!SearchBox::is_searchable("é", 2));
        assert!(SearchBox::is_searchable("éa", 2));
    }
}
