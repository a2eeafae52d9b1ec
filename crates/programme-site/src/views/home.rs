//! Home view: hero, theme grid, random-proposition button, share block.

use std::fmt::Write as _;

use programme_core::config::ShareConfig;
use programme_core::model::{Meta, Theme};
use programme_core::store::DocumentStore;
use programme_core::text::{escape_html, hex_to_rgb, plural_suffix};

use super::theme_icon;

pub const DEFAULT_LIST_LABEL: &str = "Programme Municipal";

/// Element id of a theme card.
#[must_use]
pub fn card_id(theme_id: &str) -> String {
    format!("tc-{theme_id}")
}

#[must_use]
pub fn render(store: &DocumentStore, share: &ShareConfig) -> String {
    let themes = store.themes();
    let mut out = render_hero(store.meta());

    let _ = writeln!(
        out,
        r#"<p class="themes-section-title">Nos {} thèmes de programme</p>"#,
        themes.len()
    );
    out.push_str("<div class=\"themes-grid\" role=\"list\">\n");
    for theme in themes {
        out.push_str(&render_card(theme));
    }
    out.push_str("</div>\n");

    out.push_str(
        r#"<div class="random-prop-section">
  <button id="btn-random-prop" class="btn-random" aria-label="Découvrir une mesure aléatoire">
    <span class="btn-random-icon" aria-hidden="true">🎲</span>
    Découvrir une mesure au hasard
  </button>
</div>
"#,
    );

    let site = escape_html(&share.site_url);
    let _ = write!(
        out,
        r#"<div class="share-section">
  <h2 class="share-title">Partagez le programme !</h2>
  <div class="qr-container">
    <img src="{src}" alt="QR Code vers {site}" class="qr-code-img" loading="lazy">
  </div>
  <p class="share-hint">Scannez pour partager {site}</p>
</div>
"#,
        src = escape_html(&share.qr_image_url()),
    );
    out
}

fn render_hero(meta: &Meta) -> String {
    let list = meta.list.as_deref().unwrap_or(DEFAULT_LIST_LABEL);
    let candidate = meta
        .candidate
        .as_deref()
        .filter(|name| !name.is_empty())
        .map(|name| format!("avec {}", escape_html(name)))
        .unwrap_or_default();
    let tagline = meta
        .tagline
        .as_deref()
        .filter(|tagline| !tagline.is_empty())
        .map(|tagline| format!("\n      <span class=\"hero-tag\">{}</span>", escape_html(tagline)))
        .unwrap_or_default();

    format!(
        r#"<section class="home-hero">
  <div class="hero-accent" aria-hidden="true"></div>
  <div class="hero-content">
    <div class="hero-list">{list}</div>
    <div class="hero-candidate">{candidate}</div>
    <div class="hero-tags">
      <span class="hero-tag hero-tag-accent">📍 {city}</span>
      <span class="hero-tag">{election}</span>{tagline}
    </div>
  </div>
</section>
"#,
        list = escape_html(list),
        city = escape_html(meta.city.as_deref().unwrap_or_default()),
        election = escape_html(meta.election.as_deref().unwrap_or_default()),
    )
}

/// Compact horizontal card for one theme.
#[must_use]
pub fn render_card(theme: &Theme) -> String {
    let count = theme.propositions.len();
    let title = escape_html(&theme.title);
    let color = escape_html(&theme.color);
    format!(
        r#"<div class="theme-card" id="{id}" role="listitem" tabindex="0" aria-label="{title} — {count} proposition{plural}" style="--card-color: {color}; --card-rgb: {rgb}">
  <div class="card-icon-wrap" aria-hidden="true">{icon}</div>
  <div class="card-body">
    <div class="card-title">{title}</div>
    <div class="card-desc">{desc}</div>
  </div>
  <span class="card-count">{count}</span>
</div>
"#,
        id = escape_html(&card_id(&theme.id)),
        plural = plural_suffix(count),
        rgb = hex_to_rgb(&theme.color),
        icon = theme_icon(theme.icon.as_deref()),
        desc = escape_html(&theme.description),
    )
}

#[cfg(test)]
mod tests {
    use programme_core::config::ShareConfig;
    use programme_core::model::{Meta, Program, Proposition, Theme};
    use programme_core::store::DocumentStore;

    use super::{render, render_card};

    fn theme(id: &str, props: usize) -> Theme {
        Theme {
            id: id.to_owned(),
            title: format!("Thème {id}"),
            description: "Une description".to_owned(),
            color: "#e92e6c".to_owned(),
            icon: Some("🌳".to_owned()),
            propositions: (0..props)
                .map(|i| Proposition {
                    id: format!("{id}-{i}"),
                    ..Proposition::default()
                })
                .collect(),
        }
    }

    #[test]
    fn zero_themes_render_empty_grid() {
        let store = DocumentStore::new(Program::default());
        let html = render(&store, &ShareConfig::default());
        assert!(html.contains("Nos 0 thèmes de programme"));
        assert!(html.contains("<div class=\"themes-grid\" role=\"list\">\n</div>"));
        assert!(!html.contains("theme-card"));
        assert!(html.contains(r#"<div class="hero-list">Programme Municipal</div>"#));
    }

    #[test]
    fn hero_uses_meta_and_escapes_it() {
        let store = DocumentStore::new(Program {
            meta: Meta {
                list: Some("Wasquehal <Vivante>".to_owned()),
                candidate: Some("Benoît".to_owned()),
                city: Some("Wasquehal".to_owned()),
                election: Some("Municipales 2026".to_owned()),
                tagline: Some("Ensemble".to_owned()),
            },
            themes: vec![],
        });
        let html = render(&store, &ShareConfig::default());
        assert!(html.contains("Wasquehal &lt;Vivante&gt;"));
        assert!(html.contains(r#"<div class="hero-candidate">avec Benoît</div>"#));
        assert!(html.contains("📍 Wasquehal"));
        assert!(html.contains(r#"<span class="hero-tag">Ensemble</span>"#));
    }

    #[test]
    fn missing_tagline_renders_no_tag() {
        let store = DocumentStore::new(Program::default());
        let html = render(&store, &ShareConfig::default());
        assert_eq!(html.matches("class=\"hero-tag\"").count(), 1);
        assert!(html.contains(r#"<div class="hero-candidate"></div>"#));
    }

    #[test]
    fn empty_candidate_is_treated_as_absent() {
        let store = DocumentStore::new(Program {
            meta: Meta {
                candidate: Some(String::new()),
                ..Meta::default()
            },
            themes: vec![],
        });
        let html = render(&store, &ShareConfig::default());
        assert!(html.contains(r#"<div class="hero-candidate"></div>"#));
        assert!(!html.contains("avec"));
    }

    #[test]
    fn card_carries_count_color_and_label() {
        let html = render_card(&theme("env", 3));
        assert!(html.contains(r#"id="tc-env""#));
        assert!(html.contains(r#"aria-label="Thème env — 3 propositions""#));
        assert!(html.contains("--card-color: #e92e6c; --card-rgb: 233,46,108"));
        assert!(html.contains(r#"<span class="card-count">3</span>"#));
        assert!(html.contains("🌳"));
    }

    #[test]
    fn card_defaults_for_missing_fields() {
        let html = render_card(&Theme {
            id: "bare".to_owned(),
            ..Theme::default()
        });
        assert!(html.contains("📌"));
        assert!(html.contains("--card-rgb: 100,100,100"));
        assert!(html.contains("— 0 proposition\""));
    }

    #[test]
    fn single_proposition_is_singular() {
        let html = render_card(&theme("one", 1));
        assert!(html.contains("— 1 proposition\""));
    }

    #[test]
    fn share_block_embeds_qr_url() {
        let store = DocumentStore::new(Program::default());
        let html = render(&store, &ShareConfig::default());
        assert!(html.contains(
            "src=\"https://api.qrserver.com/v1/create-qr-code/?size=150x150&amp;data=http://wasquehal-vivante.fr/\""
        ));
        assert!(html.contains("Scannez pour partager http://wasquehal-vivante.fr/"));
    }

    #[test]
    fn cards_follow_theme_order() {
        let store = DocumentStore::new(Program {
            meta: Meta::default(),
            themes: vec![theme("b", 1), theme("a", 2)],
        });
        let html = render(&store, &ShareConfig::default());
        let b = html.find("tc-b").unwrap_or(usize::MAX);
        let a = html.find("tc-a").unwrap_or(0);
        assert!(b < a);
        assert!(html.contains("Nos 2 thèmes de programme"));
    }
}
