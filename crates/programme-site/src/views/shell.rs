//! Static page shell around the dynamic regions: navbar with search,
//! breadcrumb, root content, footer.

use std::fmt::Write as _;

use programme_core::model::Meta;
use programme_core::text::escape_html;
use programme_web_adapter::surface::{Region, Surface};

use super::home::DEFAULT_LIST_LABEL;

/// Browser tab title.
#[must_use]
pub fn document_title(meta: &Meta) -> String {
    match meta.list.as_deref().filter(|list| !list.is_empty()) {
        Some(list) => format!("{list} — Programme 2026"),
        None => DEFAULT_LIST_LABEL.to_owned(),
    }
}

/// `"<list> · <candidate>"`, `"<list>"`, or empty.
#[must_use]
pub fn footer_list(meta: &Meta) -> String {
    match (
        meta.list.as_deref().filter(|list| !list.is_empty()),
        meta.candidate.as_deref().filter(|c| !c.is_empty()),
    ) {
        (Some(list), Some(candidate)) => format!("{list} · {candidate}"),
        (Some(list), None) => list.to_owned(),
        (None, _) => String::new(),
    }
}

/// Search control state mirrored into the shell.
#[derive(Debug, Clone, Copy, Default)]
pub struct SearchChrome<'a> {
    pub value: &'a str,
    pub clear_active: bool,
    pub focused: bool,
}

/// Serialise the whole page: shell plus every region of `surface`.
#[must_use]
pub fn render_page(surface: &Surface, brand: &str, search: SearchChrome<'_>) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "<!doctype html>");
    let _ = writeln!(out, "<html lang=\"fr\">");
    let _ = writeln!(out, "<head>");
    let _ = writeln!(out, "  <meta charset=\"utf-8\">");
    let _ = writeln!(
        out,
        "  <meta name=\"viewport\" content=\"width=device-width, initial-scale=1\">"
    );
    let _ = writeln!(out, "  <title>{}</title>", escape_html(surface.title()));
    let _ = writeln!(out, "  <link rel=\"stylesheet\" href=\"style.css\">");
    let _ = writeln!(out, "</head>");
    let _ = writeln!(out, "<body>");

    let _ = writeln!(out, "<nav class=\"navbar\">");
    let _ = writeln!(
        out,
        "  <button id=\"nav-brand-btn\" class=\"nav-brand\">{}</button>",
        escape_html(brand)
    );
    let _ = writeln!(out, "  <div class=\"nav-search-wrapper\">");
    let _ = writeln!(
        out,
        "    <input id=\"search-input\" type=\"search\" placeholder=\"Rechercher une mesure…\" autocomplete=\"off\" value=\"{}\"{}>",
        escape_html(search.value),
        if search.focused { " autofocus" } else { "" }
    );
    let _ = writeln!(
        out,
        "    <button id=\"search-clear\" class=\"{}\" aria-label=\"Effacer la recherche\">✕</button>",
        class_list("search-clear", search.clear_active.then_some("active"))
    );
    let _ = writeln!(
        out,
        "    <div id=\"{}\" class=\"{}\" role=\"listbox\">{}</div>",
        Region::SearchDropdown.element_id(),
        class_list(
            "search-dropdown",
            surface
                .is_visible(Region::SearchDropdown)
                .then_some("visible")
        ),
        surface.html(Region::SearchDropdown)
    );
    let _ = writeln!(out, "  </div>");
    let _ = writeln!(
        out,
        "  <button id=\"nav-home-btn\" class=\"nav-home\">Accueil</button>"
    );
    let _ = writeln!(out, "</nav>");

    let _ = writeln!(
        out,
        "<div id=\"{}\" class=\"breadcrumb\">{}</div>",
        Region::Breadcrumb.element_id(),
        surface.html(Region::Breadcrumb)
    );

    let style = surface.transition().inline_style();
    if style.is_empty() {
        let _ = writeln!(out, "<main id=\"{}\">", Region::App.element_id());
    } else {
        let _ = writeln!(
            out,
            "<main id=\"{}\" style=\"{style}\">",
            Region::App.element_id()
        );
    }
    out.push_str(surface.html(Region::App));
    let _ = writeln!(out, "</main>");

    let _ = writeln!(out, "<footer class=\"site-footer\">");
    for region in [Region::FooterList, Region::FooterCity, Region::FooterElection] {
        let _ = writeln!(
            out,
            "  <span id=\"{}\">{}</span>",
            region.element_id(),
            escape_html(surface.html(region))
        );
    }
    let _ = writeln!(out, "</footer>");
    if let Some(target) = surface.scroll_target() {
        let _ = writeln!(
            out,
            "<script>document.getElementById({}).scrollIntoView({{block: 'center'}});</script>",
            serde_json::Value::String(target.to_owned())
        );
    }
    let _ = writeln!(out, "</body>");
    let _ = writeln!(out, "</html>");
    out
}

fn class_list(base: &str, extra: Option<&str>) -> String {
    match extra {
        Some(extra) => format!("{base} {extra}"),
        None => base.to_owned(),
    }
}
