//! Placeholder states shown in the root region before (or instead of) a view.

use programme_core::text::escape_html;

#[must_use]
pub fn loading() -> String {
    r#"<div class="loading-state">
  <div class="spinner"></div>
  <span class="loading-text">Chargement du programme…</span>
</div>
"#
    .to_owned()
}

/// Full-page error panel for a programme that could not be loaded.
/// `data_file` is the name shown to the reader.
#[must_use]
pub fn load_error(data_file: &str) -> String {
    let file = escape_html(data_file);
    format!(
        r#"<div class="error-state">
  <div class="error-icon">⚠️</div>
  <h2 class="error-title">Impossible de charger le programme</h2>
  <p class="error-body">
    Le fichier <code>{file}</code> est introuvable ou invalide.<br>
    Ce site nécessite un serveur HTTP local (les navigateurs bloquent <code>fetch</code> en <code>file://</code>).
  </p>
  <code class="error-hint">python3 -m http.server 8000 &nbsp;·&nbsp; npx serve &nbsp;·&nbsp; php -S localhost:8000</code>
</div>
"#
    )
}

#[cfg(test)]
mod tests {
    use super::{load_error, loading};

    #[test]
    fn loading_state_snapshot() {
        assert!(loading().contains("Chargement du programme…"));
    }

    #[test]
    fn error_panel_names_file_and_server_hints() {
        let html = load_error("programme.json");
        assert!(html.contains("Impossible de charger le programme"));
        assert!(html.contains("<code>programme.json</code>"));
        assert!(html.contains("python3 -m http.server 8000"));
    }

    #[test]
    fn error_panel_escapes_file_name() {
        assert!(load_error("<x>.json").contains("<code>&lt;x&gt;.json</code>"));
    }
}
