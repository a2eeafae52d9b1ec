//! Read-only document store and programme sources.

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::LoadError;
use crate::model::{Meta, Program, Proposition, Theme};

/// Where the programme document comes from.
pub trait ProgramSource {
    /// Human-readable origin used in logs and error messages.
    fn describe(&self) -> String;

    /// Fetch the raw JSON document.
    fn fetch(&self) -> Result<String, LoadError>;
}

/// Programme read from a file on disk.
#[derive(Debug, Clone)]
pub struct FileSource {
    path: PathBuf,
}

impl FileSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl ProgramSource for FileSource {
    fn describe(&self) -> String {
        self.path.display().to_string()
    }

    fn fetch(&self) -> Result<String, LoadError> {
        fs::read_to_string(&self.path).map_err(|source| LoadError::Io {
            path: self.path.clone(),
            source,
        })
    }
}

/// Programme held in memory (tests, embedding).
#[derive(Debug, Clone)]
pub struct InlineSource {
    json: String,
}

impl InlineSource {
    pub fn new(json: impl Into<String>) -> Self {
        Self { json: json.into() }
    }
}

impl ProgramSource for InlineSource {
    fn describe(&self) -> String {
        "inline programme".to_owned()
    }

    fn fetch(&self) -> Result<String, LoadError> {
        Ok(self.json.clone())
    }
}

/// A proposition together with the theme that owns it.
#[derive(Debug, Clone, Copy)]
pub struct PropRef<'a> {
    pub theme: &'a Theme,
    pub proposition: &'a Proposition,
}

/// The loaded programme plus a global proposition index.
///
/// The document is never mutated after construction.
#[derive(Debug, Clone)]
pub struct DocumentStore {
    program: Program,
    prop_index: HashMap<String, (usize, usize)>,
}

impl DocumentStore {
    #[must_use]
    pub fn new(program: Program) -> Self {
        let mut prop_index = HashMap::new();
        for (theme_idx, theme) in program.themes.iter().enumerate() {
            for (prop_idx, prop) in theme.propositions.iter().enumerate() {
                if prop_index.contains_key(&prop.id) {
                    tracing::warn!(
                        prop_id = %prop.id,
                        theme_id = %theme.id,
                        "duplicate proposition id; keeping the first occurrence"
                    );
                    continue;
                }
                prop_index.insert(prop.id.clone(), (theme_idx, prop_idx));
            }
        }
        Self {
            program,
            prop_index,
        }
    }

    /// Fetch and decode a programme from `source`.
    pub fn load(source: &dyn ProgramSource) -> Result<Self, LoadError> {
        let raw = source.fetch()?;
        let store = Self::from_json(&raw, &source.describe())?;
        tracing::info!(
            source = %source.describe(),
            themes = store.themes().len(),
            propositions = store.proposition_count(),
            "programme loaded"
        );
        for (owner, missing) in store.dangling_references() {
            tracing::debug!(%owner, %missing, "related proposition does not resolve");
        }
        Ok(store)
    }

    pub fn from_json(raw: &str, source_name: &str) -> Result<Self, LoadError> {
        let program: Program =
            serde_json::from_str(raw).map_err(|source| LoadError::Parse {
                source_name: source_name.to_owned(),
                source,
            })?;
        Ok(Self::new(program))
    }

    #[must_use]
    pub fn program(&self) -> &Program {
        &self.program
    }

    #[must_use]
    pub fn meta(&self) -> &Meta {
        &self.program.meta
    }

    #[must_use]
    pub fn themes(&self) -> &[Theme] {
        &self.program.themes
    }

    #[must_use]
    pub fn theme(&self, theme_id: &str) -> Option<&Theme> {
        self.program.themes.iter().find(|theme| theme.id == theme_id)
    }

    /// Global lookup of a proposition and its owning theme.
    #[must_use]
    pub fn find_prop(&self, prop_id: &str) -> Option<PropRef<'_>> {
        let (theme_idx, prop_idx) = *self.prop_index.get(prop_id)?;
        let theme = self.program.themes.get(theme_idx)?;
        let proposition = theme.propositions.get(prop_idx)?;
        Some(PropRef { theme, proposition })
    }

    #[must_use]
    pub fn proposition_count(&self) -> usize {
        self.program
            .themes
            .iter()
            .map(|theme| theme.propositions.len())
            .sum()
    }

    /// All propositions in document order, each with its theme.
    pub fn propositions(&self) -> impl Iterator<Item = PropRef<'_>> {
        self.program.themes.iter().flat_map(|theme| {
            theme
                .propositions
                .iter()
                .map(move |proposition| PropRef { theme, proposition })
        })
    }

    /// `(owner prop id, missing related id)` pairs for every dangling link.
    #[must_use]
    pub fn dangling_references(&self) -> Vec<(String, String)> {
        let mut out = Vec::new();
        for entry in self.propositions() {
            for related in &entry.proposition.related {
                if !self.prop_index.contains_key(related) {
                    out.push((entry.proposition.id.clone(), related.clone()));
                }
            }
        }
        out
    }
}
