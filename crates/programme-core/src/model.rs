//! Programme document model.
//!
//! Every field except the ids is optional in the source JSON: a missing or
//! `null` value decodes to its default (empty string, `false`, empty list)
//! so renderers never have to deal with absent data.

use serde::{Deserialize, Deserializer, Serialize};

/// Root document describing the full electoral platform.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Program {
    #[serde(deserialize_with = "null_as_default")]
    pub meta: Meta,
    #[serde(deserialize_with = "null_as_default")]
    pub themes: Vec<Theme>,
}

/// Display strings for the list and its candidate.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Meta {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub list: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub candidate: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub election: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tagline: Option<String>,
}

/// Top-level policy category. `id` is the key used in the location fragment.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Theme {
    #[serde(deserialize_with = "null_as_default")]
    pub id: String,
    #[serde(deserialize_with = "null_as_default")]
    pub title: String,
    #[serde(deserialize_with = "null_as_default")]
    pub description: String,
    #[serde(deserialize_with = "null_as_default")]
    pub color: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
    #[serde(deserialize_with = "null_as_default")]
    pub propositions: Vec<Proposition>,
}

impl Theme {
    /// Returns `true` if a proposition with `prop_id` belongs to this theme.
    #[must_use]
    pub fn contains(&self, prop_id: &str) -> bool {
        self.propositions.iter().any(|prop| prop.id == prop_id)
    }

    #[must_use]
    pub fn proposition(&self, prop_id: &str) -> Option<&Proposition> {
        self.propositions.iter().find(|prop| prop.id == prop_id)
    }
}

/// A single policy pledge, globally identified by `id`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Proposition {
    #[serde(deserialize_with = "null_as_default")]
    pub id: String,
    #[serde(deserialize_with = "null_as_default")]
    pub title: String,
    #[serde(deserialize_with = "null_as_default")]
    pub summary: String,
    #[serde(deserialize_with = "null_as_default")]
    pub detail: String,
    /// Falls under the intermunicipal authority's competence (badge only).
    #[serde(deserialize_with = "null_as_default")]
    pub mel: bool,
    #[serde(deserialize_with = "null_as_default")]
    pub related: Vec<String>,
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}
