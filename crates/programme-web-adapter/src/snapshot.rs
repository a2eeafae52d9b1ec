//! Snapshot helpers for surface-based render abstractions.

use crate::surface::{Region, Surface};

/// Collapse markup into one trimmed, non-empty line per source line so
/// snapshots ignore indentation.
#[must_use]
pub fn normalize_markup(markup: &str) -> String {
    markup
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .collect::<Vec<_>>()
        .join("\n")
}

/// Assert a stable markup snapshot for one surface region.
///
/// Both sides are normalised with [`normalize_markup`].
pub fn assert_region_snapshot(label: &str, surface: &Surface, region: Region, expected: &str) {
    let expected = normalize_markup(expected);
    let got = normalize_markup(surface.html(region));
    assert_eq!(
        got, expected,
        "region snapshot mismatch ({label}, #{})\n--- expected\n{expected}\n--- got\n{got}",
        region.element_id(),
    );
}
