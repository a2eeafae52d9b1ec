//! Text helpers shared by every renderer: HTML escaping, query highlighting,
//! case folding, and theme colour conversion.

use std::fmt::Write as _;

/// Triplet used when a theme colour is not a `#RRGGBB` hex code.
pub const NEUTRAL_RGB: &str = "100,100,100";

/// Escape the five HTML-reserved characters.
#[must_use]
pub fn escape_html(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for ch in value.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#x27;"),
            _ => out.push(ch),
        }
    }
    out
}

/// Convert `#RRGGBB` (leading `#` optional, any case) to `"r,g,b"`.
#[must_use]
pub fn hex_to_rgb(hex: &str) -> String {
    let digits = hex.strip_prefix('#').unwrap_or(hex);
    if digits.len() != 6 || !digits.chars().all(|ch| ch.is_ascii_hexdigit()) {
        return NEUTRAL_RGB.to_owned();
    }
    let channel = |range: std::ops::Range<usize>| u8::from_str_radix(&digits[range], 16).ok();
    match (channel(0..2), channel(2..4), channel(4..6)) {
        (Some(r), Some(g), Some(b)) => format!("{r},{g},{b}"),
        _ => NEUTRAL_RGB.to_owned(),
    }
}

/// Simple per-character lowercase. Characters whose lowercase form expands to
/// several code points are kept as-is so folded text stays index-aligned
/// with the original. No accent folding: `é` and `e` stay distinct.
#[must_use]
pub fn fold_char(ch: char) -> char {
    let mut lower = ch.to_lowercase();
    match (lower.next(), lower.next()) {
        (Some(folded), None) => folded,
        _ => ch,
    }
}

#[must_use]
pub fn fold(value: &str) -> String {
    value.chars().map(fold_char).collect()
}

/// Case-insensitive substring test. `folded_query` must already be folded.
#[must_use]
pub fn contains_folded(haystack: &str, folded_query: &str) -> bool {
    fold(haystack).contains(folded_query)
}

/// Escape `text`, wrapping every case-insensitive occurrence of `query` in
/// `<mark>`. Matches are found left to right without overlap.
#[must_use]
pub fn highlight(text: &str, query: &str) -> String {
    if text.is_empty() || query.is_empty() {
        return escape_html(text);
    }

    let chars: Vec<char> = text.chars().collect();
    let folded: Vec<char> = chars.iter().copied().map(fold_char).collect();
    let needle: Vec<char> = query.chars().map(fold_char).collect();

    let mut out = String::with_capacity(text.len() + 16);
    let mut plain_start = 0;
    let mut idx = 0;
    while idx + needle.len() <= folded.len() {
        if folded[idx..idx + needle.len()] == needle[..] {
            let before: String = chars[plain_start..idx].iter().collect();
            let hit: String = chars[idx..idx + needle.len()].iter().collect();
            out.push_str(&escape_html(&before));
            let _ = write!(out, "<mark>{}</mark>", escape_html(&hit));
            idx += needle.len();
            plain_start = idx;
        } else {
            idx += 1;
        }
    }
    let rest: String = chars[plain_start..].iter().collect();
    out.push_str(&escape_html(&rest));
    out
}

/// `"s"` when `count` calls for a plural noun in French display strings.
#[must_use]
pub fn plural_suffix(count: usize) -> &'static str {
    if count > 1 {
        "s"
    } else {
        ""
    }
}
