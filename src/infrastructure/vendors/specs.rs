//! # Specs Highlights
//!
//! Condenses a product's highlight bullets into a one-line summary.

/// Separator placed between kept highlights.
pub const HIGHLIGHT_SEPARATOR: &str = " · ";

const KEYWORDS: &[&str] = &[
    "ram",
    "rom",
    "storage",
    "display",
    "camera",
    "battery",
    "bionic",
    "snapdragon",
    "dimensity",
    "exynos",
    "tensor",
    "chip",
];

/// Returns true if a highlight line describes a headline spec.
#[must_use]
pub fn is_headline_spec(line: &str) -> bool {
    let lower = line.to_lowercase();
    KEYWORDS.iter().any(|k| lower.contains(k))
}

/// Joins the headline-spec lines, in order, with [`HIGHLIGHT_SEPARATOR`].
///
/// Returns `None` when nothing relevant remains.
///
/// # Examples
///
/// ```
/// use pricehawk::infrastructure::vendors::specs::summarize_highlights;
///
/// let summary = summarize_highlights([
///     "128 GB ROM",
///     "Free delivery",
///     "48MP Main Camera",
/// ]);
/// assert_eq!(summary.as_deref(), Some("128 GB ROM · 48MP Main Camera"));
/// ```
#[must_use]
pub fn summarize_highlights<I, S>(lines: I) -> Option<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let kept: Vec<String> = lines
        .into_iter()
        .map(|l| l.as_ref().trim().to_string())
        .filter(|l| !l.is_empty() && is_headline_spec(l))
        .collect();

    if kept.is_empty() {
        None
    } else {
        Some(kept.join(HIGHLIGHT_SEPARATOR))
    }
}
