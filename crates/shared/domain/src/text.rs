//! Text matching helpers.
//!
//! Name lookups across the CRM are case-insensitive and, for geographic
//! names, accent-insensitive. These helpers give every caller the same
//! folding rules.

use unicode_normalization::{char::is_combining_mark, UnicodeNormalization};

/// Lowercase and strip diacritics ("Égletons" -> "egletons").
pub fn fold(text: &str) -> String {
    text.nfd()
        .filter(|c| !is_combining_mark(*c))
        .collect::<String>()
        .to_lowercase()
}

/// Accent- and case-insensitive containment.
pub fn contains_folded(haystack: &str, needle: &str) -> bool {
    fold(haystack).contains(&fold(needle))
}

/// Uppercase the first character and lowercase the rest ("dUPONT" -> "Dupont").
pub fn capitalize(text: &str) -> String {
    let mut chars = text.chars();
    match chars.next() {
        Some(first) => first
            .to_uppercase()
            .chain(chars.flat_map(char::to_lowercase))
            .collect(),
        None => String::new(),
    }
}

/// ASCII slug: accents dropped, punctuation removed, runs of spaces and dashes
/// collapsed to a single dash.
pub fn slugify(text: &str) -> String {
    let cleaned: String = text
        .nfkd()
        .filter(char::is_ascii)
        .filter(|c| c.is_ascii_alphanumeric() || *c == '_' || *c == '-' || c.is_whitespace())
        .collect();
    let lowered = cleaned.trim().to_lowercase();

    let mut slug = String::with_capacity(lowered.len());
    let mut pending_dash = false;
    for c in lowered.chars() {
        if c == '-' || c.is_whitespace() {
            pending_dash = true;
            continue;
        }
        if pending_dash {
            slug.push('-');
            pending_dash = false;
        }
        slug.push(c);
    }
    if pending_dash {
        slug.push('-');
    }
    slug
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fold_strips_accents_and_case() {
        assert_eq!(fold("Égletons"), "egletons");
        assert!(contains_folded("Saint-Étienne", "etienne"));
    }

    #[test]
    fn test_capitalize() {
        assert_eq!(capitalize("dUPONT"), "Dupont");
        assert_eq!(capitalize("pierre"), "Pierre");
        assert_eq!(capitalize(""), "");
    }

    #[test]
    fn test_slugify() {
        assert_eq!(slugify("Newsletter"), "newsletter");
        assert_eq!(slugify("Lettre d'info  Été"), "lettre-dinfo-ete");
        assert_eq!(slugify("a - b"), "a-b");
    }
}
