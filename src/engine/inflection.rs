//! Singular/plural inflection for route segments.

/// Irregular plural → singular forms. Checked before the suffix rules.
const IRREGULAR: &[(&str, &str)] = &[
    ("people", "person"),
    ("children", "child"),
    ("men", "man"),
    ("women", "woman"),
    ("feet", "foot"),
    ("teeth", "tooth"),
    ("geese", "goose"),
    ("mice", "mouse"),
    ("oxen", "ox"),
    ("indices", "index"),
    ("matrices", "matrix"),
    ("vertices", "vertex"),
];

/// True when `word` reads as a plural form.
///
/// A word the rules read as singular is never treated as plural, even when an
/// irregular or invariant word could plausibly go either way ("fish"); such
/// segments always resolve as single resources. That asymmetry is deliberate
/// and load-bearing for routing, so it stays.
pub fn is_plural(word: &str) -> bool {
    let lower = word.to_ascii_lowercase();
    if IRREGULAR.iter().any(|(plural, _)| *plural == lower) {
        return true;
    }
    if IRREGULAR.iter().any(|(_, singular)| *singular == lower) {
        return false;
    }
    lower.ends_with('s') && !lower.ends_with("ss") && !lower.ends_with("us") && !lower.ends_with("is")
}

/// Converts a plural word to its singular form, preserving the casing of the
/// stem ("userProfiles" → "userProfile"). Words the rules do not recognize
/// come back unchanged.
pub fn singularize(word: &str) -> String {
    let lower = word.to_ascii_lowercase();
    if let Some((_, singular)) = IRREGULAR.iter().find(|(plural, _)| *plural == lower) {
        return (*singular).to_string();
    }
    if !is_plural(word) {
        return word.to_string();
    }
    // Suffixes match case-insensitively but the stem is sliced from the
    // original word. `to_ascii_lowercase` preserves length, so the byte
    // offsets line up.
    if lower.ends_with("ies") && lower.len() > 3 {
        return format!("{}y", &word[..word.len() - 3]);
    }
    for suffix in ["ches", "shes", "sses", "xes", "zes"] {
        if lower.ends_with(suffix) {
            return word[..word.len() - 2].to_string();
        }
    }
    if lower.ends_with("ves") {
        return format!("{}fe", &word[..word.len() - 3]);
    }
    if lower.ends_with('s') {
        return word[..word.len() - 1].to_string();
    }
    word.to_string()
}
