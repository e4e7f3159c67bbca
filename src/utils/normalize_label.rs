/// Canonicalize a free-text catalog label: trim, collapse runs of whitespace
/// to a single space and lowercase.
///
/// The upstream catalog spells the same category both as
/// `"Cloud Services - Backup"` and `"Cloud Services -  Backup"`; both
/// normalize to the same string.
pub fn normalize_label(raw: &str) -> String {
    raw.split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}
