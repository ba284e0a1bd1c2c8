/// Lowercases, strips invisible characters, and reduces punctuation to single
/// spaces so phrases can be compared on word boundaries.
pub(crate) fn normalize_phrase(value: &str) -> String {
    let cleaned = value
        .replace(['\u{feff}', '\u{200b}'], "")
        .replace('&', " and ");
    let mut spaced = String::with_capacity(cleaned.len());
    for ch in cleaned.chars() {
        if ch.is_alphanumeric() {
            spaced.extend(ch.to_lowercase());
        } else {
            spaced.push(' ');
        }
    }
    spaced.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Canonical lower-kebab-case tag, or `None` when nothing alphanumeric remains.
pub fn canonical_tag(value: &str) -> Option<String> {
    let phrase = normalize_phrase(value);
    if phrase.is_empty() {
        None
    } else {
        Some(phrase.replace(' ', "-"))
    }
}

/// True when `phrase` occurs in `text` as whole words. Both inputs must already
/// be normalized.
pub(crate) fn contains_phrase(text: &str, phrase: &str) -> bool {
    if phrase.is_empty() || text.len() < phrase.len() {
        return false;
    }

    text.match_indices(phrase).any(|(start, matched)| {
        let end = start + matched.len();
        let left_ok = start == 0 || text.as_bytes()[start - 1] == b' ';
        let right_ok = end == text.len() || text.as_bytes()[end] == b' ';
        left_ok && right_ok
    })
}
