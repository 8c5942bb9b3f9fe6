//! Text normalization used for both matching and reference-table loading.

/// Normalize free text for fuzzy comparison.
///
/// Steps:
/// 1. Lower-case
/// 2. Unify dash variants (hyphen, en-dash, em-dash) to `-`
/// 3. Replace `&` with `and`
/// 4. Drop every character outside `[a-z0-9 -]`
///
/// Whitespace is kept as-is, so the output is stable under re-normalization.
pub fn normalize(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.to_lowercase().chars() {
        match c {
            '-' | '\u{2013}' | '\u{2014}' => out.push('-'),
            '&' => out.push_str("and"),
            'a'..='z' | '0'..='9' | ' ' => out.push(c),
            _ => {}
        }
    }
    out
}
