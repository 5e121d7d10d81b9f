/// Derive a deterministic filename stem from a character name.
///
/// Lowercases the input and collapses every run of non-alphanumeric
/// characters into a single `-`, with no separator at either end.
/// `"All Might"` becomes `"all-might"`.
pub fn slugify(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    let mut pending_sep = false;

    for c in input.chars() {
        if c.is_alphanumeric() {
            if pending_sep && !out.is_empty() {
                out.push('-');
            }
            pending_sep = false;
            out.extend(c.to_lowercase());
        } else {
            pending_sep = true;
        }
    }

    out
}
