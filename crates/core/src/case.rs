/// Converts a camelCase CSS property name to kebab-case.
///
/// Custom properties (`--foo`) and names that are already kebab-case are
/// returned unchanged. A leading uppercase letter marks a vendor prefix,
/// so `WebkitTransition` becomes `-webkit-transition`.
pub fn camel_to_kebab(name: &str) -> String {
    if name.starts_with("--") {
        return name.to_string();
    }

    let mut out = String::with_capacity(name.len() + 4);
    for (i, ch) in name.chars().enumerate() {
        if ch.is_ascii_uppercase() {
            if i == 0 {
                out.push('-');
            } else if !out.ends_with('-') {
                out.push('-');
            }
            out.push(ch.to_ascii_lowercase());
        } else {
            out.push(ch);
        }
    }
    out
}
