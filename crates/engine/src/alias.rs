//! Alias expansion
//!
//! An alias maps one class-name onto a space separated list of others,
//! which may themselves be aliases.

use indexmap::IndexMap;

/// Expands `name` into the class-names it stands for.
///
/// A name that is not an alias expands to itself. When expansion runs into
/// an alias already on the current path, that token is kept unexpanded.
///
/// ```
/// use indexmap::IndexMap;
/// use gale_engine::alias::expand_alias;
///
/// let mut aliases = IndexMap::new();
/// aliases.insert("btn".to_string(), "px-4 card".to_string());
/// aliases.insert("card".to_string(), "rounded shadow".to_string());
/// assert_eq!(expand_alias(&aliases, "btn"), vec!["px-4", "rounded", "shadow"]);
/// ```
pub fn expand_alias(aliases: &IndexMap<String, String>, name: &str) -> Vec<String> {
    let mut path = Vec::new();
    let mut out = Vec::new();
    expand_into(aliases, name, &mut path, &mut out);
    out
}

fn expand_into<'a>(
    aliases: &'a IndexMap<String, String>,
    name: &'a str,
    path: &mut Vec<&'a str>,
    out: &mut Vec<String>,
) {
    let Some(body) = aliases.get(name) else {
        out.push(name.to_string());
        return;
    };

    if path.contains(&name) {
        log::debug!("alias cycle through `{}`: {}", name, path.join(" -> "));
        out.push(name.to_string());
        return;
    }

    path.push(name);
    for token in body.split_whitespace() {
        expand_into(aliases, token, path, out);
    }
    path.pop();
}
