//! Reference naming: canonical titles and component pointers.
//!
//! A canonical title is the declared type name with namespace qualifiers
//! stripped and generic arguments folded into a single token, so distinct
//! instantiations never collide and the same instantiation always keys the
//! same registry entry.

use papyra_core::schema::Reference;

/// Derive the canonical, collision-resistant title for a declared type name.
///
/// `api::models::User` → `User`; `api::Page<api::User>` → `PageUser`;
/// nested generics flatten recursively. Idempotent: applying it to its own
/// output is a no-op.
///
/// # Panics
/// An empty name is a fatal configuration error upstream.
#[must_use]
pub fn canonical_title(name: &str) -> String {
    let name = name.trim();
    assert!(
        !name.is_empty(),
        "cannot derive a schema title from an empty type name"
    );
    let Some(open) = name.find('<') else {
        return strip_path(name).to_string();
    };
    let close = name.rfind('>').unwrap_or(name.len());
    let mut title = strip_path(&name[..open]).to_string();
    for argument in split_top_level(&name[open + 1..close]) {
        let argument = argument.trim();
        if !argument.is_empty() {
            title.push_str(&canonical_title(argument));
        }
    }
    title
}

/// Document-relative pointer for a canonical title.
#[must_use]
pub fn schema_reference(title: &str) -> Reference {
    Reference::schema(title)
}

fn strip_path(name: &str) -> &str {
    name.trim().rsplit("::").next().unwrap_or(name).trim()
}

/// Split generic arguments on top-level commas only.
fn split_top_level(arguments: &str) -> Vec<&str> {
    let mut parts = Vec::new();
    let mut depth = 0usize;
    let mut start = 0;
    for (idx, ch) in arguments.char_indices() {
        match ch {
            '<' => depth += 1,
            '>' => depth = depth.saturating_sub(1),
            ',' if depth == 0 => {
                parts.push(&arguments[start..idx]);
                start = idx + 1;
            }
            _ => {}
        }
    }
    parts.push(&arguments[start..]);
    parts
}
