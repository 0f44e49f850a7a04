//! Layer name derivation from stylesheet paths.
//!
//! Paths are treated as slash-separated logical paths on every platform;
//! no `std::path` primitives are involved.

/// Convert a file path to its cascade layer name.
///
/// The name comes from the directory structure relative to `root`.
/// Files directly under the root use their file name without extension;
/// nested files use their directory path joined with dots.
///
/// - `layer_name("css/reset.css", "css")` -> `"reset"`
/// - `layer_name("css/base/file.css", "css")` -> `"base"`
/// - `layer_name("css/base/elements/btn.css", "css")` -> `"base.elements"`
pub fn layer_name(path: &str, root: &str) -> String {
    let root = normalize_root(root);

    let rel = if root.is_empty() {
        path
    } else {
        path.strip_prefix(root.as_str())
            .and_then(|rest| rest.strip_prefix('/'))
            .unwrap_or(path)
    };

    let mut segments: Vec<&str> = rel
        .split('/')
        .filter(|segment| !segment.is_empty() && *segment != ".")
        .collect();

    let file_name = segments.pop().unwrap_or_default();

    if segments.is_empty() {
        return file_stem(file_name).to_string();
    }

    segments.join(".")
}

/// Canonical spelling of a source root.
///
/// Drops `.` segments and empty segments (repeated, leading or trailing
/// slashes). `..` segments are kept. A leading `/` survives so absolute
/// roots stay recognisable. `""`, `"."` and `"./"` all become `""`.
pub fn normalize_root(root: &str) -> String {
    let joined = root
        .split('/')
        .filter(|segment| !segment.is_empty() && *segment != ".")
        .collect::<Vec<_>>()
        .join("/");

    if root.starts_with('/') {
        format!("/{}", joined)
    } else {
        joined
    }
}

/// Nesting depth of a layer: the number of dots in its name.
pub fn depth(name: &str) -> usize {
    name.matches('.').count()
}

// Strips everything from the last dot of the base name onwards.
fn file_stem(file_name: &str) -> &str {
    match file_name.rfind('.') {
        Some(index) => &file_name[..index],
        None => file_name,
    }
}
