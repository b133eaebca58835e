//! String-level path splitting. Names are never touched on disk here.

use std::path::is_separator;

/// Split a name into its directory part and base name at the last separator.
///
/// Trailing separators are stripped from the directory part unless it
/// consists of separators only (`/img.png` keeps `/`).
pub fn split_dir(name: &str) -> (&str, &str) {
    match name.rfind(is_separator) {
        Some(i) => {
            let head = &name[..=i];
            let trimmed = head.trim_end_matches(is_separator);
            let dir = if trimmed.is_empty() { head } else { trimmed };
            (dir, &name[i + 1..])
        }
        None => ("", name),
    }
}

/// Split a name into stem and extension, the extension keeping its dot.
///
/// Only the base name is considered, and leading dots don't start an
/// extension (`.hidden` has none).
pub fn split_extension(name: &str) -> (&str, &str) {
    let base_start = name.rfind(is_separator).map_or(0, |i| i + 1);
    let base = &name[base_start..];
    match base.rfind('.') {
        Some(i) if base[..i].chars().any(|c| c != '.') => name.split_at(base_start + i),
        _ => (name, ""),
    }
}
