use std::path::{Component, Path};

/// Dotted module name for a root-relative `.py` path.
///
/// `pkg/sub/mod.py` becomes `pkg.sub.mod`; `pkg/__init__.py` becomes `pkg`
/// and is flagged as a package. Directories without `__init__.py` still
/// contribute their names (namespace packages). `prefix` is prepended when
/// the root itself is a package.
pub(crate) fn module_name(relative: &Path, prefix: Option<&str>) -> Option<(String, bool)> {
    let mut parts: Vec<&str> = prefix.into_iter().collect();
    for component in relative.components() {
        match component {
            Component::Normal(part) => parts.push(part.to_str()?),
            _ => return None,
        }
    }

    let last = parts.pop()?;
    let stem = last.strip_suffix(".py")?;
    let is_package = stem == "__init__";
    if !is_package {
        parts.push(stem);
    }

    if parts.is_empty() {
        return None;
    }
    Some((parts.join("."), is_package))
}
