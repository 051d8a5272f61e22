//! Upload path resolution and containment checks

use std::io;
use std::path::{Component, Path, PathBuf};

/// Resolve `filename` against `root`, returning `None` when the result does
/// not land strictly below the root.
///
/// Resolution is lexical: `.` segments are dropped and `..` removes the
/// previous segment. Containment is compared segment by segment, so a
/// sibling such as `uploads-evil` never counts as being inside `uploads`.
pub fn resolve_within(root: &Path, filename: &str) -> Option<PathBuf> {
    if filename.is_empty() || filename.contains('\0') {
        return None;
    }

    let root = normalize(root);
    let target = normalize(&root.join(filename));

    if target != root && target.starts_with(&root) {
        Some(target)
    } else {
        None
    }
}

/// Check that the canonical form of `target` is still below the canonical
/// root. Catches symlinks inside the upload root that point elsewhere.
pub async fn canonically_within(root: &Path, target: &Path) -> io::Result<bool> {
    let root = tokio::fs::canonicalize(root).await?;
    let target = tokio::fs::canonicalize(target).await?;

    Ok(target != root && target.starts_with(&root))
}

fn normalize(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            Component::Prefix(_) | Component::RootDir => out.push(component.as_os_str()),
            Component::CurDir => {}
            Component::ParentDir => {
                out.pop();
            }
            Component::Normal(part) => out.push(part),
        }
    }
    out
}
