use std::path::{Component, Path, PathBuf};

use crate::error::{InstallError, Result};

/// Result of sanitizing an archive entry path.
#[derive(Clone, Debug)]
pub struct SanitizedPath {
    pub original: PathBuf,
    pub resolved: PathBuf,
}

/// Resolve an archive entry name against the extraction root and verify the
/// result stays inside it.
///
/// The containment check runs on the normalized path, never the raw entry
/// name, and must pass before any filesystem mutation for that entry.
pub fn sanitize_entry_path<P: AsRef<Path>, B: AsRef<Path>>(
    entry_path: P,
    base: B,
) -> Result<SanitizedPath> {
    let entry_path = entry_path.as_ref();
    let base = base.as_ref();
    let normalized = normalize_path(entry_path);

    // Absolute entry names always escape the root
    if normalized.is_absolute() {
        return Err(InstallError::PathTraversal {
            entry: entry_path.to_path_buf(),
            resolved: normalized,
        });
    }

    let resolved = normalize_path(&base.join(normalized));

    if !resolved.starts_with(base) {
        return Err(InstallError::PathTraversal {
            entry: entry_path.to_path_buf(),
            resolved,
        });
    }

    Ok(SanitizedPath {
        original: entry_path.to_path_buf(),
        resolved,
    })
}

/// Resolve a symlink target relative to the link's own location and verify
/// it stays inside the extraction root.
///
/// A link pointing outside the root would route every later entry written
/// through it to an arbitrary path, so targets are validated before the link
/// is created.
pub fn sanitize_link_target<T: AsRef<Path>, L: AsRef<Path>, B: AsRef<Path>>(
    target: T,
    link_location: L,
    base: B,
) -> Result<PathBuf> {
    let target = target.as_ref();
    let link_location = link_location.as_ref();
    let base = base.as_ref();

    if target.is_absolute() {
        return Err(InstallError::PathTraversal {
            entry: target.to_path_buf(),
            resolved: target.to_path_buf(),
        });
    }

    // Join before normalizing: a leading `..` in the target must pop through
    // the real directory chain, not disappear against an empty path.
    let joined = match link_location.parent() {
        Some(parent) => parent.join(target),
        None => base.join(target),
    };
    let resolved = normalize_path(&joined);

    if !resolved.starts_with(base) {
        return Err(InstallError::PathTraversal {
            entry: target.to_path_buf(),
            resolved,
        });
    }

    Ok(resolved)
}

/// Normalize path separators and resolve `.`/`..` components lexically.
fn normalize_path(path: &Path) -> PathBuf {
    let mut result = PathBuf::new();

    for component in path.components() {
        match component {
            Component::ParentDir => {
                result.pop();
            }
            Component::Normal(part) => result.push(part),
            Component::RootDir => result.push("/"),
            Component::Prefix(prefix) => result.push(prefix.as_os_str()),
            Component::CurDir => {}
        }
    }

    result
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_base_path() -> &'static Path {
        if cfg!(windows) {
            Path::new("C:/opt/infera")
        } else {
            Path::new("/opt/infera")
        }
    }

    #[test]
    fn plain_entry_resolves_under_base() {
        let result = sanitize_entry_path("root/bin/infer", test_base_path()).unwrap();
        assert_eq!(result.original, Path::new("root/bin/infer"));
        assert_eq!(result.resolved, test_base_path().join("root/bin/infer"));
    }

    #[test]
    fn parent_escape_is_rejected() {
        let result = sanitize_entry_path("../evil.txt", test_base_path());
        assert!(matches!(result, Err(InstallError::PathTraversal { .. })));
    }

    #[test]
    fn deep_parent_escape_is_rejected() {
        let result = sanitize_entry_path("root/../../outside", test_base_path());
        assert!(matches!(result, Err(InstallError::PathTraversal { .. })));
    }

    #[test]
    fn absolute_entry_is_rejected() {
        let malicious = if cfg!(windows) {
            "C:\\etc\\passwd"
        } else {
            "/etc/passwd"
        };
        let result = sanitize_entry_path(malicious, test_base_path());
        assert!(matches!(result, Err(InstallError::PathTraversal { .. })));
    }

    #[test]
    fn interior_dotdot_that_stays_inside_is_allowed() {
        let result = sanitize_entry_path("root/lib/../bin/infer", test_base_path()).unwrap();
        assert_eq!(result.resolved, test_base_path().join("root/bin/infer"));
    }

    #[test]
    fn link_target_inside_root_resolves() {
        let base = test_base_path();
        let resolved = sanitize_link_target("infer", base.join("root/bin/alias"), base).unwrap();
        assert_eq!(resolved, base.join("root/bin/infer"));
    }

    #[test]
    fn link_target_popping_within_root_is_allowed() {
        let base = test_base_path();
        let resolved =
            sanitize_link_target("../lib/libfoo.so", base.join("root/bin/alias"), base).unwrap();
        assert_eq!(resolved, base.join("root/lib/libfoo.so"));
    }

    #[test]
    fn link_target_escaping_root_is_rejected() {
        let base = test_base_path();
        let result = sanitize_link_target("../..", base.join("root/out"), base);
        assert!(matches!(result, Err(InstallError::PathTraversal { .. })));
    }

    #[test]
    fn absolute_link_target_is_rejected() {
        let base = test_base_path();
        let malicious = if cfg!(windows) {
            "C:\\etc\\passwd"
        } else {
            "/etc/passwd"
        };
        let result = sanitize_link_target(malicious, base.join("root/out"), base);
        assert!(matches!(result, Err(InstallError::PathTraversal { .. })));
    }

    #[test]
    fn current_dir_components_are_dropped() {
        let result = sanitize_entry_path("./root/./bin/infer", test_base_path()).unwrap();
        assert_eq!(result.resolved, test_base_path().join("root/bin/infer"));
    }
}
