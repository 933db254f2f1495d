//! Path resolution and containment
//!
//! Every caller-supplied path goes through [`Sandbox::resolve`]. Resolution is
//! lexical: `.` and `..` are folded before the containment check, so
//! `a/../../etc` is caught no matter how the traversal is spelled.

use std::path::{Component, Path, PathBuf};

use crate::types::{NavError, NavResult};

/// The one directory all operations are confined to
#[derive(Debug, Clone)]
pub struct Sandbox {
    /// Canonical, absolute root
    root: PathBuf,
}

impl Sandbox {
    /// `root` must already be canonical (see `RootContext::new`).
    pub fn new(root: PathBuf) -> Self {
        Self { root }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Resolve a root-relative path to an absolute path inside the root.
    ///
    /// Does no I/O. `""` and `"."` resolve to the root itself. Absolute
    /// inputs are accepted only if they already lie inside the root.
    pub fn resolve(&self, input: &str) -> NavResult<PathBuf> {
        if input.contains('\0') {
            return Err(NavError::InvalidArgument(
                "path contains a NUL byte".to_string(),
            ));
        }

        let candidate = normalize(&self.root.join(input));

        // Path::starts_with compares whole components, so `/srv/data-evil`
        // does not pass for a root of `/srv/data`.
        if candidate.starts_with(&self.root) {
            Ok(candidate)
        } else {
            tracing::warn!(input = %input, "Rejected path outside root");
            Err(NavError::AccessDenied(input.to_string()))
        }
    }

    /// Root-relative, `/`-separated form of an absolute path inside the root.
    pub fn relative(&self, path: &Path) -> String {
        match path.strip_prefix(&self.root) {
            Ok(rel) if rel.as_os_str().is_empty() => ".".to_string(),
            Ok(rel) => rel
                .components()
                .map(|c| c.as_os_str().to_string_lossy())
                .collect::<Vec<_>>()
                .join("/"),
            Err(_) => path.display().to_string(),
        }
    }

    /// Follow symlinks in an existing resolved path and re-check containment.
    ///
    /// `shown` is the caller's own spelling of the path, used in errors.
    pub fn confine_existing(&self, path: &Path, shown: &str) -> NavResult<PathBuf> {
        let canonical = path
            .canonicalize()
            .map_err(|e| NavError::from_io(&e, shown))?;

        if canonical.starts_with(&self.root) {
            Ok(canonical)
        } else {
            tracing::warn!(input = %shown, "Rejected symlink leading outside root");
            Err(NavError::AccessDenied(shown.to_string()))
        }
    }

    /// Like [`confine_existing`](Self::confine_existing), but only the parent
    /// directories are followed. The final component is kept as named, so a
    /// symlink there can still be described as itself.
    pub fn confine_parent(&self, path: &Path, shown: &str) -> NavResult<PathBuf> {
        match (path.parent(), path.file_name()) {
            (Some(parent), Some(name)) if path != self.root => {
                Ok(self.confine_existing(parent, shown)?.join(name))
            }
            _ => Ok(path.to_path_buf()),
        }
    }
}

/// Fold `.` and `..` without touching the filesystem. `..` at the top of an
/// absolute path stays at the top, as the OS would.
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

#[cfg(test)]
mod tests {
    use super::*;

    fn sandbox() -> Sandbox {
        Sandbox::new(PathBuf::from("/sandbox"))
    }

    #[test]
    fn test_empty_and_dot_resolve_to_root() {
        let sb = sandbox();
        assert_eq!(sb.resolve("").unwrap(), PathBuf::from("/sandbox"));
        assert_eq!(sb.resolve(".").unwrap(), PathBuf::from("/sandbox"));
        assert_eq!(sb.resolve("./").unwrap(), PathBuf::from("/sandbox"));
    }

    #[test]
    fn test_plain_relative_paths() {
        let sb = sandbox();
        assert_eq!(
            sb.resolve("src/main.rs").unwrap(),
            PathBuf::from("/sandbox/src/main.rs")
        );
        assert_eq!(
            sb.resolve("src/./lib/../main.rs").unwrap(),
            PathBuf::from("/sandbox/src/main.rs")
        );
    }

    #[test]
    fn test_parent_traversal_denied() {
        let sb = sandbox();
        assert!(matches!(
            sb.resolve("../../../etc/passwd"),
            Err(NavError::AccessDenied(p)) if p == "../../../etc/passwd"
        ));
        assert!(matches!(sb.resolve(".."), Err(NavError::AccessDenied(_))));
    }

    #[test]
    fn test_traversal_hidden_behind_normal_segments() {
        let sb = sandbox();
        assert!(matches!(
            sb.resolve("a/../../etc"),
            Err(NavError::AccessDenied(_))
        ));
        assert!(matches!(
            sb.resolve("a/b/c/../../../../x"),
            Err(NavError::AccessDenied(_))
        ));
        // Dipping out and back in still resolves inside
        assert_eq!(
            sb.resolve("a/../../sandbox/b").unwrap(),
            PathBuf::from("/sandbox/b")
        );
    }

    #[test]
    fn test_containment_for_deep_parent_chains() {
        let sb = sandbox();
        for depth in 0..12 {
            for extra in ["", "etc", "sandbox", "sandbox/x", "sandbox-evil/x"] {
                let input = format!("{}{}", "../".repeat(depth), extra);
                match sb.resolve(&input) {
                    Ok(path) => assert!(path.starts_with("/sandbox"), "{input} -> {path:?}"),
                    Err(e) => assert!(matches!(e, NavError::AccessDenied(_)), "{input}: {e}"),
                }
            }
        }
    }

    #[test]
    fn test_sibling_with_shared_prefix_denied() {
        let sb = sandbox();
        assert!(matches!(
            sb.resolve("../sandbox-evil/secret"),
            Err(NavError::AccessDenied(_))
        ));
    }

    #[test]
    fn test_absolute_inputs() {
        let sb = sandbox();
        assert!(matches!(
            sb.resolve("/etc/passwd"),
            Err(NavError::AccessDenied(_))
        ));
        assert_eq!(
            sb.resolve("/sandbox/notes.md").unwrap(),
            PathBuf::from("/sandbox/notes.md")
        );
    }

    #[test]
    fn test_nul_byte_rejected() {
        assert!(matches!(
            sandbox().resolve("a\0b"),
            Err(NavError::InvalidArgument(_))
        ));
    }

    #[test]
    fn test_relative_rendering() {
        let sb = sandbox();
        assert_eq!(sb.relative(Path::new("/sandbox")), ".");
        assert_eq!(sb.relative(Path::new("/sandbox/a/b.txt")), "a/b.txt");
    }

    #[cfg(unix)]
    #[test]
    fn test_symlink_escape_refused() {
        let outside = tempfile::tempdir().unwrap();
        std::fs::write(outside.path().join("secret.txt"), "top secret").unwrap();

        let root = tempfile::tempdir().unwrap();
        let root_path = root.path().canonicalize().unwrap();
        std::os::unix::fs::symlink(outside.path().join("secret.txt"), root_path.join("link"))
            .unwrap();
        std::fs::write(root_path.join("plain.txt"), "ok").unwrap();

        let sb = Sandbox::new(root_path.clone());
        let link = sb.resolve("link").unwrap();
        assert!(matches!(
            sb.confine_existing(&link, "link"),
            Err(NavError::AccessDenied(_))
        ));

        let plain = sb.resolve("plain.txt").unwrap();
        assert_eq!(
            sb.confine_existing(&plain, "plain.txt").unwrap(),
            root_path.join("plain.txt")
        );
    }

    #[cfg(unix)]
    #[test]
    fn test_confine_parent_keeps_final_symlink() {
        let outside = tempfile::tempdir().unwrap();
        std::fs::write(outside.path().join("secret.txt"), "top secret").unwrap();

        let root = tempfile::tempdir().unwrap();
        let root_path = root.path().canonicalize().unwrap();
        std::os::unix::fs::symlink(outside.path(), root_path.join("out")).unwrap();

        let sb = Sandbox::new(root_path.clone());

        // The link itself lives in the root
        let link = sb.resolve("out").unwrap();
        assert_eq!(sb.confine_parent(&link, "out").unwrap(), root_path.join("out"));

        // Anything reached through it does not
        let through = sb.resolve("out/secret.txt").unwrap();
        assert!(matches!(
            sb.confine_parent(&through, "out/secret.txt"),
            Err(NavError::AccessDenied(p)) if p == "out/secret.txt"
        ));

        assert_eq!(sb.confine_parent(&root_path, ".").unwrap(), root_path);
    }
}
