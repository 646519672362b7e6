use crate::config::RefactorGuardConfig;
use std::path::{Path, PathBuf};

/// Maps the many spellings of a file path onto one canonical key.
///
/// When the configured project-root marker appears as a path component,
/// everything up to and including its first occurrence is dropped. Otherwise
/// an absolute path under the repository root is made relative to it.
/// Separators become `/` and `.` components are removed in every case.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PathNormalizer {
    marker: Option<String>,
    repo_root: Option<PathBuf>,
}

impl PathNormalizer {
    pub fn new(marker: Option<String>, repo_root: Option<PathBuf>) -> Self {
        Self {
            marker: marker.filter(|m| !m.is_empty()),
            repo_root,
        }
    }

    pub fn from_config(config: &RefactorGuardConfig) -> Self {
        Self::new(
            config.paths.project_root_marker.clone(),
            config.paths.repo_root.clone(),
        )
    }

    pub fn normalize(&self, raw: &str) -> String {
        let unified = raw.trim().replace('\\', "/");
        let absolute = unified.starts_with('/');
        let parts = components(&unified);

        if let Some(marker) = self.marker.as_deref() {
            if let Some(pos) = parts.iter().position(|c| *c == marker) {
                return parts[pos + 1..].join("/");
            }
        }

        if let Some(root) = self.repo_root.as_deref() {
            let root = root.to_string_lossy().replace('\\', "/");
            let root_components = components(&root);
            if root.starts_with('/') == absolute && parts.starts_with(&root_components) {
                return parts[root_components.len()..].join("/");
            }
        }

        let joined = parts.join("/");
        if absolute {
            format!("/{}", joined)
        } else {
            joined
        }
    }

    pub fn normalize_path(&self, path: &Path) -> String {
        self.normalize(&path.to_string_lossy())
    }
}

fn components(path: &str) -> Vec<&str> {
    path.split('/')
        .filter(|c| !c.is_empty() && *c != ".")
        .collect()
}

/// Normalize one path against an optional marker, with no repository root.
pub fn normalize_path(raw: &str, marker: Option<&str>) -> String {
    PathNormalizer::new(marker.map(str::to_string), None).normalize(raw)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_marker_strips_prefix() {
        assert_eq!(
            normalize_path("/home/ci/build/myproj/pkg/a.py", Some("myproj")),
            "pkg/a.py"
        );
        assert_eq!(normalize_path("myproj/pkg/a.py", Some("myproj")), "pkg/a.py");
    }

    #[test]
    fn test_first_marker_occurrence_wins() {
        assert_eq!(
            normalize_path("/w/src/pkg/src/a.py", Some("src")),
            "pkg/src/a.py"
        );
    }

    #[test]
    fn test_marker_must_be_whole_component() {
        assert_eq!(
            normalize_path("/w/myproject/a.py", Some("myproj")),
            "/w/myproject/a.py"
        );
    }

    #[test]
    fn test_separators_and_dot_components() {
        assert_eq!(normalize_path(".\\pkg\\a.py", None), "pkg/a.py");
        assert_eq!(normalize_path("./pkg/./a.py", None), "pkg/a.py");
    }

    #[test]
    fn test_repo_root_relativizes_absolute_paths() {
        let normalizer = PathNormalizer::new(None, Some(PathBuf::from("/work/repo")));
        assert_eq!(normalizer.normalize("/work/repo/pkg/a.py"), "pkg/a.py");
        assert_eq!(normalizer.normalize("/elsewhere/pkg/a.py"), "/elsewhere/pkg/a.py");
        assert_eq!(normalizer.normalize("pkg/a.py"), "pkg/a.py");
    }

    #[test]
    fn test_marker_takes_precedence_over_repo_root() {
        let normalizer = PathNormalizer::new(
            Some("proj".to_string()),
            Some(PathBuf::from("/work")),
        );
        assert_eq!(normalizer.normalize("/work/proj/a.py"), "a.py");
    }

    #[test]
    fn test_normalization_is_idempotent() {
        let normalizer = PathNormalizer::new(Some("proj".into()), Some(PathBuf::from("/w")));
        for raw in ["/w/proj/a/b.py", "./x/y.py", "/w/z.py", "c\\d.py"] {
            let once = normalizer.normalize(raw);
            assert_eq!(normalizer.normalize(&once), once);
        }
    }
}
