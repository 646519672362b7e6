use crate::analyzers::is_supported;
use ignore::WalkBuilder;
use std::path::{Path, PathBuf};
use tracing::warn;

/// Which Python files a walk should yield
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileKind {
    /// Production code only
    Source,
    /// Test modules only
    Tests,
    /// Every Python file
    All,
}

pub struct FileWalker {
    root: PathBuf,
    kind: FileKind,
    ignore_patterns: Vec<glob::Pattern>,
}

impl FileWalker {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            kind: FileKind::Source,
            ignore_patterns: vec![],
        }
    }

    pub fn with_kind(mut self, kind: FileKind) -> Self {
        self.kind = kind;
        self
    }

    pub fn with_ignore_patterns(mut self, patterns: &[String]) -> Self {
        self.ignore_patterns = patterns
            .iter()
            .filter_map(|p| match glob::Pattern::new(p) {
                Ok(pattern) => Some(pattern),
                Err(e) => {
                    warn!("Ignoring invalid exclude pattern {:?}: {}", p, e);
                    None
                }
            })
            .collect();
        self
    }

    /// Sorted list of matching files. Unreadable entries are logged and skipped.
    pub fn walk(&self) -> Vec<PathBuf> {
        let mut files = Vec::new();
        let walker = WalkBuilder::new(&self.root)
            .hidden(true)
            .git_ignore(true)
            .build();

        for entry in walker {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) => {
                    warn!("Skipping unreadable entry under {}: {}", self.root.display(), e);
                    continue;
                }
            };
            let path = entry.path();
            if path.is_file() && self.should_process(path) {
                files.push(path.to_path_buf());
            }
        }

        files.sort();
        files
    }

    fn should_process(&self, path: &Path) -> bool {
        if !is_supported(path) {
            return false;
        }

        let relative = path.strip_prefix(&self.root).unwrap_or(path);
        if self
            .ignore_patterns
            .iter()
            .any(|p| p.matches_path(relative) || p.matches_path(path))
        {
            return false;
        }

        match self.kind {
            FileKind::Source => !is_test_file(relative),
            FileKind::Tests => is_test_file(relative),
            FileKind::All => true,
        }
    }
}

/// Test modules by pytest naming convention or location under a `tests` directory.
pub fn is_test_file(path: &Path) -> bool {
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy())
        .unwrap_or_default();
    if name.starts_with("test_") || name.ends_with("_test.py") || name == "conftest.py" {
        return true;
    }

    let directories = path.parent().map(Path::components).into_iter().flatten();
    directories
        .map(|c| c.as_os_str().to_string_lossy())
        .any(|c| c == "tests" || c == "test")
}
