//! Name references found in test code.
//!
//! The missing-test check is a heuristic: a method counts as tested when its
//! simple name, or its full dotted name, appears anywhere in the test corpus.
//! Test function names contribute their `test_`-stripped form, so
//! `test_parse_header` references `parse_header`.

use crate::core::simple_name;
use crate::errors::{read_source, AuditError};
use crate::io::walker::{FileKind, FileWalker};
use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::HashSet;
use std::path::Path;
use tracing::{debug, warn};

static DOTTED_NAME: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"[A-Za-z_][A-Za-z0-9_]*(?:\s*\.\s*[A-Za-z_][A-Za-z0-9_]*)*")
        .expect("dotted name pattern is valid")
});

const TEST_PREFIX: &str = "test_";

#[derive(Debug, Clone, Default)]
pub struct TestCorpus {
    identifiers: HashSet<String>,
    dotted: HashSet<String>,
    files: usize,
}

impl TestCorpus {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_sources<'a>(sources: impl IntoIterator<Item = &'a str>) -> Self {
        let mut corpus = Self::new();
        for source in sources {
            corpus.add_source(source);
        }
        corpus
    }

    /// Load every Python file at `path`, which may be a single file or a directory.
    pub fn load(path: &Path, exclude: &[String]) -> Result<Self, AuditError> {
        if !path.exists() {
            return Err(AuditError::FileNotFound {
                path: path.to_path_buf(),
            });
        }
        if path.is_file() {
            let mut corpus = Self::new();
            corpus.add_source(&read_source(path)?);
            return Ok(corpus);
        }

        let files = FileWalker::new(path)
            .with_kind(FileKind::All)
            .with_ignore_patterns(exclude)
            .walk();
        Ok(Self::from_files(&files))
    }

    /// Collect test modules found under a source tree.
    pub fn discover(root: &Path, exclude: &[String]) -> Self {
        let files = FileWalker::new(root)
            .with_kind(FileKind::Tests)
            .with_ignore_patterns(exclude)
            .walk();
        debug!("Discovered {} test files under {}", files.len(), root.display());
        Self::from_files(&files)
    }

    /// Unreadable files are skipped so one bad fixture cannot sink the audit.
    fn from_files(files: &[impl AsRef<Path>]) -> Self {
        let mut corpus = Self::new();
        for file in files {
            match read_source(file.as_ref()) {
                Ok(source) => corpus.add_source(&source),
                Err(e) => warn!("Skipping test file: {}", e),
            }
        }
        corpus
    }

    pub fn add_source(&mut self, source: &str) {
        self.files += 1;
        for found in DOTTED_NAME.find_iter(source) {
            let parts: Vec<&str> = found.as_str().split('.').map(str::trim).collect();
            for part in &parts {
                self.identifiers.insert(part.to_string());
                if let Some(stripped) = part.strip_prefix(TEST_PREFIX) {
                    if !stripped.is_empty() {
                        self.identifiers.insert(stripped.to_string());
                    }
                }
            }
            // Every contiguous window, so `svc.Outer.Inner.run` also yields `Inner.run`
            for start in 0..parts.len() {
                for end in start + 2..=parts.len() {
                    self.dotted.insert(parts[start..end].join("."));
                }
            }
        }
    }

    /// Whether the corpus mentions this method by simple or qualified name.
    pub fn references(&self, qualified_name: &str) -> bool {
        self.identifiers.contains(simple_name(qualified_name)) || self.dotted.contains(qualified_name)
    }

    pub fn file_count(&self) -> usize {
        self.files
    }

    pub fn is_empty(&self) -> bool {
        self.files == 0
    }
}
