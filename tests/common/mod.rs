// Test utility module for refactorguard integration tests
#![allow(dead_code)]

use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// Write `contents` to `root/relative`, creating parent directories.
pub fn write_file(root: &Path, relative: &str, contents: &str) -> PathBuf {
    let path = root.join(relative);
    fs::create_dir_all(path.parent().expect("fixture path has a parent"))
        .expect("Failed to create fixture directory");
    fs::write(&path, contents).expect("Failed to write fixture file");
    path
}

/// Temporary source tree built from `(relative path, contents)` pairs
pub fn source_tree(files: &[(&str, &str)]) -> TempDir {
    let dir = TempDir::new().expect("Failed to create temp dir");
    for (relative, contents) in files {
        write_file(dir.path(), relative, contents);
    }
    dir
}

pub const SERVICE_ORIGINAL: &str = "\
class Service:
    def start(self):
        if self.ready:
            return True
        return False

    def stop(self):
        pass

    def restart(self):
        self.stop()
        self.start()

    def _cleanup(self):
        pass
";

pub const SERVICE_REFACTORED: &str = "\
class Service:
    def start(self):
        if self.ready:
            return True
        return False

    def stop(self):
        pass

    def reload(self):
        for item in self.items:
            if item and item.dirty:
                item.save()
";

pub const SERVICE_TESTS: &str = "\
from pkg.service import Service

def test_start():
    assert Service().start() is False

def test_stop():
    Service().stop()
";
