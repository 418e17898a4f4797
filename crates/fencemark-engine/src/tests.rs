use std::path::PathBuf;

use tempfile::TempDir;

pub fn create_test_content_dir() -> TempDir {
    TempDir::new().unwrap()
}

/// Writes `content` to `name` under the directory, creating parents.
pub fn create_test_file(dir: &TempDir, name: &str, content: &str) -> PathBuf {
    let path = dir.path().join(name);
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).unwrap();
    }
    std::fs::write(&path, content).unwrap();
    path
}
