//! Directory listing helpers.
use std::path::{Path, PathBuf};

use glob::Pattern;

use crate::error::Error;

/// List files of `dir` having one of the provided extensions, sorted by path.
///
/// A missing directory is an error, an empty one is not.
pub fn list_files(dir: &Path, extensions: &[&str]) -> Result<Vec<PathBuf>, Error> {
    if !dir.is_dir() {
        return Err(Error::MissingFile(dir.to_path_buf()));
    }
    let escaped = Pattern::escape(&dir.to_string_lossy());

    let mut files = Vec::new();
    for ext in extensions {
        for entry in glob::glob(&format!("{escaped}/*.{ext}"))? {
            let path = entry?;
            if path.is_file() {
                files.push(path);
            }
        }
    }
    files.sort();
    files.dedup();
    Ok(files)
}

/// File name up to the first dot (`"12.md"` -> `"12"`, `"a.b.txt"` -> `"a"`).
pub fn stem_before_dot(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy())
        .and_then(|name| name.split('.').next().map(String::from))
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn listing() {
        let dir = tempdir().unwrap();
        for name in ["b.md", "a.md", "c.txt", "d.pdf"] {
            std::fs::write(dir.path().join(name), "").unwrap();
        }
        std::fs::create_dir(dir.path().join("sub.md")).unwrap();

        let files = list_files(dir.path(), &["md", "txt"]).unwrap();
        let names: Vec<String> = files
            .iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().to_string())
            .collect();
        assert_eq!(names, vec!["a.md", "b.md", "c.txt"]);
    }

    #[test]
    fn missing_dir() {
        assert!(list_files(Path::new("no/such/dir"), &["md"]).is_err());
    }

    #[test]
    fn stems() {
        assert_eq!(stem_before_dot(Path::new("x/12.md")), "12");
        assert_eq!(stem_before_dot(Path::new("a.b.txt")), "a");
    }
}
