//! Document discovery
//!
//! Walks a directory tree to find documents by extension.

use std::path::{Path, PathBuf};

use walkdir::{DirEntry, WalkDir};

use super::Config;

/// Finds every document under `root`, sorted by path
///
/// A `root` that is a file is returned as the only document, whatever its
/// extension. Unreadable directory entries are skipped.
pub fn discover_documents(root: &Path, config: &Config) -> Vec<PathBuf> {
    if root.is_file() {
        return vec![root.to_path_buf()];
    }

    let walker = WalkDir::new(root)
        .follow_links(config.follow_links)
        .into_iter()
        .filter_entry(|e| !is_ignored(e, config));

    let mut documents: Vec<PathBuf> = walker
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().is_file() && config.is_document(e.path()))
        .map(|e| e.into_path())
        .collect();

    // Sort for deterministic processing order
    documents.sort();
    documents
}

/// Check if a directory should be skipped during traversal
fn is_ignored(entry: &DirEntry, config: &Config) -> bool {
    // Never filter the root directory
    if entry.depth() == 0 || !entry.file_type().is_dir() {
        return false;
    }

    let name = entry.file_name().to_string_lossy();

    if !config.include_hidden && name.starts_with('.') {
        return true;
    }

    config.ignore.iter().any(|ignored| ignored.as_str() == &*name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn relative(root: &Path, found: Vec<PathBuf>) -> Vec<String> {
        found
            .iter()
            .map(|p| p.strip_prefix(root).unwrap().to_string_lossy().replace('\\', "/"))
            .collect()
    }

    #[test]
    fn discovers_nested_documents() {
        let temp = TempDir::new().unwrap();
        fs::write(temp.path().join("README.md"), "# Hello").unwrap();
        fs::write(temp.path().join("lib.rs"), "fn main() {}").unwrap();
        fs::create_dir(temp.path().join("docs")).unwrap();
        fs::write(temp.path().join("docs/guide.md"), "# Guide").unwrap();

        let found = discover_documents(temp.path(), &Config::default());

        assert_eq!(relative(temp.path(), found), vec!["README.md", "docs/guide.md"]);
    }

    #[test]
    fn skips_hidden_and_ignored_directories() {
        let temp = TempDir::new().unwrap();
        fs::write(temp.path().join("index.md"), "").unwrap();
        for dir in [".cache", "node_modules", "target"] {
            fs::create_dir(temp.path().join(dir)).unwrap();
            fs::write(temp.path().join(dir).join("skip.md"), "").unwrap();
        }

        let found = discover_documents(temp.path(), &Config::default());

        assert_eq!(relative(temp.path(), found), vec!["index.md"]);
    }

    #[test]
    fn include_hidden_walks_dot_directories() {
        let temp = TempDir::new().unwrap();
        fs::create_dir(temp.path().join(".github")).unwrap();
        fs::write(temp.path().join(".github/CONTRIBUTING.md"), "").unwrap();

        let config = Config {
            include_hidden: true,
            ..Config::default()
        };
        let found = discover_documents(temp.path(), &config);

        assert_eq!(relative(temp.path(), found), vec![".github/CONTRIBUTING.md"]);
    }

    #[test]
    fn custom_extensions() {
        let temp = TempDir::new().unwrap();
        fs::write(temp.path().join("a.md"), "").unwrap();
        fs::write(temp.path().join("b.markdown"), "").unwrap();

        let config = Config {
            extensions: vec!["markdown".to_string()],
            ..Config::default()
        };
        let found = discover_documents(temp.path(), &config);

        assert_eq!(relative(temp.path(), found), vec!["b.markdown"]);
    }

    #[test]
    fn file_root_is_the_only_document() {
        let temp = TempDir::new().unwrap();
        let doc = temp.path().join("notes.txt");
        fs::write(&doc, "").unwrap();

        assert_eq!(discover_documents(&doc, &Config::default()), vec![doc]);
    }

    #[test]
    fn empty_directory() {
        let temp = TempDir::new().unwrap();
        assert!(discover_documents(temp.path(), &Config::default()).is_empty());
    }
}
