//! Candidate file scanning and collection

use std::path::{Path, PathBuf};
use walkdir::{DirEntry, WalkDir};

use crate::core::config::ExtensionFilter;
use crate::core::error::{DedupError, DedupResult};

/// A file that passed the extension filter
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileEntry {
    pub path: PathBuf,
    /// Lowercased extension without the dot, empty when there is none
    pub extension: String,
}

impl FileEntry {
    pub fn new(path: PathBuf) -> Self {
        let extension = path
            .extension()
            .map(|ext| ext.to_string_lossy().to_lowercase())
            .unwrap_or_default();
        Self { path, extension }
    }

    pub fn file_name(&self) -> String {
        self.path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default()
    }
}

/// Collect every qualifying file under `root`
///
/// # Arguments
/// * `root` - Directory to scan recursively
/// * `filter` - Extension filter applied to file names
/// * `exclude` - Directory to skip entirely (the quarantine directory)
///
/// # Returns
/// Regular files in traversal order. Siblings are visited by file name so
/// the order is stable between runs. Symlinks (to files or directories) are
/// left out.
pub fn collect_candidate_files(
    root: &Path,
    filter: &ExtensionFilter,
    exclude: Option<&Path>,
) -> DedupResult<Vec<FileEntry>> {
    if !root.is_dir() {
        return Err(DedupError::InvalidConfiguration(format!(
            "not a directory: {}",
            root.display()
        )));
    }

    let excluded = exclude.and_then(|dir| dir.canonicalize().ok());
    let mut files = Vec::new();

    let walker = WalkDir::new(root)
        .follow_links(false)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|entry| !is_excluded(entry, excluded.as_deref()));

    for entry in walker {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => {
                log::warn!("Skipping unreadable entry: {}", e);
                continue;
            }
        };

        // symlinks are never followed or hashed, moving one would only move the link
        if entry.path_is_symlink() {
            log::debug!("Skipping symlink {}", entry.path().display());
            continue;
        }
        if !entry.file_type().is_file() {
            continue;
        }

        if filter.matches(&entry.file_name().to_string_lossy()) {
            files.push(FileEntry::new(entry.into_path()));
        }
    }

    log::debug!("Collected {} candidate file(s) under {}", files.len(), root.display());
    Ok(files)
}

fn is_excluded(entry: &DirEntry, excluded: Option<&Path>) -> bool {
    let Some(excluded) = excluded else {
        return false;
    };
    if entry.depth() == 0 || !entry.file_type().is_dir() {
        return false;
    }
    match entry.path().canonicalize() {
        Ok(path) if path == excluded => {
            log::info!("Not scanning quarantine directory {}", entry.path().display());
            true
        }
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs::{self, File};
    use tempfile::TempDir;

    #[test]
    fn test_collect_files_recursive() {
        let temp_dir = TempDir::new().unwrap();
        let subdir = temp_dir.path().join("subdir");
        fs::create_dir(&subdir).unwrap();

        let file1 = temp_dir.path().join("test1.txt");
        let file2 = subdir.join("test2.txt");
        File::create(&file1).unwrap();
        File::create(&file2).unwrap();

        let files = collect_candidate_files(temp_dir.path(), &ExtensionFilter::All, None).unwrap();
        assert_eq!(files.len(), 2);
        assert!(files.iter().any(|f| f.path == file1));
        assert!(files.iter().any(|f| f.path == file2));
    }

    #[test]
    fn test_collect_files_sorted_by_name() {
        let temp_dir = TempDir::new().unwrap();
        for name in ["c.txt", "a.txt", "b.txt"] {
            File::create(temp_dir.path().join(name)).unwrap();
        }

        let files = collect_candidate_files(temp_dir.path(), &ExtensionFilter::All, None).unwrap();
        let names: Vec<_> = files.iter().map(|f| f.file_name()).collect();
        assert_eq!(names, vec!["a.txt", "b.txt", "c.txt"]);
    }

    #[test]
    fn test_collect_files_applies_filter() {
        let temp_dir = TempDir::new().unwrap();
        for name in ["photo.PNG", "picture.apng", "notes.txt", "scan.jpg"] {
            File::create(temp_dir.path().join(name)).unwrap();
        }

        let filter = ExtensionFilter::suffixes(["png"]);
        let files = collect_candidate_files(temp_dir.path(), &filter, None).unwrap();
        let names: Vec<_> = files.iter().map(|f| f.file_name()).collect();
        assert_eq!(names, vec!["photo.PNG", "picture.apng"]);
        assert_eq!(files[0].extension, "png");
        assert_eq!(files[1].extension, "apng");
    }

    #[test]
    fn test_collect_files_skips_excluded_dir() {
        let temp_dir = TempDir::new().unwrap();
        let quarantine = temp_dir.path().join("CHECK");
        fs::create_dir(&quarantine).unwrap();
        File::create(quarantine.join("old.txt")).unwrap();
        File::create(temp_dir.path().join("new.txt")).unwrap();

        let files =
            collect_candidate_files(temp_dir.path(), &ExtensionFilter::All, Some(&quarantine))
                .unwrap();
        assert_eq!(files.len(), 1);
        assert_eq!(files[0].file_name(), "new.txt");

        // literal behavior: quarantine is scanned like any other directory
        let files = collect_candidate_files(temp_dir.path(), &ExtensionFilter::All, None).unwrap();
        assert_eq!(files.len(), 2);
    }

    #[test]
    fn test_collect_files_ignores_directories() {
        let temp_dir = TempDir::new().unwrap();
        fs::create_dir(temp_dir.path().join("folder.png")).unwrap();

        let filter = ExtensionFilter::suffixes(["png"]);
        let files = collect_candidate_files(temp_dir.path(), &filter, None).unwrap();
        assert!(files.is_empty());
    }

    #[cfg(unix)]
    #[test]
    fn test_collect_files_skips_symlinks() {
        use std::os::unix::fs::symlink;

        let temp_dir = TempDir::new().unwrap();
        let target = temp_dir.path().join("a.txt");
        fs::write(&target, "hello").unwrap();
        symlink(&target, temp_dir.path().join("b_link.txt")).unwrap();
        let subdir = temp_dir.path().join("real");
        fs::create_dir(&subdir).unwrap();
        File::create(subdir.join("inner.txt")).unwrap();
        symlink(&subdir, temp_dir.path().join("dir_link")).unwrap();

        let files = collect_candidate_files(temp_dir.path(), &ExtensionFilter::All, None).unwrap();
        let paths: Vec<_> = files.iter().map(|f| f.path.clone()).collect();
        assert_eq!(paths, vec![target, subdir.join("inner.txt")]);
    }

    #[test]
    fn test_file_entry_without_extension() {
        let entry = FileEntry::new(PathBuf::from("/tmp/Makefile"));
        assert_eq!(entry.extension, "");
        assert_eq!(entry.file_name(), "Makefile");
    }
}
