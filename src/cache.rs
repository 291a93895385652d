use color_eyre::Result;
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::SystemTime;

use crate::data::{self, Dataset};

/// Identity of a file on disk. Two stamps compare equal only when the path,
/// size, and modification time all match.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileStamp {
    path: PathBuf,
    len: u64,
    modified: Option<SystemTime>,
}

impl FileStamp {
    pub fn of(path: &Path) -> Result<Self> {
        let metadata = fs::metadata(path)?;
        Ok(Self {
            path: path.to_path_buf(),
            len: metadata.len(),
            modified: metadata.modified().ok(),
        })
    }
}

/// Memoizes loaded datasets by file identity. A hit returns the cached
/// dataset without re-reading the file; any stamp change (file rewritten,
/// touched, or replaced) invalidates the entry.
#[derive(Default)]
pub struct DatasetCache {
    entries: HashMap<PathBuf, (FileStamp, Dataset)>,
}

impl DatasetCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load a dataset, reusing the cached copy when the file is unchanged.
    pub fn load(&mut self, path: &Path) -> Result<Dataset> {
        let stamp = FileStamp::of(path)?;
        if let Some((cached_stamp, dataset)) = self.entries.get(path) {
            if *cached_stamp == stamp {
                return Ok(dataset.clone());
            }
        }

        let dataset = data::load_dataset(path)?;
        self.entries
            .insert(path.to_path_buf(), (stamp, dataset.clone()));
        Ok(dataset)
    }

    pub fn invalidate(&mut self, path: &Path) {
        self.entries.remove(path);
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_csv(path: &Path, rows: &[&str]) {
        let mut file = fs::File::create(path).unwrap();
        writeln!(file, "case_id,cases_status").unwrap();
        for row in rows {
            writeln!(file, "{}", row).unwrap();
        }
    }

    #[test]
    fn test_cache_hit_returns_same_data() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("data.csv");
        write_csv(&path, &["1,open"]);

        let mut cache = DatasetCache::new();
        let first = cache.load(&path).unwrap();
        let second = cache.load(&path).unwrap();
        assert_eq!(cache.len(), 1);
        assert!(first.frame.equals_missing(&second.frame));
    }

    #[test]
    fn test_cache_invalidated_by_file_change() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("data.csv");
        write_csv(&path, &["1,open"]);

        let mut cache = DatasetCache::new();
        let first = cache.load(&path).unwrap();
        assert_eq!(first.frame.height(), 1);

        // Rewriting with a different size changes the stamp
        write_csv(&path, &["1,open", "2,closed"]);
        let second = cache.load(&path).unwrap();
        assert_eq!(second.frame.height(), 2);
    }

    #[test]
    fn test_explicit_invalidation_and_clear() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("data.csv");
        write_csv(&path, &["1,open"]);

        let mut cache = DatasetCache::new();
        cache.load(&path).unwrap();
        cache.invalidate(&path);
        assert!(cache.is_empty());

        cache.load(&path).unwrap();
        cache.clear();
        assert!(cache.is_empty());
    }

    #[test]
    fn test_missing_file_is_an_error() {
        let mut cache = DatasetCache::new();
        assert!(cache.load(Path::new("/nonexistent/data.csv")).is_err());
    }
}
