use std::collections::{BTreeSet, HashSet};
use std::path::{Path, PathBuf};

/// Stream file paths written during the current run.
///
/// Paths are stored as materialized, lookups are case-insensitive.
#[derive(Debug, Default)]
pub struct KeepSet {
    paths: BTreeSet<PathBuf>,
    keys: HashSet<String>,
}

fn path_key(path: &Path) -> String {
    path.to_string_lossy().to_lowercase()
}

impl KeepSet {
    pub fn insert(&mut self, path: PathBuf) -> bool {
        self.keys.insert(path_key(&path));
        self.paths.insert(path)
    }

    pub fn contains(&self, path: &Path) -> bool {
        self.keys.contains(&path_key(path))
    }

    pub fn len(&self) -> usize {
        self.paths.len()
    }

    pub fn is_empty(&self) -> bool {
        self.paths.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item=&PathBuf> {
        self.paths.iter()
    }
}
