use crate::model::{KeepSet, RunStatistics};
use crate::utils::STRM_EXT;
use log::{error, info, trace, warn};
use std::fs;
use std::fs::FileType;
use std::path::{Path, PathBuf};

/// Number of stream file deletions allowed in one run, shared by all roots.
#[derive(Debug)]
pub struct DeletionBudget {
    limit: usize,
    used: usize,
    reported: bool,
}

impl DeletionBudget {
    pub fn new(limit: usize) -> Self {
        Self { limit, used: 0, reported: false }
    }

    pub fn is_exhausted(&self) -> bool {
        self.used >= self.limit
    }

    pub fn used(&self) -> usize {
        self.used
    }

    fn consume(&mut self) {
        self.used += 1;
    }

    fn report(&mut self) {
        if !self.reported {
            self.reported = true;
            warn!("Deletion limit of {} reached, remaining stale stream files are kept", self.limit);
        }
    }
}

fn is_strm_file(path: &Path, file_type: FileType) -> bool {
    !file_type.is_dir() && path.extension().is_some_and(|ext| ext == STRM_EXT)
}

fn read_sorted_entries(dir: &Path) -> std::io::Result<Vec<(PathBuf, FileType)>> {
    let mut entries = vec![];
    for entry in fs::read_dir(dir)? {
        let entry = entry?;
        entries.push((entry.path(), entry.file_type()?));
    }
    entries.sort_by(|(a, _), (b, _)| a.file_name().cmp(&b.file_name()));
    Ok(entries)
}

fn is_empty_dir(dir: &Path) -> std::io::Result<bool> {
    Ok(fs::read_dir(dir)?.next().is_none())
}

fn prune_dir(root: &Path, dir: &Path, keep_set: &KeepSet, budget: &mut DeletionBudget, stats: &mut RunStatistics) -> std::io::Result<()> {
    let mut sub_dirs = vec![];
    for (path, file_type) in read_sorted_entries(dir)? {
        // symlinks report as non-directories and are never followed
        if file_type.is_dir() {
            sub_dirs.push(path);
            continue;
        }
        if !is_strm_file(&path, file_type) {
            continue;
        }
        if keep_set.contains(&path) {
            trace!("Keeping: {}", path.display());
            continue;
        }
        if budget.is_exhausted() {
            budget.report();
            break;
        }
        match fs::remove_file(&path) {
            Ok(()) => {
                info!("Removed stale stream file: {}", path.display());
                budget.consume();
                stats.removed_strm_files += 1;
            }
            Err(err) => error!("Failed to remove file {}: {err}", path.display()),
        }
    }

    for sub_dir in sub_dirs {
        if budget.is_exhausted() {
            break;
        }
        prune_dir(root, &sub_dir, keep_set, budget, stats)?;
    }

    if dir != root && is_empty_dir(dir)? {
        match fs::remove_dir(dir) {
            Ok(()) => {
                info!("Removed empty directory: {}", dir.display());
                stats.removed_empty_dirs += 1;
            }
            Err(err) => error!("Failed to remove directory {}: {err}", dir.display()),
        }
    }
    Ok(())
}

/// Deletes every stream file below `root` which is not in the keep set and removes directories left empty.
///
/// Entries are visited depth first in lexical order. Once the budget is exhausted no further file is deleted
/// and no further subdirectory is entered. The root itself is never removed.
pub fn prune_strm_directory(root: &Path, keep_set: &KeepSet, budget: &mut DeletionBudget, stats: &mut RunStatistics) -> std::io::Result<()> {
    prune_dir(root, root, keep_set, budget, stats)
}
