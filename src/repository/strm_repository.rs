use crate::model::{ClassifiedTarget, MediaKind, RunContext, TargetPath};
use crate::utils::{sanitize_file_name, STRM_EXT};
use log::{debug, error};
use std::fs::{create_dir_all, File};
use std::io::Write;
use std::path::Path;

/// Computes where the stream file of a classified record lives.
///
/// Movies: `<movies_root>/[<group>/]<name>/<name>.strm`
/// TV episodes: `<tv_root>/[<group>/]<show>/<season>/<episode>.strm`
pub fn build_target_path(target: &ClassifiedTarget, tv_root: &Path, movies_root: &Path, use_group: bool) -> TargetPath {
    let root = match target.kind {
        MediaKind::TvEpisode { .. } => tv_root,
        MediaKind::Movie => movies_root,
    };
    let mut directory = root.to_path_buf();
    if use_group {
        let group = sanitize_file_name(&target.group_label);
        if !group.is_empty() {
            directory.push(group);
        }
    }
    directory.push(&target.path_name);
    if let Some(season) = target.kind.season() {
        directory.push(season);
    }
    let file = directory.join(format!("{}.{STRM_EXT}", target.file_name));
    TargetPath { directory, file }
}

/// Creates both roots up front, so pruning always has a tree to walk.
pub fn prepare_strm_roots(roots: &[&Path]) {
    for root in roots {
        if let Err(e) = create_dir_all(root) {
            error!("Failed to create STRM directory {}: {e}", root.display());
        }
    }
}

fn ensure_strm_file_directory(ctx: &mut RunContext, output_path: &Path) -> Result<(), String> {
    if !output_path.exists() {
        create_dir_all(output_path)
            .map_err(|e| format!("Failed to create directory {}: {e}", output_path.display()))?;
        debug!("Created directory: {}", output_path.display());
        ctx.stats.created_dirs += 1;
    }
    Ok(())
}

fn write_strm_file(file_path: &Path, content_as_bytes: &[u8]) -> Result<(), String> {
    File::create(file_path)
        .map_err(|err| format!("Failed to create strm file {}: {err}", file_path.display()))?
        .write_all(content_as_bytes)
        .map_err(|err| format!("Failed to write strm file {}: {err}", file_path.display()))
}

/// Writes the url into the target stream file, overwriting any existing content.
///
/// On success the file is added to the keep set. Failures are logged and counted as failed records.
pub fn materialize_strm_file(ctx: &mut RunContext, target_path: &TargetPath, url: &str) -> bool {
    let result = ensure_strm_file_directory(ctx, &target_path.directory)
        .and_then(|()| write_strm_file(&target_path.file, url.as_bytes()));
    match result {
        Ok(()) => {
            debug!("Written: {}", target_path.file.display());
            ctx.keep_set.insert(target_path.file.clone());
            ctx.stats.kept_strm_files += 1;
            true
        }
        Err(err) => {
            error!("{err}");
            ctx.stats.failed_records += 1;
            false
        }
    }
}
