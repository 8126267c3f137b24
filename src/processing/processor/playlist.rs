use crate::error::StrmSyncError;
use crate::model::{Config, RunContext, SourceKind, StreamRecord};
use crate::processing::classify_stream;
use crate::processing::parser::parse_catalog;
use crate::utils::debug_if_enabled;
use crate::repository::{build_target_path, materialize_strm_file, prepare_strm_roots, prune_strm_directory, DeletionBudget};
use crate::utils::{ensure_directory, get_source_content, persist_file, prepare_persist_path, remove_files,
                   sanitize_sensitive_info, write_lines, DOWNLOAD_FILE_PREFIX, KEEP_FILES_FILE};
use log::{debug, error, info};
use std::path::{Path, PathBuf};

fn persist_download(cfg: &Config, kind: SourceKind, index: usize, content: &[u8], persisted: &mut Vec<PathBuf>) {
    if let Err(err) = ensure_directory(&cfg.download_dir) {
        error!("Failed to create download directory {}: {err}", cfg.download_dir.display());
        return;
    }
    let file_name = format!("{DOWNLOAD_FILE_PREFIX}_{index}_{{}}.{}", kind.file_extension());
    let path = prepare_persist_path(&cfg.download_dir, &file_name);
    if persist_file(&path, content) {
        persisted.push(path);
    }
}

fn load_sources(client: &reqwest::blocking::Client, cfg: &Config, ctx: &mut RunContext,
                persisted: &mut Vec<PathBuf>) -> Result<Vec<StreamRecord>, StrmSyncError> {
    let mut records = vec![];
    let sources = cfg.json_urls.iter().enumerate().map(|(index, url)| (SourceKind::Json, index, url))
        .chain(cfg.m3u_urls.iter().enumerate().map(|(index, url)| (SourceKind::M3u, index, url)));
    for (kind, index, url) in sources {
        info!("Processing {kind} source: {}", sanitize_sensitive_info(url));
        let content = get_source_content(client, kind, url)?;
        persist_download(cfg, kind, index, &content, persisted);
        let source_records = parse_catalog(kind, &content, &cfg.file_types, &mut ctx.stats)?;
        debug!("{} records read from {kind} source", source_records.len());
        records.extend(source_records);
        match kind {
            SourceKind::Json => ctx.stats.processed_json_urls += 1,
            SourceKind::M3u => ctx.stats.processed_m3u_urls += 1,
        }
    }
    Ok(records)
}

fn process_stream(cfg: &Config, ctx: &mut RunContext, record: &StreamRecord) {
    let Some(group_label) = cfg.group_filter.accept(&record.group_label) else {
        debug!("Skipping excluded group '{}': {}", record.group_label, record.display_name);
        ctx.stats.excluded_groups += 1;
        return;
    };
    let target = match classify_stream(record, group_label) {
        Ok(target) => target,
        Err(err) => {
            error!("{err}");
            ctx.stats.failed_records += 1;
            return;
        }
    };
    let target_path = build_target_path(&target, &cfg.tv_shows_dir, &cfg.movies_dir, cfg.use_group);
    materialize_strm_file(ctx, &target_path, &record.url);
}

/// Brings both stream file trees in line with the given records.
///
/// Every record is materialized in order, afterwards stale stream files and empty directories
/// are pruned from the tv shows root and then from the movies root.
pub fn reconcile(cfg: &Config, records: &[StreamRecord], ctx: &mut RunContext) {
    prepare_strm_roots(&[cfg.tv_shows_dir.as_path(), cfg.movies_dir.as_path()]);

    let excluded = cfg.group_filter.excluded_groups();
    if !excluded.is_empty() {
        info!("Exclude groups: {}", excluded.join(", "));
    }
    let included = cfg.group_filter.included_groups();
    if !included.is_empty() {
        info!("Include groups: {}", included.join(", "));
    }

    for record in records {
        process_stream(cfg, ctx, record);
    }

    let mut budget = DeletionBudget::new(cfg.limit_delete);
    for root in [&cfg.tv_shows_dir, &cfg.movies_dir] {
        if let Err(err) = prune_strm_directory(root, &ctx.keep_set, &mut budget, &mut ctx.stats) {
            error!("Error accessing path {}: {err}", root.display());
        }
    }
}

fn write_keep_set(cfg: &Config, ctx: &RunContext, path: &Path) -> Result<(), StrmSyncError> {
    ensure_directory(&cfg.log_dir)?;
    write_lines(path, ctx.keep_set.iter())?;
    Ok(())
}

fn persist_keep_set(cfg: &Config, ctx: &RunContext) {
    let path = cfg.log_dir.join(KEEP_FILES_FILE);
    match write_keep_set(cfg, ctx, &path) {
        Ok(()) => info!("Keep set written to {}", path.display()),
        Err(err) => error!("Failed to write keep set {}: {err}", path.display()),
    }
}

fn log_statistics(ctx: &RunContext) {
    info!("Run statistics:\n{}", ctx.stats);
    info!("Stats: {}", ctx.stats.to_json());
}

/// Runs one complete synchronization: read all sources, reconcile both trees, report.
///
/// A source which can't be read or parsed aborts the run before the file system is touched.
pub fn exec_processing(client: &reqwest::blocking::Client, cfg: &Config) -> Result<RunContext, StrmSyncError> {
    let mut ctx = RunContext::default();
    let mut persisted = vec![];
    let loaded = load_sources(client, cfg, &mut ctx, &mut persisted);
    if !cfg.retain_download {
        remove_files(&persisted);
    }
    let records = loaded?;
    info!("{} stream records to process", records.len());

    reconcile(cfg, &records, &mut ctx);

    debug_if_enabled!("{} stream files in keep set", ctx.keep_set.len());
    if cfg.persist_keep_set {
        persist_keep_set(cfg, &ctx);
    }
    log_statistics(&ctx);
    Ok(ctx)
}

#[cfg(test)]
mod tests {
    use super::{exec_processing, reconcile, write_keep_set};
    use crate::error::StrmSyncErrorKind;
    use crate::model::{Config, ConfigDto, RunContext, StreamRecord};
    use crate::utils::create_client;
    use std::fs;
    use std::path::Path;

    fn config(working_dir: &Path, dto: ConfigDto) -> Config {
        let mut dto = ConfigDto {
            tv_shows_dir: "tvshows".to_string(),
            movies_dir: "movies".to_string(),
            working_dir: Some(working_dir.to_string_lossy().to_string()),
            ..dto
        };
        if dto.json_urls.is_empty() && dto.m3u_urls.is_empty() {
            dto.json_urls = vec!["unused.json".to_string()];
        }
        dto.prepare().unwrap();
        Config::try_from(dto).unwrap()
    }

    fn catalog() -> Vec<StreamRecord> {
        vec![
            StreamRecord::new("http://x/a.mkv", "Show.S01E01", ""),
            StreamRecord::new("http://x/b.avi", "Old.Movie", ""),
        ]
    }

    fn list_files(root: &Path) -> Vec<String> {
        let mut files = vec![];
        let mut stack = vec![root.to_path_buf()];
        while let Some(dir) = stack.pop() {
            for entry in fs::read_dir(&dir).unwrap() {
                let path = entry.unwrap().path();
                files.push(path.strip_prefix(root).unwrap().to_string_lossy().replace('\\', "/"));
                if path.is_dir() {
                    stack.push(path);
                }
            }
        }
        files.sort();
        files
    }

    #[test]
    fn test_reconcile_scenario() {
        let dir = tempfile::tempdir().unwrap();
        let cfg = config(dir.path(), ConfigDto::default());
        let stale = cfg.movies_dir.join("Stale_Movie").join("Stale_Movie.strm");
        fs::create_dir_all(stale.parent().unwrap()).unwrap();
        fs::write(&stale, "http://x/stale.mkv").unwrap();

        let mut ctx = RunContext::default();
        reconcile(&cfg, &catalog(), &mut ctx);

        let episode = cfg.tv_shows_dir.join("Show").join("S01").join("Show_S01E01.strm");
        let movie = cfg.movies_dir.join("Old_Movie").join("Old_Movie.strm");
        assert_eq!(fs::read_to_string(episode).unwrap(), "http://x/a.mkv");
        assert_eq!(fs::read_to_string(movie).unwrap(), "http://x/b.avi");
        assert!(!cfg.movies_dir.join("Stale_Movie").exists());
        assert_eq!(ctx.stats.kept_strm_files, 2);
        assert_eq!(ctx.stats.removed_strm_files, 1);
        assert_eq!(ctx.stats.removed_empty_dirs, 1);
        assert_eq!(ctx.stats.created_dirs, 2);
    }

    #[test]
    fn test_reconcile_is_idempotent() {
        let dir = tempfile::tempdir().unwrap();
        let cfg = config(dir.path(), ConfigDto::default());

        let mut first = RunContext::default();
        reconcile(&cfg, &catalog(), &mut first);
        let tv_files = list_files(&cfg.tv_shows_dir);
        let movie_files = list_files(&cfg.movies_dir);

        let mut second = RunContext::default();
        reconcile(&cfg, &catalog(), &mut second);
        assert_eq!(list_files(&cfg.tv_shows_dir), tv_files);
        assert_eq!(list_files(&cfg.movies_dir), movie_files);
        assert_eq!(second.stats.created_dirs, 0);
        assert_eq!(second.stats.removed_strm_files, 0);
        assert_eq!(second.stats.removed_empty_dirs, 0);
        assert_eq!(second.stats.kept_strm_files, 2);
    }

    #[test]
    fn test_groups() {
        let dir = tempfile::tempdir().unwrap();
        let cfg = config(dir.path(), ConfigDto {
            use_group: true,
            exclude_group: vec!["kids".to_string()],
            ..ConfigDto::default()
        });
        let records = vec![
            StreamRecord::new("http://x/a.mkv", "Cartoon.S01E01", "Kids"),
            StreamRecord::new("http://x/b.mkv", "Documentary", "Science"),
            StreamRecord::new("http://x/c.mkv", "Old.Movie", ""),
            StreamRecord::new("http://x/d.mkv", "S01E01", "Science"),
        ];
        let mut ctx = RunContext::default();
        reconcile(&cfg, &records, &mut ctx);

        assert!(cfg.movies_dir.join("science").join("Documentary").join("Documentary.strm").exists());
        assert!(cfg.movies_dir.join("Dummy").join("Old_Movie").join("Old_Movie.strm").exists());
        assert!(!cfg.tv_shows_dir.join("kids").exists());
        assert_eq!(ctx.stats.excluded_groups, 1);
        assert_eq!(ctx.stats.failed_records, 1);
        assert_eq!(ctx.stats.kept_strm_files, 2);
    }

    #[test]
    fn test_exec_processing_with_local_sources() {
        let dir = tempfile::tempdir().unwrap();
        let json = dir.path().join("list.json");
        fs::write(&json, r#"[{"url": "http://x/a.mkv", "tvg_name": "Show.S01E01", "group_title": ""}]"#).unwrap();
        let m3u = dir.path().join("list.m3u");
        fs::write(&m3u, "#EXTM3U\n#EXTINF:-1 tvg-name=\"Old.Movie\",Old Movie\nhttp://x/b.avi\n#EXTINF:-1 tvg-name=\"Live\",Live\nhttp://x/live.ts\n").unwrap();
        let cfg = config(dir.path(), ConfigDto {
            json_urls: vec![json.to_string_lossy().to_string()],
            m3u_urls: vec![url::Url::from_file_path(&m3u).unwrap().to_string()],
            persist_keep_set: true,
            ..ConfigDto::default()
        });

        let client = create_client().build().unwrap();
        let ctx = exec_processing(&client, &cfg).unwrap();

        assert_eq!(ctx.stats.processed_json_urls, 1);
        assert_eq!(ctx.stats.processed_m3u_urls, 1);
        assert_eq!(ctx.stats.rejected_file_exts, 1);
        assert_eq!(ctx.stats.kept_strm_files, 2);
        assert!(cfg.tv_shows_dir.join("Show").join("S01").join("Show_S01E01.strm").exists());
        assert!(cfg.movies_dir.join("Old_Movie").join("Old_Movie.strm").exists());

        let keep_files = fs::read_to_string(cfg.log_dir.join("keep_files.txt")).unwrap();
        assert_eq!(keep_files.lines().count(), 2);
        let downloads: Vec<_> = fs::read_dir(&cfg.download_dir).unwrap().collect();
        assert!(downloads.is_empty());
    }

    #[test]
    fn test_exec_processing_fails_on_bad_source() {
        let dir = tempfile::tempdir().unwrap();
        let json = dir.path().join("broken.json");
        fs::write(&json, "{ not json").unwrap();
        let cfg = config(dir.path(), ConfigDto {
            json_urls: vec![json.to_string_lossy().to_string()],
            retain_download: true,
            ..ConfigDto::default()
        });

        let client = create_client().build().unwrap();
        assert!(exec_processing(&client, &cfg).is_err());
        assert!(!cfg.tv_shows_dir.exists());
        assert_eq!(fs::read_dir(&cfg.download_dir).unwrap().count(), 1);
    }

    #[test]
    fn test_keep_set_write_failure_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("logs"), "").unwrap();
        let cfg = config(dir.path(), ConfigDto {
            log_dir: Some("logs".to_string()),
            ..ConfigDto::default()
        });
        let mut ctx = RunContext::default();
        reconcile(&cfg, &catalog(), &mut ctx);

        let err = write_keep_set(&cfg, &ctx, &cfg.log_dir.join("keep_files.txt")).unwrap_err();
        assert_eq!(err.kind, StrmSyncErrorKind::Io);
    }
}
