#![warn(clippy::all, clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::return_self_not_must_use)]
#![allow(clippy::missing_errors_doc)]

#[macro_use]
mod modules;

include_modules!();

use crate::model::{Config, ConfigDto};
use crate::processing::processor::exec_processing;
use crate::utils::{create_client, create_sample_config, ensure_directory, get_default_config_path, init_logger,
                   read_config_dto, save_config, split_comma_list};
use clap::Parser;
use log::{error, info, warn};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "strmsync")]
#[command(version)]
#[command(about = "Synchronizes a tree of .strm files with JSON and M3U stream catalogs", long_about = None)]
struct Args {
    /// The config file
    #[arg(short = 'c', long = "config")]
    config_file: Option<PathBuf>,

    /// Configuration name, without a config file the merged configuration is saved as <name>.yml
    #[arg(short = 'n', long)]
    name: Option<String>,

    /// log level
    #[arg(short = 'l', long = "log-level")]
    log_level: Option<String>,

    /// Target directory for tv shows
    #[arg(long = "tv-shows-dir")]
    tv_shows_dir: Option<String>,

    /// Target directory for movies
    #[arg(long = "movies-dir")]
    movies_dir: Option<String>,

    /// JSON catalog url, can be repeated
    #[arg(short = 'j', long = "json-url")]
    json_url: Vec<String>,

    /// M3U playlist url, can be repeated
    #[arg(short = 'm', long = "m3u")]
    m3u: Vec<String>,

    /// Log file name inside the log directory
    #[arg(long = "log-file")]
    log_file: Option<String>,

    /// Comma separated list of accepted url file types
    #[arg(long = "file-type")]
    file_type: Option<String>,

    #[arg(short = 'w', long = "working-dir")]
    working_dir: Option<String>,

    #[arg(long = "log-dir")]
    log_dir: Option<String>,

    /// Keep downloaded catalog files
    #[arg(long = "retain-download", default_value_t = false)]
    retain_download: bool,

    #[arg(long = "download-dir")]
    download_dir: Option<String>,

    /// Maximum number of stream files deleted in one run
    #[arg(long = "limit-delete")]
    limit_delete: Option<usize>,

    /// Add the group as directory level below the roots
    #[arg(long = "use-group", default_value_t = false)]
    use_group: bool,

    /// Group used for records without group
    #[arg(long = "default-group")]
    default_group: Option<String>,

    /// Comma separated list of excluded groups
    #[arg(long = "exclude-group")]
    exclude_group: Option<String>,

    /// Comma separated list of included groups
    #[arg(long = "include-group")]
    include_group: Option<String>,

    /// Write the written stream file paths to keep_files.txt in the log directory
    #[arg(long = "persist-keep-set", default_value_t = false)]
    persist_keep_set: bool,
}

const VERSION: &str = env!("CARGO_PKG_VERSION");
const BUILD_TIMESTAMP: Option<&str> = option_env!("VERGEN_BUILD_TIMESTAMP");

fn apply_args(dto: &mut ConfigDto, args: &Args) {
    fn set(target: &mut String, value: Option<&String>) {
        if let Some(v) = value {
            target.clone_from(v);
        }
    }
    fn set_option(target: &mut Option<String>, value: Option<&String>) {
        if value.is_some() {
            *target = value.cloned();
        }
    }

    set_option(&mut dto.name, args.name.as_ref());
    set_option(&mut dto.log_level, args.log_level.as_ref());
    set(&mut dto.tv_shows_dir, args.tv_shows_dir.as_ref());
    set(&mut dto.movies_dir, args.movies_dir.as_ref());
    dto.json_urls.extend(args.json_url.iter().cloned());
    dto.m3u_urls.extend(args.m3u.iter().cloned());
    set_option(&mut dto.log_file, args.log_file.as_ref());
    if let Some(file_type) = args.file_type.as_ref() {
        dto.file_type = split_comma_list(file_type);
    }
    set_option(&mut dto.working_dir, args.working_dir.as_ref());
    set_option(&mut dto.log_dir, args.log_dir.as_ref());
    dto.retain_download |= args.retain_download;
    set_option(&mut dto.download_dir, args.download_dir.as_ref());
    if let Some(limit) = args.limit_delete {
        dto.limit_delete = limit;
    }
    dto.use_group |= args.use_group;
    set(&mut dto.default_group, args.default_group.as_ref());
    if let Some(groups) = args.exclude_group.as_ref() {
        dto.exclude_group = split_comma_list(groups);
    }
    if let Some(groups) = args.include_group.as_ref() {
        dto.include_group = split_comma_list(groups);
    }
    dto.persist_keep_set |= args.persist_keep_set;
}

fn main() {
    let no_args = std::env::args_os().len() <= 1;
    let args = Args::parse();

    if no_args {
        init_logger(None, None, None);
        let working_dir = std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."));
        match create_sample_config(&working_dir) {
            Ok(path) => info!("Sample configuration created: {}, start with --config {}", path.display(), path.display()),
            Err(err) => exit!("{err}"),
        }
        return;
    }

    let (mut dto, unknown_keys) = match args.config_file.as_ref() {
        Some(config_file) => read_config_dto(config_file).unwrap_or_else(|err| {
            init_logger(args.log_level.as_ref(), None, None);
            exit!("{err}");
        }),
        None => (ConfigDto::default(), vec![]),
    };
    apply_args(&mut dto, &args);

    let config = match dto.prepare().and_then(|()| Config::try_from(&dto)) {
        Ok(config) => config,
        Err(err) => {
            init_logger(args.log_level.as_ref(), dto.log_level.as_ref(), None);
            exit!("{err}");
        }
    };

    let log_dir_result = ensure_directory(&config.log_dir);
    init_logger(args.log_level.as_ref(), config.log_level.as_ref(), config.log_file.as_deref());
    if let Err(err) = log_dir_result {
        error!("Failed to create log directory {}: {err}", config.log_dir.display());
    }
    for key in &unknown_keys {
        warn!("Unknown configuration key: {key}");
    }

    info!("Version: {VERSION}");
    if let Some(ts) = BUILD_TIMESTAMP {
        info!("Build time: {ts}");
    }
    if let Some(name) = config.name.as_ref() {
        info!("Configuration: {name}");
    }
    info!("Working dir: {}", config.working_dir.display());

    let client = create_client().build().unwrap_or_else(|err| {
        error!("Failed to build http client: {err}");
        reqwest::blocking::Client::new()
    });

    if let Err(err) = exec_processing(&client, &config) {
        exit!("{err}");
    }

    if args.config_file.is_none() {
        if let Some(name) = config.name.as_ref() {
            let path = get_default_config_path(&config.working_dir, name);
            if let Err(err) = save_config(&path, &dto) {
                error!("{err}");
            }
        }
    }
    info!("Synchronization finished");
}

#[cfg(test)]
mod tests {
    use super::{apply_args, Args};
    use crate::model::ConfigDto;
    use clap::Parser;

    #[test]
    fn test_cli_overrides_config() {
        let args = Args::parse_from([
            "strmsync",
            "--tv-shows-dir", "tv",
            "--json-url", "http://x/a.json",
            "--json-url", "http://x/b.json",
            "--limit-delete", "3",
            "--exclude-group", "kids, news",
            "--use-group",
        ]);
        let mut dto = ConfigDto {
            tv_shows_dir: "old_tv".to_string(),
            movies_dir: "movies".to_string(),
            json_urls: vec!["http://x/config.json".to_string()],
            ..ConfigDto::default()
        };
        apply_args(&mut dto, &args);

        assert_eq!(dto.tv_shows_dir, "tv");
        assert_eq!(dto.movies_dir, "movies");
        assert_eq!(dto.json_urls, vec!["http://x/config.json", "http://x/a.json", "http://x/b.json"]);
        assert_eq!(dto.limit_delete, 3);
        assert_eq!(dto.exclude_group, vec!["kids", "news"]);
        assert!(dto.use_group);
        assert!(!dto.retain_download);
    }
}
