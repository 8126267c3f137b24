use crate::utils::DEFAULT_LOG_LEVEL;
use env_logger::{Builder, Target};
use log::{info, LevelFilter};
use std::fs::{File, OpenOptions};
use std::io::Write;
use std::path::Path;

const LOG_ERROR_LEVEL_MOD: &[&str] = &[
    "reqwest::blocking",
    "reqwest::connect",
    "hyper_util::client",
    "rustls",
];

const ENV_LOG_LEVEL: &str = "STRMSYNC_LOG";

// writes every log line to stdout and to the configured log file
struct LogFileTee {
    file: File,
}

impl Write for LogFileTee {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        std::io::stdout().write_all(buf)?;
        self.file.write_all(buf)?;
        Ok(buf.len())
    }

    fn flush(&mut self) -> std::io::Result<()> {
        std::io::stdout().flush()?;
        self.file.flush()
    }
}

pub fn get_log_level(log_level: &str) -> LevelFilter {
    let level = log_level.trim().to_lowercase();
    // numeric levels: 0 = silent, 1 = basic information, 3 = debug
    if let Ok(num) = level.parse::<u8>() {
        return match num {
            0 => LevelFilter::Off,
            1 | 2 => LevelFilter::Info,
            3 => LevelFilter::Debug,
            _ => LevelFilter::Trace,
        };
    }
    match level.as_str() {
        "trace" => LevelFilter::Trace,
        "debug" => LevelFilter::Debug,
        "warn" => LevelFilter::Warn,
        "error" => LevelFilter::Error,
        "off" => LevelFilter::Off,
        // "info" => LevelFilter::Info,
        _ => LevelFilter::Info,
    }
}

/// Initializes the global logger.
///
/// Level priority: CLI argument, `STRMSYNC_LOG` env var, config value, default `info`.
/// When `log_file` is given, log output is appended to it in addition to stdout.
pub fn init_logger(user_log_level: Option<&String>, config_log_level: Option<&String>, log_file: Option<&Path>) {
    let env_log_level = std::env::var(ENV_LOG_LEVEL).ok();

    let mut log_builder = Builder::from_default_env();

    let mut log_file_error = None;
    let file = log_file.and_then(|path| {
        OpenOptions::new().create(true).append(true).open(path)
            .map_err(|err| log_file_error = Some(format!("Failed to open log file {}: {err}", path.display())))
            .ok()
    });
    if let Some(file) = file {
        log_builder.target(Target::Pipe(Box::new(LogFileTee { file })));
    } else {
        log_builder.target(Target::Stdout);
    }

    let log_level = user_log_level
        .map(ToString::to_string) // cli-argument
        .or(env_log_level) // env
        .or_else(|| config_log_level.map(ToString::to_string)) // config
        .unwrap_or_else(|| DEFAULT_LOG_LEVEL.to_string()); // Default

    let mut log_levels = vec![];
    if log_level.contains('=') {
        for pair in log_level.split(',') {
            if pair.contains('=') {
                let mut kv_iter = pair.split('=').map(str::trim);
                if let (Some(module), Some(level)) = (kv_iter.next(), kv_iter.next()) {
                    let log_level = get_log_level(level);
                    log_levels.push(format!("{module}={log_level}"));
                    log_builder.filter_module(module, log_level);
                }
            } else {
                let level = get_log_level(pair);
                log_levels.push(level.to_string());
                log_builder.filter_level(level);
            }
        }
    } else {
        let level = get_log_level(&log_level);
        log_builder.filter_level(level);
        log_levels.push(level.to_string());
    }
    for module in LOG_ERROR_LEVEL_MOD {
        log_builder.filter_module(module, LevelFilter::Error);
    }
    // a second initialization (e.g. after a config error) keeps the first logger
    if log_builder.try_init().is_err() {
        return;
    }
    if let Some(msg) = log_file_error {
        log::error!("{msg}");
    }
    info!("Log Level {}", &log_levels.join(", "));
}
