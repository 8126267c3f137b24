use crate::error::{config_err, to_io_error, StrmSyncError};
use crate::model::{ConfigDto, CONFIG_KEYS, CONFIG_KEY_ALIASES};
use crate::utils::{ensure_directory, get_file_path, open_file, file_reader, CONSTANTS, DOWNLOAD_DIR, LOG_DIR, SAMPLE_CONFIG_FILE};
use log::{error, info};
use serde::Serialize;
use std::env;
use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};

pub fn resolve_env_var(value: &str) -> String {
    if value.is_empty() {
        return String::new();
    }
    CONSTANTS.re_env_var.replace_all(value, |caps: &regex::Captures| {
        let var_name = &caps["var"];
        env::var(var_name).unwrap_or_else(|e| {
            error!("Could not resolve env var '{var_name}': {e}");
            format!("${{env:{var_name}}}")
        })
    }).to_string()
}

/// Top level keys of a configuration mapping which are not known configuration keys.
pub fn find_unknown_config_keys(value: &serde_yaml::Value) -> Vec<String> {
    value.as_mapping().map_or_else(Vec::new, |mapping| {
        mapping.keys()
            .map(|key| key.as_str().map_or_else(|| format!("{key:?}"), ToString::to_string))
            .filter(|key| !CONFIG_KEYS.contains(&key.as_str()) && !CONFIG_KEY_ALIASES.contains(&key.as_str()))
            .collect()
    })
}

/// Parses configuration text. `${env:VAR}` placeholders are resolved before parsing.
///
/// Returns the configuration and the unknown keys found in it.
pub fn parse_config_dto(content: &str) -> Result<(ConfigDto, Vec<String>), StrmSyncError> {
    let resolved = resolve_env_var(content);
    let value: serde_yaml::Value = serde_yaml::from_str(&resolved)
        .map_err(|err| config_err!("cant read config file: {err}"))?;
    if value.is_null() {
        return Ok((ConfigDto::default(), vec![]));
    }
    let unknown_keys = find_unknown_config_keys(&value);
    let dto = serde_yaml::from_value::<ConfigDto>(value)
        .map_err(|err| config_err!("cant read config file: {err}"))?;
    Ok((dto, unknown_keys))
}

pub fn read_config_dto(config_file: &Path) -> Result<(ConfigDto, Vec<String>), StrmSyncError> {
    let mut content = String::new();
    open_file(config_file)
        .and_then(|file| file_reader(file).read_to_string(&mut content))
        .map_err(|err| config_err!("cant read config file {}: {err}", config_file.display()))?;
    parse_config_dto(&content)
}

fn write_config_file<T>(path: &Path, config: &T) -> Result<(), StrmSyncError>
where
    T: ?Sized + Serialize,
{
    info!("Saving file to {}", path.display());
    File::create(path)
        .and_then(|f| serde_yaml::to_writer(f, &config).map_err(to_io_error))
        .map_err(|err| config_err!("Could not write file {}: {err}", path.display()))
}

pub fn save_config(path: &Path, config: &ConfigDto) -> Result<(), StrmSyncError> {
    write_config_file(path, config)
}

/// Writes `sample_config.yml` and creates the default directories it refers to.
///
/// An existing sample configuration is left untouched.
pub fn create_sample_config(working_dir: &Path) -> Result<PathBuf, StrmSyncError> {
    let sample = ConfigDto::sample();
    for dir in [sample.tv_shows_dir.as_str(), sample.movies_dir.as_str(), LOG_DIR, DOWNLOAD_DIR] {
        let path = get_file_path(working_dir, dir);
        ensure_directory(&path)
            .map_err(|err| config_err!("Could not create directory {}: {err}", path.display()))?;
    }
    let path = working_dir.join(SAMPLE_CONFIG_FILE);
    if !path.exists() {
        write_config_file(&path, &sample)?;
    }
    Ok(path)
}
