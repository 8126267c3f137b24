use crate::error::{config_err, StrmSyncError};
use crate::model::macros;
use crate::processing::GroupFilter;
use crate::utils::{deserialize_as_bool, deserialize_as_list, deserialize_as_option_string, get_file_path, is_file_url, is_http_url,
                   split_comma_list, DEFAULT_FILE_TYPES, DEFAULT_GROUP, DEFAULT_LIMIT_DELETE, DOWNLOAD_DIR, LOG_DIR};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Keys accepted in a configuration file. Everything else is reported as unknown.
pub const CONFIG_KEYS: &[&str] = &[
    "name",
    "log_level",
    "tv_shows_dir",
    "movies_dir",
    "json_urls",
    "m3u_urls",
    "log_file",
    "file_type",
    "working_dir",
    "log_dir",
    "retain_download",
    "download_dir",
    "limit_delete",
    "use_group",
    "default_group",
    "exclude_group",
    "include_group",
    "persist_keep_set",
];

/// camelCase keys of older configuration files, accepted as aliases of [`CONFIG_KEYS`].
pub const CONFIG_KEY_ALIASES: &[&str] = &[
    "logLevel",
    "tvShowsDir",
    "moviesDir",
    "jsonURLs",
    "m3uURLs",
    "logFile",
    "fileType",
    "workingDir",
    "logDir",
    "retainDownload",
    "downloadDir",
    "limitDelete",
    "useGroup",
    "defaultGroup",
    "excludeGroup",
    "includeGroup",
    "persistKeepSet",
];

fn default_file_types() -> Vec<String> {
    split_comma_list(DEFAULT_FILE_TYPES)
}

fn default_limit_delete() -> usize {
    DEFAULT_LIMIT_DELETE
}

fn default_group() -> String {
    DEFAULT_GROUP.to_string()
}

fn is_false(value: &bool) -> bool {
    !*value
}

// local source files are relative to the working directory
fn resolve_source(working_dir: &Path, source: &str) -> String {
    if is_http_url(source) || is_file_url(source) {
        source.to_string()
    } else {
        get_file_path(working_dir, source).to_string_lossy().to_string()
    }
}

fn trim_list(list: &mut Vec<String>) {
    *list = list.iter()
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect();
}

fn trim_option(value: &mut Option<String>) {
    *value = value.as_ref()
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty());
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ConfigDto {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, alias = "logLevel", deserialize_with = "deserialize_as_option_string", skip_serializing_if = "Option::is_none")]
    pub log_level: Option<String>,
    #[serde(default, alias = "tvShowsDir")]
    pub tv_shows_dir: String,
    #[serde(default, alias = "moviesDir")]
    pub movies_dir: String,
    #[serde(default, alias = "jsonURLs", deserialize_with = "deserialize_as_list", skip_serializing_if = "Vec::is_empty")]
    pub json_urls: Vec<String>,
    #[serde(default, alias = "m3uURLs", deserialize_with = "deserialize_as_list", skip_serializing_if = "Vec::is_empty")]
    pub m3u_urls: Vec<String>,
    #[serde(default, alias = "logFile", skip_serializing_if = "Option::is_none")]
    pub log_file: Option<String>,
    #[serde(default = "default_file_types", alias = "fileType", deserialize_with = "deserialize_as_list")]
    pub file_type: Vec<String>,
    #[serde(default, alias = "workingDir", skip_serializing_if = "Option::is_none")]
    pub working_dir: Option<String>,
    #[serde(default, alias = "logDir", skip_serializing_if = "Option::is_none")]
    pub log_dir: Option<String>,
    #[serde(default, alias = "retainDownload", deserialize_with = "deserialize_as_bool", skip_serializing_if = "is_false")]
    pub retain_download: bool,
    #[serde(default, alias = "downloadDir", skip_serializing_if = "Option::is_none")]
    pub download_dir: Option<String>,
    #[serde(default = "default_limit_delete", alias = "limitDelete")]
    pub limit_delete: usize,
    #[serde(default, alias = "useGroup", deserialize_with = "deserialize_as_bool", skip_serializing_if = "is_false")]
    pub use_group: bool,
    #[serde(default = "default_group", alias = "defaultGroup")]
    pub default_group: String,
    #[serde(default, alias = "excludeGroup", deserialize_with = "deserialize_as_list", skip_serializing_if = "Vec::is_empty")]
    pub exclude_group: Vec<String>,
    #[serde(default, alias = "includeGroup", deserialize_with = "deserialize_as_list", skip_serializing_if = "Vec::is_empty")]
    pub include_group: Vec<String>,
    #[serde(default, alias = "persistKeepSet", deserialize_with = "deserialize_as_bool", skip_serializing_if = "is_false")]
    pub persist_keep_set: bool,
}

impl Default for ConfigDto {
    fn default() -> Self {
        Self {
            name: None,
            log_level: None,
            tv_shows_dir: String::new(),
            movies_dir: String::new(),
            json_urls: vec![],
            m3u_urls: vec![],
            log_file: None,
            file_type: default_file_types(),
            working_dir: None,
            log_dir: None,
            retain_download: false,
            download_dir: None,
            limit_delete: DEFAULT_LIMIT_DELETE,
            use_group: false,
            default_group: default_group(),
            exclude_group: vec![],
            include_group: vec![],
            persist_keep_set: false,
        }
    }
}

impl ConfigDto {
    /// Configuration written to `sample_config.yml` on a first start without arguments.
    pub fn sample() -> Self {
        Self {
            name: Some("sample".to_string()),
            log_level: Some("info".to_string()),
            tv_shows_dir: "vod_tv".to_string(),
            movies_dir: "vod_movie".to_string(),
            json_urls: vec!["http://localhost/playlist.json".to_string()],
            m3u_urls: vec!["http://localhost/get.php?username=user&password=secret&type=m3u_plus".to_string()],
            log_file: Some("strmsync.log".to_string()),
            ..Self::default()
        }
    }

    pub fn prepare(&mut self) -> Result<(), StrmSyncError> {
        trim_option(&mut self.name);
        trim_option(&mut self.log_level);
        trim_option(&mut self.log_file);
        trim_option(&mut self.working_dir);
        trim_option(&mut self.log_dir);
        trim_option(&mut self.download_dir);
        self.tv_shows_dir = self.tv_shows_dir.trim().to_string();
        self.movies_dir = self.movies_dir.trim().to_string();
        self.default_group = self.default_group.trim().to_string();
        trim_list(&mut self.json_urls);
        trim_list(&mut self.m3u_urls);
        trim_list(&mut self.file_type);
        trim_list(&mut self.exclude_group);
        trim_list(&mut self.include_group);

        let mut missing = vec![];
        if self.tv_shows_dir.is_empty() {
            missing.push("tv_shows_dir");
        }
        if self.movies_dir.is_empty() {
            missing.push("movies_dir");
        }
        if self.json_urls.is_empty() && self.m3u_urls.is_empty() {
            missing.push("json_urls or m3u_urls");
        }
        if !missing.is_empty() {
            return Err(config_err!("Missing required parameters: {}", missing.join(", ")));
        }

        if let Some(log_file) = self.log_file.as_ref() {
            if log_file.contains(['/', '\\']) {
                return Err(config_err!("log_file must be a file name, not a path: {log_file}"));
            }
        }
        if self.default_group.is_empty() {
            self.default_group = default_group();
        }
        if self.file_type.is_empty() {
            self.file_type = default_file_types();
        }
        Ok(())
    }
}

/// Prepared runtime configuration with all paths resolved against the working directory.
#[derive(Debug, Clone)]
pub struct Config {
    pub name: Option<String>,
    pub log_level: Option<String>,
    pub working_dir: PathBuf,
    pub tv_shows_dir: PathBuf,
    pub movies_dir: PathBuf,
    pub json_urls: Vec<String>,
    pub m3u_urls: Vec<String>,
    pub log_dir: PathBuf,
    pub log_file: Option<PathBuf>,
    pub download_dir: PathBuf,
    pub retain_download: bool,
    /// lower-cased url suffixes
    pub file_types: Vec<String>,
    pub limit_delete: usize,
    pub use_group: bool,
    pub group_filter: GroupFilter,
    pub persist_keep_set: bool,
}

macros::try_from_impl!(Config);

impl TryFrom<&ConfigDto> for Config {
    type Error = StrmSyncError;

    fn try_from(dto: &ConfigDto) -> Result<Self, Self::Error> {
        let working_dir = match dto.working_dir.as_ref() {
            Some(dir) => PathBuf::from(dir),
            None => std::env::current_dir()
                .map_err(|err| config_err!("Could not determine working directory: {err}"))?,
        };
        if !working_dir.is_dir() {
            return Err(config_err!("Working directory does not exist: {}", working_dir.display()));
        }

        let resolve = |path: Option<&String>, default: &str| -> PathBuf {
            get_file_path(&working_dir, path.map_or(default, String::as_str))
        };
        let log_dir = resolve(dto.log_dir.as_ref(), LOG_DIR);
        let log_file = dto.log_file.as_ref().map(|file| log_dir.join(file));

        let group_filter = GroupFilter::new(&dto.default_group, &dto.exclude_group, &dto.include_group)?;

        Ok(Self {
            name: dto.name.clone(),
            log_level: dto.log_level.clone(),
            tv_shows_dir: get_file_path(&working_dir, &dto.tv_shows_dir),
            movies_dir: get_file_path(&working_dir, &dto.movies_dir),
            json_urls: dto.json_urls.iter().map(|url| resolve_source(&working_dir, url)).collect(),
            m3u_urls: dto.m3u_urls.iter().map(|url| resolve_source(&working_dir, url)).collect(),
            log_file,
            download_dir: resolve(dto.download_dir.as_ref(), DOWNLOAD_DIR),
            log_dir,
            retain_download: dto.retain_download,
            file_types: dto.file_type.iter().map(|ext| ext.to_lowercase()).collect(),
            limit_delete: dto.limit_delete,
            use_group: dto.use_group,
            group_filter,
            persist_keep_set: dto.persist_keep_set,
            working_dir,
        })
    }
}
