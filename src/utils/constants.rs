use regex::Regex;
use std::sync::LazyLock;

pub const SAMPLE_CONFIG_FILE: &str = "sample_config.yml";
pub const CONFIG_FILE_EXT: &str = "yml";
pub const KEEP_FILES_FILE: &str = "keep_files.txt";
pub const LOG_DIR: &str = "Log";
pub const DOWNLOAD_DIR: &str = "Download";
pub const DOWNLOAD_FILE_PREFIX: &str = "strmsync";

pub const STRM_EXT: &str = "strm";
pub const M3U_EXTINF: &str = "#EXTINF:";

pub const DEFAULT_FILE_TYPES: &str = "avi,flv,m4v,mkv,mkv2,mkv5,mkvv,mp4,mp41,mp42,mp44,mpg,wmv";
pub const DEFAULT_GROUP: &str = "Dummy";
pub const DEFAULT_LIMIT_DELETE: usize = 25;
pub const DEFAULT_LOG_LEVEL: &str = "info";

// some providers answer m3u requests only for browser user agents
pub const BROWSER_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/91.0.4472.124 Safari/537.36";

/// Characters which are replaced with an underscore in file and directory names.
pub const FORBIDDEN_FILENAME_CHARS: &[char] = &[
    '<', '>', ':', '"', '/', '\\', '|', '?', '*', '[', ']', '#', '%', '&', '{', '}', '$', '!', '\'', '+', '=', '@',
    '~', '`',
];

pub struct Constants {
    pub re_tv_episode: Regex,
    pub re_tvg_name: Regex,
    pub re_group_title: Regex,
    pub re_env_var: Regex,
    pub re_season_number: Regex,
    pub re_credentials: Regex,
}

pub static CONSTANTS: LazyLock<Constants> = LazyLock::new(||
    Constants {
        re_tv_episode: Regex::new(r"S\d{1,2}E\d{1,3}").unwrap(),
        re_tvg_name: Regex::new(r#"tvg-name="([^"]*)""#).unwrap(),
        re_group_title: Regex::new(r#"group-title="([^"]*)""#).unwrap(),
        re_env_var: Regex::new(r"\$\{env:(?P<var>[a-zA-Z_][a-zA-Z0-9_]*)}").unwrap(),
        re_season_number: Regex::new(r"^S(\d{1,2})E").unwrap(),
        re_credentials: Regex::new(r"((username|password|token)=)[^&]*").unwrap(),
    }
);
