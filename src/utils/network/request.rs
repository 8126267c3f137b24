use crate::error::{source_err, StrmSyncError};
use crate::model::SourceKind;
use crate::utils::{open_file, file_reader, BROWSER_USER_AGENT, CONSTANTS};
use flate2::read::GzDecoder;
use log::debug;
use reqwest::header::{HeaderValue, USER_AGENT};
use std::borrow::Cow;
use std::io::{BufRead, ErrorKind, Read};
use std::path::{Path, PathBuf};
use std::time::Duration;
use url::Url;

const GZIP_MAGIC: [u8; 2] = [0x1f, 0x8b];

/// Masks credentials (`username=`, `password=`, `token=`) in urls before they are logged.
pub fn sanitize_sensitive_info(query: &str) -> Cow<'_, str> {
    CONSTANTS.re_credentials.replace_all(query, "$1***")
}

#[inline]
pub fn is_gzip(buffer: &[u8]) -> bool {
    buffer.len() >= 2 && buffer[0..2] == GZIP_MAGIC
}

pub fn is_file_url(url: &str) -> bool {
    Url::parse(url)
        .is_ok_and(|u| u.scheme().eq_ignore_ascii_case("file"))
}

pub fn is_http_url(url: &str) -> bool {
    Url::parse(url)
        .is_ok_and(|u| u.scheme().eq_ignore_ascii_case("http") || u.scheme().eq_ignore_ascii_case("https"))
}

pub fn create_client() -> reqwest::blocking::ClientBuilder {
    reqwest::blocking::Client::builder()
        .redirect(reqwest::redirect::Policy::limited(10))
        .connect_timeout(Duration::from_secs(30))
        .timeout(Duration::from_secs(300))
}

fn decode_content(content: Vec<u8>) -> Result<Vec<u8>, std::io::Error> {
    if !is_gzip(&content) {
        return Ok(content);
    }
    let mut decoded = Vec::new();
    GzDecoder::new(content.as_slice())
        .read_to_end(&mut decoded)
        .map_err(|e| std::io::Error::other(format!("Failed to decode gzip content: {e}")))?;
    Ok(decoded)
}

// read local file content, gzipped file content is supported.
pub fn get_local_file_content(file_path: &Path) -> Result<Vec<u8>, std::io::Error> {
    let file = open_file(file_path).map_err(|err| {
        std::io::Error::new(
            ErrorKind::NotFound,
            format!("Failed to open file: {}, {err}", file_path.display()),
        )
    })?;

    let mut buf_reader = file_reader(file);
    let is_gzipped = is_gzip(buf_reader.fill_buf()?);
    let mut content = Vec::new();
    if is_gzipped {
        GzDecoder::new(buf_reader)
            .read_to_end(&mut content)
            .map_err(|e| std::io::Error::other(format!("Failed to decode gzip content: {e}")))?;
    } else {
        buf_reader.read_to_end(&mut content)?;
    }
    Ok(content)
}

fn get_remote_content(client: &reqwest::blocking::Client, url: &str, user_agent: Option<&'static str>) -> Result<Vec<u8>, std::io::Error> {
    let mut request = client.get(url);
    if let Some(agent) = user_agent {
        request = request.header(USER_AGENT, HeaderValue::from_static(agent));
    }
    let response = request.send().map_err(std::io::Error::other)?;
    let status = response.status();
    if !status.is_success() {
        return Err(std::io::Error::other(format!("Request failed with status {status}")));
    }
    let bytes = response.bytes().map_err(std::io::Error::other)?;
    decode_content(bytes.to_vec())
}

/// Reads a catalog source. `http(s)` urls are downloaded, `file://` urls and plain paths are read locally.
pub fn get_source_content(client: &reqwest::blocking::Client, kind: SourceKind, url: &str) -> Result<Vec<u8>, StrmSyncError> {
    let sanitized = sanitize_sensitive_info(url);
    let result = if is_http_url(url) {
        // some providers only answer playlist requests of a browser
        let user_agent = match kind {
            SourceKind::M3u => Some(BROWSER_USER_AGENT),
            SourceKind::Json => None,
        };
        debug!("Downloading {kind} source {sanitized}");
        get_remote_content(client, url, user_agent)
    } else if is_file_url(url) {
        Url::parse(url)
            .ok()
            .and_then(|u| u.to_file_path().ok())
            .ok_or_else(|| std::io::Error::new(ErrorKind::InvalidInput, "Invalid file url"))
            .and_then(|path| get_local_file_content(&path))
    } else {
        get_local_file_content(&PathBuf::from(url))
    };
    result.map_err(|err| source_err!("Error reading {kind} source {sanitized}: {err}"))
}
