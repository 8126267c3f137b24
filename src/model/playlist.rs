use crate::utils::deserialize_null_default;
use std::fmt::{Display, Formatter};
use std::path::PathBuf;

/// Format of a catalog source.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum SourceKind {
    /// JSON list of stream records.
    Json,
    /// Line oriented extended M3U playlist.
    M3u,
}

impl SourceKind {
    pub const fn file_extension(self) -> &'static str {
        match self {
            SourceKind::Json => "json",
            SourceKind::M3u => "m3u",
        }
    }
}

impl Display for SourceKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let text = match self {
            SourceKind::Json => "JSON",
            SourceKind::M3u => "M3U",
        };
        write!(f, "{text}")
    }
}

/// One catalog entry. Duplicates are valid and collapse onto the same target path.
#[derive(Debug, Clone, PartialEq, Eq, Default, serde::Serialize, serde::Deserialize)]
pub struct StreamRecord {
    #[serde(default, deserialize_with = "deserialize_null_default")]
    pub url: String,
    #[serde(default, rename = "tvg_name", deserialize_with = "deserialize_null_default")]
    pub display_name: String,
    #[serde(default, rename = "group_title", deserialize_with = "deserialize_null_default")]
    pub group_label: String,
}

impl StreamRecord {
    pub fn new(url: &str, display_name: &str, group_label: &str) -> Self {
        Self {
            url: url.to_string(),
            display_name: display_name.to_string(),
            group_label: group_label.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum MediaKind {
    /// `season` has the format `Sxx`.
    TvEpisode { season: String },
    Movie,
}

impl MediaKind {
    pub fn season(&self) -> Option<&str> {
        match self {
            MediaKind::TvEpisode { season } => Some(season.as_str()),
            MediaKind::Movie => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassifiedTarget {
    pub kind: MediaKind,
    /// readable show or movie title
    pub canonical_name: String,
    /// file system safe show or movie directory name
    pub path_name: String,
    /// file system safe stream file name without extension
    pub file_name: String,
    pub group_label: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TargetPath {
    pub directory: PathBuf,
    pub file: PathBuf,
}
