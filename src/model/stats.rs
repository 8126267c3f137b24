use serde::Serialize;
use std::fmt::{Display, Formatter};

/// Counters collected over one reconciliation run.
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize)]
pub struct RunStatistics {
    pub created_dirs: usize,
    pub kept_strm_files: usize,
    pub removed_strm_files: usize,
    pub removed_empty_dirs: usize,
    pub rejected_file_exts: usize,
    pub excluded_groups: usize,
    pub failed_records: usize,
    pub processed_json_urls: usize,
    pub processed_m3u_urls: usize,
}

impl RunStatistics {
    pub fn to_json(&self) -> String {
        serde_json::to_string(self).unwrap_or_default()
    }
}

impl Display for RunStatistics {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "Processed JSON URLs:   {}", self.processed_json_urls)?;
        writeln!(f, "Processed M3U URLs:    {}", self.processed_m3u_urls)?;
        writeln!(f, "Created directories:   {}", self.created_dirs)?;
        writeln!(f, "Kept .strm files:      {}", self.kept_strm_files)?;
        writeln!(f, "Removed .strm files:   {}", self.removed_strm_files)?;
        writeln!(f, "Removed empty dirs:    {}", self.removed_empty_dirs)?;
        writeln!(f, "Rejected extensions:   {}", self.rejected_file_exts)?;
        writeln!(f, "Excluded groups:       {}", self.excluded_groups)?;
        write!(f, "Failed records:        {}", self.failed_records)
    }
}
