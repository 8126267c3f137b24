mod json;
mod m3u;

pub use self::json::*;
pub use self::m3u::*;

use crate::error::StrmSyncError;
use crate::model::{RunStatistics, SourceKind, StreamRecord};

/// Turns a fetched source payload into stream records. Url file type filtering only applies to M3U.
pub fn parse_catalog(kind: SourceKind, content: &[u8], file_types: &[String], stats: &mut RunStatistics) -> Result<Vec<StreamRecord>, StrmSyncError> {
    match kind {
        SourceKind::Json => parse_json(content),
        SourceKind::M3u => {
            let text = String::from_utf8_lossy(content);
            let mut records = vec![];
            consume_m3u(&text, file_types, stats, |record| records.push(record));
            Ok(records)
        }
    }
}
