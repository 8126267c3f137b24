use crate::error::{source_err, StrmSyncError};
use crate::model::StreamRecord;

/// Decodes a JSON array of `{url, tvg_name, group_title}` objects. Missing fields are empty.
pub fn parse_json(content: &[u8]) -> Result<Vec<StreamRecord>, StrmSyncError> {
    serde_json::from_slice::<Vec<StreamRecord>>(content)
        .map_err(|err| source_err!("Error parsing json: {err}"))
}
