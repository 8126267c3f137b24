mod strm_sync_error;

pub use self::strm_sync_error::*;
