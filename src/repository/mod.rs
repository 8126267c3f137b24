mod strm_cleanup;
mod strm_repository;

pub use self::strm_cleanup::*;
pub use self::strm_repository::*;
