mod config_reader;
mod file_utils;

pub use self::config_reader::*;
pub use self::file_utils::*;
