mod config;
mod keep_set;
mod playlist;
mod run_context;
mod stats;

pub use self::config::*;
pub use self::keep_set::*;
pub use self::playlist::*;
pub use self::run_context::*;
pub use self::stats::*;
