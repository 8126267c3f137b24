mod classifier;
mod group_filter;
pub mod parser;
pub mod processor;

pub use self::classifier::*;
pub use self::group_filter::*;
