pub mod macros;
mod base;

pub use self::base::*;
