mod playlist;

pub use self::playlist::*;
