use std::error::Error;
use std::fmt::{Display, Formatter, Result};

#[macro_export]
macro_rules! config_err {
    ($($arg:tt)*) => {
        $crate::error::StrmSyncError::new($crate::error::StrmSyncErrorKind::Config, format!($($arg)*))
    };
}
pub use config_err;

#[macro_export]
macro_rules! source_err {
    ($($arg:tt)*) => {
        $crate::error::StrmSyncError::new($crate::error::StrmSyncErrorKind::Source, format!($($arg)*))
    };
}
pub use source_err;

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum StrmSyncErrorKind {
    // invalid or inconsistent configuration, detected before any processing
    Config,
    // a catalog source could not be fetched or parsed
    Source,
    // writing run artifacts failed
    Io,
}

impl Display for StrmSyncErrorKind {
    fn fmt(&self, f: &mut Formatter) -> Result {
        let text = match self {
            StrmSyncErrorKind::Config => "config",
            StrmSyncErrorKind::Source => "source",
            StrmSyncErrorKind::Io => "io",
        };
        write!(f, "{text}")
    }
}

#[derive(Debug)]
pub struct StrmSyncError {
    pub kind: StrmSyncErrorKind,
    pub message: String,
}

impl StrmSyncError {
    pub const fn new(kind: StrmSyncErrorKind, message: String) -> Self {
        Self { kind, message }
    }
}

impl Display for StrmSyncError {
    fn fmt(&self, f: &mut Formatter) -> Result {
        write!(f, "StrmSync {} error: {}", self.kind, self.message)
    }
}

impl Error for StrmSyncError {}

impl From<std::io::Error> for StrmSyncError {
    fn from(err: std::io::Error) -> Self {
        Self::new(StrmSyncErrorKind::Io, err.to_string())
    }
}

pub fn to_io_error<E>(err: E) -> std::io::Error
where
    E: std::error::Error,
{ std::io::Error::other(err.to_string()) }

#[cfg(test)]
mod tests {
    use crate::error::{StrmSyncError, StrmSyncErrorKind};

    fn failing(name: &str) -> Result<(), StrmSyncError> {
        Err(config_err!("bad value for {name}"))
    }

    #[test]
    fn test_error_display() {
        let err = failing("limit_delete").unwrap_err();
        assert_eq!(err.kind, StrmSyncErrorKind::Config);
        assert_eq!(err.to_string(), "StrmSync config error: bad value for limit_delete");
    }

    #[test]
    fn test_error_from_io() {
        fn write() -> Result<(), StrmSyncError> {
            Err::<(), _>(std::io::Error::other("disk full"))?;
            Ok(())
        }
        let err = write().unwrap_err();
        assert_eq!(err.kind, StrmSyncErrorKind::Io);
        assert_eq!(err.to_string(), "StrmSync io error: disk full");
    }

    #[test]
    fn test_kind_macros() {
        assert_eq!(config_err!("x").kind, StrmSyncErrorKind::Config);
        assert_eq!(source_err!("y {}", 1).message, "y 1");
    }
}
