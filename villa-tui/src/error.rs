//! Error types for villa-tui
//!
//! Wraps service layer errors and terminal/IO errors.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum TuiError {
    /// Service layer error
    #[error("Service error: {0}")]
    Service(#[from] libvillastay::VillaError),

    /// Terminal/IO error
    #[error("Terminal error: {0}")]
    Terminal(#[from] std::io::Error),

    /// Application state error
    #[error("Application error: {0}")]
    Application(String),
}

impl TuiError {
    /// Process exit code, following the library's conventions
    pub fn exit_code(&self) -> i32 {
        match self {
            TuiError::Service(e) => e.exit_code(),
            TuiError::Terminal(_) | TuiError::Application(_) => 1,
        }
    }
}

pub type Result<T> = std::result::Result<T, TuiError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exit_code_passthrough() {
        let error: TuiError = libvillastay::VillaError::NotSignedIn("none".to_string()).into();
        assert_eq!(error.exit_code(), 2);

        let error: TuiError = std::io::Error::new(std::io::ErrorKind::Other, "tty").into();
        assert_eq!(error.exit_code(), 1);
    }
}
