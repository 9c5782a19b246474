//! CLI error types.

use thiserror::Error;

use facemark_media::MediaError;
use facemark_models::InvalidOption;

pub type CliResult<T> = Result<T, CliError>;

#[derive(Debug, Error)]
pub enum CliError {
    #[error(transparent)]
    InvalidOption(#[from] InvalidOption),

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Media error: {0}")]
    Media(#[from] MediaError),
}

impl CliError {
    pub fn invalid_argument(msg: impl Into<String>) -> Self {
        Self::InvalidArgument(msg.into())
    }

    /// Process exit code: 2 for usage errors, 3 for a record with no faces,
    /// 1 for everything else.
    pub fn exit_code(&self) -> u8 {
        match self {
            CliError::InvalidOption(_) | CliError::InvalidArgument(_) => 2,
            CliError::Media(MediaError::InvalidOption(_)) => 2,
            e if e.is_malformed_record() => 3,
            _ => 1,
        }
    }

    /// Check if the input record was unusable.
    pub fn is_malformed_record(&self) -> bool {
        matches!(self, CliError::Media(e) if e.is_malformed_record())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use facemark_models::ModelError;

    #[test]
    fn test_exit_codes() {
        assert_eq!(CliError::from(InvalidOption("9".into())).exit_code(), 2);
        assert_eq!(CliError::invalid_argument("region").exit_code(), 2);
        let missing = CliError::from(MediaError::ImageNotFound("a.png".into()));
        assert_eq!(missing.exit_code(), 1);
    }

    #[test]
    fn test_invalid_option_message() {
        let err = CliError::from(InvalidOption("9".into()));
        assert_eq!(err.to_string(), "Invalid option: 9");
    }

    #[test]
    fn test_malformed_record_exit_code() {
        let err = CliError::from(MediaError::from(ModelError::malformed("empty")));
        assert!(err.is_malformed_record());
        assert_eq!(err.exit_code(), 3);
    }
}
