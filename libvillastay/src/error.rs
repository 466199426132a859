//! Error types for Villastay

use thiserror::Error;

pub type Result<T> = std::result::Result<T, VillaError>;

#[derive(Error, Debug)]
pub enum VillaError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("API error: {0}")]
    Api(#[from] ApiError),

    #[error("Schema error: {0}")]
    Schema(#[from] SchemaError),

    #[error("Not signed in: {0}")]
    NotSignedIn(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

impl VillaError {
    /// Returns the appropriate exit code for this error
    pub fn exit_code(&self) -> i32 {
        match self {
            VillaError::InvalidInput(_) => 3,
            VillaError::NotSignedIn(_) => 2,
            VillaError::Api(ApiError::Authentication(_)) => 2,
            VillaError::Api(_) => 1,
            VillaError::Schema(_) => 1,
            VillaError::Config(_) => 1,
        }
    }

    /// True when retrying the same request later could succeed
    pub fn is_transient(&self) -> bool {
        matches!(
            self,
            VillaError::Api(ApiError::Network(_))
                | VillaError::Api(ApiError::Server(_))
                | VillaError::Api(ApiError::RateLimit(_))
        )
    }
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    ReadError(#[from] std::io::Error),

    #[error("Failed to parse config: {0}")]
    ParseError(#[from] toml::de::Error),

    #[error("Missing required field: {0}")]
    MissingField(String),

    #[error("Invalid value for {field}: {reason}")]
    InvalidValue { field: String, reason: String },

    #[error("Token storage failed: {0}")]
    Token(String),
}

/// Failures talking to the booking backend
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ApiError {
    #[error("Authentication failed: {0}")]
    Authentication(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Request rejected: {0}")]
    Validation(String),

    #[error("Rate limit exceeded: {0}")]
    RateLimit(String),

    #[error("Server error: {0}")]
    Server(String),

    #[error("Network error: {0}")]
    Network(String),

    #[error("Unexpected response shape: {0}")]
    Schema(String),
}

/// A record failed schema validation
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{entity} failed validation: {details}")]
pub struct SchemaError {
    pub entity: String,
    pub details: String,
}

impl SchemaError {
    pub fn new(entity: impl Into<String>, details: impl Into<String>) -> Self {
        Self {
            entity: entity.into(),
            details: details.into(),
        }
    }
}
