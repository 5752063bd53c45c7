use thiserror::Error;

/// Hard validation failures raised while constructing domain entities.
///
/// Soft inconsistencies (inverted price ranges, suspicious name shapes,
/// review-count mismatches) are logged via `tracing` and never surface
/// here.
#[derive(Debug, Error)]
pub enum ModelError {
    #[error("enterprise name is empty after normalization")]
    EmptyName,

    #[error("enterprise name exceeds {max} characters: {len}")]
    NameTooLong { len: usize, max: usize },

    #[error("service name is empty after normalization")]
    EmptyServiceName,

    #[error("service name exceeds {max} characters: {len}")]
    ServiceNameTooLong { len: usize, max: usize },

    #[error("service {field} contains characters outside the price alphabet: {value:?}")]
    InvalidPriceField { field: &'static str, value: String },

    #[error("review author is empty after normalization")]
    EmptyAuthor,

    #[error("review author exceeds {max} characters: {len}")]
    AuthorTooLong { len: usize, max: usize },

    #[error("review rating {0} is outside 1-5")]
    RatingOutOfRange(i64),
}

/// Errors loading the extractor configuration from the environment or a
/// YAML file.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid value for {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },

    #[error("failed to read config file {path}: {source}")]
    FileIo {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config file: {0}")]
    FileParse(#[from] serde_yaml::Error),

    #[error("config validation failed: {0}")]
    Validation(String),
}
