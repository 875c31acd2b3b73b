//! Configuration errors.

/// The embedding is set up wrong. Not recoverable per expression.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    #[error("unsupported environment: expected a record or a map, found {found}")]
    UnsupportedEnvironment { found: String },
}
