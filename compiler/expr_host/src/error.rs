//! Host boundary errors.

use expr_conf::ConfigError;
use expr_ir::DecodeError;

#[derive(Debug, thiserror::Error)]
pub enum HostError {
    #[error("malformed request: {0}")]
    Json(#[from] serde_json::Error),

    #[error("invalid tree: {0}")]
    Decode(#[from] DecodeError),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("patch request must name exactly one target, `loc` or `id`")]
    AmbiguousTarget,
}
