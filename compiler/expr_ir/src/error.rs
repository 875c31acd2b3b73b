//! Errors raised while rebuilding a tree from its transport form.

use crate::NodeTag;

/// Failure to decode an [`AnyNode`](crate::AnyNode).
///
/// Decoding stops at the first failure, child failures included, and no
/// partial tree is returned.
#[derive(Clone, Debug, PartialEq, thiserror::Error)]
pub enum DecodeError {
    #[error("unknown node type `{0}`")]
    UnknownNodeType(String),

    #[error("{node_type} node is missing `{field}`")]
    MissingField {
        node_type: NodeTag,
        field: &'static str,
    },

    #[error("invalid {node_type} value: expected {expected}, found {found}")]
    InvalidValue {
        node_type: NodeTag,
        expected: &'static str,
        found: String,
    },
}

impl DecodeError {
    pub(crate) fn missing(node_type: NodeTag, field: &'static str) -> Self {
        DecodeError::MissingField { node_type, field }
    }

    pub(crate) fn invalid(
        node_type: NodeTag,
        expected: &'static str,
        found: &serde_json::Value,
    ) -> Self {
        DecodeError::InvalidValue {
            node_type,
            expected,
            found: found.to_string(),
        }
    }
}
