//! Request and response schema.

use std::collections::BTreeMap;

use expr_conf::Config;
use expr_ir::visitor::{walk_node, Visitor};
use expr_ir::{AnyTree, Location, Node, NodeId, PatchTarget, Tree};
use serde::{Deserialize, Serialize};

use crate::HostError;

/// Replace subtrees of `tree` with `patch_tree`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PatchRequest {
    pub tree: AnyTree,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub loc: Option<Location>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<NodeId>,
    pub patch_tree: AnyTree,
}

impl PatchRequest {
    /// The single matching criterion the request names.
    pub fn target(&self) -> Result<PatchTarget, HostError> {
        match (self.loc, self.id) {
            (Some(loc), None) => Ok(PatchTarget::Location(loc)),
            (None, Some(id)) => Ok(PatchTarget::Id(id)),
            _ => Err(HostError::AmbiguousTarget),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PatchResult {
    pub tree: AnyTree,
    /// Number of replaced slots.
    pub patched: usize,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CompileResult {
    pub tree: AnyTree,
}

/// Run `tree` against a dictionary environment.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RunRequest {
    pub tree: AnyTree,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub env: Option<serde_json::Value>,
}

/// A decoded tree ready for the external checker and VM.
#[derive(Clone, Debug)]
pub struct PreparedRun {
    pub tree: Tree,
    pub config: Config,
}

impl PreparedRun {
    pub fn summary(&self) -> RunSummary {
        let mut counter = NodeCounter { count: 0 };
        counter.visit_node(&self.tree.node);
        RunSummary {
            expression: self.tree.node.to_string(),
            nodes: counter.count,
            env: self.config.env.to_string(),
            strict: self.config.strict,
            variables: self
                .config
                .env
                .all()
                .into_iter()
                .map(|(name, nature)| (name, nature.to_string()))
                .collect(),
        }
    }
}

/// What `prepare-run` reports back.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RunSummary {
    pub expression: String,
    pub nodes: usize,
    /// Type of the root environment.
    pub env: String,
    pub strict: bool,
    /// Every visible name with its type.
    pub variables: BTreeMap<String, String>,
}

struct NodeCounter {
    count: usize,
}

impl<'ast> Visitor<'ast> for NodeCounter {
    fn visit_node(&mut self, node: &'ast Node) {
        self.count += 1;
        walk_node(self, node);
    }
}
