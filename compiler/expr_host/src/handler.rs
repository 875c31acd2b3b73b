//! Request handlers.

use expr_conf::{Config, Value};
use expr_ir::{patch_tree, AnyTree, Tree};

use crate::{CompileResult, HostError, PatchRequest, PatchResult, PreparedRun, RunRequest};

/// Validate a transported tree. The tree comes back re-encoded, so unknown
/// keys are dropped.
#[tracing::instrument(level = "debug", skip_all)]
pub fn compile_tree(request: &AnyTree) -> Result<CompileResult, HostError> {
    let tree = Tree::decode(request)?;
    Ok(CompileResult { tree: tree.encode() })
}

#[tracing::instrument(level = "debug", skip_all, fields(loc = ?request.loc, id = ?request.id))]
pub fn patch(request: &PatchRequest) -> Result<PatchResult, HostError> {
    let target = request.target()?;
    let mut tree = Tree::decode(&request.tree)?;
    let replacement = Tree::decode(&request.patch_tree)?;

    let patched = patch_tree(&mut tree.node, target, &replacement.node);
    tracing::debug!(patched, "patch applied");
    Ok(PatchResult {
        tree: tree.encode(),
        patched,
    })
}

#[tracing::instrument(level = "debug", skip_all)]
pub fn prepare_run(request: &RunRequest) -> Result<PreparedRun, HostError> {
    let tree = Tree::decode(&request.tree)?;
    let env = request.env.clone().map(Value::from);
    let config = Config::from_env(env.as_ref())?;
    Ok(PreparedRun { tree, config })
}

pub fn compile_tree_json(input: &str) -> Result<String, HostError> {
    let request: AnyTree = serde_json::from_str(input)?;
    Ok(serde_json::to_string(&compile_tree(&request)?)?)
}

pub fn patch_json(input: &str) -> Result<String, HostError> {
    let request: PatchRequest = serde_json::from_str(input)?;
    Ok(serde_json::to_string(&patch(&request)?)?)
}

/// Prepare a run and report its summary.
pub fn prepare_run_json(input: &str) -> Result<String, HostError> {
    let request: RunRequest = serde_json::from_str(input)?;
    Ok(serde_json::to_string(&prepare_run(&request)?.summary())?)
}
