//! Host boundary.
//!
//! Request and response types for tools that pass expression trees across a
//! process or sandbox boundary, and the handlers that serve them:
//!
//! - `compile_tree`: validate a transported tree and hand it back
//! - `patch`: replace a subtree, matched by location or by node id
//! - `prepare_run`: decode a tree and introspect its environment
//!
//! Every handler has a `*_json` twin taking and returning JSON text. The
//! `expr-host` binary wires those to stdin and stdout.

mod error;
mod handler;
mod request;

pub use error::HostError;
pub use handler::{
    compile_tree, compile_tree_json, patch, patch_json, prepare_run, prepare_run_json,
};
pub use request::{CompileResult, PatchRequest, PatchResult, PreparedRun, RunRequest, RunSummary};
