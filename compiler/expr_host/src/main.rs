//! expr-host CLI
//!
//! Reads one JSON request on stdin and writes the JSON response on stdout.

use std::io::Read;
use std::sync::Once;

use expr_host::{compile_tree_json, patch_json, prepare_run_json, HostError};

static TRACING_INIT: Once = Once::new();

/// Install the log subscriber when `RUST_LOG` is set.
fn init_tracing() {
    TRACING_INIT.call_once(|| {
        use tracing_subscriber::{fmt, prelude::*, EnvFilter};

        if std::env::var("RUST_LOG").is_ok() {
            tracing_subscriber::registry()
                .with(
                    fmt::layer()
                        .with_target(true)
                        .with_level(true)
                        .with_writer(std::io::stderr),
                )
                .with(EnvFilter::from_default_env())
                .init();
        }
    });
}

fn main() {
    init_tracing();

    let args: Vec<String> = std::env::args().collect();
    let Some(command) = args.get(1) else {
        print_usage();
        std::process::exit(1);
    };

    let handler: fn(&str) -> Result<String, HostError> = match command.as_str() {
        "compile-tree" => compile_tree_json,
        "patch" => patch_json,
        "prepare-run" => prepare_run_json,
        "help" | "--help" | "-h" => {
            print_usage();
            return;
        }
        other => {
            eprintln!("error: unknown command `{other}`");
            print_usage();
            std::process::exit(1);
        }
    };

    let mut input = String::new();
    if let Err(err) = std::io::stdin().read_to_string(&mut input) {
        eprintln!("error: failed to read stdin: {err}");
        std::process::exit(1);
    }

    match handler(&input) {
        Ok(output) => println!("{output}"),
        Err(err) => {
            eprintln!("error: {err}");
            std::process::exit(1);
        }
    }
}

fn print_usage() {
    eprintln!("Usage: expr-host <command> < request.json");
    eprintln!();
    eprintln!("Commands:");
    eprintln!("  compile-tree   Validate a tree: {{\"node\": ..., \"source\": ...}}");
    eprintln!("  patch          Patch a tree: {{\"tree\", \"loc\" | \"id\", \"patch_tree\"}}");
    eprintln!("  prepare-run    Decode a tree and describe its env: {{\"tree\", \"env\"}}");
    eprintln!();
    eprintln!("Set RUST_LOG (e.g. RUST_LOG=debug) to log to stderr.");
}
