//! Compile configuration.

use expr_nature::{Kind, Nature};
use rustc_hash::FxHashSet;

use crate::{env, ConfigError, Value};

/// Settings handed to the checker and compiler for one compilation.
#[derive(Clone, Debug)]
pub struct Config {
    /// Root Nature identifiers resolve against.
    pub env: Nature,
    /// Unknown identifiers are errors rather than `any`.
    pub strict: bool,
    pub optimize: bool,
    /// Expected result kind. `Kind::Invalid` means no expectation.
    pub expect: Kind,
    disabled: FxHashSet<String>,
}

impl Config {
    pub fn new(env: Nature) -> Self {
        Config {
            strict: env.strict,
            env,
            optimize: true,
            expect: Kind::Invalid,
            disabled: FxHashSet::default(),
        }
    }

    /// Configuration for an environment value; see [`env`](crate::env).
    pub fn from_env(value: Option<&Value>) -> Result<Self, ConfigError> {
        env(value).map(Config::new)
    }

    #[must_use]
    pub fn with_strict(mut self, strict: bool) -> Self {
        self.strict = strict;
        self
    }

    #[must_use]
    pub fn with_optimize(mut self, optimize: bool) -> Self {
        self.optimize = optimize;
        self
    }

    #[must_use]
    pub fn with_expect(mut self, kind: Kind) -> Self {
        self.expect = kind;
        self
    }

    /// Hide a builtin from expressions.
    #[must_use]
    pub fn disable(mut self, builtin: impl Into<String>) -> Self {
        self.disabled.insert(builtin.into());
        self
    }

    pub fn is_disabled(&self, builtin: &str) -> bool {
        self.disabled.contains(builtin)
    }

    /// Disabled builtins, sorted.
    pub fn disabled(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.disabled.iter().map(String::as_str).collect();
        names.sort_unstable();
        names
    }
}

impl Default for Config {
    fn default() -> Self {
        Config::new(crate::empty_env())
    }
}
