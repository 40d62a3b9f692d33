//! Common test utilities for term construction and wire-format tests

#![allow(dead_code)]

use reql_term::{compile, r, Term, TermCatalog, TermSpec};
use serde_json::Value as Json;
use tracing_subscriber::EnvFilter;

/// Route compiler spans to the test output; filter with `RUST_LOG`.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

/// Compile against the builtin catalog, panicking with context on failure.
pub fn wire(term: &Term) -> Json {
    init_tracing();
    compile(term).unwrap_or_else(|e| panic!("failed to compile {term}: {e}"))
}

/// `r.table(name)`.
pub fn table(name: &str) -> Term {
    r::table(name).expect("table term")
}

/// Builtin specs, in tag order.
pub fn builtin_specs() -> Vec<TermSpec> {
    reql_term::builtin().specs().into_iter().cloned().collect()
}

pub fn lookup(name: &str) -> TermSpec {
    reql_term::builtin()
        .lookup_name(name)
        .cloned()
        .unwrap_or_else(|| panic!("no builtin spec named {name}"))
}
