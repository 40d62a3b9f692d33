//! Wire Compiler: term tree to positional JSON.
//!
//! The wire form of an operation node is `[tag, [args...], {options...}]`,
//! where the options object is left out entirely when the node has none.
//! Literals compile to their bare JSON value. Options are emitted in key
//! order, so compiling the same tree always yields the same bytes.

use crate::catalog::{self, TermCatalog};
use crate::error::{Error, Result};
use crate::term::Term;
use crate::term_type::TermType;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value as Json};

/// Tunables for compilation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CompileOptions {
    /// Re-check every node's argument count against the compiler's catalog.
    pub verify_arity: bool,
}

impl Default for CompileOptions {
    fn default() -> Self {
        Self { verify_arity: true }
    }
}

/// Compiles terms against one catalog.
pub struct Compiler<'a> {
    catalog: &'a dyn TermCatalog,
    options: CompileOptions,
}

impl Compiler<'static> {
    /// A compiler over the builtin catalog.
    pub fn new() -> Self {
        Self::with_catalog(catalog::builtin())
    }
}

impl Default for Compiler<'static> {
    fn default() -> Self {
        Self::new()
    }
}

impl<'a> Compiler<'a> {
    pub fn with_catalog(catalog: &'a dyn TermCatalog) -> Self {
        Self {
            catalog,
            options: CompileOptions::default(),
        }
    }

    pub fn with_options(mut self, options: CompileOptions) -> Self {
        self.options = options;
        self
    }

    /// Produce the wire form of `term`.
    ///
    /// An unknown tag means the tree was built against a different catalog;
    /// the resulting error is fatal (see [`Error::is_fatal`]).
    #[tracing::instrument(level = "debug", skip_all, fields(tag = %term.tag()))]
    pub fn compile(&self, term: &Term) -> Result<Json> {
        let mut nodes = 0usize;
        match self.compile_node(term, &mut nodes) {
            Ok(wire) => {
                tracing::debug!(nodes, "compiled term");
                Ok(wire)
            }
            Err(err) => {
                tracing::debug!(error = %err, "term compilation failed");
                Err(err)
            }
        }
    }

    /// [`Compiler::compile`] rendered as a JSON string.
    pub fn compile_to_string(&self, term: &Term) -> Result<String> {
        Ok(serde_json::to_string(&self.compile(term)?)?)
    }

    /// [`Compiler::compile`] rendered as JSON bytes, ready for framing.
    pub fn compile_to_vec(&self, term: &Term) -> Result<Vec<u8>> {
        Ok(serde_json::to_vec(&self.compile(term)?)?)
    }

    /// Post-order walk over an explicit work stack, so tree depth is bounded
    /// by memory rather than by the thread's stack.
    fn compile_node(&self, root: &Term, nodes: &mut usize) -> Result<Json> {
        let mut work = vec![Step::Visit(root)];
        let mut done: Vec<Json> = Vec::new();

        while let Some(step) = work.pop() {
            match step {
                Step::Visit(term) => {
                    *nodes += 1;
                    if let Term::Datum(datum) = term {
                        done.push(datum.to_json());
                        continue;
                    }
                    self.check_node(term)?;
                    work.push(Step::Assemble(term));
                    let options = term.optargs().into_iter().flat_map(|o| o.values());
                    // Reversed so children finish in forward order.
                    work.extend(term.args().iter().chain(options).rev().map(Step::Visit));
                }
                Step::Assemble(term) => {
                    let options = term.optargs();
                    let width = term.args().len() + options.map_or(0, |o| o.len());
                    let mut children = done.split_off(done.len() - width).into_iter();

                    let mut wire = Vec::with_capacity(3);
                    wire.push(Json::from(term.tag().value()));
                    wire.push(Json::Array(children.by_ref().take(term.args().len()).collect()));
                    if let Some(options) = options {
                        let object: Map<String, Json> =
                            options.keys().cloned().zip(children).collect();
                        wire.push(Json::Object(object));
                    }
                    done.push(Json::Array(wire));
                }
            }
        }

        debug_assert_eq!(done.len(), 1);
        Ok(done.pop().unwrap_or_default())
    }

    fn check_node(&self, term: &Term) -> Result<()> {
        let tag = term.tag();
        if !self.options.verify_arity {
            if self.catalog.contains(tag) {
                return Ok(());
            }
            return Err(Error::unknown_tag(tag));
        }
        let splices = term
            .args()
            .iter()
            .filter(|arg| arg.tag() == TermType::ARGS)
            .count();
        self.catalog
            .check_spliced_arity(tag, term.args().len(), splices)
    }
}

enum Step<'t> {
    Visit(&'t Term),
    Assemble(&'t Term),
}

/// Compile `term` against the builtin catalog.
pub fn compile(term: &Term) -> Result<Json> {
    Compiler::new().compile(term)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::arguments::Arguments;
    use crate::catalog::{ArgSignature, HashMapTermCatalog};
    use crate::optargs::OptArgs;
    use serde_json::json;

    #[test]
    fn test_literal_compiles_to_bare_value() {
        assert_eq!(compile(&Term::expr(42).unwrap()).unwrap(), json!(42));
        assert_eq!(compile(&Term::expr("s").unwrap()).unwrap(), json!("s"));
        assert_eq!(compile(&Term::expr(false).unwrap()).unwrap(), json!(false));
        assert_eq!(compile(&Term::expr(()).unwrap()).unwrap(), json!(null));
    }

    #[test]
    fn test_options_omitted_when_absent() {
        let term = Term::new(TermType::ZIP, Arguments::single(vec![1]), None).unwrap();
        assert_eq!(compile(&term).unwrap(), json!([72, [[2, [1]]]]));
    }

    #[test]
    fn test_options_emitted_when_present() {
        let term = Term::new(
            TermType::TABLE,
            Arguments::single("users"),
            Some(OptArgs::new().with("read_mode", "outdated")),
        )
        .unwrap();
        assert_eq!(
            compile(&term).unwrap(),
            json!([15, ["users"], {"read_mode": "outdated"}])
        );
    }

    #[test]
    fn test_catalog_mismatch_is_unknown_tag() {
        let mut custom = HashMapTermCatalog::with_builtins();
        custom.register(TermType(700), "widget", ArgSignature::exact(1));
        let inner = Term::new_in(
            &custom,
            Default::default(),
            TermType(700),
            Arguments::single(1),
            None,
        )
        .unwrap();
        let outer = Term::new(TermType::ZIP, Arguments::single(inner), None).unwrap();

        assert_eq!(
            Compiler::with_catalog(&custom).compile(&outer).unwrap(),
            json!([72, [[700, [1]]]])
        );
        let err = compile(&outer).unwrap_err();
        assert!(err.is_fatal());
    }

    #[test]
    fn test_arity_reverified_against_compiler_catalog() {
        let mut loose = HashMapTermCatalog::with_builtins();
        loose.register(TermType::ZIP, "zip", ArgSignature::variadic(0));
        let term = Term::new_in(
            &loose,
            Default::default(),
            TermType::ZIP,
            Arguments::new(),
            None,
        )
        .unwrap();

        assert!(matches!(compile(&term), Err(Error::Arity { .. })));
        let lenient = Compiler::new().with_options(CompileOptions {
            verify_arity: false,
        });
        assert_eq!(lenient.compile(&term).unwrap(), json!([72, []]));
    }

    #[test]
    fn test_options_deserialize_with_defaults() {
        let options: CompileOptions = serde_json::from_str("{}").unwrap();
        assert_eq!(options, CompileOptions::default());
        assert!(options.verify_arity);
        let options: CompileOptions =
            serde_json::from_str(r#"{"verify_arity": false}"#).unwrap();
        assert!(!options.verify_arity);
    }

    #[test]
    fn test_splice_passes_compile_time_recheck() {
        let table = Term::new(TermType::TABLE, Arguments::single("t"), None).unwrap();
        let splice = Term::new(TermType::ARGS, Arguments::single(vec![1, 5]), None).unwrap();
        let term = Term::new(TermType::BETWEEN, Arguments::new().arg(table).arg(splice), None)
            .unwrap();
        assert_eq!(
            compile(&term).unwrap(),
            json!([182, [[15, ["t"]], [154, [[2, [1, 5]]]]]])
        );
    }

    #[test]
    fn test_options_follow_arguments_in_output() {
        let term = Term::new(
            TermType::BETWEEN,
            Arguments::new().arg("t").arg(vec![1]).arg(2),
            Some(OptArgs::new().with("right_bound", "closed").with("index", vec![3])),
        )
        .unwrap();
        assert_eq!(
            compile(&term).unwrap(),
            json!([182, ["t", [2, [1]], 2], {"index": [2, [3]], "right_bound": "closed"}])
        );
    }

    #[test]
    fn test_compile_to_string() {
        let term = Term::expr(vec![1, 2, 3]).unwrap();
        assert_eq!(Compiler::new().compile_to_string(&term).unwrap(), "[2,[1,2,3]]");
        assert_eq!(
            Compiler::new().compile_to_vec(&term).unwrap(),
            b"[2,[1,2,3]]".to_vec()
        );
    }
}
