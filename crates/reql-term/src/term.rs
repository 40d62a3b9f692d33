//! Term nodes and the generic constructor.
//!
//! A [`Term`] is either a literal [`Datum`] or an operation node carrying a
//! [`TermType`], its positional children and an optional, never-empty map of
//! named children. Terms are immutable: every constructor validates and
//! coerces its inputs up front, and no method mutates a built node.
//!
//! Every per-operation convenience constructor (see [`crate::builder`])
//! reduces to [`Term::new`] with a fixed tag.

use crate::arguments::Arguments;
use crate::catalog::{self, TermCatalog};
use crate::coerce::{CoerceOptions, CoercePath, Coercer, Segment};
use crate::error::Result;
use crate::optargs::OptArgs;
use crate::term_type::TermType;
use crate::value::Value;
use std::collections::BTreeMap;

/// A literal scalar.
#[derive(Debug, Clone, PartialEq)]
pub enum Datum {
    Null,
    Bool(bool),
    Number(serde_json::Number),
    String(String),
}

impl Datum {
    /// The raw wire value of the literal.
    pub fn to_json(&self) -> serde_json::Value {
        match self {
            Datum::Null => serde_json::Value::Null,
            Datum::Bool(b) => serde_json::Value::Bool(*b),
            Datum::Number(n) => serde_json::Value::Number(n.clone()),
            Datum::String(s) => serde_json::Value::String(s.clone()),
        }
    }
}

/// An operation node.
#[derive(Debug, Clone, PartialEq)]
pub struct OpTerm {
    tag: TermType,
    args: Vec<Term>,
    optargs: Option<BTreeMap<String, Term>>,
}

// Long method chains nest one level per call; release them without recursing.
impl Drop for OpTerm {
    fn drop(&mut self) {
        let mut stack = std::mem::take(&mut self.args);
        stack.extend(self.optargs.take().into_iter().flat_map(BTreeMap::into_values));
        while let Some(term) = stack.pop() {
            if let Term::Op(mut op) = term {
                stack.append(&mut op.args);
                stack.extend(op.optargs.take().into_iter().flat_map(BTreeMap::into_values));
            }
        }
    }
}

/// One node of a query expression tree.
#[derive(Debug, Clone, PartialEq)]
pub enum Term {
    Datum(Datum),
    Op(Box<OpTerm>),
}

impl Term {
    /// Build a node for `tag` against the builtin catalog.
    ///
    /// Fails with an arity error when `args` does not fit the tag's contract,
    /// an unknown-tag error when the catalog does not know `tag`, and a
    /// coercion error when an argument or option cannot become a term.
    pub fn new(tag: TermType, args: Arguments, optargs: Option<OptArgs>) -> Result<Term> {
        TermBuilder::new(tag)
            .arguments(args)
            .optargs(optargs.unwrap_or_default())
            .build()
    }

    /// Like [`Term::new`] with an explicit catalog and coercion options.
    pub fn new_in(
        catalog: &dyn TermCatalog,
        options: CoerceOptions,
        tag: TermType,
        args: Arguments,
        optargs: Option<OptArgs>,
    ) -> Result<Term> {
        TermBuilder::new(tag)
            .catalog(catalog)
            .coerce_options(options)
            .arguments(args)
            .optargs(optargs.unwrap_or_default())
            .build()
    }

    /// Coerce one host value into a term, as `r.expr` does.
    pub fn expr(value: impl Into<Value>) -> Result<Term> {
        Self::expr_with(value, CoerceOptions::default())
    }

    /// [`Term::expr`] with explicit coercion options.
    pub fn expr_with(value: impl Into<Value>, options: CoerceOptions) -> Result<Term> {
        Coercer::new(options).coerce(value.into(), CoercePath::root(Segment::Arg(0)))
    }

    /// A literal node.
    pub fn datum(datum: Datum) -> Term {
        Term::Datum(datum)
    }

    /// A reference to function parameter `id`.
    pub fn var(id: u64) -> Term {
        Term::op(TermType::VAR, vec![Term::datum(Datum::Number(id.into()))], None)
    }

    /// Assemble an operation node from already-built children.
    ///
    /// Only for shapes that hold by construction; `optargs` must be `None`
    /// rather than empty.
    pub(crate) fn op(
        tag: TermType,
        args: Vec<Term>,
        optargs: Option<BTreeMap<String, Term>>,
    ) -> Term {
        debug_assert!(optargs.as_ref().map_or(true, |o| !o.is_empty()));
        Term::Op(Box::new(OpTerm { tag, args, optargs }))
    }

    /// The node's tag; literals report [`TermType::DATUM`].
    pub fn tag(&self) -> TermType {
        match self {
            Term::Datum(_) => TermType::DATUM,
            Term::Op(op) => op.tag,
        }
    }

    /// Positional children; empty for literals.
    pub fn args(&self) -> &[Term] {
        match self {
            Term::Datum(_) => &[],
            Term::Op(op) => &op.args,
        }
    }

    /// Named children, absent when the node has none.
    pub fn optargs(&self) -> Option<&BTreeMap<String, Term>> {
        match self {
            Term::Datum(_) => None,
            Term::Op(op) => op.optargs.as_ref(),
        }
    }

    pub fn optarg(&self, name: &str) -> Option<&Term> {
        self.optargs().and_then(|o| o.get(name))
    }

    pub fn as_datum(&self) -> Option<&Datum> {
        match self {
            Term::Datum(d) => Some(d),
            Term::Op(_) => None,
        }
    }

    pub fn is_datum(&self) -> bool {
        matches!(self, Term::Datum(_))
    }
}

/// Single-use builder for one node.
///
/// Collects a tag, arguments and options, then validates and coerces them in
/// [`TermBuilder::build`]. The catalog defaults to the builtin one.
pub struct TermBuilder<'a> {
    tag: TermType,
    catalog: &'a dyn TermCatalog,
    options: CoerceOptions,
    args: Arguments,
    optargs: OptArgs,
}

impl TermBuilder<'static> {
    pub fn new(tag: TermType) -> Self {
        TermBuilder {
            tag,
            catalog: catalog::builtin(),
            options: CoerceOptions::default(),
            args: Arguments::new(),
            optargs: OptArgs::new(),
        }
    }
}

impl<'a> TermBuilder<'a> {
    pub fn catalog<'b>(self, catalog: &'b dyn TermCatalog) -> TermBuilder<'b> {
        TermBuilder {
            tag: self.tag,
            catalog,
            options: self.options,
            args: self.args,
            optargs: self.optargs,
        }
    }

    pub fn coerce_options(mut self, options: CoerceOptions) -> Self {
        self.options = options;
        self
    }

    /// Append one positional argument.
    pub fn arg(mut self, value: impl Into<Value>) -> Self {
        self.args.push(value);
        self
    }

    /// Append every argument in `args`.
    pub fn arguments(mut self, args: Arguments) -> Self {
        if self.args.is_empty() {
            self.args = args;
        } else {
            self.args.extend(args.into_values());
        }
        self
    }

    /// Set one option, replacing an earlier value for the same key.
    pub fn optarg(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.optargs.insert(key, value);
        self
    }

    /// Merge `optargs` in; later keys win.
    pub fn optargs(mut self, optargs: OptArgs) -> Self {
        for (key, value) in optargs.into_entries() {
            self.optargs.insert(key, value);
        }
        self
    }

    /// Validate arity, coerce children and freeze the node.
    pub fn build(self) -> Result<Term> {
        self.catalog
            .check_spliced_arity(self.tag, self.args.len(), self.args.splices())?;
        let coercer = Coercer::new(self.options);
        let args = self.args.coerce(&coercer)?;
        let optargs = self.optargs.coerce(&coercer)?;
        tracing::trace!(tag = %self.tag, args = args.len(), "built term");
        Ok(Term::op(self.tag, args, optargs))
    }
}
