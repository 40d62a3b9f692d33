//! Coercion of host values into terms.
//!
//! One rule per [`Value`] variant:
//!
//! | Value | Term |
//! |---|---|
//! | `Term` | attached as-is |
//! | `Null`, `Bool`, `Int`, `Float`, `String` | literal [`Datum`] |
//! | `Array` | `MAKE_ARRAY` with coerced elements |
//! | `Object` | `MAKE_OBJ` with coerced values as options |
//! | `Func` | `FUNC` over fresh `VAR`s and the coerced body |
//!
//! Failures carry the shape of the offending value and a path such as
//! `args[0][2].score`.

use crate::error::{Error, Result};
use crate::term::{Datum, Term};
use crate::term_type::TermType;
use crate::value::{Lambda, Value};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

/// Default for [`CoerceOptions::nesting_depth`].
pub const DEFAULT_NESTING_DEPTH: usize = 20;

/// Tunables for coercion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CoerceOptions {
    /// Maximum nesting of arrays, objects and function bodies in one value.
    pub nesting_depth: usize,
}

impl Default for CoerceOptions {
    fn default() -> Self {
        Self {
            nesting_depth: DEFAULT_NESTING_DEPTH,
        }
    }
}

/// One step of a [`CoercePath`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Segment {
    /// Positional argument of the node being built.
    Arg(usize),
    /// Named option of the node being built.
    Opt(String),
    /// Element of a host sequence.
    Index(usize),
    /// Entry of a host mapping.
    Key(String),
    /// Body of a host function.
    Body,
}

/// Location of a value inside the inputs of one constructor call.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CoercePath {
    segments: Vec<Segment>,
}

impl CoercePath {
    pub fn root(segment: Segment) -> Self {
        Self {
            segments: vec![segment],
        }
    }

    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }
}

impl fmt::Display for CoercePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.segments.is_empty() {
            return f.write_str("<value>");
        }
        for segment in &self.segments {
            match segment {
                Segment::Arg(i) => write!(f, "args[{i}]")?,
                Segment::Opt(k) => write!(f, "optargs.{k}")?,
                Segment::Index(i) => write!(f, "[{i}]")?,
                Segment::Key(k) => write!(f, ".{k}")?,
                Segment::Body => f.write_str(".body")?,
            }
        }
        Ok(())
    }
}

static NEXT_VAR_ID: AtomicU64 = AtomicU64::new(1);

/// Allocate a process-unique variable id for a function parameter.
pub(crate) fn next_var_id() -> u64 {
    NEXT_VAR_ID.fetch_add(1, Ordering::Relaxed)
}

/// Turns [`Value`]s into [`Term`]s.
#[derive(Debug, Clone, Copy, Default)]
pub struct Coercer {
    options: CoerceOptions,
}

impl Coercer {
    pub fn new(options: CoerceOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &CoerceOptions {
        &self.options
    }

    /// Coerce `value`, reporting failures relative to `path`.
    pub fn coerce(&self, value: Value, mut path: CoercePath) -> Result<Term> {
        self.coerce_at(value, &mut path, self.options.nesting_depth)
    }

    fn coerce_at(&self, value: Value, path: &mut CoercePath, remaining: usize) -> Result<Term> {
        if remaining == 0 {
            return Err(Error::coercion(
                value.shape(),
                path.to_string(),
                format!(
                    "nesting depth limit exceeded ({})",
                    self.options.nesting_depth
                ),
            ));
        }

        match value {
            Value::Term(term) => Ok(term),
            Value::Null => Ok(Term::datum(Datum::Null)),
            Value::Bool(b) => Ok(Term::datum(Datum::Bool(b))),
            Value::Int(i) => Ok(Term::datum(Datum::Number(i.into()))),
            Value::Float(f) => match serde_json::Number::from_f64(f) {
                Some(n) => Ok(Term::datum(Datum::Number(n))),
                None => Err(Error::coercion(
                    "float",
                    path.to_string(),
                    format!("non-finite number {f} has no wire representation"),
                )),
            },
            Value::String(s) => Ok(Term::datum(Datum::String(s))),
            Value::Array(items) => {
                let mut children = Vec::with_capacity(items.len());
                for (i, item) in items.into_iter().enumerate() {
                    path.segments.push(Segment::Index(i));
                    let child = self.coerce_at(item, path, remaining - 1);
                    path.segments.pop();
                    children.push(child?);
                }
                Ok(Term::op(TermType::MAKE_ARRAY, children, None))
            }
            Value::Object(pairs) => {
                let mut fields = BTreeMap::new();
                for (key, item) in pairs {
                    path.segments.push(Segment::Key(key.clone()));
                    let child = self.coerce_at(item, path, remaining - 1);
                    path.segments.pop();
                    fields.insert(key, child?);
                }
                let options = if fields.is_empty() { None } else { Some(fields) };
                Ok(Term::op(TermType::MAKE_OBJ, Vec::new(), options))
            }
            Value::Func(lambda) => self.coerce_lambda(lambda, path, remaining),
        }
    }

    fn coerce_lambda(
        &self,
        lambda: Lambda,
        path: &mut CoercePath,
        remaining: usize,
    ) -> Result<Term> {
        let ids: Vec<u64> = (0..lambda.arity()).map(|_| next_var_id()).collect();
        let vars = ids.iter().map(|&id| Term::var(id)).collect();

        path.segments.push(Segment::Body);
        let body = match lambda.call(vars) {
            Ok(body) => self.coerce_at(body, path, remaining - 1),
            Err(err) => Err(err.within(&path.to_string())),
        };
        path.segments.pop();

        let params = ids
            .into_iter()
            .map(|id| Term::datum(Datum::Number(id.into())))
            .collect();
        Ok(Term::op(
            TermType::FUNC,
            vec![Term::op(TermType::MAKE_ARRAY, params, None), body?],
            None,
        ))
    }
}
