//! Host values accepted wherever a term is expected.
//!
//! [`Value`] is the closed set of shapes a caller may hand to a constructor.
//! Each variant has exactly one coercion rule (see [`crate::coerce`]), so no
//! runtime type inspection is needed to decide how a value becomes a term.

use crate::error::{Error, Result};
use crate::term::Term;
use std::collections::{BTreeMap, HashMap};
use std::fmt;

/// A raw host value, not yet coerced into a [`Term`].
#[derive(Debug)]
pub enum Value {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    String(String),
    Array(Vec<Value>),
    /// Key/value pairs. A later duplicate key overrides an earlier one.
    Object(Vec<(String, Value)>),
    Func(Lambda),
    Term(Term),
}

impl Value {
    /// Short name of the value's shape, used in diagnostics.
    pub fn shape(&self) -> &'static str {
        match self {
            Value::Null => "null",
            Value::Bool(_) => "bool",
            Value::Int(_) => "integer",
            Value::Float(_) => "float",
            Value::String(_) => "string",
            Value::Array(_) => "array",
            Value::Object(_) => "object",
            Value::Func(_) => "function",
            Value::Term(_) => "term",
        }
    }

    /// Build an object value from key/value pairs.
    pub fn object<K, V>(pairs: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<Value>,
    {
        Value::Object(
            pairs
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }

    /// Build an array value from any iterable.
    pub fn array<V: Into<Value>>(items: impl IntoIterator<Item = V>) -> Self {
        Value::Array(items.into_iter().map(Into::into).collect())
    }
}

type LambdaBody = Box<dyn FnOnce(Vec<Term>) -> Result<Value> + Send>;

/// A host function, turned into a `FUNC` term on coercion.
///
/// The body is invoked once, with one `VAR` term per parameter, and the
/// expression it returns becomes the function body.
pub struct Lambda {
    arity: usize,
    body: LambdaBody,
}

impl Lambda {
    /// A function of `N` parameters.
    pub fn new<const N: usize, F, R>(body: F) -> Self
    where
        F: FnOnce([Term; N]) -> Result<R> + Send + 'static,
        R: Into<Value>,
    {
        Self {
            arity: N,
            body: Box::new(move |vars: Vec<Term>| {
                let params: [Term; N] = vars.try_into().map_err(|vars: Vec<Term>| {
                    Error::coercion(
                        "function",
                        "<params>",
                        format!("expected {N} parameters, got {}", vars.len()),
                    )
                })?;
                body(params).map(Into::into)
            }),
        }
    }

    /// A one-parameter function.
    pub fn unary<F, R>(body: F) -> Self
    where
        F: FnOnce(Term) -> Result<R> + Send + 'static,
        R: Into<Value>,
    {
        Self::new::<1, _, _>(move |[x]| body(x))
    }

    /// A two-parameter function.
    pub fn binary<F, R>(body: F) -> Self
    where
        F: FnOnce(Term, Term) -> Result<R> + Send + 'static,
        R: Into<Value>,
    {
        Self::new::<2, _, _>(move |[a, b]| body(a, b))
    }

    pub fn arity(&self) -> usize {
        self.arity
    }

    pub(crate) fn call(self, vars: Vec<Term>) -> Result<Value> {
        (self.body)(vars)
    }
}

impl fmt::Debug for Lambda {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Lambda").field("arity", &self.arity).finish()
    }
}

// ---------------------------------------------------------------------------
// Conversions
// ---------------------------------------------------------------------------

impl From<()> for Value {
    fn from(_: ()) -> Self {
        Value::Null
    }
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Value::Bool(value)
    }
}

macro_rules! int_into_value {
    ($($ty:ty),*) => {
        $(impl From<$ty> for Value {
            fn from(value: $ty) -> Self {
                Value::Int(i64::from(value))
            }
        })*
    };
}

int_into_value!(i8, i16, i32, i64, u8, u16, u32);

impl From<u64> for Value {
    fn from(value: u64) -> Self {
        match i64::try_from(value) {
            Ok(v) => Value::Int(v),
            Err(_) => Value::Float(value as f64),
        }
    }
}

impl From<usize> for Value {
    fn from(value: usize) -> Self {
        Value::from(value as u64)
    }
}

impl From<f32> for Value {
    fn from(value: f32) -> Self {
        Value::Float(f64::from(value))
    }
}

impl From<f64> for Value {
    fn from(value: f64) -> Self {
        Value::Float(value)
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Value::String(value.to_string())
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Value::String(value)
    }
}

impl From<&String> for Value {
    fn from(value: &String) -> Self {
        Value::String(value.clone())
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(value: Option<T>) -> Self {
        value.map_or(Value::Null, Into::into)
    }
}

impl<T: Into<Value>> From<Vec<T>> for Value {
    fn from(items: Vec<T>) -> Self {
        Value::array(items)
    }
}

impl<T: Into<Value>, const N: usize> From<[T; N]> for Value {
    fn from(items: [T; N]) -> Self {
        Value::array(items)
    }
}

impl<K: Into<String>, V: Into<Value>> From<HashMap<K, V>> for Value {
    fn from(map: HashMap<K, V>) -> Self {
        Value::object(map)
    }
}

impl<K: Into<String>, V: Into<Value>> From<BTreeMap<K, V>> for Value {
    fn from(map: BTreeMap<K, V>) -> Self {
        Value::object(map)
    }
}

impl From<serde_json::Value> for Value {
    fn from(json: serde_json::Value) -> Self {
        match json {
            serde_json::Value::Null => Value::Null,
            serde_json::Value::Bool(b) => Value::Bool(b),
            serde_json::Value::Number(n) => match n.as_i64() {
                Some(i) => Value::Int(i),
                None => Value::Float(n.as_f64().unwrap_or(f64::NAN)),
            },
            serde_json::Value::String(s) => Value::String(s),
            serde_json::Value::Array(items) => Value::array(items),
            serde_json::Value::Object(map) => Value::object(map),
        }
    }
}

impl From<Term> for Value {
    fn from(term: Term) -> Self {
        Value::Term(term)
    }
}

impl From<Lambda> for Value {
    fn from(lambda: Lambda) -> Self {
        Value::Func(lambda)
    }
}
