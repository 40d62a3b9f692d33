//! ReQL Term - query term trees and their JSON wire encoding
//!
//! This library builds ReQL query expressions as immutable term trees and
//! compiles them into the nested-JSON array form the query engine accepts.
//!
//! # Architecture
//!
//! The library follows a pipeline architecture:
//! 1. **Values** - Host data ([`Value`]) handed to any constructor
//! 2. **Coercion** - Values become [`Term`]s: literals, arrays, objects, functions
//! 3. **Construction** - [`Term::new`] checks arity against a [`TermCatalog`]
//! 4. **Compilation** - [`Compiler`] encodes a tree as `[tag, [args], {optargs}]`
//!
//! The [`r`] module layers fluent sugar on top of the generic constructor.
//!
//! # Example
//!
//! ```
//! use reql_term::{compile, r};
//! use serde_json::json;
//!
//! let term = r::expr(vec![1, 2, 3]).unwrap().zip().unwrap();
//! assert_eq!(compile(&term).unwrap(), json!([72, [[2, [1, 2, 3]]]]));
//! ```

pub mod arguments;
pub mod builder;
pub mod catalog;
pub mod coerce;
pub mod compiler;
pub mod error;
pub mod optargs;
pub mod printer;
pub mod query;
pub mod term;
pub mod term_type;
pub mod traversal;
pub mod value;

pub use arguments::Arguments;
pub use builder as r;
pub use catalog::{builtin, ArgSignature, HashMapTermCatalog, TermCatalog, TermSpec};
pub use coerce::{CoerceOptions, CoercePath, Coercer, Segment, DEFAULT_NESTING_DEPTH};
pub use compiler::{compile, CompileOptions, Compiler};
pub use error::{Error, Result};
pub use optargs::OptArgs;
pub use query::{Query, QueryType};
pub use term::{Datum, OpTerm, Term, TermBuilder};
pub use term_type::TermType;
pub use traversal::{BfsIter, DfsIter, TermWalk};
pub use value::{Lambda, Value};

/// Compile a term straight to its JSON text.
///
/// # Example
/// ```
/// use reql_term::{compile_to_string, r};
///
/// let table = r::db("blog").unwrap().table("posts").unwrap();
/// assert_eq!(compile_to_string(&table).unwrap(), r#"[15,[[14,["blog"]],"posts"]]"#);
/// ```
pub fn compile_to_string(term: &Term) -> Result<String> {
    Compiler::new().compile_to_string(term)
}

/// Coerce a host value with the default options and compile it.
///
/// Convenient for one-off encodings of plain data:
/// ```
/// use reql_term::encode;
/// use serde_json::json;
///
/// assert_eq!(encode(vec![1, 2, 3]).unwrap(), json!([2, [1, 2, 3]]));
/// ```
pub fn encode(value: impl Into<Value>) -> Result<serde_json::Value> {
    let term = Term::expr(value)?;
    compile(&term)
}
