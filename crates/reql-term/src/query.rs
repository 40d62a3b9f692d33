//! Query envelope handed to the transport.
//!
//! A `START` query carries the compiled term and optional global options:
//! `[1, term, {opts}]`, with the options object omitted when empty. The other
//! query types carry nothing but their number, e.g. `[3]` for `STOP`. Token
//! allocation and length-prefixed framing belong to the transport.

use crate::arguments::Arguments;
use crate::coerce::{CoercePath, Coercer, Segment};
use crate::compiler::Compiler;
use crate::error::Result;
use crate::term::Term;
use crate::term_type::TermType;
use crate::value::Value;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value as Json};
use std::collections::BTreeMap;

/// Kind of request sent to the server.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum QueryType {
    Start,
    Continue,
    Stop,
    NoreplyWait,
    ServerInfo,
}

impl QueryType {
    /// The numeric value written to the wire.
    pub const fn value(self) -> u32 {
        match self {
            QueryType::Start => 1,
            QueryType::Continue => 2,
            QueryType::Stop => 3,
            QueryType::NoreplyWait => 4,
            QueryType::ServerInfo => 5,
        }
    }
}

/// One query, ready to compile.
#[derive(Debug, Clone, PartialEq)]
pub struct Query {
    kind: QueryType,
    term: Option<Term>,
    global_optargs: BTreeMap<String, Term>,
}

impl Query {
    fn bare(kind: QueryType) -> Self {
        Self {
            kind,
            term: None,
            global_optargs: BTreeMap::new(),
        }
    }

    /// Run `term`.
    pub fn start(term: Term) -> Self {
        Self {
            term: Some(term),
            ..Self::bare(QueryType::Start)
        }
    }

    /// Fetch the next batch of an open cursor.
    pub fn cont() -> Self {
        Self::bare(QueryType::Continue)
    }

    /// Close an open cursor.
    pub fn stop() -> Self {
        Self::bare(QueryType::Stop)
    }

    /// Wait for all outstanding noreply writes.
    pub fn noreply_wait() -> Self {
        Self::bare(QueryType::NoreplyWait)
    }

    pub fn server_info() -> Self {
        Self::bare(QueryType::ServerInfo)
    }

    pub fn kind(&self) -> QueryType {
        self.kind
    }

    pub fn term(&self) -> Option<&Term> {
        self.term.as_ref()
    }

    /// Attach a global option such as `db`, `durability` or `noreply`.
    ///
    /// A plain string given for `db` names a database and is wrapped in a
    /// `DB` term.
    pub fn with_global(mut self, key: impl Into<String>, value: impl Into<Value>) -> Result<Self> {
        let key = key.into();
        let term = match value.into() {
            Value::String(name) if key == "db" => {
                Term::new(TermType::DB, Arguments::single(name), None)?
            }
            other => Coercer::default().coerce(other, CoercePath::root(Segment::Opt(key.clone())))?,
        };
        self.global_optargs.insert(key, term);
        Ok(self)
    }

    pub fn global_optarg(&self, key: &str) -> Option<&Term> {
        self.global_optargs.get(key)
    }

    /// Whether the server will skip replying to this query.
    pub fn is_noreply(&self) -> bool {
        self.global_optargs
            .get("noreply")
            .and_then(Term::as_datum)
            .map_or(false, |d| d.to_json() == Json::Bool(true))
    }

    /// Produce the wire form of the envelope.
    pub fn compile(&self, compiler: &Compiler) -> Result<Json> {
        let mut wire = vec![Json::from(self.kind.value())];
        if let Some(term) = &self.term {
            wire.push(compiler.compile(term)?);
            if !self.global_optargs.is_empty() {
                let mut object = Map::new();
                for (key, value) in &self.global_optargs {
                    object.insert(key.clone(), compiler.compile(value)?);
                }
                wire.push(Json::Object(object));
            }
        }
        Ok(Json::Array(wire))
    }

    /// [`Query::compile`] against the builtin catalog, as JSON bytes.
    pub fn to_vec(&self) -> Result<Vec<u8>> {
        Ok(serde_json::to_vec(&self.compile(&Compiler::new())?)?)
    }
}
