//! Tag catalog: the arity contract and naming of every known operation.
//!
//! The builtin catalog is process-wide immutable configuration, built once on
//! first use and shared read-only by every constructor and compiler. Hosts that
//! speak a newer protocol can build a [`HashMapTermCatalog`] seeded from the
//! builtin one, register extra tags, and pass it explicitly.

use crate::error::{Error, Result};
use crate::term_type::TermType;
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// How many positional arguments a tag takes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArgSignature {
    pub min_arity: usize,
    /// `None` for tags that take any number of trailing arguments.
    pub max_arity: Option<usize>,
}

impl ArgSignature {
    /// Exactly `arity` arguments.
    pub const fn exact(arity: usize) -> Self {
        Self {
            min_arity: arity,
            max_arity: Some(arity),
        }
    }

    /// Between `min_arity` and `max_arity` arguments, both inclusive.
    pub const fn range(min_arity: usize, max_arity: usize) -> Self {
        Self {
            min_arity,
            max_arity: Some(max_arity),
        }
    }

    /// `min_arity` or more.
    pub const fn variadic(min_arity: usize) -> Self {
        Self {
            min_arity,
            max_arity: None,
        }
    }

    pub fn matches(&self, arity: usize) -> bool {
        arity >= self.min_arity && self.max_arity.map_or(true, |max| arity <= max)
    }

    /// Whether a node with `fixed` ordinary arguments fits, when `spliced`
    /// says whether an `ARGS` splice is also present.
    ///
    /// A splice expands on the server into an unknown number of arguments,
    /// so only the upper bound can be enforced against the fixed ones.
    pub fn accepts(&self, fixed: usize, spliced: bool) -> bool {
        if spliced {
            self.max_arity.map_or(true, |max| fixed <= max)
        } else {
            self.matches(fixed)
        }
    }

    /// `1`, `1..3` or `2+`, as arity errors print it.
    pub fn describe(&self) -> String {
        match self.max_arity {
            Some(max) if max == self.min_arity => self.min_arity.to_string(),
            Some(max) => format!("{}..{}", self.min_arity, max),
            None => format!("{}+", self.min_arity),
        }
    }
}

/// Catalog metadata for one tag.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TermSpec {
    pub tag: TermType,
    /// Upper-case wire name, e.g. `ZIP`.
    pub name: String,
    /// Builder/printer method name, e.g. `zip`.
    pub method: String,
    pub signature: ArgSignature,
}

/// Lookup abstraction over a set of known tags.
pub trait TermCatalog: Send + Sync {
    /// Lookup the metadata of a tag.
    fn lookup(&self, tag: TermType) -> Option<&TermSpec>;

    /// Lookup a tag by its wire name, case-insensitively.
    fn lookup_name(&self, name: &str) -> Option<&TermSpec>;

    /// Whether the tag is known to this catalog.
    fn contains(&self, tag: TermType) -> bool {
        self.lookup(tag).is_some()
    }

    /// Check `actual` positional arguments against the tag's contract.
    fn check_arity(&self, tag: TermType, actual: usize) -> Result<()> {
        self.check_spliced_arity(tag, actual, 0)
    }

    /// Like [`TermCatalog::check_arity`] for a node where `splices` of the
    /// `actual` arguments are `ARGS` splices.
    fn check_spliced_arity(&self, tag: TermType, actual: usize, splices: usize) -> Result<()> {
        let spec = self.lookup(tag).ok_or_else(|| Error::unknown_tag(tag))?;
        if spec.signature.accepts(actual.saturating_sub(splices), splices > 0) {
            Ok(())
        } else {
            Err(Error::arity(
                spec.name.clone(),
                spec.signature.describe(),
                actual,
            ))
        }
    }
}

/// In-memory catalog keyed by tag, with a name index.
#[derive(Debug, Clone, Default)]
pub struct HashMapTermCatalog {
    by_tag: HashMap<TermType, TermSpec>,
    by_name: HashMap<String, TermType>,
}

impl HashMapTermCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// A mutable copy of the builtin catalog, for extension.
    pub fn with_builtins() -> Self {
        builtin().clone()
    }

    /// Register a tag. A later registration of the same tag replaces the
    /// earlier one.
    pub fn register(
        &mut self,
        tag: TermType,
        method: impl Into<String>,
        signature: ArgSignature,
    ) {
        let method = method.into();
        let name = method.to_ascii_uppercase();
        if let Some(previous) = self.by_tag.get(&tag) {
            self.by_name.remove(&previous.name);
        }
        self.by_name.insert(name.clone(), tag);
        self.by_tag.insert(
            tag,
            TermSpec {
                tag,
                name,
                method,
                signature,
            },
        );
    }

    pub fn len(&self) -> usize {
        self.by_tag.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_tag.is_empty()
    }

    /// All registered specs, in tag order.
    pub fn specs(&self) -> Vec<&TermSpec> {
        let mut specs: Vec<_> = self.by_tag.values().collect();
        specs.sort_by_key(|spec| spec.tag);
        specs
    }
}

impl TermCatalog for HashMapTermCatalog {
    fn lookup(&self, tag: TermType) -> Option<&TermSpec> {
        self.by_tag.get(&tag)
    }

    fn lookup_name(&self, name: &str) -> Option<&TermSpec> {
        self.by_name
            .get(&name.to_ascii_uppercase())
            .and_then(|tag| self.by_tag.get(tag))
    }
}

use ArgSignature as S;

/// Builtin tags, their method names and arity contracts.
const BUILTIN_SPECS: &[(TermType, &str, ArgSignature)] = &[
    (TermType::DATUM, "datum", S::exact(0)),
    (TermType::MAKE_ARRAY, "make_array", S::variadic(0)),
    (TermType::MAKE_OBJ, "make_obj", S::exact(0)),
    (TermType::VAR, "var", S::exact(1)),
    (TermType::JAVASCRIPT, "js", S::exact(1)),
    (TermType::ERROR, "error", S::range(0, 1)),
    (TermType::IMPLICIT_VAR, "implicit_var", S::exact(0)),
    (TermType::DB, "db", S::exact(1)),
    (TermType::TABLE, "table", S::range(1, 2)),
    (TermType::GET, "get", S::exact(2)),
    (TermType::GET_ALL, "get_all", S::variadic(2)),
    (TermType::EQ, "eq", S::variadic(2)),
    (TermType::NE, "ne", S::variadic(2)),
    (TermType::LT, "lt", S::variadic(2)),
    (TermType::LE, "le", S::variadic(2)),
    (TermType::GT, "gt", S::variadic(2)),
    (TermType::GE, "ge", S::variadic(2)),
    (TermType::NOT, "not", S::exact(1)),
    (TermType::ADD, "add", S::variadic(1)),
    (TermType::SUB, "sub", S::variadic(1)),
    (TermType::MUL, "mul", S::variadic(1)),
    (TermType::DIV, "div", S::variadic(1)),
    (TermType::MOD, "mod", S::exact(2)),
    (TermType::FLOOR, "floor", S::exact(1)),
    (TermType::CEIL, "ceil", S::exact(1)),
    (TermType::ROUND, "round", S::exact(1)),
    (TermType::APPEND, "append", S::exact(2)),
    (TermType::PREPEND, "prepend", S::exact(2)),
    (TermType::DIFFERENCE, "difference", S::exact(2)),
    (TermType::SET_INSERT, "set_insert", S::exact(2)),
    (TermType::SET_INTERSECTION, "set_intersection", S::exact(2)),
    (TermType::SET_UNION, "set_union", S::exact(2)),
    (TermType::SET_DIFFERENCE, "set_difference", S::exact(2)),
    (TermType::SLICE, "slice", S::range(2, 3)),
    (TermType::SKIP, "skip", S::exact(2)),
    (TermType::LIMIT, "limit", S::exact(2)),
    (TermType::OFFSETS_OF, "offsets_of", S::exact(2)),
    (TermType::CONTAINS, "contains", S::variadic(1)),
    (TermType::GET_FIELD, "get_field", S::exact(2)),
    (TermType::KEYS, "keys", S::exact(1)),
    (TermType::VALUES, "values", S::exact(1)),
    (TermType::OBJECT, "object", S::variadic(0)),
    (TermType::HAS_FIELDS, "has_fields", S::variadic(1)),
    (TermType::WITH_FIELDS, "with_fields", S::variadic(1)),
    (TermType::PLUCK, "pluck", S::variadic(1)),
    (TermType::WITHOUT, "without", S::variadic(1)),
    (TermType::MERGE, "merge", S::variadic(1)),
    (TermType::BETWEEN, "between", S::exact(3)),
    (TermType::REDUCE, "reduce", S::exact(2)),
    (TermType::MAP, "map", S::variadic(2)),
    (TermType::FOLD, "fold", S::exact(3)),
    (TermType::FILTER, "filter", S::exact(2)),
    (TermType::CONCAT_MAP, "concat_map", S::exact(2)),
    (TermType::ORDER_BY, "order_by", S::variadic(1)),
    (TermType::DISTINCT, "distinct", S::exact(1)),
    (TermType::COUNT, "count", S::range(1, 2)),
    (TermType::IS_EMPTY, "is_empty", S::exact(1)),
    (TermType::UNION, "union", S::variadic(0)),
    (TermType::NTH, "nth", S::exact(2)),
    (TermType::BRACKET, "bracket", S::exact(2)),
    (TermType::INNER_JOIN, "inner_join", S::exact(3)),
    (TermType::OUTER_JOIN, "outer_join", S::exact(3)),
    (TermType::EQ_JOIN, "eq_join", S::exact(3)),
    (TermType::ZIP, "zip", S::exact(1)),
    (TermType::RANGE, "range", S::range(0, 2)),
    (TermType::INSERT_AT, "insert_at", S::exact(3)),
    (TermType::DELETE_AT, "delete_at", S::range(2, 3)),
    (TermType::CHANGE_AT, "change_at", S::exact(3)),
    (TermType::SPLICE_AT, "splice_at", S::exact(3)),
    (TermType::COERCE_TO, "coerce_to", S::exact(2)),
    (TermType::TYPE_OF, "type_of", S::exact(1)),
    (TermType::UPDATE, "update", S::exact(2)),
    (TermType::DELETE, "delete", S::exact(1)),
    (TermType::REPLACE, "replace", S::exact(2)),
    (TermType::INSERT, "insert", S::exact(2)),
    (TermType::DB_CREATE, "db_create", S::exact(1)),
    (TermType::DB_DROP, "db_drop", S::exact(1)),
    (TermType::DB_LIST, "db_list", S::exact(0)),
    (TermType::TABLE_CREATE, "table_create", S::range(1, 2)),
    (TermType::TABLE_DROP, "table_drop", S::range(1, 2)),
    (TermType::TABLE_LIST, "table_list", S::range(0, 1)),
    (TermType::CONFIG, "config", S::exact(1)),
    (TermType::STATUS, "status", S::exact(1)),
    (TermType::WAIT, "wait", S::range(0, 1)),
    (TermType::SYNC, "sync", S::exact(1)),
    (TermType::INDEX_CREATE, "index_create", S::range(2, 3)),
    (TermType::INDEX_DROP, "index_drop", S::exact(2)),
    (TermType::INDEX_LIST, "index_list", S::exact(1)),
    (TermType::INDEX_STATUS, "index_status", S::variadic(1)),
    (TermType::INDEX_WAIT, "index_wait", S::variadic(1)),
    (TermType::INDEX_RENAME, "index_rename", S::exact(3)),
    (TermType::FUNCALL, "do", S::variadic(1)),
    (TermType::BRANCH, "branch", S::variadic(3)),
    (TermType::OR, "or", S::variadic(0)),
    (TermType::AND, "and", S::variadic(0)),
    (TermType::FOR_EACH, "for_each", S::exact(2)),
    (TermType::FUNC, "func", S::exact(2)),
    (TermType::ASC, "asc", S::exact(1)),
    (TermType::DESC, "desc", S::exact(1)),
    (TermType::INFO, "info", S::exact(1)),
    (TermType::MATCH, "match", S::exact(2)),
    (TermType::UPCASE, "upcase", S::exact(1)),
    (TermType::DOWNCASE, "downcase", S::exact(1)),
    (TermType::SAMPLE, "sample", S::exact(2)),
    (TermType::DEFAULT, "default", S::exact(2)),
    (TermType::JSON, "json", S::exact(1)),
    (TermType::TO_JSON_STRING, "to_json_string", S::exact(1)),
    (TermType::ISO8601, "iso8601", S::exact(1)),
    (TermType::TO_ISO8601, "to_iso8601", S::exact(1)),
    (TermType::EPOCH_TIME, "epoch_time", S::exact(1)),
    (TermType::TO_EPOCH_TIME, "to_epoch_time", S::exact(1)),
    (TermType::NOW, "now", S::exact(0)),
    (TermType::IN_TIMEZONE, "in_timezone", S::exact(2)),
    (TermType::DURING, "during", S::exact(3)),
    (TermType::DATE, "date", S::exact(1)),
    (TermType::TIME, "time", S::range(4, 7)),
    (TermType::LITERAL, "literal", S::range(0, 1)),
    (TermType::GROUP, "group", S::variadic(1)),
    (TermType::SUM, "sum", S::range(1, 2)),
    (TermType::AVG, "avg", S::range(1, 2)),
    (TermType::MIN, "min", S::range(1, 2)),
    (TermType::MAX, "max", S::range(1, 2)),
    (TermType::SPLIT, "split", S::range(1, 3)),
    (TermType::UNGROUP, "ungroup", S::exact(1)),
    (TermType::RANDOM, "random", S::range(0, 2)),
    (TermType::CHANGES, "changes", S::exact(1)),
    (TermType::HTTP, "http", S::exact(1)),
    (TermType::ARGS, "args", S::exact(1)),
    (TermType::BINARY, "binary", S::exact(1)),
    (TermType::UUID, "uuid", S::range(0, 1)),
    (TermType::MINVAL, "minval", S::exact(0)),
    (TermType::MAXVAL, "maxval", S::exact(0)),
];

static BUILTIN: Lazy<HashMapTermCatalog> = Lazy::new(|| {
    let mut catalog = HashMapTermCatalog::new();
    for &(tag, method, signature) in BUILTIN_SPECS {
        catalog.register(tag, method, signature);
    }
    catalog
});

/// The process-wide builtin catalog.
pub fn builtin() -> &'static HashMapTermCatalog {
    &BUILTIN
}
