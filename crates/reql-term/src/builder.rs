//! Fluent ReQL Builder API
//!
//! Call-site sugar over [`Term::new`]. Every function and method here fixes
//! one [`TermType`], normalizes its inputs into [`Arguments`] and [`OptArgs`],
//! and delegates to the generic constructor, so arity and coercion rules are
//! enforced in exactly one place.
//!
//! - **Top-level functions** ([`expr`], [`db`], [`table`], [`row`], [`func1`],
//!   [`branch`], ...) start an expression; the crate re-exports this module as
//!   `r` so calls read like `r::table("users")`.
//! - **Methods on [`Term`]** (`.filter()`, `.get_field()`, `.zip()`, ...)
//!   chain further operations with the receiver as the first argument. A
//!   method whose tag takes named options has an `_opts` twin.
//! - Predicate and mapping methods (`filter`, `map`, `concat_map`,
//!   `for_each`, `update`, `replace`, `merge`, `reduce`, `do_`) wrap an
//!   argument that refers to [`row`] into a one-parameter function.
//!
//! # Examples
//!
//! ```
//! use reql_term::r;
//!
//! # fn main() -> reql_term::Result<()> {
//! // r.table("users").filter(r.row("age").gt(18)).pluck("name")
//! let query = r::table("users")?
//!     .filter(r::row().bracket("age")?.gt(18)?)?
//!     .pluck(["name"])?;
//! # let _ = query;
//! # Ok(())
//! # }
//! ```
//!
//! ```
//! use reql_term::{compile, r};
//!
//! # fn main() -> reql_term::Result<()> {
//! let zipped = r::table("posts")?
//!     .eq_join("author_id", r::table("authors")?)?
//!     .zip()?;
//! assert_eq!(
//!     compile(&zipped)?.to_string(),
//!     r#"[72,[[50,[[15,["posts"]],"author_id",[15,["authors"]]]]]]"#
//! );
//! # Ok(())
//! # }
//! ```

use crate::arguments::Arguments;
use crate::coerce::CoerceOptions;
use crate::error::Result;
use crate::optargs::OptArgs;
use crate::term::Term;
use crate::term_type::TermType;
use crate::traversal::TermWalk;
use crate::value::{Lambda, Value};

// ---------------------------------------------------------------------------
// Top-level functions
// ---------------------------------------------------------------------------

/// Coerce any host value into a term.
///
/// ```
/// use reql_term::{compile, r};
/// use serde_json::json;
///
/// let term = r::expr(vec![1, 2, 3]).unwrap();
/// assert_eq!(compile(&term).unwrap(), json!([2, [1, 2, 3]]));
/// ```
pub fn expr(value: impl Into<Value>) -> Result<Term> {
    Term::expr(value)
}

/// [`expr`] with explicit coercion options, e.g. a deeper nesting limit.
pub fn expr_with(value: impl Into<Value>, options: CoerceOptions) -> Result<Term> {
    Term::expr_with(value, options)
}

/// Reference a database by name.
pub fn db(name: impl Into<Value>) -> Result<Term> {
    Term::new(TermType::DB, Arguments::single(name), None)
}

/// Reference a table in the connection's default database.
pub fn table(name: impl Into<Value>) -> Result<Term> {
    table_opts(name, OptArgs::new())
}

/// [`table`] with options such as `read_mode`.
pub fn table_opts(name: impl Into<Value>, optargs: OptArgs) -> Result<Term> {
    Term::new(TermType::TABLE, Arguments::single(name), Some(optargs))
}

/// The implicit variable: the current document of the enclosing predicate
/// or mapping.
pub fn row() -> Term {
    Term::op(TermType::IMPLICIT_VAR, Vec::new(), None)
}

/// Splice an array into the argument list of the enclosing term.
pub fn args(array: impl Into<Value>) -> Result<Term> {
    Term::new(TermType::ARGS, Arguments::single(array), None)
}

/// An endless stream of integers from zero.
pub fn range_infinite() -> Result<Term> {
    Term::new(TermType::RANGE, Arguments::new(), None)
}

/// Integers in `[0, end)`.
pub fn range(end: impl Into<Value>) -> Result<Term> {
    Term::new(TermType::RANGE, Arguments::single(end), None)
}

/// Integers in `[start, end)`.
pub fn range_between(start: impl Into<Value>, end: impl Into<Value>) -> Result<Term> {
    Term::new(TermType::RANGE, Arguments::new().arg(start).arg(end), None)
}

pub fn now() -> Result<Term> {
    Term::new(TermType::NOW, Arguments::new(), None)
}

pub fn uuid() -> Result<Term> {
    Term::new(TermType::UUID, Arguments::new(), None)
}

/// Deterministic UUID derived from `name`.
pub fn uuid_from(name: impl Into<Value>) -> Result<Term> {
    Term::new(TermType::UUID, Arguments::single(name), None)
}

/// `if test { then } else { otherwise }`.
pub fn branch(
    test: impl Into<Value>,
    then: impl Into<Value>,
    otherwise: impl Into<Value>,
) -> Result<Term> {
    Term::new(
        TermType::BRANCH,
        Arguments::new().arg(test).arg(then).arg(otherwise),
        None,
    )
}

/// Abort the query with a user error.
pub fn error(message: impl Into<Value>) -> Result<Term> {
    Term::new(TermType::ERROR, Arguments::single(message), None)
}

/// Replace rather than merge a nested object in an update.
pub fn literal(value: impl Into<Value>) -> Result<Term> {
    Term::new(TermType::LITERAL, Arguments::single(value), None)
}

/// A one-parameter function.
///
/// ```
/// use reql_term::r;
///
/// let adult = r::func1(|user| user.get_field("age")?.ge(18));
/// let query = r::table("users").unwrap().filter(adult).unwrap();
/// assert!(query.to_string().starts_with("r.filter(r.table(\"users\"), |var_"));
/// ```
pub fn func1<F, R>(body: F) -> Lambda
where
    F: FnOnce(Term) -> Result<R> + Send + 'static,
    R: Into<Value>,
{
    Lambda::unary(body)
}

/// A two-parameter function, e.g. for [`Term::reduce`].
pub fn func2<F, R>(body: F) -> Lambda
where
    F: FnOnce(Term, Term) -> Result<R> + Send + 'static,
    R: Into<Value>,
{
    Lambda::binary(body)
}

pub fn minval() -> Result<Term> {
    Term::new(TermType::MINVAL, Arguments::new(), None)
}

pub fn maxval() -> Result<Term> {
    Term::new(TermType::MAXVAL, Arguments::new(), None)
}

/// Logical conjunction of all operands.
pub fn and<V: Into<Value>>(operands: impl IntoIterator<Item = V>) -> Result<Term> {
    Term::new(TermType::AND, Arguments::from_values(operands), None)
}

/// Logical disjunction of all operands.
pub fn or<V: Into<Value>>(operands: impl IntoIterator<Item = V>) -> Result<Term> {
    Term::new(TermType::OR, Arguments::from_values(operands), None)
}

/// Build an object from computed keys: `OBJECT(k1, v1, k2, v2, ...)`.
pub fn object<K, V>(pairs: impl IntoIterator<Item = (K, V)>) -> Result<Term>
where
    K: Into<Value>,
    V: Into<Value>,
{
    let mut args = Arguments::new();
    for (key, value) in pairs {
        args.push(key);
        args.push(value);
    }
    Term::new(TermType::OBJECT, args, None)
}

/// Ascending sort key for [`Term::order_by`].
pub fn asc(key: impl Into<Value>) -> Result<Term> {
    Term::new(TermType::ASC, Arguments::single(func_wrap(key)?), None)
}

/// Descending sort key for [`Term::order_by`].
pub fn desc(key: impl Into<Value>) -> Result<Term> {
    Term::new(TermType::DESC, Arguments::single(func_wrap(key)?), None)
}

/// Evaluate JavaScript on the server.
pub fn js(source: impl Into<Value>) -> Result<Term> {
    Term::new(TermType::JAVASCRIPT, Arguments::single(source), None)
}

/// Parse a JSON string on the server.
pub fn json(text: impl Into<Value>) -> Result<Term> {
    Term::new(TermType::JSON, Arguments::single(text), None)
}

pub fn epoch_time(seconds: impl Into<Value>) -> Result<Term> {
    Term::new(TermType::EPOCH_TIME, Arguments::single(seconds), None)
}

pub fn iso8601(text: impl Into<Value>) -> Result<Term> {
    Term::new(TermType::ISO8601, Arguments::single(text), None)
}

pub fn db_list() -> Result<Term> {
    Term::new(TermType::DB_LIST, Arguments::new(), None)
}

pub fn db_create(name: impl Into<Value>) -> Result<Term> {
    Term::new(TermType::DB_CREATE, Arguments::single(name), None)
}

pub fn db_drop(name: impl Into<Value>) -> Result<Term> {
    Term::new(TermType::DB_DROP, Arguments::single(name), None)
}

/// Create a table in the connection's default database.
pub fn table_create(name: impl Into<Value>) -> Result<Term> {
    table_create_opts(name, OptArgs::new())
}

/// [`table_create`] with options such as `primary_key` or `shards`.
pub fn table_create_opts(name: impl Into<Value>, optargs: OptArgs) -> Result<Term> {
    Term::new(TermType::TABLE_CREATE, Arguments::single(name), Some(optargs))
}

pub fn table_list() -> Result<Term> {
    Term::new(TermType::TABLE_LIST, Arguments::new(), None)
}

// ---------------------------------------------------------------------------
// Methods
// ---------------------------------------------------------------------------

/// Coerce `value` and, if it refers to [`row`] outside any function, wrap it
/// into a one-parameter function so the server binds the implicit variable.
fn func_wrap(value: impl Into<Value>) -> Result<Value> {
    let term = Term::expr(value)?;
    if term.contains_implicit_var() {
        Ok(Value::Term(Term::expr(Lambda::unary(move |_| Ok(term)))?))
    } else {
        Ok(Value::Term(term))
    }
}

macro_rules! term_methods {
    ($($(#[$doc:meta])* $method:ident => $tag:ident($($arg:ident),*);)*) => {
        impl Term {
            $(
                $(#[$doc])*
                pub fn $method(self, $($arg: impl Into<Value>),*) -> Result<Term> {
                    let rest: Vec<Value> = vec![$($arg.into()),*];
                    Term::new(TermType::$tag, Arguments::with_receiver(self, rest), None)
                }
            )*
        }
    };
}

macro_rules! term_methods_with_opts {
    ($($(#[$doc:meta])* $method:ident, $opts_method:ident => $tag:ident($($arg:ident),*);)*) => {
        impl Term {
            $(
                $(#[$doc])*
                pub fn $method(self, $($arg: impl Into<Value>),*) -> Result<Term> {
                    self.$opts_method($($arg,)* OptArgs::new())
                }

                #[doc = concat!("[`Term::", stringify!($method), "`] with options.")]
                pub fn $opts_method(
                    self,
                    $($arg: impl Into<Value>,)*
                    optargs: OptArgs,
                ) -> Result<Term> {
                    let rest: Vec<Value> = vec![$($arg.into()),*];
                    Term::new(
                        TermType::$tag,
                        Arguments::with_receiver(self, rest),
                        Some(optargs),
                    )
                }
            )*
        }
    };
}

term_methods! {
    /// Merge the `left` and `right` halves of each join result.
    zip => ZIP();
    /// Read one field of an object, or pluck it from every element of a sequence.
    get_field => GET_FIELD(field);
    /// `self[key]`: field access on objects, index access on sequences.
    bracket => BRACKET(key);
    nth => NTH(index);
    skip => SKIP(count);
    limit => LIMIT(count);
    keys => KEYS();
    values => VALUES();
    count => COUNT();
    is_empty => IS_EMPTY();
    type_of => TYPE_OF();
    coerce_to => COERCE_TO(type_name);
    append => APPEND(value);
    prepend => PREPEND(value);
    difference => DIFFERENCE(array);
    set_insert => SET_INSERT(value);
    set_union => SET_UNION(array);
    set_intersection => SET_INTERSECTION(array);
    set_difference => SET_DIFFERENCE(array);
    insert_at => INSERT_AT(index, value);
    delete_at => DELETE_AT(index);
    change_at => CHANGE_AT(index, value);
    splice_at => SPLICE_AT(index, array);
    offsets_of => OFFSETS_OF(value);
    /// Value to use when `self` is null or missing.
    default => DEFAULT(fallback);
    eq => EQ(other);
    ne => NE(other);
    lt => LT(other);
    le => LE(other);
    gt => GT(other);
    ge => GE(other);
    not => NOT();
    and => AND(other);
    or => OR(other);
    add => ADD(other);
    sub => SUB(other);
    mul => MUL(other);
    div => DIV(other);
    mod_ => MOD(other);
    floor => FLOOR();
    ceil => CEIL();
    round => ROUND();
    /// Match against a regular expression.
    match_ => MATCH(pattern);
    upcase => UPCASE();
    downcase => DOWNCASE();
    split => SPLIT(separator);
    sample => SAMPLE(count);
    info => INFO();
    ungroup => UNGROUP();
    sum => SUM();
    avg => AVG();
    min => MIN();
    max => MAX();
    to_json_string => TO_JSON_STRING();
    to_iso8601 => TO_ISO8601();
    to_epoch_time => TO_EPOCH_TIME();
    in_timezone => IN_TIMEZONE(timezone);
    date => DATE();
    config => CONFIG();
    status => STATUS();
    sync => SYNC();
    index_drop => INDEX_DROP(name);
    index_list => INDEX_LIST();
    index_rename => INDEX_RENAME(old_name, new_name);
    table_drop => TABLE_DROP(name);
    table_list => TABLE_LIST();
}

term_methods_with_opts! {
    /// A table in this database.
    table, table_opts => TABLE(name);
    table_create, table_create_opts => TABLE_CREATE(name);
    /// Fetch one document by primary key.
    get, get_opts => GET(key);
    /// Documents with keys in `[lower, upper)`, by primary key or `index`.
    between, between_opts => BETWEEN(lower, upper);
    slice, slice_opts => SLICE(start, end);
    distinct, distinct_opts => DISTINCT();
    /// Join each element's `left_field` with the primary key (or `index`) of `right`.
    eq_join, eq_join_opts => EQ_JOIN(left_field, right);
    insert, insert_opts => INSERT(documents);
    delete, delete_opts => DELETE();
    changes, changes_opts => CHANGES();
    index_create, index_create_opts => INDEX_CREATE(name);
    during, during_opts => DURING(start, end);
}

impl Term {
    /// Documents whose primary key (or `index`) matches any of `keys`.
    pub fn get_all<V: Into<Value>>(self, keys: impl IntoIterator<Item = V>) -> Result<Term> {
        self.get_all_opts(keys, OptArgs::new())
    }

    /// [`Term::get_all`] with options.
    pub fn get_all_opts<V: Into<Value>>(
        self,
        keys: impl IntoIterator<Item = V>,
        optargs: OptArgs,
    ) -> Result<Term> {
        let rest = keys.into_iter().map(Into::into);
        Term::new(TermType::GET_ALL, Arguments::with_receiver(self, rest), Some(optargs))
    }

    pub fn pluck<V: Into<Value>>(self, fields: impl IntoIterator<Item = V>) -> Result<Term> {
        self.variadic(TermType::PLUCK, fields)
    }

    pub fn without<V: Into<Value>>(self, fields: impl IntoIterator<Item = V>) -> Result<Term> {
        self.variadic(TermType::WITHOUT, fields)
    }

    pub fn has_fields<V: Into<Value>>(self, fields: impl IntoIterator<Item = V>) -> Result<Term> {
        self.variadic(TermType::HAS_FIELDS, fields)
    }

    pub fn with_fields<V: Into<Value>>(self, fields: impl IntoIterator<Item = V>) -> Result<Term> {
        self.variadic(TermType::WITH_FIELDS, fields)
    }

    pub fn contains<V: Into<Value>>(self, values: impl IntoIterator<Item = V>) -> Result<Term> {
        self.variadic(TermType::CONTAINS, values)
    }

    /// Concatenate `self` with `others`.
    pub fn union<V: Into<Value>>(self, others: impl IntoIterator<Item = V>) -> Result<Term> {
        self.variadic(TermType::UNION, others)
    }

    /// Sort by fields, [`asc`]/[`desc`] keys or functions.
    pub fn order_by<V: Into<Value>>(self, keys: impl IntoIterator<Item = V>) -> Result<Term> {
        self.order_by_opts(keys, OptArgs::new())
    }

    /// [`Term::order_by`] with options, typically `index`.
    pub fn order_by_opts<V: Into<Value>>(
        self,
        keys: impl IntoIterator<Item = V>,
        optargs: OptArgs,
    ) -> Result<Term> {
        let keys = keys.into_iter().map(func_wrap).collect::<Result<Vec<_>>>()?;
        Term::new(TermType::ORDER_BY, Arguments::with_receiver(self, keys), Some(optargs))
    }

    pub fn group<V: Into<Value>>(self, keys: impl IntoIterator<Item = V>) -> Result<Term> {
        self.group_opts(keys, OptArgs::new())
    }

    /// [`Term::group`] with options such as `index` or `multi`.
    pub fn group_opts<V: Into<Value>>(
        self,
        keys: impl IntoIterator<Item = V>,
        optargs: OptArgs,
    ) -> Result<Term> {
        let keys = keys.into_iter().map(func_wrap).collect::<Result<Vec<_>>>()?;
        Term::new(TermType::GROUP, Arguments::with_receiver(self, keys), Some(optargs))
    }

    /// Keep elements for which `predicate` holds.
    pub fn filter(self, predicate: impl Into<Value>) -> Result<Term> {
        self.filter_opts(predicate, OptArgs::new())
    }

    /// [`Term::filter`] with options, typically `default`.
    pub fn filter_opts(self, predicate: impl Into<Value>, optargs: OptArgs) -> Result<Term> {
        self.wrapped(TermType::FILTER, predicate, Some(optargs))
    }

    pub fn map(self, mapping: impl Into<Value>) -> Result<Term> {
        self.wrapped(TermType::MAP, mapping, None)
    }

    pub fn concat_map(self, mapping: impl Into<Value>) -> Result<Term> {
        self.wrapped(TermType::CONCAT_MAP, mapping, None)
    }

    /// Run a write query per element.
    pub fn for_each(self, body: impl Into<Value>) -> Result<Term> {
        self.wrapped(TermType::FOR_EACH, body, None)
    }

    pub fn reduce(self, reducer: impl Into<Value>) -> Result<Term> {
        self.wrapped(TermType::REDUCE, reducer, None)
    }

    pub fn merge(self, other: impl Into<Value>) -> Result<Term> {
        self.wrapped(TermType::MERGE, other, None)
    }

    pub fn update(self, changes: impl Into<Value>) -> Result<Term> {
        self.update_opts(changes, OptArgs::new())
    }

    /// [`Term::update`] with options such as `durability` or `return_changes`.
    pub fn update_opts(self, changes: impl Into<Value>, optargs: OptArgs) -> Result<Term> {
        self.wrapped(TermType::UPDATE, changes, Some(optargs))
    }

    pub fn replace(self, document: impl Into<Value>) -> Result<Term> {
        self.replace_opts(document, OptArgs::new())
    }

    /// [`Term::replace`] with options.
    pub fn replace_opts(self, document: impl Into<Value>, optargs: OptArgs) -> Result<Term> {
        self.wrapped(TermType::REPLACE, document, Some(optargs))
    }

    /// Call `function` with `self` as its argument.
    ///
    /// On the wire the function comes first: `FUNCALL(function, self)`.
    pub fn do_(self, function: impl Into<Value>) -> Result<Term> {
        let args = Arguments::single(func_wrap(function)?).arg(self);
        Term::new(TermType::FUNCALL, args, None)
    }

    /// Pairs of `self` and `other` elements satisfying `predicate`.
    pub fn inner_join(self, other: impl Into<Value>, predicate: impl Into<Value>) -> Result<Term> {
        let rest = vec![other.into(), predicate.into()];
        Term::new(TermType::INNER_JOIN, Arguments::with_receiver(self, rest), None)
    }

    /// Like [`Term::inner_join`], keeping unmatched `self` elements.
    pub fn outer_join(self, other: impl Into<Value>, predicate: impl Into<Value>) -> Result<Term> {
        let rest = vec![other.into(), predicate.into()];
        Term::new(TermType::OUTER_JOIN, Arguments::with_receiver(self, rest), None)
    }

    fn variadic<V: Into<Value>>(
        self,
        tag: TermType,
        rest: impl IntoIterator<Item = V>,
    ) -> Result<Term> {
        let rest = rest.into_iter().map(Into::into);
        Term::new(tag, Arguments::with_receiver(self, rest), None)
    }

    fn wrapped(
        self,
        tag: TermType,
        value: impl Into<Value>,
        optargs: Option<OptArgs>,
    ) -> Result<Term> {
        let args = Arguments::with_receiver(self, [func_wrap(value)?]);
        Term::new(tag, args, optargs)
    }
}
