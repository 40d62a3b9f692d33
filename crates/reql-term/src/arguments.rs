//! Argument List: the positional children of a node before construction.

use crate::coerce::{CoercePath, Coercer, Segment};
use crate::error::Result;
use crate::term::Term;
use crate::term_type::TermType;
use crate::value::Value;

/// Ordered, raw positional arguments.
///
/// Order is preserved and nothing is deduplicated. Elements stay raw host
/// values until [`Arguments::coerce`] turns them into terms.
#[derive(Debug, Default)]
pub struct Arguments {
    items: Vec<Value>,
}

impl Arguments {
    pub fn new() -> Self {
        Self::default()
    }

    /// A list holding exactly one argument.
    ///
    /// A sequence passed here stays one argument (it becomes a `MAKE_ARRAY`
    /// child); use [`Arguments::from_values`] to spread a sequence instead.
    pub fn single(value: impl Into<Value>) -> Self {
        Self {
            items: vec![value.into()],
        }
    }

    /// One argument per element of `values`.
    pub fn from_values<V: Into<Value>>(values: impl IntoIterator<Item = V>) -> Self {
        values.into_iter().collect()
    }

    /// A receiver followed by further arguments, as method sugar builds them.
    pub fn with_receiver(receiver: Term, rest: impl IntoIterator<Item = Value>) -> Self {
        let mut items = vec![Value::Term(receiver)];
        items.extend(rest);
        Self { items }
    }

    pub fn push(&mut self, value: impl Into<Value>) {
        self.items.push(value.into());
    }

    /// Builder-style [`Arguments::push`].
    pub fn arg(mut self, value: impl Into<Value>) -> Self {
        self.push(value);
        self
    }

    /// Insert an argument at the front.
    pub fn prepend(&mut self, value: impl Into<Value>) {
        self.items.insert(0, value.into());
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Number of arguments that are already-built `ARGS` splices.
    pub fn splices(&self) -> usize {
        self.items
            .iter()
            .filter(|value| matches!(value, Value::Term(term) if term.tag() == TermType::ARGS))
            .count()
    }

    pub(crate) fn into_values(self) -> Vec<Value> {
        self.items
    }

    /// Coerce every element, in order.
    pub fn coerce(self, coercer: &Coercer) -> Result<Vec<Term>> {
        self.items
            .into_iter()
            .enumerate()
            .map(|(i, value)| coercer.coerce(value, CoercePath::root(Segment::Arg(i))))
            .collect()
    }
}

impl<V: Into<Value>> FromIterator<V> for Arguments {
    fn from_iter<I: IntoIterator<Item = V>>(iter: I) -> Self {
        Self {
            items: iter.into_iter().map(Into::into).collect(),
        }
    }
}

impl<V: Into<Value>> Extend<V> for Arguments {
    fn extend<I: IntoIterator<Item = V>>(&mut self, iter: I) {
        self.items.extend(iter.into_iter().map(Into::into));
    }
}
