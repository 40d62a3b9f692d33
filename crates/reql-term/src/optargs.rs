//! Option Map: named modifiers attached to a node.

use crate::coerce::{CoercePath, Coercer, Segment};
use crate::error::Result;
use crate::term::Term;
use crate::value::Value;
use std::collections::BTreeMap;

/// Raw named arguments. Keys are unique; the last write for a key wins.
#[derive(Debug, Default)]
pub struct OptArgs {
    entries: BTreeMap<String, Value>,
}

impl OptArgs {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert.
    pub fn with(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.insert(key, value);
        self
    }

    /// Insert an option, replacing any previous value for `key`.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<Value>) {
        self.entries.insert(key.into(), value.into());
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.entries.get(key)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub(crate) fn into_entries(self) -> BTreeMap<String, Value> {
        self.entries
    }

    /// Coerce every value. An empty map yields `None`, so a node never holds
    /// an empty option map.
    pub fn coerce(self, coercer: &Coercer) -> Result<Option<BTreeMap<String, Term>>> {
        if self.entries.is_empty() {
            return Ok(None);
        }
        let mut out = BTreeMap::new();
        for (key, value) in self.entries {
            let term = coercer.coerce(value, CoercePath::root(Segment::Opt(key.clone())))?;
            out.insert(key, term);
        }
        Ok(Some(out))
    }
}

impl<K: Into<String>, V: Into<Value>> FromIterator<(K, V)> for OptArgs {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut optargs = OptArgs::new();
        for (key, value) in iter {
            optargs.insert(key, value);
        }
        optargs
    }
}
