//! Read-only traversal over term trees.
//!
//! - [`DfsIter`] -- depth-first (pre-order), positional children before
//!   named ones.
//! - [`BfsIter`] -- breadth-first (level-order).
//!
//! Both are reachable through [`TermWalk`], which also offers search helpers.
//! Named children are always visited in key order.

use crate::term::Term;
use crate::term_type::TermType;
use std::collections::VecDeque;

/// Direct children of `term`: positional arguments, then option values.
fn iter_children(term: &Term) -> impl DoubleEndedIterator<Item = &Term> {
    term.args()
        .iter()
        .chain(term.optargs().into_iter().flat_map(|o| o.values()))
}

/// Pre-order depth-first iterator over a term tree.
pub struct DfsIter<'a> {
    stack: Vec<&'a Term>,
}

impl<'a> DfsIter<'a> {
    pub fn new(root: &'a Term) -> Self {
        Self { stack: vec![root] }
    }
}

impl<'a> Iterator for DfsIter<'a> {
    type Item = &'a Term;

    fn next(&mut self) -> Option<Self::Item> {
        let term = self.stack.pop()?;
        // Reverse so children come out in forward order
        self.stack.extend(iter_children(term).rev());
        Some(term)
    }
}

/// Level-order breadth-first iterator over a term tree.
pub struct BfsIter<'a> {
    queue: VecDeque<&'a Term>,
}

impl<'a> BfsIter<'a> {
    pub fn new(root: &'a Term) -> Self {
        let mut queue = VecDeque::new();
        queue.push_back(root);
        Self { queue }
    }
}

impl<'a> Iterator for BfsIter<'a> {
    type Item = &'a Term;

    fn next(&mut self) -> Option<Self::Item> {
        let term = self.queue.pop_front()?;
        self.queue.extend(iter_children(term));
        Some(term)
    }
}

/// Traversal and search over a term and its descendants.
pub trait TermWalk {
    fn dfs(&self) -> DfsIter<'_>;

    fn bfs(&self) -> BfsIter<'_>;

    /// First node matching `predicate` in depth-first order.
    fn find<F>(&self, predicate: F) -> Option<&Term>
    where
        F: Fn(&Term) -> bool;

    /// All nodes matching `predicate`, in depth-first order.
    fn find_all<F>(&self, predicate: F) -> Vec<&Term>
    where
        F: Fn(&Term) -> bool;

    /// Whether any node matches `predicate`.
    fn any_node<F>(&self, predicate: F) -> bool
    where
        F: Fn(&Term) -> bool;

    /// Direct children: positional arguments, then option values.
    fn children(&self) -> Vec<&Term>;

    /// Total number of nodes, this one included.
    fn node_count(&self) -> usize;

    /// Whether the tree refers to the implicit variable (`r.row`) outside
    /// any nested function, where it would still be unbound.
    fn contains_implicit_var(&self) -> bool;
}

impl TermWalk for Term {
    fn dfs(&self) -> DfsIter<'_> {
        DfsIter::new(self)
    }

    fn bfs(&self) -> BfsIter<'_> {
        BfsIter::new(self)
    }

    fn find<F>(&self, predicate: F) -> Option<&Term>
    where
        F: Fn(&Term) -> bool,
    {
        self.dfs().find(|t| predicate(t))
    }

    fn find_all<F>(&self, predicate: F) -> Vec<&Term>
    where
        F: Fn(&Term) -> bool,
    {
        self.dfs().filter(|t| predicate(t)).collect()
    }

    fn any_node<F>(&self, predicate: F) -> bool
    where
        F: Fn(&Term) -> bool,
    {
        self.dfs().any(|t| predicate(t))
    }

    fn children(&self) -> Vec<&Term> {
        iter_children(self).collect()
    }

    fn node_count(&self) -> usize {
        self.dfs().count()
    }

    fn contains_implicit_var(&self) -> bool {
        let mut stack = vec![self];
        while let Some(term) = stack.pop() {
            match term.tag() {
                TermType::IMPLICIT_VAR => return true,
                TermType::FUNC => {}
                _ => stack.extend(iter_children(term)),
            }
        }
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::arguments::Arguments;
    use crate::optargs::OptArgs;
    use crate::term::Datum;
    use crate::value::{Lambda, Value};

    fn sample() -> Term {
        // get_all(table("t"), 1, 2, index: "idx")
        let table = Term::new(TermType::TABLE, Arguments::single("t"), None).unwrap();
        Term::new(
            TermType::GET_ALL,
            Arguments::from_values([Value::Term(table), Value::Int(1), Value::Int(2)]),
            Some(OptArgs::new().with("index", "idx")),
        )
        .unwrap()
    }

    fn label(term: &Term) -> String {
        match term.as_datum() {
            Some(Datum::String(s)) => s.clone(),
            Some(Datum::Number(n)) => n.to_string(),
            Some(_) => "datum".into(),
            None => term.tag().to_string(),
        }
    }

    #[test]
    fn test_dfs_order() {
        let term = sample();
        let order: Vec<_> = term.dfs().map(label).collect();
        assert_eq!(order, ["78", "15", "t", "1", "2", "idx"]);
    }

    #[test]
    fn test_bfs_order() {
        let term = sample();
        let order: Vec<_> = term.bfs().map(label).collect();
        assert_eq!(order, ["78", "15", "1", "2", "idx", "t"]);
    }

    #[test]
    fn test_search_helpers() {
        let term = sample();
        assert_eq!(term.node_count(), 6);
        assert_eq!(term.children().len(), 4);
        assert!(term.any_node(|t| t.tag() == TermType::TABLE));
        assert_eq!(term.find_all(Term::is_datum).len(), 4);
        assert!(term.find(|t| t.tag() == TermType::ZIP).is_none());
    }

    #[test]
    fn test_implicit_var_scan_skips_functions() {
        let row = Term::new(TermType::IMPLICIT_VAR, Arguments::new(), None).unwrap();
        let bare = Term::new(
            TermType::GET_FIELD,
            Arguments::from_values([Value::Term(row.clone()), Value::from("age")]),
            None,
        )
        .unwrap();
        assert!(bare.contains_implicit_var());

        let wrapped = Term::expr(Lambda::unary(move |_| Ok(row))).unwrap();
        assert!(!wrapped.contains_implicit_var());
        assert!(!sample().contains_implicit_var());
    }
}
