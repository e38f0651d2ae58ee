//! Module implement ordered traversal over [RbTree].
//!
//! Iterators walk the tree node to node using parent links, each step
//! is amortized O(1). Bounded scans, [Range], first descend from the
//! root to the first candidate and stop at the first value outside the
//! [Relation], so subtrees that cannot hold qualifying values are never
//! visited.

use std::{cmp::Ordering, fmt, result, str::FromStr};

use crate::{cmp::Compare, node::Ref, Error, RbTree, Result};

/// Relation between a value and a boundary, used for bounded scans.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Relation {
    /// Values less than the boundary.
    Lt,
    /// Values less than or equal to the boundary.
    Le,
    /// Values equal to the boundary.
    Eq,
    /// Values greater than or equal to the boundary.
    Ge,
    /// Values greater than the boundary.
    Gt,
}

impl Relation {
    /// Check whether a value whose ordering against the boundary is `ord`
    /// belong to this relation.
    pub fn accepts(&self, ord: Ordering) -> bool {
        match (self, ord) {
            (Relation::Lt, Ordering::Less) => true,
            (Relation::Le, Ordering::Less | Ordering::Equal) => true,
            (Relation::Eq, Ordering::Equal) => true,
            (Relation::Ge, Ordering::Equal | Ordering::Greater) => true,
            (Relation::Gt, Ordering::Greater) => true,
            (_, _) => false,
        }
    }
}

impl fmt::Display for Relation {
    fn fmt(&self, f: &mut fmt::Formatter) -> result::Result<(), fmt::Error> {
        let s = match self {
            Relation::Lt => "<",
            Relation::Le => "<=",
            Relation::Eq => "==",
            Relation::Ge => ">=",
            Relation::Gt => ">",
        };
        write!(f, "{}", s)
    }
}

impl FromStr for Relation {
    type Err = Error;

    fn from_str(s: &str) -> Result<Relation> {
        match s.trim() {
            "<" | "lt" => Ok(Relation::Lt),
            "<=" | "le" => Ok(Relation::Le),
            "==" | "=" | "eq" => Ok(Relation::Eq),
            ">=" | "ge" => Ok(Relation::Ge),
            ">" | "gt" => Ok(Relation::Gt),
            _ => err_at!(InvalidInput, msg: "invalid relation {:?}", s),
        }
    }
}

/// Iterator over all values of [RbTree] in ascending order.
pub struct Iter<'a, T, C> {
    tree: &'a RbTree<T, C>,
    cursor: Ref,
    remaining: usize,
}

impl<'a, T, C> Iter<'a, T, C> {
    pub(crate) fn new(tree: &'a RbTree<T, C>, cursor: Ref) -> Iter<'a, T, C> {
        let remaining = tree.len();
        Iter {
            tree,
            cursor,
            remaining,
        }
    }
}

impl<'a, T, C> Iterator for Iter<'a, T, C> {
    type Item = &'a T;

    fn next(&mut self) -> Option<Self::Item> {
        let id = self.cursor?;
        self.cursor = self.tree.successor(id);
        self.remaining -= 1;
        Some(self.tree.value_of(id))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<'a, T, C> ExactSizeIterator for Iter<'a, T, C> {}

/// Iterator over all values of [RbTree] in descending order.
pub struct Reverse<'a, T, C> {
    tree: &'a RbTree<T, C>,
    cursor: Ref,
    remaining: usize,
}

impl<'a, T, C> Reverse<'a, T, C> {
    pub(crate) fn new(tree: &'a RbTree<T, C>, cursor: Ref) -> Reverse<'a, T, C> {
        let remaining = tree.len();
        Reverse {
            tree,
            cursor,
            remaining,
        }
    }
}

impl<'a, T, C> Iterator for Reverse<'a, T, C> {
    type Item = &'a T;

    fn next(&mut self) -> Option<Self::Item> {
        let id = self.cursor?;
        self.cursor = self.tree.predecessor(id);
        self.remaining -= 1;
        Some(self.tree.value_of(id))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<'a, T, C> ExactSizeIterator for Reverse<'a, T, C> {}

/// Iterator over values of [RbTree] standing in a [Relation] to a
/// boundary, in ascending order.
pub struct Range<'a, T, C> {
    tree: &'a RbTree<T, C>,
    cursor: Ref,
    relation: Relation,
    boundary: &'a T,
    fin: bool,
}

impl<'a, T, C> Range<'a, T, C> {
    pub(crate) fn new(
        tree: &'a RbTree<T, C>,
        cursor: Ref,
        relation: Relation,
        boundary: &'a T,
    ) -> Range<'a, T, C> {
        Range {
            tree,
            cursor,
            relation,
            boundary,
            fin: false,
        }
    }
}

impl<'a, T, C> Iterator for Range<'a, T, C>
where
    C: Compare<T>,
{
    type Item = &'a T;

    fn next(&mut self) -> Option<Self::Item> {
        match self.fin {
            false => {
                let id = self.cursor?;
                let value = self.tree.value_of(id);
                let ord = self.tree.as_comparator().compare(value, self.boundary);
                if self.relation.accepts(ord) {
                    self.cursor = self.tree.successor(id);
                    Some(value)
                } else {
                    self.fin = true;
                    None
                }
            }
            true => None,
        }
    }
}

#[cfg(test)]
#[path = "iter_test.rs"]
mod iter_test;
