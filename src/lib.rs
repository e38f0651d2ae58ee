//! Package implement a sorted collection backed by a Red-Black tree.
//!
//! Quoting from [Wikipedia][rbt]:
//!
//! > A red–black tree is a self-balancing binary search tree data
//! > structure noted for fast storage and retrieval of ordered
//! > information. The nodes in a red-black tree hold an extra "color"
//! > bit, often drawn as red and black, which help ensure that the tree
//! > is always approximately balanced.
//!
//! [RbTree] is an ephemeral, single threaded, ordered collection of
//! values:
//!
//! - Parametrised over `value-type` and an ordering, [Compare].
//! - Duplicates are allowed, equal values are kept in insertion order.
//! - insert(), remove(), contains(), member() api.
//! - Full table scan, to iterate over all values, in both directions.
//! - Bounded scan, to iterate over values less-than, less-or-equal,
//!   equal, greater-or-equal or greater-than a boundary, refer [Relation].
//! - Nodes are held in an arena, no unsafe code and no recursion on drop.
//! - Not thread safe.
//!
//! Constructing a new [RbTree] instance and basic operations:
//!
//! ```
//! use rbset::RbTree;
//!
//! let mut tree: RbTree<u64> = RbTree::new();
//! assert_eq!(tree.len(), 0);
//! assert_eq!(tree.is_empty(), true);
//!
//! tree.insert(20);
//! tree.insert(10);
//! tree.insert(30);
//! assert_eq!(tree.len(), 3);
//! assert_eq!(tree.first(), Some(&10));
//! assert_eq!(tree.last(), Some(&30));
//!
//! assert_eq!(tree.remove(&20), Some(20));
//! assert_eq!(tree.contains(&20), false);
//! ```
//!
//! Ordering with a custom comparator:
//!
//! ```
//! use rbset::RbTree;
//!
//! let mut tree: RbTree<u64, _> = RbTree::with_comparator(|a: &u64, b: &u64| b.cmp(a));
//! tree.extend(vec![1, 3, 2]);
//! assert_eq!(tree.to_vec(), vec![3, 2, 1]);
//! ```
//!
//! Bounded scan:
//!
//! ```
//! use rbset::{RbTree, Relation};
//!
//! let tree: RbTree<u64> = (1..=10).collect();
//! let items: Vec<u64> = tree.range(Relation::Gt, &7).cloned().collect();
//! assert_eq!(items, vec![8, 9, 10]);
//! assert_eq!(tree.collect_range(Relation::Le, &2), vec![1, 2]);
//! ```
//!
//! [rbt]: https://en.wikipedia.org/wiki/Red%E2%80%93black_tree

use std::{error, fmt, result};

// Short form to compose Error values.
//
// Here are few possible ways:
//
// ```ignore
// use crate::Error;
// err_at!(Fatal, msg: format!("bad argument"));
// ```
//
// ```ignore
// use crate::Error;
// err_at!(InvalidInput, "<>".parse::<u8>());
// ```
//
// ```ignore
// use crate::Error;
// err_at!(InvalidInput, "<>".parse::<u8>(), format!("parse failed"));
// ```
//
macro_rules! err_at {
    ($v:ident, msg: $($arg:expr),+) => {{
        let prefix = format!("{}:{}", file!(), line!());
        Err(Error::$v(prefix, format!($($arg),+)))
    }};
    ($v:ident, $e:expr) => {{
        match $e {
            Ok(val) => Ok(val),
            Err(err) => {
                let prefix = format!("{}:{}", file!(), line!());
                Err(Error::$v(prefix, format!("{}", err)))
            }
        }
    }};
    ($v:ident, $e:expr, $($arg:expr),+) => {{
        match $e {
            Ok(val) => Ok(val),
            Err(err) => {
                let prefix = format!("{}:{}", file!(), line!());
                let msg = format!($($arg),+);
                Err(Error::$v(prefix, format!("{} {}", err, msg)))
            }
        }
    }};
}

mod cmp;
mod iter;
mod node;
mod rbtree;

pub use cmp::{Compare, Natural};
pub use iter::{Iter, Range, Relation, Reverse};
pub use rbtree::RbTree;

/// Error variants that are returned by this package's API.
///
/// Each variant carries a prefix, typically identifying the
/// error location.
pub enum Error {
    Fatal(String, String),
    InvalidInput(String, String),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter) -> result::Result<(), fmt::Error> {
        use Error::*;

        match self {
            Fatal(p, msg) => write!(f, "{} Fatal: {}", p, msg),
            InvalidInput(p, msg) => write!(f, "{} InvalidInput: {}", p, msg),
        }
    }
}

impl fmt::Debug for Error {
    fn fmt(&self, f: &mut fmt::Formatter) -> result::Result<(), fmt::Error> {
        write!(f, "{}", self)
    }
}

impl error::Error for Error {}

/// Type alias for Result return type, used by this package.
pub type Result<T> = result::Result<T, Error>;
