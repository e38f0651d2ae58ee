//! Module define the ordering used by [RbTree][crate::RbTree].

use std::cmp::Ordering;

/// Total ordering over values of type `T`.
///
/// A tree is parametrised over its comparator, hence comparisons are
/// resolved at compile time. Implementations must be consistent across
/// calls for the lifetime of a tree instance.
///
/// Closures of the form `Fn(&T, &T) -> Ordering` implement this trait.
pub trait Compare<T: ?Sized> {
    fn compare(&self, a: &T, b: &T) -> Ordering;
}

/// Natural ordering, as defined by the `Ord` implementation of `T`.
#[derive(Clone, Copy, Default, Debug)]
pub struct Natural;

impl<T> Compare<T> for Natural
where
    T: Ord + ?Sized,
{
    #[inline]
    fn compare(&self, a: &T, b: &T) -> Ordering {
        a.cmp(b)
    }
}

impl<T, F> Compare<T> for F
where
    T: ?Sized,
    F: Fn(&T, &T) -> Ordering,
{
    #[inline]
    fn compare(&self, a: &T, b: &T) -> Ordering {
        self(a, b)
    }
}

#[cfg(test)]
#[path = "cmp_test.rs"]
mod cmp_test;
