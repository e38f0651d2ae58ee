//! Module provide sorted collection implemented by [RbTree] type.
//!
//! RbTree is implemented using a classic [red-black][wiki-rbt] tree with
//! parent links. Nodes are allocated from an arena owned by the tree and
//! refer to each other by index, absent children are represented by a
//! sentinel that is always black.
//!
//! - Values are ordered by a [Compare] implementation, fixed at
//!   construction.
//! - Duplicates are allowed. A new value is placed after all values
//!   comparing equal to it, so equal values iterate in insertion order.
//! - insert and remove are O(log n), each followed by a fixup pass of
//!   at most two (insert) or three (remove) rotations.
//! - member, contains, first, last are O(log n).
//! - Bounded scans are O(log n + k), refer [Relation].
//!
//! [wiki-rbt]: https://en.wikipedia.org/wiki/Red%E2%80%93black_tree

use log::{debug, trace};
use slab::Slab;

use std::{
    cmp::{self, Ordering},
    fmt,
    iter::FromIterator,
    mem,
    ops::ControlFlow,
};

use crate::{
    cmp::{Compare, Natural},
    iter::{Iter, Range, Relation, Reverse},
    node::{Color, Node, Ref},
    Error, Result,
};

/// RbTree manage a single instance of in-memory sorted collection using
/// [red-black][rbt] tree.
///
/// [rbt]: https://en.wikipedia.org/wiki/Red%E2%80%93black_tree
#[derive(Clone)]
pub struct RbTree<T, C = Natural> {
    nodes: Slab<Node<T>>,
    root: Ref,
    n_count: usize, // number of values in the tree.
    cmp: C,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Dir {
    Left,
    Right,
}

impl Dir {
    #[inline]
    fn flip(self) -> Dir {
        match self {
            Dir::Left => Dir::Right,
            Dir::Right => Dir::Left,
        }
    }
}

impl<T> Node<T> {
    #[inline]
    fn child(&self, dir: Dir) -> Ref {
        match dir {
            Dir::Left => self.left,
            Dir::Right => self.right,
        }
    }

    #[inline]
    fn set_child(&mut self, dir: Dir, child: Ref) {
        match dir {
            Dir::Left => self.left = child,
            Dir::Right => self.right = child,
        }
    }
}

impl<T> RbTree<T, Natural>
where
    T: Ord,
{
    /// Create an empty instance of RbTree, ordered by `T`'s `Ord`
    /// implementation.
    pub fn new() -> RbTree<T, Natural> {
        RbTree::with_comparator(Natural)
    }
}

impl<T, C> RbTree<T, C> {
    /// Create an empty instance of RbTree ordered by `cmp`.
    pub fn with_comparator(cmp: C) -> RbTree<T, C> {
        RbTree {
            nodes: Slab::new(),
            root: None,
            n_count: Default::default(),
            cmp,
        }
    }
}

impl<T, C> Default for RbTree<T, C>
where
    C: Default,
{
    fn default() -> RbTree<T, C> {
        RbTree::with_comparator(C::default())
    }
}

/// Maintenance API.
impl<T, C> RbTree<T, C> {
    /// Return number of values in this instance.
    #[inline]
    pub fn len(&self) -> usize {
        self.n_count
    }

    /// Check whether this instance is empty.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.n_count == 0
    }

    /// Return the number of nodes on the longest path from root to leaf.
    /// For `n` values this never exceeds `2 * log2(n + 1)`.
    pub fn height(&self) -> usize {
        self.depth(self.root)
    }

    /// Remove all values, dropping them.
    pub fn clear(&mut self) {
        debug!("clear {} values", self.n_count);
        self.nodes.clear();
        self.root = None;
        self.n_count = 0;
    }

    /// Return a reference to the comparator.
    pub fn as_comparator(&self) -> &C {
        &self.cmp
    }

    /// Print the tree structure, one node per line, children indented
    /// under their parent.
    pub fn pretty_print(&self)
    where
        T: fmt::Debug,
    {
        print!("{}", self.to_pretty_string())
    }

    /// Same as [RbTree::pretty_print], return the dump as string.
    pub fn to_pretty_string(&self) -> String
    where
        T: fmt::Debug,
    {
        let mut out = String::default();
        self.pretty_subtree(self.root, "".to_string(), &mut out);
        out
    }

    fn depth(&self, link: Ref) -> usize {
        match link {
            Some(id) => {
                let node = &self.nodes[id];
                1 + cmp::max(self.depth(node.left), self.depth(node.right))
            }
            None => 0,
        }
    }

    fn pretty_subtree(&self, link: Ref, mut prefix: String, out: &mut String)
    where
        T: fmt::Debug,
    {
        if let Some(id) = link {
            let node = &self.nodes[id];
            out.push_str(&format!("{}{:?}\n", prefix, node));
            prefix.push_str("  ");
            if !node.is_leaf() {
                self.pretty_subtree(node.left, prefix.clone(), out);
                self.pretty_subtree(node.right, prefix, out);
            }
        } else {
            out.push_str(&format!("{}(b)<nil>\n", prefix));
        }
    }
}

/// Write API.
impl<T, C> RbTree<T, C>
where
    C: Compare<T>,
{
    /// Insert value into this instance, taking ownership. Values that
    /// compare equal to existing ones are always inserted, after them.
    pub fn insert(&mut self, value: T) {
        let (mut parent, mut dir) = (None, Dir::Left);
        let mut link = self.root;
        while let Some(id) = link {
            let node = &self.nodes[id];
            dir = match self.cmp.compare(&value, &node.value) {
                Ordering::Less => Dir::Left,
                Ordering::Equal | Ordering::Greater => Dir::Right,
            };
            parent = Some(id);
            link = node.child(dir);
        }

        let id = self.nodes.insert(Node::new(value, parent));
        match parent {
            Some(parent) => self.nodes[parent].set_child(dir, Some(id)),
            None => self.root = Some(id),
        }
        self.n_count += 1;

        self.insert_fixup(id);
    }

    /// Remove the value equal to `value`. Among values comparing equal,
    /// the first one in iteration order that is also `==` to `value` is
    /// removed and returned. If none match, remove is a no-op.
    pub fn remove(&mut self, value: &T) -> Option<T>
    where
        T: PartialEq,
    {
        let id = self.find(value)?;
        Some(self.delete_node(id))
    }
}

/// Read API.
impl<T, C> RbTree<T, C>
where
    C: Compare<T>,
{
    /// Return the stored value that compares equal to `value` and is
    /// `==` to it. Equal values are checked in insertion order.
    pub fn member(&self, value: &T) -> Option<&T>
    where
        T: PartialEq,
    {
        self.find(value).map(|id| &self.nodes[id].value)
    }

    /// Check whether this instance has a value matching `value`, refer
    /// [RbTree::member].
    pub fn contains(&self, value: &T) -> bool
    where
        T: PartialEq,
    {
        self.find(value).is_some()
    }

    /// Return an iterator over the values standing in `relation` to
    /// `boundary`, in ascending order.
    pub fn range<'a>(&'a self, relation: Relation, boundary: &'a T) -> Range<'a, T, C> {
        let start = match relation {
            Relation::Lt | Relation::Le => self.root.map(|id| self.leftmost(id)),
            Relation::Eq | Relation::Ge => self.lower_bound(boundary),
            Relation::Gt => self.upper_bound(boundary),
        };
        Range::new(self, start, relation, boundary)
    }

    /// Call `callback` with each value standing in `relation` to
    /// `boundary`, in ascending order, until it returns `Break`.
    pub fn enumerate_range<F>(&self, relation: Relation, boundary: &T, mut callback: F)
    where
        F: FnMut(&T) -> ControlFlow<()>,
    {
        for value in self.range(relation, boundary) {
            if callback(value).is_break() {
                break;
            }
        }
    }

    /// Collect clones of the values standing in `relation` to `boundary`,
    /// in ascending order.
    pub fn collect_range(&self, relation: Relation, boundary: &T) -> Vec<T>
    where
        T: Clone,
    {
        self.range(relation, boundary).cloned().collect()
    }

    /// Validate the tree with following rules:
    ///
    /// * Root is black.
    /// * From root to any leaf, no consecutive reds allowed in its path.
    /// * Number of blacks should be same under left child and right child.
    /// * Parent links agree with child links.
    /// * Values are in sorted order.
    /// * Count of reachable nodes match [RbTree::len].
    pub fn validate(&self) -> Result<()>
    where
        T: fmt::Debug,
    {
        let res = self.validate_all();
        if let Err(err) = &res {
            debug!("validate failed, {}", err);
        }
        res
    }

    fn validate_all(&self) -> Result<()>
    where
        T: fmt::Debug,
    {
        if self.is_red(self.root) {
            return err_at!(Fatal, msg: "root is red");
        }

        let mut n_nodes = 0;
        self.validate_tree(self.root, None, false, 0, &mut n_nodes)?;
        if n_nodes != self.n_count || self.nodes.len() != self.n_count {
            return err_at!(
                Fatal, msg: "n_count:{} reachable:{} arena:{}",
                self.n_count, n_nodes, self.nodes.len()
            );
        }

        let mut iter = self.iter();
        if let Some(mut prev) = iter.next() {
            for value in iter {
                if self.cmp.compare(prev, value) == Ordering::Greater {
                    return err_at!(Fatal, msg: "sort prev:{:?} next:{:?}", prev, value);
                }
                prev = value;
            }
        }

        Ok(())
    }

    fn validate_tree(
        &self,
        link: Ref,
        parent: Ref,
        fromred: bool,
        mut n_blacks: usize,
        n_nodes: &mut usize,
    ) -> Result<usize>
    where
        T: fmt::Debug,
    {
        let node = match link {
            Some(id) => &self.nodes[id],
            None => return Ok(n_blacks),
        };
        *n_nodes += 1;

        if node.parent != parent {
            return err_at!(Fatal, msg: "parent link {:?} for {:?}", node.parent, node);
        }

        let red = node.is_red();
        if fromred && red {
            return err_at!(Fatal, msg: "consecutive reds at {:?}", node);
        }
        if !red {
            n_blacks += 1;
        }

        let lblacks = self.validate_tree(node.left, link, red, n_blacks, n_nodes)?;
        let rblacks = self.validate_tree(node.right, link, red, n_blacks, n_nodes)?;
        if lblacks != rblacks {
            return err_at!(Fatal, msg: "unbalanced blacks {} {}", lblacks, rblacks);
        }

        if let Some(left) = node.left.map(|id| &self.nodes[id]) {
            if self.cmp.compare(&left.value, &node.value) == Ordering::Greater {
                return err_at!(Fatal, msg: "sort left:{:?} parent:{:?}", left, node);
            }
        }
        if let Some(right) = node.right.map(|id| &self.nodes[id]) {
            if self.cmp.compare(&right.value, &node.value) == Ordering::Less {
                return err_at!(Fatal, msg: "sort right:{:?} parent:{:?}", right, node);
            }
        }

        Ok(lblacks)
    }

    // Leftmost node that does not compare less than value.
    fn lower_bound(&self, value: &T) -> Ref {
        let (mut link, mut found) = (self.root, None);
        while let Some(id) = link {
            let node = &self.nodes[id];
            link = match self.cmp.compare(&node.value, value) {
                Ordering::Less => node.right,
                Ordering::Equal | Ordering::Greater => {
                    found = Some(id);
                    node.left
                }
            };
        }
        found
    }

    // Leftmost node that compares greater than value.
    fn upper_bound(&self, value: &T) -> Ref {
        let (mut link, mut found) = (self.root, None);
        while let Some(id) = link {
            let node = &self.nodes[id];
            link = match self.cmp.compare(&node.value, value) {
                Ordering::Less | Ordering::Equal => node.right,
                Ordering::Greater => {
                    found = Some(id);
                    node.left
                }
            };
        }
        found
    }

    fn find(&self, value: &T) -> Ref
    where
        T: PartialEq,
    {
        let mut link = self.lower_bound(value);
        while let Some(id) = link {
            let node = &self.nodes[id];
            if self.cmp.compare(&node.value, value) != Ordering::Equal {
                break;
            } else if node.value == *value {
                return Some(id);
            }
            link = self.successor(id);
        }
        None
    }
}

/// Scan API.
impl<T, C> RbTree<T, C> {
    /// Return the smallest value.
    pub fn first(&self) -> Option<&T> {
        self.root.map(|id| &self.nodes[self.leftmost(id)].value)
    }

    /// Return the largest value.
    pub fn last(&self) -> Option<&T> {
        self.root.map(|id| &self.nodes[self.rightmost(id)].value)
    }

    /// Return an iterator over all values in ascending order.
    pub fn iter(&self) -> Iter<T, C> {
        Iter::new(self, self.root.map(|id| self.leftmost(id)))
    }

    /// Return an iterator over all values in descending order.
    pub fn reverse(&self) -> Reverse<T, C> {
        Reverse::new(self, self.root.map(|id| self.rightmost(id)))
    }

    /// Call `callback` with each value in ascending order, until it
    /// returns `Break`.
    pub fn enumerate<F>(&self, mut callback: F)
    where
        F: FnMut(&T) -> ControlFlow<()>,
    {
        for value in self.iter() {
            if callback(value).is_break() {
                break;
            }
        }
    }

    /// Collect clones of all values in ascending order.
    pub fn to_vec(&self) -> Vec<T>
    where
        T: Clone,
    {
        self.iter().cloned().collect()
    }

    /// Collect clones of values for which `predicate` returns true, in
    /// ascending order.
    pub fn objects_passing<F>(&self, mut predicate: F) -> Vec<T>
    where
        T: Clone,
        F: FnMut(&T) -> bool,
    {
        self.iter().filter(|value| predicate(value)).cloned().collect()
    }
}

// navigation, crate-visible for iterators.
impl<T, C> RbTree<T, C> {
    #[inline]
    pub(crate) fn value_of(&self, id: usize) -> &T {
        &self.nodes[id].value
    }

    /// Next node in ascending order, sentinel if `id` is the maximum.
    pub(crate) fn successor(&self, id: usize) -> Ref {
        self.neighbour(id, Dir::Right)
    }

    /// Previous node in ascending order, sentinel if `id` is the minimum.
    pub(crate) fn predecessor(&self, id: usize) -> Ref {
        self.neighbour(id, Dir::Left)
    }

    fn neighbour(&self, mut id: usize, dir: Dir) -> Ref {
        if let Some(child) = self.nodes[id].child(dir) {
            return Some(self.edge(child, dir.flip()));
        }
        let mut parent = self.nodes[id].parent;
        while let Some(pid) = parent {
            if self.nodes[pid].child(dir) != Some(id) {
                break;
            }
            id = pid;
            parent = self.nodes[pid].parent;
        }
        parent
    }

    #[inline]
    fn leftmost(&self, id: usize) -> usize {
        self.edge(id, Dir::Left)
    }

    #[inline]
    fn rightmost(&self, id: usize) -> usize {
        self.edge(id, Dir::Right)
    }

    fn edge(&self, mut id: usize, dir: Dir) -> usize {
        while let Some(child) = self.nodes[id].child(dir) {
            id = child
        }
        id
    }

    #[inline]
    fn is_red(&self, link: Ref) -> bool {
        link.map_or(false, |id| self.nodes[id].is_red())
    }

    #[inline]
    fn is_black(&self, link: Ref) -> bool {
        link.map_or(true, |id| self.nodes[id].is_black())
    }
}

// rebalancing, rotation and fixup routines.
impl<T, C> RbTree<T, C> {
    fn side_of(&self, id: usize, parent: usize) -> Dir {
        if self.nodes[parent].left == Some(id) {
            Dir::Left
        } else {
            Dir::Right
        }
    }

    fn parent_of(&self, id: usize) -> usize {
        match self.nodes[id].parent {
            Some(parent) => parent,
            None => panic!("parent_of(): red node at root ? Call the programmer"),
        }
    }

    // Hand `old`'s position under its parent, or the root, over to `new`.
    fn transplant(&mut self, old: usize, new: Ref) {
        let parent = self.nodes[old].parent;
        match parent {
            Some(pid) => {
                let dir = self.side_of(old, pid);
                self.nodes[pid].set_child(dir, new);
            }
            None => self.root = new,
        }
        if let Some(id) = new {
            self.nodes[id].parent = parent;
        }
    }

    //  rotate(node, Left)
    //
    //              (i)                       (i)
    //               |                         |
    //              node                       x
    //              /  \                      / \
    //             /    \                    /   \
    //            /      \                  /     \
    //          left      x              node      xr
    //                   / \             /  \
    //                 xl   xr        left   xl
    //
    // rotate(node, Right) is the mirror image. Colors are untouched.
    fn rotate(&mut self, node: usize, dir: Dir) {
        let x = match self.nodes[node].child(dir.flip()) {
            Some(x) => x,
            None => panic!("rotate(): promoting a sentinel ? Call the programmer"),
        };
        trace!("rotate {:?} at {}", dir, node);

        let inner = self.nodes[x].child(dir);
        self.nodes[node].set_child(dir.flip(), inner);
        if let Some(id) = inner {
            self.nodes[id].parent = Some(node);
        }
        self.transplant(node, Some(x));
        self.nodes[x].set_child(dir, Some(node));
        self.nodes[node].parent = Some(x);
    }

    fn insert_fixup(&mut self, mut id: usize) {
        loop {
            let parent = match self.nodes[id].parent {
                Some(parent) if self.nodes[parent].is_red() => parent,
                _ => break,
            };
            let grand = self.parent_of(parent);
            let side = self.side_of(parent, grand);

            match self.nodes[grand].child(side.flip()) {
                Some(uncle) if self.nodes[uncle].is_red() => {
                    self.nodes[parent].set_black();
                    self.nodes[uncle].set_black();
                    self.nodes[grand].set_red();
                    id = grand;
                }
                _ => {
                    if self.nodes[parent].child(side.flip()) == Some(id) {
                        // inner child, make it an outer one.
                        self.rotate(parent, side);
                        id = parent;
                    }
                    let parent = self.parent_of(id);
                    let grand = self.parent_of(parent);
                    self.nodes[parent].set_black();
                    self.nodes[grand].set_red();
                    self.rotate(grand, side.flip());
                    break;
                }
            }
        }

        if let Some(root) = self.root {
            self.nodes[root].set_black();
        }
    }

    // Splice out the node, return its value.
    fn delete_node(&mut self, id: usize) -> T {
        let (left, right) = (self.nodes[id].left, self.nodes[id].right);
        let spliced = match (left, right) {
            (Some(_), Some(right)) => {
                let succ = self.leftmost(right);
                match self.nodes.get2_mut(id, succ) {
                    Some((node, snode)) => mem::swap(&mut node.value, &mut snode.value),
                    None => panic!("delete_node(): lost successor ? Call the programmer"),
                }
                succ
            }
            (_, _) => id,
        };

        // spliced node has at most one child.
        let node = &self.nodes[spliced];
        let (child, parent, color) = (node.left.or(node.right), node.parent, node.color);
        self.transplant(spliced, child);
        let node = self.nodes.remove(spliced);
        self.n_count -= 1;

        if color == Color::Black {
            self.delete_fixup(child, parent);
        }
        node.value
    }

    // `link` carries an extra black, `parent` is its parent, tracked
    // separately since `link` may be the sentinel.
    fn delete_fixup(&mut self, mut link: Ref, mut parent: Ref) {
        while link != self.root && self.is_black(link) {
            let pid = match parent {
                Some(pid) => pid,
                None => panic!("delete_fixup(): orphan below root ? Call the programmer"),
            };
            let side = match self.nodes[pid].left == link {
                true => Dir::Left,
                false => Dir::Right,
            };

            let mut sibling = self.sibling(pid, side);
            if self.nodes[sibling].is_red() {
                self.nodes[sibling].set_black();
                self.nodes[pid].set_red();
                self.rotate(pid, side);
                sibling = self.sibling(pid, side);
            }

            let near = self.nodes[sibling].child(side);
            let far = self.nodes[sibling].child(side.flip());
            if self.is_black(near) && self.is_black(far) {
                self.nodes[sibling].set_red();
                link = Some(pid);
                parent = self.nodes[pid].parent;
                continue;
            }

            if self.is_black(far) {
                if let Some(near) = near {
                    self.nodes[near].set_black();
                }
                self.nodes[sibling].set_red();
                self.rotate(sibling, side.flip());
                sibling = self.sibling(pid, side);
            }

            self.nodes[sibling].color = self.nodes[pid].color;
            self.nodes[pid].set_black();
            if let Some(far) = self.nodes[sibling].child(side.flip()) {
                self.nodes[far].set_black();
            }
            self.rotate(pid, side);
            link = self.root;
            parent = None;
        }

        if let Some(id) = link {
            self.nodes[id].set_black();
        }
    }

    // Sibling of the child at `side` under `parent`, never the sentinel
    // while an extra black is pending on that side.
    fn sibling(&self, parent: usize, side: Dir) -> usize {
        match self.nodes[parent].child(side.flip()) {
            Some(id) => id,
            None => panic!("sibling(): black-height mismatch ? Call the programmer"),
        }
    }
}

impl<T, C> Extend<T> for RbTree<T, C>
where
    C: Compare<T>,
{
    fn extend<I>(&mut self, iter: I)
    where
        I: IntoIterator<Item = T>,
    {
        iter.into_iter().for_each(|value| self.insert(value));
    }
}

impl<T, C> FromIterator<T> for RbTree<T, C>
where
    C: Compare<T> + Default,
{
    fn from_iter<I>(iter: I) -> RbTree<T, C>
    where
        I: IntoIterator<Item = T>,
    {
        let mut tree = RbTree::default();
        tree.extend(iter);
        tree
    }
}

impl<'a, T, C> IntoIterator for &'a RbTree<T, C> {
    type Item = &'a T;
    type IntoIter = Iter<'a, T, C>;

    fn into_iter(self) -> Iter<'a, T, C> {
        self.iter()
    }
}

impl<T, C> fmt::Debug for RbTree<T, C>
where
    T: fmt::Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_set().entries(self.iter()).finish()
    }
}

#[cfg(test)]
#[path = "rbtree_test.rs"]
mod rbtree_test;
