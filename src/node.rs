use std::fmt;

/// Link to a node in the tree's arena. `None` is the sentinel, it stands
/// for every absent child and for the root's parent, and is always black.
pub type Ref = Option<usize>;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Color {
    Red,
    Black,
}

// Node corresponds to a single value in RbTree instance.
#[derive(Clone)]
pub struct Node<T> {
    pub value: T,
    pub color: Color,
    pub parent: Ref, // store: parent, sentinel for root
    pub left: Ref,   // store: left child
    pub right: Ref,  // store: right child
}

impl<T> Node<T> {
    /// New nodes are always red leaves.
    pub fn new(value: T, parent: Ref) -> Node<T> {
        Node {
            value,
            color: Color::Red,
            parent,
            left: None,
            right: None,
        }
    }

    #[inline]
    pub fn set_red(&mut self) {
        self.color = Color::Red
    }

    #[inline]
    pub fn set_black(&mut self) {
        self.color = Color::Black
    }

    #[inline]
    pub fn is_black(&self) -> bool {
        self.color == Color::Black
    }

    #[inline]
    pub fn is_red(&self) -> bool {
        self.color == Color::Red
    }

    #[inline]
    pub fn is_leaf(&self) -> bool {
        self.left.is_none() && self.right.is_none()
    }
}

impl<T> fmt::Debug for Node<T>
where
    T: fmt::Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self.color {
            Color::Black => write!(f, "(b)<{:?}>", self.value),
            Color::Red => write!(f, "(r)<{:?}>", self.value),
        }
    }
}

#[cfg(test)]
#[path = "node_test.rs"]
mod node_test;
