//! Left-leaning red-black tree engine.
//!
//! This module implements the balanced-tree core behind [`FrozenMap`]:
//! the node representation, the rotation and color-flip operations, and
//! the top-down insertion algorithm that restores the tree invariants
//! after every insert.
//!
//! # Invariants
//!
//! Every node reachable from a root handed out by this module satisfies:
//!
//! 1. No lone red link leans right: a red right child only occurs as the
//!    arm of a temporary 4-node, where the left child is red as well
//! 2. A red node never has a red child
//! 3. Every path from the root to an absent child passes through the
//!    same number of black links
//! 4. An in-order walk yields keys in strictly increasing order
//!
//! An absent child counts as an implicit black leaf. The root returned by
//! [`insert`] may transiently be red; callers normalize it with
//! [`blacken`] before exposing it.
//!
//! Nodes are immutable after construction. Insertion derives new nodes by
//! structural replacement of only the fields that change, so untouched
//! subtrees are shared by reference count across map versions.
//!
//! [`FrozenMap`]: super::FrozenMap

use super::ReferenceCounter;
use std::borrow::Borrow;
use std::cmp::Ordering;
use std::fmt::{self, Write};

// =============================================================================
// Color Definition
// =============================================================================

/// The color of a red-black tree link.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub(crate) enum Color {
    Red,
    Black,
}

impl Color {
    /// Returns the opposite color.
    pub(crate) const fn flipped(self) -> Self {
        match self {
            Self::Red => Self::Black,
            Self::Black => Self::Red,
        }
    }
}

// =============================================================================
// Node Definition
// =============================================================================

/// An optional shared reference to a subtree.
pub(crate) type Link<K, V> = Option<ReferenceCounter<Node<K, V>>>;

/// Internal node structure for the left-leaning red-black tree.
#[derive(Clone)]
pub(crate) struct Node<K, V> {
    pub(crate) key: K,
    pub(crate) value: V,
    pub(crate) color: Color,
    pub(crate) left: Link<K, V>,
    pub(crate) right: Link<K, V>,
}

impl<K, V> Node<K, V> {
    /// Creates a new red node with no children.
    ///
    /// New entries always start red so that attaching them never changes
    /// the black height of the path they land on.
    pub(crate) const fn new_red(key: K, value: V) -> Self {
        Self {
            key,
            value,
            color: Color::Red,
            left: None,
            right: None,
        }
    }

    /// Checks if this node is red.
    pub(crate) fn is_red(&self) -> bool {
        self.color == Color::Red
    }

    /// Creates a copy of this node with a new color.
    pub(crate) fn with_color(&self, color: Color) -> Self
    where
        K: Clone,
        V: Clone,
    {
        Self {
            key: self.key.clone(),
            value: self.value.clone(),
            color,
            left: self.left.clone(),
            right: self.right.clone(),
        }
    }

    /// Rotates left around this node, fixing a right-leaning red link.
    ///
    /// The right child is promoted into this node's position and inherits
    /// its color; this node is demoted to the promoted child's left slot
    /// and becomes red.
    fn rotate_left(self) -> Self
    where
        K: Clone,
        V: Clone,
    {
        if let Some(right) = self.right {
            let color = self.color;
            let demoted = Self {
                key: self.key,
                value: self.value,
                color: Color::Red,
                left: self.left,
                right: right.left.clone(),
            };
            Self {
                key: right.key.clone(),
                value: right.value.clone(),
                color,
                left: Some(ReferenceCounter::new(demoted)),
                right: right.right.clone(),
            }
        } else {
            self
        }
    }

    /// Rotates right around this node, fixing two consecutive left red links.
    ///
    /// Mirror image of [`rotate_left`](Self::rotate_left).
    fn rotate_right(self) -> Self
    where
        K: Clone,
        V: Clone,
    {
        if let Some(left) = self.left {
            let color = self.color;
            let demoted = Self {
                key: self.key,
                value: self.value,
                color: Color::Red,
                left: left.right.clone(),
                right: self.right,
            };
            Self {
                key: left.key.clone(),
                value: left.value.clone(),
                color,
                left: left.left.clone(),
                right: Some(ReferenceCounter::new(demoted)),
            }
        } else {
            self
        }
    }

    /// Inverts the color of this node and of both children, simulating
    /// the split of a temporary 4-node.
    fn flip_colors(&self) -> Self
    where
        K: Clone,
        V: Clone,
    {
        Self {
            key: self.key.clone(),
            value: self.value.clone(),
            color: self.color.flipped(),
            left: flip_link(&self.left),
            right: flip_link(&self.right),
        }
    }
}

/// Re-derives a child link with its color inverted.
fn flip_link<K: Clone, V: Clone>(link: &Link<K, V>) -> Link<K, V> {
    link.as_ref()
        .map(|node| ReferenceCounter::new(node.with_color(node.color.flipped())))
}

/// Checks if an optional node is red. An absent child is black.
pub(crate) fn is_red<K, V>(node: Option<&ReferenceCounter<Node<K, V>>>) -> bool {
    node.is_some_and(|node| node.is_red())
}

// =============================================================================
// Core Operations
// =============================================================================

/// Binary-search-tree descent for `key`.
///
/// Returns `None` when the descent reaches an absent child without a
/// match. Lookup keys may be any borrowed form of the node key type.
pub(crate) fn search<'a, K, V, Q>(link: Option<&'a ReferenceCounter<Node<K, V>>>, key: &Q) -> Option<&'a V>
where
    K: Borrow<Q>,
    Q: Ord + ?Sized,
{
    link.and_then(|node| match key.cmp(node.key.borrow()) {
        Ordering::Less => search(node.left.as_ref(), key),
        Ordering::Greater => search(node.right.as_ref(), key),
        Ordering::Equal => Some(&node.value),
    })
}

/// Inserts `key`/`value` into the subtree at `link`, returning the new
/// subtree root.
///
/// Top-down left-leaning red-black insertion: split 4-nodes on the way
/// down with a color flip, recurse along the search path deriving new
/// nodes by structural replacement, then fix any red violation on the
/// way back up with at most two rotations per level. Inserting an
/// existing key replaces only its value; both child links are shared
/// unchanged.
///
/// The returned root may be red; see [`blacken`].
pub(crate) fn insert<K, V>(
    link: Option<&ReferenceCounter<Node<K, V>>>,
    key: K,
    value: V,
) -> ReferenceCounter<Node<K, V>>
where
    K: Clone + Ord,
    V: Clone,
{
    let Some(node) = link else {
        return ReferenceCounter::new(Node::new_red(key, value));
    };

    // Split a temporary 4-node before descending into it.
    let current = if is_red(node.left.as_ref()) && is_red(node.right.as_ref()) {
        node.flip_colors()
    } else {
        (**node).clone()
    };

    let current = match key.cmp(&current.key) {
        Ordering::Equal => Node { value, ..current },
        Ordering::Less => {
            let new_left = insert(current.left.as_ref(), key, value);
            Node {
                left: Some(new_left),
                ..current
            }
        }
        Ordering::Greater => {
            let new_right = insert(current.right.as_ref(), key, value);
            Node {
                right: Some(new_right),
                ..current
            }
        }
    };

    // Lean a right-leaning red link back to the left.
    let current = if is_red(current.right.as_ref()) && !is_red(current.left.as_ref()) {
        current.rotate_left()
    } else {
        current
    };

    // Break up two consecutive red links on the left spine.
    let current = if is_red(current.left.as_ref())
        && current
            .left
            .as_ref()
            .is_some_and(|left| is_red(left.left.as_ref()))
    {
        current.rotate_right()
    } else {
        current
    };

    ReferenceCounter::new(current)
}

/// Forces a root returned by [`insert`] to be black.
///
/// A red root is a transient artifact of the 4-node split; the map facade
/// normalizes every root through this function before exposing it.
pub(crate) fn blacken<K, V>(node: ReferenceCounter<Node<K, V>>) -> ReferenceCounter<Node<K, V>>
where
    K: Clone,
    V: Clone,
{
    if node.is_red() {
        ReferenceCounter::new(node.with_color(Color::Black))
    } else {
        node
    }
}

/// Recursively counts the nodes in the subtree at `link`.
///
/// O(n): the tree keeps no cached size.
pub(crate) fn node_len<K, V>(link: Option<&ReferenceCounter<Node<K, V>>>) -> usize {
    link.map_or(0, |node| {
        1 + node_len(node.left.as_ref()) + node_len(node.right.as_ref())
    })
}

/// Returns the entry with the smallest key in the subtree at `link`.
pub(crate) fn min_entry<K, V>(link: Option<&ReferenceCounter<Node<K, V>>>) -> Option<(&K, &V)> {
    link.and_then(|node| {
        node.left.as_ref().map_or_else(
            || Some((&node.key, &node.value)),
            |left| min_entry(Some(left)),
        )
    })
}

/// Returns the entry with the largest key in the subtree at `link`.
pub(crate) fn max_entry<K, V>(link: Option<&ReferenceCounter<Node<K, V>>>) -> Option<(&K, &V)> {
    link.and_then(|node| {
        node.right.as_ref().map_or_else(
            || Some((&node.key, &node.value)),
            |right| max_entry(Some(right)),
        )
    })
}

/// Renders the subtree at `link` into `out`, one field per line, with
/// children indented two spaces and `-` marking an absent child.
pub(crate) fn render<K, V>(link: Option<&ReferenceCounter<Node<K, V>>>, prefix: &str, out: &mut String)
where
    K: fmt::Debug,
    V: fmt::Debug,
{
    let Some(node) = link else {
        out.push_str(prefix);
        out.push_str("-\n");
        return;
    };

    let child_prefix = format!("{prefix}  ");
    let _ = writeln!(out, "{prefix}key: {:?}", node.key);
    let _ = writeln!(out, "{prefix}value: {:?}", node.value);
    let _ = writeln!(out, "{prefix}left:");
    render(node.left.as_ref(), &child_prefix, out);
    let _ = writeln!(out, "{prefix}right:");
    render(node.right.as_ref(), &child_prefix, out);
}

// =============================================================================
// Tests
// =============================================================================
