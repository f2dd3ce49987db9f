//! Tree nodes and the left-leaning red-black rebalancing primitives.
//!
//! Every primitive takes a subtree root by value and returns the new root.
//! Nodes are shared through `Arc` so that an iteration snapshot can keep an
//! old version of a path alive; `Arc::make_mut` copies a node only when such
//! a snapshot still references it.

use std::cmp::Ordering;
use std::sync::Arc;

use crate::types::Key;

pub(crate) type Link<K, V> = Option<Arc<Node<K, V>>>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Color {
    Red,
    Black,
}

impl Color {
    fn flipped(self) -> Self {
        match self {
            Color::Red => Color::Black,
            Color::Black => Color::Red,
        }
    }
}

#[derive(Clone)]
pub(crate) struct Node<K, V> {
    pub(crate) key: K,
    pub(crate) value: V,
    pub(crate) color: Color,
    pub(crate) left: Link<K, V>,
    pub(crate) right: Link<K, V>,
}

impl<K, V> Node<K, V> {
    /// New nodes are always red: they join an existing 2- or 3-node.
    fn new(key: K, value: V) -> Self {
        Node {
            key,
            value,
            color: Color::Red,
            left: None,
            right: None,
        }
    }

    pub(crate) fn is_red(&self) -> bool {
        self.color == Color::Red
    }
}

pub(crate) fn is_red<K, V>(link: &Link<K, V>) -> bool {
    link.as_ref().is_some_and(|node| node.is_red())
}

fn is_black<K, V>(link: &Link<K, V>) -> bool {
    link.as_ref().is_some_and(|node| !node.is_red())
}

/// Whether the left child of `link` is red.
fn left_is_red<K, V>(link: &Link<K, V>) -> bool {
    link.as_ref().is_some_and(|node| is_red(&node.left))
}

pub(crate) fn min<K, V>(mut node: &Node<K, V>) -> &Node<K, V> {
    while let Some(left) = node.left.as_deref() {
        node = left;
    }
    node
}

pub(crate) fn max<K, V>(mut node: &Node<K, V>) -> &Node<K, V> {
    while let Some(right) = node.right.as_deref() {
        node = right;
    }
    node
}

pub(crate) fn find<'a, K: Key, V>(link: &'a Link<K, V>, key: &K) -> Option<&'a Node<K, V>> {
    let mut current = link.as_deref();
    while let Some(node) = current {
        current = match key.compared_to(&node.key) {
            Ordering::Less => node.left.as_deref(),
            Ordering::Greater => node.right.as_deref(),
            Ordering::Equal => return Some(node),
        };
    }
    None
}

pub(crate) fn find_mut<'a, K, V>(link: &'a mut Link<K, V>, key: &K) -> Option<&'a mut V>
where
    K: Key + Clone,
    V: Clone,
{
    let node = Arc::make_mut(link.as_mut()?);
    match key.compared_to(&node.key) {
        Ordering::Less => find_mut(&mut node.left, key),
        Ordering::Greater => find_mut(&mut node.right, key),
        Ordering::Equal => Some(&mut node.value),
    }
}

/// Greatest node with key <= `key`.
pub(crate) fn floor<'a, K: Key, V>(link: &'a Link<K, V>, key: &K) -> Option<&'a Node<K, V>> {
    let node = link.as_deref()?;
    match key.compared_to(&node.key) {
        Ordering::Equal => Some(node),
        Ordering::Less => floor(&node.left, key),
        Ordering::Greater => floor(&node.right, key).or(Some(node)),
    }
}

/// Least node with key >= `key`.
pub(crate) fn ceiling<'a, K: Key, V>(link: &'a Link<K, V>, key: &K) -> Option<&'a Node<K, V>> {
    let node = link.as_deref()?;
    match key.compared_to(&node.key) {
        Ordering::Equal => Some(node),
        Ordering::Greater => ceiling(&node.right, key),
        Ordering::Less => ceiling(&node.left, key).or(Some(node)),
    }
}

//              node                       x
//              /  \                      / \
//             /    (r)                 (r)  \
//          left       x             node      xr
//                    / \            /  \
//                  xl   xr       left   xl
//
pub(crate) fn rotate_left<K: Clone, V: Clone>(mut node: Arc<Node<K, V>>) -> Arc<Node<K, V>> {
    let parent = Arc::make_mut(&mut node);
    let Some(mut child) = parent.right.take() else {
        return node;
    };
    let pivot = Arc::make_mut(&mut child);
    parent.right = pivot.left.take();
    pivot.color = parent.color;
    parent.color = Color::Red;
    pivot.left = Some(node);
    child
}

//              node                       x
//              /  \                      / \
//            (r)   \                   (r)  \
//           x      right             xl      node
//          / \                               / \
//        xl   xr                           xr  right
//
pub(crate) fn rotate_right<K: Clone, V: Clone>(mut node: Arc<Node<K, V>>) -> Arc<Node<K, V>> {
    let parent = Arc::make_mut(&mut node);
    let Some(mut child) = parent.left.take() else {
        return node;
    };
    let pivot = Arc::make_mut(&mut child);
    parent.left = pivot.right.take();
    pivot.color = parent.color;
    parent.color = Color::Red;
    pivot.right = Some(node);
    child
}

/// Toggle the color of `node` and both of its children.
pub(crate) fn color_flip<K: Clone, V: Clone>(node: &mut Node<K, V>) {
    node.color = node.color.flipped();
    for child in [&mut node.left, &mut node.right].into_iter().flatten() {
        let child = Arc::make_mut(child);
        child.color = child.color.flipped();
    }
}

/// Restore the invariants on the way back up from an insert or delete.
pub(crate) fn balance<K: Clone, V: Clone>(mut node: Arc<Node<K, V>>) -> Arc<Node<K, V>> {
    if is_red(&node.right) {
        node = rotate_left(node);
    }
    if is_red(&node.left) && left_is_red(&node.left) {
        node = rotate_right(node);
    }
    if is_red(&node.left) && is_red(&node.right) {
        color_flip(Arc::make_mut(&mut node));
    }
    node
}

/// Make `node.left` or one of its children red. Assumes `node` is red and
/// both of its children are black.
fn move_red_left<K: Clone, V: Clone>(mut node: Arc<Node<K, V>>) -> Arc<Node<K, V>> {
    color_flip(Arc::make_mut(&mut node));
    if left_is_red(&node.right) {
        let parent = Arc::make_mut(&mut node);
        parent.right = parent.right.take().map(rotate_right);
        node = rotate_left(node);
        color_flip(Arc::make_mut(&mut node));
    }
    node
}

/// Make `node.right` or one of its children red. Assumes `node` is red and
/// both of its children are black.
fn move_red_right<K: Clone, V: Clone>(mut node: Arc<Node<K, V>>) -> Arc<Node<K, V>> {
    color_flip(Arc::make_mut(&mut node));
    if left_is_red(&node.left) {
        node = rotate_right(node);
        color_flip(Arc::make_mut(&mut node));
    }
    node
}

/// Insert into the subtree rooted at `link`. An equal key found on the way
/// down has its value replaced.
pub(crate) fn insert<K, V>(link: Link<K, V>, key: K, value: V) -> Arc<Node<K, V>>
where
    K: Key + Clone,
    V: Clone,
{
    let Some(mut node) = link else {
        return Arc::new(Node::new(key, value));
    };

    let current = Arc::make_mut(&mut node);
    match key.compared_to(&current.key) {
        Ordering::Less => {
            let left = current.left.take();
            current.left = Some(insert(left, key, value));
        }
        Ordering::Greater => {
            let right = current.right.take();
            current.right = Some(insert(right, key, value));
        }
        Ordering::Equal => current.value = value,
    }
    balance(node)
}

/// Remove the minimum of the subtree. Returns the new subtree root and the
/// detached node.
pub(crate) fn delete_min<K: Clone, V: Clone>(
    mut node: Arc<Node<K, V>>,
) -> (Link<K, V>, Option<Arc<Node<K, V>>>) {
    if node.left.is_none() {
        return (None, Some(node));
    }
    if !is_red(&node.left) && !left_is_red(&node.left) {
        node = move_red_left(node);
    }

    let current = Arc::make_mut(&mut node);
    let removed = match current.left.take() {
        Some(left) => {
            let (rest, removed) = delete_min(left);
            current.left = rest;
            removed
        }
        None => None,
    };
    (Some(balance(node)), removed)
}

/// Remove `key` from the subtree. The key must be present: the descent
/// pushes red links down assuming the target exists below.
pub(crate) fn delete<K, V>(mut node: Arc<Node<K, V>>, key: &K, removed: &mut Option<V>) -> Link<K, V>
where
    K: Key + Clone,
    V: Clone,
{
    if key.compared_to(&node.key) == Ordering::Less {
        if is_black(&node.left) && !left_is_red(&node.left) {
            node = move_red_left(node);
        }
        let current = Arc::make_mut(&mut node);
        if let Some(left) = current.left.take() {
            current.left = delete(left, key, removed);
        }
    } else {
        if is_red(&node.left) {
            node = rotate_right(node);
        }
        if key.compared_to(&node.key) == Ordering::Equal && node.right.is_none() {
            *removed = Some(into_entry(node).1);
            return None;
        }
        if is_black(&node.right) && !left_is_red(&node.right) {
            node = move_red_right(node);
        }

        let current = Arc::make_mut(&mut node);
        if key.compared_to(&current.key) == Ordering::Equal {
            // Replace with the in-order successor and splice it out below.
            if let Some(right) = current.right.take() {
                let (rest, successor) = delete_min(right);
                current.right = rest;
                if let Some(successor) = successor {
                    let (successor_key, successor_value) = into_entry(successor);
                    current.key = successor_key;
                    *removed = Some(std::mem::replace(&mut current.value, successor_value));
                }
            }
        } else if let Some(right) = current.right.take() {
            current.right = delete(right, key, removed);
        }
    }
    Some(balance(node))
}

/// Take ownership of a detached node's key and value, cloning them only if a
/// snapshot still shares the node.
fn into_entry<K: Clone, V: Clone>(node: Arc<Node<K, V>>) -> (K, V) {
    let node = Arc::try_unwrap(node).unwrap_or_else(|shared| (*shared).clone());
    (node.key, node.value)
}
