//! Unbalanced binary search tree keyed by numeric id.
//!
//! Nodes live in an arena and point at their children by index. No rebalancing is done,
//! so a tree built from sorted ids degenerates into a list.

use tracing::debug;

use crate::arena::{Arena, Index};
use crate::error::ContainerError;

#[derive(Debug, Clone)]
struct Node<T> {
    id: u32,
    value: T,
    left: Option<Index>,
    right: Option<Index>,
}

#[derive(Debug, Clone)]
pub struct BinarySearchTree<T> {
    nodes: Arena<Node<T>>,
    root: Option<Index>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Order {
    InOrder,
    PreOrder,
    PostOrder,
}

impl<T> BinarySearchTree<T> {
    pub fn new() -> Self {
        Self {
            nodes: Arena::new(),
            root: None,
        }
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.root.is_none()
    }

    pub fn contains(&self, id: u32) -> bool {
        self.find(id).is_some()
    }

    fn find(&self, id: u32) -> Option<Index> {
        let mut current = self.root;
        while let Some(index) = current {
            let node = &self.nodes[index];
            current = match id.cmp(&node.id) {
                std::cmp::Ordering::Less => node.left,
                std::cmp::Ordering::Greater => node.right,
                std::cmp::Ordering::Equal => return Some(index),
            };
        }
        None
    }

    pub fn search(&self, id: u32) -> Option<&T> {
        self.find(id).map(|index| &self.nodes[index].value)
    }

    pub fn search_mut(&mut self, id: u32) -> Option<&mut T> {
        let index = self.find(id)?;
        Some(&mut self.nodes[index].value)
    }

    /// Attaches a new leaf. An id that is already present is rejected, never overwritten.
    pub fn insert(&mut self, id: u32, value: T) -> Result<(), ContainerError> {
        let Some(mut parent) = self.root else {
            self.root = Some(self.nodes.insert(Node::leaf(id, value)));
            return Ok(());
        };

        loop {
            let node = &self.nodes[parent];
            let child = match id.cmp(&node.id) {
                std::cmp::Ordering::Less => node.left,
                std::cmp::Ordering::Greater => node.right,
                std::cmp::Ordering::Equal => return Err(ContainerError::DuplicateKey { id }),
            };

            match child {
                Some(child) => parent = child,
                None => break,
            }
        }

        let leaf = self.nodes.insert(Node::leaf(id, value));
        let parent = &mut self.nodes[parent];
        if id < parent.id {
            parent.left = Some(leaf);
        } else {
            parent.right = Some(leaf);
        }
        Ok(())
    }

    /// Removes the node with `id` and returns its value.
    ///
    /// A node with two children takes over the id and value of its in-order successor,
    /// and the successor's node is unlinked instead.
    pub fn delete_node(&mut self, id: u32) -> Option<T> {
        let mut parent = None;
        let mut current = self.root;
        while let Some(index) = current {
            let node = &self.nodes[index];
            if id == node.id {
                break;
            }
            parent = current;
            current = if id < node.id { node.left } else { node.right };
        }
        let target = current?;

        let (left, right) = {
            let node = &self.nodes[target];
            (node.left, node.right)
        };

        let removed = match (left, right) {
            (None, _) | (_, None) => {
                self.replace_child(parent, target, left.or(right));
                self.nodes.remove(target).map(|node| node.value)
            }
            (Some(_), Some(right)) => {
                let mut successor_parent = target;
                let mut successor = right;
                while let Some(left) = self.nodes[successor].left {
                    successor_parent = successor;
                    successor = left;
                }

                let successor_right = self.nodes[successor].right;
                self.replace_child(Some(successor_parent), successor, successor_right);
                let successor = self.nodes.remove(successor)?;

                let node = &mut self.nodes[target];
                node.id = successor.id;
                Some(std::mem::replace(&mut node.value, successor.value))
            }
        };

        debug!(id, remaining = self.nodes.len(), "tree node deleted");
        removed
    }

    fn replace_child(&mut self, parent: Option<Index>, old: Index, new: Option<Index>) {
        match parent {
            None => self.root = new,
            Some(parent) => {
                let parent = &mut self.nodes[parent];
                if parent.left == Some(old) {
                    parent.left = new;
                } else {
                    parent.right = new;
                }
            }
        }
    }

    /// Walks the tree in the given order. Every call starts a fresh walk.
    pub fn traverse(&self, order: Order) -> Traversal<'_, T> {
        Traversal {
            nodes: &self.nodes,
            order,
            stack: self.root.map(Step::Visit).into_iter().collect(),
        }
    }

    /// Ascending id order.
    pub fn in_order(&self) -> Traversal<'_, T> {
        self.traverse(Order::InOrder)
    }

    pub fn pre_order(&self) -> Traversal<'_, T> {
        self.traverse(Order::PreOrder)
    }

    pub fn post_order(&self) -> Traversal<'_, T> {
        self.traverse(Order::PostOrder)
    }
}

impl<T> Node<T> {
    fn leaf(id: u32, value: T) -> Self {
        Self {
            id,
            value,
            left: None,
            right: None,
        }
    }
}

impl<T> Default for BinarySearchTree<T> {
    fn default() -> Self {
        Self::new()
    }
}

enum Step {
    /// Expand the subtree rooted here.
    Visit(Index),
    /// Yield this node.
    Emit(Index),
}

pub struct Traversal<'a, T> {
    nodes: &'a Arena<Node<T>>,
    order: Order,
    stack: Vec<Step>,
}

impl<'a, T> Iterator for Traversal<'a, T> {
    type Item = (u32, &'a T);

    fn next(&mut self) -> Option<Self::Item> {
        let nodes = self.nodes;
        loop {
            match self.stack.pop()? {
                Step::Emit(index) => {
                    let node = &nodes[index];
                    return Some((node.id, &node.value));
                }
                Step::Visit(index) => {
                    let node = &nodes[index];
                    let left = node.left.map(Step::Visit);
                    let right = node.right.map(Step::Visit);
                    let this = Some(Step::Emit(index));

                    // Pushed in reverse of the order they are yielded.
                    let steps = match self.order {
                        Order::InOrder => [right, this, left],
                        Order::PreOrder => [right, left, this],
                        Order::PostOrder => [this, right, left],
                    };
                    self.stack.extend(steps.into_iter().flatten());
                }
            }
        }
    }
}
