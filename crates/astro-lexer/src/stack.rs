//! Persistent stack shared between a live scanner and its snapshots.
//!
//! Nodes are immutable and reference counted, so cloning a stack is O(1)
//! and pushing or popping on a clone never changes what another clone
//! observes.

use std::fmt;
use std::sync::Arc;

struct Node<T> {
    value: T,
    next: Option<Arc<Node<T>>>,
}

pub struct Stack<T> {
    head: Option<Arc<Node<T>>>,
    len: usize,
}

impl<T> Stack<T> {
    /// Create an empty stack.
    pub fn new() -> Self {
        Self { head: None, len: 0 }
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn peek(&self) -> Option<&T> {
        self.head.as_ref().map(|node| &node.value)
    }

    pub fn push(&mut self, value: T) {
        let next = self.head.take();
        self.head = Some(Arc::new(Node { value, next }));
        self.len += 1;
    }

    /// Drops the top entry, leaving the popped node to any other owner.
    pub fn drop_top(&mut self) {
        if let Some(node) = self.head.take() {
            self.head = node.next.clone();
            self.len -= 1;
        }
    }

    pub fn clear(&mut self) {
        unlink(self.head.take());
        self.len = 0;
    }

    /// Iterates from the top of the stack down.
    pub fn iter(&self) -> Iter<'_, T> {
        Iter {
            next: self.head.as_deref(),
        }
    }
}

impl<T: Clone> Stack<T> {
    pub fn pop(&mut self) -> Option<T> {
        let value = self.peek().cloned();
        self.drop_top();
        value
    }

    /// Copies the entries out, bottom first.
    pub fn to_vec(&self) -> Vec<T> {
        let mut out: Vec<T> = self.iter().cloned().collect();
        out.reverse();
        out
    }
}

impl<T> Clone for Stack<T> {
    fn clone(&self) -> Self {
        Self {
            head: self.head.clone(),
            len: self.len,
        }
    }
}

impl<T> Drop for Stack<T> {
    fn drop(&mut self) {
        unlink(self.head.take());
    }
}

/// Frees the uniquely owned prefix of a chain in a loop. The derived drop
/// would recurse once per node and overflow on deeply nested input.
fn unlink<T>(mut head: Option<Arc<Node<T>>>) {
    while let Some(node) = head {
        match Arc::into_inner(node) {
            Some(mut node) => head = node.next.take(),
            // Still shared with a snapshot; that owner frees the rest.
            None => break,
        }
    }
}

impl<T> Default for Stack<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: PartialEq> PartialEq for Stack<T> {
    fn eq(&self, other: &Self) -> bool {
        self.len == other.len && self.iter().eq(other.iter())
    }
}

impl<T: Eq> Eq for Stack<T> {}

impl<T: fmt::Debug> fmt::Debug for Stack<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut entries: Vec<&T> = self.iter().collect();
        entries.reverse();
        f.debug_list().entries(entries).finish()
    }
}

impl<T: Clone> FromIterator<T> for Stack<T> {
    /// Builds a stack by pushing items in order, so the last item ends on top.
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        let mut stack = Stack::new();
        for value in iter {
            stack.push(value);
        }
        stack
    }
}

pub struct Iter<'a, T> {
    next: Option<&'a Node<T>>,
}

impl<'a, T> Iterator for Iter<'a, T> {
    type Item = &'a T;

    fn next(&mut self) -> Option<Self::Item> {
        self.next.map(|node| {
            self.next = node.next.as_deref();
            &node.value
        })
    }
}
