use std::{collections::VecDeque, rc::Rc};

use crate::error::{Error, Result};
use crate::find::NodeReference;
use crate::node::Node;

/// The discovered but not yet expanded nodes of a search.
///
/// Implementations differ only in which node `remove` hands out next, and that order
/// is what turns the shared search loop into depth-first, breadth-first or A* search.
pub trait Frontier<R: NodeReference, A: Copy + 'static> {
    fn add(&mut self, node: Rc<Node<R, A>>);

    /// Take the next node to expand, fails with [`Error::EmptyFrontier`] when empty
    fn remove(&mut self) -> Result<Rc<Node<R, A>>>;

    /// Iterate over the pending nodes in insertion order
    fn nodes(&self) -> impl Iterator<Item = &Rc<Node<R, A>>>;

    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Check if any pending node is at `state`
    fn contains_state(&self, state: R) -> bool {
        self.nodes().any(|node| node.state() == state)
    }
}

/// Last in, first out: depth-first search
#[derive(Debug)]
pub struct StackFrontier<R, A> {
    nodes: Vec<Rc<Node<R, A>>>,
}

impl<R, A> Default for StackFrontier<R, A> {
    fn default() -> Self {
        Self { nodes: Vec::new() }
    }
}

impl<R: NodeReference, A: Copy + 'static> Frontier<R, A> for StackFrontier<R, A> {
    fn add(&mut self, node: Rc<Node<R, A>>) {
        self.nodes.push(node);
    }

    fn remove(&mut self) -> Result<Rc<Node<R, A>>> {
        self.nodes.pop().ok_or(Error::EmptyFrontier)
    }

    fn nodes(&self) -> impl Iterator<Item = &Rc<Node<R, A>>> {
        self.nodes.iter()
    }

    fn len(&self) -> usize {
        self.nodes.len()
    }
}

/// First in, first out: breadth-first search
#[derive(Debug)]
pub struct QueueFrontier<R, A> {
    nodes: VecDeque<Rc<Node<R, A>>>,
}

impl<R, A> Default for QueueFrontier<R, A> {
    fn default() -> Self {
        Self {
            nodes: VecDeque::new(),
        }
    }
}

impl<R: NodeReference, A: Copy + 'static> Frontier<R, A> for QueueFrontier<R, A> {
    fn add(&mut self, node: Rc<Node<R, A>>) {
        self.nodes.push_back(node);
    }

    fn remove(&mut self) -> Result<Rc<Node<R, A>>> {
        self.nodes.pop_front().ok_or(Error::EmptyFrontier)
    }

    fn nodes(&self) -> impl Iterator<Item = &Rc<Node<R, A>>> {
        self.nodes.iter()
    }

    fn len(&self) -> usize {
        self.nodes.len()
    }
}

/// Lowest evaluation first: weighted A*.
///
/// Among nodes with the same evaluation the one added first wins, so runs with the
/// same maze and weight always expand nodes in the same order.
#[derive(Debug)]
pub struct PriorityFrontier<R, A> {
    // evaluation is fixed for an immutable node, so it is computed once on insertion
    nodes: Vec<(f64, Rc<Node<R, A>>)>,
}

impl<R, A> Default for PriorityFrontier<R, A> {
    fn default() -> Self {
        Self { nodes: Vec::new() }
    }
}

impl<R: NodeReference, A: Copy + 'static> Frontier<R, A> for PriorityFrontier<R, A> {
    fn add(&mut self, node: Rc<Node<R, A>>) {
        self.nodes.push((node.evaluation(), node));
    }

    fn remove(&mut self) -> Result<Rc<Node<R, A>>> {
        let mut best = self.nodes.first().ok_or(Error::EmptyFrontier)?.0;
        let mut best_index = 0;

        for (index, (evaluation, _)) in self.nodes.iter().enumerate().skip(1) {
            if *evaluation < best {
                best = *evaluation;
                best_index = index;
            }
        }

        // Vec::remove keeps the insertion order of the others intact for later ties
        Ok(self.nodes.remove(best_index).1)
    }

    fn nodes(&self) -> impl Iterator<Item = &Rc<Node<R, A>>> {
        self.nodes.iter().map(|(_, node)| node)
    }

    fn len(&self) -> usize {
        self.nodes.len()
    }
}
