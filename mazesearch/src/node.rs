use std::rc::Rc;

use crate::find::NodeReference;

/// A position reached during a search, linked back to the node it was expanded from.
///
/// Nodes never change after construction. The parent link is reference counted, so the
/// nodes of one search form a tree of shared ancestors rooted at the start node.
#[derive(Debug)]
pub struct Node<R, A> {
    state: R,
    // the parent and the action taken from it, None only for the root
    link: Option<(Rc<Node<R, A>>, A)>,
    heuristic: usize,
    weight: f64,
}

impl<R: NodeReference, A: Copy> Node<R, A> {
    fn new(state: R, link: Option<(Rc<Self>, A)>, goal: R, weight: f64) -> Self {
        Self {
            state,
            link,
            heuristic: state.distance(&goal),
            weight,
        }
    }

    /// The node a search starts from: no parent and no action
    pub fn root(state: R, goal: R, weight: f64) -> Self {
        Self::new(state, None, goal, weight)
    }

    /// A node reached from `parent` by taking `action`, sharing the parent's weight
    pub fn child(parent: &Rc<Self>, action: A, state: R, goal: R) -> Self {
        let weight = parent.weight;
        Self::new(state, Some((Rc::clone(parent), action)), goal, weight)
    }

    pub fn state(&self) -> R {
        self.state
    }

    pub fn parent(&self) -> Option<&Rc<Self>> {
        self.link.as_ref().map(|(parent, _)| parent)
    }

    pub fn action(&self) -> Option<A> {
        self.link.as_ref().map(|(_, action)| *action)
    }

    pub fn heuristic(&self) -> usize {
        self.heuristic
    }

    pub fn weight(&self) -> f64 {
        self.weight
    }

    pub fn is_root(&self) -> bool {
        self.link.is_none()
    }

    /// Iterate from this node up to the root, this node first
    pub fn ancestors(&self) -> Ancestors<'_, R, A> {
        Ancestors { next: Some(self) }
    }

    /// Number of steps taken from the root to reach this node
    pub fn path_cost(&self) -> usize {
        self.ancestors().skip(1).count()
    }

    /// `path_cost + weight * heuristic`, the value A* ranks nodes by
    pub fn evaluation(&self) -> f64 {
        self.path_cost() as f64 + self.weight * self.heuristic as f64
    }

    /// States from the root to this node, both included
    pub fn path(&self) -> Vec<R> {
        let mut path: Vec<R> = self.ancestors().map(|node| node.state).collect();
        path.reverse();
        path
    }

    /// Actions from the root to this node
    pub fn actions(&self) -> Vec<A> {
        let mut actions: Vec<A> = self.ancestors().filter_map(|node| node.action()).collect();
        actions.reverse();
        actions
    }
}

// unlink iteratively, the default drop recurses once per ancestor
impl<R, A> Drop for Node<R, A> {
    fn drop(&mut self) {
        let mut link = self.link.take();
        while let Some((parent, _)) = link {
            match Rc::try_unwrap(parent) {
                Ok(mut node) => link = node.link.take(),
                Err(_) => break,
            }
        }
    }
}

pub struct Ancestors<'a, R, A> {
    next: Option<&'a Node<R, A>>,
}

impl<'a, R, A> Iterator for Ancestors<'a, R, A> {
    type Item = &'a Node<R, A>;

    fn next(&mut self) -> Option<Self::Item> {
        let node = self.next?;
        self.next = node.link.as_ref().map(|(parent, _)| parent.as_ref());
        Some(node)
    }
}
