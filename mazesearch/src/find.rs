use std::{fmt::Debug, fmt::Display, rc::Rc, str::FromStr};

use log::{debug, trace};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::frontier::{Frontier, PriorityFrontier, QueueFrontier, StackFrontier};
use crate::node::Node;

/// A position in a searchable map, small enough to copy into every node.
pub trait NodeReference: Copy + Eq + Debug + 'static {
    /// Lower bound on the number of moves between two positions, A* ranks nodes by it.
    /// Returning more than the true distance costs A* its optimal paths at weight 1.
    fn distance(&self, other: &Self) -> usize;
}

pub trait MapTrait {
    /// The type that can be used to reference nodes in the map
    type Reference: NodeReference;

    /// The moves that lead from a node to its neighbors
    type Action: Copy + Eq + Debug + 'static;

    /// The type that the map uses for storage
    type Storage<T: Default + Copy + Clone + 'static>: MapStorage<T, Reference = Self::Reference>;

    /// Check if the provided node reference can be stood on
    fn is_valid(&self, node: Self::Reference) -> bool;

    /// Return an iterator over the passable neighbors of the provided node and the action
    /// that leads there
    fn neighbors_of(
        &self,
        node: Self::Reference,
    ) -> impl Iterator<Item = (Self::Action, Self::Reference)>;

    /// Create a storage for values of type T
    fn create_storage<T: Default + Copy + Clone + 'static>(&self) -> Self::Storage<T>;
}

pub trait MapStorage<T> {
    type Reference: NodeReference;

    fn get(&self, node: Self::Reference) -> T;
    fn get_mut(&mut self, node: Self::Reference) -> &mut T;
}

#[derive(Debug, PartialEq, Clone)]
pub struct PathResult<R, A> {
    pub start: R,
    pub goal: R,
    /// Actions in order from the start, one less than there are cells in `path`
    pub actions: Vec<A>,
    /// Cells from the start to the goal, both included
    pub path: Vec<R>,
    /// The expanded states in the order they were expanded, the goal excluded
    pub explored: Vec<R>,
    pub explored_count: usize,
    pub total_cost: usize,
}

#[derive(Debug, Clone, PartialEq)]
pub enum PathFinderState<R, A> {
    Computing,
    NoPathFound,
    PathFound(PathResult<R, A>),
}

impl<R, A> PathFinderState<R, A> {
    pub fn is_done(&self) -> bool {
        !matches!(self, PathFinderState::Computing)
    }
}

/// The search loop, shared by all strategies. The frontier type decides the expansion order.
pub struct PathFinder<M: MapTrait, F> {
    start: M::Reference,
    goal: M::Reference,
    weight: f64,
    frontier: F,
    explored: M::Storage<bool>,
    explored_order: Vec<M::Reference>,
    explored_count: usize,
    goal_node: Option<Rc<Node<M::Reference, M::Action>>>,
    state: PathFinderState<M::Reference, M::Action>,
}

impl<M, F> PathFinder<M, F>
where
    M: MapTrait,
    F: Frontier<M::Reference, M::Action> + Default,
{
    /// Seed a new search with the start node. Fails with [`Error::MalformedMaze`] if the
    /// start or goal can not be stood on.
    pub fn new(map: &M, start: M::Reference, goal: M::Reference, weight: f64) -> Result<Self> {
        if !map.is_valid(start) {
            return Err(Error::MalformedMaze(format!(
                "start {:?} is not an open cell",
                start
            )));
        }
        if !map.is_valid(goal) {
            return Err(Error::MalformedMaze(format!(
                "goal {:?} is not an open cell",
                goal
            )));
        }

        let mut frontier = F::default();
        frontier.add(Rc::new(Node::root(start, goal, weight)));

        Ok(Self {
            start,
            goal,
            weight,
            frontier,
            explored: map.create_storage(),
            explored_order: Vec::new(),
            explored_count: 0,
            goal_node: None,
            state: PathFinderState::Computing,
        })
    }

    /// Run the search to the end
    pub fn finish(mut self, map: &M) -> Result<PathResult<M::Reference, M::Action>> {
        while !self.step(map).is_done() {}

        match self.state {
            PathFinderState::PathFound(result) => Ok(result),
            _ => Err(Error::NoSolution {
                explored: self.explored_count,
            }),
        }
    }

    /// Expand a single node
    pub fn step(&mut self, map: &M) -> &PathFinderState<M::Reference, M::Action> {
        if self.state.is_done() {
            return &self.state;
        }

        // an empty frontier means every reachable state was expanded without meeting the goal
        let Ok(node) = self.frontier.remove() else {
            debug!(
                "no path from {:?} to {:?}, explored {} states",
                self.start, self.goal, self.explored_count
            );
            self.state = PathFinderState::NoPathFound;
            return &self.state;
        };
        self.explored_count += 1;
        trace!("expanding {:?}", node.state());

        if node.state() == self.goal {
            let result = PathResult {
                start: self.start,
                goal: self.goal,
                actions: node.actions(),
                path: node.path(),
                explored: std::mem::take(&mut self.explored_order),
                explored_count: self.explored_count,
                total_cost: node.path_cost(),
            };
            debug!(
                "found path from {:?} to {:?}: cost={} explored={}",
                self.start, self.goal, result.total_cost, result.explored_count
            );

            self.goal_node = Some(node);
            self.state = PathFinderState::PathFound(result);
            return &self.state;
        }

        *self.explored.get_mut(node.state()) = true;
        self.explored_order.push(node.state());

        for (action, neighbor) in map.neighbors_of(node.state()) {
            if !self.frontier.contains_state(neighbor) && !self.explored.get(neighbor) {
                self.frontier
                    .add(Rc::new(Node::child(&node, action, neighbor, self.goal)));
            }
        }

        &self.state
    }

    pub fn state(&self) -> &PathFinderState<M::Reference, M::Action> {
        &self.state
    }

    pub fn is_explored(&self, node: M::Reference) -> bool {
        self.explored.get(node)
    }

    pub fn explored_count(&self) -> usize {
        self.explored_count
    }

    pub fn frontier(&self) -> &F {
        &self.frontier
    }

    /// The node that reached the goal, once the search found a path
    pub fn goal_node(&self) -> Option<&Rc<Node<M::Reference, M::Action>>> {
        self.goal_node.as_ref()
    }

    pub fn start(&self) -> M::Reference {
        self.start
    }

    pub fn goal(&self) -> M::Reference {
        self.goal
    }

    pub fn weight(&self) -> f64 {
        self.weight
    }
}

/// Which frontier drives the search
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Strategy {
    DepthFirst,
    BreadthFirst,
    AStar,
}

impl Strategy {
    pub const ALL: [Strategy; 3] = [
        Strategy::DepthFirst,
        Strategy::BreadthFirst,
        Strategy::AStar,
    ];

    /// Only A* ranks nodes by their weighted heuristic
    pub fn uses_weight(self) -> bool {
        matches!(self, Strategy::AStar)
    }

    /// Search a path from `start` to `goal`. `weight` is ignored by the uninformed
    /// strategies.
    pub fn solve<M: MapTrait>(
        self,
        map: &M,
        start: M::Reference,
        goal: M::Reference,
        weight: f64,
    ) -> Result<PathResult<M::Reference, M::Action>> {
        match self {
            Strategy::DepthFirst => {
                PathFinder::<M, StackFrontier<M::Reference, M::Action>>::new(
                    map, start, goal, weight,
                )?
                .finish(map)
            }
            Strategy::BreadthFirst => {
                PathFinder::<M, QueueFrontier<M::Reference, M::Action>>::new(
                    map, start, goal, weight,
                )?
                .finish(map)
            }
            Strategy::AStar => {
                PathFinder::<M, PriorityFrontier<M::Reference, M::Action>>::new(
                    map, start, goal, weight,
                )?
                .finish(map)
            }
        }
    }
}

impl Display for Strategy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}",
            match self {
                Strategy::DepthFirst => "depth-first",
                Strategy::BreadthFirst => "breadth-first",
                Strategy::AStar => "a-star",
            }
        )
    }
}

impl FromStr for Strategy {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "dfs" | "depth-first" => Ok(Strategy::DepthFirst),
            "bfs" | "breadth-first" => Ok(Strategy::BreadthFirst),
            "astar" | "a-star" | "a*" => Ok(Strategy::AStar),
            _ => Err(Error::InvalidStrategy(s.to_string())),
        }
    }
}
