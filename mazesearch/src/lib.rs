//! Grid maze solving with depth-first, breadth-first and weighted A* search.
//!
//! All three strategies share one search loop ([`PathFinder`]) and differ only in the
//! [`Frontier`] that decides which discovered node is expanded next.

pub mod batch;
mod error;
mod find;
mod frontier;
mod grid;
mod node;
mod parse;
pub mod render;

pub use error::{Error, Result};
pub use find::{
    MapStorage, MapTrait, NodeReference, PathFinder, PathFinderState, PathResult, Strategy,
};
pub use frontier::{Frontier, PriorityFrontier, QueueFrontier, StackFrontier};
pub use grid::{Cell, CellStorage, Direction, MazeGraph, Point, Solution};
pub use node::{Ancestors, Node};
pub use parse::parse_maze;
