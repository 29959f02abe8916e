use crate::error::{Error, Result};
use crate::find::{MapStorage, MapTrait, NodeReference, PathResult, Strategy};
use std::fmt::Display;

use serde::{Deserialize, Serialize};

#[derive(Copy, Clone, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
pub enum Cell {
    #[default]
    Wall,
    Open,
}

impl Display for Cell {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}",
            match self {
                Cell::Wall => "█",
                Cell::Open => " ",
            }
        )
    }
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Display for Direction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}",
            match self {
                Direction::Up => "up",
                Direction::Down => "down",
                Direction::Left => "left",
                Direction::Right => "right",
            }
        )
    }
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub struct Point {
    pub row: usize,
    pub col: usize,
}

impl Point {
    pub const fn new(row: usize, col: usize) -> Self {
        Self { row, col }
    }

    /// Check if `other` is one step up, down, left or right of this point
    pub fn is_adjacent(&self, other: &Point) -> bool {
        self.distance(other) == 1
    }
}

impl Display for Point {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({}, {})", self.row, self.col)
    }
}

impl NodeReference for Point {
    /// Manhattan distance, exact on an empty grid without diagonal moves
    fn distance(&self, other: &Self) -> usize {
        self.row.abs_diff(other.row) + self.col.abs_diff(other.col)
    }
}

/// The outcome of a successful search through a [`MazeGraph`]
pub type Solution = PathResult<Point, Direction>;

/// A rectangular maze with one start and one goal cell.
///
/// The maze can not be changed once built, so it can be shared between searches.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MazeGraph {
    rows: usize,
    columns: usize,
    cells: Vec<Vec<Cell>>,
    start: Point,
    goal: Point,
}

impl MazeGraph {
    /// Build a maze from rows of cells. Rows shorter than the longest one are padded with
    /// walls. Fails if the start or goal is outside the maze or on a wall.
    pub fn new(mut cells: Vec<Vec<Cell>>, start: Point, goal: Point) -> Result<Self> {
        let rows = cells.len();
        let columns = cells.iter().map(Vec::len).max().unwrap_or(0);

        for row in cells.iter_mut() {
            row.resize(columns, Cell::Wall);
        }

        let maze = Self {
            rows,
            columns,
            cells,
            start,
            goal,
        };

        if !maze.is_valid(start) {
            return Err(Error::MalformedMaze(format!(
                "start {} is not an open cell of the {}x{} maze",
                start, rows, columns
            )));
        }
        if !maze.is_valid(goal) {
            return Err(Error::MalformedMaze(format!(
                "goal {} is not an open cell of the {}x{} maze",
                goal, rows, columns
            )));
        }

        Ok(maze)
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn columns(&self) -> usize {
        self.columns
    }

    pub fn start(&self) -> Point {
        self.start
    }

    pub fn goal(&self) -> Point {
        self.goal
    }

    /// The cell at `point`, everything outside the maze counts as wall
    pub fn cell(&self, point: Point) -> Cell {
        self.cells
            .get(point.row)
            .and_then(|row| row.get(point.col))
            .copied()
            .unwrap_or(Cell::Wall)
    }

    pub fn is_wall(&self, point: Point) -> bool {
        self.cell(point) == Cell::Wall
    }

    pub fn open_cells(&self) -> usize {
        self.cells
            .iter()
            .flatten()
            .filter(|cell| **cell == Cell::Open)
            .count()
    }

    /// Search a path from the start to the goal
    pub fn solve(&self, strategy: Strategy, weight: f64) -> Result<Solution> {
        strategy.solve(self, self.start, self.goal, weight)
    }
}

impl Display for MazeGraph {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for (row, cells) in self.cells.iter().enumerate() {
            for (col, cell) in cells.iter().enumerate() {
                let point = Point::new(row, col);
                if point == self.start {
                    write!(f, "A")?;
                } else if point == self.goal {
                    write!(f, "B")?;
                } else {
                    write!(f, "{}", cell)?;
                }
            }
            writeln!(f)?;
        }

        Ok(())
    }
}

/// A MapStorage that keeps one value per cell of a grid, row by row
#[derive(Debug)]
pub struct CellStorage<T> {
    columns: usize,
    values: Vec<T>,
}

impl<T: Copy + 'static> MapStorage<T> for CellStorage<T> {
    type Reference = Point;

    fn get(&self, node: Self::Reference) -> T {
        self.values[node.row * self.columns + node.col]
    }

    fn get_mut(&mut self, node: Self::Reference) -> &mut T {
        &mut self.values[node.row * self.columns + node.col]
    }
}

impl MapTrait for MazeGraph {
    type Reference = Point;
    type Action = Direction;
    type Storage<T: Default + Copy + Clone + 'static> = CellStorage<T>;

    fn is_valid(&self, node: Self::Reference) -> bool {
        node.row < self.rows && node.col < self.columns && !self.is_wall(node)
    }

    fn neighbors_of(
        &self,
        node: Self::Reference,
    ) -> impl Iterator<Item = (Self::Action, Self::Reference)> {
        let mut points = Vec::with_capacity(4);

        // the order decides which branch depth- and breadth-first search try first
        if node.row > 0 {
            points.push((
                Direction::Up,
                Point {
                    row: node.row - 1,
                    col: node.col,
                },
            ));
        }
        points.push((
            Direction::Down,
            Point {
                row: node.row + 1,
                col: node.col,
            },
        ));
        if node.col > 0 {
            points.push((
                Direction::Left,
                Point {
                    row: node.row,
                    col: node.col - 1,
                },
            ));
        }
        points.push((
            Direction::Right,
            Point {
                row: node.row,
                col: node.col + 1,
            },
        ));

        // filter to only keep open cells inside the maze
        points.retain(|(_, p)| self.is_valid(*p));

        points.into_iter()
    }

    fn create_storage<T: Default + Copy + Clone + 'static>(&self) -> Self::Storage<T> {
        CellStorage {
            columns: self.columns,
            values: vec![Default::default(); self.rows * self.columns],
        }
    }
}

#[cfg(test)]
mod test {

    use super::*;

    fn create_basic_maze() -> MazeGraph {
        [
            "#######", //
            "#A###B#",
            "# ### #",
            "# #   #",
            "# # ###",
            "#      ",
            "#######",
        ]
        .join("\n")
        .parse()
        .unwrap()
    }

    fn neighbors(maze: &MazeGraph, row: usize, col: usize) -> Vec<(Direction, Point)> {
        maze.neighbors_of(Point::new(row, col)).collect()
    }

    #[test]
    fn test_dimensions() {
        let maze = create_basic_maze();

        assert_eq!(maze.rows(), 7);
        assert_eq!(maze.columns(), 7);
        assert_eq!(maze.start(), Point::new(1, 1));
        assert_eq!(maze.goal(), Point::new(1, 5));
        assert_eq!(maze.open_cells(), 16);
    }

    #[test]
    fn test_neighbor_order() {
        let maze: MazeGraph = "   \n A \n  B".parse().unwrap();

        assert_eq!(
            neighbors(&maze, 1, 1),
            vec![
                (Direction::Up, Point::new(0, 1)),
                (Direction::Down, Point::new(2, 1)),
                (Direction::Left, Point::new(1, 0)),
                (Direction::Right, Point::new(1, 2)),
            ]
        );
    }

    #[test]
    fn test_neighbors_at_edges() {
        let maze = create_basic_maze();

        // open cell on the right border
        assert_eq!(
            neighbors(&maze, 5, 6),
            vec![(Direction::Left, Point::new(5, 5))]
        );
        assert_eq!(
            neighbors(&maze, 3, 3),
            vec![
                (Direction::Down, Point::new(4, 3)),
                (Direction::Right, Point::new(3, 4)),
            ]
        );
        // top left corner
        assert_eq!(
            neighbors(&"A \n B".parse::<MazeGraph>().unwrap(), 0, 0),
            vec![
                (Direction::Down, Point::new(1, 0)),
                (Direction::Right, Point::new(0, 1)),
            ]
        );
    }

    #[test]
    fn test_enclosed_cell_has_no_neighbors() {
        let maze: MazeGraph = "A#B\n###".parse().unwrap();

        assert!(neighbors(&maze, 0, 0).is_empty());
        assert_eq!(neighbors(&maze, 0, 2), vec![]);
    }

    #[test]
    fn test_new_rejects_walled_goal() {
        let cells = vec![vec![Cell::Open, Cell::Wall]];

        assert!(matches!(
            MazeGraph::new(cells.clone(), Point::new(0, 0), Point::new(0, 1)),
            Err(Error::MalformedMaze(_))
        ));
        assert!(matches!(
            MazeGraph::new(cells, Point::new(0, 5), Point::new(0, 0)),
            Err(Error::MalformedMaze(_))
        ));
    }

    #[test]
    fn test_new_pads_short_rows() {
        let cells = vec![vec![Cell::Open, Cell::Open, Cell::Open], vec![Cell::Open]];
        let maze = MazeGraph::new(cells, Point::new(0, 0), Point::new(1, 0)).unwrap();

        assert_eq!(maze.columns(), 3);
        assert_eq!(maze.cell(Point::new(1, 2)), Cell::Wall);
        assert_eq!(maze.cell(Point::new(9, 9)), Cell::Wall);
    }

    #[test]
    fn test_storage() {
        let maze = create_basic_maze();
        let mut storage = maze.create_storage::<usize>();

        *storage.get_mut(Point::new(6, 6)) = 3;

        assert_eq!(storage.get(Point::new(6, 6)), 3);
        assert_eq!(storage.get(Point::new(6, 5)), 0);
        assert_eq!(storage.get(Point::new(5, 6)), 0);
    }

    #[test]
    fn test_display() {
        let maze: MazeGraph = "#A \n  B".parse().unwrap();

        assert_eq!(maze.to_string(), "█A \n  B\n");
    }

    #[test]
    fn test_direction_names() {
        let names: Vec<String> = [
            Direction::Up,
            Direction::Down,
            Direction::Left,
            Direction::Right,
        ]
        .iter()
        .map(Direction::to_string)
        .collect();

        assert_eq!(names, vec!["up", "down", "left", "right"]);
    }

    #[test]
    fn test_adjacency() {
        assert!(Point::new(2, 3).is_adjacent(&Point::new(1, 3)));
        assert!(!Point::new(2, 3).is_adjacent(&Point::new(1, 2)));
        assert!(!Point::new(2, 3).is_adjacent(&Point::new(2, 3)));
    }
}
