use std::{fs, path::Path, str::FromStr};

use log::debug;

use crate::error::{Error, Result};
use crate::grid::{Cell, MazeGraph, Point};

const START: char = 'A';
const GOAL: char = 'B';
const OPEN: char = ' ';

/// Parse a text maze: `A` marks the start, `B` the goal, a space an open cell and any
/// other character a wall.
pub fn parse_maze(contents: &str) -> Result<MazeGraph> {
    let starts = contents.matches(START).count();
    if starts != 1 {
        return Err(Error::MalformedMaze(format!(
            "maze must have exactly one start point, found {}",
            starts
        )));
    }
    let goals = contents.matches(GOAL).count();
    if goals != 1 {
        return Err(Error::MalformedMaze(format!(
            "maze must have exactly one goal, found {}",
            goals
        )));
    }

    let mut start = None;
    let mut goal = None;
    let mut cells = Vec::new();

    for (row, line) in contents.lines().enumerate() {
        let mut cell_row = Vec::with_capacity(line.len());
        for (col, c) in line.chars().enumerate() {
            cell_row.push(match c {
                START => {
                    start = Some(Point { row, col });
                    Cell::Open
                }
                GOAL => {
                    goal = Some(Point { row, col });
                    Cell::Open
                }
                OPEN => Cell::Open,
                _ => Cell::Wall,
            });
        }
        cells.push(cell_row);
    }

    // both markers were counted above, so they sit on some line
    match (start, goal) {
        (Some(start), Some(goal)) => MazeGraph::new(cells, start, goal),
        _ => Err(Error::MalformedMaze("start or goal not found".to_string())),
    }
}

impl FromStr for MazeGraph {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        parse_maze(s)
    }
}

impl MazeGraph {
    /// Read and parse a maze file
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let contents = fs::read_to_string(path.as_ref())?;
        let maze = parse_maze(&contents)?;
        debug!(
            "loaded {}x{} maze from {}",
            maze.rows(),
            maze.columns(),
            path.as_ref().display()
        );
        Ok(maze)
    }
}

#[cfg(test)]
mod test {

    use super::*;

    #[test]
    fn test_parse() {
        let maze = parse_maze("##  #\n#A  B\n#####\n").unwrap();

        assert_eq!(maze.rows(), 3);
        assert_eq!(maze.columns(), 5);
        assert_eq!(maze.start(), Point::new(1, 1));
        assert_eq!(maze.goal(), Point::new(1, 4));
        assert_eq!(maze.cell(Point::new(0, 2)), Cell::Open);
        assert_eq!(maze.cell(Point::new(0, 4)), Cell::Wall);
        assert_eq!(maze.open_cells(), 6);
    }

    #[test]
    fn test_any_other_character_is_a_wall() {
        let maze = parse_maze("A.x\n|#B").unwrap();

        assert!(maze.is_wall(Point::new(0, 1)));
        assert!(maze.is_wall(Point::new(0, 2)));
        assert!(maze.is_wall(Point::new(1, 0)));
        assert_eq!(maze.open_cells(), 2);
    }

    #[test]
    fn test_short_rows_are_wall_padded() {
        let maze = parse_maze("A    \n#\n    B").unwrap();

        assert_eq!(maze.columns(), 5);
        assert!(maze.is_wall(Point::new(1, 0)));
        assert!(maze.is_wall(Point::new(1, 4)));
        assert_eq!(maze.to_string(), "A    \n█████\n    B\n");
    }

    #[test]
    fn test_windows_line_endings() {
        let maze = parse_maze("A #\r\n  B\r\n").unwrap();

        assert_eq!(maze.columns(), 3);
        assert_eq!(maze.goal(), Point::new(1, 2));
    }

    #[test]
    fn test_missing_start() {
        assert!(matches!(
            parse_maze("   \n  B"),
            Err(Error::MalformedMaze(msg)) if msg.contains("start")
        ));
        assert!(matches!(parse_maze(""), Err(Error::MalformedMaze(_))));
    }

    #[test]
    fn test_two_goals() {
        assert!(matches!(
            parse_maze("A B\n  B"),
            Err(Error::MalformedMaze(msg)) if msg.contains("goal")
        ));
    }

    #[test]
    fn test_open_missing_file() {
        assert!(matches!(
            MazeGraph::open("does/not/exist.txt"),
            Err(Error::Io(_))
        ));
    }
}
