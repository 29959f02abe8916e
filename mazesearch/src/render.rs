//! Console and image output of a maze and its solution.

use std::{fmt::Display, path::Path};

use image::{Rgba, RgbaImage};
use log::debug;
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::find::{MapStorage, MapTrait};
use crate::grid::{Cell, CellStorage, MazeGraph, Point, Solution};

const BACKGROUND: Rgba<u8> = Rgba([0, 0, 0, 255]);
const WALL: Rgba<u8> = Rgba([40, 40, 40, 255]);
const START: Rgba<u8> = Rgba([255, 0, 0, 255]);
const GOAL: Rgba<u8> = Rgba([0, 171, 28, 255]);
const SOLUTION: Rgba<u8> = Rgba([220, 235, 113, 255]);
const EXPLORED: Rgba<u8> = Rgba([212, 97, 85, 255]);
const EMPTY: Rgba<u8> = Rgba([237, 240, 252, 255]);

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ImageOptions {
    /// Side of a cell in pixels
    pub cell_size: u32,
    /// Gap between cells in pixels
    pub cell_border: u32,
    pub show_solution: bool,
    pub show_explored: bool,
}

impl Default for ImageOptions {
    fn default() -> Self {
        Self {
            cell_size: 50,
            cell_border: 2,
            show_solution: true,
            show_explored: false,
        }
    }
}

/// What a single cell shows once the solution is laid over the maze
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
enum Mark {
    Wall,
    Start,
    Goal,
    Solution,
    Explored,
    Empty,
}

/// Per-cell overlay of a solution, the path taking precedence over the explored set
struct Overlay {
    path: Option<CellStorage<bool>>,
    explored: Option<CellStorage<bool>>,
}

impl Overlay {
    fn new(maze: &MazeGraph, solution: Option<&Solution>, path: bool, explored: bool) -> Self {
        let mark = |cells: &[Point]| {
            let mut storage: CellStorage<bool> = maze.create_storage();
            for cell in cells {
                *storage.get_mut(*cell) = true;
            }
            storage
        };

        Self {
            path: solution.filter(|_| path).map(|s| mark(s.path.as_slice())),
            explored: solution.filter(|_| explored).map(|s| mark(s.explored.as_slice())),
        }
    }

    fn mark(&self, maze: &MazeGraph, point: Point) -> Mark {
        if maze.cell(point) == Cell::Wall {
            Mark::Wall
        } else if point == maze.start() {
            Mark::Start
        } else if point == maze.goal() {
            Mark::Goal
        } else if self.path.as_ref().is_some_and(|s| s.get(point)) {
            Mark::Solution
        } else if self.explored.as_ref().is_some_and(|s| s.get(point)) {
            Mark::Explored
        } else {
            Mark::Empty
        }
    }
}

/// Console view of a maze with the solution path drawn as `*`
pub struct SolutionView<'a> {
    maze: &'a MazeGraph,
    overlay: Overlay,
}

impl<'a> SolutionView<'a> {
    pub fn new(maze: &'a MazeGraph, solution: Option<&Solution>) -> Self {
        Self {
            maze,
            overlay: Overlay::new(maze, solution, true, false),
        }
    }
}

impl Display for SolutionView<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for row in 0..self.maze.rows() {
            for col in 0..self.maze.columns() {
                let c = match self.overlay.mark(self.maze, Point { row, col }) {
                    Mark::Wall => "█",
                    Mark::Start => "A",
                    Mark::Goal => "B",
                    Mark::Solution => "*",
                    Mark::Explored | Mark::Empty => " ",
                };
                write!(f, "{}", c)?;
            }
            writeln!(f)?;
        }

        Ok(())
    }
}

/// Draw the maze as one filled square per cell. The solution and explored cells are only
/// drawn when a solution is given.
pub fn render_image(
    maze: &MazeGraph,
    solution: Option<&Solution>,
    options: &ImageOptions,
) -> RgbaImage {
    let size = options.cell_size;
    let border = options.cell_border;
    let overlay = Overlay::new(
        maze,
        solution,
        options.show_solution,
        options.show_explored,
    );

    let mut img = RgbaImage::from_pixel(
        maze.columns() as u32 * size,
        maze.rows() as u32 * size,
        BACKGROUND,
    );

    for row in 0..maze.rows() {
        for col in 0..maze.columns() {
            let fill = match overlay.mark(maze, Point { row, col }) {
                Mark::Wall => WALL,
                Mark::Start => START,
                Mark::Goal => GOAL,
                Mark::Solution => SOLUTION,
                Mark::Explored => EXPLORED,
                Mark::Empty => EMPTY,
            };

            let x0 = col as u32 * size;
            let y0 = row as u32 * size;
            // the square runs from border to size - border inclusive, like a drawn rectangle
            for y in (y0 + border)..=(y0 + size).saturating_sub(border) {
                for x in (x0 + border)..=(x0 + size).saturating_sub(border) {
                    if x < img.width() && y < img.height() {
                        img.put_pixel(x, y, fill);
                    }
                }
            }
        }
    }

    img
}

/// Render the maze and write it to `path`, the format follows the file extension
pub fn save_image<P: AsRef<Path>>(
    maze: &MazeGraph,
    solution: Option<&Solution>,
    options: &ImageOptions,
    path: P,
) -> Result<()> {
    let img = render_image(maze, solution, options);
    img.save(path.as_ref())?;
    debug!("wrote {}", path.as_ref().display());
    Ok(())
}
