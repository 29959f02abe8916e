use std::path::PathBuf;
use std::time::Instant;

use anyhow::Context;
use clap::{Parser, Subcommand};
use log::info;
use mazesearch::batch::{check_weight, run_batch, BatchConfig, MazeReport, RunOutcome};
use mazesearch::render::{save_image, ImageOptions, SolutionView};
use mazesearch::{MazeGraph, Strategy};

/// Solve grid mazes with depth-first, breadth-first and weighted A* search
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Solve one maze with one strategy
    Solve {
        /// Text maze file
        maze: PathBuf,

        /// dfs, bfs or astar
        #[arg(short, long, default_value = "astar")]
        strategy: Strategy,

        /// Heuristic weight, only used by A*
        #[arg(short, long, default_value_t = 1.0, value_parser = parse_weight)]
        weight: f64,

        /// Write the solved maze to this PNG file
        #[arg(long)]
        image: Option<PathBuf>,

        /// Mark the explored cells in the image
        #[arg(long)]
        show_explored: bool,

        /// Print the maze and the solution to the console
        #[arg(long)]
        print: bool,
    },
    /// Run every strategy on each maze
    All {
        #[arg(required = true)]
        mazes: Vec<PathBuf>,

        /// Heuristic weights tried by A*
        #[arg(long, value_delimiter = ',', default_value = "1", value_parser = parse_weight)]
        weights: Vec<f64>,

        /// Write one image per run into this directory
        #[arg(long)]
        output_dir: Option<PathBuf>,
    },
    /// Run the searches described by a TOML batch file
    Batch {
        config: PathBuf,

        /// Print the reports as JSON instead of text
        #[arg(long)]
        json: bool,
    },
}

fn parse_weight(s: &str) -> Result<f64, String> {
    let weight: f64 = s.parse().map_err(|e| format!("{}", e))?;
    check_weight(weight).map_err(|e| e.to_string())
}

fn main() -> Result<(), anyhow::Error> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse();

    match args.command {
        Command::Solve {
            maze,
            strategy,
            weight,
            image,
            show_explored,
            print,
        } => {
            let lab = MazeGraph::open(&maze)
                .with_context(|| format!("failed to load {}", maze.display()))?;
            if print {
                println!("{}", SolutionView::new(&lab, None));
            }

            info!("running {} search on {}", strategy, maze.display());
            let t1 = Instant::now();
            let solution = lab
                .solve(strategy, weight)
                .with_context(|| format!("{} search on {}", strategy, maze.display()))?;
            let elapsed = t1.elapsed();

            println!("Elapsed time: {:?}", elapsed);
            println!("States explored: {}", solution.explored_count);
            println!("Total cost: {}", solution.total_cost);
            if print {
                println!("\n{}", SolutionView::new(&lab, Some(&solution)));
            }

            if let Some(path) = image {
                let options = ImageOptions {
                    show_explored,
                    ..Default::default()
                };
                save_image(&lab, Some(&solution), &options, &path)
                    .with_context(|| format!("failed to write {}", path.display()))?;
            }
        }
        Command::All {
            mazes,
            weights,
            output_dir,
        } => {
            let mut config = BatchConfig::new(mazes);
            config.weights = weights;
            config.output_dir = output_dir;
            config.image.show_explored = true;

            print_reports(&run_batch(&config)?);
        }
        Command::Batch { config, json } => {
            let config = BatchConfig::load(&config)
                .with_context(|| format!("failed to load {}", config.display()))?;
            let reports = run_batch(&config)?;

            if json {
                println!("{}", serde_json::to_string_pretty(&reports)?);
            } else {
                print_reports(&reports);
            }
        }
    }

    Ok(())
}

fn print_reports(reports: &[MazeReport]) {
    for report in reports {
        println!("Solving {}:", report.maze.display());
        if let Some(error) = &report.error {
            println!("  {}", error);
            continue;
        }

        for run in &report.runs {
            println!("----------------------------------");
            if run.strategy.uses_weight() {
                println!("{} search, weight {}", run.strategy, run.weight);
            } else {
                println!("{} search", run.strategy);
            }
            println!("Elapsed time: {:.6}s", run.elapsed_secs);
            match &run.outcome {
                RunOutcome::Solved {
                    explored_count,
                    total_cost,
                    image,
                } => {
                    println!("States explored: {}", explored_count);
                    println!("Total cost: {}", total_cost);
                    if let Some(image) = image {
                        println!("Image: {}", image.display());
                    }
                }
                RunOutcome::NoSolution { explored_count } => {
                    println!("No solution, states explored: {}", explored_count);
                }
                RunOutcome::Failed { error } => println!("Failed: {}", error),
            }
        }
        println!("----------------------------------");
        println!();
    }
}
