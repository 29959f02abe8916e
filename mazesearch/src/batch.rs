//! Run every configured strategy over a list of maze files.
//!
//! Each maze file is handled independently: a file that can not be read or parsed is
//! reported and skipped without stopping the others.

use std::{
    fs,
    path::{Path, PathBuf},
    str::FromStr,
    time::Instant,
};

use log::{info, warn};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::find::Strategy;
use crate::grid::MazeGraph;
use crate::render::{save_image, ImageOptions};

fn default_strategies() -> Vec<Strategy> {
    Strategy::ALL.to_vec()
}

fn default_weights() -> Vec<f64> {
    vec![1.0]
}

/// Accept an A* weight only if it is finite and not negative
pub fn check_weight(weight: f64) -> Result<f64> {
    if weight.is_finite() && weight >= 0.0 {
        Ok(weight)
    } else {
        Err(Error::InvalidWeight(weight))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct BatchConfig {
    pub mazes: Vec<PathBuf>,
    #[serde(default = "default_strategies")]
    pub strategies: Vec<Strategy>,
    /// Heuristic weights tried by A*, the other strategies run once
    #[serde(default = "default_weights")]
    pub weights: Vec<f64>,
    /// Where to write one image per run, no images when unset
    #[serde(default)]
    pub output_dir: Option<PathBuf>,
    #[serde(default)]
    pub image: ImageOptions,
}

impl BatchConfig {
    pub fn new(mazes: Vec<PathBuf>) -> Self {
        Self {
            mazes,
            strategies: default_strategies(),
            weights: default_weights(),
            output_dir: None,
            image: ImageOptions::default(),
        }
    }

    pub fn validate(&self) -> Result<()> {
        for &weight in &self.weights {
            check_weight(weight)?;
        }
        Ok(())
    }

    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        fs::read_to_string(path)?.parse()
    }

    /// The (strategy, weight) pairs run on every maze, in order
    pub fn runs(&self) -> Vec<(Strategy, f64)> {
        let weights = if self.weights.is_empty() {
            default_weights()
        } else {
            self.weights.clone()
        };

        self.strategies
            .iter()
            .flat_map(|&strategy| {
                if strategy.uses_weight() {
                    weights.iter().map(|&w| (strategy, w)).collect::<Vec<_>>()
                } else {
                    vec![(strategy, 1.0)]
                }
            })
            .collect()
    }
}

impl FromStr for BatchConfig {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let config: BatchConfig = toml::from_str(s)?;
        config.validate()?;
        Ok(config)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "kebab-case")]
pub enum RunOutcome {
    Solved {
        explored_count: usize,
        total_cost: usize,
        #[serde(skip_serializing_if = "Option::is_none")]
        image: Option<PathBuf>,
    },
    NoSolution {
        explored_count: usize,
    },
    Failed {
        error: String,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RunReport {
    pub strategy: Strategy,
    pub weight: f64,
    pub elapsed_secs: f64,
    #[serde(flatten)]
    pub outcome: RunOutcome,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MazeReport {
    pub maze: PathBuf,
    /// Why the maze file could not be loaded, no runs are reported then
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    pub runs: Vec<RunReport>,
}

/// Name of the image written for one run, e.g. `a-star-w2-maze1.png`
pub fn image_name(strategy: Strategy, weight: f64, maze: &Path) -> String {
    let tag = maze
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "maze".to_string());

    if strategy.uses_weight() {
        format!("{}-w{}-{}.png", strategy, weight, tag)
    } else {
        format!("{}-{}.png", strategy, tag)
    }
}

/// Run the configured searches over every maze, reports come back in maze order
pub fn run_batch(config: &BatchConfig) -> Result<Vec<MazeReport>> {
    config.validate()?;
    if let Some(dir) = &config.output_dir {
        fs::create_dir_all(dir)?;
    }

    let runs = config.runs();
    info!(
        "running {} searches on each of {} mazes",
        runs.len(),
        config.mazes.len()
    );

    Ok(config
        .mazes
        .par_iter()
        .map(|path| run_maze(path, &runs, config))
        .collect())
}

fn run_maze(path: &Path, runs: &[(Strategy, f64)], config: &BatchConfig) -> MazeReport {
    let maze = match MazeGraph::open(path) {
        Ok(maze) => maze,
        Err(e) => {
            warn!("skipping {}: {}", path.display(), e);
            return MazeReport {
                maze: path.to_path_buf(),
                error: Some(e.to_string()),
                runs: Vec::new(),
            };
        }
    };

    let runs = runs
        .iter()
        .map(|&(strategy, weight)| run_one(&maze, path, strategy, weight, config))
        .collect();

    MazeReport {
        maze: path.to_path_buf(),
        error: None,
        runs,
    }
}

fn run_one(
    maze: &MazeGraph,
    path: &Path,
    strategy: Strategy,
    weight: f64,
    config: &BatchConfig,
) -> RunReport {
    let t1 = Instant::now();
    let result = maze.solve(strategy, weight);
    let elapsed_secs = t1.elapsed().as_secs_f64();

    let outcome = match result {
        Ok(solution) => {
            info!(
                "{}: {} (weight {}) explored={} cost={} in {:.6}s",
                path.display(),
                strategy,
                weight,
                solution.explored_count,
                solution.total_cost,
                elapsed_secs
            );

            let image = config.output_dir.as_ref().and_then(|dir| {
                let file = dir.join(image_name(strategy, weight, path));
                match save_image(maze, Some(&solution), &config.image, &file) {
                    Ok(()) => Some(file),
                    Err(e) => {
                        warn!("could not write {}: {}", file.display(), e);
                        None
                    }
                }
            });

            RunOutcome::Solved {
                explored_count: solution.explored_count,
                total_cost: solution.total_cost,
                image,
            }
        }
        Err(Error::NoSolution { explored }) => {
            info!(
                "{}: {} (weight {}) found no solution after {} states",
                path.display(),
                strategy,
                weight,
                explored
            );
            RunOutcome::NoSolution {
                explored_count: explored,
            }
        }
        Err(e) => {
            warn!("{}: {} failed: {}", path.display(), strategy, e);
            RunOutcome::Failed {
                error: e.to_string(),
            }
        }
    };

    RunReport {
        strategy,
        weight,
        elapsed_secs,
        outcome,
    }
}

#[cfg(test)]
mod test {

    use super::*;

    /// A fresh directory under the system temp dir for one test
    fn scratch_dir(name: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("mazesearch-{}-{}", name, std::process::id()));
        let _ = fs::remove_dir_all(&dir);
        fs::create_dir_all(&dir).unwrap();
        dir
    }

    #[test]
    fn test_config_defaults() {
        let config: BatchConfig = "mazes = [\"a.txt\", \"b.txt\"]".parse().unwrap();

        assert_eq!(config, BatchConfig::new(vec!["a.txt".into(), "b.txt".into()]));
        assert_eq!(
            config.runs(),
            vec![
                (Strategy::DepthFirst, 1.0),
                (Strategy::BreadthFirst, 1.0),
                (Strategy::AStar, 1.0)
            ]
        );
    }

    #[test]
    fn test_config_full() {
        let config: BatchConfig = r#"
            mazes = ["data/maze1.txt"]
            strategies = ["breadth-first", "a-star"]
            weights = [1.0, 2.5]
            output_dir = "images"

            [image]
            show_explored = true
        "#
        .parse()
        .unwrap();

        assert_eq!(config.output_dir, Some(PathBuf::from("images")));
        assert!(config.image.show_explored);
        assert_eq!(
            config.runs(),
            vec![
                (Strategy::BreadthFirst, 1.0),
                (Strategy::AStar, 1.0),
                (Strategy::AStar, 2.5)
            ]
        );
    }

    #[test]
    fn test_config_errors() {
        assert!(matches!(
            "mazes = [\"a.txt\"]\nstrategies = [\"greedy\"]".parse::<BatchConfig>(),
            Err(Error::Config(_))
        ));
        assert!(matches!(
            "mazes = [\"a.txt\"]\nfiles = []".parse::<BatchConfig>(),
            Err(Error::Config(_))
        ));
        assert!(matches!(
            "mazes = [\"a.txt\"]\nweights = [-1.0]".parse::<BatchConfig>(),
            Err(Error::InvalidWeight(_))
        ));
    }

    #[test]
    fn test_check_weight() {
        assert_eq!(check_weight(0.0).unwrap(), 0.0);
        assert_eq!(check_weight(2.5).unwrap(), 2.5);
        for weight in [-1.0, f64::NAN, f64::INFINITY] {
            assert!(matches!(check_weight(weight), Err(Error::InvalidWeight(_))));
        }
    }

    #[test]
    fn test_run_batch_rejects_bad_weights() {
        let mut config = BatchConfig::new(vec!["a.txt".into()]);
        config.weights = vec![1.0, -1.0];
        assert!(matches!(run_batch(&config), Err(Error::InvalidWeight(w)) if w == -1.0));

        config.weights = vec![f64::NAN];
        assert!(matches!(run_batch(&config), Err(Error::InvalidWeight(_))));
    }

    #[test]
    fn test_image_name() {
        let maze = Path::new("labs/biglab1.txt");

        assert_eq!(
            image_name(Strategy::DepthFirst, 1.0, maze),
            "depth-first-biglab1.png"
        );
        assert_eq!(
            image_name(Strategy::AStar, 1.0, maze),
            "a-star-w1-biglab1.png"
        );
        assert_eq!(
            image_name(Strategy::AStar, 2.5, maze),
            "a-star-w2.5-biglab1.png"
        );
    }

    #[test]
    fn test_run_batch() {
        let dir = scratch_dir("batch");
        let good = dir.join("good.txt");
        let walled = dir.join("walled.txt");
        let broken = dir.join("broken.txt");
        fs::write(&good, "A  \n   \n  B\n").unwrap();
        fs::write(&walled, "A#\n##\n B\n").unwrap();
        fs::write(&broken, "A  \n   \n   \n").unwrap();

        let mut config = BatchConfig::new(vec![
            good.clone(),
            broken.clone(),
            dir.join("missing.txt"),
            walled.clone(),
        ]);
        config.weights = vec![1.0, 3.0];
        config.output_dir = Some(dir.join("images"));

        let reports = run_batch(&config).unwrap();

        assert_eq!(reports.len(), 4);
        assert_eq!(reports[0].maze, good);
        assert!(reports[0].error.is_none());
        assert_eq!(reports[0].runs.len(), 4);
        for run in &reports[0].runs {
            match &run.outcome {
                RunOutcome::Solved {
                    total_cost, image, ..
                } => {
                    assert_eq!(*total_cost, 4);
                    assert!(image.as_ref().unwrap().exists());
                }
                other => panic!("unexpected {:?}", other),
            }
        }
        assert!(dir.join("images/a-star-w3-good.png").exists());

        // a broken file is reported without stopping the rest
        assert!(reports[1].error.as_ref().unwrap().contains("goal"));
        assert!(reports[1].runs.is_empty());
        assert!(reports[2].error.is_some());

        assert_eq!(reports[3].runs.len(), 4);
        assert!(reports[3]
            .runs
            .iter()
            .all(|run| run.outcome == RunOutcome::NoSolution { explored_count: 1 }));

        let _ = fs::remove_dir_all(&dir);
    }

    #[test]
    fn test_report_json() {
        let report = RunReport {
            strategy: Strategy::AStar,
            weight: 2.0,
            elapsed_secs: 0.5,
            outcome: RunOutcome::NoSolution { explored_count: 7 },
        };

        assert_eq!(
            serde_json::to_value(&report).unwrap(),
            serde_json::json!({
                "strategy": "a-star",
                "weight": 2.0,
                "elapsed_secs": 0.5,
                "status": "no-solution",
                "explored_count": 7,
            })
        );
    }
}
