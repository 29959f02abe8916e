use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("frontier is empty")]
    EmptyFrontier,
    #[error("no solution after exploring {explored} states")]
    NoSolution { explored: usize },
    #[error("malformed maze: {0}")]
    MalformedMaze(String),
    #[error("invalid strategy: {0}")]
    InvalidStrategy(String),
    #[error("invalid A* weight {0}, expected a finite non-negative number")]
    InvalidWeight(f64),
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("image error: {0}")]
    Image(#[from] image::ImageError),
    #[error("invalid batch configuration: {0}")]
    Config(#[from] toml::de::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
