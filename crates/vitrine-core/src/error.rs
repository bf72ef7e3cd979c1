use thiserror::Error;

use crate::motion::ValueId;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Invalid target {target} for animated value {value}")]
    InvalidTarget { value: ValueId, target: f64 },

    #[error("Unknown animated value {0}")]
    UnknownValue(ValueId),

    #[error("Invalid driver configuration: {0}")]
    InvalidDriver(String),

    #[error("Interpolator needs at least two breakpoints, got {0}")]
    TooFewBreakpoints(usize),

    #[error("Interpolator has {inputs} input breakpoints but {outputs} output values")]
    BreakpointMismatch { inputs: usize, outputs: usize },

    #[error("Interpolator breakpoints must be strictly increasing (violated at index {index})")]
    BreakpointsNotIncreasing { index: usize },

    #[error("Invalid color: {0}")]
    InvalidColor(String),

    #[error("Invalid layout: {0}")]
    InvalidLayout(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
