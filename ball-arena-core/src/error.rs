use thiserror::Error;

use crate::scene::ObjectId;

#[derive(Debug, Error)]
pub enum Error {
    #[error("ball radius must be positive and finite, got {0}")]
    InvalidRadius(f32),

    #[error("ball mass must be positive and finite, got {0}")]
    InvalidMass(f32),

    #[error("arena size must be positive and finite, got ({0}, {1})")]
    InvalidArena(f32, f32),

    #[error("time step must be positive and finite, got {0}")]
    InvalidTimeStep(f32),

    #[error("max_substeps must be at least 1")]
    InvalidSubsteps,

    #[error("a sampled sweep needs at least 2 samples, got {0}")]
    InvalidSampleCount(usize),

    #[error("no object with id {0}")]
    UnknownObject(ObjectId),

    #[error("invalid config: {0}")]
    Config(#[from] serde_json::Error),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
