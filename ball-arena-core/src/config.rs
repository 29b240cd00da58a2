use cgmath::vec2;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::Vec2;

/// How the continuous test searches a step's displacement for the first contact with a wall.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SweepStrategy {
    /// Closed-form time of impact against the capsule around the segment.
    Exact,

    /// Evaluate `samples` equally spaced fractions of the displacement, including both ends, and
    /// keep the closest one.
    Sampled { samples: usize },
}

impl Default for SweepStrategy {
    fn default() -> Self {
        SweepStrategy::Exact
    }
}

/// Which wall wins when several report a contact within the same sub-step.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContactOrder {
    /// The first wall in iteration order reporting either a swept or an overlap contact.
    FirstHit,

    /// The smallest swept time of impact over all walls, then the first overlap if nothing was
    /// swept.
    Earliest,
}

impl Default for ContactOrder {
    fn default() -> Self {
        ContactOrder::Earliest
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimConfig {
    /// The arena spans `[0, arena_size.x] x [0, arena_size.y]`.
    pub arena_size: Vec2,
    /// Seconds advanced by one `Simulation::step`.
    pub time_step: f32,
    pub max_substeps: u32,
    pub sweep: SweepStrategy,
    pub contact_order: ContactOrder,
    /// Whether the movement system also advances entities that carry a `CircleCollider`. The
    /// collision system sub-steps those on its own.
    pub integrate_colliders: bool,
    /// Velocities with a squared magnitude below this are snapped to zero by the movement system.
    pub rest_speed_squared: f32,
}

impl Default for SimConfig {
    fn default() -> Self {
        SimConfig {
            arena_size: vec2(100.0, 100.0),
            time_step: 1.0 / 60.0,
            max_substeps: 20,
            sweep: SweepStrategy::Exact,
            contact_order: ContactOrder::Earliest,
            integrate_colliders: false,
            rest_speed_squared: 0.01,
        }
    }
}

impl SimConfig {
    /// The desktop pipeline: an 11-sample sweep, first-hit contact order, and balls integrated by
    /// both systems.
    pub fn reference() -> SimConfig {
        SimConfig {
            sweep: SweepStrategy::Sampled { samples: 11 },
            contact_order: ContactOrder::FirstHit,
            integrate_colliders: true,
            ..SimConfig::default()
        }
    }

    pub fn from_json(json: &str) -> Result<SimConfig> {
        let config: SimConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        let Vec2 { x, y } = self.arena_size;
        if !(x.is_finite() && y.is_finite() && x > 0.0 && y > 0.0) {
            return Err(Error::InvalidArena(x, y));
        }
        if !(self.time_step.is_finite() && self.time_step > 0.0) {
            return Err(Error::InvalidTimeStep(self.time_step));
        }
        if self.max_substeps == 0 {
            return Err(Error::InvalidSubsteps);
        }
        if let SweepStrategy::Sampled { samples } = self.sweep {
            if samples < 2 {
                return Err(Error::InvalidSampleCount(samples));
            }
        }
        Ok(())
    }
}
