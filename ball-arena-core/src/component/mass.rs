use std::convert::TryFrom;

use crate::error::{Error, Result};

/// A positive mass with its reciprocal cached for impulse math.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Mass {
    mass: f32,
    inv_mass: f32,
}

impl Mass {
    pub fn new(mass: f32) -> Result<Mass> {
        if mass.is_finite() && mass > 0.0 {
            Ok(Mass {
                mass,
                inv_mass: 1.0 / mass,
            })
        } else {
            Err(Error::InvalidMass(mass))
        }
    }

    pub fn mass(&self) -> f32 {
        self.mass
    }

    pub fn inv_mass(&self) -> f32 {
        self.inv_mass
    }
}

impl Default for Mass {
    fn default() -> Self {
        Mass {
            mass: 1.0,
            inv_mass: 1.0,
        }
    }
}

impl TryFrom<f32> for Mass {
    type Error = Error;

    fn try_from(mass: f32) -> Result<Mass> {
        Mass::new(mass)
    }
}
