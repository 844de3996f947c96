//! Numerical and physical parameters for a simulation
//!
//! `Parameters` holds runtime settings:
//! - gravitational constant and opening-angle threshold (`grav`, `theta`),
//! - subdivision limit and minimum interaction distance,
//! - whether per-body forces are evaluated in parallel

use crate::error::{Result, SimError};

/// Default limit on how many times the root cuboid may be halved.
pub const DEFAULT_MAX_DEPTH: usize = 48;

#[derive(Debug, Clone, PartialEq)]
pub struct Parameters {
    pub grav: f64, // gravitational constant
    pub theta: f64, // opening-angle threshold
    pub max_depth: usize, // subdivision limit
    pub min_distance: f64, // r <= this is a degenerate interaction
    pub parallel: bool, // rayon over bodies after aggregation
}

impl Parameters {
    pub fn new(grav: f64, theta: f64) -> Self {
        Self {
            grav,
            theta,
            max_depth: DEFAULT_MAX_DEPTH,
            min_distance: 0.0,
            parallel: false,
        }
    }

    pub fn validate(&self) -> Result<()> {
        if !self.grav.is_finite() {
            return Err(SimError::InvalidParameter(format!("grav must be finite, got {}", self.grav)));
        }
        if !(self.theta >= 0.0) {
            return Err(SimError::InvalidParameter(format!("theta must be >= 0, got {}", self.theta)));
        }
        if self.max_depth == 0 {
            return Err(SimError::InvalidParameter("max_depth must be > 0".to_string()));
        }
        if !(self.min_distance >= 0.0) {
            return Err(SimError::InvalidParameter(format!(
                "min_distance must be >= 0, got {}",
                self.min_distance
            )));
        }
        Ok(())
    }
}
