//! Core state types for the simulation.
//!
//! A `Body` is a sphere with a position, a radius and a density. Mass is
//! always derived from radius and density, never stored.

use std::f64::consts::PI;

use nalgebra::Vector3;

use crate::error::{Result, SimError};

pub type NVec3 = Vector3<f64>;

#[derive(Debug, Clone, PartialEq)]
pub struct Body {
    pub name: String, // label, not used by the physics
    pub x: NVec3, // position
    pub radius: f64, // sphere radius
    pub density: f64, // material density
}

impl Body {
    pub fn new(name: impl Into<String>, x: NVec3, radius: f64, density: f64) -> Self {
        Self {
            name: name.into(),
            x,
            radius,
            density,
        }
    }

    /// Mass of a uniform sphere: `(4/3) * pi * r^3 * density`.
    pub fn mass(&self) -> f64 {
        let volume = (4.0 / 3.0) * PI * self.radius.powi(3);
        volume * self.density
    }

    /// Move the body by `d`. There is no velocity state; the force computed
    /// for a tick is applied directly as a positional delta.
    pub fn apply_displacement(&mut self, d: NVec3) {
        self.x += d;
    }

    /// Reject bodies the tree cannot place or weigh.
    pub fn validate(&self) -> Result<()> {
        if !(self.x.x.is_finite() && self.x.y.is_finite() && self.x.z.is_finite()) {
            return Err(self.invalid("position is not finite"));
        }
        if !(self.radius.is_finite() && self.radius > 0.0) {
            return Err(self.invalid("radius must be finite and > 0"));
        }
        if !(self.density.is_finite() && self.density > 0.0) {
            return Err(self.invalid("density must be finite and > 0"));
        }
        Ok(())
    }

    fn invalid(&self, reason: &str) -> SimError {
        SimError::InvalidBody {
            name: self.name.clone(),
            reason: reason.to_string(),
        }
    }
}
