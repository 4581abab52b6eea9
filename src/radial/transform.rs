use crate::error::PartitionError;
use ndarray::prelude::*;
use serde::{Deserialize, Serialize};

/// Monotonic mapping between the index coordinate `t` of a radial grid and the
/// radial distance `r`. The nodes of the grid are located at `t = 0, 1, ..., npoint - 1`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum RadialTransform {
    /// r(t) = rmin + alpha * t
    Linear { rmin: f64, rmax: f64, npoint: usize },
    /// r(t) = rmin * exp(alpha * t)
    Exp { rmin: f64, rmax: f64, npoint: usize },
    /// r(t) = rmin * (t + 1)^power
    Power { rmin: f64, rmax: f64, npoint: usize },
}

impl RadialTransform {
    pub fn linear(rmin: f64, rmax: f64, npoint: usize) -> Result<Self, PartitionError> {
        check_bounds(rmin, rmax, npoint)?;
        if rmin < 0.0 {
            return Err(PartitionError::InvalidTransform(format!(
                "rmin of a linear transform cannot be negative, got {}",
                rmin
            )));
        }
        Ok(RadialTransform::Linear { rmin, rmax, npoint })
    }

    pub fn exp(rmin: f64, rmax: f64, npoint: usize) -> Result<Self, PartitionError> {
        check_bounds(rmin, rmax, npoint)?;
        check_positive_rmin(rmin)?;
        Ok(RadialTransform::Exp { rmin, rmax, npoint })
    }

    pub fn power(rmin: f64, rmax: f64, npoint: usize) -> Result<Self, PartitionError> {
        check_bounds(rmin, rmax, npoint)?;
        check_positive_rmin(rmin)?;
        Ok(RadialTransform::Power { rmin, rmax, npoint })
    }

    /// Number of nodes of the radial grid.
    pub fn npoint(&self) -> usize {
        match *self {
            RadialTransform::Linear { npoint, .. }
            | RadialTransform::Exp { npoint, .. }
            | RadialTransform::Power { npoint, .. } => npoint,
        }
    }

    pub fn rmin(&self) -> f64 {
        match *self {
            RadialTransform::Linear { rmin, .. }
            | RadialTransform::Exp { rmin, .. }
            | RadialTransform::Power { rmin, .. } => rmin,
        }
    }

    pub fn rmax(&self) -> f64 {
        match *self {
            RadialTransform::Linear { rmax, .. }
            | RadialTransform::Exp { rmax, .. }
            | RadialTransform::Power { rmax, .. } => rmax,
        }
    }

    fn alpha(&self) -> f64 {
        match *self {
            RadialTransform::Linear { rmin, rmax, npoint } => (rmax - rmin) / (npoint - 1) as f64,
            RadialTransform::Exp { rmin, rmax, npoint } => (rmax / rmin).ln() / (npoint - 1) as f64,
            RadialTransform::Power { rmin, rmax, npoint } => {
                (rmax.ln() - rmin.ln()) / (npoint as f64).ln()
            }
        }
    }

    /// Radial distance at the index coordinate `t`.
    pub fn radius(&self, t: f64) -> f64 {
        let alpha: f64 = self.alpha();
        match *self {
            RadialTransform::Linear { rmin, .. } => rmin + alpha * t,
            RadialTransform::Exp { rmin, .. } => rmin * (alpha * t).exp(),
            RadialTransform::Power { rmin, .. } => rmin * (t + 1.0).powf(alpha),
        }
    }

    /// Derivative dr/dt at the index coordinate `t`.
    pub fn deriv(&self, t: f64) -> f64 {
        let alpha: f64 = self.alpha();
        match *self {
            RadialTransform::Linear { .. } => alpha,
            RadialTransform::Exp { rmin, .. } => rmin * alpha * (alpha * t).exp(),
            RadialTransform::Power { rmin, .. } => rmin * alpha * (t + 1.0).powf(alpha - 1.0),
        }
    }

    /// Index coordinate of the radial distance `r`. Distances below `rmin` map to
    /// negative `t` (or NaN/-inf for the logarithmic transforms at r = 0).
    pub fn inverse(&self, r: f64) -> f64 {
        let alpha: f64 = self.alpha();
        match *self {
            RadialTransform::Linear { rmin, .. } => (r - rmin) / alpha,
            RadialTransform::Exp { rmin, .. } => (r / rmin).ln() / alpha,
            RadialTransform::Power { rmin, .. } => (r / rmin).powf(1.0 / alpha) - 1.0,
        }
    }

    /// Radial distances of all nodes.
    pub fn radii(&self) -> Array1<f64> {
        (0..self.npoint()).map(|i| self.radius(i as f64)).collect()
    }

    /// Derivatives dr/dt at all nodes.
    pub fn derivs(&self) -> Array1<f64> {
        (0..self.npoint()).map(|i| self.deriv(i as f64)).collect()
    }
}

fn check_bounds(rmin: f64, rmax: f64, npoint: usize) -> Result<(), PartitionError> {
    if npoint < 2 {
        return Err(PartitionError::InvalidTransform(format!(
            "a radial grid needs at least two points, got {}",
            npoint
        )));
    }
    if !(rmin.is_finite() && rmax.is_finite()) || rmin >= rmax {
        return Err(PartitionError::InvalidTransform(format!(
            "rmin ({}) has to be smaller than rmax ({})",
            rmin, rmax
        )));
    }
    Ok(())
}

fn check_positive_rmin(rmin: f64) -> Result<(), PartitionError> {
    if rmin <= 0.0 {
        return Err(PartitionError::InvalidTransform(format!(
            "rmin has to be positive, got {}",
            rmin
        )));
    }
    Ok(())
}
