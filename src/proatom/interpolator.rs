use crate::defaults::{LOG_DERIV_MIN_DENS, MIN_DENS};
use crate::error::PartitionError;
use crate::radial::{CubicSpline, RadialTransform};
use ndarray::prelude::*;

/// Interpolation of a spherical atomic density.
///
/// The radial density profile is splined in log-space, so that the interpolated density
/// is positive everywhere and the exponential decay of the density at large distances
/// is represented well by a piecewise cubic function.
#[derive(Debug, Clone)]
pub struct AtomInterpolator {
    spline: CubicSpline,
    min_dens: f64,
}

impl AtomInterpolator {
    /// Create the interpolator with the default lower bound of the density.
    pub fn new(
        rtransform: RadialTransform,
        dens: ArrayView1<f64>,
        deriv: Option<ArrayView1<f64>>,
    ) -> Result<Self, PartitionError> {
        Self::with_min_dens(rtransform, dens, deriv, MIN_DENS)
    }

    /// Create the interpolator from the radial density `dens` and optionally its radial
    /// derivative `deriv`, both given at the nodes of `rtransform`. Density values below
    /// `min_dens` are raised to `min_dens` before the logarithm is taken.
    pub fn with_min_dens(
        rtransform: RadialTransform,
        dens: ArrayView1<f64>,
        deriv: Option<ArrayView1<f64>>,
        min_dens: f64,
    ) -> Result<Self, PartitionError> {
        if !(min_dens > 0.0) || !min_dens.is_finite() {
            return Err(PartitionError::InvalidProfile(format!(
                "min_dens has to be a positive number, got {}",
                min_dens
            )));
        }
        if dens.iter().any(|x| x.is_nan()) {
            return Err(PartitionError::InvalidProfile(String::from(
                "the radial density contains NaN values",
            )));
        }
        let log_dens: Array1<f64> = dens.mapv(|x| x.max(min_dens).ln());
        let log_deriv: Option<Array1<f64>> = deriv.map(|d| log_derivative(dens, d));
        let spline: CubicSpline = CubicSpline::new(
            log_dens.view(),
            log_deriv.as_ref().map(|d| d.view()),
            rtransform,
        )?;
        Ok(Self { spline, min_dens })
    }

    pub fn min_dens(&self) -> f64 {
        self.min_dens
    }

    pub fn rtransform(&self) -> &RadialTransform {
        self.spline.rtransform()
    }

    /// Density at the radial distance `r` from the nucleus. Beyond the radial grid the
    /// density is `min_dens`.
    pub fn eval_radial(&self, r: f64) -> f64 {
        self.spline
            .eval(r)
            .unwrap_or_else(|| self.min_dens.ln())
            .exp()
    }

    /// Evaluate the density of an atom located at `center` on the Cartesian `points`
    /// (shape (n, 3)).
    ///
    /// Every returned value is positive, otherwise `PartitionError::NonPositiveDensity`
    /// is returned.
    pub fn evaluate(
        &self,
        center: ArrayView1<f64>,
        points: ArrayView2<f64>,
    ) -> Result<Array1<f64>, PartitionError> {
        let output: Array1<f64> = points
            .outer_iter()
            .map(|point| {
                let r: f64 = point
                    .iter()
                    .zip(center.iter())
                    .map(|(x, c)| (x - c).powi(2))
                    .sum::<f64>()
                    .sqrt();
                self.eval_radial(r)
            })
            .collect();
        let n_bad: usize = output.iter().filter(|x| !(**x > 0.0)).count();
        if n_bad > 0 {
            return Err(PartitionError::NonPositiveDensity {
                context: String::from("interpolated atomic density"),
                count: n_bad,
            });
        }
        Ok(output)
    }
}

/// d(log rho)/dr = (d rho/dr) / rho. Near-zero densities give meaningless derivatives,
/// these are set to zero.
fn log_derivative(dens: ArrayView1<f64>, deriv: ArrayView1<f64>) -> Array1<f64> {
    let mut log_deriv: Array1<f64> = Array1::zeros(dens.len());
    for ((ld, rho), d) in log_deriv.iter_mut().zip(dens.iter()).zip(deriv.iter()) {
        if *rho > LOG_DERIV_MIN_DENS {
            *ld = d / rho;
        }
    }
    log_deriv
}
