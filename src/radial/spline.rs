use crate::error::PartitionError;
use crate::radial::RadialTransform;
use ndarray::prelude::*;

/// Piecewise cubic Hermite spline on the nodes of a radial transform.
///
/// The spline is constructed in the index coordinate `t` of the transform, where the
/// nodes are equidistant, and is evaluated as a function of the radial distance `r`.
#[derive(Debug, Clone)]
pub struct CubicSpline {
    /// values at the nodes
    y: Array1<f64>,
    /// derivatives dy/dt at the nodes
    dt: Array1<f64>,
    rtransform: RadialTransform,
}

impl CubicSpline {
    /// Create the spline from the values `y` and optionally the derivatives `dy/dr` at
    /// the nodes of `rtransform`. If no derivatives are given, the derivatives of the
    /// natural cubic spline through `y` are used.
    pub fn new(
        y: ArrayView1<f64>,
        deriv: Option<ArrayView1<f64>>,
        rtransform: RadialTransform,
    ) -> Result<Self, PartitionError> {
        let npoint: usize = rtransform.npoint();
        if y.len() != npoint {
            return Err(PartitionError::ShapeMismatch {
                what: "spline values & radial transform",
                expected: npoint,
                found: y.len(),
            });
        }
        let dt: Array1<f64> = match deriv {
            Some(d) => {
                if d.len() != npoint {
                    return Err(PartitionError::ShapeMismatch {
                        what: "spline derivatives & radial transform",
                        expected: npoint,
                        found: d.len(),
                    });
                }
                // chain rule: dy/dt = dy/dr * dr/dt
                &d * &rtransform.derivs()
            }
            None => natural_spline_derivatives(y),
        };
        Ok(Self {
            y: y.to_owned(),
            dt,
            rtransform,
        })
    }

    pub fn rtransform(&self) -> &RadialTransform {
        &self.rtransform
    }

    /// Values of the spline at the nodes.
    pub fn values(&self) -> ArrayView1<f64> {
        self.y.view()
    }

    /// Derivatives dy/dt of the spline at the nodes.
    pub fn derivatives(&self) -> ArrayView1<f64> {
        self.dt.view()
    }

    /// Evaluate the spline at the radial distance `r`.
    ///
    /// Returns `None` beyond the last node. Below the first node the spline is continued
    /// linearly in `r` with the slope at the first node.
    pub fn eval(&self, r: f64) -> Option<f64> {
        let npoint: usize = self.y.len();
        let t_max: f64 = (npoint - 1) as f64;
        if r < self.rtransform.rmin() {
            let slope: f64 = self.dt[0] / self.rtransform.deriv(0.0);
            return Some(self.y[0] + slope * (r - self.rtransform.rmin()));
        }
        let t: f64 = self.rtransform.inverse(r);
        // the last node itself may map slightly beyond t_max
        if !(t <= t_max + 1.0e-8) {
            return None;
        }
        let t: f64 = t.max(0.0).min(t_max);
        // index of the left node of the interval
        let j: usize = (t.floor() as usize).min(npoint - 2);
        let u: f64 = t - j as f64;
        let u2: f64 = u * u;
        let u3: f64 = u2 * u;
        let h00: f64 = 2.0 * u3 - 3.0 * u2 + 1.0;
        let h10: f64 = u3 - 2.0 * u2 + u;
        let h01: f64 = -2.0 * u3 + 3.0 * u2;
        let h11: f64 = u3 - u2;
        Some(
            h00 * self.y[j] + h10 * self.dt[j] + h01 * self.y[j + 1] + h11 * self.dt[j + 1],
        )
    }
}

/// Node derivatives of the natural cubic spline on unit spaced nodes. The tridiagonal
/// system is solved with the Thomas algorithm.
fn natural_spline_derivatives(y: ArrayView1<f64>) -> Array1<f64> {
    let n: usize = y.len();
    let mut diag: Array1<f64> = Array1::from_elem(n, 4.0);
    let mut rhs: Array1<f64> = Array1::zeros(n);
    diag[0] = 2.0;
    diag[n - 1] = 2.0;
    rhs[0] = 3.0 * (y[1] - y[0]);
    rhs[n - 1] = 3.0 * (y[n - 1] - y[n - 2]);
    for i in 1..n - 1 {
        rhs[i] = 3.0 * (y[i + 1] - y[i - 1]);
    }
    // forward elimination, all off-diagonal elements are one
    for i in 1..n {
        let m: f64 = 1.0 / diag[i - 1];
        diag[i] -= m;
        rhs[i] -= m * rhs[i - 1];
    }
    // back substitution
    let mut d: Array1<f64> = Array1::zeros(n);
    d[n - 1] = rhs[n - 1] / diag[n - 1];
    for i in (0..n - 1).rev() {
        d[i] = (rhs[i] - d[i + 1]) / diag[i];
    }
    d
}
