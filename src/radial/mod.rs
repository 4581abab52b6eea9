mod spline;
mod transform;

pub use spline::CubicSpline;
pub use transform::RadialTransform;
