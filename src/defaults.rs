// PARTITIONING SCHEME
// "h" for Hirshfeld, "hi" for iterative Hirshfeld
pub const SCHEME: &str = "h";
// config file
pub const CONFIG_FILE_NAME: &str = "denspart.toml";

// DENSITIES
// lower bound of the pro-atom and pro-molecule densities
pub const MIN_DENS: f64 = 1.0e-100;
// the derivative of the log density is set to zero below this density
pub const LOG_DERIV_MIN_DENS: f64 = 1.0e-10;
// pro-charges closer than this value to an integer are treated as integer charges
pub const INTEGER_CHARGE_TOL: f64 = 1.0e-6;

// HIRSHFELD-I ITERATION
// stop the iterative Hirshfeld calculation after maxiter iterations
pub const HI_MAX_ITER: usize = 100;
// convergence threshold for the max. change of the atomic charges
pub const HI_CHARGE_CONV: f64 = 1.0e-6;
// "fail" or "warn" if the iterations do not converge
pub const HI_POLICY: &str = "fail";
