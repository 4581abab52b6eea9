use crate::partition::IterationStatus;
use crate::utils::Timer;
use log::{debug, info};
use ndarray::ArrayView1;

pub fn print_hi_init(max_iter: usize, tolerance: f64) {
    info!("{:^80}", "");
    info!("{: ^80}", "Hirshfeld-I Partitioning");
    info!("{:-^80}", "");
    info!("{: <25} {:.2e}", "convergence criterium:", tolerance);
    info!("{: <25} {}", "max. iterations:", max_iter);
    info!("{:^80}", "");
    info!("{: <5} {: >24}", "Iter.", "max. charge change");
    info!("{:-^30} ", "");
}

pub fn print_hi_iteration(iter: usize, delta: f64, charges: ArrayView1<f64>) {
    info!("{: >5} {:>24.8e}", iter + 1, delta);
    debug!("{: >5} charges: {}", "", charges);
}

pub fn print_hi_end(timer: Timer, status: &IterationStatus, charges: ArrayView1<f64>) {
    info!("{:-^30} ", "");
    match status {
        IterationStatus::Converged { iterations } => {
            info!("{: ^80}", format!("Hirshfeld-I converged in {} iterations", iterations))
        }
        IterationStatus::NotConverged { iterations, delta } => info!(
            "{: ^80}",
            format!(
                "Hirshfeld-I NOT converged after {} iterations ({:.2e})",
                iterations, delta
            )
        ),
        _ => {}
    }
    info!("{:^80} ", "");
    info!("{: <5} {: >16}", "Atom", "Charge");
    for (i, q) in charges.iter().enumerate() {
        info!("{: >5} {:>16.8}", i + 1, q);
    }
    info!("{:-<80} ", "");
    info!("{}", timer);
}
