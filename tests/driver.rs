mod common;

use common::*;
use denspart::{partition, Configuration, MolecularGrid, MolecularSystem, PartitionError, ProAtomDB};

#[test]
fn hirshfeld_job() {
    init_logger();
    let grid: MolecularGrid = water_grid();
    let system: MolecularSystem = water(&grid, POLARIZED_CHARGES);
    let proatomdb: ProAtomDB = proatomdb();
    let config: Configuration = Configuration::default();
    let result = partition(&config, &system, &grid, &proatomdb).unwrap();

    assert_eq!(result.scheme, "h");
    assert_eq!(result.iterations, 1);
    assert!(result.converged);
    assert_eq!(result.charges.len(), 3);
    assert_eq!(result.weights.dim(), (3, 45 * 45 * 45));
    assert!(result.charges[0] < 0.0 && result.charges[0] > POLARIZED_CHARGES[0]);
}

#[test]
fn hirshfeld_i_job() {
    init_logger();
    let grid: MolecularGrid = water_grid();
    let system: MolecularSystem = water(&grid, POLARIZED_CHARGES);
    let proatomdb: ProAtomDB = proatomdb();
    let config: Configuration = Configuration::from_str(
        r#"
        scheme = "hi"

        [hi]
        max_iterations = 200
        charge_conv = 1e-6
        "#,
    )
    .unwrap();
    let result = partition(&config, &system, &grid, &proatomdb).unwrap();

    assert_eq!(result.scheme, "hi");
    assert!(result.converged);
    assert!(result.iterations > 1);
    for (q, q_ref) in result.charges.iter().zip(POLARIZED_CHARGES.iter()) {
        assert!((q - q_ref).abs() < 1e-3);
    }
    for (q, (z, p)) in result
        .charges
        .iter()
        .zip([8.0, 1.0, 1.0].iter().zip(result.populations.iter()))
    {
        assert!((q - (z - p)).abs() < 1e-12);
    }
}

#[test]
fn hirshfeld_i_job_with_warning() {
    init_logger();
    let grid: MolecularGrid = water_grid();
    let system: MolecularSystem = water(&grid, POLARIZED_CHARGES);
    let proatomdb: ProAtomDB = proatomdb();
    let config: Configuration = Configuration::from_str(
        r#"
        scheme = "hi"

        [hi]
        max_iterations = 3
        policy = "warn"
        "#,
    )
    .unwrap();
    let result = partition(&config, &system, &grid, &proatomdb).unwrap();

    assert!(!result.converged);
    assert_eq!(result.iterations, 3);
}

#[test]
fn unknown_scheme() {
    let grid: MolecularGrid = water_grid();
    let system: MolecularSystem = water(&grid, [0.0, 0.0, 0.0]);
    let proatomdb: ProAtomDB = proatomdb();
    let config: Configuration = Configuration::from_str("scheme = \"mbis\"").unwrap();
    let result = partition(&config, &system, &grid, &proatomdb);
    assert!(matches!(result, Err(PartitionError::UnknownScheme(ref s)) if s == "mbis"));
}
