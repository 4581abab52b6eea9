#![allow(dead_code)]

use denspart::{AtomInterpolator, MolecularGrid, MolecularSystem, ProAtomDB, ProAtomRecord, RadialTransform};
use ndarray::prelude::*;
use std::f64::consts::PI;

pub const OXYGEN: u8 = 8;
pub const HYDROGEN: u8 = 1;

/// Charges of the pro-atoms from which the polarized water density is assembled.
pub const POLARIZED_CHARGES: [f64; 3] = [-0.6, 0.3, 0.3];

/// Reference charges of the pro-atom database.
pub fn reference_charges(number: u8) -> Vec<i32> {
    match number {
        OXYGEN => vec![-2, -1, 0, 1, 2],
        HYDROGEN => vec![-1, 0],
        _ => vec![],
    }
}

/// Gaussian exponent of the model atoms, anions are more diffuse than cations.
pub fn exponent(number: u8, charge: i32) -> f64 {
    let a0: f64 = if number == HYDROGEN { 1.0 } else { 1.8 };
    a0 * (1.0 + 0.2 * charge as f64)
}

/// Normalized Gaussian density with `number - charge` electrons at the squared distance `r2`.
pub fn model_density(number: u8, charge: i32, r2: f64) -> f64 {
    let a: f64 = exponent(number, charge);
    (number as i32 - charge) as f64 * (a / PI).powf(1.5) * (-a * r2).exp()
}

/// Model density of an atom with a fractional charge, interpolated linearly between the
/// bracketing integer charges. A bare nucleus as upper bound does not contribute.
pub fn fractional_model_density(number: u8, charge: f64, r2: f64) -> f64 {
    if (charge - charge.round()).abs() < 1e-6 {
        return model_density(number, charge.round() as i32, r2);
    }
    let (lower, upper): (f64, f64) = (charge.floor(), charge.ceil());
    let mut dens: f64 = (upper - charge) * model_density(number, lower as i32, r2);
    if reference_charges(number).contains(&(upper as i32)) {
        dens += (charge - lower) * model_density(number, upper as i32, r2);
    }
    dens
}

pub fn radial_transform() -> RadialTransform {
    RadialTransform::exp(1.0e-3, 20.0, 200).unwrap()
}

pub fn proatom_record(number: u8, charge: i32) -> ProAtomRecord {
    let rtf: RadialTransform = radial_transform();
    let radii: Array1<f64> = rtf.radii();
    let a: f64 = exponent(number, charge);
    let dens: Array1<f64> = radii.mapv(|r| model_density(number, charge, r * r));
    let deriv: Array1<f64> = &dens * &radii.mapv(|r| -2.0 * a * r);
    let inter: AtomInterpolator = AtomInterpolator::new(rtf, dens.view(), Some(deriv.view())).unwrap();
    ProAtomRecord::new(inter, number, charge)
}

pub fn proatomdb() -> ProAtomDB {
    let mut records: Vec<ProAtomRecord> = Vec::new();
    for number in [HYDROGEN, OXYGEN].iter() {
        for charge in reference_charges(*number) {
            records.push(proatom_record(*number, charge));
        }
    }
    ProAtomDB::new(records)
}

pub fn water_coordinates() -> Array2<f64> {
    array![[0.0, 0.0, 0.22], [0.0, 1.43, -0.89], [0.0, -1.43, -0.89]]
}

pub fn water_numbers() -> Vec<u8> {
    vec![OXYGEN, HYDROGEN, HYDROGEN]
}

/// Uniform grid around the water molecule, symmetric under y -> -y.
pub fn water_grid() -> MolecularGrid {
    MolecularGrid::cubic([-6.6, -6.6, -6.6], 0.3, [45, 45, 45]).unwrap()
}

/// Density of the water molecule assembled from model atoms with the given charges.
pub fn water_density(grid: &MolecularGrid, charges: [f64; 3]) -> Array1<f64> {
    use denspart::Grid;
    let coordinates: Array2<f64> = water_coordinates();
    let numbers: Vec<u8> = water_numbers();
    grid.points()
        .outer_iter()
        .map(|p| {
            coordinates
                .outer_iter()
                .zip(numbers.iter())
                .zip(charges.iter())
                .map(|((c, z), q)| {
                    let d: Array1<f64> = &p - &c;
                    fractional_model_density(*z, *q, d.dot(&d))
                })
                .sum::<f64>()
        })
        .collect()
}

pub fn water(grid: &MolecularGrid, charges: [f64; 3]) -> MolecularSystem {
    MolecularSystem::all_electron(water_coordinates(), water_numbers(), water_density(grid, charges)).unwrap()
}

pub fn init_logger() {
    let _ = env_logger::builder().is_test(true).try_init();
}
