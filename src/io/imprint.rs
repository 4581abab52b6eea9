use log::info;

pub fn write_header() {
    info!("{: ^80}", "-----------------");
    info!("{: ^80}", "DENSPART");
    info!("{: ^80}", "-----------------");
    let mut version_string: String = "version: ".to_owned();
    version_string.push_str(env!("CARGO_PKG_VERSION"));
    info!("{: ^80}", version_string);
    info!("{: ^80}", "");
    info!("{: ^80}", "::::::::::::::::::::::::::::::::::::::::::");
    info!("{: ^80}", "::  Density-based atoms-in-molecules    ::");
    info!("{: ^80}", "::         stockholder partitioning     ::");
    info!("{: ^80}", "::::::::::::::::::::::::::::::::::::::::::");
    info!("{: ^80}", "");
}
