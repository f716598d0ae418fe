//! Pathfinder U.FL connectors -> COMET FPGA.

use crate::comet::comet_instances_to_fpga;
use crate::config::MappingConfig;
use anyhow::{Context, Result};
use ecad_file_format::{Netlist, Table};
use log::info;
use pin_map_core::{MappingError, NaturalOrder, NetFilter, PinMap, build_bijection};

/// U.FL connector pin to the Pathfinder COMET connector pin it is routed to.
pub fn ufl_to_comet_connectors(path_finder: &Netlist, config: &MappingConfig) -> Result<PinMap> {
    let pf = &config.path_finder;
    let groups = NetFilter::from_config(&pf.ufl_filter)?.apply(path_finder);
    let mut shards = Vec::new();
    for ufl in pf.ufl.designators() {
        for connector in &pf.comet_connectors {
            shards.push(build_bijection(
                &groups,
                &ufl.0,
                connector,
                &config.strip_token,
            )?);
        }
    }
    PinMap::merge_disjoint(shards).context("Pathfinder U.FL shards")
}

pub fn comet_path_finder_table(
    connectors_to_fpga: &PinMap,
    path_finder: &Netlist,
    config: &MappingConfig,
) -> Result<Table> {
    let instances_to_fpga = comet_instances_to_fpga(connectors_to_fpga, config);
    let ufl_to_comet = ufl_to_comet_connectors(path_finder, config)?;

    let mut rows = Vec::with_capacity(ufl_to_comet.len());
    for (ufl_pin, comet_pin) in &ufl_to_comet {
        let fpga_pin =
            instances_to_fpga
                .get(comet_pin)
                .ok_or_else(|| MappingError::MissingIntermediate {
                    stage: "Pathfinder U.FL -> COMET FPGA".into(),
                    key: ufl_pin.clone(),
                    missing: comet_pin.clone(),
                })?;
        rows.push(vec![
            fpga_pin.to_string(),
            comet_pin.to_string(),
            ufl_pin.to_string(),
        ]);
    }
    NaturalOrder::new(2, &config.outputs.comet_path_finder.sort_anchor)?.sort(&mut rows);

    Ok(Table::new(
        &[
            "COMET FPGA pin",
            "Pathfinder COMET connector",
            "Pathfinder U.FL connector",
        ],
        rows,
    ))
}

pub fn run(config: &MappingConfig, connectors_to_fpga: &PinMap) -> Result<()> {
    let path_finder = config.load_netlist(&config.path_finder.netlist)?;
    let table = comet_path_finder_table(connectors_to_fpga, &path_finder, config)?;

    let path = config.output_path(&config.outputs.comet_path_finder);
    table.write_csv(&path)?;
    info!("{}: {} rows", path.display(), table.rows.len());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tests::{comet_map, load_test_config, pin};

    #[test]
    fn ufl_connectors_reach_comet_connectors() {
        let (config, boards) = load_test_config();
        let map = ufl_to_comet_connectors(&boards.path_finder, &config).unwrap();
        assert_eq!(map.len(), 3);
        assert_eq!(map.get(&pin("J12", "1")), Some(&pin("COMET_B_J1", "3")));
        // JD10 is not a U.FL connector
        assert!(map.keys().all(|k| k.designator.0 != "JD10"));
    }

    #[test]
    fn table_is_sorted_by_ufl_connector() {
        let (config, boards) = load_test_config();
        let table =
            comet_path_finder_table(&comet_map(&config, &boards), &boards.path_finder, &config)
                .unwrap();
        assert_eq!(
            table.headers,
            vec![
                "COMET FPGA pin",
                "Pathfinder COMET connector",
                "Pathfinder U.FL connector"
            ]
        );
        assert_eq!(
            table.rows,
            vec![
                vec!["IC3-112", "COMET_A_J1-5", "J1-1"],
                vec!["IC3-40", "COMET_A_J2-1", "J3-1"],
                vec!["IC3-40", "COMET_B_J1-3", "J12-1"],
            ]
        );
    }

    #[test]
    fn run_writes_table() {
        let (mut config, boards) = load_test_config();
        let dir = tempfile::tempdir().unwrap();
        config.output_dir = dir.path().join("out");
        run(&config, &comet_map(&config, &boards)).unwrap();
        let written =
            std::fs::read_to_string(dir.path().join("out/CometPathFinderMapping.csv")).unwrap();
        assert_eq!(written.lines().count(), 4);
        assert!(written.starts_with("COMET FPGA pin,"));
    }
}
