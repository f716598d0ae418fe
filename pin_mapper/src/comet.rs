//! COMET board and its daughter board: Pathfinder-facing connector pins to FPGA pins.

use crate::config::MappingConfig;
use anyhow::{Context, Result};
use ecad_file_format::Netlist;
use pin_map_core::{
    NetFilter, OverrideTable, PinMap, build_bijection, build_pair_map, expand_instances,
};

/// `J1`/`J2` pin to FPGA pin, for one COMET board.
///
/// Signals leave the COMET through `J4`/`J6`, loop through the daughter board and come back on
/// the connector they left through before reaching the FPGA. On the daughter board they may cross
/// from one connector to the other.
pub fn comet_connectors_to_fpga(
    comet: &Netlist,
    comet_db: &Netlist,
    config: &MappingConfig,
    overrides: &OverrideTable,
) -> Result<PinMap> {
    let strip = config.strip_token.as_str();
    let cfg = &config.comet;
    let groups = NetFilter::from_config(&cfg.filter)?.apply(comet);

    let mut to_intermediate = Vec::new();
    let mut intermediate_to_fpga = Vec::new();
    for connector in &cfg.intermediate_connectors {
        to_intermediate.push(build_bijection(&groups, &cfg.source_connector, connector, strip)?);
        intermediate_to_fpga.push(build_bijection(&groups, connector, &cfg.fpga, strip)?);
    }
    let source_to_intermediate =
        PinMap::merge_disjoint(to_intermediate).context("COMET source connector shards")?;
    let intermediate_to_fpga = overrides.apply(
        PinMap::merge_disjoint(intermediate_to_fpga).context("COMET FPGA shards")?,
    );

    let connectors_to_intermediate = match &cfg.sibling {
        Some(sibling) => {
            let derived = sibling.derive_sibling_map(&source_to_intermediate)?;
            PinMap::merge_disjoint([source_to_intermediate, derived])
                .context("COMET sibling connector")?
        }
        None => source_to_intermediate,
    };

    let db_groups = NetFilter::from_config(&config.comet_db.filter)?.apply(comet_db);
    let db_pairs = build_pair_map(&db_groups)?;
    Ok(connectors_to_intermediate.compose_loopback(
        &db_pairs,
        &intermediate_to_fpga,
        &config.comet_db.mating,
        ["COMET -> COMET DB", "COMET DB -> COMET FPGA"],
    )?)
}

/// Loads both COMET netlists and the override table, then resolves
/// [`comet_connectors_to_fpga`].
pub fn load_comet_connectors_to_fpga(config: &MappingConfig) -> Result<PinMap> {
    let comet = config.load_netlist(&config.comet.netlist)?;
    let comet_db = config.load_netlist(&config.comet_db.netlist)?;
    let overrides = config.comet_overrides()?;
    comet_connectors_to_fpga(&comet, &comet_db, config, &overrides)
}

/// Same map for every COMET board plugged into the Pathfinder, keyed by the Pathfinder's
/// COMET connector designators (`COMET_A_J1`, ...).
pub fn comet_instances_to_fpga(connectors_to_fpga: &PinMap, config: &MappingConfig) -> PinMap {
    expand_instances(connectors_to_fpga, &config.path_finder.instance_prefixes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tests::{comet_map, load_test_config, pin};
    use pin_map_core::MappingError;
    use std::path::Path;

    #[test]
    fn resolves_through_daughter_board() {
        let (config, boards) = load_test_config();
        let overrides = config.comet_overrides().unwrap();
        let map =
            comet_connectors_to_fpga(&boards.comet, &boards.comet_db, &config, &overrides).unwrap();
        assert_eq!(map.len(), 4);
        assert_eq!(map.get(&pin("J1", "3")), Some(&pin("IC3", "40")));
        // J6-31 only reaches the FPGA through the override table
        assert_eq!(map.get(&pin("J1", "5")), Some(&pin("IC3", "112")));
        assert_eq!(map.get(&pin("J2", "1")), Some(&pin("IC3", "40")));
        assert_eq!(map.get(&pin("J2", "3")), Some(&pin("IC3", "112")));
    }

    #[test]
    fn missing_override_breaks_the_chain() {
        let (config, boards) = load_test_config();
        let err = comet_connectors_to_fpga(
            &boards.comet,
            &boards.comet_db,
            &config,
            &OverrideTable::new(),
        )
        .unwrap_err();
        match err.downcast_ref::<MappingError>() {
            Some(MappingError::MissingIntermediate { key, missing, .. }) => {
                assert_eq!(key, &pin("J1", "5"));
                assert_eq!(missing, &pin("J6", "31"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn daughter_board_may_cross_connectors() {
        let (config, boards) = load_test_config();
        let cross_db = config
            .load_netlist(Path::new("comet_db_cross.csv"))
            .unwrap();
        let overrides = config.comet_overrides().unwrap();
        let map = comet_connectors_to_fpga(&boards.comet, &cross_db, &config, &overrides).unwrap();
        // J4-5 enters the board on J4-6, leaves on J6-20 and comes back on J4-21
        assert_eq!(map.get(&pin("J1", "3")), Some(&pin("IC3", "40")));
        assert_eq!(map.get(&pin("J1", "5")), Some(&pin("IC3", "112")));
        assert_eq!(map.get(&pin("J2", "1")), Some(&pin("IC3", "40")));
        assert_eq!(map.get(&pin("J2", "3")), Some(&pin("IC3", "112")));
    }

    #[test]
    fn loads_boards_from_config() {
        let (config, boards) = load_test_config();
        assert_eq!(
            load_comet_connectors_to_fpga(&config).unwrap(),
            comet_map(&config, &boards)
        );
    }

    #[test]
    fn instances_share_fpga_pins() {
        let (config, boards) = load_test_config();
        let map = comet_map(&config, &boards);
        let instances = comet_instances_to_fpga(&map, &config);
        assert_eq!(instances.len(), 8);
        assert_eq!(
            instances.get(&pin("COMET_A_J1", "3")),
            instances.get(&pin("COMET_B_J1", "3"))
        );
    }
}
