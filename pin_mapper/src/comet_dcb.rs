//! DCB data GBTx -> Pathfinder -> COMET FPGA.

use crate::comet::comet_instances_to_fpga;
use crate::config::{MappingConfig, OutputTable};
use anyhow::{Context, Result};
use ecad_file_format::{ComponentPin, NetName, Netlist, Table};
use log::info;
use pin_map_core::{MappingError, NaturalOrder, NetFilter, PinMap, build_bijection};
use std::collections::BTreeMap;

pub struct CometDcbTables {
    pub debug_comet: Table,
    pub debug_dcb_path_finder: Table,
    pub full: Table,
    pub short: Table,
}

/// GBTx pin to the Pathfinder COMET connector pin it ends up on.
pub fn dcb_to_path_finder(
    dcb: &Netlist,
    path_finder: &Netlist,
    config: &MappingConfig,
) -> Result<PinMap> {
    let strip = config.strip_token.as_str();
    let pf = &config.path_finder;
    let pf_groups = NetFilter::from_config(&pf.filter)?.apply(path_finder);
    let shards = pf
        .comet_connectors
        .iter()
        .map(|c| build_bijection(&pf_groups, &pf.connector, c, strip))
        .collect::<Result<Vec<_>, _>>()?;
    let pf_connector_to_comet =
        PinMap::merge_disjoint(shards).context("Pathfinder COMET connector shards")?;

    let dcb_groups = NetFilter::from_config(&config.dcb.filter)?.apply(dcb);
    let shards = config
        .dcb
        .gbtx
        .designators()
        .iter()
        .map(|u| build_bijection(&dcb_groups, &u.0, &config.dcb.connector, strip))
        .collect::<Result<Vec<_>, _>>()?;
    let gbtx_to_connector = PinMap::merge_disjoint(shards).context("DCB GBTx shards")?;

    Ok(gbtx_to_connector.compose_via(
        &pf_connector_to_comet,
        &config.dcb.mating,
        "DCB -> Pathfinder",
    )?)
}

/// DCB net name of every pin, keyed the way pin maps key it: designators without `strip_token`.
pub fn signal_names(dcb: &Netlist, strip_token: &str) -> BTreeMap<ComponentPin, NetName> {
    dcb.pin_net_names()
        .into_iter()
        .map(|(pin, net_name)| {
            let pin = ComponentPin {
                designator: pin.designator.strip_token(strip_token),
                pin_id: pin.pin_id,
            };
            (pin, net_name)
        })
        .collect()
}

/// Debug DCB -> Pathfinder rows and full rows, unsorted.
fn signal_rows(
    gbtx_to_comet: &PinMap,
    signal_names: &BTreeMap<ComponentPin, NetName>,
    instances_to_fpga: &PinMap,
) -> Result<(Vec<Vec<String>>, Vec<Vec<String>>)> {
    let mut debug_dcb_path_finder = Vec::new();
    let mut full = Vec::new();
    for (gbtx_pin, comet_pin) in gbtx_to_comet {
        let signal = signal_names
            .get(gbtx_pin)
            .ok_or_else(|| MappingError::MissingNetName(gbtx_pin.clone()))?;
        let fpga_pin =
            instances_to_fpga
                .get(comet_pin)
                .ok_or_else(|| MappingError::MissingIntermediate {
                    stage: "Pathfinder -> COMET FPGA".into(),
                    key: gbtx_pin.clone(),
                    missing: comet_pin.clone(),
                })?;
        debug_dcb_path_finder.push(vec![
            signal.to_string(),
            gbtx_pin.to_string(),
            comet_pin.to_string(),
        ]);
        full.push(vec![
            format!("{}-{fpga_pin}", comet_pin.designator),
            comet_pin.to_string(),
            gbtx_pin.to_string(),
            signal.to_string(),
        ]);
    }
    Ok((debug_dcb_path_finder, full))
}

pub fn comet_dcb_tables(
    connectors_to_fpga: &PinMap,
    path_finder: &Netlist,
    dcb: &Netlist,
    config: &MappingConfig,
) -> Result<CometDcbTables> {
    let outputs = &config.outputs;
    let instances_to_fpga = comet_instances_to_fpga(connectors_to_fpga, config);
    let gbtx_to_comet = dcb_to_path_finder(dcb, path_finder, config)?;
    let signal_names = signal_names(dcb, &config.strip_token);

    let mut debug_comet = connectors_to_fpga.rows();
    sort(&mut debug_comet, 0, &outputs.debug_comet)?;

    let (mut debug_dcb_path_finder, mut full) =
        signal_rows(&gbtx_to_comet, &signal_names, &instances_to_fpga)?;
    sort(&mut debug_dcb_path_finder, 0, &outputs.debug_dcb_path_finder)?;
    sort(&mut full, 3, &outputs.comet_dcb_full)?;

    let full = Table::new(
        &[
            "COMET FPGA pin",
            "Pathfinder COMET connector",
            "DCB data GBTx pin",
            "Signal ID",
        ],
        full,
    );
    let mut short = full.select(&[0, 3]);
    sort(&mut short.rows, 1, &outputs.comet_dcb_short)?;

    Ok(CometDcbTables {
        debug_comet: Table::new(&["COMET connector", "COMET FPGA"], debug_comet),
        debug_dcb_path_finder: Table::new(
            &["Signal ID", "DCB data GBTx pin", "Pathfinder COMET connector"],
            debug_dcb_path_finder,
        ),
        full,
        short,
    })
}

pub fn run(config: &MappingConfig, connectors_to_fpga: &PinMap) -> Result<()> {
    let path_finder = config.load_netlist(&config.path_finder.netlist)?;
    let dcb = config.load_netlist(&config.dcb.netlist)?;
    let tables = comet_dcb_tables(connectors_to_fpga, &path_finder, &dcb, config)?;

    let outputs = &config.outputs;
    for (table, output) in [
        (&tables.debug_comet, &outputs.debug_comet),
        (&tables.debug_dcb_path_finder, &outputs.debug_dcb_path_finder),
        (&tables.full, &outputs.comet_dcb_full),
        (&tables.short, &outputs.comet_dcb_short),
    ] {
        let path = config.output_path(output);
        table.write_csv(&path)?;
        info!("{}: {} rows", path.display(), table.rows.len());
    }
    Ok(())
}

fn sort(rows: &mut [Vec<String>], column: usize, output: &OutputTable) -> Result<()> {
    NaturalOrder::new(column, &output.sort_anchor)?.sort(rows);
    Ok(())
}
