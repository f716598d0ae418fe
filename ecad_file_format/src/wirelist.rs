//! Flat wirelist reader: one row per net node, `Net / Designator / Pin` columns.

use crate::csv_util::{
    DESIGNATOR_COLUMN_NAMES, NET_COLUMN_NAMES, PIN_COLUMN_NAMES, determine_separator,
    find_column_idx, is_header_row,
};
use crate::netlist::{ComponentPin, NetName, Netlist};
use crate::text_util::read_with_unknown_encoding;
use anyhow::{Context, Error, Result};
use std::path::Path;

pub fn load_wirelist(path: &Path) -> Result<Netlist> {
    let contents = read_with_unknown_encoding(path)
        .with_context(|| format!("Failed to read wirelist: {}", path.display()))?;
    parse_wirelist(&contents).with_context(|| format!("Invalid wirelist: {}", path.display()))
}

pub fn parse_wirelist(contents: &str) -> Result<Netlist> {
    let separator = determine_separator(contents);
    let reader = csv::ReaderBuilder::new()
        .delimiter(separator)
        .has_headers(false)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(contents.as_bytes());

    let required: [&[&str]; 3] = [&NET_COLUMN_NAMES, &DESIGNATOR_COLUMN_NAMES, &PIN_COLUMN_NAMES];
    let mut columns: Option<(usize, usize, usize)> = None;
    let mut netlist = Netlist::default();
    for record in reader.into_records() {
        let record = record?;
        let line = record.position().map(|p| p.line()).unwrap_or_default();
        let values = record.iter().collect::<Vec<&str>>();
        if values.iter().all(|v| v.is_empty()) {
            continue;
        }

        let Some((net_idx, designator_idx, pin_idx)) = columns else {
            if is_header_row(&values, &required) {
                let header = values.iter().map(|s| s.to_string()).collect::<Vec<_>>();
                columns = Some((
                    find_column_idx(&header, &NET_COLUMN_NAMES).unwrap_or_default(),
                    find_column_idx(&header, &DESIGNATOR_COLUMN_NAMES).unwrap_or_default(),
                    find_column_idx(&header, &PIN_COLUMN_NAMES).unwrap_or_default(),
                ));
            }
            continue;
        };

        let field = |idx: usize, what: &str| -> Result<String> {
            match values.get(idx) {
                Some(v) if !v.is_empty() => Ok(v.to_string()),
                _ => Err(Error::msg(format!("Line {line}: missing {what}"))),
            }
        };
        let net_name = field(net_idx, "net name")?;
        let designator = field(designator_idx, "designator")?;
        let pin_id = field(pin_idx, "pin")?;
        netlist.add_node(NetName(net_name), ComponentPin::new(designator, pin_id));
    }

    if columns.is_none() {
        return Err(Error::msg("Column header not found"));
    }
    Ok(netlist)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::netlist::Net;

    #[test]
    fn can_load_wirelist_with_title_lines() {
        let netlist = load_wirelist(Path::new("test_input/wirelist_semicolon.csv")).unwrap();
        assert_eq!(netlist.nets.len(), 3);
        assert_eq!(
            netlist.nets.get(&NetName("DC_CH0_ELK_P".into())),
            Some(&Net {
                nodes: vec![
                    ComponentPin::new("U1_IC2", "A7"),
                    ComponentPin::new("J3", "A1"),
                    ComponentPin::new("R12", "1"),
                ],
            })
        );
    }

    #[test]
    fn rows_of_one_net_are_merged_in_file_order() {
        let netlist = parse_wirelist(
            "Net,Designator,Pin\nN1,J1,3\nN2,J1,4\nN1,J4_1,5\n\nN1,J1,3\n",
        )
        .unwrap();
        let n1 = netlist.nets.get(&NetName("N1".into())).unwrap();
        assert_eq!(
            n1.nodes,
            vec![ComponentPin::new("J1", "3"), ComponentPin::new("J4_1", "5")]
        );
    }

    #[test]
    fn missing_pin_is_an_error() {
        let err = parse_wirelist("Net,Ref,Pin\nN1,J1,\n").unwrap_err();
        assert!(err.to_string().contains("missing pin"), "{err}");
    }

    #[test]
    fn missing_header_is_an_error() {
        assert!(parse_wirelist("N1,J1,3\n").is_err());
    }
}
