use crate::pin_map::PinMap;
use log::debug;

/// Replicates a map once per physical instance of a repeated subsystem.
///
/// Every key gets each prefix prepended to its designator; values are shared, so the result maps
/// several keys onto the same pin.
pub fn expand_instances<S: AsRef<str>>(map: &PinMap, prefixes: &[S]) -> PinMap {
    let mut expanded = PinMap::new();
    for (key, value) in map {
        for prefix in prefixes {
            let mut key = key.clone();
            key.designator = key.designator.with_prefix(prefix.as_ref());
            expanded.insert(key, value.clone());
        }
    }
    debug!("{} pins expanded to {} instances", map.len(), prefixes.len());
    expanded
}

#[cfg(test)]
mod tests {
    use super::*;
    use ecad_file_format::ComponentPin;

    fn pin(d: &str, p: &str) -> ComponentPin {
        ComponentPin::new(d, p)
    }

    #[test]
    fn every_instance_shares_the_value() {
        let map: PinMap = [
            (pin("J1", "3"), pin("IC3", "112")),
            (pin("J2", "1"), pin("IC3", "112")),
            (pin("J2", "7"), pin("IC3", "40")),
        ]
        .into_iter()
        .collect();
        let prefixes = ["COMET_A_", "COMET_B_"];
        let expanded = expand_instances(&map, &prefixes);

        assert_eq!(expanded.len(), map.len() * prefixes.len());
        for (key, value) in &map {
            for prefix in prefixes {
                let mut instance = key.clone();
                instance.designator = instance.designator.with_prefix(prefix);
                assert_eq!(expanded.get(&instance), Some(value));
            }
        }
        assert_eq!(
            expanded.get(&pin("COMET_B_J2", "7")),
            Some(&pin("IC3", "40"))
        );
    }

    #[test]
    fn no_prefixes_gives_empty_map() {
        let map: PinMap = [(pin("J1", "3"), pin("IC3", "112"))].into_iter().collect();
        assert!(expand_instances::<&str>(&map, &[]).is_empty());
    }
}
