use crate::error::{MappingError, Result};
use crate::pin_map::PinMap;
use ecad_file_format::{ComponentPin, Designator};
use log::debug;
use std::collections::BTreeMap;

/// Pairs the single `key` pin with the single `value` pin of every group.
///
/// Groups without a pin on either side contribute nothing. Designators are normalized with
/// `strip_token` before being recorded, so `J4_1` and `IC3_1` come out as `J4` and `IC3`.
pub fn build_bijection(
    groups: &[Vec<ComponentPin>],
    key: &str,
    value: &str,
    strip_token: &str,
) -> Result<PinMap> {
    let key_designator = Designator(key.to_string());
    let value_designator = Designator(value.to_string());
    let mut map = PinMap::new();
    let mut reverse: BTreeMap<ComponentPin, ComponentPin> = BTreeMap::new();

    for group in groups {
        let key_candidates = candidates(group, &key_designator);
        let value_candidates = candidates(group, &value_designator);
        if key_candidates.is_empty() || value_candidates.is_empty() {
            continue;
        }
        if key_candidates.len() > 1 || value_candidates.len() > 1 {
            return Err(MappingError::Ambiguous {
                key: key_designator,
                value: value_designator,
                key_candidates,
                value_candidates,
                group: group.clone(),
            });
        }

        let k = normalize(&key_candidates[0], strip_token);
        let v = normalize(&value_candidates[0], strip_token);
        if let Some(first) = map.get(&k) {
            return Err(MappingError::DuplicateMapping {
                key: key_designator,
                value: value_designator,
                pin: k.clone(),
                first: first.clone(),
                second: v,
            });
        }
        if let Some(first) = reverse.get(&v) {
            return Err(MappingError::DuplicateMapping {
                key: key_designator,
                value: value_designator,
                pin: v.clone(),
                first: first.clone(),
                second: k,
            });
        }
        reverse.insert(v.clone(), k.clone());
        map.insert(k, v);
    }

    debug!("{key} -> {value}: {} pins", map.len());
    Ok(map)
}

/// Map for pass-through boards where every filtered group is a plain wire between two pins.
/// Both directions are recorded.
pub fn build_pair_map(groups: &[Vec<ComponentPin>]) -> Result<PinMap> {
    let mut map = PinMap::new();
    for group in groups {
        let [a, b] = group.as_slice() else {
            return Err(MappingError::NotAPair(group.clone()));
        };
        map.insert(a.clone(), b.clone());
        map.insert(b.clone(), a.clone());
    }
    debug!("pair map: {} pins", map.len());
    Ok(map)
}

fn candidates(group: &[ComponentPin], designator: &Designator) -> Vec<ComponentPin> {
    group
        .iter()
        .filter(|p| &p.designator == designator)
        .cloned()
        .collect()
}

fn normalize(pin: &ComponentPin, strip_token: &str) -> ComponentPin {
    ComponentPin {
        designator: pin.designator.strip_token(strip_token),
        pin_id: pin.pin_id.clone(),
    }
}
