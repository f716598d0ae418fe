//! Pin index arithmetic between physically paired connectors.

use crate::error::{MappingError, Result};
use crate::pin_map::PinMap;
use ecad_file_format::{ComponentPin, Designator, PinId};
use log::debug;
use serde::Deserialize;

/// Pin `x` on `sibling` corresponds to pin `x + offset` on `reference`.
///
/// An offset of zero only swaps the designator and leaves the pin label untouched, so it also
/// works for connectors with alphanumeric pin labels (`A1`, `B3`).
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct OffsetRelation {
    pub reference: Designator,
    pub sibling: Designator,
    pub offset: i64,
}

impl OffsetRelation {
    pub fn new(reference: &str, sibling: &str, offset: i64) -> Self {
        OffsetRelation {
            reference: Designator(reference.into()),
            sibling: Designator(sibling.into()),
            offset,
        }
    }

    /// The same physical pairing seen from the sibling side.
    pub fn reversed(&self) -> OffsetRelation {
        OffsetRelation {
            reference: self.sibling.clone(),
            sibling: self.reference.clone(),
            offset: -self.offset,
        }
    }

    /// Pin on the sibling mating with `pin`, which has to sit on the reference connector.
    pub fn sibling_pin(&self, pin: &ComponentPin) -> Result<ComponentPin> {
        shift(pin, &self.sibling, -self.offset)
    }

    /// Pin on the reference mating with `pin`, which has to sit on the sibling connector.
    pub fn reference_pin(&self, pin: &ComponentPin) -> Result<ComponentPin> {
        shift(pin, &self.reference, self.offset)
    }

    /// Pin on the reference connector a signal arrives on when it comes back from the mating board
    /// on `pin`. The label moves the same way as on the way out, whatever connector `pin` sits on.
    pub fn return_pin(&self, pin: &ComponentPin) -> Result<ComponentPin> {
        shift(pin, &self.reference, -self.offset)
    }

    /// Re-keys the reference-connector entries of `map` onto the sibling connector, values
    /// unchanged. Keys on other connectors are left out.
    pub fn derive_sibling_map(&self, map: &PinMap) -> Result<PinMap> {
        let mut derived = PinMap::new();
        for (key, value) in map {
            if key.designator != self.reference {
                continue;
            }
            derived.insert(self.sibling_pin(key)?, value.clone());
        }
        debug!(
            "{} -> {}: derived {} pins with offset {}",
            self.reference,
            self.sibling,
            derived.len(),
            self.offset
        );
        Ok(derived)
    }
}

/// Moves `pin` across the first relation whose reference connector it sits on.
pub fn relabel(pin: &ComponentPin, relations: &[OffsetRelation]) -> Result<ComponentPin> {
    relation_for(pin, relations)?.sibling_pin(pin)
}

/// Relation whose reference connector `pin` sits on.
pub fn relation_for<'a>(
    pin: &ComponentPin,
    relations: &'a [OffsetRelation],
) -> Result<&'a OffsetRelation> {
    relations
        .iter()
        .find(|r| r.reference == pin.designator)
        .ok_or_else(|| MappingError::NoOffsetRelation(pin.clone()))
}

fn shift(pin: &ComponentPin, designator: &Designator, delta: i64) -> Result<ComponentPin> {
    if delta == 0 {
        return Ok(ComponentPin {
            designator: designator.clone(),
            pin_id: pin.pin_id.clone(),
        });
    }
    let number = pin
        .pin_id
        .as_number()
        .and_then(|n| n.checked_add(delta))
        .ok_or_else(|| MappingError::MalformedPinLabel(pin.clone()))?;
    Ok(ComponentPin {
        designator: designator.clone(),
        pin_id: PinId(number.to_string()),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pin(d: &str, p: &str) -> ComponentPin {
        ComponentPin::new(d, p)
    }

    fn j1_map() -> PinMap {
        [
            (pin("J1", "3"), pin("IC3", "112")),
            (pin("J1", "4"), pin("IC3", "113")),
            (pin("J1", "40"), pin("IC3", "7")),
        ]
        .into_iter()
        .collect()
    }

    #[test]
    fn sibling_pin_subtracts_offset() {
        let relation = OffsetRelation::new("J1", "J2", 2);
        assert_eq!(relation.sibling_pin(&pin("J1", "3")).unwrap(), pin("J2", "1"));
        assert_eq!(relation.reference_pin(&pin("J2", "1")).unwrap(), pin("J1", "3"));
    }

    #[test]
    fn derive_sibling_map_keeps_values() {
        let derived = OffsetRelation::new("J1", "J2", 2)
            .derive_sibling_map(&j1_map())
            .unwrap();
        assert_eq!(derived.len(), 3);
        assert_eq!(derived.get(&pin("J2", "1")), Some(&pin("IC3", "112")));
        assert_eq!(derived.get(&pin("J2", "38")), Some(&pin("IC3", "7")));
    }

    #[test]
    fn derive_and_reverse_is_identity() {
        let relation = OffsetRelation::new("J1", "J2", 2);
        let there = relation.derive_sibling_map(&j1_map()).unwrap();
        let back = relation.reversed().derive_sibling_map(&there).unwrap();
        assert_eq!(back, j1_map());
    }

    #[test]
    fn derive_skips_other_connectors() {
        let mut map = j1_map();
        map.insert(pin("J6", "11"), pin("IC3", "112"));
        let derived = OffsetRelation::new("J1", "J2", 2).derive_sibling_map(&map).unwrap();
        assert_eq!(derived.len(), 3);
    }

    #[test]
    fn non_integer_label_is_malformed() {
        let relation = OffsetRelation::new("J4", "J4", -1);
        let err = relation.sibling_pin(&pin("J4", "SHIELD1")).unwrap_err();
        assert!(matches!(err, MappingError::MalformedPinLabel(p) if p == pin("J4", "SHIELD1")));
    }

    #[test]
    fn overflowing_label_is_malformed() {
        let relation = OffsetRelation::new("J4", "J4", -1);
        let huge = pin("J4", &i64::MAX.to_string());
        assert!(matches!(
            relation.sibling_pin(&huge),
            Err(MappingError::MalformedPinLabel(p)) if p == huge
        ));
    }

    #[test]
    fn return_pin_lands_on_reference_connector() {
        let relation = OffsetRelation::new("J4", "J4", -1);
        // signal left on J4-5, entered the mating board on J4-6 and comes back on its J6-20
        assert_eq!(relation.sibling_pin(&pin("J4", "5")).unwrap(), pin("J4", "6"));
        assert_eq!(relation.return_pin(&pin("J6", "20")).unwrap(), pin("J4", "21"));
    }

    #[test]
    fn zero_offset_renames_only() {
        let relation = OffsetRelation::new("J3", "JD10", 0);
        assert_eq!(relation.sibling_pin(&pin("J3", "B3")).unwrap(), pin("JD10", "B3"));
    }

    #[test]
    fn relabel_picks_relation_by_reference() {
        let mating = [
            OffsetRelation::new("J4", "J4", -1),
            OffsetRelation::new("J6", "J6", -1),
        ];
        assert_eq!(relabel(&pin("J6", "10"), &mating).unwrap(), pin("J6", "11"));
        assert!(matches!(
            relabel(&pin("J2", "10"), &mating),
            Err(MappingError::NoOffsetRelation(_))
        ));
    }
}
