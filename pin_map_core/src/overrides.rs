use crate::pin_map::PinMap;
use ecad_file_format::ComponentPin;
use log::{debug, info};
use std::collections::BTreeMap;

/// Hand-verified pin correspondences for parts that generic net grouping cannot resolve, e.g.
/// resistor networks carrying several signals of a differential pair.
///
/// Applied last: an entry always replaces whatever the generic stages produced for its key.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OverrideTable {
    entries: BTreeMap<ComponentPin, ComponentPin>,
}

impl OverrideTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, from: ComponentPin, to: ComponentPin) {
        self.entries.insert(from, to);
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn apply(&self, mut map: PinMap) -> PinMap {
        for (from, to) in &self.entries {
            match map.insert(from.clone(), to.clone()) {
                Some(generic) if &generic != to => {
                    info!("override {from}: {generic} replaced by {to}");
                }
                Some(_) => {}
                None => debug!("override {from}: added {to}"),
            }
        }
        map
    }
}

impl FromIterator<(ComponentPin, ComponentPin)> for OverrideTable {
    fn from_iter<T: IntoIterator<Item = (ComponentPin, ComponentPin)>>(iter: T) -> Self {
        OverrideTable {
            entries: iter.into_iter().collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pin(d: &str, p: &str) -> ComponentPin {
        ComponentPin::new(d, p)
    }

    #[test]
    fn overrides_win_over_generic_entries() {
        let generic: PinMap = [
            (pin("J6", "11"), pin("IC3", "20")),
            (pin("J6", "12"), pin("IC3", "21")),
        ]
        .into_iter()
        .collect();
        let table: OverrideTable = [
            (pin("J6", "11"), pin("IC3", "112")),
            (pin("J6", "17"), pin("IC3", "113")),
        ]
        .into_iter()
        .collect();

        let patched = table.apply(generic);
        assert_eq!(patched.len(), 3);
        assert_eq!(patched.get(&pin("J6", "11")), Some(&pin("IC3", "112")));
        assert_eq!(patched.get(&pin("J6", "12")), Some(&pin("IC3", "21")));
        assert_eq!(patched.get(&pin("J6", "17")), Some(&pin("IC3", "113")));
    }

    #[test]
    fn empty_table_is_identity() {
        let generic: PinMap = [(pin("J6", "11"), pin("IC3", "20"))].into_iter().collect();
        assert_eq!(OverrideTable::new().apply(generic.clone()), generic);
    }
}
