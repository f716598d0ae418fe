use crate::error::{MappingError, Result};
use crate::offset::{OffsetRelation, relabel, relation_for};
use ecad_file_format::ComponentPin;
use log::debug;
use std::collections::BTreeMap;
use std::collections::btree_map::{Entry, Iter};

/// Pin-to-pin correspondence between two sets of parts, ordered by key.
///
/// Maps produced by [`crate::build_bijection`] are one-to-one. Maps widened by
/// [`crate::expand_instances`] are not: several keys may share a value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PinMap(BTreeMap<ComponentPin, ComponentPin>);

impl PinMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, key: &ComponentPin) -> Option<&ComponentPin> {
        self.0.get(key)
    }

    pub fn insert(&mut self, key: ComponentPin, value: ComponentPin) -> Option<ComponentPin> {
        self.0.insert(key, value)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> Iter<'_, ComponentPin, ComponentPin> {
        self.0.iter()
    }

    pub fn keys(&self) -> impl Iterator<Item = &ComponentPin> {
        self.0.keys()
    }

    /// A→B followed by B→C gives A→C. Every value of `self` has to be a key of `next`.
    pub fn compose(&self, next: &PinMap, stage: &str) -> Result<PinMap> {
        self.compose_with(next, stage, |pin| Ok(pin.clone()))
    }

    /// Like [`PinMap::compose`], with every intermediate pin moved across a mating connector
    /// pair before it is looked up in `next`.
    pub fn compose_via(
        &self,
        next: &PinMap,
        relations: &[OffsetRelation],
        stage: &str,
    ) -> Result<PinMap> {
        self.compose_with(next, stage, |pin| relabel(pin, relations))
    }

    /// Composes through a pass-through board that sends each signal back onto the connector it
    /// left through.
    ///
    /// Every value of `self` crosses its mating relation onto `board`, is followed to the far end
    /// of its wire there, and comes back onto the original connector before the lookup in `next`.
    /// The far end may sit on any connector of `board`.
    pub fn compose_loopback(
        &self,
        board: &PinMap,
        next: &PinMap,
        relations: &[OffsetRelation],
        stages: [&str; 2],
    ) -> Result<PinMap> {
        let [outgoing_stage, return_stage] = stages;
        let mut composed = PinMap::new();
        for (key, outgoing) in self.iter() {
            let relation = relation_for(outgoing, relations)?;
            let entry = relation.sibling_pin(outgoing)?;
            let Some(far_end) = board.get(&entry) else {
                return Err(MappingError::MissingIntermediate {
                    stage: outgoing_stage.to_string(),
                    key: key.clone(),
                    missing: entry,
                });
            };
            let returned = relation.return_pin(far_end)?;
            let Some(target) = next.get(&returned) else {
                return Err(MappingError::MissingIntermediate {
                    stage: return_stage.to_string(),
                    key: key.clone(),
                    missing: returned,
                });
            };
            composed.insert(key.clone(), target.clone());
        }
        debug!("{outgoing_stage} -> {return_stage}: composed {} pins", composed.len());
        Ok(composed)
    }

    fn compose_with<F>(&self, next: &PinMap, stage: &str, mut bridge: F) -> Result<PinMap>
    where
        F: FnMut(&ComponentPin) -> Result<ComponentPin>,
    {
        let mut composed = PinMap::new();
        for (key, value) in self.iter() {
            let intermediate = bridge(value)?;
            let Some(target) = next.get(&intermediate) else {
                return Err(MappingError::MissingIntermediate {
                    stage: stage.to_string(),
                    key: key.clone(),
                    missing: intermediate,
                });
            };
            composed.insert(key.clone(), target.clone());
        }
        debug!("{stage}: composed {} pins", composed.len());
        Ok(composed)
    }

    /// Union of maps covering physically distinct connector variants.
    ///
    /// A key present in two shards is a wiring error and is reported, even when both shards agree.
    pub fn merge_disjoint<I>(shards: I) -> Result<PinMap>
    where
        I: IntoIterator<Item = PinMap>,
    {
        let mut merged = BTreeMap::new();
        for shard in shards {
            for (key, value) in shard.0 {
                match merged.entry(key) {
                    Entry::Vacant(entry) => {
                        entry.insert(value);
                    }
                    Entry::Occupied(entry) => {
                        return Err(MappingError::KeyCollision {
                            key: entry.key().clone(),
                            existing: entry.get().clone(),
                            incoming: value,
                        });
                    }
                }
            }
        }
        Ok(PinMap(merged))
    }

    /// `key-pin, value-pin` display rows, in key order.
    pub fn rows(&self) -> Vec<Vec<String>> {
        self.iter()
            .map(|(k, v)| vec![k.to_string(), v.to_string()])
            .collect()
    }
}

impl FromIterator<(ComponentPin, ComponentPin)> for PinMap {
    fn from_iter<T: IntoIterator<Item = (ComponentPin, ComponentPin)>>(iter: T) -> Self {
        PinMap(iter.into_iter().collect())
    }
}

impl IntoIterator for PinMap {
    type Item = (ComponentPin, ComponentPin);
    type IntoIter = std::collections::btree_map::IntoIter<ComponentPin, ComponentPin>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl<'a> IntoIterator for &'a PinMap {
    type Item = (&'a ComponentPin, &'a ComponentPin);
    type IntoIter = Iter<'a, ComponentPin, ComponentPin>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}
