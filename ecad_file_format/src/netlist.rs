use serde::Deserialize;
use std::collections::BTreeMap;
use std::fmt::{Display, Formatter};

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Deserialize)]
#[serde(transparent)]
pub struct Designator(pub String);

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Deserialize)]
#[serde(transparent)]
pub struct PinId(pub String);

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Deserialize)]
#[serde(transparent)]
pub struct NetName(pub String);

impl Designator {
    /// Connectors are recognized by designator prefix only.
    pub fn is_connector(&self, prefix: &str) -> bool {
        self.0.starts_with(prefix)
    }

    pub fn with_prefix(&self, prefix: &str) -> Designator {
        Designator(format!("{prefix}{}", self.0))
    }

    /// Remove `token` if the designator ends with it, used to collapse `J4_1` and `J4` into one part.
    pub fn strip_token(&self, token: &str) -> Designator {
        if token.is_empty() {
            return self.clone();
        }
        Designator(self.0.strip_suffix(token).unwrap_or(&self.0).to_string())
    }
}

impl PinId {
    pub fn as_number(&self) -> Option<i64> {
        self.0.trim().parse().ok()
    }
}

/// A single pin of a single part, the unit every pin map is keyed by.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Deserialize)]
#[serde(from = "(String, String)")]
pub struct ComponentPin {
    pub designator: Designator,
    pub pin_id: PinId,
}

impl ComponentPin {
    pub fn new(designator: impl Into<String>, pin_id: impl Into<String>) -> Self {
        ComponentPin {
            designator: Designator(designator.into()),
            pin_id: PinId(pin_id.into()),
        }
    }
}

impl From<(String, String)> for ComponentPin {
    fn from((designator, pin_id): (String, String)) -> Self {
        ComponentPin::new(designator, pin_id)
    }
}

impl Display for ComponentPin {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}-{}", self.designator.0, self.pin_id.0)
    }
}

impl Display for Designator {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl Display for NetName {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Pins of one electrically equivalent net, in the order the reader produced them.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Net {
    pub nodes: Vec<ComponentPin>,
}

#[derive(Debug, Clone, Default)]
pub struct Netlist {
    pub nets: BTreeMap<NetName, Net>,
}

impl Netlist {
    /// Appends a node to a net, creating the net on first use. A node already present in the net is ignored.
    pub fn add_node(&mut self, net_name: NetName, node: ComponentPin) {
        let net = self.nets.entry(net_name).or_default();
        if !net.nodes.contains(&node) {
            net.nodes.push(node);
        }
    }

    /// Index of which net every pin sits on.
    ///
    /// After net hopping a pin can be listed under several equivalent net names; the name that
    /// iterates last is kept.
    pub fn pin_net_names(&self) -> BTreeMap<ComponentPin, NetName> {
        let mut index = BTreeMap::new();
        for (net_name, net) in &self.nets {
            for node in &net.nodes {
                index.insert(node.clone(), net_name.clone());
            }
        }
        index
    }

    pub fn node_count(&self) -> usize {
        self.nets.values().map(|n| n.nodes.len()).sum()
    }
}

impl Display for Netlist {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        for (net_name, net) in self.nets.iter() {
            write!(f, "Net: \"{net_name}\": ")?;
            for (idx, node) in net.nodes.iter().enumerate() {
                write!(f, "{}.{}", node.designator, node.pin_id.0)?;
                if idx < net.nodes.len() - 1 {
                    write!(f, " + ")?;
                }
            }
            writeln!(f)?;
        }
        Ok(())
    }
}
