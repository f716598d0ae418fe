//! Selection of the net groups relevant to one mapping stage.

use crate::error::Result;
use ecad_file_format::{ComponentPin, Netlist};
use log::debug;
use regex::Regex;
use serde::Deserialize;
use std::collections::HashSet;

/// Matches pins by designator and/or pin label.
///
/// No designator means any part; no labels means any pin of the part.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct PinMatcher {
    #[serde(default)]
    pub designator: Option<String>,
    #[serde(default)]
    pub pins: Vec<String>,
}

impl PinMatcher {
    pub fn pin(designator: &str, pin: &str) -> Self {
        PinMatcher {
            designator: Some(designator.into()),
            pins: vec![pin.into()],
        }
    }

    pub fn matches(&self, pin: &ComponentPin) -> bool {
        self.designator
            .as_ref()
            .is_none_or(|d| d == &pin.designator.0)
            && (self.pins.is_empty() || self.pins.contains(&pin.pin_id.0))
    }
}

/// Rule applied to whole groups once they passed the designator filter.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GroupRule {
    /// Drop the group if any of its pins matches (shields, ground, unused diagnostics).
    Reject(PinMatcher),
    /// Keep the group only if at least one of its pins matches.
    Require(PinMatcher),
}

impl GroupRule {
    pub fn accepts(&self, group: &[ComponentPin]) -> bool {
        match self {
            GroupRule::Reject(m) => !group.iter().any(|p| m.matches(p)),
            GroupRule::Require(m) => group.iter().any(|p| m.matches(p)),
        }
    }
}

fn default_connector_prefix() -> String {
    "J".into()
}

/// Declarative form of a [`NetFilter`], as found in board configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct NetFilterConfig {
    /// Regex matched against the start of each designator.
    pub designators: String,
    /// Only nets whose name contains this substring are considered.
    #[serde(default)]
    pub net_name: Option<String>,
    #[serde(default = "default_connector_prefix")]
    pub connector_prefix: String,
    #[serde(default)]
    pub rules: Vec<GroupRule>,
}

#[derive(Debug, Clone)]
pub struct NetFilter {
    designators: Regex,
    net_name: Option<String>,
    connector_prefix: String,
    rules: Vec<GroupRule>,
}

impl NetFilter {
    pub fn new(designators: &str) -> Result<Self> {
        Ok(NetFilter {
            designators: Regex::new(&format!("^(?:{designators})"))?,
            net_name: None,
            connector_prefix: default_connector_prefix(),
            rules: Vec::new(),
        })
    }

    pub fn from_config(config: &NetFilterConfig) -> Result<Self> {
        Ok(NetFilter {
            net_name: config.net_name.clone(),
            connector_prefix: config.connector_prefix.clone(),
            rules: config.rules.clone(),
            ..NetFilter::new(&config.designators)?
        })
    }

    pub fn with_net_name(mut self, net_name: &str) -> Self {
        self.net_name = Some(net_name.into());
        self
    }

    pub fn with_rule(mut self, rule: GroupRule) -> Self {
        self.rules.push(rule);
        self
    }

    /// Groups of matching pins, in net order.
    ///
    /// A group is kept when it has more than one matching pin, was not seen before, contains a
    /// connector and passes every rule. Everything else is dropped silently.
    pub fn apply(&self, netlist: &Netlist) -> Vec<Vec<ComponentPin>> {
        let mut seen = HashSet::new();
        let mut filtered = Vec::new();
        for (net_name, net) in &netlist.nets {
            if let Some(s) = &self.net_name {
                if !net_name.0.contains(s.as_str()) {
                    continue;
                }
            }
            let pins = net
                .nodes
                .iter()
                .filter(|n| self.designators.is_match(&n.designator.0))
                .cloned()
                .collect::<Vec<_>>();
            if pins.len() < 2 {
                continue;
            }
            if !pins
                .iter()
                .any(|p| p.designator.is_connector(&self.connector_prefix))
            {
                continue;
            }
            if !seen.insert(pins.clone()) {
                continue;
            }
            if self.rules.iter().all(|r| r.accepts(&pins)) {
                filtered.push(pins);
            }
        }
        debug!(
            "{}: {} of {} nets kept",
            self.designators.as_str(),
            filtered.len(),
            netlist.nets.len()
        );
        filtered
    }
}
