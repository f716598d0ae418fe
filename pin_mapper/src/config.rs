use anyhow::{Context, Result};
use ecad_file_format::{ComponentPin, Netlist, load_wirelist};
use log::info;
use pin_map_core::{DesignatorRange, NetFilterConfig, OffsetRelation, OverrideTable};
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

fn default_strip_token() -> String {
    "_1".into()
}

fn default_dir() -> PathBuf {
    PathBuf::from(".")
}

/// Everything board specific: which parts to look at, what to throw away, and how boards mate.
///
/// Relative paths are resolved against the directory holding the configuration file.
#[derive(Debug, Deserialize)]
pub struct MappingConfig {
    #[serde(default = "default_dir")]
    pub input_dir: PathBuf,
    #[serde(default = "default_dir")]
    pub output_dir: PathBuf,
    /// Removed from designators when building pin maps, collapsing `J4_1` into `J4`.
    #[serde(default = "default_strip_token")]
    pub strip_token: String,
    pub comet: CometConfig,
    pub comet_db: CometDbConfig,
    pub path_finder: PathFinderConfig,
    pub dcb: DcbConfig,
    pub outputs: OutputsConfig,
}

#[derive(Debug, Deserialize)]
pub struct CometConfig {
    pub netlist: PathBuf,
    pub filter: NetFilterConfig,
    /// Connector facing the Pathfinder, e.g. `J1`.
    pub source_connector: String,
    /// Connectors towards the daughter board, e.g. `J4_1` and `J6_1`.
    pub intermediate_connectors: Vec<String>,
    pub fpga: String,
    /// Second Pathfinder-facing connector wired pin-for-pin with a shift.
    #[serde(default)]
    pub sibling: Option<OffsetRelation>,
    /// CSV table of manual FPGA pin corrections.
    #[serde(default)]
    pub overrides: Option<PathBuf>,
}

#[derive(Debug, Deserialize)]
pub struct CometDbConfig {
    pub netlist: PathBuf,
    pub filter: NetFilterConfig,
    /// How COMET connector pins meet daughter board pins, used in both directions.
    pub mating: Vec<OffsetRelation>,
}

#[derive(Debug, Deserialize)]
pub struct PathFinderConfig {
    pub netlist: PathBuf,
    pub filter: NetFilterConfig,
    /// Connector facing the DCB.
    pub connector: String,
    pub comet_connectors: Vec<String>,
    /// One per COMET board plugged into the Pathfinder.
    pub instance_prefixes: Vec<String>,
    pub ufl_filter: NetFilterConfig,
    pub ufl: DesignatorRange,
}

#[derive(Debug, Deserialize)]
pub struct DcbConfig {
    pub netlist: PathBuf,
    pub filter: NetFilterConfig,
    pub gbtx: DesignatorRange,
    pub connector: String,
    /// DCB connector to Pathfinder connector.
    pub mating: Vec<OffsetRelation>,
}

#[derive(Debug, Deserialize)]
pub struct OutputsConfig {
    pub debug_comet: OutputTable,
    pub debug_dcb_path_finder: OutputTable,
    pub comet_dcb_full: OutputTable,
    pub comet_dcb_short: OutputTable,
    pub comet_path_finder: OutputTable,
}

#[derive(Debug, Deserialize)]
pub struct OutputTable {
    pub file: PathBuf,
    /// Digits following this pattern sort numerically.
    pub sort_anchor: String,
}

#[derive(Debug, Deserialize)]
struct OverrideRecord {
    #[serde(rename = "From designator")]
    from_designator: String,
    #[serde(rename = "From pin")]
    from_pin: String,
    #[serde(rename = "To designator")]
    to_designator: String,
    #[serde(rename = "To pin")]
    to_pin: String,
}

impl MappingConfig {
    pub fn load(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config: {}", path.display()))?;
        let mut config: MappingConfig = toml::from_str(&contents)
            .with_context(|| format!("Invalid config: {}", path.display()))?;
        let base = path.parent().unwrap_or(Path::new(""));
        config.input_dir = base.join(&config.input_dir);
        config.output_dir = base.join(&config.output_dir);
        if let Some(overrides) = config.comet.overrides.take() {
            config.comet.overrides = Some(base.join(overrides));
        }
        Ok(config)
    }

    pub fn load_netlist(&self, netlist: &Path) -> Result<Netlist> {
        let path = self.input_dir.join(netlist);
        let netlist = load_wirelist(&path)?;
        info!(
            "{}: {} nets, {} nodes",
            path.display(),
            netlist.nets.len(),
            netlist.node_count()
        );
        Ok(netlist)
    }

    pub fn output_path(&self, table: &OutputTable) -> PathBuf {
        self.output_dir.join(&table.file)
    }

    pub fn comet_overrides(&self) -> Result<OverrideTable> {
        match &self.comet.overrides {
            Some(path) => load_override_table(path),
            None => Ok(OverrideTable::new()),
        }
    }
}

pub fn load_override_table(path: &Path) -> Result<OverrideTable> {
    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .comment(Some(b'#'))
        .from_path(path)
        .with_context(|| format!("Failed to read override table: {}", path.display()))?;
    let mut table = OverrideTable::new();
    for record in reader.deserialize() {
        let record: OverrideRecord =
            record.with_context(|| format!("Invalid override table: {}", path.display()))?;
        table.insert(
            ComponentPin::new(record.from_designator, record.from_pin),
            ComponentPin::new(record.to_designator, record.to_pin),
        );
    }
    info!("{}: {} overrides", path.display(), table.len());
    Ok(table)
}
