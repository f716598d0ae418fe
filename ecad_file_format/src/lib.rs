mod csv_util;
pub mod netlist;
pub mod table;
mod text_util;
pub mod wirelist;

pub use netlist::{ComponentPin, Designator, Net, NetName, Netlist, PinId};
pub use table::Table;
pub use wirelist::{load_wirelist, parse_wirelist};
