//! Resolution of end-to-end signal paths across a chain of boards, by composing per-board
//! connector-to-connector pin maps derived from their netlists.

mod bijection;
pub mod error;
mod instances;
pub mod net_filter;
pub mod offset;
mod ordering;
pub mod overrides;
mod pin_map;
pub mod util;

pub use bijection::{build_bijection, build_pair_map};
pub use error::{MappingError, Result};
pub use instances::expand_instances;
pub use net_filter::{GroupRule, NetFilter, NetFilterConfig, PinMatcher};
pub use offset::{OffsetRelation, relabel};
pub use ordering::NaturalOrder;
pub use overrides::OverrideTable;
pub use pin_map::PinMap;
pub use util::DesignatorRange;
