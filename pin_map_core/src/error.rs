use ecad_file_format::{ComponentPin, Designator};
use itertools::Itertools;
use thiserror::Error;

/// Every failure here points at a defect in the input netlists or the board configuration.
#[derive(Debug, Error)]
pub enum MappingError {
    #[error(
        "unable to construct a bijection {key} -> {value}: net group [{}] has candidates [{}] -> [{}]",
        .group.iter().join(", "),
        .key_candidates.iter().join(", "),
        .value_candidates.iter().join(", ")
    )]
    Ambiguous {
        key: Designator,
        value: Designator,
        key_candidates: Vec<ComponentPin>,
        value_candidates: Vec<ComponentPin>,
        group: Vec<ComponentPin>,
    },
    #[error("{key} -> {value}: {pin} is mapped to both {first} and {second}")]
    DuplicateMapping {
        key: Designator,
        value: Designator,
        pin: ComponentPin,
        first: ComponentPin,
        second: ComponentPin,
    },
    #[error("{stage}: {key} resolves to {missing}, which has no further mapping")]
    MissingIntermediate {
        stage: String,
        key: ComponentPin,
        missing: ComponentPin,
    },
    #[error("pin label of {0} is not an integer")]
    MalformedPinLabel(ComponentPin),
    #[error("{key} is mapped to {existing} and {incoming} by different shards")]
    KeyCollision {
        key: ComponentPin,
        existing: ComponentPin,
        incoming: ComponentPin,
    },
    #[error("net group [{}] does not hold exactly two pins", .0.iter().join(", "))]
    NotAPair(Vec<ComponentPin>),
    #[error("no offset relation has {0} as reference connector")]
    NoOffsetRelation(ComponentPin),
    #[error("{0} is not on any net")]
    MissingNetName(ComponentPin),
    #[error("invalid designator pattern: {0}")]
    InvalidPattern(#[from] regex::Error),
}

pub type Result<T> = std::result::Result<T, MappingError>;
