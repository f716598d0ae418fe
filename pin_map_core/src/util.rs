use ecad_file_format::Designator;
use serde::Deserialize;

/// Numbered designator series such as `J1..=J37` or `U1_IC2..=U6_IC2`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct DesignatorRange {
    pub prefix: String,
    pub first: u32,
    pub last: u32,
    #[serde(default)]
    pub suffix: String,
}

impl DesignatorRange {
    pub fn designators(&self) -> Vec<Designator> {
        (self.first..=self.last)
            .map(|i| Designator(format!("{}{i}{}", self.prefix, self.suffix)))
            .collect()
    }
}
