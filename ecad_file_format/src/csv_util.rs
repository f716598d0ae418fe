pub const NET_COLUMN_NAMES: [&str; 5] = ["Net", "Net Name", "NetName", "Signal", "Signal Name"];
pub const DESIGNATOR_COLUMN_NAMES: [&str; 5] =
    ["Designator", "Ref", "RefDes", "Reference", "Component"];
pub const PIN_COLUMN_NAMES: [&str; 5] = ["Pin", "Pin Number", "PinId", "Pin ID", "Pad"];

/// Picks the most frequent of `,`, tab and `;`.
pub fn determine_separator(contents: &str) -> u8 {
    let mut counts: [(usize, u8); 3] = [(0, b','), (0, b'\t'), (0, b';')];
    for b in contents.bytes() {
        match b {
            b',' => counts[0].0 += 1,
            b'\t' => counts[1].0 += 1,
            b';' => counts[2].0 += 1,
            _ => {}
        }
    }
    // stable sort keeps ',' ahead on ties
    counts.sort_by(|a, b| b.0.cmp(&a.0));
    counts[0].1
}

/// True if every group of synonyms has at least one member among `columns`.
pub fn is_header_row(columns: &[&str], required: &[&[&str]]) -> bool {
    required
        .iter()
        .all(|synonyms| columns.iter().any(|c| synonyms.contains(c)))
}

pub fn find_column_idx(columns: &[String], synonyms: &[&str]) -> Option<usize> {
    columns
        .iter()
        .enumerate()
        .find(|(_idx, c)| synonyms.contains(&c.as_str()))
        .map(|(idx, _)| idx)
}
