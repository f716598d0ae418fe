use anyhow::{Context, Result};
use std::fs;
use std::path::Path;

/// Rows of display strings with their column headers, ready to be written out.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Table {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl Table {
    pub fn new<S: AsRef<str>>(headers: &[S], rows: Vec<Vec<String>>) -> Self {
        Table {
            headers: headers.iter().map(|h| h.as_ref().to_string()).collect(),
            rows,
        }
    }

    /// Keeps only the listed columns, in the listed order.
    pub fn select(&self, columns: &[usize]) -> Table {
        Table {
            headers: columns.iter().map(|&c| self.headers[c].clone()).collect(),
            rows: self
                .rows
                .iter()
                .map(|row| columns.iter().map(|&c| row[c].clone()).collect())
                .collect(),
        }
    }

    pub fn write_csv(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)
                    .with_context(|| format!("Failed to create {}", parent.display()))?;
            }
        }
        let mut writer = csv::Writer::from_path(path)
            .with_context(|| format!("Failed to create {}", path.display()))?;
        writer.write_record(&self.headers)?;
        for row in &self.rows {
            writer.write_record(row)?;
        }
        writer.flush()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table() -> Table {
        Table::new(
            &["COMET FPGA pin", "Pathfinder COMET connector", "Signal ID"],
            vec![
                vec!["COMET_A_J1-IC3-20".into(), "COMET_A_J1-3".into(), "DC_CH0_ELK_P".into()],
                vec!["COMET_A_J1-IC3-21".into(), "COMET_A_J1-5".into(), "DC_CH0_ELK_N".into()],
            ],
        )
    }

    #[test]
    fn select_reorders_columns() {
        let short = table().select(&[0, 2]);
        assert_eq!(short.headers, vec!["COMET FPGA pin", "Signal ID"]);
        assert_eq!(short.rows[1], vec!["COMET_A_J1-IC3-21", "DC_CH0_ELK_N"]);
    }

    #[test]
    fn can_write_csv() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("mapping.csv");
        table().write_csv(&path).unwrap();
        let contents = fs::read_to_string(&path).unwrap();
        assert_eq!(
            contents,
            "COMET FPGA pin,Pathfinder COMET connector,Signal ID\n\
             COMET_A_J1-IC3-20,COMET_A_J1-3,DC_CH0_ELK_P\n\
             COMET_A_J1-IC3-21,COMET_A_J1-5,DC_CH0_ELK_N\n"
        );
    }
}
