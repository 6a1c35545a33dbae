//! CSV export of the visible table.

use super::TableView;

#[derive(Debug, thiserror::Error)]
#[error("CSV export failed: {0}")]
pub struct ExportError(String);

impl TableView {
    /// Visible rows as CSV: code, name, then one column per date header.
    /// Future columns are exported empty.
    pub fn to_csv(&self) -> Result<String, ExportError> {
        let mut wtr = csv::Writer::from_writer(vec![]);

        let mut header = vec!["code".to_string(), "name".to_string()];
        header.extend(self.headers.iter().map(|h| h.label.clone()));
        wtr.write_record(&header).map_err(|e| ExportError(e.to_string()))?;

        for row in self.visible_rows() {
            let mut record = vec![row.stock_id.clone(), row.stock_name.clone()];
            record.extend(row.cells.iter().map(|c| c.text.clone()));
            wtr.write_record(&record).map_err(|e| ExportError(e.to_string()))?;
        }

        let bytes = wtr.into_inner().map_err(|e| ExportError(e.to_string()))?;
        String::from_utf8(bytes).map_err(|e| ExportError(e.to_string()))
    }
}
