use csv::WriterBuilder;

use crate::coerce::{CellValue, ChartTable};
use crate::error::ExtractError;

/// Serialize the derived table as CSV: one header record, then the data
/// rows in their coerced display form.
pub fn table_to_csv(table: &ChartTable) -> Result<String, ExtractError> {
    let mut writer = WriterBuilder::new().from_writer(Vec::<u8>::new());
    writer.write_record(&table.columns)?;
    for row in &table.rows {
        writer.write_record(row.iter().map(CellValue::display))?;
    }
    writer.flush().map_err(|error| ExtractError::Csv(error.into()))?;

    let bytes = writer
        .into_inner()
        .map_err(|error| ExtractError::Csv(error.into_error().into()))?;
    String::from_utf8(bytes)
        .map_err(|error| ExtractError::InvalidOption(format!("invalid utf-8 csv output: {error}")))
}

#[cfg(test)]
mod tests {
    use super::table_to_csv;
    use crate::coerce::ChartTable;
    use crate::model::NormalizedTable;

    #[test]
    fn csv_reflects_coerced_values() {
        let table = NormalizedTable {
            page: 1,
            table_index: 1,
            columns: vec!["Item".to_string(), "Cost".to_string()],
            rows: vec![
                vec!["Widget".to_string(), "$1,200".to_string()],
                vec!["Sprocket".to_string(), "N/A".to_string()],
            ],
        };
        let derived = ChartTable::from_normalized(&table);

        let csv = table_to_csv(&derived).expect("csv should serialize");
        assert_eq!(csv, "Item,Cost\nWidget,1200\nSprocket,N/A\n");
    }
}
