use crate::utils::error::Result;
use csv::ReaderBuilder;

/// One CSV row as ordered field-name / value pairs. Column order matters:
/// name fragments accumulate in it.
pub type CsvRow = Vec<(String, String)>;

/// Read all rows from CSV text. The first row is the header; an optional
/// delimiter overrides the comma default.
pub fn rows_from_str(data: &str, delimiter: Option<u8>) -> Result<Vec<CsvRow>> {
    let mut builder = ReaderBuilder::new();
    builder.has_headers(true);
    if let Some(delimiter) = delimiter {
        builder.delimiter(delimiter);
    }

    let mut reader = builder.from_reader(data.as_bytes());
    let headers = reader.headers()?.clone();

    let mut rows = Vec::new();
    for result in reader.records() {
        let record = result?;
        rows.push(
            headers
                .iter()
                .zip(record.iter())
                .map(|(header, value)| (header.to_string(), value.to_string()))
                .collect(),
        );
    }

    Ok(rows)
}
