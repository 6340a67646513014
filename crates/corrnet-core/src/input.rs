//! Delimited correlation table reader (`FileA`, `FileB`, `pcorValues`).

use std::io::Read;
use std::path::Path;

use log::info;

use crate::config::RawRecord;
use crate::error::{NetworkError, Result};

const REQUIRED_COLUMNS: &[&str] = &["FileA", "FileB", "pcorValues"];

fn reader_builder(delimiter: char) -> Result<csv::ReaderBuilder> {
    if !delimiter.is_ascii() {
        return Err(NetworkError::InvalidConfig(format!(
            "delimiter {delimiter:?} is not a single-byte character"
        )));
    }
    let mut builder = csv::ReaderBuilder::new();
    builder
        .delimiter(delimiter as u8)
        .has_headers(true)
        .flexible(true)
        .trim(csv::Trim::Headers);
    Ok(builder)
}

/// Read every record from a delimited source with a header row.
///
/// Extra columns are ignored. A row shorter than the header reads its missing
/// cells as empty text, so a truncated correlation becomes an unparsable row
/// instead of a failed read. The correlation column is kept as text; parsing
/// happens in the rows phase.
pub fn read_records<R: Read>(source: R, delimiter: char) -> Result<Vec<RawRecord>> {
    let mut reader = reader_builder(delimiter)?.from_reader(source);

    let headers = reader.headers()?.clone();
    let position = |col: &str| headers.iter().position(|h| h == col);
    let missing: Vec<&str> = REQUIRED_COLUMNS
        .iter()
        .copied()
        .filter(|col| position(*col).is_none())
        .collect();
    let (Some(file_a), Some(file_b), Some(pcor)) =
        (position("FileA"), position("FileB"), position("pcorValues"))
    else {
        return Err(NetworkError::Input(format!(
            "missing required column(s): {}",
            missing.join(", ")
        )));
    };

    let mut records = Vec::new();
    for result in reader.records() {
        let record = result?;
        let cell = |idx: usize| record.get(idx).unwrap_or_default();
        records.push(RawRecord::new(cell(file_a), cell(file_b), cell(pcor)));
    }
    Ok(records)
}

/// Read a correlation table from disk.
pub fn read_rows(path: &Path, delimiter: char) -> Result<Vec<RawRecord>> {
    let file = std::fs::File::open(path)?;
    let records = read_records(file, delimiter)?;
    info!("read {} correlation records from {}", records.len(), path.display());
    Ok(records)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reads_tab_separated_table() {
        let data = "FileA\tFileB\tpcorValues\na.c\tb.c\t0.5\nb.c\tc.c\t0.6\n";
        let records = read_records(data.as_bytes(), '\t').unwrap();
        assert_eq!(
            records,
            vec![
                RawRecord::new("a.c", "b.c", "0.5"),
                RawRecord::new("b.c", "c.c", "0.6"),
            ]
        );
    }

    #[test]
    fn ignores_extra_columns_and_order() {
        let data = "pcorValues,pValue,FileB,FileA\n0.3,0.01,y,x\n";
        let records = read_records(data.as_bytes(), ',').unwrap();
        assert_eq!(records, vec![RawRecord::new("x", "y", "0.3")]);
    }

    #[test]
    fn keeps_unparsable_correlation_text() {
        let data = "FileA\tFileB\tpcorValues\na\tb\tNA\n";
        let records = read_records(data.as_bytes(), '\t').unwrap();
        assert_eq!(records[0].pcor_values, "NA");
    }

    #[test]
    fn missing_column_is_an_input_error() {
        let data = "FileA\tFileB\na\tb\n";
        let err = read_records(data.as_bytes(), '\t').unwrap_err();
        assert!(matches!(err, NetworkError::Input(ref msg) if msg.contains("pcorValues")));
    }

    #[test]
    fn non_ascii_delimiter_rejected() {
        let err = read_records("".as_bytes(), '→').unwrap_err();
        assert!(matches!(err, NetworkError::InvalidConfig(_)));
    }

    #[test]
    fn short_row_reads_missing_cells_as_empty() {
        let data = "FileA\tFileB\tpcorValues\na\tb\t0.5\nc\td\n";
        let records = read_records(data.as_bytes(), '\t').unwrap();
        assert_eq!(
            records,
            vec![RawRecord::new("a", "b", "0.5"), RawRecord::new("c", "d", "")]
        );

        let rows = crate::phases::rows::run_rows_phase(&records);
        assert_eq!(crate::phases::rows::count_unparsable(&rows), 1);
    }

    #[test]
    fn short_row_with_reordered_columns() {
        let data = "pcorValues,FileA,FileB\n0.4,x\n";
        let records = read_records(data.as_bytes(), ',').unwrap();
        assert_eq!(records, vec![RawRecord::new("x", "", "0.4")]);
    }

    #[test]
    fn header_only_table_is_empty() {
        let records = read_records("FileA\tFileB\tpcorValues\n".as_bytes(), '\t').unwrap();
        assert!(records.is_empty());
    }

    #[test]
    fn missing_file_is_io_error() {
        let err = read_rows(Path::new("/nonexistent/corr.sif"), '\t').unwrap_err();
        assert!(matches!(err, NetworkError::Io(_)));
    }
}
