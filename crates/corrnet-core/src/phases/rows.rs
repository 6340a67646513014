//! Phase 1: Normalize raw table records into typed correlation rows.

use crate::config::{RawRecord, Row};

/// Parse correlation text by reading its longest leading decimal literal.
///
/// Leading whitespace is skipped and trailing junk is ignored, so `"0.5abc"`
/// reads as 0.5. The only infinity spelling accepted is `Infinity` (optionally
/// signed); `Inf`, `inf` and `NaN` are unparsable. Unparsable text becomes NaN,
/// which fails every threshold comparison, so such rows stay in the table but
/// never produce a link.
pub fn parse_correlation(text: &str) -> f64 {
    let text = text.trim_start();
    let len = decimal_prefix_len(text);
    if len == 0 {
        return f64::NAN;
    }
    text[..len].parse::<f64>().unwrap_or(f64::NAN)
}

/// Byte length of the decimal literal at the start of `text`, or 0 if none.
fn decimal_prefix_len(text: &str) -> usize {
    let bytes = text.as_bytes();
    let mut pos = 0;
    if matches!(bytes.first(), Some(b'+' | b'-')) {
        pos += 1;
    }
    if bytes[pos..].starts_with(b"Infinity") {
        return pos + "Infinity".len();
    }

    let int_digits = count_digits(&bytes[pos..]);
    pos += int_digits;
    let mut frac_digits = 0;
    if bytes.get(pos) == Some(&b'.') {
        frac_digits = count_digits(&bytes[pos + 1..]);
        if int_digits > 0 || frac_digits > 0 {
            pos += 1 + frac_digits;
        }
    }
    if int_digits == 0 && frac_digits == 0 {
        return 0;
    }

    // Exponent counts only when at least one digit follows it.
    if matches!(bytes.get(pos), Some(b'e' | b'E')) {
        let mut exp = pos + 1;
        if matches!(bytes.get(exp), Some(b'+' | b'-')) {
            exp += 1;
        }
        let exp_digits = count_digits(&bytes[exp..]);
        if exp_digits > 0 {
            pos = exp + exp_digits;
        }
    }
    pos
}

fn count_digits(bytes: &[u8]) -> usize {
    bytes.iter().take_while(|b| b.is_ascii_digit()).count()
}

pub fn parse_row(record: &RawRecord) -> Row {
    Row {
        file_a: record.file_a.clone(),
        file_b: record.file_b.clone(),
        corr: parse_correlation(&record.pcor_values),
    }
}

/// Run the rows phase: parse every record, preserving order.
pub fn run_rows_phase(records: &[RawRecord]) -> Vec<Row> {
    records.iter().map(parse_row).collect()
}

/// Number of rows whose correlation did not parse.
pub fn count_unparsable(rows: &[Row]) -> usize {
    rows.iter().filter(|r| r.corr.is_nan()).count()
}
