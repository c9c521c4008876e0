//! Comma-delimited claims reader with encoding auto-detection.
//!
//! Rows become [`RawRecord`]s keyed by the header line. Values are only
//! trimmed here, typing happens in [`crate::transform::normalize`].
//!
//! Double quotes toggle a "quoted" state in which commas do not split.
//! The quote characters themselves are dropped and escaped quotes are not
//! supported.

use std::path::Path;

use crate::error::{CsvError, CsvResult};
use crate::models::{DroppedRow, RawRecord};

const DELIMITER: char = ',';
const QUOTE: char = '"';

/// Result of parsing with metadata
#[derive(Debug, Clone)]
pub struct ParseResult {
    /// Rows whose field count matched the header
    pub records: Vec<RawRecord>,
    /// Column headers
    pub headers: Vec<String>,
    /// Detected or used encoding
    pub encoding: String,
    /// Rows discarded for a field count mismatch
    pub dropped: Vec<DroppedRow>,
}

/// Detect the encoding of raw bytes using chardet
pub fn detect_encoding(bytes: &[u8]) -> String {
    let result = chardet::detect(bytes);
    let charset = result.0;

    match charset.to_lowercase().as_str() {
        "" | "ascii" | "utf-8" | "utf8" => "utf-8".to_string(),
        "iso-8859-1" | "iso-8859-15" | "latin-1" | "latin1" => "iso-8859-1".to_string(),
        "windows-1252" | "cp1252" => "windows-1252".to_string(),
        _ => charset,
    }
}

/// Decode bytes to string using the specified encoding
pub fn decode_content(bytes: &[u8], encoding: &str) -> CsvResult<String> {
    match encoding.to_lowercase().as_str() {
        "utf-8" | "utf8" | "ascii" => Ok(String::from_utf8_lossy(bytes).into_owned()),
        // WHATWG maps the latin1 label to windows-1252, which agrees with
        // ISO-8859-1 across 0xA0-0xFF.
        "iso-8859-1" | "latin-1" | "latin1" | "windows-1252" | "cp1252" => {
            Ok(encoding_rs::WINDOWS_1252.decode(bytes).0.into_owned())
        }
        other => match encoding_rs::Encoding::for_label(other.as_bytes()) {
            Some(enc) => {
                let (text, _, had_errors) = enc.decode(bytes);
                if had_errors {
                    Err(CsvError::Encoding(format!("invalid {} sequence", other)))
                } else {
                    Ok(text.into_owned())
                }
            }
            None => Ok(String::from_utf8_lossy(bytes).into_owned()),
        },
    }
}

/// Split one data line on commas that are outside double quotes.
///
/// A trailing comma yields a final empty field.
///
/// # Example
/// ```
/// use claimsreport::split_line;
///
/// assert_eq!(split_line(r#"1,"Doe, John",Pune"#), vec!["1", "Doe, John", "Pune"]);
/// assert_eq!(split_line("a,b,"), vec!["a", "b", ""]);
/// ```
pub fn split_line(line: &str) -> Vec<String> {
    let mut values = Vec::new();
    let mut current = String::new();
    let mut quoted = false;

    for ch in line.trim().chars() {
        match ch {
            QUOTE => quoted = !quoted,
            DELIMITER if !quoted => {
                values.push(current.trim().to_string());
                current.clear();
            }
            _ => current.push(ch),
        }
    }
    values.push(current.trim().to_string());

    values
}

/// Parse decoded CSV content.
pub fn parse_str(content: &str, encoding: impl Into<String>) -> CsvResult<ParseResult> {
    let encoding = encoding.into();
    let mut lines = content.lines();

    let Some(header_line) = lines.next() else {
        return Ok(ParseResult {
            records: Vec::new(),
            headers: Vec::new(),
            encoding,
            dropped: Vec::new(),
        });
    };
    let headers: Vec<String> = header_line
        .trim_start_matches('\u{feff}')
        .split(DELIMITER)
        .map(|h| h.trim().to_string())
        .collect();

    let mut records = Vec::new();
    let mut dropped = Vec::new();

    for (idx, line) in lines.enumerate() {
        let line_num = idx + 2; // +1 for 0-index, +1 for header
        let values = split_line(line);

        if values.len() != headers.len() {
            dropped.push(DroppedRow {
                line: line_num,
                expected: headers.len(),
                found: values.len(),
            });
            continue;
        }

        records.push(RawRecord {
            line: line_num,
            fields: zip_fields(&headers, values),
        });
    }

    Ok(ParseResult {
        records,
        headers,
        encoding,
        dropped,
    })
}

/// Pair header names with values. A repeated header keeps its first
/// position and the last value.
fn zip_fields(headers: &[String], values: Vec<String>) -> Vec<(String, String)> {
    let mut fields: Vec<(String, String)> = Vec::with_capacity(headers.len());
    for (name, value) in headers.iter().zip(values) {
        match fields.iter_mut().find(|(key, _)| key == name) {
            Some((_, existing)) => *existing = value,
            None => fields.push((name.clone(), value)),
        }
    }
    fields
}

/// Parse CSV bytes.
///
/// Valid UTF-8 is used as-is. Only other input goes through encoding
/// detection.
pub fn parse_bytes(bytes: &[u8]) -> CsvResult<ParseResult> {
    if let Ok(content) = std::str::from_utf8(bytes) {
        return parse_str(content, "utf-8");
    }

    let encoding = detect_encoding(bytes);
    let content = decode_content(bytes, &encoding)?;
    parse_str(&content, encoding)
}

/// Parse a claims file.
///
/// A missing or unreadable file is returned as [`CsvError::Io`] with the
/// original I/O error.
pub fn parse_file<P: AsRef<Path>>(path: P) -> CsvResult<ParseResult> {
    let bytes = std::fs::read(path.as_ref())?;
    parse_bytes(&bytes)
}
