// Decoding uploaded files into raw rows. This is the only place that reads
// from disk; everything after it works on `RawRow`s in memory.
use crate::error::InsightError;
use crate::types::RawRow;
use calamine::{open_workbook_auto_from_rs, Data, Reader};
use csv::ReaderBuilder;
use serde_json::{Number, Value};
use std::fs;
use std::io::Cursor;
use std::path::Path;
use tracing::{info, warn};

const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";

/// Decode delimited text. Each record becomes a row keyed by its header;
/// records the reader cannot parse are skipped with a warning.
pub fn decode_delimited(bytes: &[u8], delimiter: u8) -> Result<Vec<RawRow>, InsightError> {
    let bytes = bytes.strip_prefix(UTF8_BOM).unwrap_or(bytes);
    // `flexible(true)` tolerates short or long rows from hand-edited sheets.
    let mut rdr = ReaderBuilder::new()
        .delimiter(delimiter)
        .flexible(true)
        .from_reader(bytes);
    let headers = rdr.headers()?.clone();

    let mut rows = Vec::new();
    let mut skipped = 0usize;
    for (idx, result) in rdr.records().enumerate() {
        let record = match result {
            Ok(r) => r,
            Err(e) => {
                warn!(row = idx + 2, error = %e, "skipping unreadable record");
                skipped += 1;
                continue;
            }
        };
        let mut row = RawRow::new();
        for (label, cell) in headers.iter().zip(record.iter()) {
            // Duplicate headers: the leftmost column wins.
            row.entry(label.to_string())
                .or_insert_with(|| Value::String(cell.to_string()));
        }
        rows.push(row);
    }
    info!(rows = rows.len(), skipped, "decoded delimited file");
    Ok(rows)
}

pub fn decode_csv(bytes: &[u8]) -> Result<Vec<RawRow>, InsightError> {
    decode_delimited(bytes, b',')
}

/// Decode a JSON array of objects. Cells keep their JSON types, so numeric
/// amounts and serial dates arrive as numbers.
pub fn decode_json(bytes: &[u8]) -> Result<Vec<RawRow>, InsightError> {
    let bytes = bytes.strip_prefix(UTF8_BOM).unwrap_or(bytes);
    let Value::Array(items) = serde_json::from_slice::<Value>(bytes)? else {
        return Err(InsightError::NotAnArray);
    };
    let rows = items
        .into_iter()
        .enumerate()
        .map(|(idx, item)| match item {
            Value::Object(map) => Ok(map),
            _ => Err(InsightError::NotAnObject(idx + 1)),
        })
        .collect::<Result<Vec<_>, _>>()?;
    info!(rows = rows.len(), "decoded JSON file");
    Ok(rows)
}

/// Decode the first sheet of an Excel (xls, xlsx, xlsm) or ODS workbook.
/// The first row is the header; fully empty rows are skipped. Dates stay
/// spreadsheet serial numbers, which normalization understands.
pub fn decode_xlsx(bytes: &[u8]) -> Result<Vec<RawRow>, InsightError> {
    let mut workbook = open_workbook_auto_from_rs(Cursor::new(bytes.to_vec()))?;
    let range = workbook
        .worksheet_range_at(0)
        .ok_or(InsightError::EmptyWorkbook)??;

    let mut records = range.rows();
    let Some(header) = records.next() else {
        return Ok(Vec::new());
    };
    let labels: Vec<String> = header.iter().map(|cell| cell.to_string()).collect();

    let mut rows = Vec::new();
    for cells in records {
        let mut row = RawRow::new();
        for (label, cell) in labels.iter().zip(cells) {
            if label.is_empty() {
                continue;
            }
            if let Some(value) = cell_value(cell) {
                row.entry(label.clone()).or_insert(value);
            }
        }
        if !row.is_empty() {
            rows.push(row);
        }
    }
    info!(rows = rows.len(), "decoded workbook");
    Ok(rows)
}

fn cell_value(cell: &Data) -> Option<Value> {
    match cell {
        Data::String(s) | Data::DateTimeIso(s) => Some(Value::String(s.clone())),
        Data::Int(i) => Some(Value::from(*i)),
        Data::Float(f) => Number::from_f64(*f).map(Value::Number),
        Data::Bool(b) => Some(Value::Bool(*b)),
        Data::DateTime(dt) => Number::from_f64(dt.as_f64()).map(Value::Number),
        _ => None,
    }
}

/// Read `path` and decode it according to its extension.
pub fn load_path(path: &Path) -> Result<Vec<RawRow>, InsightError> {
    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase)
        .unwrap_or_default();
    let decode: fn(&[u8]) -> Result<Vec<RawRow>, InsightError> = match extension.as_str() {
        "csv" | "txt" => decode_csv,
        "tsv" => |bytes| decode_delimited(bytes, b'\t'),
        "json" => decode_json,
        "xlsx" | "xlsm" | "xls" | "ods" => decode_xlsx,
        _ => return Err(InsightError::UnsupportedFormat(path.display().to_string())),
    };
    let bytes = fs::read(path)?;
    decode(&bytes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn csv_rows_keyed_by_header() {
        let rows = decode_csv("売上請求日,顧客名,金額\n2024-01-05,Acme,\"1,200\"\n".as_bytes()).unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0]["顧客名"], json!("Acme"));
        assert_eq!(rows[0]["金額"], json!("1,200"));
    }

    #[test]
    fn csv_strips_bom_and_tolerates_short_rows() {
        let mut bytes = UTF8_BOM.to_vec();
        bytes.extend_from_slice(b"date,client,amount\n2024-01-05,Acme\n");
        let rows = decode_csv(&bytes).unwrap();
        assert_eq!(rows[0]["date"], json!("2024-01-05"));
        assert!(rows[0].get("amount").is_none());
    }

    #[test]
    fn duplicate_headers_keep_leftmost() {
        let rows = decode_csv(b"amount,amount\n1,2\n").unwrap();
        assert_eq!(rows[0]["amount"], json!("1"));
    }

    #[test]
    fn tsv_uses_tabs() {
        let rows = decode_delimited(b"date\tamount\n2024-01-05\t300\n", b'\t').unwrap();
        assert_eq!(rows[0]["amount"], json!("300"));
    }

    #[test]
    fn json_keeps_types() {
        let rows = decode_json(br#"[{"date": 45306, "amount": 12.5}]"#).unwrap();
        assert_eq!(rows[0]["date"], json!(45306));
        assert_eq!(rows[0]["amount"], json!(12.5));
    }

    #[test]
    fn json_shape_errors() {
        assert!(matches!(decode_json(br#"{"a": 1}"#), Err(InsightError::NotAnArray)));
        assert!(matches!(decode_json(br#"[{"a": 1}, 2]"#), Err(InsightError::NotAnObject(2))));
        assert!(matches!(decode_json(b"not json"), Err(InsightError::Json(_))));
    }

    #[test]
    fn workbook_first_sheet_keyed_by_header() {
        let mut workbook = rust_xlsxwriter::Workbook::new();
        let sheet = workbook.add_worksheet();
        sheet.write_string(0, 0, "売上請求日").unwrap();
        sheet.write_string(0, 1, "顧客名").unwrap();
        sheet.write_string(0, 2, "金額").unwrap();
        sheet.write_number(1, 0, 45306.0).unwrap();
        sheet.write_string(1, 1, "Acme").unwrap();
        sheet.write_number(1, 2, 1200.0).unwrap();
        sheet.write_string(3, 0, "2024-02-01").unwrap();
        let bytes = workbook.save_to_buffer().unwrap();

        let rows = decode_xlsx(&bytes).unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0]["顧客名"], json!("Acme"));
        assert_eq!(rows[0]["金額"].as_f64(), Some(1200.0));
        assert_eq!(rows[0]["売上請求日"].as_f64(), Some(45306.0));
        assert_eq!(rows[1]["売上請求日"], json!("2024-02-01"));
        assert!(rows[1].get("金額").is_none());
    }

    #[test]
    fn garbage_workbook_is_an_excel_error() {
        assert!(matches!(decode_xlsx(b"not a workbook"), Err(InsightError::Excel(_))));
    }

    #[test]
    fn unknown_extension_is_rejected() {
        let err = load_path(Path::new("sales.pdf")).unwrap_err();
        assert!(matches!(err, InsightError::UnsupportedFormat(_)));
    }
}
