//! RFC 4180 CSV as the exchange files use it: UTF-8 with a byte-order mark,
//! CRLF line endings, and fields quoted only when they must be.

use std::collections::HashMap;

use csv::{QuoteStyle, ReaderBuilder, Terminator, WriterBuilder};
use pinboard_core::{PinboardError, PinboardResult};

pub const BOM: char = '\u{feff}';

/// Render a table. Every row must have one field per header.
pub fn to_csv<R>(headers: &[&str], rows: R) -> PinboardResult<String>
where
    R: IntoIterator<Item = Vec<String>>,
{
    let mut out = Vec::new();
    let mut bom = [0u8; 4];
    out.extend_from_slice(BOM.encode_utf8(&mut bom).as_bytes());

    let mut writer = WriterBuilder::new()
        .terminator(Terminator::CRLF)
        .quote_style(QuoteStyle::Necessary)
        .from_writer(out);
    writer.write_record(headers).map_err(write_error)?;
    for row in rows {
        writer.write_record(&row).map_err(write_error)?;
    }
    let bytes = writer
        .into_inner()
        .map_err(|err| PinboardError::Serialization(err.to_string()))?;
    String::from_utf8(bytes).map_err(|err| PinboardError::Serialization(err.to_string()))
}

fn write_error(err: csv::Error) -> PinboardError {
    PinboardError::Serialization(format!("writing csv: {}", err))
}

/// A parsed table. Rows are keyed by header; short rows are padded with
/// empty strings and surplus fields are dropped.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CsvTable {
    pub headers: Vec<String>,
    pub rows: Vec<HashMap<String, String>>,
}

impl CsvTable {
    pub fn has_header(&self, name: &str) -> bool {
        self.headers.iter().any(|h| h == name)
    }

    /// Field of row `index`, empty when the column is absent.
    pub fn field(&self, index: usize, name: &str) -> &str {
        self.rows
            .get(index)
            .and_then(|row| row.get(name))
            .map(String::as_str)
            .unwrap_or("")
    }
}

/// Lenient parser: a leading BOM is skipped, ragged rows are accepted and
/// blank lines are ignored. Errors carry the line the reader stopped on.
pub fn parse_csv(text: &str) -> Result<CsvTable, csv::Error> {
    let text = text.strip_prefix(BOM).unwrap_or(text);
    let mut reader = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(text.as_bytes());

    let headers: Vec<String> = reader.headers()?.iter().map(str::to_string).collect();
    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record?;
        let row = headers
            .iter()
            .enumerate()
            .map(|(i, h)| (h.clone(), record.get(i).unwrap_or_default().to_string()))
            .collect();
        rows.push(row);
    }

    Ok(CsvTable { headers, rows })
}

/// 1-based line a parse error was reported on, 0 when unknown.
pub fn error_line(err: &csv::Error) -> usize {
    err.position().map(|pos| pos.line() as usize).unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(fields: &[&str]) -> Vec<String> {
        fields.iter().map(|f| f.to_string()).collect()
    }

    #[test]
    fn test_writer_adds_bom_crlf_and_quotes() {
        let csv = to_csv(
            &["id", "title"],
            vec![row(&["1", "plain"]), row(&["2", "has, comma and \"quotes\""])],
        )
        .unwrap();
        assert_eq!(
            csv,
            "\u{feff}id,title\r\n1,plain\r\n2,\"has, comma and \"\"quotes\"\"\"\r\n"
        );
    }

    #[test]
    fn test_parser_handles_quotes_and_newlines() {
        let table =
            parse_csv("\u{feff}id,title\r\n1,\"multi\r\nline, \"\"quoted\"\"\"\r\n").unwrap();
        assert_eq!(table.headers, vec!["id", "title"]);
        assert_eq!(table.rows.len(), 1);
        assert_eq!(table.field(0, "title"), "multi\r\nline, \"quoted\"");
    }

    #[test]
    fn test_parser_pads_short_rows_and_skips_blank_lines() {
        let table = parse_csv("a,b,c\n1\n\n\n2,x,y,z\n").unwrap();
        assert_eq!(table.rows.len(), 2);
        assert_eq!(table.field(0, "b"), "");
        assert_eq!(table.field(1, "c"), "y");
        assert_eq!(table.rows[1].len(), 3);
    }

    #[test]
    fn test_empty_input() {
        assert_eq!(parse_csv("").unwrap(), CsvTable::default());
        let headers_only = parse_csv("\u{feff}id,name,order\r\n").unwrap();
        assert!(headers_only.has_header("order"));
        assert!(headers_only.rows.is_empty());
    }

    #[test]
    fn test_writer_output_parses_back() {
        let written = to_csv(&["label"], vec![row(&["a\"b,c"]), row(&[""])]).unwrap();
        let table = parse_csv(&written).unwrap();
        assert_eq!(table.field(0, "label"), "a\"b,c");
        // A lone empty field is written quoted, so the row survives.
        assert_eq!(table.rows.len(), 2);
        assert_eq!(table.field(1, "label"), "");
    }
}
