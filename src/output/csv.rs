//! Two-line CSV rendering of a record: a header row and a value row

use crate::output::{Formatter, OutputResult};
use crate::record::GameRecord;
use std::io::{self, Write};

const SEPARATOR: char = ',';

fn needs_quotes(field: &str) -> bool {
    field.contains(SEPARATOR) || field.contains('"') || field.contains('\n') || field.contains('\r')
}

/// Writes a single CSV row, quoting cells as needed
pub fn write_row<W: Write>(mut w: W, row: &[String]) -> io::Result<()> {
    let mut first = true;
    for cell in row {
        if !first {
            write!(w, "{}", SEPARATOR)?;
        } else {
            first = false;
        }
        if needs_quotes(cell) {
            write!(w, "\"{}\"", cell.replace('"', "\"\""))?;
        } else {
            write!(w, "{}", cell)?;
        }
    }
    writeln!(w)
}

/// CSV rendering
///
/// Columns are `success`, `image_url`, one `price_<category>` per price key
/// and one `detail_<field>` per populated detail. Missing values are empty
/// cells.
#[derive(Debug, Clone, Copy, Default)]
pub struct CsvFormatter;

impl Formatter for CsvFormatter {
    fn format(&self, record: &GameRecord) -> OutputResult<String> {
        let mut headers = vec!["success".to_string(), "image_url".to_string()];
        let mut row = vec![
            record.success.to_string(),
            record.image_url.clone().unwrap_or_default(),
        ];

        for (category, price) in &record.prices {
            headers.push(format!("price_{}", category.as_str()));
            row.push(price.map(|p| p.to_string()).unwrap_or_default());
        }

        for (field, value) in record.details.populated() {
            headers.push(format!("detail_{}", field));
            row.push(value);
        }

        let mut out = Vec::new();
        write_row(&mut out, &headers)?;
        write_row(&mut out, &row)?;
        Ok(String::from_utf8_lossy(&out).into_owned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::PriceCategory;

    #[test]
    fn test_error_record() {
        let csv = CsvFormatter.format(&GameRecord::error(1)).unwrap();
        assert_eq!(csv, "success,image_url\nfalse,\n");
    }

    #[test]
    fn test_prices_and_details() {
        let mut record = GameRecord::new(1);
        record.image_url = Some("https://storage.googleapis.com/a.jpg".to_string());
        record.prices.insert(PriceCategory::Loose, Some(12.5));
        record.details.publisher = Some("Microsoft, Inc.".to_string());
        record.details.upc = Some(vec!["1".to_string(), "2".to_string()]);

        let csv = CsvFormatter.format(&record).unwrap();
        let lines: Vec<&str> = csv.lines().collect();

        assert_eq!(lines.len(), 2);
        assert!(lines[0].starts_with("success,image_url,price_loose,price_item_box,"));
        assert!(lines[0].ends_with("price_manual_only,detail_publisher,detail_upc"));
        assert!(lines[1].starts_with("true,https://storage.googleapis.com/a.jpg,12.5,,"));
        assert!(lines[1].ends_with(",\"Microsoft, Inc.\",\"1, 2\""));
    }

    #[test]
    fn test_quotes_escaped() {
        let mut out = Vec::new();
        write_row(&mut out, &["say \"hi\"".to_string(), "plain".to_string()]).unwrap();
        assert_eq!(String::from_utf8(out).unwrap(), "\"say \"\"hi\"\"\",plain\n");
    }
}
