//! Writer for .grd file format

use super::CellRecord;
use crate::error::Result;
use gridcalc_engine::engine::DEFAULT_COLOR;
use std::fs;
use std::path::Path;

/// Write cell records to a .grd file
pub fn write_grd(path: &Path, records: &[CellRecord]) -> Result<()> {
    let content = write_grd_content(records);
    fs::write(path, content)?;
    Ok(())
}

/// Write cell records to a .grd format string, one line per record in the
/// order given.
pub fn write_grd_content(records: &[CellRecord]) -> String {
    let mut lines = vec!["# Gridcalc Spreadsheet".to_string()];

    for record in records {
        let mut line = format!("{}: \"{}\"", record.name, escape_grd_text(&record.text));
        if record.color != DEFAULT_COLOR {
            line.push_str(&format!(" bg={:08X}", record.color));
        }
        lines.push(line);
    }

    lines.join("\n") + "\n"
}

fn escape_grd_text(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for ch in input.chars() {
        match ch {
            '\\' => out.push_str("\\\\"),
            '"' => out.push_str("\\\""),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            _ => out.push(ch),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::parse_grd_content;

    #[test]
    fn test_write_text() {
        let content = write_grd_content(&[CellRecord::new("A1", "Hello")]);
        assert_eq!(content, "# Gridcalc Spreadsheet\nA1: \"Hello\"\n");
    }

    #[test]
    fn test_write_color_only_when_set() {
        let records = [
            CellRecord::new("A1", "=B1*2"),
            CellRecord::new("B1", "").with_color(0xFF00_80FF),
        ];
        let content = write_grd_content(&records);
        let lines: Vec<_> = content.lines().collect();
        assert_eq!(lines[1], "A1: \"=B1*2\"");
        assert_eq!(lines[2], "B1: \"\" bg=FF0080FF");
    }

    #[test]
    fn test_escaped_text_reads_back() {
        let records = [CellRecord::new("C2", r#"a "quoted" \ path bg=00000000"#)];
        let content = write_grd_content(&records);
        assert_eq!(parse_grd_content(&content).unwrap(), records);
    }

    #[test]
    fn test_line_breaks_stay_on_one_line() {
        let records = [CellRecord::new("A1", "line one\nline two\r\nend")];
        let content = write_grd_content(&records);
        assert_eq!(content.lines().count(), 2);
        assert!(content.contains(r#"A1: "line one\nline two\r\nend""#), "{content}");
        assert_eq!(parse_grd_content(&content).unwrap(), records);
    }

    #[test]
    fn test_empty_record_set() {
        assert_eq!(write_grd_content(&[]), "# Gridcalc Spreadsheet\n");
        assert!(parse_grd_content(&write_grd_content(&[])).unwrap().is_empty());
    }
}
