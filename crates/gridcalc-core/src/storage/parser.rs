//! Parser for .grd file format

use super::CellRecord;
use crate::error::{GridcalcError, Result};
use gridcalc_engine::engine::{CellRef, DEFAULT_COLOR};
use std::fs;
use std::path::Path;

/// Parse a .grd file into cell records
pub fn parse_grd(path: &Path) -> Result<Vec<CellRecord>> {
    let content = fs::read_to_string(path)?;
    parse_grd_content(&content)
}

/// Parse .grd content from a string
pub fn parse_grd_content(content: &str) -> Result<Vec<CellRecord>> {
    let mut records = Vec::new();

    for (line_num, line) in content.lines().enumerate() {
        let line = line.trim();

        // Skip empty lines and comments
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        let parse_error = |message: String| GridcalcError::Parse {
            line: line_num + 1,
            message,
        };

        // Parse "CELLREF: VALUE [bg=AARRGGBB]" format
        let Some((name, value)) = line.split_once(':') else {
            return Err(parse_error("Expected 'CELLREF: VALUE' format".to_string()));
        };

        let name = name.trim();
        let cell_ref = CellRef::from_str(name)
            .ok_or_else(|| parse_error(format!("Invalid cell reference: {}", name)))?;

        let (text, rest) = split_value(value.trim()).map_err(parse_error)?;
        let color = parse_color(rest).map_err(parse_error)?;

        records.push(CellRecord {
            name: cell_ref.to_string(),
            text,
            color,
        });
    }

    Ok(records)
}

/// Split a value into its text and whatever follows it.
///
/// Quoted text ends at the first unescaped quote. Unquoted text runs up to an
/// optional trailing `bg=` field.
fn split_value(value: &str) -> std::result::Result<(String, &str), String> {
    let Some(quoted) = value.strip_prefix('"') else {
        return Ok(match value.rsplit_once(" bg=") {
            Some((text, _)) => (text.trim_end().to_string(), &value[text.len() + 1..]),
            None => (value.to_string(), ""),
        });
    };

    let mut out = String::with_capacity(quoted.len());
    let mut chars = quoted.char_indices();
    while let Some((i, ch)) = chars.next() {
        match ch {
            '"' => return Ok((out, &quoted[i + 1..])),
            '\\' => match chars.next() {
                Some((_, '\\')) => out.push('\\'),
                Some((_, '"')) => out.push('"'),
                Some((_, 'n')) => out.push('\n'),
                Some((_, 'r')) => out.push('\r'),
                Some((_, other)) => {
                    out.push('\\');
                    out.push(other);
                }
                None => out.push('\\'),
            },
            _ => out.push(ch),
        }
    }
    Err("Unterminated quoted text".to_string())
}

fn parse_color(rest: &str) -> std::result::Result<u32, String> {
    let rest = rest.trim();
    if rest.is_empty() {
        return Ok(DEFAULT_COLOR);
    }
    let Some(hex) = rest.strip_prefix("bg=") else {
        return Err(format!("Unexpected trailing content: {}", rest));
    };
    if hex.len() != 8 {
        return Err(format!("Color must be 8 hex digits: {}", hex));
    }
    u32::from_str_radix(hex, 16).map_err(|_| format!("Invalid color: {}", hex))
}
