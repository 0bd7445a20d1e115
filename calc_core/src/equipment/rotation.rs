//! Rotations: ordered `(command, index)` cell sequences.
//!
//! The reference implementation left its string loader as a stub that
//! always produced an empty rotation. `parse`/`parse_lines` below are the
//! real implementation: whitespace-split, first token is the command name,
//! an optional second token is the numeric index (defaulting to 0).

use crate::error::{CoreError, CoreResult};

#[derive(Debug, Clone, PartialEq)]
pub struct RotationCell {
    pub command: String,
    pub index: u64,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Rotation {
    pub cells: Vec<RotationCell>,
}

impl Rotation {
    pub fn new(cells: Vec<RotationCell>) -> Rotation {
        Rotation { cells }
    }

    /// Parse a single `"command [index]"` cell.
    fn parse_cell(text: &str) -> CoreResult<RotationCell> {
        let mut parts = text.split_whitespace();
        let command = parts
            .next()
            .ok_or_else(|| CoreError::Parse(format!("empty rotation cell: {text:?}")))?
            .to_string();
        let index = match parts.next() {
            Some(raw) => raw
                .parse()
                .map_err(|_| CoreError::Parse(format!("invalid rotation index: {raw:?}")))?,
            None => 0,
        };
        Ok(RotationCell { command, index })
    }

    /// Parse one cell per array entry, e.g. the inline `"rotation": [...]`
    /// form of a damage request.
    pub fn parse_cells(cells: &[String]) -> CoreResult<Rotation> {
        let cells = cells
            .iter()
            .map(|s| Rotation::parse_cell(s))
            .collect::<CoreResult<Vec<_>>>()?;
        Ok(Rotation::new(cells))
    }

    /// Parse a newline-separated on-disk rotation document, one cell per line.
    pub fn parse(source: &str) -> CoreResult<Rotation> {
        let cells = source
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .map(Rotation::parse_cell)
            .collect::<CoreResult<Vec<_>>>()?;
        Ok(Rotation::new(cells))
    }

    /// Build a rotation from its cached on-disk tree: `{"cells": ["basic_1 1", ...]}`.
    pub fn from_json(value: &serde_json::Value) -> CoreResult<Rotation> {
        let cells = value
            .get("cells")
            .and_then(serde_json::Value::as_array)
            .ok_or_else(|| CoreError::Parse("rotation is missing 'cells'".to_string()))?
            .iter()
            .map(|v| {
                v.as_str()
                    .ok_or_else(|| CoreError::Parse("rotation cell must be a string".to_string()))
                    .map(str::to_string)
            })
            .collect::<CoreResult<Vec<_>>>()?;
        Rotation::parse_cells(&cells)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_command_and_index() {
        let rotation = Rotation::parse("basic_1 1\nbasic_2 2").unwrap();
        assert_eq!(
            rotation.cells,
            vec![
                RotationCell { command: "basic_1".into(), index: 1 },
                RotationCell { command: "basic_2".into(), index: 2 },
            ]
        );
    }

    #[test]
    fn missing_index_defaults_to_zero() {
        let rotation = Rotation::parse("anomaly_proc").unwrap();
        assert_eq!(rotation.cells[0].index, 0);
    }

    #[test]
    fn blank_lines_are_skipped() {
        let rotation = Rotation::parse("basic_1 1\n\n\nbasic_2 2\n").unwrap();
        assert_eq!(rotation.cells.len(), 2);
    }

    #[test]
    fn parse_cells_handles_inline_request_arrays() {
        let rotation =
            Rotation::parse_cells(&["basic_1 1".to_string(), "dash 0".to_string()]).unwrap();
        assert_eq!(rotation.cells.len(), 2);
        assert_eq!(rotation.cells[1].index, 0);
    }

    #[test]
    fn non_numeric_index_is_a_parse_error() {
        assert!(Rotation::parse("basic_1 not_a_number").is_err());
    }

    #[test]
    fn from_json_reads_a_cached_cell_list() {
        let value = serde_json::json!({"cells": ["basic_1 1", "dash"]});
        let rotation = Rotation::from_json(&value).unwrap();
        assert_eq!(rotation.cells.len(), 2);
        assert_eq!(rotation.cells[1].index, 0);
    }
}
