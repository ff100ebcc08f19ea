//! Comma-separated seed format.
//!
//! ```text
//! width,height
//! v,v,...,v   <- `height` records of `width` values
//! ```

use std::fs;
use std::path::Path;

use tracing::{info, warn};

use crate::error::{Result, SandpileError};
use crate::grid::Grid;

/// Reads and parses a seed file.
pub fn read_grid(path: impl AsRef<Path>) -> Result<Grid> {
    let path = path.as_ref();
    let text = fs::read_to_string(path)?;
    info!(path = %path.display(), "reading initial configuration");
    parse_grid(&text)
}

/// Parses seed text into a grid.
pub fn parse_grid(text: &str) -> Result<Grid> {
    let mut records = text
        .lines()
        .enumerate()
        .map(|(n, line)| (n + 1, line.trim()))
        .filter(|(_, line)| !line.is_empty());

    let (header_line, header) = records
        .next()
        .ok_or_else(|| SandpileError::ingestion(1, "missing width,height header"))?;
    let dims = parse_record(header_line, header)?;
    let (width, height) = match dims[..] {
        [w, h] => (w as usize, h as usize),
        _ => {
            return Err(SandpileError::ingestion(
                header_line,
                format!("header must hold exactly width,height, found {} fields", dims.len()),
            ))
        }
    };
    if width == 0 || height == 0 {
        return Err(SandpileError::ingestion(
            header_line,
            format!("dimensions must be positive, got {}x{}", width, height),
        ));
    }
    info!(width, height, "declared grid dimensions");

    let cells = width.checked_mul(height).ok_or_else(|| {
        SandpileError::ingestion(
            header_line,
            format!("dimensions {}x{} are too large", width, height),
        )
    })?;
    // ヘッダは信用できないので確保量は入力の長さで抑える
    let mut data = Vec::with_capacity(cells.min(text.len()));
    for row in 0..height {
        let (line_no, line) = records.next().ok_or_else(|| {
            SandpileError::ingestion(
                header_line + row + 1,
                format!("expected {} rows, found {}", height, row),
            )
        })?;
        let values = parse_record(line_no, line)?;
        if values.len() != width {
            return Err(SandpileError::ingestion(
                line_no,
                format!("expected {} values, found {}", width, values.len()),
            ));
        }
        data.extend(values);
    }

    let extra = records.count();
    if extra > 0 {
        warn!(extra, "ignoring records beyond the declared height");
    }

    Grid::from_interior(height, width, data)
}

fn parse_record(line_no: usize, line: &str) -> Result<Vec<u32>> {
    line.split(',')
        .map(|field| {
            let field = field.trim();
            field.parse::<u32>().map_err(|e| {
                SandpileError::ingestion(line_no, format!("invalid value '{}': {}", field, e))
            })
        })
        .collect()
}
