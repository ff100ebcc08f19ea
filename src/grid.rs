use std::fmt;

use crate::error::{Result, SandpileError};

pub const SEQUENTIAL_THRESHOLD: usize = 10; // これ以下の行数は逐次処理
pub const MAX_GRAINS: u32 = u32::MAX - 3; // 安定化中の最大値の増分は高々3

/// Which of the two buffers to read from.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Buffer {
    Current,
    Next,
}

/*
  Double-buffered sandpile grid

  Layout:
  - Interior of `rows` x `cols` cells, embedded at offset (1, 1)
  - One-cell sink border on every side, always 0 in both buffers
  - Both buffers are flat row-major Vec<u32> with stride `cols + 2`

  A pass reads only `current` and writes only the interior of `next`.
*/
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Grid {
    rows: usize,
    cols: usize,
    current: Vec<u32>,
    next: Vec<u32>,
}

impl Grid {
    /// Builds a grid from a rectangular interior configuration.
    pub fn new(initial: &[Vec<u32>]) -> Result<Self> {
        let rows = initial.len();
        let cols = initial.first().map(Vec::len).unwrap_or(0);
        if rows == 0 || cols == 0 {
            return Err(SandpileError::InvalidDimension(
                "initial configuration is empty".to_string(),
            ));
        }
        if let Some((r, row)) = initial.iter().enumerate().find(|(_, row)| row.len() != cols) {
            return Err(SandpileError::InvalidDimension(format!(
                "row {} has {} cells, expected {}",
                r,
                row.len(),
                cols
            )));
        }

        let data = initial.iter().flatten().copied().collect();
        Self::from_interior(rows, cols, data)
    }

    /// Builds a grid from a flat row-major interior of `rows * cols` values.
    pub fn from_interior(rows: usize, cols: usize, data: Vec<u32>) -> Result<Self> {
        if rows == 0 || cols == 0 {
            return Err(SandpileError::InvalidDimension(format!(
                "grid must be at least 1x1, got {}x{}",
                cols, rows
            )));
        }
        let cells = interior_cells(rows, cols)?;
        let padded = padded_cells(rows, cols)?;
        if data.len() != cells {
            return Err(SandpileError::InvalidDimension(format!(
                "expected {} cells for {}x{}, got {}",
                cells,
                cols,
                rows,
                data.len()
            )));
        }

        let stride = cols + 2;
        let mut current = filled(padded, 0)?;
        for (idx, &value) in data.iter().enumerate() {
            let (r, c) = (idx / cols, idx % cols);
            if value > MAX_GRAINS {
                return Err(SandpileError::GrainOverflow { row: r, col: c, value });
            }
            current[(r + 1) * stride + c + 1] = value;
        }
        let next = filled(current.len(), 0)?;

        Ok(Grid {
            rows,
            cols,
            current,
            next,
        })
    }

    /// Every interior cell holds `value`.
    pub fn uniform(rows: usize, cols: usize, value: u32) -> Result<Self> {
        let cells = interior_cells(rows, cols)?;
        Self::from_interior(rows, cols, filled(cells, value)?)
    }

    /// Interior height.
    pub fn rows(&self) -> usize {
        self.rows
    }

    /// Interior width.
    pub fn cols(&self) -> usize {
        self.cols
    }

    /// Padded row length (`cols + 2`).
    pub fn stride(&self) -> usize {
        self.cols + 2
    }

    /// Padded height (`rows + 2`).
    pub fn padded_rows(&self) -> usize {
        self.rows + 2
    }

    pub fn current(&self) -> &[u32] {
        &self.current
    }

    pub fn next(&self) -> &[u32] {
        &self.next
    }

    /// Reads a cell in padded coordinates; row 0 and col 0 are the border.
    pub fn value_at(&self, buffer: Buffer, row: usize, col: usize) -> Result<u32> {
        let idx = self.index(row, col)?;
        Ok(match buffer {
            Buffer::Current => self.current[idx],
            Buffer::Next => self.next[idx],
        })
    }

    /// Writes an interior cell of `next`. Border cells are rejected.
    pub fn set_next(&mut self, row: usize, col: usize, value: u32) -> Result<()> {
        let idx = self.index(row, col)?;
        if !self.is_interior(row, col) {
            return Err(SandpileError::BorderWrite { row, col });
        }
        self.next[idx] = value;
        Ok(())
    }

    pub fn is_interior(&self, row: usize, col: usize) -> bool {
        (1..=self.rows).contains(&row) && (1..=self.cols).contains(&col)
    }

    fn index(&self, row: usize, col: usize) -> Result<usize> {
        if row >= self.padded_rows() || col >= self.stride() {
            return Err(SandpileError::OutOfBounds {
                row,
                col,
                rows: self.padded_rows(),
                cols: self.stride(),
            });
        }
        Ok(row * self.stride() + col)
    }

    /// Read view of `current` plus exclusive access to the interior rows of `next`.
    ///
    /// The returned write slice starts at padded row 1 and spans `rows` full
    /// padded rows, border columns included (the stencil never touches them).
    pub fn sweep_buffers(&mut self) -> (&[u32], &mut [u32]) {
        let stride = self.stride();
        let interior = stride..(self.rows + 1) * stride;
        (&self.current[..], &mut self.next[interior])
    }

    /// Copies `next` into `current` over the interior rows.
    pub fn commit(&mut self) {
        let stride = self.stride();
        let interior = stride..(self.rows + 1) * stride;
        // 境界列はどちらのバッファでも0なので行単位でまとめてコピーしてよい
        self.current[interior.clone()].copy_from_slice(&self.next[interior]);
    }

    /// True iff both buffers agree on every interior cell.
    pub fn equals_current_next(&self) -> bool {
        let stride = self.stride();
        (1..=self.rows).all(|i| {
            let row = i * stride + 1..i * stride + 1 + self.cols;
            self.current[row.clone()] == self.next[row]
        })
    }

    /// Total grains held in `current`.
    pub fn total_grains(&self) -> u64 {
        self.current.iter().map(|&v| v as u64).sum()
    }

    /// Grains the next pass will push off the interior into the sink.
    pub fn border_outflow(&self) -> u64 {
        let stride = self.stride();
        let mut absorbed = 0u64;
        for i in 1..=self.rows {
            for j in 1..=self.cols {
                let share = (self.current[i * stride + j] / 4) as u64;
                let border_sides = [i == 1, i == self.rows, j == 1, j == self.cols]
                    .iter()
                    .filter(|&&edge| edge)
                    .count() as u64;
                absorbed += share * border_sides;
            }
        }
        absorbed
    }

    /// Interior of `current` as nested rows.
    pub fn interior(&self) -> Vec<Vec<u32>> {
        let stride = self.stride();
        (1..=self.rows)
            .map(|i| self.current[i * stride + 1..i * stride + 1 + self.cols].to_vec())
            .collect()
    }

    /// `current` including the border, as nested rows.
    pub fn padded(&self) -> Vec<Vec<u32>> {
        self.current.chunks(self.stride()).map(<[u32]>::to_vec).collect()
    }
}

fn interior_cells(rows: usize, cols: usize) -> Result<usize> {
    rows.checked_mul(cols).ok_or_else(|| {
        SandpileError::InvalidDimension(format!("{}x{} grid is too large", cols, rows))
    })
}

// 境界込みのセル数 (rows + 2) * (cols + 2)
fn padded_cells(rows: usize, cols: usize) -> Result<usize> {
    rows.checked_add(2)
        .zip(cols.checked_add(2))
        .and_then(|(r, c)| r.checked_mul(c))
        .ok_or_else(|| {
            SandpileError::InvalidDimension(format!("{}x{} grid is too large", cols, rows))
        })
}

// 確保できないサイズはパニックではなくエラーにする
fn filled(len: usize, value: u32) -> Result<Vec<u32>> {
    let mut buffer = Vec::new();
    buffer.try_reserve_exact(len).map_err(|e| {
        SandpileError::InvalidDimension(format!("cannot allocate {} cells: {}", len, e))
    })?;
    buffer.resize(len, value);
    Ok(buffer)
}

// 内部領域を枠付きで表示（0のセルは空白）
impl fmt::Display for Grid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let rule = "  --".repeat(self.cols);
        writeln!(f, "+{}+", rule)?;
        for row in self.interior() {
            write!(f, "|")?;
            for value in row {
                if value > 0 {
                    write!(f, "{:4}", value)?;
                } else {
                    write!(f, "    ")?;
                }
            }
            writeln!(f, "|")?;
        }
        writeln!(f, "+{}+", rule)
    }
}
