//! Playfield occupancy and line clearing
//!
//! Locked blocks live in an arena; the occupancy matrix stores arena indices.

use crate::block::{cell_index, Block};

/// Field dimensions
pub const COLUMNS: usize = 10;
pub const ROWS: usize = 20;

/// Result of depositing a piece into the grid
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct LockOutcome {
    /// Blocks written into the grid
    pub placed: usize,
    /// Blocks that could not enter the grid (above the field or on a taken cell)
    pub overflow: usize,
}

impl LockOutcome {
    /// The piece locked with part of it outside the field
    pub fn is_block_out(&self) -> bool {
        self.overflow > 0
    }
}

/// The playfield
#[derive(Debug, Clone)]
pub struct Grid {
    /// Locked blocks
    blocks: Vec<Block>,
    /// `[row][col]` -> index into `blocks`, row 0 is the top
    cells: [[Option<usize>; COLUMNS]; ROWS],
}

impl Default for Grid {
    fn default() -> Self {
        Self::new()
    }
}

impl Grid {
    /// Create an empty grid
    pub fn new() -> Self {
        Self {
            blocks: Vec::with_capacity(ROWS * COLUMNS),
            cells: [[None; COLUMNS]; ROWS],
        }
    }

    /// Whether `(row, col)` holds a locked block.
    /// Positions off the grid are never occupied.
    pub fn is_occupied(&self, row: i32, col: i32) -> bool {
        self.get(row, col).is_some()
    }

    /// The locked block at `(row, col)`, if any
    pub fn get(&self, row: i32, col: i32) -> Option<&Block> {
        let (r, c) = cell_index(row, col)?;
        self.cells[r][c].map(|idx| &self.blocks[idx])
    }

    /// Number of locked blocks
    #[allow(dead_code)]
    pub fn len(&self) -> usize {
        self.blocks.len()
    }

    #[allow(dead_code)]
    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }

    /// Deposit blocks into their cells
    pub fn lock(&mut self, blocks: &[Block]) -> LockOutcome {
        let mut outcome = LockOutcome::default();

        for block in blocks {
            let Some((r, c)) = block.cell() else {
                outcome.overflow += 1;
                continue;
            };
            if self.cells[r][c].is_some() {
                tracing::warn!(row = r, col = c, "lock onto occupied cell, dropping block");
                outcome.overflow += 1;
                continue;
            }
            self.cells[r][c] = Some(self.blocks.len());
            self.blocks.push(*block);
            outcome.placed += 1;
        }

        outcome
    }

    /// Remove full rows, compact the rest and return the number of rows cleared
    pub fn clear_completed_rows(&mut self) -> usize {
        let full: Vec<i32> = (0..ROWS)
            .filter(|&row| self.is_row_full(row))
            .map(|row| row as i32)
            .collect();

        if full.is_empty() {
            return 0;
        }

        self.blocks.retain(|block| !full.contains(&block.row));

        // Each survivor drops by the number of cleared rows below its original row
        for block in &mut self.blocks {
            let drop = full.iter().filter(|&&row| row > block.row).count() as i32;
            block.row += drop;
        }

        self.rebuild();
        tracing::debug!(rows = ?full, "cleared rows");
        full.len()
    }

    /// Check if a row is completely filled
    fn is_row_full(&self, row: usize) -> bool {
        self.cells[row].iter().all(|cell| cell.is_some())
    }

    /// Rebuild the occupancy matrix from the arena
    fn rebuild(&mut self) {
        self.cells = [[None; COLUMNS]; ROWS];
        for (idx, block) in self.blocks.iter().enumerate() {
            if let Some((r, c)) = block.cell() {
                self.cells[r][c] = Some(idx);
            }
        }
    }

    /// Every arena block sits in its own cell and every cell points back at it
    #[allow(dead_code)]
    pub fn check_invariants(&self) -> bool {
        let mut seen = 0;
        for (r, row) in self.cells.iter().enumerate() {
            for (c, cell) in row.iter().enumerate() {
                if let Some(idx) = *cell {
                    match self.blocks.get(idx) {
                        Some(block) if block.cell() == Some((r, c)) => seen += 1,
                        _ => return false,
                    }
                }
            }
        }
        seen == self.blocks.len()
    }
}
