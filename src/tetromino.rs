//! Active falling piece logic

use crate::block::Block;
use crate::grid::{COLUMNS, Grid, LockOutcome, ROWS};
use crate::shape::Shape;

/// Spawn anchor `(col, row)`: centre column, one row above the field
pub const SPAWN_COL: i32 = (COLUMNS / 2) as i32;
pub const SPAWN_ROW: i32 = -1;

/// Result of one downward step
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    /// The piece moved down one row
    Fell,
    /// The piece could not move and was written into the grid
    Locked(LockOutcome),
}

/// A row the piece may occupy. Anything above the field is allowed;
/// the floor is the only bound.
pub fn is_row_playable(row: i32) -> bool {
    row < ROWS as i32
}

/// Whether `(row, col)` is free for a block of the active piece
fn is_free(grid: &Grid, row: i32, col: i32) -> bool {
    if col < 0 || col >= COLUMNS as i32 || !is_row_playable(row) {
        return false;
    }
    row < 0 || !grid.is_occupied(row, col)
}

/// An active falling piece
#[derive(Debug, Clone)]
pub struct Tetromino {
    pub shape: Shape,
    /// `blocks[0]` is the rotation pivot
    blocks: [Block; 4],
}

impl Tetromino {
    /// Create a piece at the spawn anchor
    pub fn spawn(shape: Shape) -> Self {
        Self::at(shape, SPAWN_ROW, SPAWN_COL)
    }

    /// Create a piece with its pivot at `(row, col)`
    pub fn at(shape: Shape, row: i32, col: i32) -> Self {
        let blocks = shape
            .template()
            .map(|(dcol, drow)| Block::new(row + drow, col + dcol, shape));
        Self { shape, blocks }
    }

    /// Absolute `(row, col)` positions of all 4 blocks
    pub fn positions(&self) -> [(i32, i32); 4] {
        self.blocks.map(|b| (b.row, b.col))
    }

    /// Any on-grid block sits on an occupied cell
    pub fn overlaps(&self, grid: &Grid) -> bool {
        self.blocks
            .iter()
            .any(|b| b.row >= 0 && grid.is_occupied(b.row, b.col))
    }

    /// Would moving by `(dx, dy)` put any block out of bounds or onto a locked cell
    pub fn would_collide(&self, grid: &Grid, dx: i32, dy: i32) -> bool {
        self.blocks
            .iter()
            .any(|b| !is_free(grid, b.row + dy, b.col + dx))
    }

    #[allow(dead_code)]
    pub fn would_collide_horizontal(&self, grid: &Grid, amount: i32) -> bool {
        self.would_collide(grid, amount, 0)
    }

    #[allow(dead_code)]
    pub fn would_collide_vertical(&self, grid: &Grid, amount: i32) -> bool {
        self.would_collide(grid, 0, amount)
    }

    /// Move by `(dx, dy)` if nothing is in the way, returns true if it moved
    pub fn translate(&mut self, grid: &Grid, dx: i32, dy: i32) -> bool {
        if self.would_collide(grid, dx, dy) {
            return false;
        }
        for block in &mut self.blocks {
            block.col += dx;
            block.row += dy;
        }
        true
    }

    /// Fall one row, or lock into the grid when blocked
    pub fn move_down(&mut self, grid: &mut Grid) -> Step {
        if self.translate(grid, 0, 1) {
            return Step::Fell;
        }
        Step::Locked(grid.lock(&self.blocks))
    }

    /// Rotate 90° clockwise around the pivot. All four blocks move or none do.
    pub fn rotate(&mut self, grid: &Grid) -> bool {
        if !self.shape.rotates() {
            return false;
        }

        let pivot = self.blocks[0];
        let candidates = self.blocks.map(|b| b.rotated_about(&pivot));

        if !candidates.iter().all(|&(row, col)| is_free(grid, row, col)) {
            return false;
        }

        for (block, (row, col)) in self.blocks.iter_mut().zip(candidates) {
            block.row = row;
            block.col = col;
        }
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sorted(mut positions: [(i32, i32); 4]) -> [(i32, i32); 4] {
        positions.sort();
        positions
    }

    #[test]
    fn test_spawn_position() {
        let piece = Tetromino::spawn(Shape::T);
        assert_eq!(
            sorted(piece.positions()),
            sorted([(-1, 5), (-1, 4), (-1, 6), (-2, 5)])
        );
    }

    #[test]
    fn test_move_down_falls_then_locks_on_floor() {
        let mut grid = Grid::new();
        let mut piece = Tetromino::at(Shape::O, 18, 4);
        // O occupies rows 17..=18, one step left before the floor
        assert_eq!(piece.move_down(&mut grid), Step::Fell);
        match piece.move_down(&mut grid) {
            Step::Locked(outcome) => assert_eq!(outcome.placed, 4),
            Step::Fell => panic!("expected lock on the floor"),
        }
        assert!(grid.is_occupied(19, 4));
        assert!(grid.is_occupied(18, 5));
        assert!(grid.check_invariants());
    }

    #[test]
    fn test_lock_on_stack() {
        let mut grid = Grid::new();
        grid.lock(&[Block::new(10, 5, Shape::I)]);
        let mut piece = Tetromino::at(Shape::I, 8, 5);
        // I spans rows 6..=9 at col 5, directly above the locked block
        assert!(piece.would_collide_vertical(&grid, 1));
        assert!(matches!(piece.move_down(&mut grid), Step::Locked(_)));
        assert_eq!(grid.len(), 5);
        assert!(grid.check_invariants());
    }

    #[test]
    fn test_left_wall_rejects_move() {
        let grid = Grid::new();
        let mut piece = Tetromino::at(Shape::I, 5, 0);
        let before = piece.positions();
        assert!(piece.would_collide_horizontal(&grid, -1));
        assert!(!piece.translate(&grid, -1, 0));
        assert_eq!(piece.positions(), before);
    }

    #[test]
    fn test_right_wall_rejects_move() {
        let grid = Grid::new();
        let mut piece = Tetromino::at(Shape::I, 5, 9);
        let before = piece.positions();
        assert!(!piece.translate(&grid, 1, 0));
        assert_eq!(piece.positions(), before);
    }

    #[test]
    fn test_horizontal_blocked_by_locked_cell() {
        let mut grid = Grid::new();
        grid.lock(&[Block::new(5, 6, Shape::Z)]);
        let mut piece = Tetromino::at(Shape::I, 5, 5);
        assert!(!piece.translate(&grid, 1, 0));
        assert!(piece.translate(&grid, -1, 0));
    }

    #[test]
    fn test_moves_freely_above_field() {
        let grid = Grid::new();
        let mut piece = Tetromino::spawn(Shape::I);
        assert!(piece.translate(&grid, 1, 0));
        assert!(piece.translate(&grid, -2, 0));
    }

    #[test]
    fn test_rotate_t() {
        let grid = Grid::new();
        let mut piece = Tetromino::at(Shape::T, 10, 4);
        assert!(piece.rotate(&grid));
        // Nub pointing up turns to point right
        assert_eq!(
            sorted(piece.positions()),
            sorted([(10, 4), (9, 4), (11, 4), (10, 5)])
        );
    }

    #[test]
    fn test_four_rotations_return_home() {
        let grid = Grid::new();
        for shape in Shape::all() {
            let mut piece = Tetromino::at(shape, 10, 4);
            let before = piece.positions();
            for _ in 0..4 {
                piece.rotate(&grid);
            }
            assert_eq!(piece.positions(), before, "{}", shape.name());
        }
    }

    #[test]
    fn test_o_never_rotates() {
        let mut grid = Grid::new();
        let mut piece = Tetromino::at(Shape::O, 10, 4);
        let before = piece.positions();
        assert!(!piece.rotate(&grid));
        assert_eq!(piece.positions(), before);

        grid.lock(&[Block::new(11, 4, Shape::I), Block::new(8, 6, Shape::I)]);
        assert!(!piece.rotate(&grid));
        assert_eq!(piece.positions(), before);
    }

    #[test]
    fn test_rotation_blocked_by_wall_is_atomic() {
        let grid = Grid::new();
        // Vertical I against the left wall, pivot at col 0
        let mut piece = Tetromino::at(Shape::I, 10, 0);
        let before = piece.positions();
        assert!(!piece.rotate(&grid));
        assert_eq!(piece.positions(), before);
    }

    #[test]
    fn test_rotation_blocked_by_locked_cell_is_atomic() {
        let mut grid = Grid::new();
        let mut piece = Tetromino::at(Shape::T, 10, 4);
        // Clockwise turn would need (11, 4)
        grid.lock(&[Block::new(11, 4, Shape::O)]);
        let before = piece.positions();
        assert!(!piece.rotate(&grid));
        assert_eq!(piece.positions(), before);
    }

    #[test]
    fn test_rotation_blocked_by_floor() {
        let grid = Grid::new();
        // Horizontal-ish T resting on the floor: turning needs row 20
        let mut piece = Tetromino::at(Shape::T, 19, 4);
        let before = piece.positions();
        assert!(!piece.rotate(&grid));
        assert_eq!(piece.positions(), before);
    }

    #[test]
    fn test_overlap_at_spawn() {
        let mut grid = Grid::new();
        let piece = Tetromino::spawn(Shape::J);
        assert!(!piece.overlaps(&grid));
        // J spawn cells: (-1,5) (-2,5) (0,5) (0,4)
        grid.lock(&[Block::new(0, 4, Shape::I)]);
        assert!(piece.overlaps(&grid));
    }
}
