//! A single occupied cell

use crate::grid::{COLUMNS, ROWS};
use crate::shape::{ColorTag, Shape};

/// One block of a piece. Plain value: the active piece holds four of these,
/// and the grid's arena takes them over on lock.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Block {
    /// Row, growing downward. Negative above the visible field.
    pub row: i32,
    pub col: i32,
    pub shape: Shape,
}

impl Block {
    pub fn new(row: i32, col: i32, shape: Shape) -> Self {
        Self { row, col, shape }
    }

    pub fn color(&self) -> ColorTag {
        self.shape.color()
    }

    /// Grid cell for this block, if it lies inside the field
    pub fn cell(&self) -> Option<(usize, usize)> {
        cell_index(self.row, self.col)
    }

    /// Position after rotating 90° clockwise (on screen) around `pivot`
    pub fn rotated_about(&self, pivot: &Block) -> (i32, i32) {
        let dcol = self.col - pivot.col;
        let drow = self.row - pivot.row;
        // (dcol, drow) -> (-drow, dcol) turns clockwise with rows growing down
        (pivot.row + dcol, pivot.col - drow)
    }
}

/// Map a signed position to `(row, col)` indices if it is on the grid
pub fn cell_index(row: i32, col: i32) -> Option<(usize, usize)> {
    if row < 0 || col < 0 || row >= ROWS as i32 || col >= COLUMNS as i32 {
        return None;
    }
    Some((row as usize, col as usize))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cell_inside_and_outside() {
        assert_eq!(Block::new(0, 0, Shape::T).cell(), Some((0, 0)));
        assert_eq!(Block::new(19, 9, Shape::T).cell(), Some((19, 9)));
        assert_eq!(Block::new(-1, 4, Shape::T).cell(), None);
        assert_eq!(Block::new(20, 4, Shape::T).cell(), None);
        assert_eq!(Block::new(5, 10, Shape::T).cell(), None);
    }

    #[test]
    fn test_rotation_is_clockwise() {
        let pivot = Block::new(5, 5, Shape::T);
        // Right of the pivot turns to below it
        assert_eq!(Block::new(5, 6, Shape::T).rotated_about(&pivot), (6, 5));
        // Below turns to the left
        assert_eq!(Block::new(6, 5, Shape::T).rotated_about(&pivot), (5, 4));
        // Above turns to the right
        assert_eq!(Block::new(4, 5, Shape::T).rotated_about(&pivot), (5, 6));
        // The pivot stays put
        assert_eq!(pivot.rotated_about(&pivot), (5, 5));
    }
}
