//! Tetromino shape templates
//!
//! Offsets are `(dcol, drow)` with rows growing downward. The first offset of
//! every template is the rotation pivot.

/// The 7 tetromino shapes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Shape {
    I, // Cyan - long bar
    O, // Yellow - square
    T, // Purple - T-shape
    S, // Green - S-shape
    Z, // Red - Z-shape
    J, // Blue - J-shape
    L, // Orange - L-shape
}

/// Cosmetic color tag carried by every block
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColorTag {
    Cyan,
    Yellow,
    Purple,
    Green,
    Red,
    Blue,
    Orange,
}

impl Shape {
    /// All shapes, in bag order before shuffling
    pub fn all() -> [Shape; 7] {
        [
            Shape::I,
            Shape::O,
            Shape::T,
            Shape::S,
            Shape::Z,
            Shape::J,
            Shape::L,
        ]
    }

    pub fn color(&self) -> ColorTag {
        match self {
            Shape::I => ColorTag::Cyan,
            Shape::O => ColorTag::Yellow,
            Shape::T => ColorTag::Purple,
            Shape::S => ColorTag::Green,
            Shape::Z => ColorTag::Red,
            Shape::J => ColorTag::Blue,
            Shape::L => ColorTag::Orange,
        }
    }

    /// Spawn template as `(dcol, drow)` offsets from the spawn anchor
    pub fn template(&self) -> [(i32, i32); 4] {
        match self {
            Shape::T => [(0, 0), (-1, 0), (1, 0), (0, -1)],
            Shape::O => [(0, 0), (0, -1), (1, 0), (1, -1)],
            Shape::J => [(0, 0), (0, -1), (0, 1), (-1, 1)],
            Shape::L => [(0, 0), (0, -1), (0, 1), (1, 1)],
            Shape::I => [(0, 0), (0, -1), (0, -2), (0, 1)],
            Shape::S => [(0, 0), (-1, 0), (0, -1), (1, -1)],
            Shape::Z => [(0, 0), (1, 0), (0, -1), (-1, -1)],
        }
    }

    /// Whether this shape turns at all
    pub fn rotates(&self) -> bool {
        !matches!(self, Shape::O)
    }

    pub fn name(&self) -> &'static str {
        match self {
            Shape::I => "I",
            Shape::O => "O",
            Shape::T => "T",
            Shape::S => "S",
            Shape::Z => "Z",
            Shape::J => "J",
            Shape::L => "L",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_templates_have_pivot_first() {
        for shape in Shape::all() {
            assert_eq!(shape.template()[0], (0, 0), "{} pivot", shape.name());
        }
    }

    #[test]
    fn test_templates_have_four_distinct_cells() {
        for shape in Shape::all() {
            let cells: HashSet<_> = shape.template().into_iter().collect();
            assert_eq!(cells.len(), 4, "{} cells", shape.name());
        }
    }

    #[test]
    fn test_only_o_is_fixed() {
        let fixed: Vec<_> = Shape::all().into_iter().filter(|s| !s.rotates()).collect();
        assert_eq!(fixed, vec![Shape::O]);
    }
}
