//! 7-bag randomizer for piece generation
//!
//! All 7 shapes are shuffled, then dealt out before reshuffling. A fixed
//! 3-piece preview queue sits in front of the bag.

use crate::shape::Shape;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use std::collections::VecDeque;

/// Number of upcoming pieces kept visible
pub const PREVIEW_LEN: usize = 3;

/// The 7-bag piece randomizer
#[derive(Debug, Clone)]
pub struct PieceBag {
    /// Remaining shapes of the current permutation, front is dealt first
    bag: VecDeque<Shape>,
    /// Preview queue for upcoming pieces
    preview: VecDeque<Shape>,
    rng: ChaCha8Rng,
}

impl Default for PieceBag {
    fn default() -> Self {
        Self::new()
    }
}

impl PieceBag {
    /// Create a bag seeded from entropy
    pub fn new() -> Self {
        Self::with_seed(rand::random())
    }

    /// Create a bag with a fixed seed (same seed, same sequence)
    pub fn with_seed(seed: u64) -> Self {
        let mut bag = Self {
            bag: VecDeque::with_capacity(7),
            preview: VecDeque::with_capacity(PREVIEW_LEN + 1),
            rng: ChaCha8Rng::seed_from_u64(seed),
        };
        bag.fill_preview();
        bag
    }

    /// Pop the head of the preview queue and top the queue back up
    pub fn next_shape(&mut self) -> Shape {
        let shape = match self.preview.pop_front() {
            Some(shape) => shape,
            None => self.draw(),
        };
        self.fill_preview();
        shape
    }

    /// Upcoming shapes, next first
    pub fn preview(&self) -> [Shape; PREVIEW_LEN] {
        let mut out = [Shape::I; PREVIEW_LEN];
        for (slot, shape) in out.iter_mut().zip(self.preview.iter()) {
            *slot = *shape;
        }
        out
    }

    fn fill_preview(&mut self) {
        while self.preview.len() < PREVIEW_LEN {
            let shape = self.draw();
            self.preview.push_back(shape);
        }
    }

    /// Deal one shape from the bag, reshuffling when it runs dry
    fn draw(&mut self) -> Shape {
        if self.bag.is_empty() {
            self.refill();
        }
        // Non-empty after refill
        self.bag.pop_front().unwrap_or(Shape::I)
    }

    /// Refill the bag with a new shuffled permutation
    fn refill(&mut self) {
        let mut new_bag = Shape::all();
        new_bag.shuffle(&mut self.rng);
        self.bag.extend(new_bag);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_bag_contains_all_pieces() {
        let mut bag = PieceBag::with_seed(7);
        let pieces: HashSet<_> = (0..7).map(|_| bag.next_shape()).collect();
        assert_eq!(pieces.len(), 7);
    }

    #[test]
    fn test_every_bag_window_is_a_permutation() {
        let mut bag = PieceBag::with_seed(42);
        for _ in 0..20 {
            let window: HashSet<_> = (0..7).map(|_| bag.next_shape()).collect();
            assert_eq!(window.len(), 7);
        }
    }

    #[test]
    fn test_preview_is_what_comes_next() {
        let mut bag = PieceBag::with_seed(3);
        for _ in 0..30 {
            let upcoming = bag.preview();
            assert_eq!(bag.next_shape(), upcoming[0]);
            assert_eq!(bag.preview()[..2], upcoming[1..]);
        }
    }

    #[test]
    fn test_same_seed_same_sequence() {
        let mut a = PieceBag::with_seed(1234);
        let mut b = PieceBag::with_seed(1234);
        for _ in 0..50 {
            assert_eq!(a.next_shape(), b.next_shape());
        }
    }

    #[test]
    fn test_repeat_distance_is_bounded() {
        let mut bag = PieceBag::with_seed(99);
        let draws: Vec<_> = (0..140).map(|_| bag.next_shape()).collect();
        for shape in Shape::all() {
            let positions: Vec<_> = draws
                .iter()
                .enumerate()
                .filter(|(_, s)| **s == shape)
                .map(|(i, _)| i)
                .collect();
            for pair in positions.windows(2) {
                assert!(pair[1] - pair[0] <= 13, "{} gap too large", shape.name());
            }
        }
    }
}
