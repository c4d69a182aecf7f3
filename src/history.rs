use std::collections::VecDeque;
use crate::landmarks::Point;

/// Bounded history of recent index-fingertip positions, oldest first
#[derive(Debug, Clone)]
pub struct PositionHistory {
    positions: VecDeque<Point>,
    capacity: usize,
}

impl PositionHistory {
    /// Create a new empty history that keeps at most `capacity` positions
    pub fn new(capacity: usize) -> Self {
        Self {
            positions: VecDeque::with_capacity(capacity + 1),
            capacity,
        }
    }

    /// Append a position, evicting the oldest one once over capacity
    pub fn push(&mut self, position: Point) {
        self.positions.push_back(position);
        while self.positions.len() > self.capacity {
            self.positions.pop_front();
        }
    }

    /// Get the oldest position without removing it
    pub fn peek_front(&self) -> Option<&Point> {
        self.positions.front()
    }

    pub fn peek_back(&self) -> Option<&Point> {
        self.positions.back()
    }

    /// Get the number of positions in the history
    pub fn len(&self) -> usize {
        self.positions.len()
    }

    /// Check if the history is empty
    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }
}
