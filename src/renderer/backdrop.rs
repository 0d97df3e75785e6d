//! Pre-generated background patterns
//!
//! Generated once per reset so the background does not flicker, and extended
//! (never reshuffled) when the window grows.

use rand::Rng;

use crate::Viewport;

/// Binary digit grid cell size
pub const CELL_WIDTH: f32 = 20.0;
pub const CELL_HEIGHT: f32 = 15.0;
/// Spacing of candidate nodes along the hills
pub const HILL_NODE_SPACING: f32 = 80.0;
/// Chance that a candidate hill node is present
const HILL_NODE_CHANCE: f64 = 0.3;
pub const CIRCUIT_SEGMENTS: usize = 5;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CircuitLine {
    pub x1: f32,
    pub x2: f32,
    pub offset1: f32,
    pub offset2: f32,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Backdrop {
    /// Column-major grid of ones and zeros
    pub binary: Vec<Vec<bool>>,
    pub hill_nodes: Vec<f32>,
    pub circuit_lines: Vec<CircuitLine>,
}

fn grid_size(viewport: Viewport) -> (usize, usize) {
    let cols = (viewport.width / CELL_WIDTH).ceil().max(0.0) as usize + 1;
    let rows = (viewport.height / CELL_HEIGHT).ceil().max(0.0) as usize + 1;
    (cols, rows)
}

fn circuit_line<R: Rng + ?Sized>(index: usize, segment: f32, rng: &mut R) -> CircuitLine {
    CircuitLine {
        x1: index as f32 * segment,
        x2: (index + 1) as f32 * segment,
        offset1: rng.random_range(10.0..30.0),
        offset2: rng.random_range(10.0..30.0),
    }
}

impl Backdrop {
    /// Fresh patterns for the given window
    pub fn generate<R: Rng + ?Sized>(viewport: Viewport, rng: &mut R) -> Self {
        let mut backdrop = Self::default();
        backdrop.extend(viewport, rng);
        backdrop
    }

    /// Grow the patterns to cover a resized window, keeping existing values
    pub fn extend<R: Rng + ?Sized>(&mut self, viewport: Viewport, rng: &mut R) {
        let (cols, rows) = grid_size(viewport);
        if self.binary.len() < cols {
            self.binary.resize_with(cols, Vec::new);
        }
        for column in &mut self.binary {
            while column.len() < rows {
                column.push(rng.random_bool(0.5));
            }
        }

        let mut next = self
            .hill_nodes
            .last()
            .map_or(0.0, |last| last + HILL_NODE_SPACING);
        while next < viewport.width {
            if rng.random_bool(HILL_NODE_CHANCE) {
                self.hill_nodes.push(next);
            }
            next += HILL_NODE_SPACING;
        }

        let segment = viewport.width / CIRCUIT_SEGMENTS as f32;
        for i in 0..CIRCUIT_SEGMENTS {
            match self.circuit_lines.get_mut(i) {
                Some(line) => {
                    line.x1 = i as f32 * segment;
                    line.x2 = (i + 1) as f32 * segment;
                }
                None => self.circuit_lines.push(circuit_line(i, segment, rng)),
            }
        }
    }

    pub fn digit(&self, col: usize, row: usize) -> Option<char> {
        self.binary
            .get(col)
            .and_then(|c| c.get(row))
            .map(|&one| if one { '1' } else { '0' })
    }
}
