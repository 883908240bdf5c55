//! A* path finding over a 4-connected grid.
//!
//! The search is stateless: every call allocates its own open set and score
//! tables, so it can be run from any system without shared state.

use std::cmp::Reverse;
use std::collections::{BinaryHeap, HashMap};

use tank_math::{IVec2, Vec2};

/// Neighbour order is fixed so equal-cost paths are chosen deterministically.
const STEPS: [IVec2; 4] = [IVec2::X, IVec2::Y, IVec2::NEG_X, IVec2::NEG_Y];

/// A rectangular grid of passable and blocked cells.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Grid {
    width: i32,
    height: i32,
    blocked: Vec<bool>,
}

impl Grid {
    /// Create a fully passable grid.
    #[must_use]
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width: width as i32,
            height: height as i32,
            blocked: vec![false; (width as usize) * (height as usize)],
        }
    }

    #[must_use]
    pub fn width(&self) -> i32 {
        self.width
    }

    #[must_use]
    pub fn height(&self) -> i32 {
        self.height
    }

    #[must_use]
    pub fn in_bounds(&self, cell: IVec2) -> bool {
        cell.x >= 0 && cell.y >= 0 && cell.x < self.width && cell.y < self.height
    }

    /// Mark `cell` as blocked. Out-of-bounds cells are ignored.
    pub fn block(&mut self, cell: IVec2) {
        if let Some(i) = self.index(cell) {
            self.blocked[i] = true;
        }
    }

    /// Returns `true` if `cell` is blocked or outside the grid.
    #[must_use]
    pub fn is_blocked(&self, cell: IVec2) -> bool {
        self.index(cell).is_none_or(|i| self.blocked[i])
    }

    /// The cell containing world-space `point`, given `cell_size` world units
    /// per cell.
    #[must_use]
    pub fn cell_at(point: Vec2, cell_size: f32) -> IVec2 {
        (point / cell_size).floor().as_ivec2()
    }

    /// World-space centre of `cell`.
    #[must_use]
    pub fn cell_center(cell: IVec2, cell_size: f32) -> Vec2 {
        (cell.as_vec2() + Vec2::splat(0.5)) * cell_size
    }

    fn index(&self, cell: IVec2) -> Option<usize> {
        self.in_bounds(cell)
            .then(|| (cell.y * self.width + cell.x) as usize)
    }
}

fn manhattan(a: IVec2, b: IVec2) -> i32 {
    let d = (a - b).abs();
    d.x + d.y
}

/// Find a shortest path from `start` to `goal`.
///
/// The returned waypoints exclude `start` and end with `goal`; an empty path
/// means `start == goal`. Returns `None` if either end is blocked or the goal
/// is unreachable.
#[must_use]
pub fn find_path(grid: &Grid, start: IVec2, goal: IVec2) -> Option<Vec<IVec2>> {
    if grid.is_blocked(start) || grid.is_blocked(goal) {
        return None;
    }
    if start == goal {
        return Some(Vec::new());
    }

    let mut open = BinaryHeap::new();
    let mut came_from: HashMap<IVec2, IVec2> = HashMap::new();
    let mut g_score: HashMap<IVec2, i32> = HashMap::new();
    // Insertion counter breaks f-score ties in favour of older entries.
    let mut seq = 0u64;

    g_score.insert(start, 0);
    open.push(Reverse((manhattan(start, goal), seq, start.x, start.y)));

    while let Some(Reverse((_, _, x, y))) = open.pop() {
        let current = IVec2::new(x, y);
        if current == goal {
            return Some(reconstruct(&came_from, start, goal));
        }
        let g = g_score.get(&current).copied().unwrap_or(i32::MAX);

        for step in STEPS {
            let next = current + step;
            if grid.is_blocked(next) {
                continue;
            }
            let tentative = g + 1;
            if g_score.get(&next).is_some_and(|&best| best <= tentative) {
                continue;
            }
            came_from.insert(next, current);
            g_score.insert(next, tentative);
            seq += 1;
            open.push(Reverse((tentative + manhattan(next, goal), seq, next.x, next.y)));
        }
    }
    None
}

fn reconstruct(came_from: &HashMap<IVec2, IVec2>, start: IVec2, goal: IVec2) -> Vec<IVec2> {
    let mut path = vec![goal];
    let mut current = goal;
    while let Some(&prev) = came_from.get(&current) {
        if prev == start {
            break;
        }
        path.push(prev);
        current = prev;
    }
    path.reverse();
    path
}
