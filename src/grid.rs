/// Uniform-grid spatial index.
///
/// Buckets entity references by `(floor(x / cell), floor(y / cell))` of their
/// top-left corner.  Rebuilt from scratch every frame — the grid owns nothing
/// and carries no state across frames, which trades an O(n) rebuild for
/// freedom from incremental-update bugs.  With the cell size close to the
/// largest entity box, a pairwise test only needs the 3×3 neighborhood.

use std::collections::HashMap;

pub struct SpatialGrid<T: Copy> {
    cell: f32,
    width: f32,
    height: f32,
    cells: HashMap<(i32, i32), Vec<T>>,
}

impl<T: Copy> SpatialGrid<T> {
    /// `width`/`height` bound the indexed extent; entities outside it are
    /// silently dropped on insert (off-screen collisions are not needed).
    pub fn new(cell: f32, width: f32, height: f32) -> Self {
        Self {
            cell,
            width,
            height,
            cells: HashMap::new(),
        }
    }

    fn key(&self, x: f32, y: f32) -> (i32, i32) {
        ((x / self.cell).floor() as i32, (y / self.cell).floor() as i32)
    }

    /// Empty all buckets, keeping their Vec capacity so the per-frame
    /// rebuild does not re-allocate.
    pub fn clear(&mut self) {
        for bucket in self.cells.values_mut() {
            bucket.clear();
        }
    }

    pub fn insert(&mut self, id: T, x: f32, y: f32) {
        if x < 0.0 || y < 0.0 || x >= self.width || y >= self.height {
            return;
        }
        self.cells.entry(self.key(x, y)).or_default().push(id);
    }

    /// Append every reference in the 3×3 neighborhood of `(x, y)` to `out`
    /// (cleared first).  Each entity sits in exactly one bucket, so the
    /// result holds no duplicates; it is still a conservative superset — the
    /// caller does the exact overlap test.
    pub fn query_into(&self, x: f32, y: f32, out: &mut Vec<T>) {
        out.clear();
        let (cx, cy) = self.key(x, y);
        for dx in -1..=1 {
            for dy in -1..=1 {
                if let Some(bucket) = self.cells.get(&(cx + dx, cy + dy)) {
                    out.extend_from_slice(bucket);
                }
            }
        }
    }
}
