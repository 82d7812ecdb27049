#[cfg(feature = "std")]
use rayon::prelude::*;
use std::sync::atomic::{AtomicUsize, Ordering as AtomicOrdering};

/// Upper bound on cells per axis; larger worlds get coarser cells.
pub const MAX_CELLS_PER_AXIS: usize = 1024;

/// Cell edge for a `width` x `height` world: `clamp(min(w, h) / 50, 24, 200)`.
#[must_use]
pub fn cell_size_for(width: f64, height: f64) -> f64 {
    (width.min(height) / 50.0).clamp(24.0, 200.0)
}

/// Uniform-grid spatial index over organism positions.
///
/// Points are bucketed by `floor(x / cell_size), floor(y / cell_size)` into a
/// dense grid covering the world. Cell coordinates are clamped into the grid,
/// so a point that drifted outside the world still lands in an edge bucket
/// and stays reachable by queries (queries clamp their cell range the same
/// way).
///
/// # Implementation Notes
/// - Uses the "offset array" pattern (like compressed sparse rows):
///   `cell_offsets[i]..cell_offsets[i+1]` indexes the entities in cell `i`
/// - Rebuilt wholesale once per tick; there is no incremental maintenance
/// - Radius queries filter candidates with a squared-distance comparison
///
/// # Examples
/// ```
/// use ameba_core::spatial_hash::SpatialHash;
///
/// let mut spatial = SpatialHash::new(40.0, 2000.0, 2000.0);
/// spatial.build(&[(15.0, 15.0), (25.0, 25.0), (850.0, 850.0)]);
///
/// let nearby = spatial.query_radius(15.0, 15.0, 20.0);
/// assert_eq!(nearby, vec![0, 1]);
/// ```
#[derive(Clone, Debug)]
pub struct SpatialHash {
    pub cell_size: f64,
    pub width: f64,
    pub height: f64,
    pub cols: usize,
    pub rows: usize,
    pub cell_offsets: Vec<usize>,
    pub entity_indices: Vec<usize>,
    positions: Vec<(f64, f64)>,
}

impl Default for SpatialHash {
    fn default() -> Self {
        Self::new_empty()
    }
}

impl SpatialHash {
    /// Creates an empty index for a `width` x `height` world.
    ///
    /// A non-positive or non-finite `cell_size` is replaced by the world's
    /// larger dimension, which degrades to a single bucket. The cell size is
    /// raised as needed so neither axis exceeds [`MAX_CELLS_PER_AXIS`] + 1
    /// cells.
    pub fn new(cell_size: f64, width: f64, height: f64) -> Self {
        let width = if width.is_finite() { width.max(0.0) } else { 0.0 };
        let height = if height.is_finite() { height.max(0.0) } else { 0.0 };
        let cell_size = if cell_size.is_finite() && cell_size > 0.0 {
            cell_size
        } else {
            width.max(height).max(1.0)
        };
        let cell_size = cell_size.max(width.max(height) / MAX_CELLS_PER_AXIS as f64);
        let axis_cells = |extent: f64| {
            ((extent / cell_size).floor() as usize)
                .min(MAX_CELLS_PER_AXIS)
                .saturating_add(1)
        };
        let cols = axis_cells(width);
        let rows = axis_cells(height);
        Self {
            cell_size,
            width,
            height,
            cols,
            rows,
            cell_offsets: vec![0; cols * rows + 1],
            entity_indices: Vec::new(),
            positions: Vec::new(),
        }
    }

    /// A single-cell index, used as a placeholder before the first rebuild.
    pub fn new_empty() -> Self {
        Self::new(24.0, 0.0, 0.0)
    }

    /// Number of points currently indexed (non-finite points excluded).
    #[must_use]
    pub fn len(&self) -> usize {
        self.entity_indices.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entity_indices.is_empty()
    }

    #[inline]
    fn cell_coord(&self, v: f64, max: usize) -> usize {
        // `as` saturates, which keeps huge coordinates in range.
        let c = (v / self.cell_size).floor() as i64;
        c.clamp(0, max as i64 - 1) as usize
    }

    /// Computes the flat cell index for a world coordinate.
    ///
    /// Returns `None` for non-finite coordinates.
    #[inline]
    pub fn get_cell_idx(&self, x: f64, y: f64) -> Option<usize> {
        if !x.is_finite() || !y.is_finite() {
            return None;
        }
        let cx = self.cell_coord(x, self.cols);
        let cy = self.cell_coord(y, self.rows);
        Some(cy * self.cols + cx)
    }

    /// Drops every indexed point.
    pub fn clear(&mut self) {
        self.cell_offsets.iter_mut().for_each(|o| *o = 0);
        self.entity_indices.clear();
        self.positions.clear();
    }

    /// Rebuilds the index from scratch; point `i` is reported as index `i`.
    pub fn build(&mut self, positions: &[(f64, f64)]) {
        self.clear();
        self.positions.extend_from_slice(positions);
        let cell_count = self.cols * self.rows;

        let atomic_counts: Vec<AtomicUsize> =
            (0..cell_count).map(|_| AtomicUsize::new(0)).collect();
        let count_one = |&(x, y): &(f64, f64)| {
            if let Some(idx) = self.get_cell_idx(x, y) {
                atomic_counts[idx].fetch_add(1, AtomicOrdering::Relaxed);
            }
        };
        #[cfg(feature = "std")]
        positions.par_iter().for_each(count_one);
        #[cfg(not(feature = "std"))]
        positions.iter().for_each(count_one);
        let counts: Vec<usize> = atomic_counts.into_iter().map(|a| a.into_inner()).collect();

        self.cell_offsets.resize(cell_count + 1, 0);
        let mut total = 0;
        for (i, &count) in counts.iter().enumerate() {
            self.cell_offsets[i] = total;
            total += count;
        }
        self.cell_offsets[cell_count] = total;

        self.entity_indices.resize(total, 0);
        let mut current_offsets = self.cell_offsets[..cell_count].to_vec();
        for (entity_idx, &(x, y)) in positions.iter().enumerate() {
            if let Some(cell_idx) = self.get_cell_idx(x, y) {
                let write_idx = current_offsets[cell_idx];
                self.entity_indices[write_idx] = entity_idx;
                current_offsets[cell_idx] += 1;
            }
        }
    }

    /// Visits every indexed point in the cells overlapping the query square.
    ///
    /// Candidates are not distance-filtered.
    pub fn query_callback<F>(&self, x: f64, y: f64, radius: f64, mut callback: F)
    where
        F: FnMut(usize),
    {
        if self.entity_indices.is_empty()
            || !x.is_finite()
            || !y.is_finite()
            || radius.is_nan()
            || radius < 0.0
        {
            return;
        }
        let min_cx = self.cell_coord(x - radius, self.cols);
        let max_cx = self.cell_coord(x + radius, self.cols);
        let min_cy = self.cell_coord(y - radius, self.rows);
        let max_cy = self.cell_coord(y + radius, self.rows);

        for cy in min_cy..=max_cy {
            for cx in min_cx..=max_cx {
                let cell_idx = cy * self.cols + cx;
                let start = self.cell_offsets[cell_idx];
                let end = self.cell_offsets[cell_idx + 1];
                for &entity_idx in &self.entity_indices[start..end] {
                    callback(entity_idx);
                }
            }
        }
    }

    /// Collects every point within `radius` (inclusive) of `(x, y)`.
    ///
    /// Results are sorted by index so callers see a stable order.
    #[inline]
    pub fn query_into(&self, x: f64, y: f64, radius: f64, result: &mut Vec<usize>) {
        result.clear();
        let r2 = radius * radius;
        self.query_callback(x, y, radius, |idx| {
            let (px, py) = self.positions[idx];
            let dx = px - x;
            let dy = py - y;
            if dx * dx + dy * dy <= r2 {
                result.push(idx);
            }
        });
        result.sort_unstable();
    }

    #[must_use]
    pub fn query_radius(&self, x: f64, y: f64, radius: f64) -> Vec<usize> {
        let mut result = Vec::new();
        self.query_into(x, y, radius, &mut result);
        result
    }

    pub fn count_nearby(&self, x: f64, y: f64, radius: f64) -> usize {
        let r2 = radius * radius;
        let mut count = 0;
        self.query_callback(x, y, radius, |idx| {
            let (px, py) = self.positions[idx];
            let dx = px - x;
            let dy = py - y;
            if dx * dx + dy * dy <= r2 {
                count += 1;
            }
        });
        count
    }
}

#[cfg(test)]
pub mod tests {
    use super::*;

    #[test]
    fn test_spatial_hash_query_finds_nearby() {
        let mut sh = SpatialHash::new(5.0, 20.0, 20.0);
        sh.build(&[(1.0, 1.0), (2.0, 2.0), (10.0, 10.0)]);
        assert_eq!(sh.query_radius(1.5, 1.5, 2.0), vec![0, 1]);
        assert_eq!(sh.count_nearby(1.5, 1.5, 2.0), 2);
    }

    #[test]
    fn test_spatial_hash_radius_is_inclusive() {
        let mut sh = SpatialHash::new(24.0, 100.0, 100.0);
        sh.build(&[(10.0, 10.0), (13.0, 14.0)]);
        // Second point is exactly 5 units away.
        assert_eq!(sh.query_radius(10.0, 10.0, 5.0), vec![0, 1]);
        assert_eq!(sh.query_radius(10.0, 10.0, 4.999), vec![0]);
    }

    #[test]
    fn test_spatial_hash_world_edge_is_indexed() {
        let mut sh = SpatialHash::new(25.0, 100.0, 100.0);
        sh.build(&[(100.0, 100.0), (0.0, 0.0)]);
        assert_eq!(sh.len(), 2);
        assert_eq!(sh.query_radius(100.0, 100.0, 1.0), vec![0]);
    }

    #[test]
    fn test_spatial_hash_out_of_world_points_stay_queryable() {
        let mut sh = SpatialHash::new(25.0, 100.0, 100.0);
        sh.build(&[(-40.0, 50.0), (500.0, 50.0)]);
        assert_eq!(sh.query_radius(-45.0, 50.0, 10.0), vec![0]);
        assert_eq!(sh.query_radius(490.0, 50.0, 10.0), vec![1]);
    }

    #[test]
    fn test_spatial_hash_skips_non_finite() {
        let mut sh = SpatialHash::new(5.0, 20.0, 20.0);
        sh.build(&[(f64::NAN, 1.0), (1.0, 1.0)]);
        assert_eq!(sh.len(), 1);
        assert_eq!(sh.query_radius(1.0, 1.0, 100.0), vec![1]);
    }

    #[test]
    fn test_spatial_hash_clear() {
        let mut sh = SpatialHash::new(5.0, 20.0, 20.0);
        sh.build(&[(1.0, 1.0)]);
        sh.build(&[]);
        assert!(sh.is_empty());
        assert!(sh.query_radius(1.0, 1.0, 10.0).is_empty());
    }

    #[test]
    fn test_spatial_hash_huge_world_is_coarsened() {
        let mut sh = SpatialHash::new(200.0, 1e12, 1e12);
        assert!(sh.cols <= MAX_CELLS_PER_AXIS + 1);
        assert!(sh.rows <= MAX_CELLS_PER_AXIS + 1);
        assert!(sh.cell_size >= 1e12 / MAX_CELLS_PER_AXIS as f64);
        sh.build(&[(5.0e11, 5.0e11), (5.0e11 + 30.0, 5.0e11), (1.0, 1.0)]);
        assert_eq!(sh.query_radius(5.0e11, 5.0e11, 80.0), vec![0, 1]);
    }

    #[test]
    fn test_spatial_hash_skewed_world_is_bounded() {
        let sh = SpatialHash::new(24.0, 1e15, 10.0);
        assert!(sh.cols <= MAX_CELLS_PER_AXIS + 1);
        assert_eq!(sh.rows, 1);
        assert_eq!(sh.cell_offsets.len(), sh.cols * sh.rows + 1);
    }

    #[test]
    fn test_spatial_hash_negative_radius_is_empty() {
        let mut sh = SpatialHash::new(5.0, 20.0, 20.0);
        sh.build(&[(1.0, 1.0)]);
        assert!(sh.query_radius(1.0, 1.0, -1.0).is_empty());
    }
}
