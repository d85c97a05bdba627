/// Coarse collision map over the surface. `true` means free.
///
/// Cells are stored column-major (`x * ngy + y`); coordinates are signed so that glyph offsets
/// translated past the edge can be tested without wrapping.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct OccupancyGrid {
    ngx: i32,
    ngy: i32,
    cells: Vec<bool>,
}

impl OccupancyGrid {
    /// All-free grid of `ngx * ngy` cells.
    pub fn new(ngx: u32, ngy: u32) -> Self {
        Self {
            ngx: ngx as i32,
            ngy: ngy as i32,
            cells: vec![true; ngx as usize * ngy as usize],
        }
    }

    /// Grid covering a `width * height` pixel surface with `grid_size` pixel cells.
    pub fn for_surface(width: u32, height: u32, grid_size: u32) -> Self {
        Self::new(width.div_ceil(grid_size), height.div_ceil(grid_size))
    }

    /// Number of columns.
    pub fn width(&self) -> u32 {
        self.ngx as u32
    }

    /// Number of rows.
    pub fn height(&self) -> u32 {
        self.ngy as u32
    }

    /// Mark every cell free again.
    pub fn reset(&mut self) {
        self.cells.fill(true);
    }

    /// `true` when `(x, y)` is inside the grid.
    pub fn contains(&self, x: i32, y: i32) -> bool {
        x >= 0 && y >= 0 && x < self.ngx && y < self.ngy
    }

    /// `true` when `(x, y)` is inside the grid and free.
    pub fn is_free(&self, x: i32, y: i32) -> bool {
        self.contains(x, y) && self.cells[self.index(x, y)]
    }

    /// Count of occupied cells.
    pub fn occupied_count(&self) -> usize {
        self.cells.iter().filter(|free| !**free).count()
    }

    /// Whether a glyph with cell `offsets` fits with its top-left grid origin at `(gx, gy)`.
    ///
    /// Offsets landing outside the grid reject the candidate unless `allow_out_of_bound`.
    pub fn can_fit(&self, gx: i32, gy: i32, offsets: &[(i32, i32)], allow_out_of_bound: bool) -> bool {
        offsets.iter().rev().all(|&(ox, oy)| {
            let (px, py) = (gx + ox, gy + oy);
            if !self.contains(px, py) {
                return allow_out_of_bound;
            }
            self.cells[self.index(px, py)]
        })
    }

    /// Occupy the cells covered by `offsets` at `(gx, gy)`, silently skipping off-grid cells.
    ///
    /// Returns the newly covered in-grid cells in absolute coordinates.
    pub fn mark(&mut self, gx: i32, gy: i32, offsets: &[(i32, i32)]) -> Vec<(i32, i32)> {
        let mut marked = Vec::with_capacity(offsets.len());
        for &(ox, oy) in offsets.iter().rev() {
            let (px, py) = (gx + ox, gy + oy);
            if !self.contains(px, py) {
                continue;
            }
            let i = self.index(px, py);
            self.cells[i] = false;
            marked.push((px, py));
        }
        marked
    }

    fn index(&self, x: i32, y: i32) -> usize {
        x as usize * self.ngy as usize + y as usize
    }
}

#[cfg(test)]
#[path = "../../tests/unit/layout/grid.rs"]
mod tests;
