/// Side length, in pixels, of one occupancy cell.
pub(crate) const CELL: u32 = 4;

/// Deterministic SplitMix64 generator so a fixed seed reproduces a layout.
#[derive(Clone, Copy, Debug)]
pub(crate) struct Rng64 {
    state: u64,
}

impl Rng64 {
    pub(crate) fn new(seed: u64) -> Self {
        Self { state: seed }
    }

    pub(crate) fn from_clock() -> Self {
        let seed = std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .map(|d| d.as_nanos() as u64)
            .unwrap_or(0x5EED);
        Self::new(seed)
    }

    pub(crate) fn next_u64(&mut self) -> u64 {
        self.state = self.state.wrapping_add(0x9E37_79B9_7F4A_7C15);
        let mut z = self.state;
        z = (z ^ (z >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
        z = (z ^ (z >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
        z ^ (z >> 31)
    }

    /// Uniform in `[0, 1)`.
    pub(crate) fn next_f64(&mut self) -> f64 {
        let v = self.next_u64() >> 11;
        (v as f64) * (1.0 / ((1u64 << 53) as f64))
    }

    /// Uniform in `0..n`; `n` must be non-zero.
    pub(crate) fn below(&mut self, n: usize) -> usize {
        (self.next_u64() % n as u64) as usize
    }
}

/// Coarse occupancy map of the canvas with a summed-area table for O(1) box queries.
pub(crate) struct OccupancyGrid {
    cols: usize,
    rows: usize,
    filled: Vec<bool>,
    // (rows + 1) x (cols + 1)，第 0 列與第 0 行恆為 0
    sat: Vec<u32>,
    candidates: Vec<(usize, usize)>,
}

impl OccupancyGrid {
    pub(crate) fn new(width: u32, height: u32) -> Self {
        let cols = (width / CELL) as usize;
        let rows = (height / CELL) as usize;
        Self {
            cols,
            rows,
            filled: vec![false; cols * rows],
            sat: vec![0; (cols + 1) * (rows + 1)],
            candidates: Vec::new(),
        }
    }

    fn cells_for(px: u32) -> usize {
        px.div_ceil(CELL) as usize
    }

    fn rebuild(&mut self) {
        let stride = self.cols + 1;
        for y in 0..self.rows {
            let mut row_sum = 0u32;
            for x in 0..self.cols {
                row_sum += self.filled[y * self.cols + x] as u32;
                self.sat[(y + 1) * stride + (x + 1)] = self.sat[y * stride + (x + 1)] + row_sum;
            }
        }
    }

    fn occupied_in(&self, x: usize, y: usize, w: usize, h: usize) -> u32 {
        let stride = self.cols + 1;
        let (x1, y1) = (x + w, y + h);
        self.sat[y1 * stride + x1] + self.sat[y * stride + x]
            - self.sat[y * stride + x1]
            - self.sat[y1 * stride + x]
    }

    /// Picks a random free top-left position (in pixels) for a box of the given pixel size.
    pub(crate) fn sample_position(
        &mut self,
        width_px: u32,
        height_px: u32,
        rng: &mut Rng64,
    ) -> Option<(u32, u32)> {
        let w = Self::cells_for(width_px).max(1);
        let h = Self::cells_for(height_px).max(1);
        if w > self.cols || h > self.rows {
            return None;
        }

        let mut candidates = std::mem::take(&mut self.candidates);
        candidates.clear();
        for y in 0..=(self.rows - h) {
            for x in 0..=(self.cols - w) {
                if self.occupied_in(x, y, w, h) == 0 {
                    candidates.push((x, y));
                }
            }
        }

        let picked = if candidates.is_empty() {
            None
        } else {
            let (x, y) = candidates[rng.below(candidates.len())];
            Some((x as u32 * CELL, y as u32 * CELL))
        };
        self.candidates = candidates;
        picked
    }

    /// Marks every cell touched by the pixel box as occupied.
    pub(crate) fn mark(&mut self, x_px: u32, y_px: u32, width_px: u32, height_px: u32) {
        let x0 = (x_px / CELL) as usize;
        let y0 = (y_px / CELL) as usize;
        let x1 = Self::cells_for(x_px + width_px).min(self.cols);
        let y1 = Self::cells_for(y_px + height_px).min(self.rows);
        for y in y0..y1 {
            for x in x0..x1 {
                self.filled[y * self.cols + x] = true;
            }
        }
        self.rebuild();
    }

    #[cfg(test)]
    pub(crate) fn is_free(&self, x_px: u32, y_px: u32, width_px: u32, height_px: u32) -> bool {
        let x = (x_px / CELL) as usize;
        let y = (y_px / CELL) as usize;
        let w = Self::cells_for(width_px).max(1);
        let h = Self::cells_for(height_px).max(1);
        x + w <= self.cols && y + h <= self.rows && self.occupied_in(x, y, w, h) == 0
    }
}
