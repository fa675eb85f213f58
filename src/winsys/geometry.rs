use std::ops::Add;

#[derive(Debug, Copy, Clone, Hash, PartialOrd, Ord, PartialEq, Eq)]
pub struct Pos {
    pub x: i32,
    pub y: i32,
}

impl Default for Pos {
    fn default() -> Self {
        Self {
            x: 0,
            y: 0,
        }
    }
}

impl Add<Pos> for Pos {
    type Output = Self;

    fn add(
        self,
        other: Pos,
    ) -> Self::Output {
        Self::Output {
            x: self.x + other.x,
            y: self.y + other.y,
        }
    }
}

#[derive(Debug, Copy, Clone, Hash, PartialOrd, Ord, PartialEq, Eq)]
pub struct Dim {
    pub w: i32,
    pub h: i32,
}

impl Default for Dim {
    fn default() -> Self {
        Self {
            w: 0,
            h: 0,
        }
    }
}

#[derive(Debug, Copy, Clone, Hash, PartialOrd, Ord, PartialEq, Eq)]
pub struct Region {
    pub pos: Pos,
    pub dim: Dim,
}

impl Default for Region {
    fn default() -> Self {
        Self {
            pos: Default::default(),
            dim: Default::default(),
        }
    }
}

impl Region {
    pub fn new(
        x: i32,
        y: i32,
        w: i32,
        h: i32,
    ) -> Self {
        Self {
            pos: Pos {
                x,
                y,
            },
            dim: Dim {
                w,
                h,
            },
        }
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.dim.w <= 0 || self.dim.h <= 0
    }

    /// Splits off a strip of `height` pixels from the top, returning the
    /// strip and the remainder.
    pub fn split_top(
        &self,
        height: i32,
    ) -> (Region, Region) {
        let height = height.max(0).min(self.dim.h);

        (
            Region::new(self.pos.x, self.pos.y, self.dim.w, height),
            Region::new(
                self.pos.x,
                self.pos.y + height,
                self.dim.w,
                self.dim.h - height,
            ),
        )
    }

    /// Tiles the region into `cols` x `rows` cells, in row-major order.
    /// Integer division only; leftover pixels are absorbed by the last
    /// column and row so the cells cover the region exactly.
    pub fn split_grid(
        &self,
        cols: usize,
        rows: usize,
    ) -> Vec<Region> {
        if cols == 0 || rows == 0 {
            return Vec::new();
        }

        let cell_w = self.dim.w / cols as i32;
        let cell_h = self.dim.h / rows as i32;

        (0..rows)
            .flat_map(|row| (0..cols).map(move |col| (row, col)))
            .map(|(row, col)| {
                let x = self.pos.x + col as i32 * cell_w;
                let y = self.pos.y + row as i32 * cell_h;

                let w = if col + 1 == cols {
                    self.pos.x + self.dim.w - x
                } else {
                    cell_w
                };

                let h = if row + 1 == rows {
                    self.pos.y + self.dim.h - y
                } else {
                    cell_h
                };

                Region::new(x, y, w, h)
            })
            .collect()
    }

    pub fn shrink(
        &self,
        by: i32,
    ) -> Self {
        Region::new(
            self.pos.x + by,
            self.pos.y + by,
            (self.dim.w - 2 * by).max(0),
            (self.dim.h - 2 * by).max(0),
        )
    }
}
