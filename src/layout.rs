//! Grid geometry: canvas size and per-cell positions.
//!
//! Borders are centered on the cell edge: each dimension grows by one border
//! width and every cell origin shifts by half of it, so the outer strokes are
//! not clipped.

/// Canvas dimensions in user units.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Canvas {
    /// Document width.
    pub width: f32,
    /// Document height.
    pub height: f32,
}

/// Resolved grid geometry for a fixed number of contributors.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GridLayout {
    /// Overall document size.
    pub canvas: Canvas,
    /// Cells per row.
    pub columns: u32,
    /// Row count.
    pub rows: u32,
    /// Cell edge length.
    pub cell_width: u32,
    /// Spacing between cells.
    pub gap: u32,
    /// Offset applied to every cell origin.
    pub border_offset: f32,
}

impl GridLayout {
    /// Compute the layout for `count` cells.
    ///
    /// `rows` fixes the grid height; otherwise just enough rows are used to
    /// hold `count` cells. `columns` must be positive.
    #[must_use]
    pub fn compute(
        count: usize,
        columns: u32,
        rows: Option<u32>,
        cell_width: u32,
        gap: u32,
        border_width: f32,
    ) -> Self {
        debug_assert!(columns > 0, "columns must be positive");
        let needed = count.div_ceil(columns as usize);
        let rows = rows.unwrap_or_else(|| u32::try_from(needed).unwrap_or(u32::MAX));
        let border = border_width.max(0.0);

        let canvas = Canvas {
            width: span(columns, cell_width, gap) + border,
            height: span(rows, cell_width, gap) + border,
        };

        Self { canvas, columns, rows, cell_width, gap, border_offset: border / 2.0 }
    }

    /// Top-left corner of the cell at row-major `index`.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn position(&self, index: usize) -> (f32, f32) {
        let columns = self.columns as usize;
        let pitch = (u64::from(self.cell_width) + u64::from(self.gap)) as f32;
        let col = (index % columns) as f32;
        let row = (index / columns) as f32;
        (col * pitch + self.border_offset, row * pitch + self.border_offset)
    }

    /// Number of cells in the grid.
    #[must_use]
    pub fn cell_count(&self) -> usize {
        (self.columns as usize).saturating_mul(self.rows as usize)
    }
}

/// Length covered by `n` cells and the `n - 1` gaps between them.
#[allow(clippy::cast_precision_loss)]
fn span(n: u32, cell_width: u32, gap: u32) -> f32 {
    let n = u64::from(n);
    (n * u64::from(cell_width) + n.saturating_sub(1) * u64::from(gap)) as f32
}
