use crate::config::Palette;
use crate::error::GameError;

/// A grid-aligned square, addressed by the pixel coordinates of its top-left corner.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Cell {
    pub x: i32,
    pub y: i32,
}

impl Cell {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

/// 0x00RRGGBB.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Color(pub u32);

impl Color {
    pub fn rgb(self) -> (u8, u8, u8) {
        ((self.0 >> 16) as u8, (self.0 >> 8) as u8, self.0 as u8)
    }
}

/// Rendering collaborator: fills one `cell_size x cell_size` block.
pub trait Painter {
    fn paint_cell(&mut self, cell: Cell, color: Color);
}

#[derive(Clone, Debug)]
pub struct Board {
    pub width: i32,
    pub height: i32,
    pub cell_size: i32,
    pub light: Color,
    pub dark: Color,
    pub food: Color,
    pub snake: Color,
}

impl Board {
    /// Trims the raw resolution down to whole cells; the remainder is unused margin.
    pub fn new(
        resolution_w: i32,
        resolution_h: i32,
        cell_size: i32,
        palette: &Palette,
    ) -> Result<Self, GameError> {
        if cell_size <= 0 {
            return Err(GameError::InvalidBoard(format!(
                "cell size must be positive, got {}",
                cell_size
            )));
        }
        let width = resolution_w / cell_size * cell_size;
        let height = resolution_h / cell_size * cell_size;
        if width <= 0 || height <= 0 {
            return Err(GameError::InvalidBoard(format!(
                "{}x{} holds no {}px cell",
                resolution_w, resolution_h, cell_size
            )));
        }
        Ok(Self {
            width,
            height,
            cell_size,
            light: Color(palette.light),
            dark: Color(palette.dark),
            food: Color(palette.food),
            snake: Color(palette.snake),
        })
    }

    pub fn cols(&self) -> i32 {
        self.width / self.cell_size
    }

    pub fn rows(&self) -> i32 {
        self.height / self.cell_size
    }

    pub fn total_cells(&self) -> usize {
        self.cols() as usize * self.rows() as usize
    }

    pub fn contains(&self, cell: Cell) -> bool {
        cell.x >= 0 && cell.y >= 0 && cell.x < self.width && cell.y < self.height
    }

    /// Checkerboard colour by `(row + col)` parity.
    pub fn color_of(&self, row: i32, col: i32) -> Color {
        if (row + col) % 2 == 0 {
            self.light
        } else {
            self.dark
        }
    }

    pub fn color_at(&self, cell: Cell) -> Color {
        self.color_of(cell.y / self.cell_size, cell.x / self.cell_size)
    }

    /// Every cell in row-major order: `y` outer, `x` inner.
    pub fn cells(&self) -> impl Iterator<Item = Cell> + '_ {
        let size = self.cell_size;
        (0..self.rows()).flat_map(move |row| {
            (0..self.cols()).map(move |col| Cell::new(col * size, row * size))
        })
    }

    pub fn paint_background<P: Painter>(&self, painter: &mut P) {
        for cell in self.cells() {
            painter.paint_cell(cell, self.color_at(cell));
        }
    }
}
