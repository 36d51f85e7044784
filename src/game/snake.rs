use super::board::Cell;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    pub fn delta(self) -> (i32, i32) {
        match self {
            Direction::Up => (0, -1),
            Direction::Down => (0, 1),
            Direction::Left => (-1, 0),
            Direction::Right => (1, 0),
        }
    }

    /// True when the two unit vectors cancel out component-wise.
    pub fn is_reverse_of(self, other: Direction) -> bool {
        let (dx, dy) = self.delta();
        let (ox, oy) = other.delta();
        dx + ox == 0 && dy + oy == 0
    }

    pub fn step(self, from: Cell, cell_size: i32) -> Cell {
        let (dx, dy) = self.delta();
        Cell::new(from.x + dx * cell_size, from.y + dy * cell_size)
    }
}

/// The snake, head first. Segments are only reachable by index or by value.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SnakeBody {
    segments: Vec<Cell>,
}

impl SnakeBody {
    pub fn new(head: Cell) -> Self {
        Self {
            segments: vec![head],
        }
    }

    /// Builds a body from head-first cells; `None` when `cells` is empty.
    #[cfg(test)]
    pub fn from_cells(cells: Vec<Cell>) -> Option<Self> {
        if cells.is_empty() {
            None
        } else {
            Some(Self { segments: cells })
        }
    }

    pub fn len(&self) -> usize {
        self.segments.len()
    }

    pub fn head(&self) -> Cell {
        self.segments[0]
    }

    pub fn tail(&self) -> Cell {
        self.segments[self.segments.len() - 1]
    }

    pub fn iter(&self) -> impl Iterator<Item = Cell> + '_ {
        self.segments.iter().copied()
    }

    pub fn occupies(&self, cell: Cell) -> bool {
        self.segments.iter().any(|&segment| segment == cell)
    }

    /// True when the head overlaps any other segment.
    pub fn head_collides(&self) -> bool {
        let head = self.head();
        self.segments[1..].iter().any(|&segment| segment == head)
    }

    /// Moves every segment into its predecessor's old slot and puts `new_head`
    /// at index 0. When `grew`, the old tail is duplicated into a new last slot
    /// first, so it stays in place and the body gets one cell longer.
    pub fn advance(&mut self, new_head: Cell, grew: bool) {
        if grew {
            self.segments.push(self.tail());
        }
        for i in (1..self.segments.len()).rev() {
            self.segments[i] = self.segments[i - 1];
        }
        self.segments[0] = new_head;
    }
}
