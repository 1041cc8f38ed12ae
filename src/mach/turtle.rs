use super::GRID_SIZE;

const DIRECTIONS: [(i32, i32); 8] = [
    (0, -1),
    (1, -1),
    (1, 0),
    (1, 1),
    (0, 1),
    (-1, 1),
    (-1, 0),
    (-1, -1),
];

/// A cursor on the grid. Headings run clockwise from 0 (north) to 7.
#[derive(Debug, Clone, PartialEq)]
pub struct Turtle {
    x: usize,
    y: usize,
    heading: usize,
}

impl Default for Turtle {
    fn default() -> Turtle {
        Turtle {
            x: 0,
            y: 0,
            heading: 2,
        }
    }
}

fn wrap(coord: usize, delta: i32) -> usize {
    (coord as i32 + delta).rem_euclid(GRID_SIZE as i32) as usize
}

fn clamp(coord: usize, delta: i32) -> usize {
    (coord as i32 + delta).clamp(0, GRID_SIZE as i32 - 1) as usize
}

impl Turtle {
    pub fn x(&self) -> usize {
        self.x
    }
    pub fn y(&self) -> usize {
        self.y
    }
    pub fn heading(&self) -> usize {
        self.heading
    }

    pub fn set_x(&mut self, x: i16) {
        self.x = clamp(0, x as i32);
    }
    pub fn set_y(&mut self, y: i16) {
        self.y = clamp(0, y as i32);
    }
    pub fn set_heading(&mut self, heading: i16) {
        self.heading = (heading as i32).rem_euclid(8) as usize;
    }

    fn delta(&self, n: i16) -> (i32, i32) {
        let (dx, dy) = DIRECTIONS[self.heading];
        (dx * n as i32, dy * n as i32)
    }

    /// Moves `n` cells along the heading, wrapping at the edges.
    pub fn forward(&mut self, n: i16) {
        let (dx, dy) = self.delta(n);
        self.x = wrap(self.x, dx);
        self.y = wrap(self.y, dy);
    }

    /// Moves `n` cells along the heading, stopping at the edges.
    pub fn bump(&mut self, n: i16) {
        let (dx, dy) = self.delta(n);
        self.x = clamp(self.x, dx);
        self.y = clamp(self.y, dy);
    }

    pub fn move_by(&mut self, dx: i16, dy: i16) {
        self.x = clamp(self.x, dx as i32);
        self.y = clamp(self.y, dy as i32);
    }

    /// Turns `n` eighths clockwise.
    pub fn turn(&mut self, n: i16) {
        self.heading = (self.heading as i32 + n as i32).rem_euclid(8) as usize;
    }

    /// Turns `n` quarters clockwise, snapping to the nearest cardinal
    /// heading at or before the current one.
    pub fn quarter_turn(&mut self, n: i16) {
        let quarter = (self.heading / 2) as i32 + n as i32;
        self.heading = quarter.rem_euclid(4) as usize * 2;
    }

    pub fn home(&mut self) {
        *self = Turtle::default();
    }
}
