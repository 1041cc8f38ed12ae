use super::PATTERN_LENGTH;
use rand::Rng;

/// A fixed buffer of values with an active window `start..end`, a
/// cursor and a data length used by the push/pop/insert family.
///
/// The cursor stays inside the window: `start <= index < end`, or
/// `index == start` when the window is empty.
#[derive(Debug, Clone, PartialEq)]
pub struct Pattern {
    values: [i16; PATTERN_LENGTH],
    len: usize,
    start: usize,
    end: usize,
    index: usize,
    wrap: bool,
}

impl Default for Pattern {
    fn default() -> Pattern {
        Pattern {
            values: [0; PATTERN_LENGTH],
            len: 0,
            start: 0,
            end: PATTERN_LENGTH,
            index: 0,
            wrap: true,
        }
    }
}

impl Pattern {
    /// Rebuilds a pattern from stored fields, or `None` if they break
    /// the window invariants.
    pub fn from_parts(
        values: [i16; PATTERN_LENGTH],
        len: usize,
        start: usize,
        end: usize,
        index: usize,
        wrap: bool,
    ) -> Option<Pattern> {
        let in_window = if start < end {
            (start..end).contains(&index)
        } else {
            index == start
        };
        if len > PATTERN_LENGTH || start > end || end > PATTERN_LENGTH || !in_window {
            return None;
        }
        Some(Pattern {
            values,
            len,
            start,
            end,
            index,
            wrap,
        })
    }

    pub fn values(&self) -> &[i16; PATTERN_LENGTH] {
        &self.values
    }
    pub fn len(&self) -> usize {
        self.len
    }
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }
    pub fn start(&self) -> usize {
        self.start
    }
    pub fn end(&self) -> usize {
        self.end
    }
    pub fn index(&self) -> usize {
        self.index
    }
    pub fn wrap(&self) -> bool {
        self.wrap
    }

    fn slot(&self) -> usize {
        self.index.min(PATTERN_LENGTH - 1)
    }

    /// Negative positions count back from the data length.
    fn position(&self, i: i16) -> usize {
        let i = if i < 0 { self.len as i32 + i as i32 } else { i as i32 };
        i.clamp(0, PATTERN_LENGTH as i32 - 1) as usize
    }

    fn clamp_index(&mut self) {
        if self.start >= self.end {
            self.index = self.start;
        } else {
            self.index = self.index.clamp(self.start, self.end - 1);
        }
    }

    pub fn get(&self) -> i16 {
        self.values[self.slot()]
    }

    pub fn set(&mut self, value: i16) {
        let slot = self.slot();
        self.values[slot] = value;
    }

    pub fn get_at(&self, i: i16) -> i16 {
        self.values[self.position(i)]
    }

    pub fn set_at(&mut self, i: i16, value: i16) {
        let pos = self.position(i);
        self.values[pos] = value;
    }

    /// Moves the cursor by `n` inside the window and returns the value
    /// now under it.
    pub fn step(&mut self, n: i16) -> i16 {
        if self.start < self.end {
            let (start, end) = (self.start as i32, self.end as i32);
            let moved = self.index as i32 + n as i32;
            self.index = if self.wrap {
                ((moved - start).rem_euclid(end - start) + start) as usize
            } else {
                moved.clamp(start, end - 1) as usize
            };
        }
        self.get()
    }

    pub fn set_index(&mut self, i: i16) {
        self.index = self.position(i);
        self.clamp_index();
    }

    /// Rejected when it would pass `end`.
    pub fn set_start(&mut self, start: i16) -> bool {
        if start < 0 || start as usize > self.end {
            return false;
        }
        self.start = start as usize;
        self.clamp_index();
        true
    }

    /// Rejected when it would precede `start` or exceed capacity.
    pub fn set_end(&mut self, end: i16) -> bool {
        if end < 0 || (end as usize) < self.start || end as usize > PATTERN_LENGTH {
            return false;
        }
        self.end = end as usize;
        self.clamp_index();
        true
    }

    pub fn set_len(&mut self, len: i16) {
        self.len = len.clamp(0, PATTERN_LENGTH as i16) as usize;
    }

    pub fn set_wrap(&mut self, wrap: bool) {
        self.wrap = wrap;
    }

    /// Values after `i` shift right; the last value falls off when full.
    pub fn insert(&mut self, i: i16, value: i16) {
        let pos = self.position(i).min(self.len);
        if pos >= PATTERN_LENGTH {
            return;
        }
        self.values.copy_within(pos..PATTERN_LENGTH - 1, pos + 1);
        self.values[pos] = value;
        self.len = (self.len + 1).min(PATTERN_LENGTH);
    }

    pub fn remove(&mut self, i: i16) -> i16 {
        if self.len == 0 {
            return 0;
        }
        let pos = self.position(i).min(self.len - 1);
        let value = self.values[pos];
        self.values.copy_within(pos + 1..self.len, pos);
        self.len -= 1;
        self.values[self.len] = 0;
        value
    }

    pub fn push(&mut self, value: i16) {
        if self.len < PATTERN_LENGTH {
            self.values[self.len] = value;
            self.len += 1;
        }
    }

    pub fn pop(&mut self) -> i16 {
        if self.len == 0 {
            return 0;
        }
        self.len -= 1;
        self.values[self.len]
    }

    /// Position of the smallest value within the data length.
    pub fn min_index(&self) -> i16 {
        self.values[..self.len]
            .iter()
            .enumerate()
            .min_by_key(|(n, v)| (**v, *n))
            .map_or(0, |(n, _)| n as i16)
    }

    pub fn max_index(&self) -> i16 {
        self.values[..self.len]
            .iter()
            .enumerate()
            .max_by_key(|(n, v)| (**v, std::cmp::Reverse(*n)))
            .map_or(0, |(n, _)| n as i16)
    }

    /// A value picked at random from the window.
    pub fn random<R: Rng>(&self, rng: &mut R) -> i16 {
        if self.start >= self.end {
            return self.get();
        }
        self.values[rng.gen_range(self.start..self.end)]
    }

    /// Puts the cursor back at the start of the window.
    pub fn rewind(&mut self) {
        self.index = self.start;
        self.clamp_index();
    }
}
