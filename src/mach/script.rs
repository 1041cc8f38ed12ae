use super::MAX_LINES;
use crate::error;
use crate::lang::{ast::Command, Error, Line};
use std::rc::Rc;

type Result<T> = std::result::Result<T, Error>;

/// Up to `MAX_LINES` compiled lines.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Script {
    lines: Vec<Line>,
}

impl Script {
    pub fn new() -> Script {
        Script {
            lines: Vec::with_capacity(MAX_LINES),
        }
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    pub fn lines(&self) -> &[Line] {
        &self.lines
    }

    pub fn line(&self, n: usize) -> Option<&Line> {
        self.lines.get(n)
    }

    pub fn command(&self, n: usize) -> Option<Rc<Command>> {
        self.lines.get(n).map(|l| l.command())
    }

    /// Replaces line `n`, or appends when `n` is one past the end.
    pub fn set_line(&mut self, n: usize, line: Line) -> Result<()> {
        if n < self.lines.len() {
            self.lines[n] = line;
            Ok(())
        } else if n == self.lines.len() {
            self.insert_line(n, line)
        } else {
            Err(error!(NoSuchLine))
        }
    }

    pub fn insert_line(&mut self, n: usize, line: Line) -> Result<()> {
        if n > self.lines.len() {
            return Err(error!(NoSuchLine));
        }
        if self.lines.len() >= MAX_LINES {
            return Err(error!(ScriptFull));
        }
        self.lines.insert(n, line);
        Ok(())
    }

    pub fn delete_line(&mut self, n: usize) -> Result<Line> {
        if n >= self.lines.len() {
            return Err(error!(NoSuchLine));
        }
        Ok(self.lines.remove(n))
    }

    pub fn clear(&mut self) {
        self.lines.clear();
    }
}

/// Per-line counter behind `EVERY`, `SKIP` and `OTHER`.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Every {
    count: i16,
}

impl Every {
    /// Advances the counter; true on every `n`th call.
    pub fn tick(&mut self, n: i16) -> bool {
        let n = n.max(1);
        self.count += 1;
        if self.count >= n {
            self.count = 0;
        }
        self.count == 0
    }

    pub fn reset(&mut self) {
        self.count = 0;
    }
}
