use super::DELAY_SIZE;
use crate::error;
use crate::lang::{ast::Command, Error};
use std::rc::Rc;

type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Clone)]
pub struct DelayEntry {
    fire: u32,
    seq: u64,
    pub script: usize,
    /// Loop index captured when the entry was scheduled.
    pub i: i16,
    pub command: Rc<Command>,
}

impl DelayEntry {
    pub fn fire_tick(&self) -> u32 {
        self.fire
    }
}

/// `a` comes no later than `b` on the wrapping tick clock.
fn not_after(a: u32, b: u32) -> bool {
    (b.wrapping_sub(a) as i32) >= 0
}

/// Fixed-capacity queue of deferred commands, ordered by fire tick and
/// then by scheduling order.
#[derive(Debug)]
pub struct DelayQueue {
    slots: [Option<DelayEntry>; DELAY_SIZE],
    seq: u64,
}

impl Default for DelayQueue {
    fn default() -> DelayQueue {
        DelayQueue {
            slots: std::array::from_fn(|_| None),
            seq: 0,
        }
    }
}

impl DelayQueue {
    pub fn new() -> DelayQueue {
        DelayQueue::default()
    }

    pub fn len(&self) -> usize {
        self.slots.iter().filter(|s| s.is_some()).count()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.iter().all(|s| s.is_none())
    }

    /// Fails with `DelayQueueFull` when every slot is taken; the new
    /// entry is dropped.
    pub fn schedule(
        &mut self,
        script: usize,
        i: i16,
        command: Rc<Command>,
        fire: u32,
    ) -> Result<()> {
        let slot = match self.slots.iter_mut().find(|s| s.is_none()) {
            Some(slot) => slot,
            None => return Err(error!(DelayQueueFull)),
        };
        *slot = Some(DelayEntry {
            fire,
            seq: self.seq,
            script,
            i,
            command,
        });
        self.seq += 1;
        Ok(())
    }

    /// Removes the earliest entry due at `now`.
    pub fn pop_due(&mut self, now: u32) -> Option<DelayEntry> {
        self.pop_due_before(now, u64::MAX)
    }

    /// Sequence number the next scheduled entry will get.
    pub fn next_seq(&self) -> u64 {
        self.seq
    }

    /// Like `pop_due`, ignoring entries scheduled at or after `seq`.
    pub fn pop_due_before(&mut self, now: u32, seq: u64) -> Option<DelayEntry> {
        let mut best: Option<(usize, u32, u64)> = None;
        for (n, slot) in self.slots.iter().enumerate() {
            let entry = match slot {
                Some(entry) if entry.seq < seq && not_after(entry.fire, now) => entry,
                _ => continue,
            };
            let earlier = match best {
                None => true,
                Some((_, fire, seq)) => {
                    (entry.fire != fire && not_after(entry.fire, fire))
                        || (entry.fire == fire && entry.seq < seq)
                }
            };
            if earlier {
                best = Some((n, entry.fire, entry.seq));
            }
        }
        let (n, _, _) = best?;
        self.slots[n].take()
    }

    pub fn iter(&self) -> impl Iterator<Item = &DelayEntry> {
        self.slots.iter().flatten()
    }

    pub fn cancel_all(&mut self) {
        self.slots.iter_mut().for_each(|s| *s = None);
    }

    /// Drops every entry owned by `script`.
    pub fn cancel_script(&mut self, script: usize) {
        for slot in self.slots.iter_mut() {
            if matches!(slot, Some(entry) if entry.script == script) {
                *slot = None;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lang::ErrorCode;

    fn literal(n: i16) -> Rc<Command> {
        Rc::new(Command::Literal(n))
    }

    fn fired(q: &mut DelayQueue, now: u32) -> Vec<i16> {
        let mut v = vec![];
        while let Some(entry) = q.pop_due(now) {
            if let Command::Literal(n) = *entry.command {
                v.push(n);
            }
        }
        v
    }

    #[test]
    fn test_order_by_tick_then_schedule() {
        let mut q = DelayQueue::new();
        q.schedule(0, 0, literal(3), 30).unwrap();
        q.schedule(0, 0, literal(1), 10).unwrap();
        q.schedule(0, 0, literal(2), 10).unwrap();
        q.schedule(0, 0, literal(4), 40).unwrap();
        assert_eq!(fired(&mut q, 30), vec![1, 2, 3]);
        assert_eq!(q.len(), 1);
        assert_eq!(fired(&mut q, 40), vec![4]);
    }

    #[test]
    fn test_wrapping_ticks() {
        let mut q = DelayQueue::new();
        q.schedule(0, 0, literal(2), 5).unwrap();
        q.schedule(0, 0, literal(1), u32::MAX - 5).unwrap();
        assert_eq!(fired(&mut q, u32::MAX), vec![1]);
        assert_eq!(fired(&mut q, 10), vec![2]);
    }

    #[test]
    fn test_full_and_cancel() {
        let mut q = DelayQueue::new();
        for n in 0..DELAY_SIZE {
            q.schedule(n % 2, 0, literal(0), 1).unwrap();
        }
        let e = q.schedule(0, 0, literal(0), 1).unwrap_err();
        assert_eq!(e.code(), ErrorCode::DelayQueueFull);
        q.cancel_script(1);
        assert_eq!(q.len(), DELAY_SIZE / 2);
        q.cancel_all();
        assert!(q.is_empty());
    }
}
