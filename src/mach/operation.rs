use super::CV_MAX;
use crate::lang::Op;

/// Integer arithmetic behind the pure operators. Results wrap on
/// overflow and division by zero gives zero.
pub struct Operation {}

const VOLTS: [i16; 11] = [
    0, 1638, 3277, 4915, 6554, 8192, 9830, 11469, 13107, 14746, 16383,
];

fn flag(b: bool) -> i16 {
    b as i16
}

fn saturate(n: i32) -> i16 {
    n.clamp(i16::MIN as i32, i16::MAX as i32) as i16
}

impl Operation {
    /// Evaluates a pure operator over already evaluated operands.
    pub fn pure(op: Op, a: &[i16]) -> i16 {
        let x = |n: usize| a.get(n).copied().unwrap_or(0);
        use Op::*;
        match op {
            Add => x(0).wrapping_add(x(1)),
            Sub => x(0).wrapping_sub(x(1)),
            Mul => x(0).wrapping_mul(x(1)),
            Div => Operation::divide(x(0), x(1)),
            Modulo => Operation::modulo(x(0), x(1)),
            Min => x(0).min(x(1)),
            Max => x(0).max(x(1)),
            Lim => Operation::limit(x(0), x(1), x(2)),
            Wrap => Operation::wrap(x(0), x(1), x(2)),
            Avg => ((x(0) as i32 + x(1) as i32) / 2) as i16,
            Abs => x(0).wrapping_abs(),
            Sgn => x(0).signum(),
            Eq => flag(x(0) == x(1)),
            Ne => flag(x(0) != x(1)),
            Lt => flag(x(0) < x(1)),
            Gt => flag(x(0) > x(1)),
            Lte => flag(x(0) <= x(1)),
            Gte => flag(x(0) >= x(1)),
            Inr => flag(x(0) < x(1) && x(1) < x(2)),
            Outr => flag(x(1) < x(0) || x(1) > x(2)),
            Ez => flag(x(0) == 0),
            Nz => flag(x(0) != 0),
            And => flag(x(0) != 0 && x(1) != 0),
            Or => flag(x(0) != 0 || x(1) != 0),
            Xor => flag((x(0) != 0) != (x(1) != 0)),
            BitAnd => x(0) & x(1),
            BitOr => x(0) | x(1),
            BitXor => x(0) ^ x(1),
            BitNot => !x(0),
            Lsh => Operation::shift(x(0), x(1)),
            Rsh => Operation::shift(x(0), x(1).wrapping_neg()),
            Qt => Operation::quantize(x(0), x(1)),
            N => Operation::note(x(0)),
            V => Operation::volts(x(0)),
            Vv => Operation::millivolts(x(0)),
            Bpm => Operation::bpm(x(0)),
            _ => 0,
        }
    }

    pub fn divide(lhs: i16, rhs: i16) -> i16 {
        if rhs == 0 {
            0
        } else {
            lhs.wrapping_div(rhs)
        }
    }

    pub fn modulo(lhs: i16, rhs: i16) -> i16 {
        if rhs == 0 {
            0
        } else {
            lhs.wrapping_rem(rhs)
        }
    }

    pub fn limit(n: i16, lo: i16, hi: i16) -> i16 {
        if n < lo {
            lo
        } else if n > hi {
            hi
        } else {
            n
        }
    }

    /// Wraps `n` into `lo..=hi`.
    pub fn wrap(n: i16, lo: i16, hi: i16) -> i16 {
        let (lo, hi) = if lo <= hi { (lo, hi) } else { (hi, lo) };
        let span = hi as i32 - lo as i32 + 1;
        (lo as i32 + (n as i32 - lo as i32).rem_euclid(span)) as i16
    }

    /// Positive counts shift left, negative counts shift right.
    pub fn shift(n: i16, by: i16) -> i16 {
        if by >= 16 || by <= -16 {
            if by > 0 || n >= 0 {
                0
            } else {
                -1
            }
        } else if by >= 0 {
            n.wrapping_shl(by as u32)
        } else {
            n >> (-by) as u32
        }
    }

    /// Rounds `n` to the nearest multiple of `step`.
    pub fn quantize(n: i16, step: i16) -> i16 {
        if step == 0 {
            return n;
        }
        let step = (step as i32).abs();
        let r = (n as i32).rem_euclid(step);
        let base = n as i32 - r;
        let q = if 2 * r >= step { base + step } else { base };
        saturate(q)
    }

    /// Equal-tempered semitone to CV units, ten octaves full scale.
    pub fn note(n: i16) -> i16 {
        let n = n.clamp(-127, 127) as i32;
        let scaled = ((n.abs() * 16384 * 2 + 120) / 240).min(CV_MAX as i32);
        saturate(if n < 0 { -scaled } else { scaled })
    }

    pub fn volts(n: i16) -> i16 {
        let v = VOLTS[(n as i32).unsigned_abs().min(10) as usize];
        if n < 0 {
            -v
        } else {
            v
        }
    }

    /// Hundredths of a volt to CV units.
    pub fn millivolts(n: i16) -> i16 {
        let n = n.clamp(-1000, 1000) as i32;
        let scaled = (n.abs() * 16384 + 500) / 1000;
        let scaled = scaled.min(CV_MAX as i32);
        saturate(if n < 0 { -scaled } else { scaled })
    }

    /// Milliseconds per beat.
    pub fn bpm(n: i16) -> i16 {
        (60000 / n.clamp(2, 1000) as i32) as i16
    }
}
