use super::midi::MIDI_EVENT_KINDS;
use super::runtime::Context;
use super::*;
use crate::lang::{Op, PatOp, Special};
use rand::{rngs::StdRng, Rng, SeedableRng};

/// Zero-based index for a one-based channel number.
fn channel(n: i16, count: usize) -> Option<usize> {
    if n >= 1 && n as usize <= count {
        Some(n as usize - 1)
    } else {
        None
    }
}

/// Zero-based index kept inside `0..count`.
fn position(n: i16, count: usize) -> Option<usize> {
    if n >= 0 && (n as usize) < count {
        Some(n as usize)
    } else {
        None
    }
}

fn bank(n: i16) -> usize {
    n.clamp(0, PATTERN_COUNT as i16 - 1) as usize
}

fn level(n: i16) -> u8 {
    n.clamp(0, 15) as u8
}

impl Scene {
    /// Getter form of a side-effecting operator.
    pub(crate) fn get(&mut self, io: &mut dyn Io, ctx: &mut Context, op: Op, a: &[i16]) -> i16 {
        let x = |n: usize| a.get(n).copied().unwrap_or(0);
        use Op::*;
        match op {
            Rand => {
                let n = x(0);
                self.rng.gen_range(n.min(0)..=n.max(0))
            }
            Rrand => {
                let (lo, hi) = (x(0).min(x(1)), x(0).max(x(1)));
                self.rng.gen_range(lo..=hi)
            }
            Toss => self.rng.gen_range(0..=1),
            Seed => self.seed,
            Cv => channel(x(0), CV_COUNT).map_or(0, |ch| self.outputs.cv[ch]),
            CvSlew => channel(x(0), CV_COUNT).map_or(0, |ch| self.outputs.cv_slew[ch]),
            CvOff => channel(x(0), CV_COUNT).map_or(0, |ch| self.outputs.cv_off[ch]),
            CvSet => {
                if let Some(ch) = channel(x(0), CV_COUNT) {
                    self.write_cv(io, ch, x(1), false);
                }
                0
            }
            Tr => channel(x(0), TR_COUNT).map_or(0, |ch| self.outputs.tr[ch] as i16),
            TrPol => channel(x(0), TR_COUNT).map_or(0, |ch| self.outputs.tr_pol[ch] as i16),
            TrTime => channel(x(0), TR_COUNT).map_or(0, |ch| self.outputs.tr_time[ch]),
            TrTog => {
                if let Some(ch) = channel(x(0), TR_COUNT) {
                    let high = !self.outputs.tr[ch];
                    self.outputs.tr[ch] = high;
                    io.tr(ch, high);
                }
                0
            }
            TrPulse => {
                if let Some(ch) = channel(x(0), TR_COUNT) {
                    let high = self.outputs.tr_pol[ch];
                    self.outputs.tr[ch] = high;
                    io.tr(ch, high);
                    io.tr_pulse(ch, self.outputs.tr_time[ch]);
                }
                0
            }
            Metro => self.metro,
            MetroAct => self.metro_act as i16,
            MetroReset => {
                io.metro_reset();
                0
            }
            Time => self.time(io),
            TimeAct => self.time_act as i16,
            Last => channel(x(0), SCRIPT_COUNT).map_or(0, |s| {
                io.ticks()
                    .wrapping_sub(self.last_run[s])
                    .min(i16::MAX as u32) as i16
            }),
            Scene => self.slot as i16,
            Script => {
                if ctx.script < SCRIPT_COUNT {
                    ctx.script as i16 + 1
                } else {
                    0
                }
            }
            ScriptPol => channel(x(0), TRIGGER_COUNT).map_or(0, |n| self.polarity[n] as i16),
            Mute => channel(x(0), TRIGGER_COUNT).map_or(0, |n| self.mutes[n] as i16),
            State => channel(x(0), TRIGGER_COUNT).map_or(0, |n| io.input_state(n) as i16),
            Break => {
                ctx.breaking = true;
                0
            }
            Kill => {
                self.kill(io);
                0
            }
            InitP => {
                if let Some(n) = position(x(0), PATTERN_COUNT) {
                    self.patterns[n] = Pattern::default();
                }
                0
            }
            InitPAll => {
                self.patterns = Default::default();
                0
            }
            InitData => {
                self.globals = [0; VAR_COUNT];
                self.patterns = Default::default();
                io.vars_updated();
                0
            }
            DelClr => {
                self.delays.cancel_all();
                0
            }
            StackClr => {
                self.stack.clear();
                0
            }
            StackAll => {
                for _ in 0..self.stack.len() {
                    match self.stack.pop() {
                        Some(entry) => self.run_stacked(io, ctx.depth, entry),
                        None => break,
                    }
                }
                0
            }
            StackPop => {
                if let Some(entry) = self.stack.pop() {
                    self.run_stacked(io, ctx.depth, entry);
                }
                0
            }
            StackLen => self.stack.len() as i16,
            PatBank => self.bank as i16,
            P(p) => self.pattern_get(self.bank, p, a),
            PN(p) => self.pattern_get(bank(x(0)), p, a.get(1..).unwrap_or(&[])),
            Turtle => {
                let (tx, ty) = (self.turtle.x(), self.turtle.y());
                self.grid_led(tx, ty) as i16
            }
            TurtleX => self.turtle.x() as i16,
            TurtleY => self.turtle.y() as i16,
            TurtleDir => self.turtle.heading() as i16,
            TurtleStep => {
                self.turtle.forward(1);
                0
            }
            TurtleFwd => {
                self.turtle.forward(x(0));
                0
            }
            TurtleBump => {
                self.turtle.bump(x(0));
                0
            }
            TurtleMove => {
                self.turtle.move_by(x(0), x(1));
                0
            }
            TurtleTurn => {
                self.turtle.turn(x(0));
                0
            }
            TurtleQTurn => {
                self.turtle.quarter_turn(x(0));
                0
            }
            TurtleHome => {
                self.turtle.home();
                0
            }
            GridLed => match (position(x(0), GRID_SIZE), position(x(1), GRID_SIZE)) {
                (Some(gx), Some(gy)) => self.grid[gy][gx] as i16,
                _ => 0,
            },
            GridClr => {
                self.grid = [[0; GRID_SIZE]; GRID_SIZE];
                io.grid_updated();
                0
            }
            GridKey => match (position(x(0), GRID_SIZE), position(x(1), GRID_SIZE)) {
                (Some(gx), Some(gy)) => self.keys[gy][gx] as i16,
                _ => 0,
            },
            IiTx => {
                let [hi, lo] = x(2).to_be_bytes();
                io.ii_tx(x(0).clamp(0, 127) as u8, &[x(1) as u8, hi, lo]);
                0
            }
            IiRx => {
                let addr = x(0).clamp(0, 127) as u8;
                io.ii_tx(addr, &[x(1) as u8]);
                let mut reply = [0u8; 2];
                io.ii_rx(addr, &mut reply);
                i16::from_be_bytes(reply)
            }
            InCalMin | InCalMax | ParamCalMin | ParamCalMax => self.calibrate(io, op),
            InCalReset => {
                self.calibration.in_min = 0;
                self.calibration.in_max = CV_MAX as u16;
                io.save_calibration(&self.calibration);
                0
            }
            ParamCalReset => {
                self.calibration.param_min = 0;
                self.calibration.param_max = CV_MAX as u16;
                io.save_calibration(&self.calibration);
                0
            }
            MidiBind => channel(x(0), MIDI_EVENT_KINDS)
                .map_or(0, |k| self.midi.bindings[k] as i16 + 1),
            MidiLastEvent => self.midi.last_event,
            MidiLastChannel => self.midi.last_channel,
            MidiLastNote => self.midi.last_note,
            MidiLastVelocity => self.midi.last_velocity,
            MidiLastController => self.midi.last_controller,
            MidiLastCc => self.midi.last_cc,
            MidiNoteCount => self.midi.on_count as i16,
            MidiNote => position(x(0), self.midi.on_count).map_or(0, |n| self.midi.on[n].1),
            MidiVelocity => position(x(0), self.midi.on_count).map_or(0, |n| self.midi.on[n].2),
            MidiNoteChannel => position(x(0), self.midi.on_count).map_or(0, |n| self.midi.on[n].0),
            MidiOffCount => self.midi.off_count as i16,
            MidiOff => position(x(0), self.midi.off_count).map_or(0, |n| self.midi.off[n].1),
            MidiOffChannel => position(x(0), self.midi.off_count).map_or(0, |n| self.midi.off[n].0),
            MidiCcCount => self.midi.cc_count as i16,
            MidiCcNumber => position(x(0), self.midi.cc_count).map_or(0, |n| self.midi.cc[n].1),
            MidiCcValue => position(x(0), self.midi.cc_count).map_or(0, |n| self.midi.cc[n].2),
            MidiCcChannel => position(x(0), self.midi.cc_count).map_or(0, |n| self.midi.cc[n].0),
            MidiClockDiv => self.midi.clock_div as i16,
            MidiClockReset => {
                self.midi.reset_clock();
                0
            }
            DeviceFlip => {
                self.flip = !self.flip;
                io.device_flip();
                0
            }
            _ => Operation::pure(op, a),
        }
    }

    /// Setter form; `a` holds the getter operands.
    pub(crate) fn set(&mut self, io: &mut dyn Io, ctx: &mut Context, op: Op, a: &[i16], value: i16) {
        let x = |n: usize| a.get(n).copied().unwrap_or(0);
        use Op::*;
        match op {
            Seed => {
                self.seed = value;
                self.rng = StdRng::seed_from_u64(value as u64);
            }
            Cv => {
                if let Some(ch) = channel(x(0), CV_COUNT) {
                    self.write_cv(io, ch, value, true);
                }
            }
            CvSlew => {
                if let Some(ch) = channel(x(0), CV_COUNT) {
                    let ms = value.max(1);
                    self.outputs.cv_slew[ch] = ms;
                    io.cv_slew(ch, ms);
                }
            }
            CvOff => {
                if let Some(ch) = channel(x(0), CV_COUNT) {
                    self.outputs.cv_off[ch] = value;
                    io.cv_off(ch, value);
                }
            }
            Tr => {
                if let Some(ch) = channel(x(0), TR_COUNT) {
                    self.outputs.tr[ch] = value != 0;
                    io.tr(ch, value != 0);
                }
            }
            TrPol => {
                if let Some(ch) = channel(x(0), TR_COUNT) {
                    self.outputs.tr_pol[ch] = value != 0;
                }
            }
            TrTime => {
                if let Some(ch) = channel(x(0), TR_COUNT) {
                    let ms = value.max(1);
                    self.outputs.tr_time[ch] = ms;
                    io.tr_pulse_time(ch, ms);
                }
            }
            Metro => {
                self.metro = value.max(METRO_MIN_MS);
                io.metro_updated(self.metro, self.metro_act);
            }
            MetroAct => {
                self.metro_act = value != 0;
                io.metro_updated(self.metro, self.metro_act);
            }
            Time => {
                self.time_base = io.ticks().wrapping_sub(value as i32 as u32);
                self.time_frozen = value;
            }
            TimeAct => {
                let now = self.time(io);
                self.time_act = value != 0;
                if self.time_act {
                    self.time_base = io.ticks().wrapping_sub(now as i32 as u32);
                } else {
                    self.time_frozen = now;
                }
            }
            Scene => {
                if self.initializing {
                    log::debug!("SCENE {} ignored during init", value);
                } else if let Some(slot) = position(value, SCENE_SLOTS) {
                    io.load_scene(slot);
                }
            }
            Script => {
                if let Some(s) = channel(value, SCRIPT_COUNT) {
                    self.run_at(io, s, ctx.depth + 1);
                }
            }
            ScriptPol => {
                if let Some(n) = channel(x(0), TRIGGER_COUNT) {
                    self.polarity[n] = value.clamp(0, 3) as u8;
                }
            }
            Mute => {
                if let Some(n) = channel(x(0), TRIGGER_COUNT) {
                    self.mutes[n] = value != 0;
                    io.mutes_updated();
                }
            }
            PatBank => self.bank = bank(value),
            P(p) => self.pattern_set(self.bank, p, a, value),
            PN(p) => self.pattern_set(bank(x(0)), p, a.get(1..).unwrap_or(&[]), value),
            Turtle => {
                let (tx, ty) = (self.turtle.x(), self.turtle.y());
                self.grid[ty][tx] = level(value);
                io.grid_updated();
            }
            TurtleX => self.turtle.set_x(value),
            TurtleY => self.turtle.set_y(value),
            TurtleDir => self.turtle.set_heading(value),
            GridLed => {
                if let (Some(gx), Some(gy)) = (position(x(0), GRID_SIZE), position(x(1), GRID_SIZE)) {
                    self.grid[gy][gx] = level(value);
                    io.grid_updated();
                }
            }
            MidiBind => {
                if let Some(k) = channel(x(0), MIDI_EVENT_KINDS) {
                    self.midi.bindings[k] = match channel(value, SCRIPT_COUNT) {
                        Some(s) => s as i8,
                        None => -1,
                    };
                }
            }
            MidiClockDiv => self.midi.set_clock_div(value),
            _ => {}
        }
    }

    fn time(&self, io: &dyn Io) -> i16 {
        if self.time_act {
            io.ticks().wrapping_sub(self.time_base) as i16
        } else {
            self.time_frozen
        }
    }

    fn write_cv(&mut self, io: &mut dyn Io, ch: usize, value: i16, slew: bool) {
        let value = value.clamp(0, CV_MAX);
        self.outputs.cv[ch] = value;
        let out = (value as i32 + self.outputs.cv_off[ch] as i32).clamp(0, CV_MAX as i32);
        io.cv(ch, out as i16, slew);
    }

    pub(crate) fn kill(&mut self, io: &mut dyn Io) {
        self.delays.cancel_all();
        self.stack.clear();
        for ch in 0..TR_COUNT {
            io.tr_pulse_clear(ch);
        }
        io.kill();
    }

    /// Captures the current raw reading as one calibration bound.
    fn calibrate(&mut self, io: &mut dyn Io, op: Op) -> i16 {
        let input = match op {
            Op::InCalMin | Op::InCalMax => Special::In,
            _ => Special::Param,
        };
        let raw = io.adc(input).min(CV_MAX as u16);
        let cal = &mut self.calibration;
        match op {
            Op::InCalMin => cal.in_min = raw,
            Op::InCalMax => cal.in_max = raw,
            Op::ParamCalMin => cal.param_min = raw,
            _ => cal.param_max = raw,
        }
        io.save_calibration(&self.calibration);
        raw as i16
    }

    fn pattern_get(&mut self, n: usize, op: PatOp, a: &[i16]) -> i16 {
        let x = |k: usize| a.get(k).copied().unwrap_or(0);
        let p = &mut self.patterns[n];
        use PatOp::*;
        match op {
            Value => p.get_at(x(0)),
            Len => p.len() as i16,
            Wrap => p.wrap() as i16,
            Start => p.start() as i16,
            End => p.end() as i16,
            Index => p.index() as i16,
            Here => p.get(),
            Next => p.step(1),
            Prev => p.step(-1),
            Step => p.step(x(0)),
            Ins => {
                p.insert(x(0), x(1));
                0
            }
            Rm => p.remove(x(0)),
            Push => {
                p.push(x(0));
                0
            }
            Pop => p.pop(),
            Min => p.min_index(),
            Max => p.max_index(),
            Rnd => p.random(&mut self.rng),
        }
    }

    fn pattern_set(&mut self, n: usize, op: PatOp, a: &[i16], value: i16) {
        let x = |k: usize| a.get(k).copied().unwrap_or(0);
        let p = &mut self.patterns[n];
        use PatOp::*;
        match op {
            Value => p.set_at(x(0), value),
            Len => p.set_len(value),
            Wrap => p.set_wrap(value != 0),
            Start => {
                if !p.set_start(value) {
                    log::debug!("pattern {} start {} rejected", n, value);
                }
            }
            End => {
                if !p.set_end(value) {
                    log::debug!("pattern {} end {} rejected", n, value);
                }
            }
            Index => p.set_index(value),
            Here => p.set(value),
            _ => {}
        }
    }
}
