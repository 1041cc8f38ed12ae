use super::script::Every;
use super::*;
use crate::error;
use crate::lang::{ast::Command, Error, Line, Special};
use rand::{rngs::StdRng, SeedableRng};
use std::rc::Rc;

type Result<T> = std::result::Result<T, Error>;

/// Input and knob calibration, as raw ADC readings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Calibration {
    pub in_min: u16,
    pub in_max: u16,
    pub param_min: u16,
    pub param_max: u16,
}

impl Default for Calibration {
    fn default() -> Calibration {
        Calibration {
            in_min: 0,
            in_max: CV_MAX as u16,
            param_min: 0,
            param_max: CV_MAX as u16,
        }
    }
}

impl Calibration {
    fn scale(raw: u16, min: u16, max: u16) -> i16 {
        if max <= min {
            return raw.min(CV_MAX as u16) as i16;
        }
        let raw = raw.clamp(min, max) as i32;
        ((raw - min as i32) * CV_MAX as i32 / (max as i32 - min as i32)) as i16
    }

    /// Maps a raw reading onto `0..=CV_MAX`.
    pub fn read(&self, input: Special, raw: u16) -> i16 {
        match input {
            Special::In => Calibration::scale(raw, self.in_min, self.in_max),
            Special::Param => Calibration::scale(raw, self.param_min, self.param_max),
        }
    }

    pub fn is_valid(&self) -> bool {
        [self.in_min, self.in_max, self.param_min, self.param_max]
            .iter()
            .all(|v| *v <= CV_MAX as u16)
    }
}

/// Bounded conditions that were absorbed instead of failing.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Stats {
    pub depth_aborts: u32,
    pub dropped_delays: u32,
    pub dropped_stack: u32,
}

/// Output channel state as last written by scripts.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct Outputs {
    pub cv: [i16; CV_COUNT],
    pub cv_off: [i16; CV_COUNT],
    pub cv_slew: [i16; CV_COUNT],
    pub tr: [bool; TR_COUNT],
    pub tr_pol: [bool; TR_COUNT],
    pub tr_time: [i16; TR_COUNT],
}

impl Default for Outputs {
    fn default() -> Outputs {
        Outputs {
            cv: [0; CV_COUNT],
            cv_off: [0; CV_COUNT],
            cv_slew: [1; CV_COUNT],
            tr: [false; TR_COUNT],
            tr_pol: [true; TR_COUNT],
            tr_time: [TR_TIME_DEFAULT_MS; TR_COUNT],
        }
    }
}

pub(crate) type StackEntry = (usize, i16, Rc<Command>);

/// Everything a running scene can see or change.
///
/// One value owns all script-visible state; entry points take it by
/// `&mut` together with the hardware collaborator. Commands are shared
/// with `Rc`, so a scene stays on the thread that built it.
#[derive(Debug)]
pub struct Scene {
    pub(crate) scripts: [Script; SCRIPT_COUNT],
    pub(crate) globals: [i16; VAR_COUNT],
    pub(crate) patterns: [Pattern; PATTERN_COUNT],
    pub(crate) bank: usize,
    pub(crate) calibration: Calibration,
    pub(crate) mutes: [bool; TRIGGER_COUNT],
    pub(crate) polarity: [u8; TRIGGER_COUNT],
    pub(crate) description: [String; DESCRIPTION_LINES],
    pub(crate) midi: Midi,
    pub(crate) turtle: Turtle,
    pub(crate) grid: [[u8; GRID_SIZE]; GRID_SIZE],
    pub(crate) keys: [[bool; GRID_SIZE]; GRID_SIZE],
    pub(crate) outputs: Outputs,
    pub(crate) metro: i16,
    pub(crate) metro_act: bool,
    pub(crate) time_base: u32,
    pub(crate) time_frozen: i16,
    pub(crate) time_act: bool,
    pub(crate) last_run: [u32; SCRIPT_COUNT],
    pub(crate) every: [[Every; MAX_LINES]; SCRIPT_COUNT],
    pub(crate) live_every: Every,
    pub(crate) delays: DelayQueue,
    pub(crate) stack: Stack<StackEntry>,
    pub(crate) rng: StdRng,
    pub(crate) seed: i16,
    pub(crate) stats: Stats,
    pub(crate) slot: usize,
    pub(crate) initializing: bool,
    pub(crate) flip: bool,
}

impl Default for Scene {
    fn default() -> Scene {
        Scene::with_rng(StdRng::from_entropy(), 0)
    }
}

/// Scenes compare by their persisted contents.
impl PartialEq for Scene {
    fn eq(&self, other: &Scene) -> bool {
        self.scripts == other.scripts
            && self.globals == other.globals
            && self.patterns == other.patterns
            && self.calibration == other.calibration
            && self.mutes == other.mutes
            && self.polarity == other.polarity
            && self.description == other.description
            && self.midi.bindings == other.midi.bindings
            && self.midi.clock_div == other.midi.clock_div
    }
}

impl Scene {
    /// A scene whose random operators repeat for a given seed.
    pub fn with_seed(seed: u64) -> Scene {
        Scene::with_rng(StdRng::seed_from_u64(seed), seed as i16)
    }

    /// Restarts the random operators from `seed`, as `SEED` does.
    pub fn reseed(&mut self, seed: u64) {
        self.rng = StdRng::seed_from_u64(seed);
        self.seed = seed as i16;
    }

    fn with_rng(rng: StdRng, seed: i16) -> Scene {
        Scene {
            scripts: Default::default(),
            globals: [0; VAR_COUNT],
            patterns: Default::default(),
            bank: 0,
            calibration: Calibration::default(),
            mutes: [false; TRIGGER_COUNT],
            polarity: [1; TRIGGER_COUNT],
            description: Default::default(),
            midi: Midi::default(),
            turtle: Turtle::default(),
            grid: [[0; GRID_SIZE]; GRID_SIZE],
            keys: [[false; GRID_SIZE]; GRID_SIZE],
            outputs: Outputs::default(),
            metro: METRO_DEFAULT_MS,
            metro_act: true,
            time_base: 0,
            time_frozen: 0,
            time_act: true,
            last_run: [0; SCRIPT_COUNT],
            every: [[Every::default(); MAX_LINES]; SCRIPT_COUNT],
            live_every: Every::default(),
            delays: DelayQueue::new(),
            stack: Stack::new(STACK_SIZE, "COMMAND STACK"),
            rng,
            seed,
            stats: Stats::default(),
            slot: 0,
            initializing: false,
            flip: false,
        }
    }

    pub fn var(&self, n: usize) -> i16 {
        self.globals.get(n).copied().unwrap_or(0)
    }

    pub fn set_var(&mut self, n: usize, value: i16) {
        if let Some(v) = self.globals.get_mut(n) {
            *v = value;
        }
    }

    pub fn script(&self, n: usize) -> Option<&Script> {
        self.scripts.get(n)
    }

    pub fn pattern(&self, n: usize) -> &Pattern {
        &self.patterns[n.min(PATTERN_COUNT - 1)]
    }

    pub fn pattern_mut(&mut self, n: usize) -> &mut Pattern {
        &mut self.patterns[n.min(PATTERN_COUNT - 1)]
    }

    pub fn cv(&self, channel: usize) -> i16 {
        self.outputs.cv.get(channel).copied().unwrap_or(0)
    }

    pub fn tr(&self, channel: usize) -> bool {
        self.outputs.tr.get(channel).copied().unwrap_or(false)
    }

    pub fn turtle(&self) -> &Turtle {
        &self.turtle
    }

    pub fn grid_led(&self, x: usize, y: usize) -> u8 {
        self.grid
            .get(y)
            .and_then(|row| row.get(x))
            .copied()
            .unwrap_or(0)
    }

    pub fn mute(&self, input: usize) -> bool {
        self.mutes.get(input).copied().unwrap_or(false)
    }

    pub fn set_mute(&mut self, input: usize, muted: bool) {
        if let Some(m) = self.mutes.get_mut(input) {
            *m = muted;
        }
    }

    /// Bit 1 runs on rising edges, bit 2 on falling edges.
    pub fn polarity(&self, input: usize) -> u8 {
        self.polarity.get(input).copied().unwrap_or(0)
    }

    pub fn set_polarity(&mut self, input: usize, polarity: u8) {
        if let Some(p) = self.polarity.get_mut(input) {
            *p = polarity & 3;
        }
    }

    pub fn calibration(&self) -> &Calibration {
        &self.calibration
    }

    pub fn set_calibration(&mut self, calibration: Calibration) {
        self.calibration = calibration;
    }

    pub fn midi_state(&self) -> &Midi {
        &self.midi
    }

    pub fn midi_state_mut(&mut self) -> &mut Midi {
        &mut self.midi
    }

    pub fn description(&self) -> &[String] {
        &self.description
    }

    pub fn set_description_line(&mut self, n: usize, text: &str) -> Result<()> {
        let line = self.description.get_mut(n).ok_or_else(|| error!(NoSuchLine))?;
        if let Some(pos) = text.chars().position(|c| !(' '..='~').contains(&c)) {
            return Err(error!(InvalidCharacter, ..&(pos..pos + 1)));
        }
        if text.len() > DESCRIPTION_LEN {
            return Err(error!(LineTooLong, ..&(DESCRIPTION_LEN..text.len())));
        }
        *line = text.to_string();
        Ok(())
    }

    pub fn stats(&self) -> Stats {
        self.stats
    }

    pub fn delays(&self) -> &DelayQueue {
        &self.delays
    }

    pub fn stack_len(&self) -> usize {
        self.stack.len()
    }

    pub fn metro_ms(&self) -> i16 {
        self.metro
    }

    pub fn metro_active(&self) -> bool {
        self.metro_act
    }

    /// Storage slot this scene was loaded from or saved to.
    pub fn slot(&self) -> usize {
        self.slot
    }

    pub fn set_slot(&mut self, slot: usize) {
        self.slot = slot;
    }

    /// Panel orientation; when set, trigger inputs are numbered in reverse.
    pub fn flip(&self) -> bool {
        self.flip
    }

    pub fn set_flip(&mut self, flip: bool) {
        self.flip = flip;
    }

    /// Replaces line `n` of a script, or appends at one past the end.
    ///
    /// A line that does not compile is stored as a no-op and its error
    /// returned. Lines that could not be saved are refused outright.
    /// Pending delays owned by the script are cancelled.
    pub fn edit_line(&mut self, script: usize, n: usize, text: &str) -> Result<()> {
        self.place_line(script, n, text, false)
    }

    pub fn insert_line(&mut self, script: usize, n: usize, text: &str) -> Result<()> {
        self.place_line(script, n, text, true)
    }

    fn place_line(&mut self, script: usize, n: usize, text: &str, insert: bool) -> Result<()> {
        let target = self
            .scripts
            .get_mut(script)
            .ok_or_else(|| error!(NoSuchScript))?;
        let line = Line::from_str(text);
        let error = line.error().cloned();
        if !line.is_storable() {
            return Err(error.unwrap_or_else(|| error!(InvalidCharacter)));
        }
        if insert {
            target.insert_line(n, line)?;
        } else {
            target.set_line(n, line)?;
        }
        self.script_changed(script);
        match error {
            Some(e) => Err(e),
            None => Ok(()),
        }
    }

    pub fn delete_line(&mut self, script: usize, n: usize) -> Result<()> {
        let target = self
            .scripts
            .get_mut(script)
            .ok_or_else(|| error!(NoSuchScript))?;
        target.delete_line(n)?;
        self.script_changed(script);
        Ok(())
    }

    pub fn clear_script(&mut self, script: usize) -> Result<()> {
        let target = self
            .scripts
            .get_mut(script)
            .ok_or_else(|| error!(NoSuchScript))?;
        target.clear();
        self.script_changed(script);
        Ok(())
    }

    fn script_changed(&mut self, script: usize) {
        self.delays.cancel_script(script);
        self.every[script] = [Every::default(); MAX_LINES];
    }

    /// Drops pending delays and stacked commands and puts patterns,
    /// turtle and counters back at their starting positions. Persisted
    /// contents are untouched.
    pub fn reset_transient_state(&mut self) {
        self.delays.cancel_all();
        self.stack.clear();
        self.turtle.home();
        for counters in self.every.iter_mut() {
            counters.iter_mut().for_each(Every::reset);
        }
        self.live_every.reset();
        self.patterns.iter_mut().for_each(Pattern::rewind);
        self.midi.end_batch();
    }

    /// Runs INIT. `SCENE` requests are ignored while it runs.
    pub fn init(&mut self, io: &mut dyn Io) -> Outcome {
        self.initializing = true;
        let outcome = self.run(io, INIT_SCRIPT);
        self.initializing = false;
        outcome
    }

    /// An edge on a trigger input. Runs the input's script unless it is
    /// muted or its polarity ignores this edge.
    pub fn trigger(&mut self, io: &mut dyn Io, input: usize, rising: bool) -> Option<Outcome> {
        if input >= TRIGGER_COUNT {
            return None;
        }
        let input = if self.flip {
            TRIGGER_COUNT - 1 - input
        } else {
            input
        };
        if self.mutes[input] {
            return None;
        }
        let mask = if rising { 1 } else { 2 };
        if self.polarity[input] & mask == 0 {
            return None;
        }
        Some(self.run(io, input))
    }

    /// A metronome tick. Nothing runs while METRO is empty.
    pub fn metro(&mut self, io: &mut dyn Io) -> Option<Outcome> {
        if self.scripts[METRO_SCRIPT].is_empty() {
            return None;
        }
        Some(self.run(io, METRO_SCRIPT))
    }

    /// The pulse started by `TR.PULSE` on `channel` has elapsed.
    pub fn tr_pulse_end(&mut self, io: &mut dyn Io, channel: usize) {
        if channel < TR_COUNT {
            let level = !self.outputs.tr_pol[channel];
            self.outputs.tr[channel] = level;
            io.tr(channel, level);
        }
    }

    pub fn grid_key(&mut self, io: &mut dyn Io, x: usize, y: usize, pressed: bool) {
        if x < GRID_SIZE && y < GRID_SIZE {
            self.keys[y][x] = pressed;
            io.grid_updated();
        }
    }
}
