/*!
## Machine Module

The scene aggregate and the executor that evaluates compiled lines
against it, together with the delay queue, command stack, patterns,
turtle and the hardware collaborator interface.

*/

/// Trigger scripts occupy indices `0..8`.
pub const TRIGGER_COUNT: usize = 8;
pub const METRO_SCRIPT: usize = 8;
pub const INIT_SCRIPT: usize = 9;
pub const SCRIPT_COUNT: usize = 10;
/// Script id used for lines entered outside any script.
pub const LIVE_SCRIPT: usize = 10;
pub const MAX_LINES: usize = 6;
pub const MAX_DEPTH: usize = 8;
pub const DELAY_SIZE: usize = 16;
pub const STACK_SIZE: usize = 16;
pub const WHILE_DEPTH: usize = 10000;
pub const PATTERN_COUNT: usize = 4;
pub const PATTERN_LENGTH: usize = 64;
pub const VAR_COUNT: usize = 26;
pub const CV_COUNT: usize = 4;
pub const TR_COUNT: usize = 4;
pub const GRID_SIZE: usize = 16;
pub const SCENE_SLOTS: usize = 32;
pub const DESCRIPTION_LINES: usize = 32;
pub const DESCRIPTION_LEN: usize = 32;
pub const METRO_MIN_MS: i16 = 25;
pub const METRO_DEFAULT_MS: i16 = 1000;
pub const TR_TIME_DEFAULT_MS: i16 = 100;
/// Full scale of CV outputs and analog inputs.
pub const CV_MAX: i16 = 16383;
/// Tick period of the real-time clock.
pub const RATE_CLOCK_MS: u32 = 10;

mod delay;
mod dispatch;
mod function;
mod io;
mod midi;
mod operation;
mod pattern;
mod runtime;
mod scene;
mod script;
mod stack;
mod turtle;

pub use delay::{DelayEntry, DelayQueue};
pub use dispatch::{channel, Input};
pub use io::{Event, Io, NullIo, Recorder};
pub use midi::{Midi, MidiEvent, MidiMessage, Receipt, MAX_MIDI_EVENTS};
pub use operation::Operation;
pub use pattern::Pattern;
pub use runtime::Outcome;
pub use scene::{Calibration, Scene, Stats};
pub use script::Script;
pub use stack::Stack;
pub use turtle::Turtle;
