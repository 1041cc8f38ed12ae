use super::{MidiMessage, Scene, Io};
use std::sync::mpsc::{self, Receiver, Sender};

/// Something that happened outside the scene and needs a response.
///
/// Producers (timer, input pins, the MIDI port) send these over a
/// channel; the owner of the scene drains it between other work, so
/// scripts never run concurrently.
#[derive(Debug, Clone, PartialEq)]
pub enum Input {
    Trigger { input: usize, rising: bool },
    /// The millisecond clock reached this tick.
    Tick(u32),
    Metro,
    TrPulseEnd(usize),
    GridKey { x: usize, y: usize, pressed: bool },
    Midi(MidiMessage),
    MidiFlush,
}

pub fn channel() -> (Sender<Input>, Receiver<Input>) {
    mpsc::channel()
}

impl Scene {
    pub fn dispatch(&mut self, io: &mut dyn Io, input: Input) {
        log::trace!("dispatch {:?}", input);
        match input {
            Input::Trigger { input, rising } => {
                self.trigger(io, input, rising);
            }
            Input::Tick(now) => {
                self.advance_delay_queue(io, now);
            }
            Input::Metro => {
                self.metro(io);
            }
            Input::TrPulseEnd(ch) => self.tr_pulse_end(io, ch),
            Input::GridKey { x, y, pressed } => self.grid_key(io, x, y, pressed),
            Input::Midi(message) => self.midi(io, message),
            Input::MidiFlush => {
                self.midi_flush(io);
            }
        }
    }

    /// Handles every input already queued. Returns how many there were.
    pub fn drain(&mut self, io: &mut dyn Io, inputs: &Receiver<Input>) -> usize {
        let mut n = 0;
        for input in inputs.try_iter() {
            self.dispatch(io, input);
            n += 1;
        }
        n
    }
}
