use super::{Scene, SCRIPT_COUNT};
use crate::mach::Io;

/// Events buffered between two flushes.
pub const MAX_MIDI_EVENTS: usize = 20;
pub const MIDI_EVENT_KINDS: usize = 7;

/// Event kinds as reported by `MI.LE` and bound with `MI.$`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MidiEvent {
    NoteOn = 1,
    NoteOff = 2,
    ControlChange = 3,
    Clock = 4,
    Start = 5,
    Stop = 6,
    Continue = 7,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MidiMessage {
    NoteOn { channel: u8, note: u8, velocity: u8 },
    NoteOff { channel: u8, note: u8 },
    ControlChange { channel: u8, controller: u8, value: u8 },
    Clock,
    Start,
    Stop,
    Continue,
}

/// What became of one received message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Receipt {
    /// Buffered for the next flush, or nothing to do.
    Kept,
    /// The batch for its kind was full.
    Dropped,
    /// Clock or transport bound to this script, which runs right away.
    Run(usize),
}

/// MIDI bindings, the clock divider and the current batch of received
/// events. Only the bindings and the divider are persisted.
#[derive(Debug, Clone, PartialEq)]
pub struct Midi {
    /// Script index per event kind, or -1.
    pub(crate) bindings: [i8; MIDI_EVENT_KINDS],
    pub(crate) clock_div: u8,
    clock_count: u8,
    pub(crate) last_event: i16,
    pub(crate) last_channel: i16,
    pub(crate) last_note: i16,
    pub(crate) last_velocity: i16,
    pub(crate) last_controller: i16,
    pub(crate) last_cc: i16,
    /// Channel, note, velocity.
    pub(crate) on: [(i16, i16, i16); MAX_MIDI_EVENTS],
    pub(crate) on_count: usize,
    /// Channel, note.
    pub(crate) off: [(i16, i16); MAX_MIDI_EVENTS],
    pub(crate) off_count: usize,
    /// Channel, controller, value. One entry per controller and channel.
    pub(crate) cc: [(i16, i16, i16); MAX_MIDI_EVENTS],
    pub(crate) cc_count: usize,
}

impl Default for Midi {
    fn default() -> Midi {
        Midi {
            bindings: [-1; MIDI_EVENT_KINDS],
            clock_div: 1,
            clock_count: 0,
            last_event: 0,
            last_channel: 0,
            last_note: 0,
            last_velocity: 0,
            last_controller: 0,
            last_cc: 0,
            on: [(0, 0, 0); MAX_MIDI_EVENTS],
            on_count: 0,
            off: [(0, 0); MAX_MIDI_EVENTS],
            off_count: 0,
            cc: [(0, 0, 0); MAX_MIDI_EVENTS],
            cc_count: 0,
        }
    }
}

impl Midi {
    pub const CLOCK_DIV_MAX: u8 = 24;

    pub fn bindings(&self) -> &[i8; MIDI_EVENT_KINDS] {
        &self.bindings
    }

    pub fn clock_div(&self) -> u8 {
        self.clock_div
    }

    /// Binds an event kind to a script index, or unbinds it with `None`.
    pub fn bind(&mut self, event: MidiEvent, script: Option<usize>) {
        self.bindings[event as usize - 1] = match script {
            Some(s) if s < SCRIPT_COUNT => s as i8,
            _ => -1,
        };
    }

    pub fn set_clock_div(&mut self, div: i16) {
        self.clock_div = div.clamp(1, Midi::CLOCK_DIV_MAX as i16) as u8;
    }

    pub fn reset_clock(&mut self) {
        self.clock_count = 0;
    }

    fn binding(&self, event: MidiEvent) -> Option<usize> {
        let b = self.bindings[event as usize - 1];
        (b >= 0).then_some(b as usize)
    }

    fn run_now(&self, event: MidiEvent) -> Receipt {
        self.binding(event).map_or(Receipt::Kept, Receipt::Run)
    }

    /// Records one message. The last-event values always follow the
    /// newest message; note and CC values are only buffered while a
    /// script is bound to take them.
    pub fn receive(&mut self, message: MidiMessage) -> Receipt {
        match message {
            MidiMessage::NoteOn { channel, note: n, velocity: 0 } => {
                self.receive(MidiMessage::NoteOff { channel, note: n })
            }
            MidiMessage::NoteOn {
                channel,
                note,
                velocity,
            } => {
                let (channel, note, velocity) = (channel as i16, note as i16, velocity as i16);
                self.last_event = MidiEvent::NoteOn as i16;
                self.last_channel = channel;
                self.last_note = note;
                self.last_velocity = velocity;
                if self.binding(MidiEvent::NoteOn).is_none() {
                    return Receipt::Kept;
                }
                if self.on_count >= MAX_MIDI_EVENTS {
                    return Receipt::Dropped;
                }
                self.on[self.on_count] = (channel, note, velocity);
                self.on_count += 1;
                Receipt::Kept
            }
            MidiMessage::NoteOff { channel, note } => {
                let (channel, note) = (channel as i16, note as i16);
                self.last_event = MidiEvent::NoteOff as i16;
                self.last_channel = channel;
                self.last_note = note;
                self.last_velocity = 0;
                if self.binding(MidiEvent::NoteOff).is_none() {
                    return Receipt::Kept;
                }
                if self.off_count >= MAX_MIDI_EVENTS {
                    return Receipt::Dropped;
                }
                self.off[self.off_count] = (channel, note);
                self.off_count += 1;
                Receipt::Kept
            }
            MidiMessage::ControlChange {
                channel,
                controller,
                value,
            } => {
                let (channel, controller, value) =
                    (channel as i16, controller as i16, value as i16);
                self.last_event = MidiEvent::ControlChange as i16;
                self.last_channel = channel;
                self.last_controller = controller;
                self.last_cc = value;
                if self.binding(MidiEvent::ControlChange).is_none() {
                    return Receipt::Kept;
                }
                let batch = &mut self.cc[..self.cc_count];
                if let Some(entry) = batch
                    .iter_mut()
                    .find(|(ch, num, _)| *ch == channel && *num == controller)
                {
                    entry.2 = value;
                    return Receipt::Kept;
                }
                if self.cc_count >= MAX_MIDI_EVENTS {
                    return Receipt::Dropped;
                }
                self.cc[self.cc_count] = (channel, controller, value);
                self.cc_count += 1;
                Receipt::Kept
            }
            MidiMessage::Clock => {
                self.clock_count += 1;
                if self.clock_count < self.clock_div {
                    return Receipt::Kept;
                }
                self.clock_count = 0;
                self.last_event = MidiEvent::Clock as i16;
                self.run_now(MidiEvent::Clock)
            }
            MidiMessage::Start => {
                self.last_event = MidiEvent::Start as i16;
                self.run_now(MidiEvent::Start)
            }
            MidiMessage::Stop => {
                self.last_event = MidiEvent::Stop as i16;
                self.run_now(MidiEvent::Stop)
            }
            MidiMessage::Continue => {
                self.last_event = MidiEvent::Continue as i16;
                self.run_now(MidiEvent::Continue)
            }
        }
    }

    /// Scripts bound to the note and CC kinds with something buffered,
    /// each listed once.
    fn due_scripts(&self) -> Vec<usize> {
        let batches = [
            (MidiEvent::NoteOn, self.on_count),
            (MidiEvent::NoteOff, self.off_count),
            (MidiEvent::ControlChange, self.cc_count),
        ];
        let mut due = Vec::with_capacity(batches.len());
        for (event, count) in batches {
            match self.binding(event) {
                Some(s) if count > 0 && !due.contains(&s) => due.push(s),
                _ => {}
            }
        }
        due
    }

    pub(crate) fn end_batch(&mut self) {
        self.on_count = 0;
        self.off_count = 0;
        self.cc_count = 0;
    }
}

impl Scene {
    /// Takes one incoming message. Clock and transport scripts run here;
    /// note and CC scripts wait for `midi_flush`.
    pub fn midi(&mut self, io: &mut dyn Io, message: MidiMessage) {
        match self.midi.receive(message) {
            Receipt::Kept => {}
            Receipt::Dropped => log::debug!("midi batch full, dropped {:?}", message),
            Receipt::Run(script) => {
                self.run(io, script);
            }
        }
    }

    /// Runs every script bound to a note or CC kind received since the
    /// last flush, at most once each, then starts a new batch. Scripts
    /// see the whole batch through the `MI.*` operators.
    pub fn midi_flush(&mut self, io: &mut dyn Io) -> usize {
        let due = self.midi.due_scripts();
        for script in due.iter() {
            self.run(io, *script);
        }
        self.midi.end_batch();
        due.len()
    }
}
