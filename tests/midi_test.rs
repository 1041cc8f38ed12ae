mod common;
use common::*;
use teletype::mach::{MidiMessage, Recorder};

fn note_on(note: u8, velocity: u8) -> MidiMessage {
    MidiMessage::NoteOn {
        channel: 1,
        note,
        velocity,
    }
}

#[test]
fn test_bind() {
    let (mut s, mut io) = (scene(), Recorder::new());
    assert_eq!(exec(&mut s, &mut io, "MI.$ 1"), Some(0));
    exec(&mut s, &mut io, "MI.$ 1 3");
    assert_eq!(exec(&mut s, &mut io, "MI.$ 1"), Some(3));
    assert_eq!(s.midi_state().bindings()[0], 2);
    exec(&mut s, &mut io, "MI.$ 1 0");
    assert_eq!(s.midi_state().bindings()[0], -1);
}

#[test]
fn test_note_batch() {
    let (mut s, mut io) = (scene(), Recorder::new());
    script(&mut s, 0, &["A MI.LN; B MI.NL", "C MI.N 1; D MI.V 0"]);
    exec(&mut s, &mut io, "MI.$ 1 1");
    s.midi(&mut io, note_on(60, 100));
    s.midi(&mut io, note_on(64, 90));
    assert_eq!(s.midi_flush(&mut io), 1);
    assert_eq!((s.var(0), s.var(1), s.var(2), s.var(3)), (64, 2, 64, 100));
    assert_eq!(exec(&mut s, &mut io, "MI.NL"), Some(0));
    assert_eq!(exec(&mut s, &mut io, "MI.LE"), Some(1));
    assert_eq!(s.midi_flush(&mut io), 0);
}

#[test]
fn test_zero_velocity_counts_as_off() {
    let (mut s, mut io) = (scene(), Recorder::new());
    script(&mut s, 1, &["A MI.OL; B MI.OFF 0"]);
    exec(&mut s, &mut io, "MI.$ 2 2");
    s.midi(&mut io, note_on(48, 0));
    assert_eq!(s.midi_flush(&mut io), 1);
    assert_eq!((s.var(0), s.var(1)), (1, 48));
}

fn cc(channel: u8, controller: u8, value: u8) -> MidiMessage {
    MidiMessage::ControlChange {
        channel,
        controller,
        value,
    }
}

#[test]
fn test_clock_divider() {
    let (mut s, mut io) = (scene(), Recorder::new());
    script(&mut s, 1, &["B + B 1"]);
    exec(&mut s, &mut io, "MI.$ 4 2; MI.CLKD 2");
    let mut seen = vec![];
    for _ in 0..4 {
        s.midi(&mut io, MidiMessage::Clock);
        seen.push(s.var(1));
    }
    assert_eq!(seen, vec![0, 1, 1, 2]);
    assert_eq!(s.midi_flush(&mut io), 0);
}

#[test]
fn test_clock_runs_every_tick() {
    let (mut s, mut io) = (scene(), Recorder::new());
    script(&mut s, 1, &["B + B 1"]);
    exec(&mut s, &mut io, "MI.$ 4 2; MI.CLKD 1");
    for _ in 0..3 {
        s.midi(&mut io, MidiMessage::Clock);
    }
    assert_eq!(s.var(1), 3);
    assert_eq!(s.midi_flush(&mut io), 0);
    assert_eq!(s.var(1), 3);
}

#[test]
fn test_transport_runs_immediately() {
    let (mut s, mut io) = (scene(), Recorder::new());
    script(&mut s, 3, &["D + D 1; C MI.LE"]);
    exec(&mut s, &mut io, "MI.$ 5 4; MI.$ 6 4; MI.$ 7 4");
    s.midi(&mut io, MidiMessage::Start);
    assert_eq!((s.var(3), s.var(2)), (1, 5));
    s.midi(&mut io, MidiMessage::Stop);
    s.midi(&mut io, MidiMessage::Continue);
    assert_eq!((s.var(3), s.var(2)), (3, 7));
}

#[test]
fn test_script_runs_once_per_flush() {
    let (mut s, mut io) = (scene(), Recorder::new());
    script(&mut s, 3, &["D + D 1"]);
    exec(&mut s, &mut io, "MI.$ 1 4; MI.$ 2 4; MI.$ 3 4");
    s.midi(&mut io, note_on(60, 100));
    s.midi(&mut io, note_on(60, 0));
    s.midi(&mut io, cc(1, 1, 64));
    assert_eq!(s.midi_flush(&mut io), 1);
    assert_eq!(s.var(3), 1);
}

#[test]
fn test_cc_keeps_latest_value() {
    let (mut s, mut io) = (scene(), Recorder::new());
    script(&mut s, 0, &["A MI.CCL; B MI.CC 0; C MI.CN 0"]);
    exec(&mut s, &mut io, "MI.$ 3 1");
    for value in 0..25 {
        s.midi(&mut io, cc(1, 7, value));
    }
    assert_eq!(s.midi_flush(&mut io), 1);
    assert_eq!((s.var(0), s.var(1), s.var(2)), (1, 24, 7));
}

#[test]
fn test_event_channels() {
    let (mut s, mut io) = (scene(), Recorder::new());
    script(&mut s, 0, &["A MI.NCH 0; B MI.NCH 1", "C MI.OCH 0; D MI.CCH 1"]);
    exec(&mut s, &mut io, "MI.$ 1 1; MI.$ 2 1; MI.$ 3 1");
    s.midi(
        &mut io,
        MidiMessage::NoteOn {
            channel: 3,
            note: 60,
            velocity: 10,
        },
    );
    s.midi(
        &mut io,
        MidiMessage::NoteOn {
            channel: 9,
            note: 61,
            velocity: 10,
        },
    );
    s.midi(&mut io, MidiMessage::NoteOff { channel: 5, note: 60 });
    s.midi(&mut io, cc(2, 7, 1));
    s.midi(&mut io, cc(11, 7, 1));
    assert_eq!(s.midi_flush(&mut io), 1);
    assert_eq!((s.var(0), s.var(1), s.var(2), s.var(3)), (3, 9, 5, 11));
}

#[test]
fn test_last_event_when_batch_full() {
    let (mut s, mut io) = (scene(), Recorder::new());
    exec(&mut s, &mut io, "MI.$ 1 1");
    for note in 0..20 {
        s.midi(&mut io, note_on(note, 100));
    }
    s.midi(&mut io, cc(4, 1, 2));
    s.midi(&mut io, note_on(99, 50));
    assert_eq!(exec(&mut s, &mut io, "MI.NL"), Some(20));
    assert_eq!(exec(&mut s, &mut io, "MI.LE"), Some(1));
    assert_eq!(exec(&mut s, &mut io, "MI.LN"), Some(99));
    assert_eq!(exec(&mut s, &mut io, "MI.LV"), Some(50));
}

#[test]
fn test_unbound_events_not_buffered() {
    let (mut s, mut io) = (scene(), Recorder::new());
    s.midi(&mut io, note_on(60, 100));
    s.midi(&mut io, cc(1, 7, 3));
    assert_eq!(exec(&mut s, &mut io, "MI.NL"), Some(0));
    assert_eq!(exec(&mut s, &mut io, "MI.CCL"), Some(0));
    assert_eq!(exec(&mut s, &mut io, "MI.LE"), Some(3));
    assert_eq!(exec(&mut s, &mut io, "MI.LN"), Some(60));
    s.midi(&mut io, MidiMessage::Clock);
    assert_eq!(exec(&mut s, &mut io, "MI.LE"), Some(4));
}
