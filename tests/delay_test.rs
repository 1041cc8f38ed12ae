mod common;
use common::*;
use teletype::mach::{Event, Recorder, DELAY_SIZE};

#[test]
fn test_same_tick_keeps_schedule_order() {
    let (mut s, mut io) = (scene(), Recorder::new());
    s.set_var(0, 1);
    exec(&mut s, &mut io, "DEL 10: A * A 10");
    exec(&mut s, &mut io, "DEL 10: A + A 1");
    assert_eq!(s.advance_delay_queue(&mut io, 10), 2);
    assert_eq!(s.var(0), 11);
}

#[test]
fn test_rescheduling_waits_for_next_advance() {
    let (mut s, mut io) = (scene(), Recorder::new());
    script(&mut s, 0, &["DEL 1: SCRIPT 1"]);
    s.run(&mut io, 0);
    assert_eq!(s.advance_delay_queue(&mut io, 100), 1);
    assert_eq!(s.delays().len(), 1);
}

#[test]
fn test_queue_full_drops() {
    let (mut s, mut io) = (scene(), Recorder::new());
    for _ in 0..=DELAY_SIZE {
        exec(&mut s, &mut io, "DEL 50: A + A 1");
    }
    assert_eq!(s.delays().len(), DELAY_SIZE);
    assert_eq!(s.stats().dropped_delays, 1);
    s.advance_delay_queue(&mut io, 50);
    assert_eq!(s.var(0), DELAY_SIZE as i16);
}

#[test]
fn test_del_clr() {
    let (mut s, mut io) = (scene(), Recorder::new());
    exec(&mut s, &mut io, "DEL 10: A 1");
    exec(&mut s, &mut io, "DEL 20: B 1");
    assert_eq!(s.delays().len(), 2);
    exec(&mut s, &mut io, "DEL.CLR");
    assert!(s.delays().is_empty());
    s.advance_delay_queue(&mut io, 100);
    assert_eq!((s.var(0), s.var(1)), (0, 0));
}

#[test]
fn test_edit_cancels_script_delays() {
    let (mut s, mut io) = (scene(), Recorder::new());
    script(&mut s, 0, &["DEL 10: A 1"]);
    script(&mut s, 1, &["DEL 10: B 1"]);
    s.run(&mut io, 0);
    s.run(&mut io, 1);
    assert_eq!(s.delays().len(), 2);
    s.edit_line(0, 0, "A 2").unwrap();
    assert_eq!(s.delays().len(), 1);
    assert_eq!(s.delays().iter().next().map(|e| e.script), Some(1));
    s.advance_delay_queue(&mut io, 10);
    assert_eq!((s.var(0), s.var(1)), (0, 1));
}

#[test]
fn test_kill() {
    let (mut s, mut io) = (scene(), Recorder::new());
    exec(&mut s, &mut io, "DEL 10: A 1");
    exec(&mut s, &mut io, "S: B 1");
    io.take();
    exec(&mut s, &mut io, "KILL");
    assert!(s.delays().is_empty());
    assert_eq!(s.stack_len(), 0);
    let events = io.take();
    assert!(events.contains(&Event::TrPulseClear(0)));
    assert_eq!(events.last(), Some(&Event::Kill));
}

#[test]
fn test_delay_runs_as_owner() {
    let (mut s, mut io) = (scene(), Recorder::new());
    script(&mut s, 2, &["DEL 5: TR.P 1"]);
    s.run(&mut io, 2);
    let entry = s.delays().iter().next().cloned();
    assert_eq!(entry.map(|e| (e.script, e.fire_tick())), Some((2, 5)));
    io.take();
    s.advance_delay_queue(&mut io, 5);
    assert_eq!(io.take(), vec![Event::Tr(0, true), Event::TrPulse(0, 100)]);
}
