mod common;
use common::*;
use teletype::mach::Recorder;

#[test]
fn test_if_elif_else() {
    let (mut s, mut io) = (scene(), Recorder::new());
    script(&mut s, 0, &["IF 0: A 1", "ELIF 1: A 2", "ELSE: A 3"]);
    s.run(&mut io, 0);
    assert_eq!(s.var(0), 2);
    script(&mut s, 1, &["IF 1: B 1", "ELSE: B 2"]);
    s.run(&mut io, 1);
    assert_eq!(s.var(1), 1);
    script(&mut s, 2, &["IF 0: C 1", "ELIF 0: C 2", "ELSE: C 3"]);
    s.run(&mut io, 2);
    assert_eq!(s.var(2), 3);
}

#[test]
fn test_else_without_if() {
    let (mut s, mut io) = (scene(), Recorder::new());
    exec(&mut s, &mut io, "ELSE: A 5");
    assert_eq!(s.var(0), 0);
}

#[test]
fn test_loop_both_directions() {
    let (mut s, mut io) = (scene(), Recorder::new());
    exec(&mut s, &mut io, "L 1 4: A + A I");
    assert_eq!(s.var(0), 10);
    exec(&mut s, &mut io, "L 3 1: B + B I");
    assert_eq!(s.var(1), 6);
    exec(&mut s, &mut io, "L 2 2: C + C 1");
    assert_eq!(s.var(2), 1);
}

#[test]
fn test_while_is_bounded() {
    let (mut s, mut io) = (scene(), Recorder::new());
    exec(&mut s, &mut io, "W LT A 5: A + A 1");
    assert_eq!(s.var(0), 5);
    exec(&mut s, &mut io, "W 1: B + B 1");
    assert_eq!(s.var(1), 10000);
}

#[test]
fn test_every_skip_other() {
    let (mut s, mut io) = (scene(), Recorder::new());
    script(&mut s, 0, &["EVERY 3: A + A 1"]);
    script(&mut s, 1, &["SKIP 2: B + B 1", "OTHER: C + C 1"]);
    for _ in 0..6 {
        s.run(&mut io, 0);
    }
    for _ in 0..4 {
        s.run(&mut io, 1);
    }
    assert_eq!(s.var(0), 2);
    assert_eq!((s.var(1), s.var(2)), (2, 2));
}

#[test]
fn test_edit_resets_every() {
    let (mut s, mut io) = (scene(), Recorder::new());
    script(&mut s, 0, &["EVERY 2: A + A 1"]);
    s.run(&mut io, 0);
    script(&mut s, 0, &["EVERY 2: A + A 1"]);
    s.run(&mut io, 0);
    assert_eq!(s.var(0), 0);
    s.run(&mut io, 0);
    assert_eq!(s.var(0), 1);
}

#[test]
fn test_prob_extremes() {
    let (mut s, mut io) = (scene(), Recorder::new());
    for _ in 0..50 {
        exec(&mut s, &mut io, "PROB 0: A + A 1");
        exec(&mut s, &mut io, "PROB 100: B + B 1");
    }
    assert_eq!((s.var(0), s.var(1)), (0, 50));
}

#[test]
fn test_del() {
    let (mut s, mut io) = (scene(), Recorder::new());
    io.now = 1000;
    exec(&mut s, &mut io, "DEL 100: A 1");
    assert_eq!(s.delays().len(), 1);
    assert_eq!(s.advance_delay_queue(&mut io, 1099), 0);
    assert_eq!(s.advance_delay_queue(&mut io, 1100), 1);
    assert_eq!(s.var(0), 1);
    assert!(s.delays().is_empty());
}

#[test]
fn test_del_zero_waits_one_tick() {
    let (mut s, mut io) = (scene(), Recorder::new());
    exec(&mut s, &mut io, "DEL 0: A 1");
    assert_eq!(s.advance_delay_queue(&mut io, 0), 0);
    assert_eq!(s.advance_delay_queue(&mut io, 1), 1);
    assert_eq!(s.var(0), 1);
}

#[test]
fn test_del_keeps_loop_index() {
    let (mut s, mut io) = (scene(), Recorder::new());
    script(&mut s, 0, &["I 4", "DEL 10: B + B I", "I 7", "DEL 10: B + B I"]);
    s.run(&mut io, 0);
    assert_eq!(s.delays().len(), 2);
    s.advance_delay_queue(&mut io, 10);
    assert_eq!(s.var(1), 11);
}

#[test]
fn test_del_x_and_del_r() {
    let (mut s, mut io) = (scene(), Recorder::new());
    exec(&mut s, &mut io, "DEL.X 3 10: A + A 1");
    assert_eq!(s.var(0), 0);
    assert_eq!(s.advance_delay_queue(&mut io, 25), 2);
    assert_eq!(s.advance_delay_queue(&mut io, 30), 1);
    assert_eq!(s.var(0), 3);

    exec(&mut s, &mut io, "DEL.R 3 10: B + B 1");
    assert_eq!(s.var(1), 1);
    assert_eq!(s.delays().len(), 2);
    s.advance_delay_queue(&mut io, 20);
    assert_eq!(s.var(1), 3);
}

#[test]
fn test_stack() {
    let (mut s, mut io) = (scene(), Recorder::new());
    for _ in 0..3 {
        exec(&mut s, &mut io, "S: A + A 1");
    }
    assert_eq!(exec(&mut s, &mut io, "S.L"), Some(3));
    assert_eq!(s.var(0), 0);
    exec(&mut s, &mut io, "S.POP");
    assert_eq!(s.var(0), 1);
    exec(&mut s, &mut io, "S.ALL");
    assert_eq!(s.var(0), 3);
    assert_eq!(s.stack_len(), 0);
}

#[test]
fn test_stack_full_drops() {
    let (mut s, mut io) = (scene(), Recorder::new());
    for _ in 0..17 {
        exec(&mut s, &mut io, "S: A 1");
    }
    assert_eq!(s.stack_len(), 16);
    assert_eq!(s.stats().dropped_stack, 1);
    exec(&mut s, &mut io, "S.CLR");
    assert_eq!(s.stack_len(), 0);
}
