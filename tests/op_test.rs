mod common;
use common::*;
use teletype::lang::ErrorCode;
use teletype::mach::{Calibration, Event, Outcome, Recorder, Scene, CV_MAX, MAX_DEPTH};

#[test]
fn test_arithmetic() {
    let (mut s, mut io) = (scene(), Recorder::new());
    assert_eq!(exec(&mut s, &mut io, "ADD 1 2"), Some(3));
    assert_eq!(exec(&mut s, &mut io, "+ 1 * 2 3"), Some(7));
    assert_eq!(exec(&mut s, &mut io, "- 0 -5"), Some(5));
    assert_eq!(exec(&mut s, &mut io, "DIV 7 0"), Some(0));
    assert_eq!(exec(&mut s, &mut io, "MOD -7 3"), Some(-1));
    assert_eq!(exec(&mut s, &mut io, "LIM 9 0 3"), Some(3));
    assert_eq!(exec(&mut s, &mut io, "WRAP 5 0 3"), Some(1));
    assert_eq!(exec(&mut s, &mut io, "X1F"), Some(31));
    assert_eq!(exec(&mut s, &mut io, "B101"), Some(5));
    assert_eq!(exec(&mut s, &mut io, "ADD 32767 1"), Some(-32768));
}

#[test]
fn test_ternary() {
    let (mut s, mut io) = (scene(), Recorder::new());
    assert_eq!(exec(&mut s, &mut io, "? 1 10 20"), Some(10));
    assert_eq!(exec(&mut s, &mut io, "? 0 10 20"), Some(20));
    assert_eq!(exec(&mut s, &mut io, "? GT 3 2 N 12 0"), Some(1638));
}

#[test]
fn test_variables() {
    let (mut s, mut io) = (scene(), Recorder::new());
    exec(&mut s, &mut io, "A 5; B + A 1");
    assert_eq!(s.var(0), 5);
    assert_eq!(s.var(1), 6);
    exec(&mut s, &mut io, "$N 9");
    assert_eq!(s.var(13), 9);
    assert_eq!(exec(&mut s, &mut io, "I 4; I"), Some(4));
    assert!(io.take().is_empty());
}

#[test]
fn test_cv_from_unset_variable() {
    let (mut s, mut io) = (scene(), Recorder::new());
    assert_eq!(exec(&mut s, &mut io, "CV 1 B"), None);
    assert_eq!(s.cv(0), 0);
    assert_eq!(io.take(), vec![Event::Cv(0, 0, true)]);
}

#[test]
fn test_cv_offset_and_range() {
    let (mut s, mut io) = (scene(), Recorder::new());
    exec(&mut s, &mut io, "CV 2 V 5");
    assert_eq!(s.cv(1), 8192);
    exec(&mut s, &mut io, "CV.OFF 2 100; CV 2 V 10");
    assert_eq!(s.cv(1), CV_MAX);
    assert_eq!(io.last_cv(1), Some(CV_MAX));
    exec(&mut s, &mut io, "CV 2 -400");
    assert_eq!(s.cv(1), 0);
    assert_eq!(io.last_cv(1), Some(100));
    exec(&mut s, &mut io, "CV.SET 3 1000");
    assert_eq!(io.take().last(), Some(&Event::Cv(2, 1000, false)));
    assert_eq!(exec(&mut s, &mut io, "CV 3"), Some(1000));
    assert_eq!(exec(&mut s, &mut io, "CV 5 100"), None);
    assert!(io.take().is_empty());
}

#[test]
fn test_trigger_outputs() {
    let (mut s, mut io) = (scene(), Recorder::new());
    exec(&mut s, &mut io, "TR.TIME 2 50; TR.PULSE 2");
    assert_eq!(
        io.take(),
        vec![
            Event::TrPulseTime(1, 50),
            Event::Tr(1, true),
            Event::TrPulse(1, 50)
        ]
    );
    s.tr_pulse_end(&mut io, 1);
    assert_eq!(io.take(), vec![Event::Tr(1, false)]);
    exec(&mut s, &mut io, "TR.POL 3 0; TR.TOG 3");
    assert!(s.tr(2));
    assert_eq!(exec(&mut s, &mut io, "TR 3"), Some(1));
}

#[test]
fn test_metro() {
    let (mut s, mut io) = (scene(), Recorder::new());
    exec(&mut s, &mut io, "M 10");
    assert_eq!(s.metro_ms(), 25);
    exec(&mut s, &mut io, "M.ACT 0");
    assert!(!s.metro_active());
    assert_eq!(
        io.take(),
        vec![Event::Metro(25, true), Event::Metro(25, false)]
    );
    assert_eq!(s.metro(&mut io), None);
    script(&mut s, 8, &["A + A 1"]);
    assert_eq!(s.metro(&mut io), Some(Outcome::Value(None)));
    assert_eq!(s.var(0), 1);
}

#[test]
fn test_random_is_seeded() {
    let (mut a, mut b) = (Scene::with_seed(3), Scene::with_seed(3));
    let mut io = Recorder::new();
    exec(&mut a, &mut io, "SEED 7");
    exec(&mut b, &mut io, "SEED 7");
    for _ in 0..10 {
        let x = exec(&mut a, &mut io, "RAND 100");
        assert_eq!(x, exec(&mut b, &mut io, "RAND 100"));
        let x = x.unwrap_or(-1);
        assert!((0..=100).contains(&x));
        let r = exec(&mut a, &mut io, "RRAND 5 3").unwrap_or(-1);
        assert!((3..=5).contains(&r));
        exec(&mut b, &mut io, "RRAND 5 3");
    }
    assert_eq!(exec(&mut a, &mut io, "SEED"), Some(7));
}

#[test]
fn test_script_call_and_value() {
    let (mut s, mut io) = (scene(), Recorder::new());
    script(&mut s, 1, &["ADD 2 3"]);
    script(&mut s, 0, &["A SCRIPT", "SCRIPT 2"]);
    assert_eq!(s.run(&mut io, 1), Outcome::Value(Some(5)));
    assert_eq!(s.run(&mut io, 0), Outcome::Value(None));
    assert_eq!(s.var(0), 1);
    assert_eq!(exec(&mut s, &mut io, "SCRIPT"), Some(0));
}

#[test]
fn test_recursion_limit_keeps_effects() {
    let (mut s, mut io) = (scene(), Recorder::new());
    script(&mut s, 0, &["A + A 1", "SCRIPT 1"]);
    assert_eq!(s.run(&mut io, 0), Outcome::DepthExceeded);
    assert_eq!(s.var(0), MAX_DEPTH as i16);
    assert_eq!(s.stats().depth_aborts, 1);
    script(&mut s, 1, &["B 1"]);
    assert_eq!(s.run(&mut io, 1), Outcome::Value(None));
}

#[test]
fn test_recursion_limit_keeps_outputs() {
    let (mut s, mut io) = (scene(), Recorder::new());
    script(&mut s, 0, &["CV 1 V 2; TR.P 1; SCRIPT 1"]);
    assert_eq!(s.run(&mut io, 0), Outcome::DepthExceeded);
    let cv = io.events.iter().filter(|e| matches!(e, Event::Cv(0, _, true))).count();
    let pulses = io.events.iter().filter(|e| **e == Event::TrPulse(0, 100)).count();
    assert_eq!((cv, pulses), (MAX_DEPTH, MAX_DEPTH));
    assert_eq!(exec(&mut s, &mut io, "CV 1"), exec(&mut s, &mut io, "V 2"));
    assert_eq!(exec(&mut s, &mut io, "TR 1"), Some(1));
}

#[test]
fn test_break_stops_script() {
    let (mut s, mut io) = (scene(), Recorder::new());
    script(&mut s, 0, &["A 1", "IF 1: BREAK", "A 2"]);
    s.run(&mut io, 0);
    assert_eq!(s.var(0), 1);
}

#[test]
fn test_mute_and_polarity() {
    let (mut s, mut io) = (scene(), Recorder::new());
    script(&mut s, 0, &["A + A 1"]);
    script(&mut s, 1, &["B + B 1"]);
    exec(&mut s, &mut io, "MUTE 1 1; SCRIPT.POL 2 2");
    assert_eq!(io.take(), vec![Event::MutesUpdated]);
    assert_eq!(s.trigger(&mut io, 0, true), None);
    assert_eq!(s.trigger(&mut io, 1, true), None);
    assert!(s.trigger(&mut io, 1, false).is_some());
    assert_eq!((s.var(0), s.var(1)), (0, 1));
    assert_eq!(exec(&mut s, &mut io, "SCRIPT.POL 2"), Some(2));
}

#[test]
fn test_flipped_inputs() {
    let (mut s, mut io) = (scene(), Recorder::new());
    script(&mut s, 7, &["A 8"]);
    exec(&mut s, &mut io, "DEVICE.FLIP");
    assert!(s.flip());
    assert_eq!(io.take(), vec![Event::DeviceFlip]);
    s.trigger(&mut io, 0, true);
    assert_eq!(s.var(0), 8);
}

#[test]
fn test_scene_request() {
    let (mut s, mut io) = (scene(), Recorder::new());
    exec(&mut s, &mut io, "SCENE 3");
    assert_eq!(io.take(), vec![Event::LoadScene(3)]);
    script(&mut s, 9, &["SCENE 4", "A 1"]);
    s.init(&mut io);
    assert!(io.take().is_empty());
    assert_eq!(s.var(0), 1);
}

#[test]
fn test_time_and_last() {
    let (mut s, mut io) = (scene(), Recorder::new());
    io.now = 500;
    exec(&mut s, &mut io, "TIME 0");
    io.now = 800;
    assert_eq!(exec(&mut s, &mut io, "TIME"), Some(300));
    exec(&mut s, &mut io, "TIME.ACT 0");
    io.now = 1000;
    assert_eq!(exec(&mut s, &mut io, "TIME"), Some(300));
    exec(&mut s, &mut io, "TIME.ACT 1");
    io.now = 1100;
    assert_eq!(exec(&mut s, &mut io, "TIME"), Some(400));

    script(&mut s, 0, &["A 1"]);
    s.run(&mut io, 0);
    io.now = 1350;
    assert_eq!(exec(&mut s, &mut io, "LAST 1"), Some(250));
}

#[test]
fn test_inputs_and_calibration() {
    let (mut s, mut io) = (scene(), Recorder::new());
    io.inputs[2] = true;
    assert_eq!(exec(&mut s, &mut io, "STATE 3"), Some(1));
    io.adc_in = 1000;
    assert_eq!(exec(&mut s, &mut io, "IN.CAL.MIN"), Some(1000));
    io.adc_in = 3000;
    exec(&mut s, &mut io, "IN.CAL.MAX");
    io.adc_in = 2000;
    assert_eq!(exec(&mut s, &mut io, "IN"), Some(CV_MAX / 2));
    io.adc_param = 77;
    assert_eq!(exec(&mut s, &mut io, "PARAM"), Some(77));
    exec(&mut s, &mut io, "IN.CAL.RESET");
    assert_eq!(s.calibration(), &Calibration::default());
    let saves = io
        .take()
        .into_iter()
        .filter(|e| matches!(e, Event::SaveCalibration(_)))
        .count();
    assert_eq!(saves, 3);
}

#[test]
fn test_ii() {
    let (mut s, mut io) = (scene(), Recorder::new());
    io.ii_reply = [1, 2];
    assert_eq!(exec(&mut s, &mut io, "II.RX 5 7"), Some(258));
    exec(&mut s, &mut io, "II.TX 5 1 -1");
    assert_eq!(
        io.take(),
        vec![
            Event::IiTx(5, vec![7]),
            Event::IiRx(5),
            Event::IiTx(5, vec![1, 0xff, 0xff])
        ]
    );
}

#[test]
fn test_turtle_and_grid() {
    let (mut s, mut io) = (scene(), Recorder::new());
    exec(&mut s, &mut io, "@X 3; @Y 2; @ 9");
    assert_eq!(s.grid_led(3, 2), 9);
    assert_eq!(exec(&mut s, &mut io, "G.LED 3 2"), Some(9));
    exec(&mut s, &mut io, "@STEP");
    assert_eq!(exec(&mut s, &mut io, "@X"), Some(4));
    exec(&mut s, &mut io, "@TURN 2; @FWD 3");
    assert_eq!(exec(&mut s, &mut io, "@Y"), Some(5));
    exec(&mut s, &mut io, "@HOME");
    assert_eq!(exec(&mut s, &mut io, "@DIR"), Some(2));
    exec(&mut s, &mut io, "G.LED 0 0 20");
    assert_eq!(s.grid_led(0, 0), 15);
    s.grid_key(&mut io, 1, 1, true);
    assert_eq!(exec(&mut s, &mut io, "G.KEY 1 1"), Some(1));
    exec(&mut s, &mut io, "G.CLR");
    assert_eq!(s.grid_led(3, 2), 0);
}

#[test]
fn test_init_data() {
    let (mut s, mut io) = (scene(), Recorder::new());
    exec(&mut s, &mut io, "A 3; P.PUSH 4");
    exec(&mut s, &mut io, "INIT.DATA");
    assert_eq!(s.var(0), 0);
    assert_eq!(s.pattern(0).len(), 0);
    assert_eq!(io.take(), vec![Event::VarsUpdated]);
}

#[test]
fn test_live_errors() {
    let (mut s, mut io) = (scene(), Recorder::new());
    let e = s.execute(&mut io, "CV").unwrap_err();
    assert_eq!(e.code(), ErrorCode::NeedParams);
    assert_eq!(s.execute(&mut io, "CV 1"), Ok(Some(0)));
}
