#![allow(dead_code)]
use teletype::mach::{Recorder, Scene};

pub fn scene() -> Scene {
    Scene::with_seed(1)
}

/// Fills a script from the top, failing the test on any compile error.
pub fn script(scene: &mut Scene, n: usize, lines: &[&str]) {
    for (k, line) in lines.iter().enumerate() {
        if let Err(e) = scene.edit_line(n, k, line) {
            panic!("{}: {}", line, e);
        }
    }
}

/// Runs one live line and returns its value.
pub fn exec(scene: &mut Scene, io: &mut Recorder, line: &str) -> Option<i16> {
    match scene.execute(io, line) {
        Ok(value) => value,
        Err(e) => panic!("{}: {}", line, e),
    }
}
