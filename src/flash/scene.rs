use super::{Reader, Slot, Storage, Writer};
use crate::error;
use crate::lang::{Error, ErrorCode, Line, MAX_LINE_LEN};
use crate::mach::{
    Calibration, Pattern, Scene, Script, DESCRIPTION_LEN, MAX_LINES, PATTERN_LENGTH, SCRIPT_COUNT,
};

type Result<T> = std::result::Result<T, Error>;

pub const CURRENT_VERSION: u16 = 2;

/// Image of a scene in the current layout.
pub fn serialize(scene: &Scene) -> Vec<u8> {
    write(scene, CURRENT_VERSION)
}

/// Image of a scene in an older layout. Fields the layout lacks are
/// left out.
pub fn serialize_version(scene: &Scene, version: u16) -> Result<Vec<u8>> {
    match version {
        1 | 2 => Ok(write(scene, version)),
        _ => Err(error!(UnknownVersion)),
    }
}

fn write(scene: &Scene, version: u16) -> Vec<u8> {
    let mut w = Writer::default();
    w.u16(version);
    for script in scene.scripts.iter() {
        w.u8(script.len() as u8);
        for n in 0..MAX_LINES {
            w.text(script.line(n).map_or("", |l| l.text()), MAX_LINE_LEN);
        }
    }
    for v in scene.globals.iter() {
        w.i16(*v);
    }
    for p in scene.patterns.iter() {
        for v in p.values().iter() {
            w.i16(*v);
        }
        w.u16(p.len() as u16);
        w.u16(p.start() as u16);
        w.u16(p.end() as u16);
        w.u16(p.index() as u16);
        w.u8(p.wrap() as u8);
    }
    let cal = &scene.calibration;
    for v in [cal.in_min, cal.in_max, cal.param_min, cal.param_max] {
        w.u16(v);
    }
    for m in scene.mutes.iter() {
        w.u8(*m as u8);
    }
    for p in scene.polarity.iter() {
        w.u8(*p);
    }
    if version >= 2 {
        for line in scene.description.iter() {
            w.text(line, DESCRIPTION_LEN);
        }
        for b in scene.midi.bindings.iter() {
            w.i8(*b);
        }
        w.u8(scene.midi.clock_div);
    }
    w.finish()
}

/// Rebuilds a scene from its image, recompiling every line.
pub fn deserialize(bytes: &[u8]) -> Result<Scene> {
    let mut r = Reader::open(bytes)?;
    let version = r.u16()?;
    if version == 0 || version > CURRENT_VERSION {
        return Err(error!(UnknownVersion; &format!("VERSION {}", version)));
    }
    let mut scene = Scene::default();
    for script in scene.scripts.iter_mut() {
        *script = read_script(&mut r)?;
    }
    for v in scene.globals.iter_mut() {
        *v = r.i16()?;
    }
    for p in scene.patterns.iter_mut() {
        *p = read_pattern(&mut r)?;
    }
    scene.calibration = Calibration {
        in_min: r.u16()?,
        in_max: r.u16()?,
        param_min: r.u16()?,
        param_max: r.u16()?,
    };
    if !scene.calibration.is_valid() {
        return Err(error!(Corrupt; "CALIBRATION"));
    }
    for m in scene.mutes.iter_mut() {
        *m = r.flag()?;
    }
    for p in scene.polarity.iter_mut() {
        *p = r.u8()?;
        if *p > 3 {
            return Err(error!(Corrupt; "POLARITY"));
        }
    }
    if version >= 2 {
        for line in scene.description.iter_mut() {
            *line = r.text(DESCRIPTION_LEN)?;
        }
        for b in scene.midi.bindings.iter_mut() {
            *b = r.i8()?;
            if *b < -1 || *b >= SCRIPT_COUNT as i8 {
                return Err(error!(Corrupt; "MIDI BINDING"));
            }
        }
        let div = r.u8()?;
        if !(1..=crate::mach::Midi::CLOCK_DIV_MAX).contains(&div) {
            return Err(error!(Corrupt; "MIDI CLOCK"));
        }
        scene.midi.clock_div = div;
    }
    r.end()?;
    Ok(scene)
}

fn read_script(r: &mut Reader) -> Result<Script> {
    let count = r.u8()? as usize;
    if count > MAX_LINES {
        return Err(error!(Corrupt; "LINE COUNT"));
    }
    let mut script = Script::new();
    for n in 0..MAX_LINES {
        let text = r.text(MAX_LINE_LEN)?;
        if n < count {
            script.set_line(n, Line::from_str(&text))?;
        } else if !text.is_empty() {
            return Err(error!(Corrupt; "LINE COUNT"));
        }
    }
    Ok(script)
}

fn read_pattern(r: &mut Reader) -> Result<Pattern> {
    let mut values = [0i16; PATTERN_LENGTH];
    for v in values.iter_mut() {
        *v = r.i16()?;
    }
    let len = r.u16()? as usize;
    let start = r.u16()? as usize;
    let end = r.u16()? as usize;
    let index = r.u16()? as usize;
    let wrap = r.flag()?;
    Pattern::from_parts(values, len, start, end, index, wrap)
        .ok_or_else(|| error!(Corrupt; "PATTERN"))
}

pub fn load_scene(storage: &dyn Storage, slot: usize) -> Result<Scene> {
    let bytes = storage.read(Slot::Scene(slot))?;
    let mut scene = deserialize(&bytes)?;
    scene.set_slot(slot);
    log::info!("loaded scene {}", slot);
    Ok(scene)
}

pub fn save_scene(storage: &mut dyn Storage, slot: usize, scene: &Scene) -> Result<()> {
    storage.write(Slot::Scene(slot), &serialize(scene))?;
    log::info!("saved scene {}", slot);
    Ok(())
}

/// Loads a slot, falling back to an empty scene when it is blank or
/// cannot be read.
pub fn load_scene_or_default(storage: &dyn Storage, slot: usize) -> Scene {
    match load_scene(storage, slot) {
        Ok(scene) => scene,
        Err(e) => {
            if e.code() == ErrorCode::EmptySlot {
                log::debug!("scene {} is empty", slot);
            } else {
                log::warn!("scene {} not loaded: {}", slot, e);
            }
            let mut scene = Scene::default();
            scene.set_slot(slot);
            scene
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_sizes() {
        let scene = Scene::with_seed(0);
        assert_eq!(serialize_version(&scene, 1).unwrap().len(), 4480);
        assert_eq!(serialize(&scene).len(), 5512);
    }

    #[test]
    fn test_truncated() {
        let bytes = serialize(&Scene::with_seed(0));
        let e = deserialize(&bytes[..100]).unwrap_err();
        assert_eq!(e.code(), ErrorCode::Corrupt);
    }
}
