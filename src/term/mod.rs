use crate::Args;
use ansi_term::Style;
use linefeed::{Completer, Completion, Interface, Prompter, ReadResult, Terminal};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{Receiver, Sender};
use std::sync::Arc;
use std::time::{Duration, Instant};
use teletype::error;
use teletype::flash::{self, DeviceConfig, DirStorage};
use teletype::lang::Error;
use teletype::mach::{
    self, Event, Input, MidiMessage, Outcome, Recorder, Scene, INIT_SCRIPT, MAX_LINES,
    METRO_SCRIPT, RATE_CLOCK_MS, SCRIPT_COUNT, TRIGGER_COUNT, TR_COUNT,
};

const HELP: &str = "\
:edit S N TEXT   replace line N of script S (1-8, M, I)
:ins S N TEXT    insert before line N
:del S N         delete line N
:list [S]        show scripts
:trig N          pulse trigger input N
:run S           run script S
:note N V        send a MIDI note and flush the batch
:tick MS         advance the clock
:clock           run in real time until Ctrl-C
:save N          save to slot N
:load N          load slot N and run I
:flip            flip the panel
anything else runs as a live line";

pub fn main(args: &Args) {
    let interrupted = Arc::new(AtomicBool::new(false));
    let int_moved = interrupted.clone();
    ctrlc::set_handler(move || {
        int_moved.store(true, Ordering::SeqCst);
    })
    .expect("Error setting Ctrl-C handler");
    if let Err(error) = main_loop(args, interrupted) {
        eprintln!("{}", error);
    }
}

fn main_loop(args: &Args, interrupted: Arc<AtomicBool>) -> std::io::Result<()> {
    let interface = Interface::new("teletype")?;
    interface.set_prompt("> ")?;
    let mut session = Session::new(args);
    print(&interface, &session.events())?;

    loop {
        interface.set_completer(Arc::new(LineCompleter::new(&session.scene)));
        let string = match interface.read_line()? {
            ReadResult::Input(string) => string,
            ReadResult::Signal(_) | ReadResult::Eof => break,
        };
        let trimmed = string.trim();
        if trimmed.is_empty() {
            continue;
        }
        interface.add_history_unique(string.clone());
        let result = if trimmed == ":clock" {
            run_clock(&mut session, &interface, &interrupted)?;
            Ok(vec![])
        } else if let Some(command) = trimmed.strip_prefix(':') {
            session.command(command)
        } else {
            session.live(trimmed)
        };
        match result {
            Ok(lines) => print(&interface, &lines)?,
            Err(error) => interface.write_fmt(format_args!(
                "{}\n",
                Style::new().bold().paint(error.to_string())
            ))?,
        }
        print(&interface, &session.events())?;
    }
    Ok(())
}

fn print<Term: Terminal>(interface: &Interface<Term>, lines: &[String]) -> std::io::Result<()> {
    for line in lines {
        interface.write_fmt(format_args!("{}\n", line))?;
    }
    Ok(())
}

/// Advances the clock in real time until interrupted.
fn run_clock<Term: Terminal>(
    session: &mut Session,
    interface: &Interface<Term>,
    interrupted: &AtomicBool,
) -> std::io::Result<()> {
    interrupted.store(false, Ordering::SeqCst);
    let start = Instant::now();
    let base = session.io.now;
    while !interrupted.load(Ordering::SeqCst) {
        std::thread::sleep(Duration::from_millis(RATE_CLOCK_MS as u64));
        let now = base.wrapping_add(start.elapsed().as_millis() as u32);
        session.advance(now);
        print(interface, &session.events())?;
    }
    interrupted.store(false, Ordering::SeqCst);
    Ok(())
}

/// A scene driven by a simulated clock, with requests recorded instead
/// of reaching hardware.
struct Session {
    scene: Scene,
    io: Recorder,
    storage: DirStorage,
    sender: Sender<Input>,
    inputs: Receiver<Input>,
    next_metro: u32,
    pulses: [Option<u32>; TR_COUNT],
}

impl Session {
    fn new(args: &Args) -> Session {
        let storage = DirStorage::new(args.dir.clone());
        let mut scene = match args.scene {
            Some(slot) => flash::load_scene_or_default(&storage, slot),
            None => Scene::default(),
        };
        if let Some(seed) = args.seed {
            scene.reseed(seed);
        }
        scene.set_flip(flash::load_device_or_default(&storage).flip);
        let (sender, inputs) = mach::channel();
        let mut session = Session {
            scene,
            io: Recorder::new(),
            storage,
            sender,
            inputs,
            next_metro: 0,
            pulses: [None; TR_COUNT],
        };
        session.scene.init(&mut session.io);
        session.next_metro = session.scene.metro_ms() as u32;
        session
    }

    fn send(&mut self, input: Input) {
        if self.sender.send(input).is_ok() {
            self.scene.drain(&mut self.io, &self.inputs);
        }
    }

    /// Moves the clock to `now` and delivers everything that came due.
    fn advance(&mut self, now: u32) {
        self.io.now = now;
        for ch in 0..TR_COUNT {
            if let Some(end) = self.pulses[ch] {
                if now.wrapping_sub(end) as i32 >= 0 {
                    self.pulses[ch] = None;
                    self.send(Input::TrPulseEnd(ch));
                }
            }
        }
        if self.scene.metro_active() && now.wrapping_sub(self.next_metro) as i32 >= 0 {
            self.next_metro = now.wrapping_add(self.scene.metro_ms() as u32);
            self.send(Input::Metro);
        }
        self.send(Input::Tick(now));
    }

    /// Acts on recorded requests the harness plays the firmware for,
    /// and describes all of them.
    fn events(&mut self) -> Vec<String> {
        let mut lines = vec![];
        for event in self.io.take() {
            match &event {
                Event::TrPulse(ch, ms) => {
                    self.pulses[*ch] = Some(self.io.now.wrapping_add(*ms as u32));
                }
                Event::TrPulseClear(ch) => self.pulses[*ch] = None,
                Event::Metro(ms, _) => self.next_metro = self.io.now.wrapping_add(*ms as u32),
                Event::MetroReset => self.next_metro = self.io.now,
                Event::LoadScene(slot) => {
                    if let Err(e) = self.load(*slot) {
                        lines.push(Style::new().bold().paint(e.to_string()).to_string());
                    }
                }
                Event::DeviceFlip => {
                    let config = DeviceConfig {
                        flip: self.scene.flip(),
                    };
                    if let Err(e) = flash::save_device(&mut self.storage, config) {
                        lines.push(Style::new().bold().paint(e.to_string()).to_string());
                    }
                }
                _ => {}
            }
            lines.push(describe(&event));
        }
        lines
    }

    fn load(&mut self, slot: usize) -> Result<(), Error> {
        let mut scene = flash::load_scene(&self.storage, slot)?;
        scene.set_flip(self.scene.flip());
        self.scene = scene;
        self.pulses = [None; TR_COUNT];
        self.scene.init(&mut self.io);
        Ok(())
    }

    fn live(&mut self, line: &str) -> Result<Vec<String>, Error> {
        match self.scene.execute(&mut self.io, line)? {
            Some(value) => Ok(vec![value.to_string()]),
            None => Ok(vec![]),
        }
    }

    fn command(&mut self, command: &str) -> Result<Vec<String>, Error> {
        let words: Vec<&str> = command.splitn(4, ' ').collect();
        let arg = |n: usize| words.get(n).copied().unwrap_or("");
        match words[0].to_ascii_lowercase().as_str() {
            "edit" | "ins" => {
                let script = script_number(arg(1))?;
                let line = line_number(arg(2))?;
                if words[0].eq_ignore_ascii_case("edit") {
                    self.scene.edit_line(script, line, arg(3))?;
                } else {
                    self.scene.insert_line(script, line, arg(3))?;
                }
                Ok(vec![])
            }
            "del" => {
                self.scene
                    .delete_line(script_number(arg(1))?, line_number(arg(2))?)?;
                Ok(vec![])
            }
            "list" => match arg(1) {
                "" => Ok((0..SCRIPT_COUNT).flat_map(|s| self.listing(s)).collect()),
                s => Ok(self.listing(script_number(s)?)),
            },
            "trig" => {
                let input = number(arg(1), 1, TRIGGER_COUNT)? - 1;
                self.send(Input::Trigger { input, rising: true });
                self.send(Input::Trigger {
                    input,
                    rising: false,
                });
                Ok(vec![])
            }
            "run" => match self.scene.run(&mut self.io, script_number(arg(1))?) {
                Outcome::Value(Some(value)) => Ok(vec![value.to_string()]),
                Outcome::Value(None) => Ok(vec![]),
                Outcome::DepthExceeded => Err(error!(RecursionLimit)),
            },
            "note" => {
                let note = number(arg(1), 0, 127)? as u8;
                let velocity = number(arg(2), 0, 127)? as u8;
                self.send(Input::Midi(MidiMessage::NoteOn {
                    channel: 0,
                    note,
                    velocity,
                }));
                self.send(Input::MidiFlush);
                Ok(vec![])
            }
            "tick" => {
                let target = self
                    .io
                    .now
                    .wrapping_add(number(arg(1), 0, u16::MAX as usize)? as u32);
                while self.io.now != target {
                    let step = target.wrapping_sub(self.io.now).min(RATE_CLOCK_MS);
                    self.advance(self.io.now.wrapping_add(step));
                }
                Ok(vec![format!("TIME {}", self.io.now)])
            }
            "save" => {
                let slot = number(arg(1), 0, mach::SCENE_SLOTS - 1)?;
                flash::save_scene(&mut self.storage, slot, &self.scene)?;
                self.scene.set_slot(slot);
                Ok(vec![])
            }
            "load" => {
                self.load(number(arg(1), 0, mach::SCENE_SLOTS - 1)?)?;
                Ok(vec![])
            }
            "flip" => {
                self.scene.execute(&mut self.io, "DEVICE.FLIP")?;
                Ok(vec![])
            }
            "help" => Ok(HELP.lines().map(String::from).collect()),
            _ => Err(error!(UnknownOperator; "TRY :HELP")),
        }
    }

    fn listing(&self, script: usize) -> Vec<String> {
        let mut lines = vec![format!("#{}", script_name(script))];
        if let Some(s) = self.scene.script(script) {
            for (n, line) in s.lines().iter().enumerate() {
                match line.error() {
                    Some(e) => lines.push(format!(
                        "{} {}  {}",
                        n + 1,
                        line,
                        Style::new().bold().paint(e.to_string())
                    )),
                    None => lines.push(format!("{} {}", n + 1, line)),
                }
            }
        }
        lines
    }
}

fn describe(event: &Event) -> String {
    match event {
        Event::Cv(ch, value, _) => format!("CV {} {}", ch + 1, value),
        Event::Tr(ch, high) => format!("TR {} {}", ch + 1, *high as u8),
        Event::TrPulse(ch, ms) => format!("TR.PULSE {} {}", ch + 1, ms),
        Event::Metro(ms, active) => format!("M {} {}", ms, *active as u8),
        Event::LoadScene(slot) => format!("SCENE {}", slot),
        other => format!("{:?}", other),
    }
}

fn script_name(script: usize) -> String {
    match script {
        METRO_SCRIPT => "M".to_string(),
        INIT_SCRIPT => "I".to_string(),
        n => (n + 1).to_string(),
    }
}

fn script_number(s: &str) -> Result<usize, Error> {
    match s.to_ascii_uppercase().as_str() {
        "M" => Ok(METRO_SCRIPT),
        "I" => Ok(INIT_SCRIPT),
        n => match n.parse::<usize>() {
            Ok(n) if (1..=TRIGGER_COUNT).contains(&n) => Ok(n - 1),
            _ => Err(error!(NoSuchScript)),
        },
    }
}

fn line_number(s: &str) -> Result<usize, Error> {
    match s.parse::<usize>() {
        Ok(n) if (1..=MAX_LINES).contains(&n) => Ok(n - 1),
        _ => Err(error!(NoSuchLine)),
    }
}

fn number(s: &str, min: usize, max: usize) -> Result<usize, Error> {
    match s.parse::<usize>() {
        Ok(n) if (min..=max).contains(&n) => Ok(n),
        _ => Err(error!(NeedParams; &format!("EXPECTED {}..{}", min, max))),
    }
}

/// Completes `:edit S N` with the current text of that line.
struct LineCompleter {
    scripts: Vec<Vec<String>>,
}

impl LineCompleter {
    fn new(scene: &Scene) -> LineCompleter {
        let scripts = (0..SCRIPT_COUNT)
            .map(|n| match scene.script(n) {
                Some(s) => s.lines().iter().map(|l| l.text().to_string()).collect(),
                None => vec![],
            })
            .collect();
        LineCompleter { scripts }
    }
}

impl<Term: Terminal> Completer<Term> for LineCompleter {
    fn complete(
        &self,
        _word: &str,
        prompter: &Prompter<Term>,
        _start: usize,
        _end: usize,
    ) -> Option<Vec<Completion>> {
        let words: Vec<&str> = prompter.buffer().split_whitespace().collect();
        if words.len() != 3 || !words[0].eq_ignore_ascii_case(":edit") {
            return None;
        }
        let script = script_number(words[1]).ok()?;
        let line = line_number(words[2]).ok()?;
        let text = self.scripts.get(script)?.get(line)?;
        let mut comp = Completion::simple(format!("{} {}", words[2], text));
        comp.suffix = linefeed::complete::Suffix::None;
        Some(vec![comp])
    }
}
