use super::scene::StackEntry;
use super::script::Every;
use super::*;
use crate::lang::{ast::Command, Error, Kind, Line, Mod, Op, Var};
use rand::Rng;
use std::rc::Rc;

type Result<T> = std::result::Result<T, Error>;

/// Result of running a script.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// The value of the last line that produced one.
    Value(Option<i16>),
    /// The call, or a nested `SCRIPT` call within it, reached
    /// `MAX_DEPTH` and was skipped. Effects applied before that stay.
    DepthExceeded,
}

/// State of one script invocation.
#[derive(Debug)]
pub(crate) struct Context {
    pub script: usize,
    pub depth: usize,
    pub i: i16,
    /// An `IF` failed and no `ELIF`/`ELSE` has run yet.
    pub if_else: bool,
    pub every_fired: bool,
    pub breaking: bool,
    pub line: Option<usize>,
}

impl Context {
    fn new(script: usize, depth: usize) -> Context {
        Context {
            script,
            depth,
            i: 0,
            if_else: false,
            every_fired: false,
            breaking: false,
            line: None,
        }
    }
}

impl Scene {
    /// Runs every line of `script` in order.
    pub fn run(&mut self, io: &mut dyn Io, script: usize) -> Outcome {
        let aborts = self.stats.depth_aborts;
        let outcome = self.run_at(io, script, 0);
        if self.stats.depth_aborts != aborts {
            return Outcome::DepthExceeded;
        }
        outcome
    }

    pub(crate) fn run_at(&mut self, io: &mut dyn Io, script: usize, depth: usize) -> Outcome {
        if depth >= MAX_DEPTH {
            self.stats.depth_aborts += 1;
            log::warn!("script {} skipped at depth {}", script + 1, depth);
            return Outcome::DepthExceeded;
        }
        let len = match self.scripts.get(script) {
            Some(s) => s.len(),
            None => return Outcome::Value(None),
        };
        self.last_run[script] = io.ticks();
        let mut ctx = Context::new(script, depth);
        let mut value = None;
        for n in 0..len {
            let command = match self.scripts[script].command(n) {
                Some(command) => command,
                None => break,
            };
            ctx.line = Some(n);
            if let Some(v) = self.exec(io, &mut ctx, &command) {
                value = Some(v);
            }
            if ctx.breaking {
                break;
            }
        }
        Outcome::Value(value)
    }

    /// Compiles and runs one line outside any script.
    pub fn execute(&mut self, io: &mut dyn Io, text: &str) -> Result<Option<i16>> {
        let line = Line::from_str(text);
        if let Some(error) = line.error() {
            return Err(error.clone());
        }
        let mut ctx = Context::new(LIVE_SCRIPT, 0);
        Ok(self.exec(io, &mut ctx, &line.command()))
    }

    /// Fires every delayed command due at `now`, earliest first. Entries
    /// scheduled while firing wait for the next call. Returns the number
    /// fired.
    pub fn advance_delay_queue(&mut self, io: &mut dyn Io, now: u32) -> usize {
        let before = self.delays.next_seq();
        let mut fired = 0;
        while let Some(entry) = self.delays.pop_due_before(now, before) {
            let mut ctx = Context::new(entry.script, 0);
            ctx.i = entry.i;
            self.exec(io, &mut ctx, &entry.command);
            fired += 1;
        }
        fired
    }

    pub(crate) fn run_stacked(&mut self, io: &mut dyn Io, depth: usize, entry: StackEntry) {
        let (script, i, command) = entry;
        let mut ctx = Context::new(script, depth);
        ctx.i = i;
        self.exec(io, &mut ctx, &command);
    }

    pub(crate) fn exec(&mut self, io: &mut dyn Io, ctx: &mut Context, command: &Command) -> Option<i16> {
        match command {
            Command::Nop => None,
            Command::Literal(n) => Some(*n),
            Command::Var(v) => Some(self.read_var(io, ctx, *v)),
            Command::Op(op, args) => Some(self.eval_op(io, ctx, *op, args)),
            Command::Set(op, args, value) => {
                let mut a = [0i16; 3];
                for (n, arg) in args.iter().enumerate().take(3) {
                    a[n] = self.eval(io, ctx, arg);
                }
                let value = self.eval(io, ctx, value);
                self.set(io, ctx, *op, &a[..args.len().min(3)], value);
                None
            }
            Command::Store(var, value) => {
                let value = self.eval(io, ctx, value);
                self.write_var(ctx, *var, value);
                None
            }
            Command::Mod(m, args, body) => {
                self.exec_mod(io, ctx, *m, args, body);
                None
            }
            Command::Seq(commands) => {
                let mut value = None;
                for command in commands {
                    if let Some(v) = self.exec(io, ctx, command) {
                        value = Some(v);
                    }
                    if ctx.breaking {
                        break;
                    }
                }
                value
            }
        }
    }

    pub(crate) fn eval(&mut self, io: &mut dyn Io, ctx: &mut Context, command: &Command) -> i16 {
        self.exec(io, ctx, command).unwrap_or(0)
    }

    fn eval_arg(&mut self, io: &mut dyn Io, ctx: &mut Context, args: &[Command], n: usize) -> i16 {
        match args.get(n) {
            Some(arg) => self.eval(io, ctx, arg),
            None => 0,
        }
    }

    fn eval_op(&mut self, io: &mut dyn Io, ctx: &mut Context, op: Op, args: &[Command]) -> i16 {
        if op.kind() == Kind::Control {
            return self.control(io, ctx, op, args);
        }
        let mut a = [0i16; 3];
        for (n, arg) in args.iter().enumerate().take(3) {
            a[n] = self.eval(io, ctx, arg);
        }
        let a = &a[..args.len().min(3)];
        match op.kind() {
            Kind::Pure => Operation::pure(op, a),
            _ => self.get(io, ctx, op, a),
        }
    }

    /// Operators that evaluate only some of their operands.
    fn control(&mut self, io: &mut dyn Io, ctx: &mut Context, op: Op, args: &[Command]) -> i16 {
        match op {
            Op::Ternary => {
                if self.eval_arg(io, ctx, args, 0) != 0 {
                    self.eval_arg(io, ctx, args, 1)
                } else {
                    self.eval_arg(io, ctx, args, 2)
                }
            }
            _ => 0,
        }
    }

    fn read_var(&mut self, io: &mut dyn Io, ctx: &Context, var: Var) -> i16 {
        match var {
            Var::Global(n) => self.var(n as usize),
            Var::Local => ctx.i,
            Var::Pattern(n) => self.pattern(n as usize).get(),
            Var::Special(input) => {
                let raw = io.adc(input);
                self.calibration.read(input, raw)
            }
        }
    }

    fn write_var(&mut self, ctx: &mut Context, var: Var, value: i16) {
        match var {
            Var::Global(n) => self.set_var(n as usize, value),
            Var::Local => ctx.i = value,
            Var::Pattern(n) => self.pattern_mut(n as usize).set(value),
            Var::Special(_) => {}
        }
    }

    fn every_counter(&mut self, ctx: &Context) -> &mut Every {
        match ctx.line {
            Some(n) if ctx.script < SCRIPT_COUNT && n < MAX_LINES => &mut self.every[ctx.script][n],
            _ => &mut self.live_every,
        }
    }

    fn exec_mod(
        &mut self,
        io: &mut dyn Io,
        ctx: &mut Context,
        m: Mod,
        args: &[Command],
        body: &Rc<Command>,
    ) {
        match m {
            Mod::If => {
                let cond = self.eval_arg(io, ctx, args, 0) != 0;
                ctx.if_else = !cond;
                if cond {
                    self.exec(io, ctx, body);
                }
            }
            Mod::Elif => {
                if ctx.if_else && self.eval_arg(io, ctx, args, 0) != 0 {
                    ctx.if_else = false;
                    self.exec(io, ctx, body);
                }
            }
            Mod::Else => {
                if ctx.if_else {
                    ctx.if_else = false;
                    self.exec(io, ctx, body);
                }
            }
            Mod::L => {
                let from = self.eval_arg(io, ctx, args, 0) as i32;
                let to = self.eval_arg(io, ctx, args, 1) as i32;
                let step = if from <= to { 1 } else { -1 };
                let mut i = from;
                loop {
                    ctx.i = i as i16;
                    self.exec(io, ctx, body);
                    if ctx.breaking || i == to {
                        break;
                    }
                    i += step;
                }
            }
            Mod::W => {
                let mut count = 0;
                while count < WHILE_DEPTH && self.eval_arg(io, ctx, args, 0) != 0 {
                    self.exec(io, ctx, body);
                    count += 1;
                    if ctx.breaking {
                        break;
                    }
                }
                if count == WHILE_DEPTH {
                    log::debug!("W stopped after {} iterations", WHILE_DEPTH);
                }
            }
            Mod::Every | Mod::Skip => {
                let n = self.eval_arg(io, ctx, args, 0);
                let hit = self.every_counter(ctx).tick(n);
                let fired = if m == Mod::Every { hit } else { !hit };
                ctx.every_fired = fired;
                if fired {
                    self.exec(io, ctx, body);
                }
            }
            Mod::Other => {
                if !ctx.every_fired {
                    self.exec(io, ctx, body);
                }
            }
            Mod::Prob => {
                let n = self.eval_arg(io, ctx, args, 0) as i32;
                if self.rng.gen_range(0..100) < n {
                    self.exec(io, ctx, body);
                }
            }
            Mod::Del => {
                let t = self.eval_arg(io, ctx, args, 0).max(1) as u32;
                self.defer(io, ctx, body, t);
            }
            Mod::DelX => {
                let n = self.eval_arg(io, ctx, args, 0).clamp(0, DELAY_SIZE as i16) as u32;
                let t = self.eval_arg(io, ctx, args, 1).max(1) as u32;
                for k in 1..=n {
                    self.defer(io, ctx, body, t * k);
                }
            }
            Mod::DelR => {
                let n = self.eval_arg(io, ctx, args, 0).clamp(0, DELAY_SIZE as i16) as u32;
                let t = self.eval_arg(io, ctx, args, 1).max(1) as u32;
                if n > 0 {
                    self.exec(io, ctx, body);
                }
                for k in 1..n {
                    self.defer(io, ctx, body, t * k);
                }
            }
            Mod::S => {
                if let Err(e) = self.stack.push((ctx.script, ctx.i, Rc::clone(body))) {
                    self.stats.dropped_stack += 1;
                    log::debug!("{}; from script {}", e, ctx.script + 1);
                }
            }
        }
    }

    fn defer(&mut self, io: &mut dyn Io, ctx: &Context, body: &Rc<Command>, delay: u32) {
        let fire = io.ticks().wrapping_add(delay);
        if let Err(e) = self.delays.schedule(ctx.script, ctx.i, Rc::clone(body), fire) {
            self.stats.dropped_delays += 1;
            log::debug!("{}; from script {}", e, ctx.script + 1);
        }
    }
}
