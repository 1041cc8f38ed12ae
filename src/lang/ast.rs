use super::{Mod, Op, Var};
use std::rc::Rc;

/// A parsed line. Operator children always number exactly the
/// operator's arity; setters carry one extra value.
#[derive(Debug, PartialEq, Clone)]
pub enum Command {
    Nop,
    Literal(i16),
    Var(Var),
    Op(Op, Vec<Command>),
    Set(Op, Vec<Command>, Box<Command>),
    Store(Var, Box<Command>),
    /// The body is shared with any delay or stack entry it schedules.
    Mod(Mod, Vec<Command>, Rc<Command>),
    Seq(Vec<Command>),
}

impl Command {
    pub fn is_nop(&self) -> bool {
        matches!(self, Command::Nop)
    }

    /// Visits this command and every command beneath it.
    pub fn any(&self, f: &dyn Fn(&Command) -> bool) -> bool {
        if f(self) {
            return true;
        }
        match self {
            Command::Nop | Command::Literal(_) | Command::Var(_) => false,
            Command::Op(_, args) | Command::Seq(args) => args.iter().any(|c| c.any(f)),
            Command::Set(_, args, value) => args.iter().any(|c| c.any(f)) || value.any(f),
            Command::Store(_, value) => value.any(f),
            Command::Mod(_, args, body) => args.iter().any(|c| c.any(f)) || body.any(f),
        }
    }
}

impl std::fmt::Display for Command {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        fn list(f: &mut std::fmt::Formatter, args: &[Command]) -> std::fmt::Result {
            for arg in args {
                write!(f, " {}", arg)?;
            }
            Ok(())
        }
        match self {
            Command::Nop => Ok(()),
            Command::Literal(n) => write!(f, "{}", n),
            Command::Var(v) => write!(f, "{}", v),
            Command::Op(op, args) => {
                write!(f, "{}", op)?;
                list(f, args)
            }
            Command::Set(op, args, value) => {
                write!(f, "{}", op)?;
                list(f, args)?;
                write!(f, " {}", value)
            }
            Command::Store(v, value) => write!(f, "{} {}", v, value),
            Command::Mod(m, args, body) => {
                write!(f, "{}", m)?;
                list(f, args)?;
                write!(f, ": {}", body)
            }
            Command::Seq(commands) => {
                for (n, command) in commands.iter().enumerate() {
                    if n > 0 {
                        write!(f, "; ")?;
                    }
                    write!(f, "{}", command)?;
                }
                Ok(())
            }
        }
    }
}
