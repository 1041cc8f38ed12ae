use super::{Error, Mod, Op};
use crate::error;
use std::collections::HashMap;

thread_local!(
    static STRING_TO_TOKEN: HashMap<String, Token> = Op::all()
        .into_iter()
        .flat_map(|op| op.names().into_iter().map(move |n| (n, Token::Op(op))))
        .chain(
            Mod::ALL
                .iter()
                .flat_map(|m| m.names().iter().map(move |n| (n.to_string(), Token::Mod(*m)))),
        )
        .collect();
);

#[derive(Debug, PartialEq, Clone)]
pub enum Token {
    Unknown(String),
    Literal(Literal),
    Op(Op),
    Mod(Mod),
    Var(Var),
    PreSep,
    SubSep,
}

impl Token {
    /// Looks up an operator or modifier name.
    pub fn from_string(s: &str) -> Option<Token> {
        STRING_TO_TOKEN.with(|stt| stt.get(s).cloned())
    }
}

impl std::fmt::Display for Token {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        use Token::*;
        match self {
            Unknown(s) => write!(f, "{}", s),
            Literal(s) => write!(f, "{}", s),
            Op(s) => write!(f, "{}", s),
            Mod(s) => write!(f, "{}", s),
            Var(s) => write!(f, "{}", s),
            PreSep => write!(f, ":"),
            SubSep => write!(f, ";"),
        }
    }
}

#[derive(Debug, PartialEq, Clone)]
pub enum Literal {
    Decimal(String),
    Hex(String),
    Binary(String),
}

impl Literal {
    pub fn value(&self) -> Result<i16, Error> {
        let parsed = match self {
            Literal::Decimal(s) => s
                .parse::<i32>()
                .ok()
                .filter(|n| *n >= i16::MIN as i32 && *n <= i16::MAX as i32)
                .map(|n| n as i16),
            Literal::Hex(s) => u16::from_str_radix(&s[1..], 16).ok().map(|n| n as i16),
            Literal::Binary(s) => u16::from_str_radix(&s[1..], 2).ok().map(|n| n as i16),
        };
        parsed.ok_or_else(|| error!(Overflow; &self.to_string()))
    }
}

impl std::fmt::Display for Literal {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        use Literal::*;
        match self {
            Decimal(s) | Hex(s) | Binary(s) => write!(f, "{}", s),
        }
    }
}

#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum Special {
    In,
    Param,
}

#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum Var {
    /// `A` through `Z`, or `$A` through `$Z`.
    Global(u8),
    /// The loop index `I`.
    Local,
    /// The current value of a pattern, `#0` through `#3`.
    Pattern(u8),
    Special(Special),
}

impl Var {
    pub fn from_string(s: &str) -> Option<Var> {
        let bytes = s.as_bytes();
        match bytes {
            [b'$', c] | [c] if c.is_ascii_uppercase() => {
                if *c == b'I' && bytes.len() == 1 {
                    Some(Var::Local)
                } else {
                    Some(Var::Global(c - b'A'))
                }
            }
            [b'#', c] if (b'0'..=b'3').contains(c) => Some(Var::Pattern(c - b'0')),
            _ => match s {
                "IN" => Some(Var::Special(Special::In)),
                "PARAM" => Some(Var::Special(Special::Param)),
                _ => None,
            },
        }
    }

    pub fn is_read_only(&self) -> bool {
        matches!(self, Var::Special(_))
    }
}

impl std::fmt::Display for Var {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            Var::Global(n) => {
                let name = char::from(b'A' + n).to_string();
                if name == "I" || Token::from_string(&name).is_some() {
                    write!(f, "${}", name)
                } else {
                    write!(f, "{}", name)
                }
            }
            Var::Local => write!(f, "I"),
            Var::Pattern(n) => write!(f, "#{}", n),
            Var::Special(Special::In) => write!(f, "IN"),
            Var::Special(Special::Param) => write!(f, "PARAM"),
        }
    }
}
