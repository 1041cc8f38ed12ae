use super::{ast::*, token::*, Column, Error, Op};
use crate::error;
use std::rc::Rc;

type Result<T> = std::result::Result<T, Error>;

/// Builds the command tree for one lexed line. Blank lines give `Nop`.
pub fn parse(tokens: &[(Column, Token)]) -> Result<Command> {
    Parser::parse(tokens)
}

struct Parser<'a> {
    token_stream: std::slice::Iter<'a, (Column, Token)>,
    peeked: Option<&'a (Column, Token)>,
    col: Column,
}

impl<'a> Parser<'a> {
    fn parse(tokens: &'a [(Column, Token)]) -> Result<Command> {
        let mut pre_seps = tokens.iter().filter(|(_, t)| *t == Token::PreSep);
        let first_pre_sep = pre_seps.next();
        if let Some((col, _)) = pre_seps.next() {
            return Err(error!(ManyPreSep, ..col));
        }
        let mut parse = Parser {
            token_stream: tokens.iter(),
            peeked: None,
            col: 0..0,
        };
        match parse.peek() {
            None => Ok(Command::Nop),
            Some(Token::Mod(m)) => {
                if first_pre_sep.is_none() {
                    let col = tokens.first().map(|(c, _)| c.clone()).unwrap_or(0..0);
                    return Err(error!(NeedPreSep, ..&col; &m.to_string()));
                }
                parse.modifier()
            }
            Some(Token::PreSep) => {
                parse.next();
                Err(error!(PlacePreSep, ..&parse.col))
            }
            Some(_) => parse.commands(),
        }
    }

    fn next(&mut self) -> Option<&'a Token> {
        let (col, token) = match self.peeked.take() {
            Some(p) => p,
            None => self.token_stream.next()?,
        };
        self.col = col.clone();
        Some(token)
    }

    fn peek(&mut self) -> Option<&'a Token> {
        if self.peeked.is_none() {
            self.peeked = self.token_stream.next();
        }
        self.peeked.map(|(_, t)| t)
    }

    fn at_end(&mut self) -> bool {
        matches!(
            self.peek(),
            None | Some(Token::SubSep) | Some(Token::PreSep)
        )
    }

    fn modifier(&mut self) -> Result<Command> {
        let m = match self.next() {
            Some(Token::Mod(m)) => *m,
            _ => return Err(error!(NoModHere, ..&self.col)),
        };
        let mod_col = self.col.clone();
        let mut args = Vec::with_capacity(m.arity());
        for _ in 0..m.arity() {
            if self.at_end() {
                return Err(error!(NeedParams, ..&mod_col; &m.to_string()));
            }
            args.push(self.expression()?);
        }
        match self.next() {
            Some(Token::PreSep) => {}
            Some(Token::Mod(_)) => return Err(error!(NoModHere, ..&self.col)),
            _ => return Err(error!(ExtraParams, ..&self.col)),
        }
        let body = self.commands()?;
        let immediate = |c: &Command| match c {
            Command::Op(op, _) | Command::Set(op, _, _) => !op.deferrable(),
            _ => false,
        };
        if m.defers() && body.any(&immediate) {
            return Err(error!(NotDeferrable, ..&mod_col; &m.to_string()));
        }
        Ok(Command::Mod(m, args, Rc::new(body)))
    }

    fn commands(&mut self) -> Result<Command> {
        let mut v: Vec<Command> = vec![];
        loop {
            match self.peek() {
                None => break,
                Some(Token::SubSep) => {
                    self.next();
                }
                Some(_) => v.push(self.command()?),
            }
        }
        Ok(match v.len() {
            0 => Command::Nop,
            1 => v.remove(0),
            _ => Command::Seq(v),
        })
    }

    fn command(&mut self) -> Result<Command> {
        let command = match self.peek() {
            Some(Token::Op(op)) if op.settable() => {
                let op = *op;
                self.next();
                let op_col = self.col.clone();
                let args = self.operands(op, &op_col)?;
                if self.at_end() {
                    Command::Op(op, args)
                } else {
                    Command::Set(op, args, Box::new(self.expression()?))
                }
            }
            Some(Token::Var(var)) => {
                let var = *var;
                self.next();
                let var_col = self.col.clone();
                if self.at_end() {
                    Command::Var(var)
                } else if var.is_read_only() {
                    return Err(error!(ReadOnly, ..&var_col; &var.to_string()));
                } else {
                    Command::Store(var, Box::new(self.expression()?))
                }
            }
            _ => self.expression()?,
        };
        match self.next() {
            None | Some(Token::SubSep) => Ok(command),
            Some(Token::PreSep) => Err(error!(PlacePreSep, ..&self.col)),
            Some(Token::Mod(_)) => Err(error!(NoModHere, ..&self.col)),
            Some(_) => Err(error!(ExtraParams, ..&self.col)),
        }
    }

    fn operands(&mut self, op: Op, op_col: &Column) -> Result<Vec<Command>> {
        let mut args = Vec::with_capacity(op.arity());
        for _ in 0..op.arity() {
            if self.at_end() {
                return Err(error!(NeedParams, ..op_col; &op.to_string()));
            }
            args.push(self.expression()?);
        }
        Ok(args)
    }

    fn expression(&mut self) -> Result<Command> {
        match self.next() {
            Some(Token::Literal(l)) => match l.value() {
                Ok(n) => Ok(Command::Literal(n)),
                Err(e) => Err(e.in_column(&self.col)),
            },
            Some(Token::Var(v)) => Ok(Command::Var(*v)),
            Some(Token::Op(op)) => {
                let op = *op;
                let op_col = self.col.clone();
                Ok(Command::Op(op, self.operands(op, &op_col)?))
            }
            Some(Token::Unknown(s)) => Err(error!(UnknownOperator, ..&self.col; s)),
            Some(Token::Mod(_)) => Err(error!(NoModHere, ..&self.col)),
            Some(Token::PreSep) => Err(error!(PlacePreSep, ..&self.col)),
            Some(Token::SubSep) | None => Err(error!(NeedParams, ..&self.col)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lang::{lex, ErrorCode, Mod};

    fn parse_str(s: &str) -> Result<Command> {
        parse(&lex(s))
    }

    #[test]
    fn test_nested_operands() {
        assert_eq!(
            parse_str("ADD 1 MUL 2 3"),
            Ok(Command::Op(
                Op::Add,
                vec![
                    Command::Literal(1),
                    Command::Op(Op::Mul, vec![Command::Literal(2), Command::Literal(3)])
                ]
            ))
        );
    }

    #[test]
    fn test_setter_takes_one_more() {
        assert_eq!(
            parse_str("CV 1 N 12"),
            Ok(Command::Set(
                Op::Cv,
                vec![Command::Literal(1)],
                Box::new(Command::Op(Op::N, vec![Command::Literal(12)]))
            ))
        );
        assert_eq!(
            parse_str("CV 1"),
            Ok(Command::Op(Op::Cv, vec![Command::Literal(1)]))
        );
    }

    #[test]
    fn test_modifier_body() {
        let cmd = parse_str("IF A: TR.P 1").unwrap();
        match cmd {
            Command::Mod(Mod::If, args, body) => {
                assert_eq!(args.len(), 1);
                assert_eq!(*body, Command::Op(Op::TrPulse, vec![Command::Literal(1)]));
            }
            other => panic!("{:?}", other),
        }
    }

    #[test]
    fn test_error_codes() {
        let code = |s| parse_str(s).unwrap_err().code();
        assert_eq!(code("ADD 1"), ErrorCode::NeedParams);
        assert_eq!(code("ADD 1 2 3"), ErrorCode::ExtraParams);
        assert_eq!(code("FOO 1"), ErrorCode::UnknownOperator);
        assert_eq!(code("IF 1 CV 1 2"), ErrorCode::NeedPreSep);
        assert_eq!(code("IF 1: IF 2: A 1"), ErrorCode::ManyPreSep);
        assert_eq!(code("CV 1 2: A 1"), ErrorCode::PlacePreSep);
        assert_eq!(code("A 1; IF 1"), ErrorCode::NoModHere);
        assert_eq!(code("IN 3"), ErrorCode::ReadOnly);
        assert_eq!(code("DEL 10: BREAK"), ErrorCode::NotDeferrable);
        assert_eq!(code("A 99999"), ErrorCode::Overflow);
    }

    #[test]
    fn test_error_column() {
        let e = parse_str("CV 1 ADD 2").unwrap_err();
        assert_eq!(e.code(), ErrorCode::NeedParams);
        assert_eq!(e.column(), 5..8);
    }
}
