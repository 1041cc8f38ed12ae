use super::ast::Command;
use super::error::Error;
use super::lex::lex;
use super::parse::parse;
use super::MAX_LINE_LEN;
use crate::error;
use std::rc::Rc;

/// One line of script source and its compiled form. A line that fails
/// to compile keeps its text, compiles to `Nop` and holds the error.
#[derive(Debug, PartialEq, Clone)]
pub struct Line {
    text: String,
    command: Rc<Command>,
    error: Option<Error>,
}

impl Line {
    pub fn from_str(s: &str) -> Line {
        let text = s.trim().to_ascii_uppercase();
        let compiled = Line::check(&text).and_then(|_| parse(&lex(&text)));
        match compiled {
            Ok(command) => Line {
                text,
                command: Rc::new(command),
                error: None,
            },
            Err(error) => Line {
                text,
                command: Rc::new(Command::Nop),
                error: Some(error),
            },
        }
    }

    fn check(text: &str) -> Result<(), Error> {
        if let Some(pos) = text.chars().position(|c| !(' '..='~').contains(&c)) {
            return Err(error!(InvalidCharacter, ..&(pos..pos + 1)));
        }
        if text.len() > MAX_LINE_LEN {
            return Err(error!(LineTooLong, ..&(MAX_LINE_LEN..text.len())));
        }
        Ok(())
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn command(&self) -> Rc<Command> {
        Rc::clone(&self.command)
    }

    pub fn error(&self) -> Option<&Error> {
        self.error.as_ref()
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    /// Lines that cannot be written back to a scene record.
    pub fn is_storable(&self) -> bool {
        Line::check(&self.text).is_ok()
    }
}

impl Default for Line {
    fn default() -> Line {
        Line::from_str("")
    }
}

impl std::fmt::Display for Line {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "{}", self.text)
    }
}
