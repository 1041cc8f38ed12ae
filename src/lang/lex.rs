use super::{token::*, Column};

/// Splits one line into classified tokens. Never fails; words that are
/// not operators, modifiers, variables or literals become `Unknown`.
pub fn lex(s: &str) -> Vec<(Column, Token)> {
    ScriptLexer {
        chars: s.chars().peekable(),
        col: 0,
        remark: false,
    }
    .collect()
}

fn is_script_whitespace(c: char) -> bool {
    c == ' ' || c == '\t'
}

fn is_separator(c: char) -> bool {
    c == ':' || c == ';'
}

trait Tokenizers<'a> {
    fn chars(&mut self) -> &mut std::iter::Peekable<std::str::Chars<'a>>;
    fn advance(&mut self);

    fn whitespace(&mut self) {
        while let Some(pk) = self.chars().peek() {
            if !is_script_whitespace(*pk) {
                break;
            }
            self.chars().next();
            self.advance();
        }
    }

    fn separator(&mut self) -> Option<Token> {
        let ch = self.chars().next()?;
        self.advance();
        match ch {
            ':' => Some(Token::PreSep),
            _ => Some(Token::SubSep),
        }
    }

    fn word(&mut self) -> String {
        let mut s = String::new();
        while let Some(pk) = self.chars().peek() {
            if is_script_whitespace(*pk) || is_separator(*pk) {
                break;
            }
            s.push(pk.to_ascii_uppercase());
            self.chars().next();
            self.advance();
        }
        s
    }
}

struct ScriptLexer<'a> {
    chars: std::iter::Peekable<std::str::Chars<'a>>,
    col: usize,
    remark: bool,
}

impl<'a> Tokenizers<'a> for ScriptLexer<'a> {
    fn chars(&mut self) -> &mut std::iter::Peekable<std::str::Chars<'a>> {
        &mut self.chars
    }

    fn advance(&mut self) {
        self.col += 1;
    }
}

impl<'a> Iterator for ScriptLexer<'a> {
    type Item = (Column, Token);

    fn next(&mut self) -> Option<Self::Item> {
        if self.remark {
            return None;
        }
        self.whitespace();
        let start = self.col;
        let pk = *self.chars.peek()?;
        if is_separator(pk) {
            let token = self.separator()?;
            return Some((start..self.col, token));
        }
        let mut word = self.word();
        if let Some(pos) = word.find("//") {
            self.remark = true;
            word.truncate(pos);
            if word.is_empty() {
                return None;
            }
        }
        let col = start..start + word.chars().count();
        Some((col, classify(word)))
    }
}

fn classify(word: String) -> Token {
    if let Some(token) = Token::from_string(&word) {
        return token;
    }
    if let Some(var) = Var::from_string(&word) {
        return Token::Var(var);
    }
    if let Some(literal) = literal(&word) {
        return Token::Literal(literal);
    }
    Token::Unknown(word)
}

fn literal(word: &str) -> Option<Literal> {
    let digits = word.strip_prefix('-').unwrap_or(word);
    if !digits.is_empty() && digits.chars().all(|c| c.is_ascii_digit()) {
        return Some(Literal::Decimal(word.to_string()));
    }
    let mut chars = word.chars();
    let rest = chars.as_str().get(1..).unwrap_or("");
    match chars.next() {
        Some('X') if !rest.is_empty() && rest.chars().all(|c| c.is_ascii_hexdigit()) => {
            Some(Literal::Hex(word.to_string()))
        }
        Some('B') if !rest.is_empty() && rest.chars().all(|c| c == '0' || c == '1') => {
            Some(Literal::Binary(word.to_string()))
        }
        _ => None,
    }
}
