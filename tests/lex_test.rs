use teletype::lang::{lex, Literal, Mod, Op, Special, Token, Var};

fn tokens(s: &str) -> Vec<Token> {
    lex(s).into_iter().map(|(_, t)| t).collect()
}

fn decimal(s: &str) -> Token {
    Token::Literal(Literal::Decimal(s.to_string()))
}

#[test]
fn test_prefix_line() {
    assert_eq!(
        tokens("cv 1 v 5"),
        vec![Token::Op(Op::Cv), decimal("1"), Token::Op(Op::V), decimal("5")]
    );
}

#[test]
fn test_separators() {
    assert_eq!(
        tokens("IF A: B 1;C 2"),
        vec![
            Token::Mod(Mod::If),
            Token::Var(Var::Global(0)),
            Token::PreSep,
            Token::Var(Var::Global(1)),
            decimal("1"),
            Token::SubSep,
            Token::Var(Var::Global(2)),
            decimal("2"),
        ]
    );
}

#[test]
fn test_comment() {
    assert_eq!(tokens("A 1 // RESET"), vec![Token::Var(Var::Global(0)), decimal("1")]);
    assert_eq!(tokens("A 1//X"), vec![Token::Var(Var::Global(0)), decimal("1")]);
    assert!(tokens("// ALL COMMENT").is_empty());
}

#[test]
fn test_columns() {
    let cols: Vec<_> = lex("TR.P  12").into_iter().map(|(c, _)| c).collect();
    assert_eq!(cols, vec![0..4, 6..8]);
}

#[test]
fn test_names() {
    assert_eq!(tokens("N"), vec![Token::Op(Op::N)]);
    assert_eq!(tokens("$N"), vec![Token::Var(Var::Global(13))]);
    assert_eq!(tokens("I"), vec![Token::Var(Var::Local)]);
    assert_eq!(tokens("#2"), vec![Token::Var(Var::Pattern(2))]);
    assert_eq!(tokens("PARAM"), vec![Token::Var(Var::Special(Special::Param))]);
    assert_eq!(tokens("EV"), vec![Token::Mod(Mod::Every)]);
    assert_eq!(tokens("+"), vec![Token::Op(Op::Add)]);
    assert_eq!(tokens("FOO"), vec![Token::Unknown("FOO".to_string())]);
}

#[test]
fn test_literals() {
    assert_eq!(tokens("-12"), vec![decimal("-12")]);
    assert_eq!(
        tokens("X1F B101"),
        vec![
            Token::Literal(Literal::Hex("X1F".to_string())),
            Token::Literal(Literal::Binary("B101".to_string())),
        ]
    );
    assert_eq!(tokens("B"), vec![Token::Var(Var::Global(1))]);
}
