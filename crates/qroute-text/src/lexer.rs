//! Lexer for the instance and solution formats.

use logos::Logos;

/// Tokens shared by both formats.
#[derive(Logos, Debug, Clone, PartialEq)]
#[logos(skip r"[ \t\r\n]+")]
pub enum Token {
    #[token("CNOT")]
    Cnot,

    #[token("SWAP")]
    Swap,

    /// `q<n>` operand of an operation line.
    #[regex(r"q[0-9]+", |lex| lex.slice()[1..].parse::<u64>().ok(), priority = 5)]
    QubitRef(u64),

    #[regex(r"[0-9]+", |lex| lex.slice().parse::<u64>().ok())]
    Integer(u64),

    /// Any other word; in operation position this is an unknown tag.
    #[regex(r"[A-Za-z_][A-Za-z0-9_]*", |lex| lex.slice().to_string())]
    Word(String),
}

impl std::fmt::Display for Token {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Token::Cnot => write!(f, "CNOT"),
            Token::Swap => write!(f, "SWAP"),
            Token::QubitRef(n) => write!(f, "q{n}"),
            Token::Integer(n) => write!(f, "{n}"),
            Token::Word(w) => write!(f, "'{w}'"),
        }
    }
}

/// A token with its byte span and one-based line number.
#[derive(Debug, Clone, PartialEq)]
pub struct SpannedToken {
    pub token: Token,
    pub span: std::ops::Range<usize>,
    pub line: usize,
}

/// Tokenize a source string.
///
/// Invalid input yields an `Err` entry carrying the line and a message; the
/// caller decides whether that is fatal.
pub fn tokenize(source: &str) -> Vec<Result<SpannedToken, (usize, String)>> {
    let mut lexer = Token::lexer(source);
    let mut tokens = Vec::new();
    let mut line = 1;
    let mut scanned = 0;

    while let Some(result) = lexer.next() {
        let span = lexer.span();
        line += source[scanned..span.start].matches('\n').count();
        scanned = span.start;

        if let Ok(token) = result {
            tokens.push(Ok(SpannedToken { token, span, line }));
        } else {
            let slice = &source[span.clone()];
            tokens.push(Err((line, format!("Invalid token: '{slice}'"))));
        }
    }

    tokens
}
