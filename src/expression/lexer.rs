/// Lex, parse, or resolve failure at a byte offset into the translated source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct ExprError {
    pub(crate) offset: usize,
    pub(crate) message: String,
}

impl ExprError {
    pub(crate) fn new(offset: usize, message: impl Into<String>) -> Self {
        Self {
            offset,
            message: message.into(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Span {
    pub(crate) start: usize,
    pub(crate) end: usize,
}

#[derive(Debug, Clone, PartialEq)]
pub(crate) struct Token {
    pub(crate) kind: TokenKind,
    pub(crate) span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub(crate) enum TokenKind {
    Ident(String),
    Number(f64),
    True,
    False,

    LParen,
    RParen,
    Comma,
    Dot,
    Semi,

    Plus,
    Minus,
    Star,
    StarStar,
    Slash,
    Percent,
    PlusPlus,
    MinusMinus,

    Bang,
    Tilde,

    Amp,
    Pipe,
    Caret,
    Shl,
    Shr,
    UShr,

    EqEq,
    EqEqEq,
    Ne,
    NeEq,
    Lt,
    Le,
    Gt,
    Ge,

    AndAnd,
    OrOr,

    Question,
    Colon,

    Assign,
    PlusAssign,
    MinusAssign,
    StarAssign,
    StarStarAssign,
    SlashAssign,
    PercentAssign,
    ShlAssign,
    ShrAssign,
    UShrAssign,
    AmpAssign,
    PipeAssign,
    CaretAssign,

    Eof,
}

/// Operators ordered longest first so the first match wins.
const OPERATORS: &[&str] = &[
    ">>>=",
    "===",
    "!==",
    "**=",
    "<<=",
    ">>=",
    ">>>",
    "**",
    "++",
    "--",
    "&&",
    "||",
    "==",
    "!=",
    "<=",
    ">=",
    "<<",
    ">>",
    "+=",
    "-=",
    "*=",
    "/=",
    "%=",
    "&=",
    "|=",
    "^=",
    "(",
    ")",
    ",",
    ".",
    ";",
    "+",
    "-",
    "*",
    "/",
    "%",
    "!",
    "~",
    "&",
    "|",
    "^",
    "<",
    ">",
    "?",
    ":",
    "=",
];

fn operator_kind(text: &str) -> Option<TokenKind> {
    let kind = match text {
        ">>>=" => TokenKind::UShrAssign,
        "===" => TokenKind::EqEqEq,
        "!==" => TokenKind::NeEq,
        "**=" => TokenKind::StarStarAssign,
        "<<=" => TokenKind::ShlAssign,
        ">>=" => TokenKind::ShrAssign,
        ">>>" => TokenKind::UShr,
        "**" => TokenKind::StarStar,
        "++" => TokenKind::PlusPlus,
        "--" => TokenKind::MinusMinus,
        "&&" => TokenKind::AndAnd,
        "||" => TokenKind::OrOr,
        "==" => TokenKind::EqEq,
        "!=" => TokenKind::Ne,
        "<=" => TokenKind::Le,
        ">=" => TokenKind::Ge,
        "<<" => TokenKind::Shl,
        ">>" => TokenKind::Shr,
        "+=" => TokenKind::PlusAssign,
        "-=" => TokenKind::MinusAssign,
        "*=" => TokenKind::StarAssign,
        "/=" => TokenKind::SlashAssign,
        "%=" => TokenKind::PercentAssign,
        "&=" => TokenKind::AmpAssign,
        "|=" => TokenKind::PipeAssign,
        "^=" => TokenKind::CaretAssign,
        "(" => TokenKind::LParen,
        ")" => TokenKind::RParen,
        "," => TokenKind::Comma,
        "." => TokenKind::Dot,
        ";" => TokenKind::Semi,
        "+" => TokenKind::Plus,
        "-" => TokenKind::Minus,
        "*" => TokenKind::Star,
        "/" => TokenKind::Slash,
        "%" => TokenKind::Percent,
        "!" => TokenKind::Bang,
        "~" => TokenKind::Tilde,
        "&" => TokenKind::Amp,
        "|" => TokenKind::Pipe,
        "^" => TokenKind::Caret,
        "<" => TokenKind::Lt,
        ">" => TokenKind::Gt,
        "?" => TokenKind::Question,
        ":" => TokenKind::Colon,
        "=" => TokenKind::Assign,
        _ => return None,
    };
    Some(kind)
}

pub(crate) fn lex(input: &str) -> Result<Vec<Token>, ExprError> {
    let mut out = Vec::new();
    let bytes = input.as_bytes();
    let mut i = 0usize;

    'outer: while i < bytes.len() {
        let c = bytes[i] as char;
        if c.is_ascii_whitespace() {
            i += 1;
            continue;
        }

        let start = i;

        // Hex integer: 0x[0-9a-fA-F]+
        if c == '0' && i + 1 < bytes.len() && matches!(bytes[i + 1], b'x' | b'X') {
            i += 2;
            let digits_start = i;
            while i < bytes.len() && bytes[i].is_ascii_hexdigit() {
                i += 1;
            }
            if digits_start == i {
                return Err(ExprError::new(start, "invalid hex literal (expected digits)"));
            }
            // Accumulate in f64 so literals wider than 64 bits stay finite.
            let v = bytes[digits_start..i].iter().fold(0.0_f64, |acc, b| {
                let digit = char::from(*b).to_digit(16).unwrap_or(0);
                acc * 16.0 + f64::from(digit)
            });
            out.push(Token {
                kind: TokenKind::Number(v),
                span: Span { start, end: i },
            });
            continue;
        }

        // Number: [0-9]+(.[0-9]*)?([eE][+-]?[0-9]+)? or .[0-9]+([eE][+-]?[0-9]+)?
        if c.is_ascii_digit() || (c == '.' && i + 1 < bytes.len() && bytes[i + 1].is_ascii_digit())
        {
            while i < bytes.len() && bytes[i].is_ascii_digit() {
                i += 1;
            }
            if i < bytes.len() && bytes[i] == b'.' {
                i += 1;
                while i < bytes.len() && bytes[i].is_ascii_digit() {
                    i += 1;
                }
            }

            // exponent
            if i < bytes.len() && matches!(bytes[i], b'e' | b'E') {
                let e_pos = i;
                i += 1;
                if i < bytes.len() && matches!(bytes[i], b'+' | b'-') {
                    i += 1;
                }
                let exp_start = i;
                while i < bytes.len() && bytes[i].is_ascii_digit() {
                    i += 1;
                }
                if exp_start == i {
                    return Err(ExprError::new(
                        e_pos,
                        "invalid number exponent (expected digits)",
                    ));
                }
            }

            if i < bytes.len() && (bytes[i].is_ascii_alphabetic() || bytes[i] == b'_') {
                return Err(ExprError::new(
                    i,
                    "identifier starts immediately after numeric literal",
                ));
            }

            let s = &input[start..i];
            let v: f64 = s
                .parse()
                .map_err(|_| ExprError::new(start, "invalid number"))?;
            out.push(Token {
                kind: TokenKind::Number(v),
                span: Span { start, end: i },
            });
            continue;
        }

        // Ident
        if c.is_ascii_alphabetic() || c == '_' || c == '$' {
            i += 1;
            while i < bytes.len() {
                let ch = bytes[i];
                if ch.is_ascii_alphanumeric() || ch == b'_' || ch == b'$' {
                    i += 1;
                } else {
                    break;
                }
            }
            let s = &input[start..i];
            let kind = match s {
                "true" => TokenKind::True,
                "false" => TokenKind::False,
                _ => TokenKind::Ident(s.to_owned()),
            };
            out.push(Token {
                kind,
                span: Span { start, end: i },
            });
            continue;
        }

        let rest = &input[i..];
        for text in OPERATORS {
            if rest.starts_with(*text)
                && let Some(kind) = operator_kind(text)
            {
                i += text.len();
                out.push(Token {
                    kind,
                    span: Span { start, end: i },
                });
                continue 'outer;
            }
        }

        let ch = rest.chars().next().unwrap_or('\u{fffd}');
        return Err(ExprError::new(
            start,
            format!("unexpected character '{ch}'"),
        ));
    }

    out.push(Token {
        kind: TokenKind::Eof,
        span: Span {
            start: input.len(),
            end: input.len(),
        },
    });

    Ok(out)
}
