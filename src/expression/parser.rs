use crate::expression::ast::{BinaryOp, Callee, Expr, LogicalOp, Place, Script, UnaryOp};
use crate::expression::lexer::{ExprError, Span, Token, TokenKind, lex};

/// Deepest nesting of groups, calls, prefix operators, `**`, `?:`, and
/// assignments, plus links in a single binary chain, that a program may use.
pub(crate) const MAX_DEPTH: usize = 128;

/// Parse a `;`-separated program. The caller translates `\` separators first.
pub(crate) fn parse_script(src: &str) -> Result<Script, ExprError> {
    let tokens = lex(src)?;
    let mut p = Parser {
        tokens,
        pos: 0,
        depth: 0,
    };

    let mut statements = Vec::new();
    // True while the most recent statement slot is empty (start, or after `;`).
    let mut tail_empty = true;
    while p.peek().kind != TokenKind::Eof {
        if p.consume(TokenKind::Semi) {
            tail_empty = true;
            continue;
        }
        statements.push(p.parse_sequence()?);
        tail_empty = false;
        if p.consume(TokenKind::Semi) {
            tail_empty = true;
        } else {
            p.expect(TokenKind::Eof)?;
        }
    }

    if tail_empty {
        return Err(ExprError::new(
            src.len(),
            "program has no final expression to return",
        ));
    }
    Ok(Script { statements })
}

/// Parse a single expression (commas allowed, no statements).
#[cfg(test)]
pub(crate) fn parse_expr(src: &str) -> Result<Expr, ExprError> {
    let tokens = lex(src)?;
    let mut p = Parser {
        tokens,
        pos: 0,
        depth: 0,
    };
    let e = p.parse_sequence()?;
    p.expect(TokenKind::Eof)?;
    Ok(e)
}

struct Parser {
    tokens: Vec<Token>,
    pos: usize,
    depth: usize,
}

impl Parser {
    fn peek(&self) -> &Token {
        &self.tokens[self.pos]
    }

    fn bump(&mut self) -> &Token {
        let t = &self.tokens[self.pos];
        // Eof is always last; never step past it.
        if self.pos + 1 < self.tokens.len() {
            self.pos += 1;
        }
        t
    }

    fn span(&self) -> Span {
        self.peek().span
    }

    fn expect(&mut self, kind: TokenKind) -> Result<(), ExprError> {
        if self.peek().kind == kind {
            self.bump();
            Ok(())
        } else {
            Err(ExprError::new(
                self.span().start,
                format!("expected {kind:?}, found {:?}", self.peek().kind),
            ))
        }
    }

    /// Enter one nesting level. An error leaves the counter raised and ends the parse.
    fn descend(&mut self) -> Result<(), ExprError> {
        if self.depth >= MAX_DEPTH {
            return Err(ExprError::new(
                self.span().start,
                "expression nested too deeply",
            ));
        }
        self.depth += 1;
        Ok(())
    }

    fn ascend(&mut self, levels: usize) {
        self.depth -= levels;
    }

    fn consume(&mut self, kind: TokenKind) -> bool {
        if self.peek().kind == kind {
            self.bump();
            true
        } else {
            false
        }
    }

    fn parse_sequence(&mut self) -> Result<Expr, ExprError> {
        let first = self.parse_assignment()?;
        if self.peek().kind != TokenKind::Comma {
            return Ok(first);
        }
        let mut items = vec![first];
        while self.consume(TokenKind::Comma) {
            items.push(self.parse_assignment()?);
        }
        Ok(Expr::Sequence(items))
    }

    fn parse_assignment(&mut self) -> Result<Expr, ExprError> {
        self.descend()?;
        let e = self.parse_assignment_inner()?;
        self.ascend(1);
        Ok(e)
    }

    fn parse_assignment_inner(&mut self) -> Result<Expr, ExprError> {
        let start = self.span().start;
        let lhs = self.parse_conditional()?;

        let op = match self.peek().kind {
            TokenKind::Assign => None,
            TokenKind::PlusAssign => Some(BinaryOp::Add),
            TokenKind::MinusAssign => Some(BinaryOp::Sub),
            TokenKind::StarAssign => Some(BinaryOp::Mul),
            TokenKind::StarStarAssign => Some(BinaryOp::Pow),
            TokenKind::SlashAssign => Some(BinaryOp::Div),
            TokenKind::PercentAssign => Some(BinaryOp::Mod),
            TokenKind::ShlAssign => Some(BinaryOp::Shl),
            TokenKind::ShrAssign => Some(BinaryOp::Shr),
            TokenKind::UShrAssign => Some(BinaryOp::UShr),
            TokenKind::AmpAssign => Some(BinaryOp::BitAnd),
            TokenKind::PipeAssign => Some(BinaryOp::BitOr),
            TokenKind::CaretAssign => Some(BinaryOp::BitXor),
            _ => return Ok(lhs),
        };
        self.bump();

        let target = into_place(lhs, start)?;
        // Right-associative: `a = b = c`.
        let value = self.parse_assignment()?;
        Ok(Expr::Assign {
            target,
            op,
            value: Box::new(value),
        })
    }

    fn parse_conditional(&mut self) -> Result<Expr, ExprError> {
        let test = self.parse_or()?;
        if !self.consume(TokenKind::Question) {
            return Ok(test);
        }
        let then = self.parse_assignment()?;
        self.expect(TokenKind::Colon)?;
        let otherwise = self.parse_assignment()?;
        Ok(Expr::Conditional {
            test: Box::new(test),
            then: Box::new(then),
            otherwise: Box::new(otherwise),
        })
    }

    fn parse_or(&mut self) -> Result<Expr, ExprError> {
        let mut e = self.parse_and()?;
        let mut links = 0;
        while self.consume(TokenKind::OrOr) {
            self.descend()?;
            links += 1;
            let r = self.parse_and()?;
            e = Expr::Logical {
                op: LogicalOp::Or,
                left: Box::new(e),
                right: Box::new(r),
            };
        }
        self.ascend(links);
        Ok(e)
    }

    fn parse_and(&mut self) -> Result<Expr, ExprError> {
        let mut e = self.parse_bit_or()?;
        let mut links = 0;
        while self.consume(TokenKind::AndAnd) {
            self.descend()?;
            links += 1;
            let r = self.parse_bit_or()?;
            e = Expr::Logical {
                op: LogicalOp::And,
                left: Box::new(e),
                right: Box::new(r),
            };
        }
        self.ascend(links);
        Ok(e)
    }

    fn parse_bit_or(&mut self) -> Result<Expr, ExprError> {
        self.parse_left_assoc(Self::parse_bit_xor, |k| match k {
            TokenKind::Pipe => Some(BinaryOp::BitOr),
            _ => None,
        })
    }

    fn parse_bit_xor(&mut self) -> Result<Expr, ExprError> {
        self.parse_left_assoc(Self::parse_bit_and, |k| match k {
            TokenKind::Caret => Some(BinaryOp::BitXor),
            _ => None,
        })
    }

    fn parse_bit_and(&mut self) -> Result<Expr, ExprError> {
        self.parse_left_assoc(Self::parse_equality, |k| match k {
            TokenKind::Amp => Some(BinaryOp::BitAnd),
            _ => None,
        })
    }

    fn parse_equality(&mut self) -> Result<Expr, ExprError> {
        // Every value is a number, so strict and loose equality agree.
        self.parse_left_assoc(Self::parse_relational, |k| match k {
            TokenKind::EqEq | TokenKind::EqEqEq => Some(BinaryOp::Eq),
            TokenKind::Ne | TokenKind::NeEq => Some(BinaryOp::Ne),
            _ => None,
        })
    }

    fn parse_relational(&mut self) -> Result<Expr, ExprError> {
        self.parse_left_assoc(Self::parse_shift, |k| match k {
            TokenKind::Lt => Some(BinaryOp::Lt),
            TokenKind::Le => Some(BinaryOp::Le),
            TokenKind::Gt => Some(BinaryOp::Gt),
            TokenKind::Ge => Some(BinaryOp::Ge),
            _ => None,
        })
    }

    fn parse_shift(&mut self) -> Result<Expr, ExprError> {
        self.parse_left_assoc(Self::parse_additive, |k| match k {
            TokenKind::Shl => Some(BinaryOp::Shl),
            TokenKind::Shr => Some(BinaryOp::Shr),
            TokenKind::UShr => Some(BinaryOp::UShr),
            _ => None,
        })
    }

    fn parse_additive(&mut self) -> Result<Expr, ExprError> {
        self.parse_left_assoc(Self::parse_multiplicative, |k| match k {
            TokenKind::Plus => Some(BinaryOp::Add),
            TokenKind::Minus => Some(BinaryOp::Sub),
            _ => None,
        })
    }

    fn parse_multiplicative(&mut self) -> Result<Expr, ExprError> {
        self.parse_left_assoc(Self::parse_exponent, |k| match k {
            TokenKind::Star => Some(BinaryOp::Mul),
            TokenKind::Slash => Some(BinaryOp::Div),
            TokenKind::Percent => Some(BinaryOp::Mod),
            _ => None,
        })
    }

    fn parse_left_assoc(
        &mut self,
        next: fn(&mut Self) -> Result<Expr, ExprError>,
        op_for: fn(&TokenKind) -> Option<BinaryOp>,
    ) -> Result<Expr, ExprError> {
        let mut e = next(self)?;
        // Each link deepens the left-leaning tree the later passes walk.
        let mut links = 0;
        while let Some(op) = op_for(&self.peek().kind) {
            self.descend()?;
            links += 1;
            self.bump();
            let r = next(self)?;
            e = Expr::Binary {
                op,
                left: Box::new(e),
                right: Box::new(r),
            };
        }
        self.ascend(links);
        Ok(e)
    }

    fn parse_exponent(&mut self) -> Result<Expr, ExprError> {
        let start = self.span().start;
        let unary_base = matches!(
            self.peek().kind,
            TokenKind::Minus | TokenKind::Plus | TokenKind::Bang | TokenKind::Tilde
        );
        let base = self.parse_unary()?;
        if self.peek().kind != TokenKind::StarStar {
            return Ok(base);
        }
        if unary_base {
            return Err(ExprError::new(
                start,
                "unary operator before '**' must be parenthesized",
            ));
        }
        self.bump();
        self.descend()?;
        let exponent = self.parse_exponent()?;
        self.ascend(1);
        Ok(Expr::Binary {
            op: BinaryOp::Pow,
            left: Box::new(base),
            right: Box::new(exponent),
        })
    }

    fn parse_unary(&mut self) -> Result<Expr, ExprError> {
        let op = match self.peek().kind {
            TokenKind::Minus => Some(UnaryOp::Neg),
            TokenKind::Plus => Some(UnaryOp::Plus),
            TokenKind::Bang => Some(UnaryOp::Not),
            TokenKind::Tilde => Some(UnaryOp::BitNot),
            _ => None,
        };
        if let Some(op) = op {
            self.bump();
            self.descend()?;
            let e = self.parse_unary()?;
            self.ascend(1);
            return Ok(Expr::Unary {
                op,
                expr: Box::new(e),
            });
        }

        let delta = match self.peek().kind {
            TokenKind::PlusPlus => Some(1.0),
            TokenKind::MinusMinus => Some(-1.0),
            _ => None,
        };
        if let Some(delta) = delta {
            self.bump();
            let start = self.span().start;
            self.descend()?;
            let operand = self.parse_unary()?;
            self.ascend(1);
            return Ok(Expr::Update {
                target: into_place(operand, start)?,
                delta,
                prefix: true,
            });
        }

        self.parse_postfix()
    }

    fn parse_postfix(&mut self) -> Result<Expr, ExprError> {
        let start = self.span().start;
        let e = self.parse_call_member()?;
        let delta = match self.peek().kind {
            TokenKind::PlusPlus => 1.0,
            TokenKind::MinusMinus => -1.0,
            _ => return Ok(e),
        };
        self.bump();
        Ok(Expr::Update {
            target: into_place(e, start)?,
            delta,
            prefix: false,
        })
    }

    fn parse_call_member(&mut self) -> Result<Expr, ExprError> {
        let start = self.span().start;
        let mut e = self.parse_primary()?;

        loop {
            if self.consume(TokenKind::Dot) {
                let t = self.bump().clone();
                let name = match t.kind {
                    TokenKind::Ident(s) => s,
                    other => {
                        return Err(ExprError::new(
                            t.span.start,
                            format!("expected ident after '.', found {other:?}"),
                        ));
                    }
                };
                e = append_path(e, name, start)?;
                continue;
            }

            if self.peek().kind == TokenKind::LParen {
                let paren = self.span().start;
                self.bump();
                let args = self.parse_args()?;
                let callee = match e {
                    Expr::Path { segments, .. } => Callee::Path(segments),
                    _ => {
                        return Err(ExprError::new(
                            paren,
                            "call target must be a function name",
                        ));
                    }
                };
                e = Expr::Call {
                    callee,
                    args,
                    offset: start,
                };
                continue;
            }

            break;
        }

        Ok(e)
    }

    fn parse_args(&mut self) -> Result<Vec<Expr>, ExprError> {
        let mut args = Vec::new();
        if self.consume(TokenKind::RParen) {
            return Ok(args);
        }
        loop {
            args.push(self.parse_assignment()?);
            if self.consume(TokenKind::Comma) {
                continue;
            }
            self.expect(TokenKind::RParen)?;
            return Ok(args);
        }
    }

    fn parse_primary(&mut self) -> Result<Expr, ExprError> {
        let t = self.bump().clone();
        match t.kind {
            TokenKind::Number(v) => Ok(Expr::Lit(v)),
            TokenKind::True => Ok(Expr::Lit(1.0)),
            TokenKind::False => Ok(Expr::Lit(0.0)),
            TokenKind::Ident(s) => Ok(Expr::Path {
                segments: vec![s],
                offset: t.span.start,
            }),
            TokenKind::LParen => {
                let e = self.parse_sequence()?;
                self.expect(TokenKind::RParen)?;
                Ok(e)
            }
            TokenKind::Eof => Err(ExprError::new(
                t.span.start,
                "unexpected end of expression",
            )),
            other => Err(ExprError::new(
                t.span.start,
                format!("unexpected token {other:?}"),
            )),
        }
    }
}

fn append_path(base: Expr, segment: String, offset: usize) -> Result<Expr, ExprError> {
    match base {
        Expr::Path {
            mut segments,
            offset,
        } => {
            segments.push(segment);
            Ok(Expr::Path { segments, offset })
        }
        _ => Err(ExprError::new(
            offset,
            "member access base must be an identifier path",
        )),
    }
}

fn into_place(e: Expr, offset: usize) -> Result<Place, ExprError> {
    match e {
        Expr::Path { segments, offset } => Ok(Place::Path { segments, offset }),
        _ => Err(ExprError::new(offset, "invalid assignment target")),
    }
}

#[cfg(test)]
#[path = "../../tests/unit/expression/parser.rs"]
mod tests;
