use super::*;

/// Binding power of prefix operators. Higher than any binary operator.
const PREFIX_BP: u8 = 10;

impl<'a> Parser<'a> {
    /* Expressions */
    /// Parses any expression.
    /// This is equivalent to calling [`Self::parse_expr_bp`] with `min_bp = 0`.
    pub fn parse_expr(&mut self) -> ParseResult<Expr> {
        self.parse_expr_bp(0) // 0 to accept any expression
    }

    /// Returns `true` if the current token can start an expression.
    pub(crate) fn at_expr_start(&self) -> bool {
        matches!(
            self.current_token.kind,
            TokenKind::IntLit
                | TokenKind::FloatLit
                | TokenKind::StringLit
                | TokenKind::CharLit
                | TokenKind::BoolLit
                | TokenKind::Identifier
                | TokenKind::OpenParen
                | TokenKind::TypeOf
                | TokenKind::Minus
                | TokenKind::Bang
        )
    }

    /// Parses an expression with the specified `min_bp`.
    /// To parse any expression use, [`Self::parse_expr`].
    fn parse_expr_bp(&mut self, min_bp: u8) -> ParseResult<Expr> {
        let mut lhs = self.parse_prefix_expr()?;

        loop {
            let (l_bp, r_bp) = match self.current_token.kind.binop_bp() {
                Some(bp) => bp,
                None => break, // not a valid binop, stop parsing
            };
            if l_bp < min_bp {
                break; // less than the min_bp, stop parsing
            }

            // self.current_token is a valid binop
            let op = match self.next().kind {
                TokenKind::EqualsEquals => BinaryOp::Eq,
                TokenKind::NotEquals => BinaryOp::NotEq,
                TokenKind::LessThan => BinaryOp::Less,
                TokenKind::GreaterThan => BinaryOp::Greater,
                TokenKind::LessThanEquals => BinaryOp::LessEq,
                TokenKind::GreaterThanEquals => BinaryOp::GreaterEq,
                TokenKind::Plus => BinaryOp::Add,
                TokenKind::Minus => BinaryOp::Sub,
                TokenKind::Asterisk => BinaryOp::Mul,
                _ => BinaryOp::Div,
            };

            let rhs = self.parse_expr_bp(r_bp)?;

            lhs = Expr::Binary {
                lhs: Box::new(lhs),
                op,
                rhs: Box::new(rhs),
            }
        }

        Ok(lhs)
    }

    fn parse_prefix_expr(&mut self) -> ParseResult<Expr> {
        let op = match self.current_token.kind {
            TokenKind::Minus => UnaryOp::Neg,
            TokenKind::Bang => UnaryOp::Not,
            _ => return self.parse_postfix_expr(),
        };
        self.next();

        // `-2147483648` is an `int` even though `2147483648` alone is not
        if op == UnaryOp::Neg
            && self.at(TokenKind::IntLit)
            && self.current_token.text.parse::<i64>() == Ok(-i64::from(i32::MIN))
        {
            self.next();
            return Ok(Expr::Literal(Literal::Int(i32::MIN)));
        }

        let operand = self.parse_expr_bp(PREFIX_BP)?;
        Ok(Expr::Unary {
            op,
            operand: Box::new(operand),
        })
    }

    /// Parses a primary expression followed by any number of `.member` or `.method(args)` suffixes.
    fn parse_postfix_expr(&mut self) -> ParseResult<Expr> {
        let mut expr = self.parse_primary_expr()?;

        while self.eat(TokenKind::Dot) {
            let member = self.expect_identifier()?;
            expr = if self.eat(TokenKind::OpenParen) {
                Expr::MethodCall {
                    object: Box::new(expr),
                    method: member,
                    args: self.parse_call_args()?,
                }
            } else {
                Expr::Access {
                    object: Box::new(expr),
                    member,
                }
            };
        }

        Ok(expr)
    }

    /// Parses a primary (atom) expression.
    fn parse_primary_expr(&mut self) -> ParseResult<Expr> {
        match self.current_token.kind {
            TokenKind::IntLit
            | TokenKind::FloatLit
            | TokenKind::StringLit
            | TokenKind::CharLit
            | TokenKind::BoolLit => self.parse_literal_expr().map(Expr::Literal),
            TokenKind::Identifier => self.parse_identifier_or_call_expr(),
            TokenKind::OpenParen => {
                self.next();
                let expr = self.parse_expr()?;
                self.expect(TokenKind::CloseParen)?;
                Ok(expr)
            }
            TokenKind::TypeOf => {
                self.next();
                self.expect(TokenKind::OpenParen)?;
                let expr = self.parse_expr()?;
                self.expect(TokenKind::CloseParen)?;
                Ok(Expr::TypeOf(Box::new(expr)))
            }
            _ => Err(self.unexpected("expression")),
        }
    }

    /* Expressions.Literals */
    /// Parses a literal expression.
    fn parse_literal_expr(&mut self) -> ParseResult<Literal> {
        let token = self.next();
        let text = token.text;
        let literal = match token.kind {
            TokenKind::IntLit => match text.parse() {
                Ok(value) => Literal::Int(value),
                Err(_) => {
                    return Err(ParseError::IntegerOverflow {
                        line: token.line,
                        column: token.column,
                        text: text.to_string(),
                    })
                }
            },
            // digits with at most one dot always parse
            TokenKind::FloatLit => Literal::Float(text.parse().unwrap_or_default()),
            TokenKind::StringLit => Literal::String(text[1..text.len() - 1].to_string()),
            TokenKind::CharLit => Literal::Char(text[1..].chars().next().unwrap_or_default()),
            _ => Literal::Bool(text == "true"),
        };
        Ok(literal)
    }

    /* Expressions.Identifier */
    /// Parses an identifier or a call expression.
    fn parse_identifier_or_call_expr(&mut self) -> ParseResult<Expr> {
        let ident = self.expect_identifier()?;

        if self.eat(TokenKind::OpenParen) {
            Ok(Expr::Call {
                callee: ident,
                args: self.parse_call_args()?,
            })
        } else {
            Ok(Expr::Identifier(ident))
        }
    }

    /// Parses a comma separated argument list. The opening `(` must already be consumed.
    fn parse_call_args(&mut self) -> ParseResult<Vec<Expr>> {
        let mut args = Vec::new();

        if !self.eat(TokenKind::CloseParen) {
            loop {
                args.push(self.parse_expr()?);

                if self.eat(TokenKind::CloseParen) {
                    break;
                }
                if !self.eat(TokenKind::Comma) {
                    return Err(self.unexpected("`,` or `)`"));
                }
            }
        }

        Ok(args)
    }
}
