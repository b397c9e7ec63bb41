use super::*;

impl<'a> Parser<'a> {
    /// Parses statements until `terminator` (which is not consumed) or the end of input.
    ///
    /// This is the only place where parsing recovers from an error: a token that cannot start a
    /// statement is reported and skipped. Illegal tokens are still fatal.
    pub(crate) fn parse_stmt_list(&mut self, terminator: TokenKind) -> ParseResult<Vec<Stmt>> {
        let mut body = Vec::new();
        while !self.at(terminator) && !self.at(TokenKind::Eof) {
            if self.at_stmt_start() {
                body.push(self.parse_stmt()?);
            } else if self.at(TokenKind::Illegal) {
                return Err(self.unexpected("statement"));
            } else {
                self.skip_unexpected();
            }
        }
        Ok(body)
    }

    fn at_stmt_start(&self) -> bool {
        self.at_var_decl_start()
            || self.at_expr_start()
            || matches!(
                self.current_token.kind,
                TokenKind::OpenBrace
                    | TokenKind::Semi
                    | TokenKind::If
                    | TokenKind::While
                    | TokenKind::For
                    | TokenKind::Fn
                    | TokenKind::Return
                    | TokenKind::Class
            )
    }

    /// A declaration starts with a non-void primitive type, or with two identifiers (`Counter c`).
    fn at_var_decl_start(&self) -> bool {
        match self.current_token.kind {
            TokenKind::Void => false,
            TokenKind::Identifier => self.peek_token.kind == TokenKind::Identifier,
            kind => kind.primitive_type().is_some(),
        }
    }

    /// Parses a single statement.
    pub fn parse_stmt(&mut self) -> ParseResult<Stmt> {
        if self.at_var_decl_start() {
            return Ok(Stmt::VarDecl(self.parse_var_decl()?));
        }
        match self.current_token.kind {
            TokenKind::OpenBrace => self.parse_block_stmt(),
            TokenKind::Semi => {
                self.next();
                Ok(Stmt::Block(Vec::new()))
            }
            TokenKind::If => self.parse_if_stmt(),
            TokenKind::While => self.parse_while_stmt(),
            TokenKind::For => self.parse_for_stmt(),
            TokenKind::Fn => Ok(Stmt::FnDecl(self.parse_fn_decl()?)),
            TokenKind::Return => self.parse_return_stmt(),
            TokenKind::Class => self.parse_class_decl(),
            _ if self.at_expr_start() => {
                // expression statement
                let stmt = self.parse_simple_stmt()?;
                self.expect(TokenKind::Semi)?;
                Ok(stmt)
            }
            _ => Err(self.unexpected("statement")),
        }
    }

    pub fn parse_block_stmt(&mut self) -> ParseResult<Stmt> {
        self.expect(TokenKind::OpenBrace)?;
        let body = self.parse_stmt_list(TokenKind::CloseBrace)?;
        self.expect(TokenKind::CloseBrace)?;
        Ok(Stmt::Block(body))
    }

    /// Parses `type name [= expr];`.
    fn parse_var_decl(&mut self) -> ParseResult<VarDecl> {
        let ty = self.parse_type_name()?;
        let name = self.expect_identifier()?;
        let initializer = if self.eat(TokenKind::Equals) {
            Some(self.parse_expr()?)
        } else {
            None
        };
        self.expect(TokenKind::Semi)?;
        Ok(VarDecl {
            name,
            ty,
            initializer,
        })
    }

    /// Parses an expression, turning it into an assignment if followed by `=`. Does not consume `;`.
    fn parse_simple_stmt(&mut self) -> ParseResult<Stmt> {
        let expr = self.parse_expr()?;
        if !self.at(TokenKind::Equals) {
            return Ok(Stmt::Expr(expr));
        }

        let equals = self.next();
        if !expr.is_assignable() {
            return Err(ParseError::InvalidAssignTarget {
                line: equals.line,
                column: equals.column,
            });
        }
        let value = self.parse_expr()?;
        Ok(Stmt::Assign {
            target: expr,
            value,
        })
    }

    fn parse_if_stmt(&mut self) -> ParseResult<Stmt> {
        self.expect(TokenKind::If)?;
        self.expect(TokenKind::OpenParen)?;
        let condition = self.parse_expr()?;
        self.expect(TokenKind::CloseParen)?;
        let then_branch = Box::new(self.parse_stmt()?);
        let else_branch = if self.eat(TokenKind::Else) {
            Some(Box::new(self.parse_stmt()?))
        } else {
            None
        };
        Ok(Stmt::If {
            condition,
            then_branch,
            else_branch,
        })
    }

    fn parse_while_stmt(&mut self) -> ParseResult<Stmt> {
        self.expect(TokenKind::While)?;
        self.expect(TokenKind::OpenParen)?;
        let condition = self.parse_expr()?;
        self.expect(TokenKind::CloseParen)?;
        let body = Box::new(self.parse_stmt()?);
        Ok(Stmt::While { condition, body })
    }

    /// Parses `for ([init]; [cond]; [step]) stmt`.
    fn parse_for_stmt(&mut self) -> ParseResult<Stmt> {
        self.expect(TokenKind::For)?;
        self.expect(TokenKind::OpenParen)?;

        let init = if self.eat(TokenKind::Semi) {
            None
        } else if self.at_var_decl_start() {
            // a declaration consumes its own `;`
            Some(Box::new(Stmt::VarDecl(self.parse_var_decl()?)))
        } else {
            let init = self.parse_simple_stmt()?;
            self.expect(TokenKind::Semi)?;
            Some(Box::new(init))
        };

        let condition = if self.at(TokenKind::Semi) {
            None
        } else {
            Some(self.parse_expr()?)
        };
        self.expect(TokenKind::Semi)?;

        let step = if self.at(TokenKind::CloseParen) {
            None
        } else {
            Some(Box::new(self.parse_simple_stmt()?))
        };
        self.expect(TokenKind::CloseParen)?;

        let body = Box::new(self.parse_stmt()?);
        Ok(Stmt::For {
            init,
            condition,
            step,
            body,
        })
    }

    /// Parses `fn name(type param, ...): type stmt`.
    fn parse_fn_decl(&mut self) -> ParseResult<FnDecl> {
        self.expect(TokenKind::Fn)?;
        let name = self.expect_identifier()?;
        let params = self.parse_params()?;
        self.expect(TokenKind::Colon)?;
        let return_ty = self.parse_type_name()?;
        let body = Box::new(self.parse_stmt()?);
        Ok(FnDecl {
            name,
            return_ty,
            params,
            body,
        })
    }

    fn parse_params(&mut self) -> ParseResult<Vec<Param>> {
        self.expect(TokenKind::OpenParen)?;
        let mut params = Vec::new();
        if !self.eat(TokenKind::CloseParen) {
            loop {
                let ty = self.parse_type_name()?;
                let name = self.expect_identifier()?;
                params.push(Param { name, ty });

                if self.eat(TokenKind::CloseParen) {
                    break;
                }
                if !self.eat(TokenKind::Comma) {
                    return Err(self.unexpected("`,` or `)`"));
                }
            }
        }
        Ok(params)
    }

    fn parse_return_stmt(&mut self) -> ParseResult<Stmt> {
        self.expect(TokenKind::Return)?;
        if self.eat(TokenKind::Semi) {
            return Ok(Stmt::Return(None));
        }
        let expr = self.parse_expr()?;
        self.expect(TokenKind::Semi)?;
        Ok(Stmt::Return(Some(expr)))
    }

    /* Statements.Class */
    /// Parses `class Name { member* }`.
    fn parse_class_decl(&mut self) -> ParseResult<Stmt> {
        self.expect(TokenKind::Class)?;
        let name = self.expect_identifier()?;
        self.expect(TokenKind::OpenBrace)?;

        let mut members = Vec::new();
        while !self.eat(TokenKind::CloseBrace) {
            members.push(self.parse_class_member()?);
        }

        Ok(Stmt::ClassDecl(ClassDecl { name, members }))
    }

    fn parse_class_member(&mut self) -> ParseResult<ClassMember> {
        match self.current_token.kind {
            TokenKind::Prop => {
                self.next();
                let ty = self.parse_type_name()?;
                let name = self.expect_identifier()?;
                self.expect(TokenKind::Semi)?;
                Ok(ClassMember::Prop(PropDecl { name, ty }))
            }
            TokenKind::Init => {
                self.next();
                let params = self.parse_params()?;
                let body = Box::new(self.parse_block_stmt()?);
                Ok(ClassMember::Method(FnDecl {
                    name: "init".to_string(),
                    return_ty: "void".to_string(),
                    params,
                    body,
                }))
            }
            TokenKind::Fn => Ok(ClassMember::Method(self.parse_fn_decl()?)),
            _ => Err(self.unexpected("`prop`, `init` or `fn`")),
        }
    }
}
