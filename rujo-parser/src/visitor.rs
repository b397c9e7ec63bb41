//! Visitor pattern for AST nodes.

use crate::ast::{ClassMember, Expr, Stmt};

pub trait Visitor<'ast>: Sized {
    fn visit_expr(&mut self, expr: &'ast Expr) {
        walk_expr(self, expr);
    }
    fn visit_stmt(&mut self, stmt: &'ast Stmt) {
        walk_stmt(self, stmt);
    }
}

pub fn walk_expr<'ast>(visitor: &mut impl Visitor<'ast>, expr: &'ast Expr) {
    match expr {
        Expr::Literal(_) => {}
        Expr::Identifier(_) => {}
        Expr::Call { callee: _, args } => {
            for arg in args {
                visitor.visit_expr(arg);
            }
        }
        Expr::MethodCall {
            object,
            method: _,
            args,
        } => {
            visitor.visit_expr(object);
            for arg in args {
                visitor.visit_expr(arg);
            }
        }
        // member names are not visited, only the object
        Expr::Access { object, member: _ } => visitor.visit_expr(object),
        Expr::TypeOf(inner) => visitor.visit_expr(inner),
        Expr::Unary { op: _, operand } => visitor.visit_expr(operand),
        Expr::Binary { lhs, op: _, rhs } => {
            visitor.visit_expr(lhs);
            visitor.visit_expr(rhs);
        }
    }
}

pub fn walk_stmt<'ast>(visitor: &mut impl Visitor<'ast>, stmt: &'ast Stmt) {
    /// Iteratively visit all statements in a `Vec<Stmt>`.
    macro_rules! visit_stmt_list {
        ($visitor: expr, $body: expr) => {
            for stmt in $body {
                Visitor::visit_stmt($visitor, stmt);
            }
        };
    }

    match stmt {
        Stmt::VarDecl(decl) => {
            if let Some(initializer) = &decl.initializer {
                visitor.visit_expr(initializer);
            }
        }
        Stmt::ClassDecl(class) => {
            for member in &class.members {
                if let ClassMember::Method(method) = member {
                    visitor.visit_stmt(&method.body);
                }
            }
        }
        Stmt::FnDecl(func) => visitor.visit_stmt(&func.body),
        Stmt::Block(body) => visit_stmt_list!(visitor, body),
        Stmt::Assign { target, value } => {
            visitor.visit_expr(value);
            visitor.visit_expr(target);
        }
        Stmt::Expr(expr) => visitor.visit_expr(expr),
        Stmt::Return(value) => {
            if let Some(value) = value {
                visitor.visit_expr(value);
            }
        }
        Stmt::If {
            condition,
            then_branch,
            else_branch,
        } => {
            visitor.visit_expr(condition);
            visitor.visit_stmt(then_branch);
            if let Some(else_branch) = else_branch {
                visitor.visit_stmt(else_branch);
            }
        }
        Stmt::While { condition, body } => {
            visitor.visit_expr(condition);
            visitor.visit_stmt(body);
        }
        Stmt::For {
            init,
            condition,
            step,
            body,
        } => {
            if let Some(init) = init {
                visitor.visit_stmt(init);
            }
            if let Some(condition) = condition {
                visitor.visit_expr(condition);
            }
            if let Some(step) = step {
                visitor.visit_stmt(step);
            }
            visitor.visit_stmt(body);
        }
    }
}
