//! Indented tree dump of the AST, used by `--dump-ast` and by tests.

use crate::ast::*;
use std::fmt::Write;

/// Renders `program` as an indented tree, one node per line.
pub fn print_program(program: &Program) -> String {
    let mut printer = TreePrinter::default();
    printer.line("Program");
    printer.nested(|p| {
        for stmt in &program.statements {
            p.stmt(stmt);
        }
    });
    printer.out
}

#[derive(Default)]
struct TreePrinter {
    out: String,
    depth: usize,
}

impl TreePrinter {
    fn line(&mut self, text: impl AsRef<str>) {
        for _ in 0..self.depth {
            self.out.push_str("  ");
        }
        self.out.push_str(text.as_ref());
        self.out.push('\n');
    }

    fn nested(&mut self, f: impl FnOnce(&mut Self)) {
        self.depth += 1;
        f(self);
        self.depth -= 1;
    }

    /// Prints a label line with `stmt` nested under it.
    fn labeled(&mut self, label: &str, stmt: &Stmt) {
        self.line(label);
        self.nested(|p| p.stmt(stmt));
    }

    fn stmt(&mut self, stmt: &Stmt) {
        match stmt {
            Stmt::VarDecl(decl) => {
                self.line(format!("VarDecl {} {}", decl.ty, decl.name));
                if let Some(initializer) = &decl.initializer {
                    self.nested(|p| p.expr(initializer));
                }
            }
            Stmt::ClassDecl(class) => {
                self.line(format!("Class {}", class.name));
                self.nested(|p| {
                    for member in &class.members {
                        match member {
                            ClassMember::Prop(prop) => {
                                p.line(format!("Prop {} {}", prop.ty, prop.name))
                            }
                            ClassMember::Method(method) => p.fn_decl(method),
                        }
                    }
                });
            }
            Stmt::FnDecl(func) => self.fn_decl(func),
            Stmt::Block(body) => {
                self.line("Block");
                self.nested(|p| {
                    for stmt in body {
                        p.stmt(stmt);
                    }
                });
            }
            Stmt::Assign { target, value } => {
                self.line("Assign");
                self.nested(|p| {
                    p.expr(target);
                    p.expr(value);
                });
            }
            Stmt::Expr(expr) => self.expr(expr),
            Stmt::Return(value) => {
                self.line("Return");
                if let Some(value) = value {
                    self.nested(|p| p.expr(value));
                }
            }
            Stmt::If {
                condition,
                then_branch,
                else_branch,
            } => {
                self.line("If");
                self.nested(|p| {
                    p.expr(condition);
                    p.stmt(then_branch);
                    if let Some(else_branch) = else_branch {
                        p.labeled("Else", else_branch);
                    }
                });
            }
            Stmt::While { condition, body } => {
                self.line("While");
                self.nested(|p| {
                    p.expr(condition);
                    p.stmt(body);
                });
            }
            Stmt::For {
                init,
                condition,
                step,
                body,
            } => {
                self.line("For");
                self.nested(|p| {
                    if let Some(init) = init {
                        p.labeled("Init", init);
                    }
                    if let Some(condition) = condition {
                        p.line("Cond");
                        p.nested(|p| p.expr(condition));
                    }
                    if let Some(step) = step {
                        p.labeled("Step", step);
                    }
                    p.stmt(body);
                });
            }
        }
    }

    fn fn_decl(&mut self, func: &FnDecl) {
        let mut header = format!("Fn {}(", func.name);
        for (i, param) in func.params.iter().enumerate() {
            if i > 0 {
                header.push_str(", ");
            }
            let _ = write!(header, "{} {}", param.ty, param.name);
        }
        let _ = write!(header, "): {}", func.return_ty);
        self.line(header);
        self.nested(|p| p.stmt(&func.body));
    }

    fn expr(&mut self, expr: &Expr) {
        match expr {
            Expr::Literal(literal) => self.line(match literal {
                Literal::Int(value) => format!("Int {}", value),
                Literal::Float(value) => format!("Float {:?}", value),
                Literal::String(value) => format!("String {:?}", value),
                Literal::Bool(value) => format!("Bool {}", value),
                Literal::Char(value) => format!("Char {:?}", value),
            }),
            Expr::Identifier(name) => self.line(format!("Ident {}", name)),
            Expr::Call { callee, args } => {
                self.line(format!("Call {}", callee));
                self.nested(|p| {
                    for arg in args {
                        p.expr(arg);
                    }
                });
            }
            Expr::MethodCall {
                object,
                method,
                args,
            } => {
                self.line(format!("MethodCall {}", method));
                self.nested(|p| {
                    p.expr(object);
                    for arg in args {
                        p.expr(arg);
                    }
                });
            }
            Expr::Access { object, member } => {
                self.line(format!("Access {}", member));
                self.nested(|p| p.expr(object));
            }
            Expr::TypeOf(inner) => {
                self.line("TypeOf");
                self.nested(|p| p.expr(inner));
            }
            Expr::Unary { op, operand } => {
                self.line(format!("Unary {}", op.symbol()));
                self.nested(|p| p.expr(operand));
            }
            Expr::Binary { lhs, op, rhs } => {
                self.line(format!("Binary {}", op));
                self.nested(|p| {
                    p.expr(lhs);
                    p.expr(rhs);
                });
            }
        }
    }
}
