//! Abstract syntax tree produced by [`crate::parser::Parser`].

use std::fmt;

/// A whole source file.
#[derive(Debug, Clone, PartialEq)]
pub struct Program {
    pub statements: Vec<Stmt>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Literal {
    Int(i32),
    Float(f64),
    String(String),
    Bool(bool),
    Char(char),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnaryOp {
    Neg,
    Not,
}

impl UnaryOp {
    pub fn symbol(self) -> &'static str {
        match self {
            UnaryOp::Neg => "-",
            UnaryOp::Not => "!",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryOp {
    Eq,
    NotEq,
    Less,
    Greater,
    LessEq,
    GreaterEq,
    Add,
    Sub,
    Mul,
    Div,
}

impl BinaryOp {
    /// The operator as written in source, which is also its spelling in C.
    pub fn symbol(self) -> &'static str {
        match self {
            BinaryOp::Eq => "==",
            BinaryOp::NotEq => "!=",
            BinaryOp::Less => "<",
            BinaryOp::Greater => ">",
            BinaryOp::LessEq => "<=",
            BinaryOp::GreaterEq => ">=",
            BinaryOp::Add => "+",
            BinaryOp::Sub => "-",
            BinaryOp::Mul => "*",
            BinaryOp::Div => "/",
        }
    }
}

impl fmt::Display for BinaryOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    Literal(Literal),
    /// An identifier (e.g. `foo`).
    Identifier(String),
    /// A call to a free function, a built-in or a class constructor (e.g. `foo(1, 2)`).
    Call { callee: String, args: Vec<Expr> },
    /// A call through a receiver (e.g. `counter.bump()`).
    MethodCall {
        object: Box<Expr>,
        method: String,
        args: Vec<Expr>,
    },
    /// A member access (e.g. `this.x`).
    Access { object: Box<Expr>, member: String },
    /// `typeOf(expr)`
    TypeOf(Box<Expr>),
    Unary { op: UnaryOp, operand: Box<Expr> },
    /// A binary expression (e.g. `1+1`).
    Binary {
        lhs: Box<Expr>,
        op: BinaryOp,
        rhs: Box<Expr>,
    },
}

impl Expr {
    /// Returns `true` if the expression can appear on the left of `=`: an identifier or an access chain rooted at one.
    pub fn is_assignable(&self) -> bool {
        match self {
            Expr::Identifier(_) => true,
            Expr::Access { object, .. } => object.is_assignable(),
            _ => false,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Param {
    pub name: String,
    pub ty: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct VarDecl {
    pub name: String,
    pub ty: String,
    pub initializer: Option<Expr>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct FnDecl {
    pub name: String,
    pub return_ty: String,
    pub params: Vec<Param>,
    /// Usually a [`Stmt::Block`], but any single statement is accepted.
    pub body: Box<Stmt>,
}

/// A property declaration inside a class body. Properties never have an initializer.
#[derive(Debug, Clone, PartialEq)]
pub struct PropDecl {
    pub name: String,
    pub ty: String,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ClassMember {
    Prop(PropDecl),
    /// A method. The constructor is a method named `init` returning `void`.
    Method(FnDecl),
}

#[derive(Debug, Clone, PartialEq)]
pub struct ClassDecl {
    pub name: String,
    pub members: Vec<ClassMember>,
}

impl ClassDecl {
    pub fn properties(&self) -> impl Iterator<Item = &PropDecl> {
        self.members.iter().filter_map(|member| match member {
            ClassMember::Prop(prop) => Some(prop),
            ClassMember::Method(_) => None,
        })
    }

    pub fn methods(&self) -> impl Iterator<Item = &FnDecl> {
        self.members.iter().filter_map(|member| match member {
            ClassMember::Method(method) => Some(method),
            ClassMember::Prop(_) => None,
        })
    }

    /// Returns the `init` constructor if the class declares one.
    pub fn constructor(&self) -> Option<&FnDecl> {
        self.methods().find(|method| method.name == "init")
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Stmt {
    VarDecl(VarDecl),
    ClassDecl(ClassDecl),
    FnDecl(FnDecl),
    Block(Vec<Stmt>),
    /// `target = value;` where `target` is assignable.
    Assign { target: Expr, value: Expr },
    /// An expression evaluated for its side effects (e.g. `print(1);`).
    Expr(Expr),
    Return(Option<Expr>),
    If {
        condition: Expr,
        then_branch: Box<Stmt>,
        else_branch: Option<Box<Stmt>>,
    },
    While { condition: Expr, body: Box<Stmt> },
    For {
        /// A [`Stmt::VarDecl`], [`Stmt::Assign`] or [`Stmt::Expr`].
        init: Option<Box<Stmt>>,
        condition: Option<Expr>,
        /// A [`Stmt::Assign`] or [`Stmt::Expr`].
        step: Option<Box<Stmt>>,
        body: Box<Stmt>,
    },
}
