//! Name resolution pass.
//!
//! Walks the AST with a chain of [`Scope`]s and reports redeclarations and references to names
//! that were never declared. The AST is never modified.

use std::collections::{HashMap, HashSet};

use rujo_parser::ast::{ClassDecl, ClassMember, Expr, FnDecl, Program, Stmt};
use rujo_parser::visitor::{walk_expr, Visitor};
use rujo_source::{Diagnostic, Source};
use thiserror::Error;

use crate::builtins::{BUILTIN_FUNCTIONS, PRINT, PRIMITIVE_TYPES};
use crate::scope::{Scope, SymbolKind};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SemanticError {
    #[error("{kind} `{name}` redeclared in the same scope")]
    Redeclared { kind: SymbolKind, name: String },
    #[error("duplicate property `{name}` in class `{class}`")]
    DuplicateProperty { class: String, name: String },
    #[error("duplicate method `{name}` in class `{class}`")]
    DuplicateMethod { class: String, name: String },
    #[error("duplicate parameter `{name}` in function `{function}`")]
    DuplicateParameter { function: String, name: String },
    #[error("undefined variable `{name}`")]
    UndefinedVariable { name: String },
    #[error("undefined function `{name}`")]
    UndefinedFunction { name: String },
    #[error("`this` used outside of a method")]
    ThisOutsideMethod,
    #[error("{kind} `{name}` must be declared at top level")]
    NestedDeclaration { kind: SymbolKind, name: String },
    #[error("receiver of `{method}` must be a variable or a property")]
    InvalidReceiver { method: String },
    #[error("cannot determine the class of the receiver of `{method}`")]
    UnknownReceiver { method: String },
    #[error("`{method}` called on a value of type `{type_name}`, which is not a class")]
    NotAClass { type_name: String, method: String },
    #[error("class `{class}` has no method `{method}`")]
    UndefinedMethod { class: String, method: String },
    #[error("`main` must not take parameters")]
    MainWithParameters,
    #[error("undefined type `{name}`")]
    UndefinedType { name: String },
    #[error("class `{name}` contains itself")]
    RecursiveClass { name: String },
    #[error("cannot print a value of type `{type_name}`")]
    Unprintable { type_name: String },
}

/// Outcome of [`Analyzer::analyze`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Analysis {
    pub error_count: usize,
}

impl Analysis {
    pub fn is_success(&self) -> bool {
        self.error_count == 0
    }
}

/// Members of a top-level class, used to check method calls.
#[derive(Debug, Default)]
struct ClassInfo {
    /// Property name to declared type.
    properties: HashMap<String, String>,
    /// Method name to return type.
    methods: HashMap<String, String>,
}

/// Semantic analysis pass.
///
/// Scope layout:
/// * the root scope holds built-ins and every top-level function and class, declared before any
///   body is checked so that forward references resolve;
/// * loose top-level statements live in a child of the root (they become locals of the entry
///   function);
/// * function and class bodies resolve against the root directly.
pub struct Analyzer<'a> {
    classes: HashMap<String, ClassInfo>,
    errors: Vec<SemanticError>,
    source: &'a Source<'a>,
}

impl<'a> Analyzer<'a> {
    pub fn new(source: &'a Source<'a>) -> Self {
        Self {
            classes: HashMap::new(),
            errors: Vec::new(),
            source,
        }
    }

    /// All errors reported so far, in the order they were found.
    pub fn errors(&self) -> &[SemanticError] {
        &self.errors
    }

    /// Checks the whole program. Every error is also added to `source.errors`.
    pub fn analyze(&mut self, program: &Program) -> Analysis {
        let reported = self.errors.len();

        let mut root = Scope::new(None);
        for builtin in BUILTIN_FUNCTIONS {
            root.define(builtin.name, builtin.return_ty, SymbolKind::Function);
        }
        self.declare_items(&mut root, &program.statements);
        self.check_containment(&program.statements);

        let mut entry = Scope::new(Some(&root));
        for stmt in &program.statements {
            match stmt {
                Stmt::FnDecl(func) => {
                    if func.name == "main" && !func.params.is_empty() {
                        self.error(SemanticError::MainWithParameters);
                    }
                    self.check_fn(func, &root);
                }
                Stmt::ClassDecl(class) => self.check_class(class, &root),
                _ => self.check_stmt(stmt, &mut entry),
            }
        }

        let analysis = Analysis {
            error_count: self.errors.len() - reported,
        };
        log::debug!("semantic analysis found {} error(s)", analysis.error_count);
        analysis
    }

    fn error(&mut self, error: SemanticError) {
        log::trace!("semantic error: {}", error);
        self.source.errors.add_error(Diagnostic::semantic(&error));
        self.errors.push(error);
    }

    /// Defines top-level functions and classes in the root scope.
    fn declare_items(&mut self, root: &mut Scope, statements: &[Stmt]) {
        for stmt in statements {
            match stmt {
                Stmt::FnDecl(func) => {
                    if !root.define(&func.name, &func.return_ty, SymbolKind::Function) {
                        self.error(SemanticError::Redeclared {
                            kind: SymbolKind::Function,
                            name: func.name.clone(),
                        });
                    }
                }
                Stmt::ClassDecl(class) => {
                    if !root.define(&class.name, "class", SymbolKind::Class) {
                        self.error(SemanticError::Redeclared {
                            kind: SymbolKind::Class,
                            name: class.name.clone(),
                        });
                        continue;
                    }

                    let mut info = ClassInfo::default();
                    for member in &class.members {
                        match member {
                            ClassMember::Prop(prop) => {
                                info.properties
                                    .entry(prop.name.clone())
                                    .or_insert_with(|| prop.ty.clone());
                            }
                            ClassMember::Method(method) => {
                                info.methods
                                    .entry(method.name.clone())
                                    .or_insert_with(|| method.return_ty.clone());
                            }
                        }
                    }
                    self.classes.insert(class.name.clone(), info);
                }
                _ => {}
            }
        }
    }

    /// Reports every class that holds itself by value, directly or through other classes.
    fn check_containment(&mut self, statements: &[Stmt]) {
        let mut reported = HashSet::new();
        for stmt in statements {
            if let Stmt::ClassDecl(class) = stmt {
                if !reported.insert(class.name.as_str()) {
                    continue;
                }
                if self.contains(&class.name, &class.name, &mut HashSet::new()) {
                    self.error(SemanticError::RecursiveClass {
                        name: class.name.clone(),
                    });
                }
            }
        }
    }

    /// Returns `true` if a value of class `outer` holds a `target` somewhere inside it.
    fn contains(&self, outer: &str, target: &str, seen: &mut HashSet<String>) -> bool {
        let info = match self.classes.get(outer) {
            Some(info) => info,
            None => return false,
        };
        info.properties.values().any(|ty| {
            ty == target || (seen.insert(ty.clone()) && self.contains(ty, target, seen))
        })
    }

    /// Checks that `ty` names a primitive type or a top-level class.
    fn check_type(&mut self, ty: &str) {
        if !PRIMITIVE_TYPES.contains(&ty) && !self.classes.contains_key(ty) {
            self.error(SemanticError::UndefinedType {
                name: ty.to_string(),
            });
        }
    }

    fn check_class(&mut self, class: &ClassDecl, parent: &Scope) {
        let mut scope = Scope::new(Some(parent));
        scope.define("this", &class.name, SymbolKind::Variable);

        // Members are visible to every method regardless of declaration order.
        for member in &class.members {
            match member {
                ClassMember::Prop(prop) => {
                    self.check_type(&prop.ty);
                    if !scope.define(&prop.name, &prop.ty, SymbolKind::Property) {
                        self.error(SemanticError::DuplicateProperty {
                            class: class.name.clone(),
                            name: prop.name.clone(),
                        });
                    }
                }
                ClassMember::Method(method) => {
                    if !scope.define(&method.name, &method.return_ty, SymbolKind::Function) {
                        self.error(SemanticError::DuplicateMethod {
                            class: class.name.clone(),
                            name: method.name.clone(),
                        });
                    }
                }
            }
        }

        for method in class.methods() {
            self.check_fn(method, &scope);
        }
    }

    fn check_fn(&mut self, func: &FnDecl, parent: &Scope) {
        let mut scope = Scope::new(Some(parent));
        for param in &func.params {
            self.check_type(&param.ty);
            if !scope.define(&param.name, &param.ty, SymbolKind::Variable) {
                self.error(SemanticError::DuplicateParameter {
                    function: func.name.clone(),
                    name: param.name.clone(),
                });
            }
        }
        self.check_type(&func.return_ty);

        // The outermost block shares the scope of the parameters.
        match &*func.body {
            Stmt::Block(body) => {
                for stmt in body {
                    self.check_stmt(stmt, &mut scope);
                }
            }
            body => self.check_stmt(body, &mut scope),
        }
    }

    fn check_stmt(&mut self, stmt: &Stmt, scope: &mut Scope) {
        match stmt {
            Stmt::VarDecl(decl) => {
                self.check_type(&decl.ty);
                if !scope.define(&decl.name, &decl.ty, SymbolKind::Variable) {
                    self.error(SemanticError::Redeclared {
                        kind: SymbolKind::Variable,
                        name: decl.name.clone(),
                    });
                }
                if let Some(initializer) = &decl.initializer {
                    self.check_expr(initializer, scope);
                }
            }
            Stmt::ClassDecl(class) => self.error(SemanticError::NestedDeclaration {
                kind: SymbolKind::Class,
                name: class.name.clone(),
            }),
            Stmt::FnDecl(func) => self.error(SemanticError::NestedDeclaration {
                kind: SymbolKind::Function,
                name: func.name.clone(),
            }),
            Stmt::Block(body) => {
                let mut inner = Scope::new(Some(&*scope));
                for stmt in body {
                    self.check_stmt(stmt, &mut inner);
                }
            }
            Stmt::Assign { target, value } => {
                self.check_expr(value, scope);
                self.check_expr(target, scope);
            }
            Stmt::Expr(expr) => self.check_expr(expr, scope),
            Stmt::Return(value) => {
                if let Some(value) = value {
                    self.check_expr(value, scope);
                }
            }
            Stmt::If {
                condition,
                then_branch,
                else_branch,
            } => {
                self.check_expr(condition, scope);
                self.check_nested(then_branch, scope);
                if let Some(else_branch) = else_branch {
                    self.check_nested(else_branch, scope);
                }
            }
            Stmt::While { condition, body } => {
                self.check_expr(condition, scope);
                self.check_nested(body, scope);
            }
            Stmt::For {
                init,
                condition,
                step,
                body,
            } => {
                let mut header = Scope::new(Some(&*scope));
                if let Some(init) = init {
                    self.check_stmt(init, &mut header);
                }
                if let Some(condition) = condition {
                    self.check_expr(condition, &header);
                }
                if let Some(step) = step {
                    self.check_stmt(step, &mut header);
                }
                self.check_nested(body, &header);
            }
        }
    }

    /// Checks a branch or loop body in its own scope.
    fn check_nested(&mut self, stmt: &Stmt, parent: &Scope) {
        let mut scope = Scope::new(Some(parent));
        self.check_stmt(stmt, &mut scope);
    }

    fn check_expr(&mut self, expr: &Expr, scope: &Scope) {
        let mut checker = ExprChecker {
            scope,
            classes: &self.classes,
            errors: Vec::new(),
        };
        checker.visit_expr(expr);
        for error in checker.errors {
            self.error(error);
        }
    }
}

/// Checks the names used inside a single expression. Expressions never declare anything, so the
/// scope is only read.
struct ExprChecker<'s> {
    scope: &'s Scope<'s>,
    classes: &'s HashMap<String, ClassInfo>,
    errors: Vec<SemanticError>,
}

impl ExprChecker<'_> {
    /// Returns the declared type of an identifier, access chain or call.
    fn static_type(&self, expr: &Expr) -> Option<String> {
        match expr {
            Expr::Identifier(name) => self
                .scope
                .resolve(name)
                .map(|symbol| symbol.type_name.clone()),
            Expr::Access { object, member } => {
                let class = self.static_type(object)?;
                self.classes.get(&class)?.properties.get(member).cloned()
            }
            Expr::Call { callee, args: _ } => {
                let symbol = self.scope.resolve(callee)?;
                match symbol.kind {
                    SymbolKind::Class => Some(symbol.name.clone()),
                    _ => Some(symbol.type_name.clone()),
                }
            }
            Expr::MethodCall {
                object,
                method,
                args: _,
            } => {
                let class = self.static_type(object)?;
                self.classes.get(&class)?.methods.get(method).cloned()
            }
            _ => None,
        }
    }

    /// `print` only accepts primitive values.
    fn check_printable(&mut self, args: &[Expr]) {
        for arg in args {
            if let Some(type_name) = self.static_type(arg) {
                if type_name == "void" || self.classes.contains_key(&type_name) {
                    self.errors.push(SemanticError::Unprintable { type_name });
                }
            }
        }
    }

    fn check_receiver(&mut self, object: &Expr, method: &str) {
        let error = match self.static_type(object) {
            None => SemanticError::UnknownReceiver {
                method: method.to_string(),
            },
            Some(type_name) => match self.classes.get(&type_name) {
                None => SemanticError::NotAClass {
                    type_name,
                    method: method.to_string(),
                },
                Some(class) if !class.methods.contains_key(method) => {
                    SemanticError::UndefinedMethod {
                        class: type_name,
                        method: method.to_string(),
                    }
                }
                Some(_) => return,
            },
        };
        self.errors.push(error);
    }
}

impl<'ast> Visitor<'ast> for ExprChecker<'_> {
    fn visit_expr(&mut self, expr: &'ast Expr) {
        match expr {
            Expr::Identifier(name) => {
                if self.scope.resolve(name).is_none() {
                    self.errors.push(if name == "this" {
                        SemanticError::ThisOutsideMethod
                    } else {
                        SemanticError::UndefinedVariable { name: name.clone() }
                    });
                }
            }
            Expr::Call { callee, args } => {
                walk_expr(self, expr);
                if self.scope.resolve(callee).is_none() {
                    self.errors.push(SemanticError::UndefinedFunction {
                        name: callee.clone(),
                    });
                } else if callee == PRINT.name {
                    self.check_printable(args);
                }
            }
            Expr::MethodCall {
                object,
                method,
                args,
            } => {
                let before = self.errors.len();
                self.visit_expr(object);
                let object_resolved = self.errors.len() == before;
                for arg in args {
                    self.visit_expr(arg);
                }

                if !object.is_assignable() {
                    self.errors.push(SemanticError::InvalidReceiver {
                        method: method.clone(),
                    });
                } else if object_resolved {
                    self.check_receiver(object, method);
                }
            }
            _ => walk_expr(self, expr),
        }
    }
}

/// Runs an [`Analyzer`] over `program`.
pub fn analyze(program: &Program, source: &Source) -> Analysis {
    Analyzer::new(source).analyze(program)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rujo_parser::parser::parse_program;

    fn errors(source: &str) -> Vec<SemanticError> {
        let source = source.into();
        let program = parse_program(&source).expect("program should parse");
        let mut analyzer = Analyzer::new(&source);
        let analysis = analyzer.analyze(&program);
        assert_eq!(analysis.error_count, analyzer.errors().len());
        assert_eq!(analysis.error_count, source.errors.len());
        analyzer.errors().to_vec()
    }

    fn undefined(name: &str) -> SemanticError {
        SemanticError::UndefinedVariable {
            name: name.to_string(),
        }
    }

    #[test]
    fn test_valid_program() {
        let source = r#"
            int a = 10;
            int b = 5;
            print(a + b);
            print(add(a, b));
            Counter c = Counter(a);
            c.bump();
            print(c.n);

            fn add(int x, int y): int { return x + y; }

            class Counter {
                init(int start) { n = start; }
                fn bump(): void { this.n = n + step(); }
                fn step(): int { return 1; }
                prop int n;
            }

            fn main(): int {
                for (int i = 0; i < 3; i = i + 1) { print(typeOf(i)); }
                while (false) { }
                if (true) print(1); else print(2);
                return 0;
            }
        "#;
        assert!(errors(source).is_empty());
    }

    #[test]
    fn test_shadowing_is_not_redeclaration() {
        let source = "int a = 1; { string a = \"x\"; print(a); { float a = 1.5; } } print(a);";
        assert!(errors(source).is_empty());
    }

    #[test]
    fn test_redeclaration() {
        assert_eq!(
            errors("int a = 1; int a = 2; fn f(): void { } class f { }"),
            vec![
                SemanticError::Redeclared {
                    kind: SymbolKind::Class,
                    name: "f".to_string(),
                },
                SemanticError::Redeclared {
                    kind: SymbolKind::Variable,
                    name: "a".to_string(),
                },
            ]
        );
    }

    #[test]
    fn test_undefined_names_accumulate() {
        assert_eq!(
            errors("print(b); b = 1; foo(c);"),
            vec![
                undefined("b"),
                undefined("b"),
                undefined("c"),
                SemanticError::UndefinedFunction {
                    name: "foo".to_string(),
                },
            ]
        );
    }

    #[test]
    fn test_assign_checks_value_before_target() {
        assert_eq!(errors("x = y;"), vec![undefined("y"), undefined("x")]);
    }

    #[test]
    fn test_access_checks_only_object() {
        assert_eq!(
            errors("int a = 1; print(a.missing); print(b.c);"),
            vec![undefined("b")]
        );
    }

    #[test]
    fn test_this_outside_method() {
        assert_eq!(
            errors("print(this); fn f(): void { this.x = 1; }"),
            vec![
                SemanticError::ThisOutsideMethod,
                SemanticError::ThisOutsideMethod,
            ]
        );
    }

    #[test]
    fn test_loose_variables_are_not_visible_in_functions() {
        assert_eq!(
            errors("int g = 1; fn f(): int { return g; }"),
            vec![undefined("g")]
        );
    }

    #[test]
    fn test_parameters_share_function_body_scope() {
        assert_eq!(
            errors("fn f(int a, int a): void { int a = 1; { int a = 2; } }"),
            vec![
                SemanticError::DuplicateParameter {
                    function: "f".to_string(),
                    name: "a".to_string(),
                },
                SemanticError::Redeclared {
                    kind: SymbolKind::Variable,
                    name: "a".to_string(),
                },
            ]
        );
    }

    #[test]
    fn test_class_members() {
        assert_eq!(
            errors(
                "class Foo { prop int x; prop float x; \
                 fn x(): void { } fn m(): void { } fn m(): void { } }"
            ),
            vec![
                SemanticError::DuplicateProperty {
                    class: "Foo".to_string(),
                    name: "x".to_string(),
                },
                SemanticError::DuplicateMethod {
                    class: "Foo".to_string(),
                    name: "x".to_string(),
                },
                SemanticError::DuplicateMethod {
                    class: "Foo".to_string(),
                    name: "m".to_string(),
                },
            ]
        );
    }

    #[test]
    fn test_method_calls() {
        assert_eq!(
            errors(
                "class N { fn m(): void { } } \
                 class C { prop N next; prop int n; fn m(): void { next.m(); n.m(); } } \
                 C c = C(); c.m(); c.next.m(); c.n2.m(); c.z(); int x = 1; x.m(); C().m(); y.m();"
            ),
            vec![
                SemanticError::NotAClass {
                    type_name: "int".to_string(),
                    method: "m".to_string(),
                },
                SemanticError::UnknownReceiver {
                    method: "m".to_string(),
                },
                SemanticError::UndefinedMethod {
                    class: "C".to_string(),
                    method: "z".to_string(),
                },
                SemanticError::NotAClass {
                    type_name: "int".to_string(),
                    method: "m".to_string(),
                },
                SemanticError::InvalidReceiver {
                    method: "m".to_string(),
                },
                undefined("y"),
            ]
        );
    }

    #[test]
    fn test_nested_declarations() {
        assert_eq!(
            errors("{ fn f(): void { } } fn g(): void { class K { } }"),
            vec![
                SemanticError::NestedDeclaration {
                    kind: SymbolKind::Function,
                    name: "f".to_string(),
                },
                SemanticError::NestedDeclaration {
                    kind: SymbolKind::Class,
                    name: "K".to_string(),
                },
            ]
        );
    }

    #[test]
    fn test_loop_scopes() {
        assert_eq!(
            errors(
                "for (int i = 0; i < 3; i = i + 1) { int i = 2; } print(i); \
                 while (true) int w = 1; print(w);"
            ),
            vec![undefined("i"), undefined("w")]
        );
    }

    #[test]
    fn test_undefined_types() {
        assert_eq!(
            errors(
                "Foo f; class K { prop Bar b; fn m(Baz x): Qux { } } \
                 K k = K(); fn g(K a, string s): void { int n = 1; } n x = 1;"
            ),
            vec![
                SemanticError::UndefinedType {
                    name: "Foo".to_string(),
                },
                SemanticError::UndefinedType {
                    name: "Bar".to_string(),
                },
                SemanticError::UndefinedType {
                    name: "Baz".to_string(),
                },
                SemanticError::UndefinedType {
                    name: "Qux".to_string(),
                },
                SemanticError::UndefinedType {
                    name: "n".to_string(),
                },
            ]
        );
    }

    #[test]
    fn test_classes_containing_themselves() {
        let source = "class A { prop B b; } class B { prop int y; } A a = A(); print(a.b.y);";
        assert!(errors(source).is_empty());
        assert_eq!(
            errors(
                "class C { prop C next; } class D { prop E e; } class E { prop int x; prop D d; } \
                 class F { prop D d; }"
            ),
            vec![
                SemanticError::RecursiveClass {
                    name: "C".to_string(),
                },
                SemanticError::RecursiveClass {
                    name: "D".to_string(),
                },
                SemanticError::RecursiveClass {
                    name: "E".to_string(),
                },
            ]
        );
    }

    #[test]
    fn test_print_rejects_objects_and_void() {
        assert_eq!(
            errors(
                "class P { prop int x; fn get(): int { return x; } fn me(): P { return this; } } \
                 fn nothing(): void { } P p = P(); \
                 print(p, p.x, p.get(), p.me(), P(), nothing(), typeOf(p), 1);"
            ),
            vec![
                SemanticError::Unprintable {
                    type_name: "P".to_string(),
                },
                SemanticError::Unprintable {
                    type_name: "P".to_string(),
                },
                SemanticError::Unprintable {
                    type_name: "P".to_string(),
                },
                SemanticError::Unprintable {
                    type_name: "void".to_string(),
                },
            ]
        );
    }

    #[test]
    fn test_main_with_parameters() {
        assert_eq!(
            errors("fn main(int argc): int { return argc; }"),
            vec![SemanticError::MainWithParameters]
        );
    }

    #[test]
    fn test_diagnostics_are_reported_to_source() {
        let source = "print(nope);".into();
        let program = parse_program(&source).unwrap();
        let analysis = analyze(&program, &source);
        assert!(!analysis.is_success());
        assert_eq!(
            source.errors.to_string(),
            "error[semantic]: undefined variable `nope`\n"
        );
    }
}
