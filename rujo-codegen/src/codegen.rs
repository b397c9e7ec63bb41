//! Lowers AST into C source text.

use std::collections::{HashMap, HashSet};

use rujo_parser::ast::{ClassDecl, Expr, FnDecl, Literal, Param, Program, Stmt, VarDecl};
use rujo_parser::visitor::Visitor;
use rujo_passes::builtins::PRINT;

use crate::ctype::c_type;
use crate::PREAMBLE;

const INDENT: &str = "    ";

/// Name of the emitted function for a user `fn main`. `main` itself is the synthesized entry point.
const USER_MAIN: &str = "rujo_main";

/// Generate C code from an abstract syntax tree that passed semantic analysis.
pub struct Codegen<'a> {
    code: String,
    indent: usize,
    /// Top-level classes by name.
    classes: HashMap<&'a str, &'a ClassDecl>,
    /// Local variables of the function being emitted, innermost scope last. Name to declared type.
    locals: Vec<HashMap<&'a str, &'a str>>,
    /// The class whose method is being emitted.
    current_class: Option<&'a ClassDecl>,
}

impl<'a> Codegen<'a> {
    pub fn new() -> Self {
        Self {
            code: String::new(),
            indent: 0,
            classes: HashMap::new(),
            locals: Vec::new(),
            current_class: None,
        }
    }

    /// Consumes `self` and returns the generated code.
    #[must_use]
    pub fn into_inner_code(self) -> String {
        self.code
    }

    /// Emits the whole translation unit: preamble, structs, prototypes, functions and the entry point.
    pub fn codegen_program(&mut self, program: &'a Program) {
        let mut classes = Vec::new();
        let mut functions = Vec::new();
        let mut user_main = None;
        for stmt in &program.statements {
            match stmt {
                Stmt::ClassDecl(class) => classes.push(class),
                Stmt::FnDecl(func) if func.name == "main" => user_main = Some(func),
                Stmt::FnDecl(func) => functions.push(func),
                _ => {}
            }
        }
        self.classes = classes
            .iter()
            .map(|&class| (class.name.as_str(), class))
            .collect();

        self.code.push_str(PREAMBLE);

        let mut structs = Vec::new();
        let mut visited = HashSet::new();
        for &class in &classes {
            self.order_struct(class, &mut visited, &mut structs);
        }
        for class in structs {
            self.code.push('\n');
            self.codegen_struct(class);
        }

        let prototypes = self.prototypes(&classes, &functions, user_main);
        if !prototypes.is_empty() {
            self.code.push('\n');
            for prototype in prototypes {
                self.line(&format!("{};", prototype));
            }
        }

        for &func in &functions {
            self.code.push('\n');
            self.codegen_function(func, None);
        }
        if let Some(main) = user_main {
            self.code.push('\n');
            self.codegen_function(main, None);
        }
        for &class in &classes {
            for method in class.methods() {
                self.code.push('\n');
                self.codegen_function(method, Some(class));
            }
            self.code.push('\n');
            self.codegen_constructor(class);
        }

        self.code.push('\n');
        self.codegen_entry(program, user_main.is_some());
    }

    fn line(&mut self, text: &str) {
        for _ in 0..self.indent {
            self.code.push_str(INDENT);
        }
        self.code.push_str(text);
        self.code.push('\n');
    }

    /* Declarations */
    /// Pushes `class` after every class it holds by value, so that each struct is complete
    /// where it is embedded. Classes are visited in declaration order.
    fn order_struct(
        &self,
        class: &'a ClassDecl,
        visited: &mut HashSet<&'a str>,
        structs: &mut Vec<&'a ClassDecl>,
    ) {
        if !visited.insert(class.name.as_str()) {
            return;
        }
        for prop in class.properties() {
            if let Some(&inner) = self.classes.get(prop.ty.as_str()) {
                self.order_struct(inner, visited, structs);
            }
        }
        structs.push(class);
    }

    fn codegen_struct(&mut self, class: &ClassDecl) {
        self.line(&format!("typedef struct {} {{", class.name));
        self.indent += 1;
        for prop in class.properties() {
            self.line(&format!("{} {};", c_type(&prop.ty), prop.name));
        }
        self.indent -= 1;
        self.line(&format!("}} {};", class.name));
    }

    /// Signatures of every emitted function, in emission order.
    fn prototypes(
        &self,
        classes: &[&'a ClassDecl],
        functions: &[&'a FnDecl],
        user_main: Option<&'a FnDecl>,
    ) -> Vec<String> {
        let mut prototypes: Vec<String> = functions
            .iter()
            .chain(user_main.iter())
            .map(|&func| signature(func, None))
            .collect();
        for &class in classes {
            prototypes.extend(class.methods().map(|method| signature(method, Some(class))));
            prototypes.push(constructor_signature(class));
        }
        prototypes
    }

    /// Emits a free function or, if `class` is set, a method taking a `this` receiver.
    fn codegen_function(&mut self, func: &'a FnDecl, class: Option<&'a ClassDecl>) {
        log::trace!("emitting function `{}`", func.name);
        self.current_class = class;
        self.line(&format!("{} {{", signature(func, class)));

        self.enter_scope();
        for param in &func.params {
            self.declare_local(&param.name, &param.ty);
        }
        self.indent += 1;
        // The outermost block shares the scope of the parameters.
        match &*func.body {
            Stmt::Block(body) => {
                for stmt in body {
                    self.visit_stmt(stmt);
                }
            }
            body => self.visit_stmt(body),
        }
        self.indent -= 1;
        self.exit_scope();

        self.line("}");
        self.current_class = None;
    }

    /// Emits `Class_new`, which returns a zeroed instance after running `init` if there is one.
    fn codegen_constructor(&mut self, class: &ClassDecl) {
        self.line(&format!("{} {{", constructor_signature(class)));
        self.indent += 1;
        self.line(&format!("{} rujo_self;", class.name));
        self.line("memset(&rujo_self, 0, sizeof rujo_self);");
        if let Some(init) = class.constructor() {
            let mut args = vec!["&rujo_self"];
            args.extend(init.params.iter().map(|param| param.name.as_str()));
            self.line(&format!("{}_init({});", class.name, args.join(", ")));
        }
        self.line("return rujo_self;");
        self.indent -= 1;
        self.line("}");
    }

    /// Emits `int main(void)` holding every loose top-level statement.
    fn codegen_entry(&mut self, program: &'a Program, has_user_main: bool) {
        self.line("int main(void) {");
        self.indent += 1;
        self.enter_scope();
        for stmt in &program.statements {
            match stmt {
                Stmt::ClassDecl(_) | Stmt::FnDecl(_) => {}
                stmt => self.visit_stmt(stmt),
            }
        }
        self.exit_scope();
        if has_user_main {
            self.line(&format!("{}();", USER_MAIN));
        }
        self.line("return 0;");
        self.indent -= 1;
        self.line("}");
    }

    /* Statements */
    fn codegen_if(
        &mut self,
        condition: &'a Expr,
        then_branch: &'a Stmt,
        else_branch: Option<&'a Stmt>,
    ) {
        let mut header = format!("if ({}) {{", self.expr(condition));
        let mut then_branch = then_branch;
        let mut else_branch = else_branch;
        loop {
            self.line(&header);
            self.codegen_body(then_branch);
            match else_branch {
                Some(Stmt::If {
                    condition,
                    then_branch: next_then,
                    else_branch: next_else,
                }) => {
                    header = format!("}} else if ({}) {{", self.expr(condition));
                    then_branch = &**next_then;
                    else_branch = next_else.as_deref();
                }
                Some(other) => {
                    self.line("} else {");
                    self.codegen_body(other);
                    break;
                }
                None => break,
            }
        }
        self.line("}");
    }

    /// Emits the inside of a braced body. Branch and loop bodies are always braced in C.
    fn codegen_body(&mut self, stmt: &'a Stmt) {
        match stmt {
            Stmt::Block(body) => self.codegen_body_list(body),
            stmt => self.codegen_body_list(std::slice::from_ref(stmt)),
        }
    }

    fn codegen_body_list(&mut self, body: &'a [Stmt]) {
        self.indent += 1;
        self.enter_scope();
        for stmt in body {
            self.visit_stmt(stmt);
        }
        self.exit_scope();
        self.indent -= 1;
    }

    /// Returns `type name [= value];` and declares the variable in the current scope.
    fn var_decl(&mut self, decl: &'a VarDecl) -> String {
        self.declare_local(&decl.name, &decl.ty);
        match &decl.initializer {
            Some(initializer) => format!(
                "{} {} = {};",
                c_type(&decl.ty),
                decl.name,
                self.expr(initializer)
            ),
            None => format!("{} {};", c_type(&decl.ty), decl.name),
        }
    }

    /// Returns an assignment or expression statement without its terminator.
    fn simple_stmt(&self, stmt: &Stmt) -> String {
        match stmt {
            Stmt::Assign { target, value } => {
                format!("{} = {}", self.expr(target), self.expr(value))
            }
            Stmt::Expr(expr) => self.expr(expr),
            _ => String::new(),
        }
    }

    /* Expressions */
    fn expr(&self, expr: &Expr) -> String {
        match expr {
            Expr::Literal(literal) => literal_to_c(literal),
            Expr::Identifier(name) => {
                if self.is_own_property(name) {
                    format!("this->{}", name)
                } else {
                    name.clone()
                }
            }
            Expr::Call { callee, args } => self.call(callee, args),
            Expr::MethodCall {
                object,
                method,
                args,
            } => {
                let receiver = match &**object {
                    Expr::Identifier(name) if name == "this" => "this".to_string(),
                    object => format!("&{}", self.expr(object)),
                };
                let function = match self.static_type(object) {
                    Some(class) => format!("{}_{}", class, method),
                    None => method.clone(),
                };
                format!("{}({})", function, self.args(Some(receiver), args))
            }
            Expr::Access { object, member } => match &**object {
                // every receiver is named `this` and is the only pointer in generated code
                Expr::Identifier(name) if name == "this" => format!("this->{}", member),
                object => format!("{}.{}", self.expr(object), member),
            },
            Expr::TypeOf(inner) => format!("RUJO_TYPEOF({})", self.expr(inner)),
            Expr::Unary { op, operand } => format!("({}{})", op.symbol(), self.expr(operand)),
            Expr::Binary { lhs, op, rhs } => {
                format!("({} {} {})", self.expr(lhs), op.symbol(), self.expr(rhs))
            }
        }
    }

    fn call(&self, callee: &str, args: &[Expr]) -> String {
        if self.is_local(callee) {
            return format!("{}({})", callee, self.args(None, args));
        }

        if callee == PRINT.name {
            return match args {
                [] => "RUJO_PRINT(\"\")".to_string(),
                [arg] => format!("RUJO_PRINT({})", self.expr(arg)),
                args => {
                    let prints: Vec<_> = args
                        .iter()
                        .map(|arg| format!("RUJO_PRINT({})", self.expr(arg)))
                        .collect();
                    format!("({})", prints.join(", "))
                }
            };
        }

        if let Some(class) = self.current_class {
            if class.methods().any(|method| method.name == callee) {
                return format!(
                    "{}_{}({})",
                    class.name,
                    callee,
                    self.args(Some("this".to_string()), args)
                );
            }
        }

        if self.classes.contains_key(callee) {
            return format!("{}_new({})", callee, self.args(None, args));
        }

        format!("{}({})", function_name(callee), self.args(None, args))
    }

    fn args(&self, receiver: Option<String>, args: &[Expr]) -> String {
        let args: Vec<_> = receiver
            .into_iter()
            .chain(args.iter().map(|arg| self.expr(arg)))
            .collect();
        args.join(", ")
    }

    /* Scopes */
    fn enter_scope(&mut self) {
        self.locals.push(HashMap::new());
    }

    fn exit_scope(&mut self) {
        self.locals.pop();
    }

    fn declare_local(&mut self, name: &'a str, ty: &'a str) {
        if let Some(scope) = self.locals.last_mut() {
            scope.insert(name, ty);
        }
    }

    fn local_type(&self, name: &str) -> Option<&'a str> {
        self.locals.iter().rev().find_map(|scope| scope.get(name).copied())
    }

    fn is_local(&self, name: &str) -> bool {
        self.local_type(name).is_some()
    }

    /// Returns `true` if `name` is a bare use of a property of the class whose method is being emitted.
    fn is_own_property(&self, name: &str) -> bool {
        match self.current_class {
            Some(class) => !self.is_local(name) && class.properties().any(|prop| prop.name == name),
            None => false,
        }
    }

    /// Returns the declared type of an identifier or access chain.
    fn static_type(&self, expr: &Expr) -> Option<&'a str> {
        match expr {
            Expr::Identifier(name) if name == "this" => {
                self.current_class.map(|class| class.name.as_str())
            }
            Expr::Identifier(name) => self.local_type(name).or_else(|| {
                self.current_class?
                    .properties()
                    .find(|prop| &prop.name == name)
                    .map(|prop| prop.ty.as_str())
            }),
            Expr::Access { object, member } => {
                let class = self.classes.get(self.static_type(object)?).copied()?;
                class
                    .properties()
                    .find(|prop| &prop.name == member)
                    .map(|prop| prop.ty.as_str())
            }
            _ => None,
        }
    }
}

impl<'a> Visitor<'a> for Codegen<'a> {
    fn visit_stmt(&mut self, stmt: &'a Stmt) {
        match stmt {
            Stmt::VarDecl(decl) => {
                let text = self.var_decl(decl);
                self.line(&text);
            }
            // nested declarations are rejected by the analyzer
            Stmt::ClassDecl(_) | Stmt::FnDecl(_) => {}
            Stmt::Block(body) => {
                self.line("{");
                self.codegen_body_list(body);
                self.line("}");
            }
            Stmt::Assign { .. } | Stmt::Expr(_) => {
                let text = format!("{};", self.simple_stmt(stmt));
                self.line(&text);
            }
            Stmt::Return(value) => {
                let text = match value {
                    Some(value) => format!("return {};", self.expr(value)),
                    None => "return;".to_string(),
                };
                self.line(&text);
            }
            Stmt::If {
                condition,
                then_branch,
                else_branch,
            } => self.codegen_if(condition, then_branch, else_branch.as_deref()),
            Stmt::While { condition, body } => {
                let header = format!("while ({}) {{", self.expr(condition));
                self.line(&header);
                self.codegen_body(body);
                self.line("}");
            }
            Stmt::For {
                init,
                condition,
                step,
                body,
            } => {
                self.enter_scope();
                // a declaration carries its own `;`
                let init = match init.as_deref() {
                    Some(Stmt::VarDecl(decl)) => self.var_decl(decl),
                    Some(init) => format!("{};", self.simple_stmt(init)),
                    None => ";".to_string(),
                };
                let condition = match condition {
                    Some(condition) => format!(" {}", self.expr(condition)),
                    None => String::new(),
                };
                let step = match step.as_deref() {
                    Some(step) => format!(" {}", self.simple_stmt(step)),
                    None => String::new(),
                };
                self.line(&format!("for ({}{};{}) {{", init, condition, step));
                self.codegen_body(body);
                self.line("}");
                self.exit_scope();
            }
        }
    }
}

impl Default for Codegen<'_> {
    fn default() -> Self {
        Self::new()
    }
}

/// Generates the C translation unit for `program`. The output only depends on the AST.
pub fn generate(program: &Program) -> String {
    let mut codegen = Codegen::new();
    codegen.codegen_program(program);
    let code = codegen.into_inner_code();
    log::debug!("generated {} bytes of C", code.len());
    code
}

fn function_name(name: &str) -> &str {
    if name == "main" {
        USER_MAIN
    } else {
        name
    }
}

fn params_to_c(receiver: Option<&ClassDecl>, params: &[Param]) -> String {
    let params: Vec<_> = receiver
        .map(|class| format!("{}* this", class.name))
        .into_iter()
        .chain(
            params
                .iter()
                .map(|param| format!("{} {}", c_type(&param.ty), param.name)),
        )
        .collect();
    if params.is_empty() {
        "void".to_string()
    } else {
        params.join(", ")
    }
}

/// `int add(int a, int b)` or, for methods, `void Counter_bump(Counter* this)`.
fn signature(func: &FnDecl, class: Option<&ClassDecl>) -> String {
    let name = match class {
        Some(class) => format!("{}_{}", class.name, func.name),
        None => function_name(&func.name).to_string(),
    };
    format!(
        "{} {}({})",
        c_type(&func.return_ty),
        name,
        params_to_c(class, &func.params)
    )
}

fn constructor_signature(class: &ClassDecl) -> String {
    let params = class
        .constructor()
        .map(|init| init.params.as_slice())
        .unwrap_or_default();
    format!("{} {}_new({})", class.name, class.name, params_to_c(None, params))
}

fn literal_to_c(literal: &Literal) -> String {
    match literal {
        // `2147483648` is not an `int` in C, so the minimum is built from a smaller literal
        Literal::Int(i32::MIN) => "(-2147483647 - 1)".to_string(),
        Literal::Int(value) => value.to_string(),
        Literal::Float(value) => format!("{:?}", value),
        Literal::String(value) => {
            let mut quoted = String::with_capacity(value.len() + 2);
            quoted.push('"');
            for ch in value.chars() {
                match ch {
                    '\\' => quoted.push_str("\\\\"),
                    '\n' => quoted.push_str("\\n"),
                    '\r' => quoted.push_str("\\r"),
                    '\t' => quoted.push_str("\\t"),
                    ch => quoted.push(ch),
                }
            }
            quoted.push('"');
            quoted
        }
        Literal::Bool(value) => format!("((bool) {})", value),
        Literal::Char(value) => format!("((uint32_t) {})", *value as u32),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use insta::assert_snapshot;
    use rujo_parser::parser::parse_program;
    use rujo_passes::resolve::analyze;
    use rujo_source::Source;

    /// Generated code without the preamble.
    fn body(source: &str) -> String {
        let source: Source = source.into();
        let program = parse_program(&source).expect("program should parse");
        assert!(analyze(&program, &source).is_success(), "{}", source.errors);
        let code = generate(&program);
        assert!(code.starts_with(PREAMBLE));
        code[PREAMBLE.len()..].trim_start().to_string()
    }

    #[test]
    fn test_loose_statements() {
        assert_snapshot!(body("int a = 10; int b = 5; print(a + b);"), @r###"
        int main(void) {
            int a = 10;
            int b = 5;
            RUJO_PRINT((a + b));
            return 0;
        }
        "###);
    }

    #[test]
    fn test_class_method_uses_receiver_pointer() {
        assert_snapshot!(body("class Foo { prop int x; fn bump(): void { x = (x + 1); } }"), @r###"
        typedef struct Foo {
            int x;
        } Foo;

        void Foo_bump(Foo* this);
        Foo Foo_new(void);

        void Foo_bump(Foo* this) {
            this->x = (this->x + 1);
        }

        Foo Foo_new(void) {
            Foo rujo_self;
            memset(&rujo_self, 0, sizeof rujo_self);
            return rujo_self;
        }

        int main(void) {
            return 0;
        }
        "###);
    }

    #[test]
    fn test_constructor_and_method_calls() {
        let source = r#"
            class Counter {
                prop int n;
                init(int start) { this.n = start; }
                fn bump(int by): void { n = n + by; }
                fn twice(): void { bump(1); this.bump(1); }
            }
            class Pair {
                prop Counter left;
                fn reset(): void { left.bump(0 - left.n); }
            }
            Counter c = Counter(5);
            c.twice();
            Pair p = Pair();
            p.left.bump(2);
            print(c.n, p.left.n);
        "#;
        assert_snapshot!(body(source), @r###"
        typedef struct Counter {
            int n;
        } Counter;

        typedef struct Pair {
            Counter left;
        } Pair;

        void Counter_init(Counter* this, int start);
        void Counter_bump(Counter* this, int by);
        void Counter_twice(Counter* this);
        Counter Counter_new(int start);
        void Pair_reset(Pair* this);
        Pair Pair_new(void);

        void Counter_init(Counter* this, int start) {
            this->n = start;
        }

        void Counter_bump(Counter* this, int by) {
            this->n = (this->n + by);
        }

        void Counter_twice(Counter* this) {
            Counter_bump(this, 1);
            Counter_bump(this, 1);
        }

        Counter Counter_new(int start) {
            Counter rujo_self;
            memset(&rujo_self, 0, sizeof rujo_self);
            Counter_init(&rujo_self, start);
            return rujo_self;
        }

        void Pair_reset(Pair* this) {
            Counter_bump(&this->left, (0 - this->left.n));
        }

        Pair Pair_new(void) {
            Pair rujo_self;
            memset(&rujo_self, 0, sizeof rujo_self);
            return rujo_self;
        }

        int main(void) {
            Counter c = Counter_new(5);
            Counter_twice(&c);
            Pair p = Pair_new();
            Counter_bump(&p.left, 2);
            (RUJO_PRINT(c.n), RUJO_PRINT(p.left.n));
            return 0;
        }
        "###);
    }

    #[test]
    fn test_locals_shadow_properties() {
        assert_snapshot!(body("class P { prop int x; fn f(int x): int { return x; } fn g(): int { { int x = 1; } return x; } }"), @r###"
        typedef struct P {
            int x;
        } P;

        int P_f(P* this, int x);
        int P_g(P* this);
        P P_new(void);

        int P_f(P* this, int x) {
            return x;
        }

        int P_g(P* this) {
            {
                int x = 1;
            }
            return this->x;
        }

        P P_new(void) {
            P rujo_self;
            memset(&rujo_self, 0, sizeof rujo_self);
            return rujo_self;
        }

        int main(void) {
            return 0;
        }
        "###);
    }

    #[test]
    fn test_for_loop() {
        assert_snapshot!(body("for (int i = 0; (i < 5); i = (i + 1)) { print(i); }"), @r###"
        int main(void) {
            for (int i = 0; (i < 5); i = (i + 1)) {
                RUJO_PRINT(i);
            }
            return 0;
        }
        "###);
        assert_snapshot!(body("int i = 0; for (;;) { } for (i = 1; ; i = i + 1) i = 2;"), @r###"
        int main(void) {
            int i = 0;
            for (;;) {
            }
            for (i = 1;; i = (i + 1)) {
                i = 2;
            }
            return 0;
        }
        "###);
    }

    #[test]
    fn test_control_flow() {
        let source = r#"
            int a = 1;
            if (a == 1) print("one"); else if (a == 2) { print("two"); } else print();
            while (a < 10) a = a * 2;
            if (!(a > 3)) { }
        "#;
        assert_snapshot!(body(source), @r###"
        int main(void) {
            int a = 1;
            if ((a == 1)) {
                RUJO_PRINT("one");
            } else if ((a == 2)) {
                RUJO_PRINT("two");
            } else {
                RUJO_PRINT("");
            }
            while ((a < 10)) {
                a = (a * 2);
            }
            if ((!(a > 3))) {
            }
            return 0;
        }
        "###);
    }

    #[test]
    fn test_functions_and_user_main() {
        let source = r#"
            fn main(): int { print(square(3)); return 0; }
            fn square(int x): int { return x * x; }
            fn greet(string name, char initial, byte age, bool ok, float score): void return;
        "#;
        assert_snapshot!(body(source), @r###"
        int square(int x);
        void greet(const char* name, uint32_t initial, uint8_t age, bool ok, float score);
        int rujo_main(void);

        int square(int x) {
            return (x * x);
        }

        void greet(const char* name, uint32_t initial, uint8_t age, bool ok, float score) {
            return;
        }

        int rujo_main(void) {
            RUJO_PRINT(square(3));
            return 0;
        }

        int main(void) {
            rujo_main();
            return 0;
        }
        "###);
    }

    #[test]
    fn test_literals() {
        assert_snapshot!(body("print(1, 2.5, 3., \"a\tb\", true, false, 'A', typeOf(-1));"), @r###"
        int main(void) {
            (RUJO_PRINT(1), RUJO_PRINT(2.5), RUJO_PRINT(3.0), RUJO_PRINT("a\tb"), RUJO_PRINT(((bool) true)), RUJO_PRINT(((bool) false)), RUJO_PRINT(((uint32_t) 65)), RUJO_PRINT(RUJO_TYPEOF((-1))));
            return 0;
        }
        "###);
    }

    #[test]
    fn test_structs_follow_embedded_classes() {
        let source = "class A { prop B b; prop C c; } class B { prop C c; } \
            class C { prop int y; } A a = A(); print(a.b.c.y);";
        assert_snapshot!(body(source), @r###"
        typedef struct C {
            int y;
        } C;

        typedef struct B {
            C c;
        } B;

        typedef struct A {
            B b;
            C c;
        } A;

        A A_new(void);
        B B_new(void);
        C C_new(void);

        A A_new(void) {
            A rujo_self;
            memset(&rujo_self, 0, sizeof rujo_self);
            return rujo_self;
        }

        B B_new(void) {
            B rujo_self;
            memset(&rujo_self, 0, sizeof rujo_self);
            return rujo_self;
        }

        C C_new(void) {
            C rujo_self;
            memset(&rujo_self, 0, sizeof rujo_self);
            return rujo_self;
        }

        int main(void) {
            A a = A_new();
            RUJO_PRINT(a.b.c.y);
            return 0;
        }
        "###);
    }

    #[test]
    fn test_string_backslashes_are_escaped() {
        assert_snapshot!(body(r#"print("a\", "C:\temp\new");"#), @r###"
        int main(void) {
            (RUJO_PRINT("a\\"), RUJO_PRINT("C:\\temp\\new"));
            return 0;
        }
        "###);
    }

    #[test]
    fn test_minimum_int() {
        assert_snapshot!(body("int m = -2147483648; print(m, -2147483647);"), @r###"
        int main(void) {
            int m = (-2147483647 - 1);
            (RUJO_PRINT(m), RUJO_PRINT((-2147483647)));
            return 0;
        }
        "###);
    }

    #[test]
    fn test_generation_is_deterministic() {
        let source: Source = "class B { prop int y; } class A { prop B b; fn f(): void { } } \
                              fn g(): void { } A a = A(); a.f();"
            .into();
        let program = parse_program(&source).unwrap();
        let first = generate(&program);
        let second = generate(&program);
        assert_eq!(first, second);
        assert!(first.find("typedef struct B").unwrap() < first.find("typedef struct A").unwrap());
    }
}
