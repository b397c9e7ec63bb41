use logos::Logos;
use std::fmt;
use std::ops::Range;

#[derive(Debug, Logos, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenKind {
    // literals
    #[regex(r"[0-9]+")]
    IntLit,
    #[regex(r"[0-9]+\.[0-9]*")]
    FloatLit,
    #[regex(r#""[^"]*""#)]
    StringLit,
    #[regex(r"'[^']'")]
    CharLit,
    #[token("true")]
    #[token("false")]
    BoolLit,

    // identifiers
    #[regex("[a-zA-Z_][a-zA-Z0-9_]*")]
    Identifier,

    // primitive types
    #[token("int")]
    Int,
    #[token("float")]
    Float,
    #[token("bool")]
    Bool,
    #[token("byte")]
    Byte,
    #[token("char")]
    Char,
    #[token("string")]
    Str,
    #[token("void")]
    Void,

    // keywords
    #[token("fn")]
    Fn,
    #[token("class")]
    Class,
    #[token("prop")]
    Prop,
    #[token("init")]
    Init,
    #[token("return")]
    Return,
    #[token("if")]
    If,
    #[token("else")]
    Else,
    #[token("while")]
    While,
    #[token("for")]
    For,
    #[token("typeOf")]
    TypeOf,
    // - reserved, not accepted by any production yet
    #[token("pub")]
    Pub,
    #[token("import")]
    Import,
    #[token("module")]
    Module,
    #[token("required")]
    Required,
    #[token("annotation")]
    Annotation,
    #[token("null")]
    Null,

    // unary operators
    #[token("!")]
    Bang,

    // binary operators
    // - arithmetics
    #[token("+")]
    Plus,
    #[token("-")]
    Minus, // NOTE: can also be unary
    #[token("*")]
    Asterisk,
    #[token("/")]
    Slash,
    // - assignment
    #[token("=")]
    Equals,
    // - equality
    #[token("==")]
    EqualsEquals,
    #[token("!=")]
    NotEquals,
    // - ordering
    #[token(">")]
    GreaterThan,
    #[token(">=")]
    GreaterThanEquals,
    #[token("<")]
    LessThan,
    #[token("<=")]
    LessThanEquals,

    // punctuation
    #[token("(")]
    OpenParen,
    #[token(")")]
    CloseParen,
    #[token("{")]
    OpenBrace,
    #[token("}")]
    CloseBrace,
    #[token("[")]
    OpenBracket,
    #[token("]")]
    CloseBracket,
    #[token(",")]
    Comma,
    #[token(";")]
    Semi,
    #[token(":")]
    Colon,
    #[token(".")]
    Dot,
    #[token("?")]
    Question,
    #[token("@")]
    At,
    #[token("&")]
    Ampersand,

    // misc
    #[regex(r"[ \t\n\r\f]+", logos::skip)]
    #[regex(r"//[^\n]*", logos::skip)] // single line comments
    #[error]
    Illegal,

    /// Only generated by [`Lexer::next_token`] when the input is exhausted.
    Eof,
}

impl TokenKind {
    /// Returns the binary binding power or `None` if invalid binop token.
    /// Binding power `0` and `1` is reserved for accepting any expression.
    /// Every level is left associative.
    pub fn binop_bp(&self) -> Option<(u8, u8)> {
        match self {
            /* Equality */
            TokenKind::EqualsEquals | TokenKind::NotEquals => Some((2, 3)),
            /* Comparison */
            TokenKind::GreaterThan
            | TokenKind::GreaterThanEquals
            | TokenKind::LessThan
            | TokenKind::LessThanEquals => Some((4, 5)),
            /* Additive */
            TokenKind::Plus | TokenKind::Minus => Some((6, 7)),
            /* Multiplicative */
            TokenKind::Asterisk | TokenKind::Slash => Some((8, 9)),
            _ => None,
        }
    }

    /// Returns the canonical type name if the token is a primitive type keyword.
    pub fn primitive_type(&self) -> Option<&'static str> {
        Some(match self {
            TokenKind::Int => "int",
            TokenKind::Float => "float",
            TokenKind::Bool => "bool",
            TokenKind::Byte => "byte",
            TokenKind::Char => "char",
            TokenKind::Str => "string",
            TokenKind::Void => "void",
            _ => return None,
        })
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            TokenKind::IntLit => "integer literal",
            TokenKind::FloatLit => "float literal",
            TokenKind::StringLit => "string literal",
            TokenKind::CharLit => "char literal",
            TokenKind::BoolLit => "bool literal",
            TokenKind::Identifier => "identifier",
            TokenKind::Int => "`int`",
            TokenKind::Float => "`float`",
            TokenKind::Bool => "`bool`",
            TokenKind::Byte => "`byte`",
            TokenKind::Char => "`char`",
            TokenKind::Str => "`string`",
            TokenKind::Void => "`void`",
            TokenKind::Fn => "`fn`",
            TokenKind::Class => "`class`",
            TokenKind::Prop => "`prop`",
            TokenKind::Init => "`init`",
            TokenKind::Return => "`return`",
            TokenKind::If => "`if`",
            TokenKind::Else => "`else`",
            TokenKind::While => "`while`",
            TokenKind::For => "`for`",
            TokenKind::TypeOf => "`typeOf`",
            TokenKind::Pub => "`pub`",
            TokenKind::Import => "`import`",
            TokenKind::Module => "`module`",
            TokenKind::Required => "`required`",
            TokenKind::Annotation => "`annotation`",
            TokenKind::Null => "`null`",
            TokenKind::Bang => "`!`",
            TokenKind::Plus => "`+`",
            TokenKind::Minus => "`-`",
            TokenKind::Asterisk => "`*`",
            TokenKind::Slash => "`/`",
            TokenKind::Equals => "`=`",
            TokenKind::EqualsEquals => "`==`",
            TokenKind::NotEquals => "`!=`",
            TokenKind::GreaterThan => "`>`",
            TokenKind::GreaterThanEquals => "`>=`",
            TokenKind::LessThan => "`<`",
            TokenKind::LessThanEquals => "`<=`",
            TokenKind::OpenParen => "`(`",
            TokenKind::CloseParen => "`)`",
            TokenKind::OpenBrace => "`{`",
            TokenKind::CloseBrace => "`}`",
            TokenKind::OpenBracket => "`[`",
            TokenKind::CloseBracket => "`]`",
            TokenKind::Comma => "`,`",
            TokenKind::Semi => "`;`",
            TokenKind::Colon => "`:`",
            TokenKind::Dot => "`.`",
            TokenKind::Question => "`?`",
            TokenKind::At => "`@`",
            TokenKind::Ampersand => "`&`",
            TokenKind::Illegal => "illegal character",
            TokenKind::Eof => "end of input",
        };
        f.write_str(name)
    }
}

/// A single token together with the exact slice of source it covers.
#[derive(Debug, Clone, PartialEq)]
pub struct Token<'src> {
    pub kind: TokenKind,
    pub text: &'src str,
    /// Byte range of `text` inside the source.
    pub span: Range<usize>,
    /// 1-based line of the first character.
    pub line: u32,
    /// 1-based column (in characters) of the first character.
    pub column: u32,
}

impl fmt::Display for Token<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind {
            TokenKind::Identifier
            | TokenKind::IntLit
            | TokenKind::FloatLit
            | TokenKind::StringLit
            | TokenKind::CharLit
            | TokenKind::BoolLit
            | TokenKind::Illegal => write!(f, "{} `{}`", self.kind, self.text),
            _ => write!(f, "{}", self.kind),
        }
    }
}

/// Lazy token stream over a source string.
///
/// Whitespace and comments are skipped by the underlying [`logos`] lexer. The line and column
/// counters are advanced over the skipped text on demand, so each token is only scanned twice.
pub struct Lexer<'src> {
    inner: logos::Lexer<'src, TokenKind>,
    source: &'src str,
    /// Byte offset up to which `line` and `column` are up to date.
    cursor: usize,
    line: u32,
    column: u32,
    exhausted: bool,
}

impl<'src> Lexer<'src> {
    pub fn new(source: &'src str) -> Self {
        Self {
            inner: TokenKind::lexer(source),
            source,
            cursor: 0,
            line: 1,
            column: 1,
            exhausted: false,
        }
    }

    /// Returns the next token. Once the input is exhausted, every call returns [`TokenKind::Eof`].
    pub fn next_token(&mut self) -> Token<'src> {
        let kind = if self.exhausted {
            None
        } else {
            self.inner.next()
        };

        match kind {
            Some(kind) => {
                let span = self.inner.span();
                self.advance_to(span.start);
                Token {
                    kind,
                    text: self.inner.slice(),
                    span,
                    line: self.line,
                    column: self.column,
                }
            }
            None => {
                self.exhausted = true;
                let end = self.source.len();
                self.advance_to(end);
                Token {
                    kind: TokenKind::Eof,
                    text: "",
                    span: end..end,
                    line: self.line,
                    column: self.column,
                }
            }
        }
    }

    fn advance_to(&mut self, offset: usize) {
        for ch in self.source[self.cursor..offset].chars() {
            if ch == '\n' {
                self.line += 1;
                self.column = 1;
            } else {
                self.column += 1;
            }
        }
        self.cursor = offset;
    }
}

impl<'src> Iterator for Lexer<'src> {
    type Item = Token<'src>;

    /// Yields every token up to, but not including, [`TokenKind::Eof`].
    fn next(&mut self) -> Option<Self::Item> {
        let token = self.next_token();
        if token.kind == TokenKind::Eof {
            None
        } else {
            Some(token)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(source: &str) -> Vec<TokenKind> {
        Lexer::new(source).map(|token| token.kind).collect()
    }

    #[test]
    fn test_keywords_and_identifiers() {
        assert_eq!(
            kinds("int integer while for typeOf _x this init"),
            vec![
                TokenKind::Int,
                TokenKind::Identifier,
                TokenKind::While,
                TokenKind::For,
                TokenKind::TypeOf,
                TokenKind::Identifier,
                TokenKind::Identifier,
                TokenKind::Init,
            ]
        );
        assert_eq!(
            kinds("pub import module required annotation null"),
            vec![
                TokenKind::Pub,
                TokenKind::Import,
                TokenKind::Module,
                TokenKind::Required,
                TokenKind::Annotation,
                TokenKind::Null,
            ]
        );
    }

    #[test]
    fn test_numbers() {
        assert_eq!(
            kinds("1 12.5 3."),
            vec![TokenKind::IntLit, TokenKind::FloatLit, TokenKind::FloatLit]
        );
    }

    #[test]
    fn test_two_char_operators_win() {
        assert_eq!(
            kinds("== = != ! <= < >= >"),
            vec![
                TokenKind::EqualsEquals,
                TokenKind::Equals,
                TokenKind::NotEquals,
                TokenKind::Bang,
                TokenKind::LessThanEquals,
                TokenKind::LessThan,
                TokenKind::GreaterThanEquals,
                TokenKind::GreaterThan,
            ]
        );
    }

    #[test]
    fn test_strings_and_chars() {
        let tokens: Vec<_> = Lexer::new(r#""hello world" 'c'"#).collect();
        assert_eq!(tokens[0].kind, TokenKind::StringLit);
        assert_eq!(tokens[0].text, "\"hello world\"");
        assert_eq!(tokens[1].kind, TokenKind::CharLit);
        assert_eq!(tokens[1].text, "'c'");
    }

    #[test]
    fn test_comments_and_whitespace_are_transparent() {
        assert_eq!(
            kinds("a // comment ( ) \n\t b"),
            vec![TokenKind::Identifier, TokenKind::Identifier]
        );
    }

    #[test]
    fn test_illegal_character_does_not_stop_stream() {
        assert_eq!(
            kinds("a # b"),
            vec![TokenKind::Identifier, TokenKind::Illegal, TokenKind::Identifier]
        );
    }

    #[test]
    fn test_positions() {
        let tokens: Vec<_> = Lexer::new("int a;\n  a = 1;").collect();
        let positions: Vec<_> = tokens.iter().map(|t| (t.line, t.column)).collect();
        assert_eq!(
            positions,
            vec![(1, 1), (1, 5), (1, 6), (2, 3), (2, 5), (2, 7), (2, 8)]
        );
    }

    #[test]
    fn test_eof_is_idempotent() {
        let mut lexer = Lexer::new("x");
        assert_eq!(lexer.next_token().kind, TokenKind::Identifier);
        for _ in 0..3 {
            let token = lexer.next_token();
            assert_eq!(token.kind, TokenKind::Eof);
            assert_eq!(token.span, 1..1);
        }
    }

    #[test]
    fn test_slices_reproduce_source() {
        let sources = [
            "int a = 10; int b = 5; print(a + b);",
            "class Foo {\n  prop int x;\n  fn bump(): void { x = (x + 1); }\n}",
            "for (int i = 0; (i <= 5); i = (i + 1)) { print('c', \"s\", 1.5); } // done",
            "a != b == !c # @ ? &",
        ];
        for source in sources {
            for token in Lexer::new(source) {
                assert_eq!(&source[token.span.clone()], token.text);
                assert_eq!(token.span.len(), token.text.len());
            }
        }
    }
}
