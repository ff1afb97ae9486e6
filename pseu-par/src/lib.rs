//! pseu-par - recursive-descent parser with precedence climbing
//! (spec.md §4.2). Produces the [`ast::Ast`] that `pseu-bc` compiles.

pub mod ast;
mod expr;
mod items;
mod stmt;

use pseu_lex::{Lexer, Token, TokenKind};
use pseu_util::{diagnostic::*, Handler, Span, Symbol, SymbolInterner};

use ast::{Ast, Block, Stmt};

pub struct Parser<'a> {
    lexer: Lexer<'a>,
    current: Token,
    handler: &'a mut Handler,
    interner: &'a mut SymbolInterner,
}

impl<'a> Parser<'a> {
    pub fn new(source: &'a str, handler: &'a mut Handler, interner: &'a mut SymbolInterner) -> Self {
        let mut lexer = Lexer::new(source);
        let current = lexer.next();
        Self { lexer, current, handler, interner }
    }

    /// Parses the whole source buffer as a root block (spec.md §4.2
    /// grammar: `root-block = { root-statement }`).
    pub fn parse_program(&mut self) -> Ast {
        let root = self.parse_block_until(|kind| matches!(kind, TokenKind::Eof));
        Ast { root }
    }

    pub fn error_count(&self) -> usize {
        self.handler.error_count()
    }

    // -- token stream plumbing -------------------------------------------------

    pub(crate) fn current(&self) -> &TokenKind {
        &self.current.kind
    }

    pub(crate) fn current_span(&self) -> Span {
        self.current.span
    }

    /// Advances to the next non-error token, reporting every error token
    /// encountered along the way (spec.md §4.1/§4.2: the lexer only
    /// classifies, the parser gives the message).
    pub(crate) fn bump(&mut self) -> Token {
        let next = loop {
            let tok = self.lexer.next();
            if let Some(msg) = error_message(&tok.kind) {
                self.handler.error_coded(msg, tok.span, error_code(&tok.kind));
                continue;
            }
            break tok;
        };
        std::mem::replace(&mut self.current, next)
    }

    pub(crate) fn intern(&mut self, s: &str) -> Symbol {
        self.interner.intern(s)
    }

    pub(crate) fn eat(&mut self, kind: &TokenKind) -> bool {
        if self.current.kind == *kind {
            self.bump();
            true
        } else {
            false
        }
    }

    pub(crate) fn expect(&mut self, kind: TokenKind) -> Span {
        let span = self.current_span();
        if self.current.kind == kind {
            self.bump();
        } else {
            self.handler.error_coded(
                format!("expected {:?}, found {:?}", kind, self.current.kind),
                span,
                E_PARSE_EXPECTED_TOKEN,
            );
        }
        span
    }

    pub(crate) fn expect_ident(&mut self) -> Option<(Symbol, Span)> {
        let span = self.current_span();
        if let TokenKind::Ident(name) = self.current.kind.clone() {
            self.bump();
            Some((self.intern(&name), span))
        } else {
            self.handler.error_coded(
                format!("expected identifier, found {:?}", self.current.kind),
                span,
                E_PARSE_EXPECTED_TOKEN,
            );
            None
        }
    }

    /// Skips blank-line tokens (spec.md grammar's `empty` root-statement
    /// / function-body alternative).
    pub(crate) fn skip_blank_lines(&mut self) {
        while matches!(self.current.kind, TokenKind::Newline) {
            self.bump();
        }
    }

    /// `panic_comma` recovery (spec.md §4.2): skip to the next comma,
    /// newline, or EOF. Used inside argument lists.
    pub(crate) fn panic_comma(&mut self) {
        while !matches!(self.current.kind, TokenKind::Comma | TokenKind::Newline | TokenKind::Eof) {
            self.bump();
        }
    }

    /// `panic_statement` recovery: skip to the next newline or EOF.
    pub(crate) fn panic_statement(&mut self) {
        while !matches!(self.current.kind, TokenKind::Newline | TokenKind::Eof) {
            self.bump();
        }
    }

    /// Consumes the statement terminator (a newline or EOF); mismatches
    /// trigger `panic_statement` recovery rather than aborting the parse.
    pub(crate) fn end_statement(&mut self) {
        match self.current.kind {
            TokenKind::Newline => {
                self.bump();
            }
            TokenKind::Eof => {}
            _ => {
                let span = self.current_span();
                self.handler.error_coded(
                    format!("expected end of statement, found {:?}", self.current.kind),
                    span,
                    E_PARSE_EXPECTED_TOKEN,
                );
                self.panic_statement();
                self.eat(&TokenKind::Newline);
            }
        }
    }

    /// Parses statements until `stop` matches the current token kind,
    /// consuming blank lines in between.
    pub(crate) fn parse_block_until(&mut self, stop: impl Fn(&TokenKind) -> bool) -> Block {
        let mut stmts = Vec::new();
        loop {
            self.skip_blank_lines();
            if stop(&self.current.kind) || matches!(self.current.kind, TokenKind::Eof) {
                break;
            }
            match self.parse_stmt() {
                Some(stmt) => stmts.push(stmt),
                None => {
                    self.panic_statement();
                    self.eat(&TokenKind::Newline);
                }
            }
        }
        stmts
    }

    pub(crate) fn parse_stmt(&mut self) -> Option<Stmt> {
        stmt::parse_stmt(self)
    }
}

fn error_message(kind: &TokenKind) -> Option<String> {
    match kind {
        TokenKind::ErrInvalidHex => Some("invalid hexadecimal literal".into()),
        TokenKind::ErrInvalidExponent => Some("invalid exponent in real literal".into()),
        TokenKind::ErrUnterminatedString => Some("unterminated string literal".into()),
        TokenKind::ErrUnknownChar(c) => Some(format!("unknown character '{c}'")),
        _ => None,
    }
}

fn error_code(kind: &TokenKind) -> DiagnosticCode {
    match kind {
        TokenKind::ErrInvalidHex => E_LEX_INVALID_HEX,
        TokenKind::ErrInvalidExponent => E_LEX_INVALID_EXPONENT,
        TokenKind::ErrUnterminatedString => E_LEX_UNTERMINATED_STRING,
        TokenKind::ErrUnknownChar(_) => E_LEX_UNKNOWN_CHAR,
        _ => unreachable!(),
    }
}

pub fn parse(source: &str, handler: &mut Handler, interner: &mut SymbolInterner) -> Ast {
    let mut parser = Parser::new(source, handler, interner);
    parser.parse_program()
}
