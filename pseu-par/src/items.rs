//! Function header and body parsing (spec.md §4.2).

use pseu_lex::TokenKind;
use pseu_util::Span;

use crate::ast::{FunctionDecl, Param};
use crate::Parser;

pub(crate) fn parse_function(p: &mut Parser<'_>) -> Option<FunctionDecl> {
    let start = p.current_span();
    p.bump(); // FUNCTION
    let (name, _) = p.expect_ident()?;
    p.expect(TokenKind::LParen);
    let mut params = Vec::new();
    if !matches!(p.current(), TokenKind::RParen) {
        loop {
            match parse_param(p) {
                Some(param) => params.push(param),
                None => p.panic_comma(),
            }
            if !p.eat(&TokenKind::Comma) {
                break;
            }
        }
    }
    p.expect(TokenKind::RParen);
    let return_type = if p.eat(&TokenKind::Colon) {
        p.expect_ident().map(|(sym, _)| sym)
    } else {
        None
    };
    p.end_statement();
    let body = p.parse_block_until(|kind| matches!(kind, TokenKind::EndFunction));
    let end = p.current_span();
    p.expect(TokenKind::EndFunction);
    let span = Span::new(start.start, end.end, start.line, start.column);
    p.end_statement();
    Some(FunctionDecl { name, params, return_type, body, span })
}

fn parse_param(p: &mut Parser<'_>) -> Option<Param> {
    let (name, span) = p.expect_ident()?;
    p.expect(TokenKind::Colon);
    let (ty, ty_span) = p.expect_ident()?;
    let full = Span::new(span.start, ty_span.end, span.line, span.column);
    Some(Param { name, ty, span: full })
}

#[cfg(test)]
mod tests {
    use pseu_util::{Handler, SymbolInterner};

    use crate::ast::Stmt;
    use crate::Parser;

    #[test]
    fn function_header_with_params_and_return_type() {
        let src = "FUNCTION ADD(A : INTEGER, B : INTEGER) : INTEGER\nRETURN A + B\nENDFUNCTION\n";
        let mut handler = Handler::new();
        let mut interner = SymbolInterner::new();
        let mut parser = Parser::new(src, &mut handler, &mut interner);
        let ast = parser.parse_program();
        assert_eq!(handler.error_count(), 0);
        match &ast.root[0] {
            Stmt::Function(decl) => {
                assert_eq!(decl.params.len(), 2);
                assert!(decl.return_type.is_some());
                assert_eq!(decl.body.len(), 1);
            }
            other => panic!("expected Function, got {other:?}"),
        }
    }

    #[test]
    fn function_without_return_type_is_allowed() {
        let src = "FUNCTION GREET(NAME : STRING)\nOUTPUT NAME\nENDFUNCTION\n";
        let mut handler = Handler::new();
        let mut interner = SymbolInterner::new();
        let mut parser = Parser::new(src, &mut handler, &mut interner);
        let ast = parser.parse_program();
        assert_eq!(handler.error_count(), 0);
        match &ast.root[0] {
            Stmt::Function(decl) => assert!(decl.return_type.is_none()),
            other => panic!("expected Function, got {other:?}"),
        }
    }
}
