//! Statement parsers (spec.md §4.2 grammar).

use pseu_lex::TokenKind;
use pseu_util::Span;

use crate::ast::Stmt;
use crate::Parser;

pub(crate) fn parse_stmt(p: &mut Parser<'_>) -> Option<Stmt> {
    match p.current() {
        TokenKind::Declare => parse_decl(p),
        TokenKind::Output => parse_output(p),
        TokenKind::If => parse_if(p),
        TokenKind::While => parse_while(p),
        TokenKind::Return => parse_return(p),
        TokenKind::Function => crate::items::parse_function(p).map(Stmt::Function),
        TokenKind::Ident(_) => parse_assign(p),
        _ => {
            let span = p.current_span();
            p.handler.error_coded(
                format!("unexpected statement, found {:?}", p.current()),
                span,
                pseu_util::diagnostic::E_PARSE_UNEXPECTED_STMT,
            );
            None
        }
    }
}

fn parse_decl(p: &mut Parser<'_>) -> Option<Stmt> {
    let start = p.current_span();
    p.bump(); // DECLARE
    let (name, _) = p.expect_ident()?;
    p.expect(TokenKind::Colon);
    let (ty, ty_span) = p.expect_ident()?;
    let span = Span::new(start.start, ty_span.end, start.line, start.column);
    p.end_statement();
    Some(Stmt::Decl { name, ty, span })
}

/// Assignment is the only statement that begins with a bare identifier
/// (spec.md §4.2): the parser reads the identifier, then peeks one
/// token; anything other than `<-` means the identifier was not valid
/// at statement position.
fn parse_assign(p: &mut Parser<'_>) -> Option<Stmt> {
    let start = p.current_span();
    let (name, name_span) = p.expect_ident()?;
    if !matches!(p.current(), TokenKind::Assign) {
        p.handler.error_coded(
            format!("expected '<-' after identifier, found {:?}", p.current()),
            p.current_span(),
            pseu_util::diagnostic::E_PARSE_UNEXPECTED_STMT,
        );
        let _ = name_span;
        return None;
    }
    p.bump(); // '<-'
    let expr = p.parse_expr()?;
    let span = Span::new(start.start, expr.span().end, start.line, start.column);
    p.end_statement();
    Some(Stmt::Assign { name, expr, span })
}

fn parse_output(p: &mut Parser<'_>) -> Option<Stmt> {
    let start = p.current_span();
    p.bump(); // OUTPUT
    let expr = p.parse_expr()?;
    let span = Span::new(start.start, expr.span().end, start.line, start.column);
    p.end_statement();
    Some(Stmt::Output { expr, span })
}

fn parse_if(p: &mut Parser<'_>) -> Option<Stmt> {
    let start = p.current_span();
    p.bump(); // IF
    let cond = p.parse_expr()?;
    p.expect(TokenKind::Then);
    p.end_statement();
    let then_block = p.parse_block_until(|kind| matches!(kind, TokenKind::Else | TokenKind::EndIf));
    let else_block = if p.eat(&TokenKind::Else) {
        p.end_statement();
        Some(p.parse_block_until(|kind| matches!(kind, TokenKind::EndIf)))
    } else {
        None
    };
    let end = p.current_span();
    p.expect(TokenKind::EndIf);
    let span = Span::new(start.start, end.end, start.line, start.column);
    p.end_statement();
    Some(Stmt::If { cond, then_block, else_block, span })
}

fn parse_while(p: &mut Parser<'_>) -> Option<Stmt> {
    let start = p.current_span();
    p.bump(); // WHILE
    let cond = p.parse_expr()?;
    p.end_statement();
    let body = p.parse_block_until(|kind| matches!(kind, TokenKind::EndWhile));
    let end = p.current_span();
    p.expect(TokenKind::EndWhile);
    let span = Span::new(start.start, end.end, start.line, start.column);
    p.end_statement();
    Some(Stmt::While { cond, body, span })
}

fn parse_return(p: &mut Parser<'_>) -> Option<Stmt> {
    let start = p.current_span();
    p.bump(); // RETURN
    let expr = p.parse_expr()?;
    let span = Span::new(start.start, expr.span().end, start.line, start.column);
    p.end_statement();
    Some(Stmt::Return { expr, span })
}

#[cfg(test)]
mod tests {
    use pseu_util::{Handler, SymbolInterner};

    use crate::ast::Stmt;
    use crate::Parser;

    fn parse_program(src: &str) -> (Vec<Stmt>, usize) {
        let mut handler = Handler::new();
        let mut interner = SymbolInterner::new();
        let mut parser = Parser::new(src, &mut handler, &mut interner);
        let ast = parser.parse_program();
        (ast.root, handler.error_count())
    }

    #[test]
    fn declare_assign_output_round_trip() {
        let (stmts, errs) = parse_program("DECLARE X : INTEGER\nX <- 41\nOUTPUT X\n");
        assert_eq!(errs, 0);
        assert_eq!(stmts.len(), 3);
        assert!(matches!(stmts[0], Stmt::Decl { .. }));
        assert!(matches!(stmts[1], Stmt::Assign { .. }));
        assert!(matches!(stmts[2], Stmt::Output { .. }));
    }

    #[test]
    fn if_else_endif_nests_blocks() {
        let src = "IF TRUE THEN\nOUTPUT 1\nELSE\nOUTPUT 2\nENDIF\n";
        let (stmts, errs) = parse_program(src);
        assert_eq!(errs, 0);
        match &stmts[0] {
            Stmt::If { then_block, else_block, .. } => {
                assert_eq!(then_block.len(), 1);
                assert_eq!(else_block.as_ref().unwrap().len(), 1);
            }
            other => panic!("expected If, got {other:?}"),
        }
    }

    #[test]
    fn while_endwhile_parses_body() {
        let (stmts, errs) = parse_program("WHILE TRUE\nOUTPUT 1\nENDWHILE\n");
        assert_eq!(errs, 0);
        assert!(matches!(stmts[0], Stmt::While { .. }));
    }

    #[test]
    fn bare_identifier_without_assign_is_an_error() {
        let (_, errs) = parse_program("X\n");
        assert!(errs > 0);
    }
}
