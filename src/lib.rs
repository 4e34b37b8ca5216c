pub mod arena;
pub mod arena_ctx;
pub mod ast;
#[cfg(feature = "cli")]
pub mod cli;
#[cfg(feature = "cli")]
pub mod config;
pub mod error;
pub mod grammar;
pub mod intern;
pub mod lexer;
pub mod parser;
pub mod token;

pub use arena::Arena;
pub use arena_ctx::ExprContext;
pub use ast::{BinaryOp, Expr, ExpressionLink, HoleOrigin, Literal, UnaryOp};
pub use error::{fold, CodeError, Diagnostic, ErrorKind};
pub use grammar::{
    calculate_unique_id, FragmentBuilder, GrammarFragment, GrammarStack, GrammarStackItem,
    GrammarSymbol, HoleKind, ScopeGuard, SymbolKind, SymbolTarget,
};
pub use intern::{Interner, Symbol, SymbolEq};
pub use lexer::Lexer;
pub use parser::{Parser, ParserGuard, Reading, ResultList};
pub use token::{Punct, Span, Token, TokenType};

/// Lexes and parses one statement using only the built-in grammar symbols
/// (spec.md §6 `FillPredefinedSymbols`). A thin convenience wrapper over the
/// `Parser` API for callers — the CLI, tests — that don't need to thread
/// their own scope (SPEC_FULL.md §12).
pub fn parse_statement<'a>(
    source: &str,
    interner: &mut Interner,
    ctx: ExprContext<'a>,
) -> Result<&'a Expr<'a>, CodeError> {
    let mut stack = GrammarStack::new();
    stack.push(grammar::predefined::fill_predefined_symbols(interner));
    let (tokens, errors) = Lexer::new(source, interner).tokenize();
    if let Some(first) = errors.into_iter().next() {
        return Err(first);
    }
    let mut parser = Parser::new(tokens, interner, stack, ctx);
    parser.parse_statement().map(|result| result.expr)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_statement_parses_a_builtin_sentence() {
        let mut interner = Interner::new();
        let exprs = Arena::new();
        let words = Arena::new();
        let links = Arena::new();
        let ctx = ExprContext::new(&exprs, &words, &links);
        let result = parse_statement("end", &mut interner, ctx);
        assert!(result.is_ok());
    }

    #[test]
    fn parse_statement_reports_lexical_errors() {
        let mut interner = Interner::new();
        let exprs = Arena::new();
        let words = Arena::new();
        let links = Arena::new();
        let ctx = ExprContext::new(&exprs, &words, &links);
        let result = parse_statement("\"unterminated", &mut interner, ctx);
        assert!(result.is_err());
    }
}
