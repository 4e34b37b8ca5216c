use crate::arena::Arena;
use crate::ast::{BinaryOp, Expr, ExpressionLink, HoleOrigin, Literal, UnaryOp};
use crate::grammar::symbol::GrammarSymbol;
use crate::intern::Symbol;
use crate::token::Span;
use std::rc::Rc;

/// Bundles every arena the expression/statement parser allocates into
/// (spec.md §3 "Expression trees are owned by their parent"). One `ExprContext`
/// is created per parse and threaded by reference through the recursive
/// descent, mirroring the teacher's `AstContext` builder-method style.
#[derive(Clone, Copy)]
pub struct ExprContext<'a> {
    exprs: &'a Arena<Expr<'a>>,
    words: &'a Arena<Symbol>,
    links: &'a Arena<ExpressionLink<'a>>,
}

impl<'a> ExprContext<'a> {
    pub fn new(exprs: &'a Arena<Expr<'a>>, words: &'a Arena<Symbol>, links: &'a Arena<ExpressionLink<'a>>) -> Self {
        ExprContext { exprs, words, links }
    }

    pub fn alloc_expr(&self, expr: Expr<'a>) -> &'a Expr<'a> {
        self.exprs.alloc(expr)
    }

    pub fn alloc_exprs<I>(&self, exprs: I) -> &'a [Expr<'a>]
    where
        I: IntoIterator<Item = Expr<'a>>,
        I::IntoIter: ExactSizeIterator,
    {
        self.exprs.alloc_slice(exprs)
    }

    pub fn alloc_words<I>(&self, words: I) -> &'a [Symbol]
    where
        I: IntoIterator<Item = Symbol>,
        I::IntoIter: ExactSizeIterator,
    {
        self.words.alloc_slice(words)
    }

    pub fn alloc_link(&self, link: ExpressionLink<'a>) -> &'a ExpressionLink<'a> {
        self.links.alloc(link)
    }

    pub fn literal(&self, literal: Literal, span: Span) -> &'a Expr<'a> {
        self.exprs.alloc(Expr::Literal(literal, span))
    }

    pub fn argument(&self, words: &'a [Symbol], origin: HoleOrigin, span: Span) -> &'a Expr<'a> {
        self.exprs.alloc(Expr::Argument { words, origin, span })
    }

    pub fn reference(&self, symbol: Rc<GrammarSymbol>, span: Span) -> &'a Expr<'a> {
        self.exprs.alloc(Expr::Reference { symbol, span })
    }

    pub fn invoke(&self, function: &'a Expr<'a>, args: &'a [Expr<'a>], span: Span) -> &'a Expr<'a> {
        self.exprs.alloc(Expr::Invoke { function, args, span })
    }

    pub fn list(&self, items: &'a [Expr<'a>], span: Span) -> &'a Expr<'a> {
        self.exprs.alloc(Expr::List(items, span))
    }

    pub fn unary(&self, op: UnaryOp, operand: &'a Expr<'a>, span: Span) -> &'a Expr<'a> {
        self.exprs.alloc(Expr::Unary { op, operand, span })
    }

    pub fn binary(&self, op: BinaryOp, left: &'a Expr<'a>, right: &'a Expr<'a>, span: Span) -> &'a Expr<'a> {
        self.exprs.alloc(Expr::Binary { op, left, right, span })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grammar::symbol::{SymbolKind, SymbolTarget};
    use crate::intern::Interner;

    #[test]
    fn binary_builder_allocates_binary_expr() {
        let exprs: Arena<Expr> = Arena::new();
        let words: Arena<Symbol> = Arena::new();
        let links: Arena<ExpressionLink> = Arena::new();
        let ctx = ExprContext::new(&exprs, &words, &links);

        let left = ctx.literal(Literal::Integer(1), Span::new(0, 1));
        let right = ctx.literal(Literal::Integer(2), Span::new(2, 3));
        let result = ctx.binary(BinaryOp::Add, left, right, Span::new(0, 3));

        assert!(matches!(result, Expr::Binary { op: BinaryOp::Add, .. }));
    }

    #[test]
    fn reference_builder_carries_grammar_symbol() {
        let exprs: Arena<Expr> = Arena::new();
        let words: Arena<Symbol> = Arena::new();
        let links: Arena<ExpressionLink> = Arena::new();
        let ctx = ExprContext::new(&exprs, &words, &links);

        let interner = Interner::new();
        let symbol = Rc::new(GrammarSymbol::new(Vec::new(), SymbolKind::SENTENCE, SymbolTarget::End, &interner));
        let result = ctx.reference(symbol, Span::new(0, 3));
        assert!(matches!(result, Expr::Reference { .. }));
    }

    #[test]
    fn expression_link_threads_previous() {
        let exprs: Arena<Expr> = Arena::new();
        let words: Arena<Symbol> = Arena::new();
        let links: Arena<ExpressionLink> = Arena::new();
        let ctx = ExprContext::new(&exprs, &words, &links);

        let first = ctx.literal(Literal::Integer(1), Span::new(0, 1));
        let root = ctx.alloc_link(ExpressionLink::root(first));
        let second = ctx.literal(Literal::Integer(2), Span::new(2, 3));
        let extended = root.extend(second);
        assert!(extended.previous.is_some());
    }
}
