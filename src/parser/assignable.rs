use crate::ast::{Expr, HoleOrigin};
use crate::error::{fold, CodeError};
use crate::parser::{grammar_symbol::ResultList, Parser, Reading};
use crate::token::{Punct, Span, TokenType};

impl<'a, 'int> Parser<'a, 'int> {
    /// List hole: one or more comma-separated expressions
    /// (spec.md §3 "List (ordered elements; used for tuple/list holes)").
    pub(crate) fn parse_list(&mut self) -> ResultList<'a> {
        let start = self.current;
        let first = self.parse_expression();
        let mut result = ResultList::empty();
        result.error = first.error;

        for reading in &first.readings {
            self.current = reading.pos;
            let mut items = vec![*reading.expr];
            let mut pos = reading.pos;
            loop {
                let token = self.peek().clone();
                if token.kind != TokenType::Punct(Punct::Comma) {
                    break;
                }
                self.advance();
                let next = self.parse_expression();
                result.error = fold(result.error.take(), next.error.clone());
                match next.readings.first() {
                    Some(r) => {
                        items.push(*r.expr);
                        pos = r.pos;
                        self.current = pos;
                    }
                    None => break,
                }
            }
            let span = Span::new(start, pos);
            let slice = self.ctx.alloc_exprs(items);
            let list = self.ctx.list(slice, span);
            result.readings.push(Reading { pos, expr: list });
        }
        result
    }

    /// An `assignable` hole matches either an existing addressable expression
    /// (reference, field access, array access) or a fresh identifier-word
    /// sequence that will be registered as a new symbol on statement commit
    /// (spec.md §4.4 "Assignable vs Argument"; original header: "create a new
    /// symbol in the containing block if the assignable does not exist").
    /// When a fresh-name reading spans exactly the same tokens as an
    /// addressable reading, the addressable one wins — a word sequence that
    /// already resolves to something real is not also a new variable.
    pub(crate) fn parse_assignable(&mut self) -> ResultList<'a> {
        let pos = self.current;
        let mut result = ResultList::empty();

        self.current = pos;
        let primitive = self.parse_primitive();
        let mut addressable_ends = std::collections::HashSet::new();
        for reading in &primitive.readings {
            if reading.expr.is_addressable() {
                addressable_ends.insert(reading.pos);
                result.readings.push(*reading);
            }
        }
        result.error = primitive.error;

        self.current = pos;
        let mut fresh = self.parse_fresh_name_sequence(HoleOrigin::Assignable);
        fresh.readings.retain(|reading| !addressable_ends.contains(&reading.pos));
        result = result.merge(fresh);

        result
    }

    /// An `argument` hole always registers a new symbol (spec.md §4.4).
    pub(crate) fn parse_argument(&mut self) -> ResultList<'a> {
        self.parse_fresh_name_sequence(HoleOrigin::Argument)
    }

    /// Every prefix length of consecutive identifier tokens starting at the
    /// cursor becomes one candidate reading; the outer grammar match (e.g.
    /// the literal `to` that follows an assignable in `set <assignable> to
    /// <exp>`) is what ultimately picks the right length.
    fn parse_fresh_name_sequence(&mut self, origin: HoleOrigin) -> ResultList<'a> {
        let start = self.current;
        let start_span = self.peek().span;
        let mut word_syms = Vec::new();
        let mut readings = Vec::new();
        let mut cursor = start;

        loop {
            let token = self.peek_at(cursor).clone();
            match &token.kind {
                TokenType::Identifier(sym) => {
                    word_syms.push(*sym);
                    cursor += 1;
                    let span = start_span.merge(token.span);
                    let words = self.ctx.alloc_words(word_syms.clone());
                    let expr = self.ctx.argument(words, origin, span);
                    readings.push(Reading { pos: cursor, expr });
                }
                _ => break,
            }
        }

        if readings.is_empty() {
            ResultList::fail(CodeError::no_match(start, start_span))
        } else {
            ResultList { readings, error: None }
        }
    }
}

/// Returns how many assignables the chosen reading introduces, or −1 if the
/// `assignable` position is occupied by a valid-but-non-addressable
/// expression (spec.md §4.4 `CountStatementAssignables`).
pub fn count_statement_assignables(expr: &Expr) -> i32 {
    match expr {
        Expr::Argument { origin: HoleOrigin::Assignable, .. } => 1,
        _ if expr.is_addressable() => 0,
        _ => -1,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::arena::Arena;
    use crate::arena_ctx::ExprContext;
    use crate::ast::{Expr, ExpressionLink, Literal};
    use crate::grammar::predefined::fill_predefined_symbols;
    use crate::grammar::GrammarStack;
    use crate::intern::{Interner, Symbol};
    use crate::lexer::Lexer;

    fn parse_assignable<'a>(
        source: &str,
        interner: &'a mut Interner,
        exprs: &'a Arena<Expr<'a>>,
        words: &'a Arena<Symbol>,
        links: &'a Arena<ExpressionLink<'a>>,
    ) -> ResultList<'a> {
        use crate::grammar::{FragmentBuilder, GrammarSymbol, HoleKind, SymbolKind, SymbolTarget};
        let mut stack = GrammarStack::new();
        let mut item = fill_predefined_symbols(interner);
        let mut f_of = FragmentBuilder::new();
        f_of.name(interner.intern("f"));
        f_of.name(interner.intern("of"));
        f_of.hole(HoleKind::Primitive);
        item.insert(GrammarSymbol::new(f_of.finish(), SymbolKind::PHRASE, SymbolTarget::GetField, interner));
        let mut x_sym = FragmentBuilder::new();
        x_sym.name(interner.intern("x"));
        item.insert(GrammarSymbol::new(x_sym.finish(), SymbolKind::SYMBOL, SymbolTarget::Custom, interner));
        stack.push(item);
        let (tokens, _errs) = Lexer::new(source, interner).tokenize();
        let ctx = ExprContext::new(exprs, words, links);
        let mut parser = Parser::new(tokens, interner, stack, ctx);
        parser.parse_assignable()
    }

    #[test]
    fn fresh_identifier_is_a_candidate_new_assignable() {
        let mut interner = Interner::new();
        let exprs = Arena::new();
        let words = Arena::new();
        let links = Arena::new();
        let result = parse_assignable("x", &mut interner, &exprs, &words, &links);
        assert!(result.readings.iter().any(|r| count_statement_assignables(r.expr) == 1));
    }

    #[test]
    fn field_access_reading_is_not_a_new_assignable() {
        let mut interner = Interner::new();
        let exprs = Arena::new();
        let words = Arena::new();
        let links = Arena::new();
        let result = parse_assignable("f of x", &mut interner, &exprs, &words, &links);
        let has_field_access = result.readings.iter().any(|r| count_statement_assignables(r.expr) == 0);
        assert!(has_field_access, "expected a field-access reading with 0 new assignables");
    }

    #[test]
    fn list_hole_collects_comma_separated_items() {
        let mut interner = Interner::new();
        let exprs = Arena::new();
        let words = Arena::new();
        let links = Arena::new();
        let mut stack = GrammarStack::new();
        stack.push(fill_predefined_symbols(&mut interner));
        let (tokens, _errs) = Lexer::new("1, 2, 3", &mut interner).tokenize();
        let ctx = ExprContext::new(&exprs, &words, &links);
        let mut parser = Parser::new(tokens, &mut interner, stack, ctx);
        let result = parser.parse_list();
        assert!(result.is_success());
        assert!(matches!(result.readings[0].expr, Expr::List(items, _) if items.len() == 3));
        let _ = Literal::Integer(0);
    }
}
