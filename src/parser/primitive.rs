use crate::ast::{Literal, UnaryOp};
use crate::error::CodeError;
use crate::grammar::SymbolKind;
use crate::intern::SymbolEq;
use crate::parser::{grammar_symbol::ResultList, Parser};
use crate::token::{Punct, TokenType};

impl<'a, 'int> Parser<'a, 'int> {
    /// Type hole: matches one of the TYPE-kind symbols in scope
    /// (spec.md §4.4 `ParseType`).
    pub(crate) fn parse_type(&mut self) -> ResultList<'a> {
        self.try_every_symbol_of_kind(SymbolKind::TYPE)
    }

    fn try_every_symbol_of_kind(&mut self, kind: SymbolKind) -> ResultList<'a> {
        let candidates = self.stack.lookup_kind(kind);
        let mut result = ResultList::empty();
        for symbol in candidates {
            let attempt = self.parse_grammar_symbol(symbol, 0, None);
            result = result.merge(attempt);
        }
        result
    }

    /// Stage 1 of `ParsePrimitive` (spec.md §4.4): a literal, a parenthesized
    /// expression, a unary operator applied to a primitive, or a phrase/symbol
    /// whose first fragment is *not* a Primitive hole.
    fn parse_short_primitive(&mut self) -> ResultList<'a> {
        let pos = self.current;
        let token = self.peek().clone();

        let literal_result = match &token.kind {
            TokenType::Integer(value) => {
                self.advance();
                let expr = self.ctx.literal(Literal::Integer(*value), token.span);
                Some(ResultList::single(self.current, expr))
            }
            TokenType::Float(value) => {
                self.advance();
                let expr = self.ctx.literal(Literal::Float(*value), token.span);
                Some(ResultList::single(self.current, expr))
            }
            TokenType::String(sym) => {
                self.advance();
                let expr = self.ctx.literal(Literal::String(*sym), token.span);
                Some(ResultList::single(self.current, expr))
            }
            _ => None,
        };
        if let Some(result) = literal_result {
            return result;
        }

        let mut result = ResultList::empty();

        // Parenthesized expression.
        if matches!(token.kind, TokenType::Punct(Punct::LParen)) {
            self.current = pos;
            let paren = self.parse_parenthesized();
            result = result.merge(paren);
        }

        // Unary operator applied to a primitive.
        self.current = pos;
        let unary = self.parse_unary_primitive();
        result = result.merge(unary);

        // Phrase/symbol whose first fragment is not a Primitive hole.
        self.current = pos;
        let candidates: Vec<_> = self
            .stack
            .lookup_kind(SymbolKind::PHRASE | SymbolKind::SYMBOL)
            .into_iter()
            .filter(|s| !s.first_fragment_is_primitive_hole())
            .collect();
        for symbol in candidates {
            self.current = pos;
            let attempt = self.parse_grammar_symbol(symbol, 0, None);
            result = result.merge(attempt);
        }

        result
    }

    fn parse_parenthesized(&mut self) -> ResultList<'a> {
        let pos = self.current;
        if self.advance_punct(Punct::LParen).is_err() {
            let token = self.peek().clone();
            return ResultList::fail(CodeError::expected_token(pos, token.span, "'('", crate::error::describe_token(&token)));
        }
        let inner = self.parse_expression();
        let mut out = ResultList::empty();
        for reading in inner.readings {
            let save = self.current;
            self.current = reading.pos;
            if self.advance_punct(Punct::RParen).is_ok() {
                out.readings.push(crate::parser::Reading { pos: self.current, expr: reading.expr });
            } else {
                let token = self.peek().clone();
                out.error = crate::error::fold(
                    out.error,
                    Some(CodeError::expected_token(reading.pos, token.span, "')'", crate::error::describe_token(&token))),
                );
            }
            self.current = save;
        }
        out.error = crate::error::fold(out.error, inner.error);
        out
    }

    fn parse_unary_primitive(&mut self) -> ResultList<'a> {
        let pos = self.current;
        let token = self.peek().clone();
        let op = match &token.kind {
            TokenType::Punct(Punct::Plus) => Some(UnaryOp::Positive),
            TokenType::Punct(Punct::Minus) => Some(UnaryOp::Negative),
            TokenType::Identifier(sym) if sym.is(self.interner, "not") => Some(UnaryOp::Not),
            _ => None,
        };
        let op = match op {
            Some(op) => op,
            None => return ResultList::fail(CodeError::no_match(pos, token.span)),
        };
        self.advance();
        let operand = self.parse_primitive();
        let mut out = ResultList::empty();
        for reading in operand.readings {
            let span = token.span.merge(reading.expr.span());
            let expr = self.ctx.unary(op, reading.expr, span);
            out.readings.push(crate::parser::Reading { pos: reading.pos, expr });
        }
        out.error = crate::error::fold(out.error, operand.error);
        out
    }

    fn advance_punct(&mut self, punct: Punct) -> Result<(), CodeError> {
        let pos = self.current;
        let token = self.peek().clone();
        if token.kind == TokenType::Punct(punct) {
            self.advance();
            Ok(())
        } else {
            Err(CodeError::expected_token(pos, token.span, format!("{:?}", punct), crate::error::describe_token(&token)))
        }
    }

    /// Stage 2 of `ParsePrimitive`: extends every short-primitive result to a
    /// fixed point by trying every Phrase symbol whose first fragment *is* a
    /// Primitive hole, entered at fragment index 1 (spec.md §4.4
    /// "Extension iterates to a fixed point").
    pub(crate) fn parse_primitive(&mut self) -> ResultList<'a> {
        let start_pos = self.current;
        let short = self.parse_short_primitive();
        let mut accumulated = ResultList::empty();
        accumulated.error = short.error;

        let mut frontier = short.readings;
        accumulated.readings.extend(frontier.iter().copied());

        loop {
            let extenders: Vec<_> = self
                .stack
                .lookup_kind(SymbolKind::PHRASE)
                .into_iter()
                .filter(|s| s.first_fragment_is_primitive_hole())
                .collect();
            if extenders.is_empty() || frontier.is_empty() {
                break;
            }
            let mut next_frontier = Vec::new();
            for reading in &frontier {
                self.current = reading.pos;
                for symbol in &extenders {
                    self.current = reading.pos;
                    let attempt = self.parse_grammar_symbol(symbol.clone(), 1, Some(reading.expr));
                    accumulated.error = crate::error::fold(accumulated.error.take(), attempt.error);
                    for r in &attempt.readings {
                        next_frontier.push(*r);
                        accumulated.readings.push(*r);
                    }
                }
            }
            if next_frontier.is_empty() {
                break;
            }
            frontier = next_frontier;
        }

        self.current = start_pos;
        accumulated.truncated(self.max_ambiguous_readings)
    }
}
