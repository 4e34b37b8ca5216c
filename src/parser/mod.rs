pub mod assignable;
pub mod binary;
pub mod grammar_symbol;
pub mod primitive;
pub mod statement;

use std::ops::{Deref, DerefMut};

use crate::arena_ctx::ExprContext;
use crate::ast::Expr;
use crate::error::CodeError;
use crate::grammar::GrammarStack;
use crate::intern::Interner;
use crate::token::Token;

pub use grammar_symbol::ResultList;

/// A single `(iterator_after, expression)` pair in a `ResultList` (spec.md
/// §4.4: "an ordered sequence of `(iterator_after, expression)` pairs").
#[derive(Clone, Copy)]
pub struct Reading<'a> {
    pub pos: usize,
    pub expr: &'a Expr<'a>,
}

#[derive(Clone, Copy)]
struct ParserCheckpoint {
    pos: usize,
}

/// RAII backtracking guard (teacher pattern: `ParserGuard` in
/// `src/parser/mod.rs`). Restores the token position on drop unless
/// `commit()` was called, so a hole-parser that returns early via `?` can
/// never leave the cursor mid-alternative.
pub struct ParserGuard<'p, 'a, 'int> {
    parser: &'p mut Parser<'a, 'int>,
    checkpoint: ParserCheckpoint,
    committed: bool,
}

impl<'p, 'a, 'int> ParserGuard<'p, 'a, 'int> {
    pub fn commit(mut self) {
        self.committed = true;
    }
}

impl<'p, 'a, 'int> Drop for ParserGuard<'p, 'a, 'int> {
    fn drop(&mut self) {
        if !self.committed {
            self.parser.restore(self.checkpoint);
        }
    }
}

impl<'p, 'a, 'int> Deref for ParserGuard<'p, 'a, 'int> {
    type Target = Parser<'a, 'int>;
    fn deref(&self) -> &Self::Target {
        self.parser
    }
}

impl<'p, 'a, 'int> DerefMut for ParserGuard<'p, 'a, 'int> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        self.parser
    }
}

/// Owns the token cursor, the grammar stack, the interner, and the arenas
/// the parsed tree is allocated into. One `Parser` drives one parse
/// (spec.md §5: "purely single-threaded and synchronous").
pub struct Parser<'a, 'int> {
    pub(crate) tokens: Vec<Token>,
    pub(crate) current: usize,
    pub(crate) interner: &'int mut Interner,
    pub(crate) stack: GrammarStack,
    pub(crate) ctx: ExprContext<'a>,
    pub(crate) max_ambiguous_readings: usize,
}

impl<'a, 'int> Parser<'a, 'int> {
    pub fn new(
        tokens: Vec<Token>,
        interner: &'int mut Interner,
        stack: GrammarStack,
        ctx: ExprContext<'a>,
    ) -> Self {
        Parser { tokens, current: 0, interner, stack, ctx, max_ambiguous_readings: 12 }
    }

    pub fn with_max_ambiguous_readings(mut self, max: usize) -> Self {
        self.max_ambiguous_readings = max;
        self
    }

    fn checkpoint(&self) -> ParserCheckpoint {
        ParserCheckpoint { pos: self.current }
    }

    fn restore(&mut self, cp: ParserCheckpoint) {
        self.current = cp.pos;
    }

    pub fn guard(&mut self) -> ParserGuard<'_, 'a, 'int> {
        ParserGuard { checkpoint: self.checkpoint(), parser: self, committed: false }
    }

    pub(crate) fn peek(&self) -> &Token {
        &self.tokens[self.current.min(self.tokens.len() - 1)]
    }

    pub(crate) fn peek_at(&self, pos: usize) -> &Token {
        &self.tokens[pos.min(self.tokens.len() - 1)]
    }

    pub(crate) fn is_at_end(&self) -> bool {
        matches!(self.peek().kind, crate::token::TokenType::Eof)
    }

    pub(crate) fn advance(&mut self) -> &Token {
        if !self.is_at_end() {
            self.current += 1;
        }
        &self.tokens[self.current - 1]
    }

    pub(crate) fn error_at(&self, pos: usize, err: CodeError) -> CodeError {
        let _ = pos;
        err
    }
}
