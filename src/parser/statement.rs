use crate::ast::collect_new_assignable;
use crate::error::{fold, CodeError};
use crate::grammar::{GrammarStackItem, SymbolKind};
use crate::parser::{Parser, Reading};
use crate::token::TokenType;

/// One parsed statement: the committed expression tree plus whether it
/// opened a block body (already consumed, including the matching `Dedent`).
pub struct StatementResult<'a> {
    pub expr: &'a crate::ast::Expr<'a>,
}

impl<'a, 'int> Parser<'a, 'int> {
    /// Looks up every Sentence/Block symbol visible at the current scope,
    /// attempts each, and returns the unique reading that reaches the
    /// statement terminator (spec.md §4.4 `ParseStatement`).
    pub fn parse_statement(&mut self) -> Result<StatementResult<'a>, CodeError> {
        let start = self.current;
        let candidates = self.stack.lookup_kind(SymbolKind::SENTENCE | SymbolKind::BLOCK);

        let mut complete: Vec<(Reading<'a>, bool)> = Vec::new();
        let mut folded_error: Option<CodeError> = None;

        for symbol in &candidates {
            self.current = start;
            let is_block = symbol.kind.contains(SymbolKind::BLOCK);
            let attempt = self.parse_grammar_symbol(symbol.clone(), 0, None);
            folded_error = fold(folded_error, attempt.error);
            for reading in attempt.readings {
                self.current = reading.pos;
                if self.peek().kind == TokenType::Newline {
                    complete.push((Reading { pos: reading.pos, expr: reading.expr }, is_block));
                } else if !is_block {
                    folded_error = fold(
                        folded_error,
                        Some(CodeError::expected_token(
                            reading.pos,
                            self.peek().span,
                            "end of statement",
                            crate::error::describe_token(self.peek()),
                        )),
                    );
                }
            }
        }

        if complete.is_empty() {
            self.current = start;
            return Err(folded_error.unwrap_or_else(|| CodeError::no_match(start, self.peek().span)));
        }

        if complete.len() > 1 {
            let unique_ids: Vec<String> = complete
                .iter()
                .filter_map(|(reading, _)| statement_unique_id(reading.expr))
                .collect();
            self.current = start;
            return Err(CodeError::ambiguity(start, self.peek().span, unique_ids));
        }

        let (committed, committed_is_block) = complete.remove(0);
        self.current = committed.pos;
        self.advance(); // consume the Newline terminator.

        let mut new_assignables = Vec::new();
        let mut new_arguments = Vec::new();
        collect_new_assignable(committed.expr, &mut new_assignables, &mut new_arguments);
        for words in new_assignables.into_iter().chain(new_arguments) {
            let mut builder = crate::grammar::FragmentBuilder::new();
            for word in words {
                builder.name(*word);
            }
            let new_symbol = crate::grammar::GrammarSymbol::new(
                builder.finish(),
                SymbolKind::SYMBOL,
                crate::grammar::SymbolTarget::Custom,
                self.interner,
            );
            if self.stack.lookup_unique_id(&new_symbol.unique_id).is_none() {
                // Inserted into the innermost already-pushed scope, not via
                // its own push — a push per statement with no matching pop
                // would leave the stack deeper after every committed
                // statement (spec.md §4.5, §8 invariant 3).
                self.stack.insert_into_top(new_symbol);
            }
        }

        if committed_is_block {
            self.parse_block_body()?;
        }

        Ok(StatementResult { expr: committed.expr })
    }

    /// Parses a nested block body: `Indent`, zero or more statements, then
    /// `Dedent` (spec.md §4.5: "entering a block pushes a scope ... leaving
    /// pops it").
    ///
    /// A statement that fails to parse does not abort the rest of the block
    /// (spec.md §7: "no error aborts parsing of subsequent statements ... the
    /// user sees all statement-level failures at once"): its error is folded
    /// into an accumulated diagnostic and the parser resumes at the next
    /// statement boundary, so every statement in the block gets a chance to
    /// run before any failure is reported.
    fn parse_block_body(&mut self) -> Result<(), CodeError> {
        if self.peek().kind != TokenType::Indent {
            return Ok(());
        }
        self.advance();
        self.stack.push(GrammarStackItem::new());
        let mut folded_error: Option<CodeError> = None;
        while self.peek().kind != TokenType::Dedent && self.peek().kind != TokenType::Eof {
            if let Err(err) = self.parse_statement() {
                folded_error = fold(folded_error, Some(err));
                self.recover_to_next_statement();
            }
        }
        if self.peek().kind == TokenType::Dedent {
            self.advance();
        }
        self.stack.pop();
        match folded_error {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }

    /// Advances past the rest of a failed statement, stopping at the next
    /// `Newline` that belongs to this block (not one nested inside a further
    /// indented sub-block the failed statement may have started opening).
    fn recover_to_next_statement(&mut self) {
        let mut depth: i32 = 0;
        loop {
            match self.peek().kind {
                TokenType::Eof => break,
                TokenType::Dedent if depth == 0 => break,
                TokenType::Dedent => {
                    depth -= 1;
                    self.advance();
                }
                TokenType::Indent => {
                    depth += 1;
                    self.advance();
                }
                TokenType::Newline if depth == 0 => {
                    self.advance();
                    break;
                }
                _ => {
                    self.advance();
                }
            }
        }
    }
}

fn statement_unique_id<'a>(expr: &'a crate::ast::Expr<'a>) -> Option<String> {
    match expr {
        crate::ast::Expr::Invoke { function, .. } => match function {
            crate::ast::Expr::Reference { symbol, .. } => Some(symbol.unique_id.clone()),
            _ => None,
        },
        _ => None,
    }
}
