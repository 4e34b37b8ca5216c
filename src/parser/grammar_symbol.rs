use std::rc::Rc;

use crate::ast::Expr;
use crate::error::{describe_token, fold, CodeError};
use crate::grammar::{GrammarFragment, GrammarSymbol, HoleKind};
use crate::intern::SymbolEq;
use crate::parser::{Parser, Reading};
use crate::token::TokenType;

/// Every successful parse at this point, plus the single deepest-reaching
/// failure across every alternative tried (spec.md §4.4 `ResultList`).
pub struct ResultList<'a> {
    pub readings: Vec<Reading<'a>>,
    pub error: Option<CodeError>,
}

impl<'a> ResultList<'a> {
    pub fn empty() -> Self {
        ResultList { readings: Vec::new(), error: None }
    }

    pub fn single(pos: usize, expr: &'a Expr<'a>) -> Self {
        ResultList { readings: vec![Reading { pos, expr }], error: None }
    }

    pub fn fail(error: CodeError) -> Self {
        ResultList { readings: Vec::new(), error: Some(error) }
    }

    pub fn is_success(&self) -> bool {
        !self.readings.is_empty()
    }

    /// Combines two independently-tried alternatives: readings concatenate,
    /// errors fold (spec.md §4.4 `FoldError`).
    pub fn merge(mut self, other: ResultList<'a>) -> Self {
        self.readings.extend(other.readings);
        self.error = fold(self.error, other.error);
        self
    }

    pub fn truncated(mut self, max: usize) -> Self {
        self.readings.truncate(max);
        self
    }
}

/// One partial match of a symbol's fragment sequence: the iterator position
/// reached so far, plus the hole expressions collected as arguments.
struct Branch<'a> {
    pos: usize,
    args: Vec<&'a Expr<'a>>,
}

impl<'a, 'int> Parser<'a, 'int> {
    /// Consumes one identifier token matching `literal` case-insensitively
    /// (spec.md §4.4 `ParseToken`).
    pub fn parse_token(&mut self, literal: &str) -> Result<(), CodeError> {
        let pos = self.current;
        let token = self.peek().clone();
        match &token.kind {
            TokenType::Identifier(sym) if sym.is(self.interner, literal) => {
                self.advance();
                Ok(())
            }
            _ => Err(CodeError::expected_token(pos, token.span, format!("'{}'", literal), describe_token(&token))),
        }
    }

    /// Parses one grammar fragment starting at token index `pos`, returning
    /// every continuation (spec.md §4.4 `ParseGrammarFragment`).
    fn parse_grammar_fragment(&mut self, fragment: &GrammarFragment, pos: usize) -> ResultList<'a> {
        let save = self.current;
        self.current = pos;
        let result = match fragment {
            GrammarFragment::Name(words) => {
                let mut ok = true;
                for word in words {
                    let text = self.interner.resolve(*word).to_string();
                    if self.parse_token(&text).is_err() {
                        ok = false;
                        break;
                    }
                }
                if ok {
                    // Names contribute no expression: encode as a literal
                    // placeholder consumed by the caller, which never reads
                    // it back into the argument list for Name fragments.
                    let dummy = self.ctx.literal(crate::ast::Literal::Integer(0), crate::token::Span::new(pos, pos));
                    ResultList::single(self.current, dummy)
                } else {
                    let token = self.peek_at(pos).clone();
                    ResultList::fail(CodeError::expected_token(
                        pos,
                        token.span,
                        "a literal word",
                        describe_token(&token),
                    ))
                }
            }
            GrammarFragment::Hole(HoleKind::Type) => self.parse_type(),
            GrammarFragment::Hole(HoleKind::Primitive) => self.parse_primitive(),
            GrammarFragment::Hole(HoleKind::Expression) => self.parse_expression(),
            GrammarFragment::Hole(HoleKind::List) => self.parse_list(),
            GrammarFragment::Hole(HoleKind::Assignable) => self.parse_assignable(),
            GrammarFragment::Hole(HoleKind::Argument) => self.parse_argument(),
        };
        self.current = save;
        result
    }

    /// Walks `symbol`'s fragments from `begin_fragment`, threading every
    /// surviving branch through each fragment in turn (spec.md §4.4
    /// `ParseGrammarSymbolStep`: "breadth-first enumeration of every
    /// possible way to match the rule").
    fn parse_grammar_symbol_step(
        &mut self,
        symbol: &Rc<GrammarSymbol>,
        begin_fragment: usize,
        seed_args: Vec<&'a Expr<'a>>,
        start_pos: usize,
    ) -> (Vec<Branch<'a>>, Option<CodeError>) {
        let mut branches = vec![Branch { pos: start_pos, args: seed_args }];
        let mut folded_error = None;

        for fragment in &symbol.fragments[begin_fragment..] {
            let mut next_branches = Vec::new();
            for branch in branches {
                let outcome = self.parse_grammar_fragment(fragment, branch.pos);
                folded_error = fold(folded_error, outcome.error);
                let contributes_expr = !matches!(fragment, GrammarFragment::Name(_));
                for reading in outcome.readings {
                    let mut args = branch.args.clone();
                    if contributes_expr {
                        args.push(reading.expr);
                    }
                    next_branches.push(Branch { pos: reading.pos, args });
                }
            }
            branches = next_branches;
            if branches.is_empty() {
                break;
            }
        }

        (branches, folded_error)
    }

    /// Entry point: matches `symbol` in full (or from `begin_fragment` when
    /// a left-recursive parent already consumed the leading primitive hole),
    /// producing `Invoke(Reference(symbol), args)` readings (spec.md §4.4
    /// `ParseGrammarSymbol`).
    pub(crate) fn parse_grammar_symbol(
        &mut self,
        symbol: Rc<GrammarSymbol>,
        begin_fragment: usize,
        previous_expression: Option<&'a Expr<'a>>,
    ) -> ResultList<'a> {
        let start_pos = self.current;
        let seed_args = previous_expression.into_iter().collect::<Vec<_>>();
        let (branches, error) = self.parse_grammar_symbol_step(&symbol, begin_fragment, seed_args, start_pos);

        let mut result = ResultList::empty();
        result.error = error;
        for branch in branches {
            let span = crate::token::Span::new(start_pos, branch.pos);
            let function = self.ctx.reference(symbol.clone(), span);
            let args = self.ctx.alloc_exprs(branch.args.into_iter().cloned().collect::<Vec<_>>());
            let invoke = self.ctx.invoke(function, args, span);
            result.readings.push(Reading { pos: branch.pos, expr: invoke });
        }
        let max = self.max_ambiguous_readings;
        result.truncated(max)
    }
}
