use crate::ast::BinaryOp;
use crate::parser::{grammar_symbol::ResultList, Parser, Reading};
use crate::token::{Punct, TokenType};

/// One precedence level's operator table: which token matches, and which
/// `BinaryOp` it builds (spec.md §4.4 operator precedence table).
struct OpTable(&'static [(TokenMatch, BinaryOp)]);

#[derive(Clone, Copy)]
enum TokenMatch {
    Punct(Punct),
    Word(&'static str),
}

impl<'a, 'int> Parser<'a, 'int> {
    fn match_operator(&mut self, table: &OpTable) -> Option<BinaryOp> {
        let pos = self.current;
        let token = self.peek().clone();
        for (matcher, op) in table.0 {
            let matched = match matcher {
                TokenMatch::Punct(p) => token.kind == TokenType::Punct(*p),
                TokenMatch::Word(word) => {
                    matches!(&token.kind, TokenType::Identifier(sym) if {
                        use crate::intern::SymbolEq;
                        sym.is(self.interner, word)
                    })
                }
            };
            if matched {
                self.advance();
                return Some(*op);
            }
        }
        self.current = pos;
        None
    }

    /// `ParseBinary(parser, tokens, ops)` (spec.md §4.4): parses one operand
    /// with the lower-level parser, then greedily consumes left-associative
    /// (operator, operand) pairs. Ambiguity from the lower level survives:
    /// every surviving lower-level reading is extended independently.
    fn parse_binary_level(
        &mut self,
        table: &OpTable,
        lower: fn(&mut Self) -> ResultList<'a>,
    ) -> ResultList<'a> {
        let first = lower(self);
        let mut result = ResultList::empty();
        result.error = first.error;

        for reading in first.readings {
            self.current = reading.pos;
            let mut left = reading.expr;
            let mut pos = reading.pos;
            loop {
                self.current = pos;
                let op = self.match_operator(table);
                let op = match op {
                    Some(op) => op,
                    None => break,
                };
                let rhs = lower(self);
                result.error = crate::error::fold(result.error.take(), rhs.error);
                if rhs.readings.is_empty() {
                    // No right-hand operand: back up to before the operator
                    // and stop extending this chain.
                    self.current = pos;
                    break;
                }
                // Left-associative: take the first surviving reading and
                // keep climbing; other readings are folded in as separate
                // top-level results so ambiguity is preserved.
                let mut first_rhs = true;
                for rhs_reading in &rhs.readings {
                    let span = left.span().merge(rhs_reading.expr.span());
                    let combined = self.ctx.binary(op, left, rhs_reading.expr, span);
                    if first_rhs {
                        left = combined;
                        pos = rhs_reading.pos;
                        first_rhs = false;
                    } else {
                        result.readings.push(Reading { pos: rhs_reading.pos, expr: combined });
                    }
                }
            }
            result.readings.push(Reading { pos, expr: left });
        }
        result
    }

    /// Exp1: `*`, `/`.
    pub(crate) fn parse_exp1(&mut self) -> ResultList<'a> {
        const TABLE: OpTable = OpTable(&[(TokenMatch::Punct(Punct::Star), BinaryOp::Mul), (TokenMatch::Punct(Punct::Slash), BinaryOp::Div)]);
        self.parse_binary_level(&TABLE, Self::parse_primitive)
    }

    /// Exp2: `+`, `-`.
    pub(crate) fn parse_exp2(&mut self) -> ResultList<'a> {
        const TABLE: OpTable = OpTable(&[(TokenMatch::Punct(Punct::Plus), BinaryOp::Add), (TokenMatch::Punct(Punct::Minus), BinaryOp::Sub)]);
        self.parse_binary_level(&TABLE, Self::parse_exp1)
    }

    /// Exp3: `&`.
    pub(crate) fn parse_exp3(&mut self) -> ResultList<'a> {
        const TABLE: OpTable = OpTable(&[(TokenMatch::Punct(Punct::Amp), BinaryOp::Concat)]);
        self.parse_binary_level(&TABLE, Self::parse_exp2)
    }

    /// Exp4: `<`, `>`, `<=`, `>=`, `=`, `<>`.
    pub(crate) fn parse_exp4(&mut self) -> ResultList<'a> {
        const TABLE: OpTable = OpTable(&[
            (TokenMatch::Punct(Punct::Lt), BinaryOp::Lt),
            (TokenMatch::Punct(Punct::Gt), BinaryOp::Gt),
            (TokenMatch::Punct(Punct::Le), BinaryOp::Le),
            (TokenMatch::Punct(Punct::Ge), BinaryOp::Ge),
            (TokenMatch::Punct(Punct::Eq), BinaryOp::Eq),
            (TokenMatch::Punct(Punct::Ne), BinaryOp::Ne),
        ]);
        self.parse_binary_level(&TABLE, Self::parse_exp3)
    }

    /// Exp5: `and`.
    pub(crate) fn parse_exp5(&mut self) -> ResultList<'a> {
        const TABLE: OpTable = OpTable(&[(TokenMatch::Word("and"), BinaryOp::And)]);
        self.parse_binary_level(&TABLE, Self::parse_exp4)
    }

    /// Expression (lowest-binding): `or` (spec.md §4.4 `ParseExpression`).
    pub(crate) fn parse_expression(&mut self) -> ResultList<'a> {
        const TABLE: OpTable = OpTable(&[(TokenMatch::Word("or"), BinaryOp::Or)]);
        self.parse_binary_level(&TABLE, Self::parse_exp5)
    }
}
