use crate::intern::Symbol;
use crate::grammar::symbol::GrammarSymbol;
use crate::token::Span;
use std::rc::Rc;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnaryOp {
    Positive,
    Negative,
    Not,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryOp {
    Concat,
    Add,
    Sub,
    Mul,
    Div,
    Lt,
    Gt,
    Le,
    Ge,
    Eq,
    Ne,
    And,
    Or,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Literal {
    Integer(i64),
    Float(f64),
    String(Symbol),
}

/// Which hole produced a freshly-introduced name sequence (spec.md §4.4:
/// "An `argument` hole always registers a new symbol"; an `assignable` hole
/// does so only when no existing reference matches). `CollectNewAssignable`
/// routes an `Expr::Argument` node into one of two buckets based on this tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HoleOrigin {
    Assignable,
    Argument,
}

/// Tagged union of expression/statement tree nodes (spec.md §3). Arena
/// allocated: children are `&'a Expr<'a>` / `&'a [Expr<'a>]`, never owned,
/// so the tree is free to build without a central allocator bookkeeping
/// parent/child drops.
#[derive(Debug, Clone)]
pub enum Expr<'a> {
    Literal(Literal, Span),
    /// Name tokens of a freshly-introduced symbol (spec.md §3 "Argument").
    Argument { words: &'a [Symbol], origin: HoleOrigin, span: Span },
    /// Non-owning link to a `GrammarSymbol` already in the grammar stack.
    Reference { symbol: Rc<GrammarSymbol>, span: Span },
    Invoke { function: &'a Expr<'a>, args: &'a [Expr<'a>], span: Span },
    List(&'a [Expr<'a>], Span),
    Unary { op: UnaryOp, operand: &'a Expr<'a>, span: Span },
    Binary { op: BinaryOp, left: &'a Expr<'a>, right: &'a Expr<'a>, span: Span },
}

impl<'a> Expr<'a> {
    pub fn span(&self) -> Span {
        match self {
            Expr::Literal(_, span) => *span,
            Expr::Argument { span, .. } => *span,
            Expr::Reference { span, .. } => *span,
            Expr::Invoke { span, .. } => *span,
            Expr::List(_, span) => *span,
            Expr::Unary { span, .. } => *span,
            Expr::Binary { span, .. } => *span,
        }
    }

    /// An expression is addressable — legal in an `assignable` position that
    /// resolves to an *existing* target — when it is a reference, a field
    /// access, or an array-item access (spec.md §4.4 `CountStatementAssignables`).
    pub fn is_addressable(&self) -> bool {
        match self {
            Expr::Reference { .. } => true,
            Expr::Invoke { function, .. } => {
                matches!(function, Expr::Reference { symbol, .. }
                    if matches!(
                        symbol.target,
                        crate::grammar::symbol::SymbolTarget::GetField
                            | crate::grammar::symbol::SymbolTarget::GetArrayItem
                    ))
            }
            _ => false,
        }
    }
}

/// A cons-list node threading the growing left-recursive primitive receiver
/// through successive phrase extensions without mutation (spec.md §3
/// `ExpressionLink`).
#[derive(Debug, Clone)]
pub struct ExpressionLink<'a> {
    pub expression: &'a Expr<'a>,
    pub previous: Option<&'a ExpressionLink<'a>>,
}

impl<'a> ExpressionLink<'a> {
    pub fn root(expression: &'a Expr<'a>) -> Self {
        ExpressionLink { expression, previous: None }
    }

    pub fn extend(&'a self, expression: &'a Expr<'a>) -> ExpressionLink<'a> {
        ExpressionLink { expression, previous: Some(self) }
    }
}

/// Walks `expr`'s children, appending every `Argument` node's words into the
/// bucket matching its `HoleOrigin` (spec.md §4.4 `CollectNewAssignable`).
pub fn collect_new_assignable<'a>(
    expr: &Expr<'a>,
    new_assignables: &mut Vec<&'a [Symbol]>,
    new_arguments: &mut Vec<&'a [Symbol]>,
) {
    match expr {
        Expr::Argument { words, origin, .. } => match origin {
            HoleOrigin::Assignable => new_assignables.push(words),
            HoleOrigin::Argument => new_arguments.push(words),
        },
        Expr::Invoke { function, args, .. } => {
            collect_new_assignable(function, new_assignables, new_arguments);
            for arg in *args {
                collect_new_assignable(arg, new_assignables, new_arguments);
            }
        }
        Expr::List(items, _) => {
            for item in *items {
                collect_new_assignable(item, new_assignables, new_arguments);
            }
        }
        Expr::Unary { operand, .. } => collect_new_assignable(operand, new_assignables, new_arguments),
        Expr::Binary { left, right, .. } => {
            collect_new_assignable(left, new_assignables, new_arguments);
            collect_new_assignable(right, new_assignables, new_arguments);
        }
        Expr::Literal(..) | Expr::Reference { .. } => {}
    }
}
