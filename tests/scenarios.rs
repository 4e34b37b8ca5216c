//! Integration tests for the parse scenarios in spec.md §8 (S1-S6), each
//! lexing a literal source string, pushing a predefined-symbols scope (plus
//! any ad hoc declarations the scenario needs), and asserting the resulting
//! expression tree shape.

use tinymoe::grammar::predefined::fill_predefined_symbols;
use tinymoe::{
    Arena, BinaryOp, Expr, ExprContext, FragmentBuilder, GrammarStack, GrammarStackItem,
    GrammarSymbol, HoleKind, HoleOrigin, Interner, Lexer, Literal, Parser, SymbolKind,
    SymbolTarget,
};

fn custom_symbol(interner: &mut Interner, word: &str, kind: SymbolKind) -> GrammarSymbol {
    let mut b = FragmentBuilder::new();
    b.name(interner.intern(word));
    GrammarSymbol::new(b.finish(), kind, SymbolTarget::Custom, interner)
}

/// S1: `set x to 1 + 2 * 3` under built-ins only — `x` is a fresh assignable.
#[test]
fn s1_set_registers_a_fresh_assignable_with_arithmetic_precedence() {
    let mut interner = Interner::new();
    let exprs = Arena::new();
    let words = Arena::new();
    let links = Arena::new();

    let mut stack = GrammarStack::new();
    stack.push(fill_predefined_symbols(&mut interner));
    let (tokens, errors) = Lexer::new("set x to 1 + 2 * 3", &mut interner).tokenize();
    assert!(errors.is_empty());
    let ctx = ExprContext::new(&exprs, &words, &links);
    let mut parser = Parser::new(tokens, &mut interner, stack, ctx);
    let result = parser.parse_statement().expect("set <assignable> to <exp> should parse");

    match result.expr {
        Expr::Invoke { function: _, args, .. } => {
            assert_eq!(args.len(), 2);
            assert!(matches!(
                args[0],
                Expr::Argument { origin: HoleOrigin::Assignable, .. }
            ));
            match &args[1] {
                Expr::Binary { op: BinaryOp::Add, left, right, .. } => {
                    assert!(matches!(left, Expr::Literal(Literal::Integer(1), _)));
                    assert!(matches!(right, Expr::Binary { op: BinaryOp::Mul, .. }));
                }
                other => panic!("expected top-level Add, got {:?}", other),
            }
        }
        other => panic!("expected Invoke(set, ..), got {:?}", other),
    }
}

/// S2: `repeat with the current number from 1 to 10` — a custom sentence
/// with an `argument` hole registering a fresh symbol.
#[test]
fn s2_repeat_with_registers_argument_and_collects_bounds() {
    let mut interner = Interner::new();
    let exprs = Arena::new();
    let words = Arena::new();
    let links = Arena::new();

    let mut stack = GrammarStack::new();
    let mut item = fill_predefined_symbols(&mut interner);
    let mut b = FragmentBuilder::new();
    b.name(interner.intern("repeat"));
    b.name(interner.intern("with"));
    b.hole(HoleKind::Argument);
    b.name(interner.intern("from"));
    b.hole(HoleKind::Expression);
    b.name(interner.intern("to"));
    b.hole(HoleKind::Expression);
    item.insert(GrammarSymbol::new(b.finish(), SymbolKind::SENTENCE, SymbolTarget::Custom, &interner));
    stack.push(item);

    let (tokens, errors) =
        Lexer::new("repeat with the current number from 1 to 10", &mut interner).tokenize();
    assert!(errors.is_empty());
    let ctx = ExprContext::new(&exprs, &words, &links);
    let mut parser = Parser::new(tokens, &mut interner, stack, ctx);
    let result = parser.parse_statement().expect("repeat with <arg> from <exp> to <exp> should parse");

    match result.expr {
        Expr::Invoke { args, .. } => {
            assert_eq!(args.len(), 3);
            assert!(matches!(
                args[0],
                Expr::Argument { origin: HoleOrigin::Argument, words, .. } if words.len() == 3
            ));
            assert!(matches!(args[1], Expr::Literal(Literal::Integer(1), _)));
            assert!(matches!(args[2], Expr::Literal(Literal::Integer(10), _)));
        }
        other => panic!("expected Invoke(repeat with, ..), got {:?}", other),
    }
}

/// S3: `set r to a + b and c` — `+` binds tighter than `and`, so exactly one
/// reading survives: `Binary(And, Binary(Add, a, b), c)`.
#[test]
fn s3_plus_binds_tighter_than_and() {
    let mut interner = Interner::new();
    let exprs = Arena::new();
    let words = Arena::new();
    let links = Arena::new();

    let mut stack = GrammarStack::new();
    let mut item = fill_predefined_symbols(&mut interner);
    item.insert(custom_symbol(&mut interner, "a", SymbolKind::SYMBOL));
    item.insert(custom_symbol(&mut interner, "b", SymbolKind::SYMBOL));
    item.insert(custom_symbol(&mut interner, "c", SymbolKind::SYMBOL));
    stack.push(item);

    let (tokens, errors) = Lexer::new("set r to a + b and c", &mut interner).tokenize();
    assert!(errors.is_empty());
    let ctx = ExprContext::new(&exprs, &words, &links);
    let mut parser = Parser::new(tokens, &mut interner, stack, ctx);
    let result = parser.parse_statement().expect("set <assignable> to <exp> should parse");

    match result.expr {
        Expr::Invoke { args, .. } => {
            assert_eq!(args.len(), 2);
            match &args[1] {
                Expr::Binary { op: BinaryOp::And, left, right: _, .. } => {
                    assert!(matches!(left, Expr::Binary { op: BinaryOp::Add, .. }));
                }
                other => panic!("expected top-level And, got {:?}", other),
            }
        }
        other => panic!("expected Invoke(set, ..), got {:?}", other),
    }
}

/// S4: `set f of x to 1` where `f of <primitive>` is a phrase whose reading
/// is addressable — no new symbol is registered (`CountStatementAssignables`
/// returns 0, not 1).
#[test]
fn s4_field_access_assignable_registers_no_new_symbol() {
    let mut interner = Interner::new();
    let exprs = Arena::new();
    let words = Arena::new();
    let links = Arena::new();

    let mut stack = GrammarStack::new();
    let mut item = fill_predefined_symbols(&mut interner);
    let mut f_of = FragmentBuilder::new();
    f_of.name(interner.intern("f"));
    f_of.name(interner.intern("of"));
    f_of.hole(HoleKind::Primitive);
    item.insert(GrammarSymbol::new(f_of.finish(), SymbolKind::PHRASE, SymbolTarget::GetField, &interner));
    item.insert(custom_symbol(&mut interner, "x", SymbolKind::SYMBOL));
    stack.push(item);

    let (tokens, errors) = Lexer::new("set f of x to 1", &mut interner).tokenize();
    assert!(errors.is_empty());
    let ctx = ExprContext::new(&exprs, &words, &links);
    let mut parser = Parser::new(tokens, &mut interner, stack, ctx);
    let result = parser.parse_statement().expect("set <assignable> to <exp> should parse");

    match result.expr {
        Expr::Invoke { args, .. } => {
            assert_eq!(args.len(), 2);
            assert!(args[0].is_addressable(), "f of x should be an addressable field access");
            assert!(!matches!(args[0], Expr::Argument { .. }), "no new symbol should be registered");
        }
        other => panic!("expected Invoke(set, ..), got {:?}", other),
    }
}

/// S5: `length of array items is not integer` — left-recursive primitive
/// extension (`GetArrayLength`) followed by a further phrase (`IsNotType`).
/// Wrapped in `call <primitive>` since the scenario itself is a bare
/// primitive, not a full statement.
#[test]
fn s5_array_length_extension_followed_by_is_not_type() {
    let mut interner = Interner::new();
    let exprs = Arena::new();
    let words = Arena::new();
    let links = Arena::new();

    let mut stack = GrammarStack::new();
    let mut item = fill_predefined_symbols(&mut interner);
    item.insert(custom_symbol(&mut interner, "items", SymbolKind::SYMBOL));
    stack.push(item);

    let (tokens, errors) =
        Lexer::new("call length of array items is not integer", &mut interner).tokenize();
    assert!(errors.is_empty());
    let ctx = ExprContext::new(&exprs, &words, &links);
    let mut parser = Parser::new(tokens, &mut interner, stack, ctx);
    let result = parser.parse_statement().expect("call <primitive> should parse");

    match result.expr {
        Expr::Invoke { args, .. } => {
            assert_eq!(args.len(), 1);
            match &args[0] {
                Expr::Invoke { function, args: is_not_args, .. } => {
                    assert!(matches!(function, Expr::Reference { symbol, .. } if symbol.target == SymbolTarget::IsNotType));
                    assert_eq!(is_not_args.len(), 2);
                    match &is_not_args[0] {
                        Expr::Invoke { function, args: len_args, .. } => {
                            assert!(matches!(function, Expr::Reference { symbol, .. } if symbol.target == SymbolTarget::GetArrayLength));
                            assert_eq!(len_args.len(), 1);
                        }
                        other => panic!("expected GetArrayLength invoke, got {:?}", other),
                    }
                    assert!(matches!(
                        is_not_args[1],
                        Expr::Invoke { function: Expr::Reference { symbol, .. }, .. }
                            if symbol.target == SymbolTarget::IntegerType
                    ));
                }
                other => panic!("expected IsNotType invoke, got {:?}", other),
            }
        }
        other => panic!("expected Invoke(call, ..), got {:?}", other),
    }
}

/// S6: scope shadowing and restoration — push A(foo), push B(foo'), lookup
/// picks B; pop B, lookup picks A; pop A, lookup finds nothing.
#[test]
fn s6_shadowing_and_scope_restoration() {
    let mut interner = Interner::new();
    let mut stack = GrammarStack::new();

    let mut scope_a = GrammarStackItem::new();
    scope_a.insert(custom_symbol(&mut interner, "foo", SymbolKind::SENTENCE));
    stack.push(scope_a);
    let first = stack.lookup_unique_id("foo").expect("scope A's foo is visible");
    assert_eq!(first.target, SymbolTarget::Custom);

    let mut scope_b = GrammarStackItem::new();
    let mut b = FragmentBuilder::new();
    b.name(interner.intern("foo"));
    scope_b.insert(GrammarSymbol::new(b.finish(), SymbolKind::SENTENCE, SymbolTarget::End, &interner));
    stack.push(scope_b);
    let second = stack.lookup_unique_id("foo").expect("scope B's foo shadows scope A's");
    assert_eq!(second.target, SymbolTarget::End);

    stack.pop();
    let third = stack.lookup_unique_id("foo").expect("scope A's foo is visible again");
    assert_eq!(third.target, SymbolTarget::Custom);

    stack.pop();
    assert!(stack.lookup_unique_id("foo").is_none(), "no scope left to match foo");
}
