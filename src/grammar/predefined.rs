use crate::grammar::fragment::{FragmentBuilder, HoleKind};
use crate::grammar::stack::GrammarStackItem;
use crate::grammar::symbol::{GrammarSymbol, SymbolKind, SymbolTarget};
use crate::intern::Interner;

/// Populates one stack item with every built-in grammar symbol (spec.md
/// §4.5: "Built-in symbols ... are provided by a `FillPredefinedSymbols`
/// routine that populates a single stack item"). Callers push the returned
/// item as the outermost scope before pushing any user declarations.
pub fn fill_predefined_symbols(interner: &mut Interner) -> GrammarStackItem {
    let mut item = GrammarStackItem::new();

    let mut push = |fragments_fn: &mut dyn FnMut(&mut FragmentBuilder),
                     kind: SymbolKind,
                     target: SymbolTarget,
                     interner: &mut Interner| {
        let mut builder = FragmentBuilder::new();
        fragments_fn(&mut builder);
        item.insert(GrammarSymbol::new(builder.finish(), kind, target, interner));
    };

    macro_rules! name {
        ($b:expr, $interner:expr, $($w:expr),+) => {
            $( $b.name($interner.intern($w)); )+
        };
    }

    // new <type>
    push(
        &mut |b| {
            name!(b, interner, "new");
            b.hole(HoleKind::Type);
        },
        SymbolKind::PHRASE,
        SymbolTarget::NewType,
        interner,
    );

    // new array <primitive>
    push(
        &mut |b| {
            name!(b, interner, "new", "array");
            b.hole(HoleKind::Primitive);
        },
        SymbolKind::PHRASE,
        SymbolTarget::NewArray,
        interner,
    );

    // item <primitive> of array <primitive>
    push(
        &mut |b| {
            name!(b, interner, "item");
            b.hole(HoleKind::Primitive);
            name!(b, interner, "of", "array");
            b.hole(HoleKind::Primitive);
        },
        SymbolKind::PHRASE,
        SymbolTarget::GetArrayItem,
        interner,
    );

    // length of array <primitive>
    push(
        &mut |b| {
            name!(b, interner, "length", "of", "array");
            b.hole(HoleKind::Primitive);
        },
        SymbolKind::PHRASE,
        SymbolTarget::GetArrayLength,
        interner,
    );

    // invoke <primitive>
    push(
        &mut |b| {
            name!(b, interner, "invoke");
            b.hole(HoleKind::Primitive);
        },
        SymbolKind::PHRASE,
        SymbolTarget::Invoke,
        interner,
    );

    // invoke <primitive> with <list>
    push(
        &mut |b| {
            name!(b, interner, "invoke");
            b.hole(HoleKind::Primitive);
            name!(b, interner, "with");
            b.hole(HoleKind::List);
        },
        SymbolKind::PHRASE,
        SymbolTarget::InvokeWith,
        interner,
    );

    // <primitive> is <type>
    push(
        &mut |b| {
            b.hole(HoleKind::Primitive);
            name!(b, interner, "is");
            b.hole(HoleKind::Type);
        },
        SymbolKind::PHRASE,
        SymbolTarget::IsType,
        interner,
    );

    // <primitive> is not <type>
    push(
        &mut |b| {
            b.hole(HoleKind::Primitive);
            name!(b, interner, "is", "not");
            b.hole(HoleKind::Type);
        },
        SymbolKind::PHRASE,
        SymbolTarget::IsNotType,
        interner,
    );

    // field <primitive> of <primitive>
    push(
        &mut |b| {
            name!(b, interner, "field");
            b.hole(HoleKind::Primitive);
            name!(b, interner, "of");
            b.hole(HoleKind::Primitive);
        },
        SymbolKind::PHRASE,
        SymbolTarget::GetField,
        interner,
    );

    // array / string / integer / float / symbol (type names)
    push(&mut |b| name!(b, interner, "array"), SymbolKind::TYPE, SymbolTarget::Array, interner);
    push(&mut |b| name!(b, interner, "string"), SymbolKind::TYPE, SymbolTarget::StringType, interner);
    push(&mut |b| name!(b, interner, "integer"), SymbolKind::TYPE, SymbolTarget::IntegerType, interner);
    push(&mut |b| name!(b, interner, "float"), SymbolKind::TYPE, SymbolTarget::FloatType, interner);
    push(&mut |b| name!(b, interner, "symbol"), SymbolKind::TYPE, SymbolTarget::SymbolType, interner);

    // true / false / null (literal symbols)
    push(&mut |b| name!(b, interner, "true"), SymbolKind::SYMBOL, SymbolTarget::True, interner);
    push(&mut |b| name!(b, interner, "false"), SymbolKind::SYMBOL, SymbolTarget::False, interner);
    push(&mut |b| name!(b, interner, "null"), SymbolKind::SYMBOL, SymbolTarget::Null, interner);

    // end
    push(&mut |b| name!(b, interner, "end"), SymbolKind::SENTENCE, SymbolTarget::End, interner);

    // exit
    push(&mut |b| name!(b, interner, "exit"), SymbolKind::SENTENCE, SymbolTarget::Exit, interner);

    // select <primitive>
    push(
        &mut |b| {
            name!(b, interner, "select");
            b.hole(HoleKind::Primitive);
        },
        SymbolKind::BLOCK | SymbolKind::SENTENCE,
        SymbolTarget::Select,
        interner,
    );

    // case <primitive>
    push(
        &mut |b| {
            name!(b, interner, "case");
            b.hole(HoleKind::Primitive);
        },
        SymbolKind::BLOCK | SymbolKind::SENTENCE,
        SymbolTarget::Case,
        interner,
    );

    // call <primitive>
    push(
        &mut |b| {
            name!(b, interner, "call");
            b.hole(HoleKind::Primitive);
        },
        SymbolKind::SENTENCE,
        SymbolTarget::Call,
        interner,
    );

    // redirect to <primitive>
    push(
        &mut |b| {
            name!(b, interner, "redirect", "to");
            b.hole(HoleKind::Primitive);
        },
        SymbolKind::SENTENCE,
        SymbolTarget::RedirectTo,
        interner,
    );

    // set <assignable> to <expression>
    push(
        &mut |b| {
            name!(b, interner, "set");
            b.hole(HoleKind::Assignable);
            name!(b, interner, "to");
            b.hole(HoleKind::Expression);
        },
        SymbolKind::SENTENCE,
        SymbolTarget::Assign,
        interner,
    );

    // set item <primitive> of array <primitive> to <expression>
    push(
        &mut |b| {
            name!(b, interner, "set", "item");
            b.hole(HoleKind::Primitive);
            name!(b, interner, "of", "array");
            b.hole(HoleKind::Primitive);
            name!(b, interner, "to");
            b.hole(HoleKind::Expression);
        },
        SymbolKind::SENTENCE,
        SymbolTarget::SetArrayItem,
        interner,
    );

    // set field <primitive> of <primitive> to <expression>
    push(
        &mut |b| {
            name!(b, interner, "set", "field");
            b.hole(HoleKind::Primitive);
            name!(b, interner, "of");
            b.hole(HoleKind::Primitive);
            name!(b, interner, "to");
            b.hole(HoleKind::Expression);
        },
        SymbolKind::SENTENCE,
        SymbolTarget::SetField,
        interner,
    );

    item
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn installs_one_symbol_per_target_with_stable_unique_ids() {
        let mut interner = Interner::new();
        let item = fill_predefined_symbols(&mut interner);
        assert!(item.symbols.len() >= 20);
        let set_assign = item
            .symbols
            .iter()
            .find(|s| s.target == SymbolTarget::Assign)
            .expect("set <assignable> to <exp> is predefined");
        assert_eq!(set_assign.unique_id, "set <assignable> to <exp>");
    }

    #[test]
    fn arithmetic_and_binary_operators_are_not_symbols_here() {
        // Arithmetic is handled directly by the binary-operator precedence
        // ladder (src/parser/binary.rs), not as named grammar symbols.
        let mut interner = Interner::new();
        let item = fill_predefined_symbols(&mut interner);
        assert!(item.symbols.iter().all(|s| s.unique_id != "+"));
    }
}
