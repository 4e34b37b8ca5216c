use crate::grammar::fragment::{calculate_unique_id, GrammarFragment};
use crate::intern::Interner;

/// A symbol may belong to several rule kinds at once (spec.md §3: "a set,
/// since a symbol may belong to several kinds"). Five kinds, hand-rolled as
/// bit flags rather than pulling in the `bitflags` crate for five values —
/// the teacher repo does not depend on it either.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SymbolKind(u8);

impl SymbolKind {
    pub const TYPE: SymbolKind = SymbolKind(1);
    pub const SYMBOL: SymbolKind = SymbolKind(2);
    pub const PHRASE: SymbolKind = SymbolKind(4);
    pub const SENTENCE: SymbolKind = SymbolKind(8);
    pub const BLOCK: SymbolKind = SymbolKind(16);

    pub fn contains(self, other: SymbolKind) -> bool {
        self.0 & other.0 == other.0
    }

    pub fn union(self, other: SymbolKind) -> SymbolKind {
        SymbolKind(self.0 | other.0)
    }
}

impl std::ops::BitOr for SymbolKind {
    type Output = SymbolKind;
    fn bitor(self, rhs: SymbolKind) -> SymbolKind {
        self.union(rhs)
    }
}

/// What a rule compiles down to. `Custom` is any user-declared rule; the
/// rest are the built-ins `FillPredefinedSymbols` installs (spec.md §6, and
/// `GrammarSymbolTarget` in the original Tinymoe header).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SymbolTarget {
    Custom,

    Array,
    StringType,
    IntegerType,
    FloatType,
    SymbolType,

    True,
    False,
    Null,

    NewType,
    NewArray,
    GetArrayItem,
    GetArrayLength,
    Invoke,
    InvokeWith,
    IsType,
    IsNotType,
    GetField,

    End,
    Exit,
    Select,
    Case,
    Call,
    RedirectTo,
    Assign,
    SetArrayItem,
    SetField,
}

/// A grammar rule: its fragment pattern, the rule kinds it satisfies, what
/// it lowers to, and its canonical uniqueId (spec.md §3 GrammarSymbol).
///
/// Equality is by uniqueId (spec.md §4.2): two symbols with the same
/// uniqueId are the same rule shape, and the innermost one in scope wins.
#[derive(Debug, Clone)]
pub struct GrammarSymbol {
    pub fragments: Vec<GrammarFragment>,
    pub kind: SymbolKind,
    pub target: SymbolTarget,
    pub unique_id: String,
}

impl GrammarSymbol {
    pub fn new(fragments: Vec<GrammarFragment>, kind: SymbolKind, target: SymbolTarget, interner: &Interner) -> Self {
        let unique_id = calculate_unique_id(&fragments, interner);
        GrammarSymbol { fragments, kind, target, unique_id }
    }

    pub fn first_fragment_is_primitive_hole(&self) -> bool {
        self.fragments.first().map(|f| f.is_primitive_hole()).unwrap_or(false)
    }
}

impl PartialEq for GrammarSymbol {
    fn eq(&self, other: &Self) -> bool {
        self.unique_id == other.unique_id
    }
}
impl Eq for GrammarSymbol {}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grammar::fragment::FragmentBuilder;

    #[test]
    fn kind_union_contains_both_flags() {
        let kind = SymbolKind::SENTENCE | SymbolKind::PHRASE;
        assert!(kind.contains(SymbolKind::SENTENCE));
        assert!(kind.contains(SymbolKind::PHRASE));
        assert!(!kind.contains(SymbolKind::BLOCK));
    }

    #[test]
    fn equality_is_by_unique_id_only() {
        let mut interner = Interner::new();
        let mut a = FragmentBuilder::new();
        a.name(interner.intern("end"));
        let mut b = FragmentBuilder::new();
        b.name(interner.intern("end"));
        let sym_a = GrammarSymbol::new(a.finish(), SymbolKind::SENTENCE, SymbolTarget::End, &interner);
        let sym_b = GrammarSymbol::new(b.finish(), SymbolKind::SENTENCE, SymbolTarget::Custom, &interner);
        assert_eq!(sym_a, sym_b, "same fragments => same uniqueId => equal, regardless of target");
    }
}
