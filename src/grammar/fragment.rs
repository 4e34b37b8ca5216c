use crate::intern::{Interner, Symbol};

/// The kind of hole a grammar fragment may introduce (spec.md §3).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HoleKind {
    Type,
    Primitive,
    Expression,
    List,
    Assignable,
    Argument,
}

impl HoleKind {
    /// The bracketed kind marker contributed to a rule's uniqueId
    /// (spec.md §3: "a bracketed kind marker (e.g. `<exp>`)").
    fn marker(self) -> &'static str {
        match self {
            HoleKind::Type => "<type>",
            HoleKind::Primitive => "<primitive>",
            HoleKind::Expression => "<exp>",
            HoleKind::List => "<list>",
            HoleKind::Assignable => "<assignable>",
            HoleKind::Argument => "<arg>",
        }
    }
}

/// One element of a grammar rule pattern: either one or more literal
/// identifier words (a `Name`), or a typed `Hole` (spec.md §3).
#[derive(Debug, Clone)]
pub enum GrammarFragment {
    Name(Vec<Symbol>),
    Hole(HoleKind),
}

impl GrammarFragment {
    /// This fragment's contribution to the rule's uniqueId.
    pub fn unique_id_part(&self, interner: &Interner) -> String {
        match self {
            GrammarFragment::Name(words) => words
                .iter()
                .map(|w| interner.resolve(*w).to_ascii_lowercase())
                .collect::<Vec<_>>()
                .join(" "),
            GrammarFragment::Hole(kind) => kind.marker().to_string(),
        }
    }

    pub fn is_primitive_hole(&self) -> bool {
        matches!(self, GrammarFragment::Hole(HoleKind::Primitive))
    }
}

/// Incrementally builds a fragment sequence. Consecutive name words collapse
/// into one `Name` fragment made of multiple words (spec.md §4.2: "the
/// builder exposes two appenders ... consecutive name fragments collapse
/// into one fragment composed of multiple words").
#[derive(Debug, Default, Clone)]
pub struct FragmentBuilder {
    fragments: Vec<GrammarFragment>,
}

impl FragmentBuilder {
    pub fn new() -> Self {
        FragmentBuilder { fragments: Vec::new() }
    }

    pub fn name(&mut self, word: Symbol) -> &mut Self {
        if let Some(GrammarFragment::Name(words)) = self.fragments.last_mut() {
            words.push(word);
        } else {
            self.fragments.push(GrammarFragment::Name(vec![word]));
        }
        self
    }

    pub fn hole(&mut self, kind: HoleKind) -> &mut Self {
        self.fragments.push(GrammarFragment::Hole(kind));
        self
    }

    pub fn finish(self) -> Vec<GrammarFragment> {
        self.fragments
    }
}

/// Deterministic uniqueId for a fragment sequence (spec.md §4.2
/// `CalculateUniqueId`, §8 invariant 4: depends only on `fragments`).
pub fn calculate_unique_id(fragments: &[GrammarFragment], interner: &Interner) -> String {
    fragments
        .iter()
        .map(|f| f.unique_id_part(interner))
        .collect::<Vec<_>>()
        .join(" ")
}
