use std::collections::HashMap;
use std::rc::Rc;

use crate::grammar::symbol::{GrammarSymbol, SymbolKind};

/// One lexical scope's worth of symbols (spec.md §3 GrammarStackItem):
/// a module, a function body, or a block body. Append-only once pushed.
#[derive(Debug, Default, Clone)]
pub struct GrammarStackItem {
    pub symbols: Vec<Rc<GrammarSymbol>>,
}

impl GrammarStackItem {
    pub fn new() -> Self {
        GrammarStackItem { symbols: Vec::new() }
    }

    pub fn insert(&mut self, symbol: GrammarSymbol) {
        self.symbols.push(Rc::new(symbol));
    }
}

/// An ordered scope stack plus a flat multimap from uniqueId to every pushed
/// symbol, so lookup is the last-pushed (innermost) match (spec.md §3/§4.3).
pub struct GrammarStack {
    items: Vec<GrammarStackItem>,
    index: HashMap<String, Vec<Rc<GrammarSymbol>>>,
}

impl GrammarStack {
    pub fn new() -> Self {
        GrammarStack { items: Vec::new(), index: HashMap::new() }
    }

    pub fn depth(&self) -> usize {
        self.items.len()
    }

    pub fn push(&mut self, item: GrammarStackItem) {
        for symbol in &item.symbols {
            self.index.entry(symbol.unique_id.clone()).or_default().push(symbol.clone());
        }
        self.items.push(item);
    }

    /// Inserts one symbol into the innermost (topmost) currently-pushed
    /// scope, the way statement-commit-time assignable/argument registration
    /// does (spec.md §4.5: "inserted into the innermost scope at statement
    /// commit time"). Never pushes a new scope — a push with no matching pop
    /// would break scope balance (§8 invariant 3) the first time a block ran
    /// more than one statement. No-op if no scope is currently pushed.
    pub fn insert_into_top(&mut self, symbol: GrammarSymbol) {
        if self.items.is_empty() {
            return;
        }
        let symbol = Rc::new(symbol);
        self.index.entry(symbol.unique_id.clone()).or_default().push(symbol.clone());
        self.items.last_mut().unwrap().symbols.push(symbol);
    }

    /// Removes exactly the insertions the matching `push` made (spec.md
    /// §4.3: "Pop() removes exactly those insertions").
    pub fn pop(&mut self) -> Option<GrammarStackItem> {
        let item = self.items.pop()?;
        for symbol in &item.symbols {
            if let Some(entries) = self.index.get_mut(&symbol.unique_id) {
                if let Some(pos) = entries.iter().rposition(|s| Rc::ptr_eq(s, symbol)) {
                    entries.remove(pos);
                }
                if entries.is_empty() {
                    self.index.remove(&symbol.unique_id);
                }
            }
        }
        Some(item)
    }

    /// The most recently pushed symbol matching `unique_id`, or `None` if
    /// none is in scope (spec.md §4.3, §8 invariant 6 shadowing).
    pub fn lookup_unique_id(&self, unique_id: &str) -> Option<Rc<GrammarSymbol>> {
        self.index.get(unique_id).and_then(|v| v.last().cloned())
    }

    /// Every symbol currently active (innermost per uniqueId) whose kind set
    /// includes `kind` (spec.md §4.3: "linear scan ... restricted to symbols
    /// whose kind-set includes the requested kind").
    ///
    /// Walks `self.items` in push order rather than `self.index`'s `HashMap`
    /// buckets: `HashMap` iteration order is randomized per process, which
    /// would make two parses of identical input return ResultLists with
    /// candidates tried in different orders, violating determinism (spec.md
    /// §8 invariant 2). The index is still used for O(1) "is this the active
    /// symbol for its uniqueId" checks, just not iterated over.
    pub fn lookup_kind(&self, kind: SymbolKind) -> Vec<Rc<GrammarSymbol>> {
        let mut seen = std::collections::HashSet::new();
        let mut result = Vec::new();
        for item in &self.items {
            for symbol in &item.symbols {
                if !self.is_active(symbol) || !seen.insert(symbol.unique_id.clone()) {
                    continue;
                }
                if symbol.kind.contains(kind) {
                    result.push(symbol.clone());
                }
            }
        }
        result
    }

    fn is_active(&self, symbol: &Rc<GrammarSymbol>) -> bool {
        self.index
            .get(&symbol.unique_id)
            .and_then(|v| v.last())
            .is_some_and(|active| Rc::ptr_eq(active, symbol))
    }

    /// All known words contributed by `Name` fragments of every symbol
    /// currently in scope, for "did you mean" suggestions (SPEC_FULL.md §10).
    pub fn vocabulary<'a>(&'a self, interner: &'a crate::intern::Interner) -> Vec<String> {
        let mut seen = std::collections::HashSet::new();
        let mut words = Vec::new();
        for item in &self.items {
            for symbol in &item.symbols {
                if !self.is_active(symbol) || !seen.insert(symbol.unique_id.clone()) {
                    continue;
                }
                for fragment in &symbol.fragments {
                    if let crate::grammar::fragment::GrammarFragment::Name(ws) = fragment {
                        for w in ws {
                            words.push(interner.resolve(*w).to_string());
                        }
                    }
                }
            }
        }
        words
    }
}

impl Default for GrammarStack {
    fn default() -> Self {
        Self::new()
    }
}

/// RAII helper matching the teacher's checkpoint/guard pattern
/// (`ParserGuard` in `src/parser/mod.rs`): pushing a scope and forgetting to
/// pop it on an early return would violate scope balance (spec.md §5, §8
/// invariant 3). Callers should prefer `GrammarStack::scoped` over bare
/// push/pop so every exit path — success or failure — pops exactly once.
pub struct ScopeGuard<'s> {
    stack: &'s mut GrammarStack,
}

impl<'s> Drop for ScopeGuard<'s> {
    fn drop(&mut self) {
        self.stack.pop();
    }
}

impl<'s> std::ops::Deref for ScopeGuard<'s> {
    type Target = GrammarStack;
    fn deref(&self) -> &GrammarStack {
        self.stack
    }
}

impl<'s> std::ops::DerefMut for ScopeGuard<'s> {
    fn deref_mut(&mut self) -> &mut GrammarStack {
        self.stack
    }
}

impl GrammarStack {
    pub fn scoped(&mut self, item: GrammarStackItem) -> ScopeGuard<'_> {
        self.push(item);
        ScopeGuard { stack: self }
    }
}
