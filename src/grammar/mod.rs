pub mod fragment;
pub mod predefined;
pub mod stack;
pub mod symbol;

pub use fragment::{calculate_unique_id, FragmentBuilder, GrammarFragment, HoleKind};
pub use stack::{GrammarStack, GrammarStackItem, ScopeGuard};
pub use symbol::{GrammarSymbol, SymbolKind, SymbolTarget};
