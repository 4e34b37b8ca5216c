pub mod expr;

pub use expr::{collect_new_assignable, BinaryOp, Expr, ExpressionLink, HoleOrigin, Literal, UnaryOp};
