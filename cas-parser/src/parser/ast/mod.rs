pub mod binary;
pub mod call;
pub mod expr;
pub mod list;
pub mod literal;
pub mod paren;
pub mod rule;
pub mod unary;

pub use binary::Binary;
pub use call::Call;
pub use expr::Expr;
pub use list::{List, Matrix};
pub use literal::{LitNum, LitSym, LitWildcard, WildcardConstraint};
pub use paren::Paren;
pub use rule::RewriteRule;
pub use unary::Unary;
