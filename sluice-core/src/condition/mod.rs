mod condition;
mod operator;
mod predicate;

pub use condition::*;
pub use operator::*;
pub use predicate::*;
