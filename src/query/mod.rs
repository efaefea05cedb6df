pub(crate) mod condition;
pub(crate) mod predicate;
