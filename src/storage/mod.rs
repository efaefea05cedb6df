pub mod codec;
pub mod line_store;
