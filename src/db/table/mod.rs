pub mod header;
pub mod row;
pub mod selection;

pub use header::{FIELDS_MARKER, Header};
pub use row::Row;
pub use selection::{FieldSelection, WILDCARD};

/// The decoded, in-memory form of one table file.
///
/// Owned by the operation that decoded it. Nothing is cached between calls.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Table {
    /// Field declaration from the first line.
    pub header: Header,

    /// Data rows in file order.
    pub rows: Vec<Row>,
}

impl Table {
    /// Creates a table from a header and its rows.
    pub fn new(header: Header, rows: Vec<Row>) -> Self {
        Self { header, rows }
    }
}
