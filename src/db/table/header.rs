use crate::common::error::{Result, StoreError};

/// Marker that tags the header line of every table file.
pub const FIELDS_MARKER: &str = "fields";

/// The ordered field names declared on the first line of a table.
///
/// Field order defines the positional mapping of tab-separated values in
/// every data line. Names are unique.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Header {
    fields: Vec<String>,
}

impl Header {
    /// Creates a header, rejecting duplicate names and names that cannot be
    /// written back to the header line.
    pub fn new<I, S>(fields: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut header = Self { fields: Vec::new() };

        for field in fields {
            let field = field.into();
            if field.is_empty() || field.contains([',', '\t', '\n', '\r']) {
                return Err(StoreError::Format(format!("invalid field name {field:?}")));
            }
            if header.contains(&field) {
                return Err(StoreError::Format(format!("duplicate field {field:?}")));
            }
            header.fields.push(field);
        }

        Ok(header)
    }

    /// The field names in declaration order.
    pub fn fields(&self) -> &[String] {
        &self.fields
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn contains(&self, field: &str) -> bool {
        self.fields.iter().any(|f| f == field)
    }

    /// Finds the position of a field by name.
    pub fn position(&self, field: &str) -> Option<usize> {
        self.fields.iter().position(|f| f == field)
    }

    /// Fails with [`StoreError::UnknownField`] unless `field` is declared.
    pub fn require(&self, field: &str) -> Result<()> {
        if self.contains(field) {
            Ok(())
        } else {
            Err(StoreError::UnknownField(field.to_owned()))
        }
    }

    /// Renders the header line: `fields<TAB>a,b,c`.
    pub fn to_line(&self) -> String {
        format!("{FIELDS_MARKER}\t{}", self.fields.join(","))
    }
}
