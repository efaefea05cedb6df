use super::{header::Header, row::Row};
use crate::common::error::Result;

/// The literal that selects every declared field.
pub const WILDCARD: &str = "*";

/// Which fields a `select` (or `append`) addresses.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldSelection {
    /// `*`: every field of the header, in header order.
    All,
    /// An ordered list of field names. A `*` inside the list widens the
    /// selection to every field, but the names before it are still checked.
    Fields(Vec<String>),
}

impl FieldSelection {
    /// Builds a selection from names. A list starting with `*` selects all
    /// fields outright.
    pub fn from_names<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let names: Vec<String> = names.into_iter().map(Into::into).collect();

        match names.first() {
            Some(first) if first == WILDCARD => Self::All,
            _ => Self::Fields(names),
        }
    }

    /// True when the selection covers every header field.
    pub fn is_wildcard(&self) -> bool {
        match self {
            Self::All => true,
            Self::Fields(fields) => fields.iter().any(|field| field == WILDCARD),
        }
    }

    /// Number of fields this selection resolves to against `header`.
    pub fn width(&self, header: &Header) -> usize {
        self.resolve(header).len()
    }

    /// The selected names in order, resolving the wildcard against `header`.
    pub fn resolve<'a>(&'a self, header: &'a Header) -> &'a [String] {
        match self {
            Self::Fields(fields) if !self.is_wildcard() => fields,
            _ => header.fields(),
        }
    }

    /// Validates the selection against a header.
    ///
    /// Names are checked in order until the first `*`. Fails with
    /// `UnknownField` naming the first undeclared one.
    pub fn validate(&self, header: &Header) -> Result<()> {
        match self {
            Self::All => Ok(()),
            Self::Fields(fields) => fields
                .iter()
                .take_while(|field| *field != WILDCARD)
                .try_for_each(|field| header.require(field)),
        }
    }

    /// Projects a row onto this selection.
    pub fn project(&self, row: &Row) -> Row {
        match self {
            Self::Fields(fields) if !self.is_wildcard() => Row::from_pairs(
                fields
                    .iter()
                    .map(|field| (field.as_str(), row.get(field).unwrap_or_default())),
            ),
            _ => row.clone(),
        }
    }
}

impl From<&[&str]> for FieldSelection {
    fn from(names: &[&str]) -> Self {
        Self::from_names(names.iter().copied())
    }
}

impl<const N: usize> From<[&str; N]> for FieldSelection {
    fn from(names: [&str; N]) -> Self {
        Self::from_names(names)
    }
}
