use strum::EnumString;

use crate::common::error::{Result, StoreError};

/// The kind of a [`Condition`].
///
/// Only `WHERE` has defined semantics. Any other kind parses into
/// [`ConditionKind::Other`]; such conditions are accepted but never
/// satisfied, so a row tested against one never fully matches.
#[derive(Debug, Clone, PartialEq, Eq, EnumString)]
pub enum ConditionKind {
    #[strum(serialize = "WHERE")]
    Where,

    #[strum(default)]
    Other(String),
}

impl ConditionKind {
    pub fn as_str(&self) -> &str {
        match self {
            Self::Where => "WHERE",
            Self::Other(kind) => kind,
        }
    }
}

/// A single WHERE-style predicate: `field` must equal one of `values`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Condition {
    pub kind: ConditionKind,
    pub field: String,
    /// Acceptable values, OR-matched. Never empty.
    pub values: Vec<String>,
}

impl Condition {
    /// Builds a condition from an explicit ordered list of values.
    ///
    /// Fails with `Format` when `values` is empty.
    pub fn new<I, S>(kind: ConditionKind, field: impl Into<String>, values: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let field = field.into();
        let values: Vec<String> = values.into_iter().map(Into::into).collect();

        if values.is_empty() {
            return Err(StoreError::Format(format!(
                "{} condition on {field:?} needs at least one value",
                kind.as_str()
            )));
        }

        Ok(Self {
            kind,
            field,
            values,
        })
    }

    /// Shorthand for `Condition::new(ConditionKind::Where, field, values)`.
    pub fn where_in<I, S>(field: impl Into<String>, values: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::new(ConditionKind::Where, field, values)
    }

    /// Shorthand for a single-value `WHERE` condition.
    pub fn where_eq(field: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            kind: ConditionKind::Where,
            field: field.into(),
            values: vec![value.into()],
        }
    }
}

#[cfg(test)]
mod tests {
    use std::str::FromStr;

    use super::*;

    #[test]
    fn test_parse_kind() {
        assert_eq!(ConditionKind::from_str("WHERE").unwrap(), ConditionKind::Where);
        assert_eq!(
            ConditionKind::from_str("LIKE").unwrap(),
            ConditionKind::Other("LIKE".to_string())
        );
    }

    #[test]
    fn test_kind_is_case_sensitive() {
        assert_eq!(
            ConditionKind::from_str("where").unwrap(),
            ConditionKind::Other("where".to_string())
        );
    }

    #[test]
    fn test_empty_values_rejected() {
        let result = Condition::where_in("status", Vec::<String>::new());
        assert!(matches!(result, Err(StoreError::Format(_))));
    }

    #[test]
    fn test_where_in_keeps_value_order() {
        let condition = Condition::where_in("status", ["active", "pending"]).unwrap();
        assert_eq!(condition.kind, ConditionKind::Where);
        assert_eq!(condition.values, vec!["active", "pending"]);
    }
}
