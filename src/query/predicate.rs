use crate::{
    common::error::Result,
    db::table::{Header, Row},
    query::condition::{Condition, ConditionKind},
};

/// Counts how many conditions in the list `row` satisfies.
///
/// A `WHERE` condition is satisfied when the row's value for its field
/// equals any of the listed values. Other kinds never count. Compare the
/// result against `conditions.len()` to test for a full match.
pub fn match_count(row: &Row, conditions: &[Condition]) -> usize {
    conditions
        .iter()
        .filter(|condition| satisfies(row, condition))
        .count()
}

/// True when `row` satisfies every condition. An empty list matches all rows.
pub fn is_full_match(row: &Row, conditions: &[Condition]) -> bool {
    match_count(row, conditions) == conditions.len()
}

fn satisfies(row: &Row, condition: &Condition) -> bool {
    match condition.kind {
        ConditionKind::Where => match row.get(&condition.field) {
            Some(actual) => condition.values.iter().any(|value| value == actual),
            None => false,
        },
        ConditionKind::Other(_) => false,
    }
}

/// Checks that every condition refers to a declared field.
pub fn validate_conditions(header: &Header, conditions: &[Condition]) -> Result<()> {
    conditions
        .iter()
        .try_for_each(|condition| header.require(&condition.field))
}
