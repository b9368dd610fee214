//! Column sort over in-memory rows.

use std::cmp::Ordering;

use log::{trace, warn};

use super::{Direction, SortState};
use crate::model::SheetRow;

/// Returns a new vector with the rows ordered by one field.
///
/// Values are compared as strings with their default (lexicographic)
/// ordering, so `"10"` sorts before `"9"`. The sort is stable in both
/// directions: rows with equal values keep their input order. The input is
/// left untouched.
///
/// If `key` is not a field of `R`, every pair compares equal and the rows
/// come back in input order.
///
/// # Example
///
/// ```
/// use cheatsheet_lib::model::PayoffRecord;
/// use cheatsheet_lib::query::{sort, Direction};
///
/// let rows = vec![
///     PayoffRecord::new("B"),
///     PayoffRecord::new("A"),
/// ];
///
/// let sorted = sort(&rows, "product", Direction::Asc);
/// assert_eq!(sorted[0].product, "A");
/// assert_eq!(rows[0].product, "B");
/// ```
pub fn sort<R: SheetRow>(records: &[R], key: &str, direction: Direction) -> Vec<R> {
    let mut sorted = records.to_vec();

    let Ok(def) = R::field_def(key) else {
        warn!("Sort key '{}' is not a known field; keeping input order", key);
        return sorted;
    };

    trace!("Sorting {} rows by {} {}", sorted.len(), key, direction);
    sorted.sort_by(|a, b| {
        let ord = def.value(a).cmp(def.value(b));
        match direction {
            Direction::Asc => ord,
            Direction::Desc => ord.reverse(),
        }
    });
    sorted
}

/// Sorts rows according to a [`SortState`].
pub fn sort_by_state<R: SheetRow>(records: &[R], state: &SortState) -> Vec<R> {
    sort(records, state.key(), state.direction())
}

/// Returns `true` if the rows are already ordered by `key` in `direction`.
pub fn is_sorted_by<R: SheetRow>(records: &[R], key: &str, direction: Direction) -> bool {
    let Ok(def) = R::field_def(key) else {
        return true;
    };
    records.windows(2).all(|pair| {
        let ord = def.value(&pair[0]).cmp(def.value(&pair[1]));
        match direction {
            Direction::Asc => ord != Ordering::Greater,
            Direction::Desc => ord != Ordering::Less,
        }
    })
}
