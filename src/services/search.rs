//! Client-side search over the fetched page.
//!
//! The term never reaches the server. Matching is a case-insensitive
//! substring test against first name, last name and email.

use crate::domain::Record;

/// Returns whether `record` matches `term`. An empty term matches everything.
pub fn matches(record: &Record, term: &str) -> bool {
    if term.is_empty() {
        return true;
    }
    let needle = term.to_lowercase();
    [&record.first_name, &record.last_name, &record.email]
        .iter()
        .any(|field| field.to_lowercase().contains(&needle))
}

/// Returns the records of `items` matching `term`, in their original order.
pub fn visible_items(items: &[Record], term: &str) -> Vec<Record> {
    items
        .iter()
        .filter(|record| matches(record, term))
        .cloned()
        .collect()
}
