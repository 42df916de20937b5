use chrono::{NaiveDate, NaiveTime};

use super::ast::{FieldFilter, FilterExpr, FilterField, FilterOperator};
use crate::models::{ActorType, EntryType, TimelineEntry};
use crate::utils::parse_timestamp;

/// Keep the entries matching `filter`, in their original order.
///
/// Terms are folded strictly left to right, so `a OR b AND c` means
/// `(a OR b) AND c`. An empty expression keeps everything.
pub fn apply_filters(entries: Vec<TimelineEntry>, filter: &FilterExpr) -> Vec<TimelineEntry> {
    if filter.is_empty() {
        return entries;
    }

    entries.into_iter().filter(|entry| evaluate_filter(entry, filter)).collect()
}

/// Whether one entry passes the whole expression
pub fn evaluate_filter(entry: &TimelineEntry, filter: &FilterExpr) -> bool {
    let Some(first) = filter.filters.first() else {
        return true;
    };

    let rest = filter.operators.iter().zip(&filter.filters[1..]);
    rest.fold(term_matches(entry, first), |acc, (operator, term)| match operator {
        FilterOperator::And => acc && term_matches(entry, term),
        FilterOperator::Or => acc || term_matches(entry, term),
    })
}

fn term_matches(entry: &TimelineEntry, filter: &FieldFilter) -> bool {
    match filter.field {
        FilterField::Type => match_type(entry, &filter.value),
        FilterField::Actor => match_actor(entry, &filter.value),
        FilterField::Path => match_path(entry, &filter.value),
        FilterField::Since => match_since(entry, &filter.value),
    }
}

fn match_type(entry: &TimelineEntry, value: &str) -> bool {
    EntryType::parse(value).is_some_and(|entry_type| entry.entry_type == entry_type)
}

fn match_actor(entry: &TimelineEntry, value: &str) -> bool {
    ActorType::parse(value).is_some_and(|actor| entry.actor_type == actor)
}

/// Case-insensitive substring of the entry path
fn match_path(entry: &TimelineEntry, value: &str) -> bool {
    entry.path.as_ref().is_some_and(|path| path.to_lowercase().contains(&value.to_lowercase()))
}

/// On or after midnight UTC of `value`. Unparseable timestamps never match.
fn match_since(entry: &TimelineEntry, value: &str) -> bool {
    let Ok(date) = NaiveDate::parse_from_str(value, "%Y-%m-%d") else {
        return false;
    };
    let cutoff = date.and_time(NaiveTime::MIN).and_utc();
    parse_timestamp(&entry.timestamp).is_some_and(|timestamp| timestamp >= cutoff)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create_test_entry(
        entry_type: EntryType,
        actor_type: ActorType,
        path: Option<&str>,
        timestamp: &str,
    ) -> TimelineEntry {
        let mut entry = TimelineEntry::new(entry_type, actor_type, timestamp, "test");
        entry.path = path.map(str::to_string);
        entry
    }

    fn edit(path: &str) -> TimelineEntry {
        create_test_entry(EntryType::Edit, ActorType::Assistant, Some(path), "2024-06-15T12:00:00")
    }

    #[test]
    fn test_apply_filters_empty() {
        let entries = vec![edit("src/lib.rs")];
        let result = apply_filters(entries.clone(), &FilterExpr::new());
        assert_eq!(result, entries);
    }

    #[test]
    fn test_match_path() {
        let entry = edit("/workspace/Django/db/models.py");
        assert!(match_path(&entry, "django/db"));
        assert!(match_path(&entry, "MODELS"));
        assert!(!match_path(&entry, "views"));
    }

    #[test]
    fn test_match_path_none() {
        let entry =
            create_test_entry(EntryType::Message, ActorType::User, None, "2024-06-15T12:00:00");
        assert!(!match_path(&entry, "src"));
    }

    #[test]
    fn test_match_type() {
        let entry = edit("a.rs");
        assert!(match_type(&entry, "edit"));
        assert!(match_type(&entry, "EDIT"));
        assert!(!match_type(&entry, "command"));
        assert!(!match_type(&entry, "bogus"));
    }

    #[test]
    fn test_match_actor() {
        let entry = edit("a.rs");
        assert!(match_actor(&entry, "assistant"));
        assert!(match_actor(&entry, "agent"));
        assert!(!match_actor(&entry, "user"));
    }

    #[test]
    fn test_match_since() {
        let entry = edit("a.rs");
        assert!(match_since(&entry, "2024-01-01"));
        assert!(match_since(&entry, "2024-06-15")); // Same day
        assert!(!match_since(&entry, "2024-12-31"));
    }

    #[test]
    fn test_match_since_rfc3339_with_offset() {
        let timestamp = "2024-06-15T01:00:00+02:00";
        let entry = create_test_entry(EntryType::Command, ActorType::Assistant, None, timestamp);
        // 2024-06-14T23:00:00Z
        assert!(!match_since(&entry, "2024-06-15"));
        assert!(match_since(&entry, "2024-06-14"));
    }

    #[test]
    fn test_match_since_invalid() {
        let entry = edit("a.rs");
        assert!(!match_since(&entry, "invalid"));
        assert!(!match_since(&entry, "2024-13-01"));

        let undated = create_test_entry(EntryType::Message, ActorType::User, None, "not a date");
        assert!(!match_since(&undated, "2000-01-01"));
    }

    #[test]
    fn test_evaluate_and_or() {
        let entry = edit("src/lib.rs");

        let mut filter = FilterExpr::new();
        filter.add_filter(FieldFilter::new(FilterField::Type, "edit"));
        filter.add_operator(FilterOperator::And);
        filter.add_filter(FieldFilter::new(FilterField::Actor, "user"));
        assert!(!evaluate_filter(&entry, &filter));

        let mut filter = FilterExpr::new();
        filter.add_filter(FieldFilter::new(FilterField::Path, "tests/"));
        filter.add_operator(FilterOperator::Or);
        filter.add_filter(FieldFilter::new(FilterField::Path, "src/"));
        assert!(evaluate_filter(&entry, &filter));
    }

    #[test]
    fn test_evaluate_left_to_right() {
        // (type:error OR type:edit) AND actor:assistant
        let entry = edit("x");
        let mut filter = FilterExpr::new();
        filter.add_filter(FieldFilter::new(FilterField::Type, "error"));
        filter.add_operator(FilterOperator::Or);
        filter.add_filter(FieldFilter::new(FilterField::Type, "edit"));
        filter.add_operator(FilterOperator::And);
        filter.add_filter(FieldFilter::new(FilterField::Actor, "assistant"));
        assert!(evaluate_filter(&entry, &filter));
    }

    #[test]
    fn test_apply_filters_integration() {
        let entries = vec![
            edit("src/lib.rs"),
            create_test_entry(
                EntryType::Command,
                ActorType::Assistant,
                None,
                "2024-06-15T12:00:00",
            ),
            create_test_entry(EntryType::Message, ActorType::User, None, "2024-01-01T00:00:00"),
        ];

        let mut filter = FilterExpr::new();
        filter.add_filter(FieldFilter::new(FilterField::Actor, "assistant"));
        assert_eq!(apply_filters(entries.clone(), &filter).len(), 2);

        let mut filter = FilterExpr::new();
        filter.add_filter(FieldFilter::new(FilterField::Since, "2024-06-01"));
        let result = apply_filters(entries, &filter);
        assert_eq!(result.len(), 2);
        assert_eq!(result[0].entry_type, EntryType::Edit);
    }
}
