use std::cmp::Ordering;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::accessor::{DURATION_PATH, get_path, history_duration_ms};
use crate::models::value_to_text;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    #[default]
    Asc,
    Desc,
}

impl SortDirection {
    pub fn apply(self, ordering: Ordering) -> Ordering {
        match self {
            SortDirection::Asc => ordering,
            SortDirection::Desc => ordering.reverse(),
        }
    }
}

/// Record field to sort by, as a path understood by [`get_path`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SortSpec {
    pub field: String,
    pub direction: SortDirection,
}

impl SortSpec {
    pub fn new(field: impl Into<String>, direction: SortDirection) -> Self {
        Self { field: field.into(), direction }
    }
}

/// Sort JSONL records in place by `spec`. The sort is stable.
///
/// `duration` compares history durations, with a missing duration counting
/// as zero. Any other field sorts records where it is absent or `null`
/// last, whatever the direction. Present values are grouped by JSON type
/// (numbers, then strings, then everything else) and compared within the
/// group: numbers numerically, strings lexicographically, the rest by text.
pub fn sort_records(records: &mut [Value], spec: &SortSpec) {
    if spec.field == DURATION_PATH {
        let duration = |record: &Value| history_duration_ms(record).unwrap_or(0);
        records.sort_by(|a, b| spec.direction.apply(duration(a).cmp(&duration(b))));
        return;
    }

    records.sort_by(|a, b| {
        let left = get_path(a, &spec.field);
        let right = get_path(b, &spec.field);
        compare_values(left.as_deref(), right.as_deref(), spec.direction)
    });
}

fn compare_values(
    left: Option<&Value>,
    right: Option<&Value>,
    direction: SortDirection,
) -> Ordering {
    match (left, right) {
        (None, None) => Ordering::Equal,
        (None, Some(_)) => Ordering::Greater,
        (Some(_), None) => Ordering::Less,
        (Some(a), Some(b)) => direction.apply(compare_present(a, b)),
    }
}

fn type_rank(value: &Value) -> u8 {
    match value {
        Value::Number(_) => 0,
        Value::String(_) => 1,
        _ => 2,
    }
}

fn compare_present(left: &Value, right: &Value) -> Ordering {
    match (left, right) {
        (Value::Number(a), Value::Number(b)) => match (a.as_i64(), b.as_i64()) {
            (Some(a), Some(b)) => a.cmp(&b),
            _ => a.as_f64().unwrap_or(0.0).total_cmp(&b.as_f64().unwrap_or(0.0)),
        },
        (Value::String(a), Value::String(b)) => a.cmp(b),
        _ => type_rank(left)
            .cmp(&type_rank(right))
            .then_with(|| value_to_text(left).cmp(&value_to_text(right))),
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn ids(records: &[Value]) -> Vec<&str> {
        records.iter().map(|r| r["instance_id"].as_str().unwrap_or("?")).collect()
    }

    #[test]
    fn test_sort_strings() {
        let mut records = vec![
            json!({"instance_id": "c"}),
            json!({"instance_id": "a"}),
            json!({"instance_id": "b"}),
        ];
        sort_records(&mut records, &SortSpec::new("instance_id", SortDirection::Asc));
        assert_eq!(ids(&records), vec!["a", "b", "c"]);

        sort_records(&mut records, &SortSpec::new("instance_id", SortDirection::Desc));
        assert_eq!(ids(&records), vec!["c", "b", "a"]);
    }

    #[test]
    fn test_sort_numbers_nested() {
        let mut records = vec![
            json!({"instance_id": "x", "metrics": {"cost": 2.5}}),
            json!({"instance_id": "y", "metrics": {"cost": 10}}),
            json!({"instance_id": "z", "metrics": {"cost": 0.1}}),
        ];
        sort_records(&mut records, &SortSpec::new("metrics.cost", SortDirection::Asc));
        assert_eq!(ids(&records), vec!["z", "x", "y"]);
    }

    #[test]
    fn test_missing_values_sort_last_both_directions() {
        let mut records = vec![
            json!({"instance_id": "none"}),
            json!({"instance_id": "one", "score": 1}),
            json!({"instance_id": "null", "score": null}),
            json!({"instance_id": "two", "score": 2}),
        ];
        sort_records(&mut records, &SortSpec::new("score", SortDirection::Asc));
        assert_eq!(ids(&records), vec!["one", "two", "none", "null"]);

        sort_records(&mut records, &SortSpec::new("score", SortDirection::Desc));
        assert_eq!(ids(&records), vec!["two", "one", "none", "null"]);
    }

    #[test]
    fn test_mixed_types_grouped_by_json_type() {
        let mut records = vec![
            json!({"instance_id": "five", "v": "5"}),
            json!({"instance_id": "flag", "v": true}),
            json!({"instance_id": "ten", "v": 10}),
            json!({"instance_id": "nine", "v": 9}),
            json!({"instance_id": "list", "v": [1]}),
        ];
        sort_records(&mut records, &SortSpec::new("v", SortDirection::Asc));
        assert_eq!(ids(&records), vec!["nine", "ten", "five", "list", "flag"]);

        sort_records(&mut records, &SortSpec::new("v", SortDirection::Desc));
        assert_eq!(ids(&records), vec!["flag", "list", "five", "ten", "nine"]);
    }

    #[test]
    fn test_mixed_types_large_input_is_ordered() {
        let mut records: Vec<Value> = (0..2000)
            .map(|i| match i % 3 {
                0 => json!({"instance_id": "n", "v": i}),
                1 => json!({"instance_id": "s", "v": i.to_string()}),
                _ => json!({"instance_id": "b", "v": i % 2 == 0}),
            })
            .collect();
        sort_records(&mut records, &SortSpec::new("v", SortDirection::Asc));

        for pair in records.windows(2) {
            assert_ne!(compare_present(&pair[0]["v"], &pair[1]["v"]), Ordering::Greater);
        }
        assert_eq!(records[0]["v"], json!(0));
    }

    #[test]
    fn test_sort_by_len() {
        let mut records = vec![
            json!({"instance_id": "long", "history": [1, 2, 3]}),
            json!({"instance_id": "short", "history": [1]}),
        ];
        sort_records(&mut records, &SortSpec::new("len(history)", SortDirection::Asc));
        assert_eq!(ids(&records), vec!["short", "long"]);
    }

    #[test]
    fn test_sort_by_duration() {
        let mut records = vec![
            json!({"instance_id": "slow", "history": [
                {"timestamp": "2025-01-01T00:00:00Z"}, {"timestamp": "2025-01-01T00:10:00Z"}
            ]}),
            json!({"instance_id": "empty", "history": []}),
            json!({"instance_id": "fast", "history": [
                {"timestamp": "2025-01-01T00:00:00Z"}, {"timestamp": "2025-01-01T00:00:30Z"}
            ]}),
        ];
        sort_records(&mut records, &SortSpec::new("duration", SortDirection::Asc));
        assert_eq!(ids(&records), vec!["empty", "fast", "slow"]);

        sort_records(&mut records, &SortSpec::new("duration", SortDirection::Desc));
        assert_eq!(ids(&records), vec!["slow", "fast", "empty"]);
    }

    #[test]
    fn test_sort_is_stable() {
        let mut records = vec![
            json!({"instance_id": "first", "group": 1}),
            json!({"instance_id": "second", "group": 1}),
            json!({"instance_id": "third", "group": 0}),
        ];
        sort_records(&mut records, &SortSpec::new("group", SortDirection::Desc));
        assert_eq!(ids(&records), vec!["first", "second", "third"]);
    }

    #[test]
    fn test_direction_deserializes_lowercase() {
        let direction: SortDirection = serde_json::from_value(json!("desc")).unwrap();
        assert_eq!(direction, SortDirection::Desc);
        assert_eq!(SortDirection::default(), SortDirection::Asc);
    }
}
