/// Timeline entry fields a filter query can target
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterField {
    /// Filter by entry type (message, command, edit, search, error)
    Type,
    /// Filter by actor (user, assistant, system)
    Actor,
    /// Filter by file path (case-insensitive partial match)
    Path,
    /// Filter entries on or after a date (YYYY-MM-DD format)
    Since,
}

impl FilterField {
    pub const ALL: [FilterField; 4] =
        [FilterField::Type, FilterField::Actor, FilterField::Path, FilterField::Since];

    /// Look up a field by name (case-insensitive)
    pub fn parse(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|field| field.as_str().eq_ignore_ascii_case(name))
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            FilterField::Type => "type",
            FilterField::Actor => "actor",
            FilterField::Path => "path",
            FilterField::Since => "since",
        }
    }
}

/// Joins two adjacent terms
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterOperator {
    /// Implied between terms on different fields
    And,
    /// Implied between terms on the same field
    Or,
}

/// Single field:value filter
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldFilter {
    pub field: FilterField,
    pub value: String,
}

impl FieldFilter {
    pub fn new(field: FilterField, value: impl Into<String>) -> Self {
        Self { field, value: value.into() }
    }
}

/// A flat query: `filters[i]` and `filters[i + 1]` are joined by `operators[i]`.
/// There is no grouping.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterExpr {
    pub filters: Vec<FieldFilter>,
    pub operators: Vec<FilterOperator>,
}

impl FilterExpr {
    pub fn new() -> Self {
        Self { filters: Vec::new(), operators: Vec::new() }
    }

    pub fn add_filter(&mut self, filter: FieldFilter) {
        self.filters.push(filter);
    }

    pub fn add_operator(&mut self, operator: FilterOperator) {
        self.operators.push(operator);
    }

    pub fn is_empty(&self) -> bool {
        self.filters.is_empty()
    }
}

impl Default for FilterExpr {
    fn default() -> Self {
        Self::new()
    }
}
