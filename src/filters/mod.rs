//! Ordering and selection of trajectories and their entries
//!
//! - [`parse_filter`] / [`apply_filters`] - query filters over normalized timeline entries
//! - [`sort_records`] - ordering of JSONL records by any accessor path
//! - [`display`] - which raw items to list and how to name and summarize records

pub mod apply;
pub mod ast;
pub mod display;
pub mod parser;
pub mod sort;

pub use apply::{apply_filters, evaluate_filter};
pub use ast::{FieldFilter, FilterExpr, FilterField, FilterOperator};
pub use display::{display_field_values, record_display_name, record_summary, should_display_item};
pub use parser::parse_filter;
pub use sort::{SortDirection, SortSpec, sort_records};
