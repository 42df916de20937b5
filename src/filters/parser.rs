//! Filter query parser for timeline entries.
//!
//! ```text
//! query    := term (op? term)*
//! term     := field ':' value | field ':' '"' quoted '"'
//! op       := AND | OR            (case-insensitive)
//! field    := type | actor | path | since
//! ```
//!
//! - `type:message|command|edit|search|error`
//! - `actor:user|assistant|system` (`agent` is accepted for assistant)
//! - `path:<fragment>`, case-insensitive partial match on the entry path
//! - `since:YYYY-MM-DD`, entries on or after that day (UTC)
//!
//! Without an explicit operator, two terms on the same field are OR'd and
//! terms on different fields are AND'd. Explicit operators always win and
//! there is no grouping.
//!
//! ```rust
//! # use trajectory_viewer::filters::parser::parse_filter;
//! # use trajectory_viewer::filters::ast::FilterOperator;
//! let expr = parse_filter("type:edit type:command actor:assistant").unwrap();
//! assert_eq!(expr.operators, vec![FilterOperator::Or, FilterOperator::And]);
//!
//! let expr = parse_filter("path:\"my project\" OR type:error").unwrap();
//! assert_eq!(expr.filters[0].value, "my project");
//! ```

use anyhow::{Context, Result, anyhow, bail};
use chrono::NaiveDate;

use super::ast::{FieldFilter, FilterExpr, FilterField, FilterOperator};
use crate::models::{ActorType, EntryType};

#[derive(Debug, Clone, PartialEq, Eq)]
enum Token<'a> {
    Term { field: &'a str, value: &'a str },
    Op(FilterOperator),
}

/// Splits a query into terms and operators without copying
struct Lexer<'a> {
    rest: &'a str,
}

impl<'a> Lexer<'a> {
    fn new(input: &'a str) -> Self {
        Self { rest: input }
    }

    fn next_token(&mut self) -> Result<Option<Token<'a>>> {
        let rest = self.rest.trim_start();
        if rest.is_empty() {
            self.rest = rest;
            return Ok(None);
        }

        let word_end = rest.find(char::is_whitespace).unwrap_or(rest.len());
        let word = &rest[..word_end];

        let op = match word {
            w if w.eq_ignore_ascii_case("AND") => Some(FilterOperator::And),
            w if w.eq_ignore_ascii_case("OR") => Some(FilterOperator::Or),
            _ => None,
        };
        if let Some(op) = op {
            self.rest = &rest[word_end..];
            return Ok(Some(Token::Op(op)));
        }

        let Some((field, value)) = word.split_once(':') else {
            bail!("Invalid token: '{}' (expected field:value or AND/OR)", word);
        };

        let value = match value.strip_prefix('"') {
            // The quoted value may run past the current word
            Some(_) => {
                let quoted = &rest[field.len() + 2..];
                let close = quoted.find('"').ok_or_else(|| anyhow!("Unterminated quoted string"))?;
                self.rest = &quoted[close + 1..];
                &quoted[..close]
            }
            None => {
                self.rest = &rest[word_end..];
                value
            }
        };

        if field.is_empty() || value.is_empty() {
            bail!("Invalid field:value format: {}", word);
        }
        Ok(Some(Token::Term { field, value }))
    }
}

/// Parse a filter query into a [`FilterExpr`]. Blank input gives an empty expression.
pub fn parse_filter(input: &str) -> Result<FilterExpr> {
    let mut lexer = Lexer::new(input);
    let mut expr = FilterExpr::new();
    let mut pending: Option<FilterOperator> = None;
    let mut last_field: Option<FilterField> = None;

    while let Some(token) = lexer.next_token().context("Failed to tokenize filter")? {
        match token {
            Token::Op(op) => {
                if last_field.is_none() || pending.is_some() {
                    bail!("Unexpected {:?} operator (expected field:value)", op);
                }
                pending = Some(op);
            }
            Token::Term { field, value } => {
                let field = FilterField::parse(field).ok_or_else(|| {
                    anyhow!("Unknown field: '{}' (valid fields: type, actor, path, since)", field)
                })?;
                validate_value(field, value)?;

                if let Some(previous) = last_field {
                    let implicit =
                        if previous == field { FilterOperator::Or } else { FilterOperator::And };
                    expr.add_operator(pending.take().unwrap_or(implicit));
                }
                expr.add_filter(FieldFilter::new(field, value));
                last_field = Some(field);
            }
        }
    }

    if pending.is_some() {
        bail!("Filter ended with operator (expected field:value)");
    }
    Ok(expr)
}

fn validate_value(field: FilterField, value: &str) -> Result<()> {
    match field {
        FilterField::Type if EntryType::parse(value).is_none() => {
            let names: Vec<&str> = EntryType::ALL.iter().map(EntryType::as_str).collect();
            bail!("Invalid type value: '{}' (must be one of: {})", value, names.join(", "))
        }
        FilterField::Actor if ActorType::parse(value).is_none() => {
            bail!("Invalid actor value: '{}' (must be 'user', 'assistant' or 'system')", value)
        }
        FilterField::Since if !is_valid_date(value) => {
            bail!("Invalid date format: '{}' (expected YYYY-MM-DD)", value)
        }
        _ => Ok(()),
    }
}

/// Strict `YYYY-MM-DD` that is also a real calendar day
fn is_valid_date(value: &str) -> bool {
    value.len() == 10 && NaiveDate::parse_from_str(value, "%Y-%m-%d").is_ok()
}
