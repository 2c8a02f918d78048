//! WHERE-clause entries, operator-prefix parsing and WHERE compilation.

use crate::error::{DalError, DalResult};
use crate::value::Value;
use std::fmt;

/// Comparison operator derived from a filter name prefix.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompareOp {
    Eq,
    Ne,
    Gt,
    Gte,
    Lt,
    Lte,
}

impl CompareOp {
    pub fn as_sql(self) -> &'static str {
        match self {
            CompareOp::Eq => "=",
            CompareOp::Ne => "!=",
            CompareOp::Gt => ">",
            CompareOp::Gte => ">=",
            CompareOp::Lt => "<",
            CompareOp::Lte => "<=",
        }
    }
}

impl fmt::Display for CompareOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_sql())
    }
}

/// Split a filter name into its operator and real column name.
///
/// | name   | operator | column |
/// |--------|----------|--------|
/// | `!x`   | `!=`     | `x`    |
/// | `>=x`  | `>=`     | `x`    |
/// | `<=x`  | `<=`     | `x`    |
/// | `>x`   | `>`      | `x`    |
/// | `<x`   | `<`      | `x`    |
/// | `x`    | `=`      | `x`    |
pub fn parse_filter_name(name: &str) -> (CompareOp, &str) {
    // Two-character prefixes must win over their one-character heads.
    if let Some(column) = name.strip_prefix(">=") {
        return (CompareOp::Gte, column);
    }
    if let Some(column) = name.strip_prefix("<=") {
        return (CompareOp::Lte, column);
    }
    if let Some(column) = name.strip_prefix('!') {
        return (CompareOp::Ne, column);
    }
    if let Some(column) = name.strip_prefix('>') {
        return (CompareOp::Gt, column);
    }
    if let Some(column) = name.strip_prefix('<') {
        return (CompareOp::Lt, column);
    }
    (CompareOp::Eq, name)
}

/// A name/value pair: a WHERE filter or a SET entry depending on where it is stored.
#[derive(Debug, Clone, PartialEq)]
pub struct ValueField {
    pub name: String,
    pub value: Value,
}

impl ValueField {
    pub fn new(name: impl Into<String>, value: impl Into<Value>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }
}

/// Explicit boolean keyword placed between filters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Conjunction {
    And,
    Or,
}

impl Conjunction {
    pub fn as_sql(self) -> &'static str {
        match self {
            Conjunction::And => "AND",
            Conjunction::Or => "OR",
        }
    }
}

/// One entry of the WHERE sequence.
#[derive(Debug, Clone, PartialEq)]
pub enum Filter {
    /// `column <op> ?`, with the operator encoded as a name prefix
    Condition(ValueField),
    /// Sentinel forcing `AND`/`OR` at this position; binds no value
    Conjunction(Conjunction),
}

/// Render the filter sequence (without the `WHERE` keyword), pushing one bound
/// value per condition onto `values`.
///
/// Consecutive conditions are joined with an implicit `AND`. A condition
/// followed by a sentinel gets no implicit keyword; the sentinel supplies it.
/// Dangling or doubled sentinels are rendered as given.
pub(crate) fn build_where(
    filters: &[Filter],
    alias: &str,
    values: &mut Vec<Value>,
) -> DalResult<String> {
    let mut parts: Vec<String> = Vec::with_capacity(filters.len() * 2);
    let mut iter = filters.iter().peekable();

    while let Some(filter) = iter.next() {
        match filter {
            Filter::Conjunction(conj) => parts.push(conj.as_sql().to_string()),
            Filter::Condition(field) => {
                let (op, column) = parse_filter_name(&field.name);
                if column.is_empty() {
                    return Err(DalError::builder_state(format!(
                        "filter `{}` has no column name",
                        field.name
                    )));
                }
                values.push(field.value.clone());
                parts.push(format!("`{alias}`.`{column}` {op} ?"));

                if matches!(iter.peek(), Some(Filter::Condition(_))) {
                    parts.push("AND".to_string());
                }
            }
        }
    }

    Ok(parts.join(" "))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cond(name: &str, value: impl Into<Value>) -> Filter {
        Filter::Condition(ValueField::new(name, value))
    }

    #[test]
    fn parses_operator_prefixes() {
        assert_eq!(parse_filter_name("!x"), (CompareOp::Ne, "x"));
        assert_eq!(parse_filter_name(">=x"), (CompareOp::Gte, "x"));
        assert_eq!(parse_filter_name("<=x"), (CompareOp::Lte, "x"));
        assert_eq!(parse_filter_name(">x"), (CompareOp::Gt, "x"));
        assert_eq!(parse_filter_name("<x"), (CompareOp::Lt, "x"));
        assert_eq!(parse_filter_name("x"), (CompareOp::Eq, "x"));
    }

    #[test]
    fn bang_strips_only_one_character() {
        assert_eq!(parse_filter_name("!=x"), (CompareOp::Ne, "=x"));
    }

    #[test]
    fn implicit_and_between_conditions() {
        let mut values = Vec::new();
        let sql = build_where(&[cond("a", 1), cond(">b", 2)], "t", &mut values).unwrap();
        assert_eq!(sql, "`t`.`a` = ? AND `t`.`b` > ?");
        assert_eq!(values, vec![Value::from(1), Value::from(2)]);
    }

    #[test]
    fn sentinel_replaces_implicit_and() {
        let filters = [
            cond("a", 1),
            Filter::Conjunction(Conjunction::Or),
            cond("b", 2),
            Filter::Conjunction(Conjunction::And),
            cond("c", 3),
        ];
        let mut values = Vec::new();
        let sql = build_where(&filters, "t", &mut values).unwrap();
        assert_eq!(sql, "`t`.`a` = ? OR `t`.`b` = ? AND `t`.`c` = ?");
        assert_eq!(values.len(), 3);
    }

    #[test]
    fn dangling_sentinel_is_not_corrected() {
        let filters = [cond("a", 1), Filter::Conjunction(Conjunction::Or)];
        let mut values = Vec::new();
        let sql = build_where(&filters, "t", &mut values).unwrap();
        assert_eq!(sql, "`t`.`a` = ? OR");
        assert_eq!(values.len(), 1);
    }

    #[test]
    fn empty_column_is_rejected() {
        let mut values = Vec::new();
        let err = build_where(&[cond(">=", 1)], "t", &mut values).unwrap_err();
        assert!(matches!(err, DalError::BuilderState(_)));
        assert!(values.is_empty());
    }
}
