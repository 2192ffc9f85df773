//! Column value evaluation.
//!
//! Every raw input field passes through [`Value::normalize`] before a rule
//! uses it. Rule kinds the engine does not recognise resolve to
//! [`Value::Missing`]; malformed dates and non-numeric identifiers abort the
//! run.

use chrono::{Datelike, NaiveDate};
use remap_model::{
    Branch, Condition, IdRule, IfElse, Lookup, MappingRule, Record, ReferenceDataset, ResultStore,
    RuleKind, Token, Value,
};

use crate::error::{EngineError, Result};
use crate::identifier::{self, IdentifierScope};
use crate::options::EngineOptions;

/// Lookup tables match this column against the source value.
pub const LOOKUP_VALUE_COLUMN: &str = "LOOKUP_VALUE";
/// Lookup tables return this column for a matching row.
pub const LOOKUP_RESULT_COLUMN: &str = "LOOKUP_RESULT";

const CONCAT_SEPARATOR: &str = " - ";

/// Resolves rules of one table against the current state of a run.
#[derive(Debug, Clone, Copy)]
pub struct Resolver<'a> {
    table: &'a str,
    reference: &'a ReferenceDataset,
    results: &'a ResultStore,
    options: &'a EngineOptions,
}

impl<'a> Resolver<'a> {
    pub fn new(
        table: &'a str,
        reference: &'a ReferenceDataset,
        results: &'a ResultStore,
        options: &'a EngineOptions,
    ) -> Self {
        Self {
            table,
            reference,
            results,
            options,
        }
    }

    /// Value of `rule`'s column for `input`.
    pub fn resolve(&self, rule: &MappingRule, input: &Record) -> Result<Value> {
        match &rule.kind {
            RuleKind::Value(literal) => Ok(Value::text(literal.as_str())),
            RuleKind::Column { source } => Ok(field(input, source)),
            RuleKind::ColumnDate { source } => {
                let raw = field(input, source);
                format_dmy_date(&raw).map_err(|value| EngineError::InvalidDate {
                    table: self.table.to_string(),
                    column: rule.column.clone(),
                    value,
                })
            }
            RuleKind::IfElse(branch) => Ok(if_else(branch, input)),
            RuleKind::Concat(tokens) => Ok(concat(tokens, input)),
            RuleKind::Divide(tokens) => Ok(divide(tokens, input)),
            RuleKind::Lookup(lookup) => Ok(self.lookup(lookup, input)),
            RuleKind::Id(id) => self.identifier(rule, id, self.table, input),
            RuleKind::IdChild(id) => {
                let bucket = id.id_table.as_deref().unwrap_or_default();
                self.identifier(rule, id, bucket, input)
            }
            RuleKind::Unrecognized(_) => Ok(Value::Missing),
        }
    }

    fn lookup(&self, lookup: &Lookup, input: &Record) -> Value {
        let key = field(input, &lookup.source);
        self.reference
            .rows(&lookup.table)
            .iter()
            .find(|row| row.value_or_missing(LOOKUP_VALUE_COLUMN).loose_eq(&key))
            .map_or_else(
                || Value::text(lookup.fallback.as_str()),
                |row| Value::normalize(row.get(LOOKUP_RESULT_COLUMN)),
            )
    }

    fn identifier(
        &self,
        rule: &MappingRule,
        id: &IdRule,
        bucket_name: &str,
        input: &Record,
    ) -> Result<Value> {
        let scope = IdentifierScope {
            table: self.table,
            column: &rule.column,
            bucket_name,
            bucket: self.results.accepted(bucket_name),
            fallback_name: &id.fallback_table,
            fallback: self.reference.rows(&id.fallback_table),
        };
        let next = identifier::assign(id, &scope, input, self.options.key_filter_mode)?;
        Ok(Value::from(next))
    }
}

/// Normalized value of an input field.
fn field(input: &Record, column: &str) -> Value {
    Value::normalize(input.get(column))
}

fn if_else(rule: &IfElse, input: &Record) -> Value {
    let value = field(input, &rule.source);
    let holds = match &rule.condition {
        Condition::Equal(expected) => value.loose_eq(&Value::from(expected.as_str())),
        Condition::NotNull => !value.is_missing(),
        Condition::Unrecognized(_) => return Value::Missing,
    };
    let branch = if holds { &rule.then } else { &rule.otherwise };
    match branch {
        Branch::Value(literal) => Value::text(literal.as_str()),
        Branch::Column(column) => field(input, column),
        Branch::Concat(tokens) => concat(tokens, input),
        Branch::Divide(tokens) => divide(tokens, input),
        Branch::Unrecognized(_) => Value::Missing,
    }
}

fn token_value(token: &Token, input: &Record) -> Value {
    match token {
        Token::Column(column) => field(input, column),
        Token::Literal(literal) => Value::from(literal.as_str()),
    }
}

/// Join the non-missing segments with `" - "`.
///
/// While nothing has been collected a segment is taken as-is, so leading
/// empty literals never produce a dangling separator.
pub fn concat(tokens: &[Token], input: &Record) -> Value {
    let joined = tokens
        .iter()
        .map(|token| token_value(token, input))
        .filter(|value| !value.is_missing())
        .fold(String::new(), |mut acc, value| {
            if !acc.is_empty() {
                acc.push_str(CONCAT_SEPARATOR);
            }
            acc.push_str(&value.as_text());
            acc
        });
    Value::text(joined)
}

/// Divide the tokens left to right.
///
/// A non-numeric operand, a non-finite result and a zero result all yield
/// [`Value::Missing`].
pub fn divide(tokens: &[Token], input: &Record) -> Value {
    let mut operands = tokens.iter().map(|token| token_value(token, input).as_f64());
    let Some(Some(seed)) = operands.next() else {
        return Value::Missing;
    };
    let mut result = seed;
    for operand in operands {
        let Some(divisor) = operand else {
            return Value::Missing;
        };
        result /= divisor;
    }
    if result == 0.0 || !result.is_finite() {
        Value::Missing
    } else {
        Value::Number(result)
    }
}

/// Re-emit a `D/M/Y` date as `Y-MM-DD`.
///
/// Day and month are zero-padded; the year is written as given. A missing
/// value stays missing. The error carries the rejected text.
pub fn format_dmy_date(value: &Value) -> std::result::Result<Value, String> {
    if value.is_missing() {
        return Ok(Value::Missing);
    }
    let text = value.as_text();
    let parts: Vec<&str> = text.split('/').map(str::trim).collect();
    let [day, month, year] = parts.as_slice() else {
        return Err(text.to_string());
    };
    let date = match (year.parse::<i32>(), month.parse::<u32>(), day.parse::<u32>()) {
        (Ok(year), Ok(month), Ok(day)) => NaiveDate::from_ymd_opt(year, month, day),
        _ => None,
    };
    match date {
        Some(date) => Ok(Value::Text(format!(
            "{year}-{:02}-{:02}",
            date.month(),
            date.day()
        ))),
        None => Err(text.to_string()),
    }
}
